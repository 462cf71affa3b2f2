use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    /// Row background for the cursor line
    pub surface: Color,
    pub accent: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    /// Completed checkboxes
    pub success: Color,
    /// Errors and delete hints
    pub error: Color,
    /// The in-place edit field
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x1A, 0x1B, 0x26),
            surface: Color::Rgb(0x24, 0x28, 0x3B),
            accent: Color::Rgb(0x7A, 0xA2, 0xF7),
            text: Color::Rgb(0xA9, 0xB1, 0xD6),
            text_bright: Color::Rgb(0xC0, 0xCA, 0xF5),
            dim: Color::Rgb(0x56, 0x5F, 0x89),
            success: Color::Rgb(0x9E, 0xCE, 0x6A),
            error: Color::Rgb(0xF7, 0x76, 0x8E),
            warning: Color::Rgb(0xE0, 0xAF, 0x68),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "surface" => theme.surface = color,
                    "accent" => theme.accent = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "dim" => theme.dim = color,
                    "success" => theme.success = color,
                    "error" => theme.error = color,
                    "warning" => theme.warning = color,
                    _ => {}
                }
            }
        }

        theme
    }
}
