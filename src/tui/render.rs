use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::model::filter::Filter;
use crate::util::unicode::{display_width, truncate_to_width};

use super::app::{App, Mode};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title | input field | filter tabs | list | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_input_row(frame, app, chunks[1]);
    render_filter_tabs(frame, app, chunks[2]);
    render_task_list(frame, app, chunks[3]);
    render_status_row(frame, app, chunks[4]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.store.len();
    let line = Line::from(vec![
        Span::styled(
            " [t] tally",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} task{}", count, if count == 1 { "" } else { "s" }),
            Style::default().fg(app.theme.dim),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(app.theme.background)),
        area,
    );
}

fn render_input_row(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.mode == Mode::Input {
        Line::from(vec![
            Span::styled(" + ", Style::default().fg(app.theme.accent)),
            Span::styled(
                app.buffer.clone(),
                Style::default().fg(app.theme.text_bright),
            ),
            Span::styled("▏", Style::default().fg(app.theme.accent)),
        ])
    } else {
        Line::from(vec![
            Span::styled(" + ", Style::default().fg(app.theme.dim)),
            Span::styled("add a new task…", Style::default().fg(app.theme.dim)),
        ])
    };
    let bg = if app.mode == Mode::Input {
        app.theme.surface
    } else {
        app.theme.background
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

fn render_filter_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default())];
    for mode in Filter::MODES {
        let count = mode.apply(app.store.tasks()).len();
        let label = format!(" {} ({}) ", tab_label(mode), count);
        let style = if mode == app.filter {
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(app.theme.dim)
        };
        spans.push(Span::styled(label, style));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(app.theme.background)),
        area,
    );
}

fn tab_label(mode: Filter) -> &'static str {
    match mode {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Completed => "Completed",
    }
}

fn render_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible();

    if visible.is_empty() {
        let message = match app.filter {
            Filter::All => " no tasks — press a to add one",
            Filter::Active => " nothing active",
            Filter::Completed => " nothing completed yet",
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(app.theme.dim).bg(app.theme.background)),
            area,
        );
        return;
    }

    // Scroll so the cursor row stays on screen
    let height = area.height as usize;
    let scroll = app.cursor.saturating_sub(height.saturating_sub(1));

    let mut lines: Vec<Line> = Vec::new();
    for (row, id) in visible.iter().enumerate().skip(scroll).take(height) {
        let Some(task) = app.store.get(*id) else {
            continue;
        };
        let is_cursor = row == app.cursor;
        let bg = if is_cursor {
            app.theme.surface
        } else {
            app.theme.background
        };

        let mut spans: Vec<Span> = Vec::new();

        // Checkbox
        let (checkbox, checkbox_color) = if task.completed {
            ("[x]", app.theme.success)
        } else {
            ("[ ]", app.theme.dim)
        };
        spans.push(Span::styled(
            format!(" {} ", checkbox),
            Style::default().fg(checkbox_color).bg(bg),
        ));

        if app.mode == Mode::Edit && app.editing == Some(*id) {
            // In-place edit field replaces the label
            spans.push(Span::styled(
                app.buffer.clone(),
                Style::default().fg(app.theme.warning).bg(bg),
            ));
            spans.push(Span::styled(
                "▏",
                Style::default().fg(app.theme.warning).bg(bg),
            ));
        } else {
            // Name, struck through when completed
            let name_style = if task.completed {
                Style::default()
                    .fg(app.theme.dim)
                    .bg(bg)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else if is_cursor {
                Style::default().fg(app.theme.text_bright).bg(bg)
            } else {
                Style::default().fg(app.theme.text).bg(bg)
            };
            // Leave room for checkbox, date column and padding
            let name_budget = (area.width as usize).saturating_sub(18);
            spans.push(Span::styled(
                truncate_to_width(&task.name, name_budget),
                name_style,
            ));

            let date = task.created_at.format("%Y-%m-%d").to_string();
            let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
            let pad = (area.width as usize)
                .saturating_sub(used + display_width(&date) + 1)
                .max(1);
            spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
            spans.push(Span::styled(date, Style::default().fg(app.theme.dim).bg(bg)));
        }

        // Pad the cursor row to full width
        if is_cursor {
            let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
            if used < area.width as usize {
                spans.push(Span::styled(
                    " ".repeat(area.width as usize - used),
                    Style::default().bg(bg),
                ));
            }
        }

        lines.push(Line::from(spans));
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        area,
    );
}

fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(status) = &app.status {
        Line::from(Span::styled(
            format!(" {}", status),
            Style::default().fg(app.theme.error),
        ))
    } else {
        let hints = match app.mode {
            Mode::Navigate if app.show_key_hints => {
                " a add · space toggle · e edit · d delete · f filter · q quit"
            }
            Mode::Input => " enter add · esc done",
            Mode::Edit => " enter save · esc cancel",
            _ => "",
        };
        Line::from(Span::styled(hints, Style::default().fg(app.theme.dim)))
    };
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(app.theme.background)),
        area,
    );
}
