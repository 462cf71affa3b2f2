use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::load_config;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::model::config::Config;
use crate::model::filter::Filter;
use crate::model::task::TaskId;
use crate::store::TaskStore;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving around the list
    Navigate,
    /// Typing into the new-task field
    Input,
    /// Editing an existing task's name in place
    Edit,
}

/// Main application state
pub struct App {
    pub store: TaskStore,
    pub filter: Filter,
    /// Cursor index into the visible (filtered) list
    pub cursor: usize,
    pub mode: Mode,
    /// Line-edit buffer shared by Input and Edit modes
    pub buffer: String,
    /// The task being edited, when in Edit mode
    pub editing: Option<TaskId>,
    /// Transient message for the status row (store errors, mostly)
    pub status: Option<String>,
    pub show_key_hints: bool,
    pub theme: Theme,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: TaskStore, config: &Config) -> Self {
        App {
            store,
            filter: Filter::All,
            cursor: 0,
            mode: Mode::Navigate,
            buffer: String::new(),
            editing: None,
            status: None,
            show_key_hints: config.ui.show_key_hints,
            theme: Theme::from_config(&config.ui),
            should_quit: false,
        }
    }

    /// Ids of the tasks visible under the current filter, in store order.
    pub fn visible(&self) -> Vec<TaskId> {
        self.filter
            .apply(self.store.tasks())
            .iter()
            .map(|t| t.id)
            .collect()
    }

    /// The task under the cursor, if any.
    pub fn cursor_task(&self) -> Option<TaskId> {
        self.visible().get(self.cursor).copied()
    }

    /// Keep the cursor inside the visible list after mutations.
    pub fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.clamp_cursor();
    }

    /// Surface a store error in the status row instead of crashing the UI.
    pub fn report_error(&mut self, err: impl std::fmt::Display) {
        self.status = Some(format!("error: {}", err));
    }
}

/// Restore filter and cursor from .state.json
pub fn restore_ui_state(app: &mut App) {
    if let Some(state) = read_ui_state(app.store.dir()) {
        app.filter = state.filter;
        app.cursor = state.cursor;
        app.clamp_cursor();
    }
}

/// Save filter and cursor to .state.json
pub fn save_ui_state(app: &App) {
    let state = UiState {
        filter: app.filter,
        cursor: app.cursor,
    };
    let _ = write_ui_state(app.store.dir(), &state);
}

/// Run the TUI application
pub fn run(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(dir)?;
    let store = TaskStore::load(dir)?;

    let mut app = App::new(store, &config);
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Save UI state before exit
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app_with(names: &[&str]) -> (TempDir, App) {
        let tmp = TempDir::new().unwrap();
        let mut store = TaskStore::load(tmp.path()).unwrap();
        for name in names {
            store.add(name).unwrap();
        }
        (tmp, App::new(store, &Config::default()))
    }

    #[test]
    fn visible_follows_the_filter() {
        let (_tmp, mut app) = app_with(&["A", "B", "C"]);
        let b = app.store.tasks()[1].id;
        app.store.set_completed(b, true).unwrap();

        assert_eq!(app.visible().len(), 3);
        app.set_filter(Filter::Active);
        assert_eq!(app.visible().len(), 2);
        app.set_filter(Filter::Completed);
        assert_eq!(app.visible(), vec![b]);
    }

    #[test]
    fn cursor_clamps_when_the_visible_list_shrinks() {
        let (_tmp, mut app) = app_with(&["A", "B", "C"]);
        app.cursor = 2;

        let c = app.cursor_task().unwrap();
        app.store.delete(c).unwrap();
        app.clamp_cursor();
        assert_eq!(app.cursor, 1);

        app.set_filter(Filter::Completed);
        assert_eq!(app.cursor, 0);
        assert_eq!(app.cursor_task(), None);
    }

    #[test]
    fn state_round_trip_restores_filter_and_cursor() {
        let (tmp, mut app) = app_with(&["A", "B"]);
        app.filter = Filter::Active;
        app.cursor = 1;
        save_ui_state(&app);

        let store = TaskStore::load(tmp.path()).unwrap();
        let mut fresh = App::new(store, &Config::default());
        restore_ui_state(&mut fresh);
        assert_eq!(fresh.filter, Filter::Active);
        assert_eq!(fresh.cursor, 1);
    }
}
