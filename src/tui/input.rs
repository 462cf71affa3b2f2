use crossterm::event::{KeyCode, KeyEvent};

use crate::model::filter::Filter;

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Any keypress clears a stale status message
    app.status = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Input => handle_input(app, key),
        Mode::Edit => handle_edit(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.visible().len();
            if len > 0 && app.cursor < len - 1 {
                app.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }

        KeyCode::Char('a') | KeyCode::Char('i') => {
            app.buffer.clear();
            app.mode = Mode::Input;
        }

        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = app.cursor_task()
                && let Err(e) = app.store.toggle(id)
            {
                app.report_error(e);
            }
            // Toggling can move the task out of the current filter
            app.clamp_cursor();
        }

        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = app.cursor_task() {
                // Pre-fill the edit field with the current name
                app.buffer = app
                    .store
                    .get(id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                app.editing = Some(id);
                app.mode = Mode::Edit;
            }
        }

        KeyCode::Char('d') => {
            if let Some(id) = app.cursor_task() {
                if let Err(e) = app.store.delete(id) {
                    app.report_error(e);
                }
                app.clamp_cursor();
            }
        }

        KeyCode::Char('f') | KeyCode::Tab => app.set_filter(app.filter.cycle()),
        KeyCode::Char('1') => app.set_filter(Filter::All),
        KeyCode::Char('2') => app.set_filter(Filter::Active),
        KeyCode::Char('3') => app.set_filter(Filter::Completed),

        _ => {}
    }
}

fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.buffer.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            match app.store.add(&app.buffer) {
                // Keep the field focused so several tasks can be entered in
                // a row.
                Ok(Some(_)) => app.buffer.clear(),
                Ok(None) => {}
                Err(e) => app.report_error(e),
            }
        }
        KeyCode::Backspace => {
            app.buffer.pop();
        }
        KeyCode::Char(c) => app.buffer.push(c),
        _ => {}
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            // Cancel: back to display state, name unchanged
            app.buffer.clear();
            app.editing = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            if let Some(id) = app.editing.take()
                && let Err(e) = app.store.rename(id, &app.buffer)
            {
                app.report_error(e);
            }
            app.buffer.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Backspace => {
            app.buffer.pop();
        }
        KeyCode::Char(c) => app.buffer.push(c),
        _ => {}
    }
}
