//! Event handling for the story writer TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use story_core::StoryEvent;

use crate::app::{App, InputMode};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Insert => handle_insert_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        InputMode::Edit => handle_edit_mode(app, key),
    }
}

/// Handle keys in NORMAL mode (vim-style navigation and hotkeys)
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        // Mode switching
        KeyCode::Char('i') | KeyCode::Enter => {
            app.enter_insert_mode();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('e') => {
            app.open_editor();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(':') => {
            app.enter_command_mode();
            EventResult::NeedsRedraw
        }

        // Help
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        KeyCode::Char('q') => EventResult::Quit,

        // Story actions
        KeyCode::Char('g') => {
            app.generate_story();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('c') => {
            app.generate_chapter();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('s') => {
            app.queue(StoryEvent::SaveStory);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('x') => {
            app.queue(StoryEvent::ExportText);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('p') => {
            app.queue(StoryEvent::ExportPdf);
            EventResult::NeedsRedraw
        }

        // Selection and scrolling
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('G') => {
            app.scroll_to_bottom();
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_up(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(10);
            EventResult::NeedsRedraw
        }

        // Field focus cycling
        KeyCode::Tab => {
            app.cycle_focus();
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab => {
            app.cycle_focus_reverse();
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in INSERT mode (typing into the prompt or chapter field)
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            return EventResult::NeedsRedraw;
        }
        KeyCode::Enter => {
            app.submit_input();
            return EventResult::NeedsRedraw;
        }
        KeyCode::Tab => {
            app.cycle_focus();
            if app.active_input_mut().is_none() {
                app.input_mode = InputMode::Normal;
            }
            return EventResult::NeedsRedraw;
        }
        _ => {}
    }

    let Some(input) = app.active_input_mut() else {
        app.input_mode = InputMode::Normal;
        return EventResult::NeedsRedraw;
    };

    match key.code {
        KeyCode::Left => input.cursor_left(),
        KeyCode::Right => input.cursor_right(),
        KeyCode::Home => input.cursor_home(),
        KeyCode::End => input.cursor_end(),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Up => input.history_prev(),
        KeyCode::Down => input.history_next(),
        KeyCode::Char(c) => input.type_char(c),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle keys in COMMAND mode (: commands)
fn handle_command_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.enter_normal_mode();
        }
        KeyCode::Enter => {
            app.execute_command();
            if app.should_quit {
                return EventResult::Quit;
            }
        }
        KeyCode::Left => app.command_mut().cursor_left(),
        KeyCode::Right => app.command_mut().cursor_right(),
        KeyCode::Backspace => {
            if app.command().text().is_empty() {
                // Backspace on just ":" exits command mode
                app.enter_normal_mode();
            } else {
                app.command_mut().backspace();
            }
        }
        KeyCode::Char(c) => app.command_mut().type_char(c),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle keys in the story editor
fn handle_edit_mode(app: &mut App, key: KeyEvent) -> EventResult {
    if let (KeyCode::Char('s'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        app.commit_editor();
        return EventResult::NeedsRedraw;
    }
    if key.code == KeyCode::Esc {
        app.discard_editor();
        return EventResult::NeedsRedraw;
    }

    let Some(editor) = app.editor_mut() else {
        app.input_mode = InputMode::Normal;
        return EventResult::NeedsRedraw;
    };

    match key.code {
        KeyCode::Enter => editor.newline(),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Delete => editor.delete(),
        KeyCode::Left => editor.left(),
        KeyCode::Right => editor.right(),
        KeyCode::Up => editor.up(),
        KeyCode::Down => editor.down(),
        KeyCode::Home => editor.home(),
        KeyCode::End => editor.end(),
        KeyCode::Tab => {
            for _ in 0..4 {
                editor.type_char(' ');
            }
        }
        KeyCode::Char(c) => editor.type_char(c),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle key when overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
