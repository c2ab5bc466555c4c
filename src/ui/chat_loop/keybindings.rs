//! Key handling for the chat screen.
//!
//! Global shortcuts are resolved first; everything else is forwarded to the
//! input textarea.

use crate::core::app::App;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::Size;
use tui_textarea::Input as TAInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Handled,
    Ignored,
    Submit,
    Exit,
}

/// Rows available to the transcript for a terminal of `size`.
pub fn transcript_height(app: &App, size: Size) -> u16 {
    let banner = u16::from(app.state().last_error.is_some());
    size.height
        .saturating_sub(app.input_area_height() + 2) // input + borders
        .saturating_sub(banner)
        .saturating_sub(1) // header
}

pub fn handle_key(app: &mut App, key: KeyEvent, term_size: Size) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Exit,
        KeyCode::Esc => KeyAction::Exit,
        KeyCode::Char('l') if ctrl => {
            app.clear_chat();
            KeyAction::Handled
        }
        KeyCode::Char('t') if ctrl => {
            app.toggle_theme();
            KeyAction::Handled
        }
        KeyCode::PageUp => {
            let page = transcript_height(app, term_size).max(1);
            app.scroll_up(page);
            KeyAction::Handled
        }
        KeyCode::PageDown => {
            let available = transcript_height(app, term_size);
            app.scroll_down(available.max(1), available, term_size.width);
            KeyAction::Handled
        }
        KeyCode::Enter if alt => {
            app.textarea.insert_newline();
            KeyAction::Handled
        }
        KeyCode::Enter => KeyAction::Submit,
        _ => {
            if app.textarea.input(TAInput::from(key)) {
                KeyAction::Handled
            } else {
                KeyAction::Ignored
            }
        }
    }
}
