use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, App, Mode};
use crate::prompt::PromptKind;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits, even mid-prompt or in the viewer.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    if let Some(action) = map_key(&app.mode, key) {
        app.dispatch(action);
    }
}

/// Decode a key into a logical action for the current mode.
pub fn map_key(mode: &Mode, key: KeyEvent) -> Option<Action> {
    match mode {
        Mode::Browsing => browse_key(key),
        Mode::Viewing(_) => view_key(key),
        Mode::Prompting(prompt) => match prompt.kind() {
            PromptKind::FreeText => text_key(key),
            PromptKind::Confirm => confirm_key(key),
        },
    }
}

fn browse_key(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Enter => Action::Enter,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') => Action::Rename,
        KeyCode::Char('c') => Action::Copy,
        KeyCode::Char('m') => Action::Move,
        KeyCode::Char('d') => Action::Delete,
        KeyCode::Char('n') => Action::Create,
        KeyCode::Char('/') => Action::Search,
        _ => return None,
    };
    Some(action)
}

fn view_key(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('e') | KeyCode::Esc => Action::ViewerExit,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown | KeyCode::Char(' ') => Action::PageDown,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        _ => return None,
    };
    Some(action)
}

fn text_key(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Enter => Action::Enter,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Backspace | KeyCode::Delete => Action::Backspace,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Action::Char(c),
        _ => return None,
    };
    Some(action)
}

fn confirm_key(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Action::ConfirmYes,
        KeyCode::Char('n') | KeyCode::Char('N') => Action::ConfirmNo,
        _ => return None,
    };
    Some(action)
}
