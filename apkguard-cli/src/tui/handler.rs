use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, AppMode};

/// Map key events to actions based on current mode
pub fn handle_key(key: KeyEvent, mode: AppMode) -> Action {
    match mode {
        AppMode::Help => handle_key_help(key),
        AppMode::AddFile => handle_key_prompt(key),
        AppMode::Browsing => handle_key_browsing(key),
    }
}

fn handle_key_help(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::HideHelp,
        _ => Action::Tick,
    }
}

fn handle_key_prompt(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::CancelInput,
        KeyCode::Esc => Action::CancelInput,
        KeyCode::Enter => Action::SubmitInput,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::Tick,
    }
}

fn handle_key_browsing(key: KeyEvent) -> Action {
    match key.code {
        // Quit
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::GoToFirst,
        KeyCode::End | KeyCode::Char('G') => Action::GoToLast,

        // Scanning
        KeyCode::Enter | KeyCode::Char('s') => Action::StartScan,
        KeyCode::Char('x') => Action::CancelScan,

        // Upload list
        KeyCode::Char('a') => Action::AddFile,
        KeyCode::Char('d') | KeyCode::Delete => Action::Remove,
        KeyCode::Char('C') => Action::ClearAll,

        // Views
        KeyCode::Tab | KeyCode::BackTab => Action::NextView,

        // Help
        KeyCode::Char('?') => Action::ShowHelp,

        _ => Action::Tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_browsing_keys() {
        assert_eq!(handle_key(key(KeyCode::Enter), AppMode::Browsing), Action::StartScan);
        assert_eq!(handle_key(key(KeyCode::Char('s')), AppMode::Browsing), Action::StartScan);
        assert_eq!(handle_key(key(KeyCode::Char('x')), AppMode::Browsing), Action::CancelScan);
        assert_eq!(handle_key(key(KeyCode::Char('C')), AppMode::Browsing), Action::ClearAll);
        assert_eq!(handle_key(key(KeyCode::Tab), AppMode::Browsing), Action::NextView);
        assert_eq!(
            handle_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                AppMode::Browsing
            ),
            Action::Quit
        );
    }

    #[test]
    fn test_prompt_captures_text() {
        assert_eq!(
            handle_key(key(KeyCode::Char('q')), AppMode::AddFile),
            Action::InputChar('q')
        );
        assert_eq!(handle_key(key(KeyCode::Enter), AppMode::AddFile), Action::SubmitInput);
        assert_eq!(handle_key(key(KeyCode::Esc), AppMode::AddFile), Action::CancelInput);
    }

    #[test]
    fn test_help_closes() {
        assert_eq!(handle_key(key(KeyCode::Char('?')), AppMode::Help), Action::HideHelp);
        assert_eq!(handle_key(key(KeyCode::Char('s')), AppMode::Help), Action::Tick);
    }
}
