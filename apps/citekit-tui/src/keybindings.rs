//! Keybinding definitions

use crossterm::event::{KeyCode, KeyModifiers};

use crate::focus::Focus;

/// Keybinding action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application
    Quit,
    /// Look up the DOI in the input
    Submit,
    /// Clear the input and the current result
    ClearForm,
    /// Move focus to the DOI input
    FocusInput,
    /// Cycle focus to the next panel
    NextPanel,
    /// Copy the selected format of the current result
    CopySelected,
    /// Copy the selected format of the highlighted history entry
    CopyHistory,
    /// Select the next citation format
    NextFormat,
    /// Select the previous citation format
    PrevFormat,
    /// Move up in the history list
    HistoryUp,
    /// Move down in the history list
    HistoryDown,
    /// Remove all history entries
    ClearHistory,
    /// Toggle help
    ToggleHelp,
    /// Type a character into the input
    Insert(char),
    /// Delete the character before the cursor
    Backspace,
}

/// What the keymap needs to know about the app
#[derive(Debug, Clone, Copy)]
pub struct KeyContext {
    pub focus: Focus,
    pub input_blank: bool,
    pub loading: bool,
    pub has_result: bool,
}

fn is_command(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
}

/// Get the action for a key press
pub fn resolve(code: KeyCode, modifiers: KeyModifiers, ctx: KeyContext) -> Option<Action> {
    if is_command(modifiers) && code == KeyCode::Char('q') {
        return Some(Action::Quit);
    }

    if ctx.focus.is_text_input() {
        input_action(code, modifiers, ctx)
    } else {
        panel_action(code, modifiers, ctx)
    }
}

fn input_action(code: KeyCode, modifiers: KeyModifiers, ctx: KeyContext) -> Option<Action> {
    match code {
        KeyCode::Enter if !is_command(modifiers) => {
            (!ctx.input_blank && !ctx.loading).then_some(Action::Submit)
        }
        KeyCode::Esc => Some(Action::ClearForm),
        KeyCode::Tab => Some(Action::NextPanel),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(_) if is_command(modifiers) => None,
        KeyCode::Char(c) => Some(Action::Insert(c)),
        _ => None,
    }
}

fn panel_action(code: KeyCode, modifiers: KeyModifiers, ctx: KeyContext) -> Option<Action> {
    if is_command(modifiers) {
        return match code {
            KeyCode::Char('c') if ctx.has_result => Some(Action::CopySelected),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('/') => Some(Action::FocusInput),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('X') => Some(Action::ClearHistory),
        KeyCode::Tab => Some(Action::NextPanel),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::NextFormat),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevFormat),
        KeyCode::Char('j') | KeyCode::Down if ctx.focus == Focus::History => {
            Some(Action::HistoryDown)
        }
        KeyCode::Char('k') | KeyCode::Up if ctx.focus == Focus::History => {
            Some(Action::HistoryUp)
        }
        KeyCode::Char('c') | KeyCode::Enter if ctx.focus == Focus::History => {
            Some(Action::CopyHistory)
        }
        KeyCode::Char('c') | KeyCode::Enter if ctx.has_result => Some(Action::CopySelected),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(focus: Focus) -> KeyContext {
        KeyContext {
            focus,
            input_blank: false,
            loading: false,
            has_result: true,
        }
    }

    #[test]
    fn test_enter_submits_only_with_input_and_idle() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            resolve(KeyCode::Enter, none, ctx(Focus::Input)),
            Some(Action::Submit)
        );

        let blank = KeyContext {
            input_blank: true,
            ..ctx(Focus::Input)
        };
        assert_eq!(resolve(KeyCode::Enter, none, blank), None);

        let loading = KeyContext {
            loading: true,
            ..ctx(Focus::Input)
        };
        assert_eq!(resolve(KeyCode::Enter, none, loading), None);
    }

    #[test]
    fn test_ctrl_c_copies_only_outside_input() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(
            resolve(KeyCode::Char('c'), ctrl, ctx(Focus::Result)),
            Some(Action::CopySelected)
        );
        assert_eq!(
            resolve(KeyCode::Char('c'), KeyModifiers::SUPER, ctx(Focus::History)),
            Some(Action::CopySelected)
        );
        assert_eq!(resolve(KeyCode::Char('c'), ctrl, ctx(Focus::Input)), None);

        let no_result = KeyContext {
            has_result: false,
            ..ctx(Focus::Result)
        };
        assert_eq!(resolve(KeyCode::Char('c'), ctrl, no_result), None);
    }

    #[test]
    fn test_escape_clears_form_in_input() {
        assert_eq!(
            resolve(KeyCode::Esc, KeyModifiers::NONE, ctx(Focus::Input)),
            Some(Action::ClearForm)
        );
        assert_eq!(
            resolve(KeyCode::Esc, KeyModifiers::NONE, ctx(Focus::Result)),
            None
        );
    }

    #[test]
    fn test_slash_focuses_input_from_elsewhere() {
        assert_eq!(
            resolve(KeyCode::Char('/'), KeyModifiers::NONE, ctx(Focus::History)),
            Some(Action::FocusInput)
        );
        assert_eq!(
            resolve(KeyCode::Char('/'), KeyModifiers::NONE, ctx(Focus::Input)),
            Some(Action::Insert('/'))
        );
    }

    #[test]
    fn test_typing_goes_to_input() {
        assert_eq!(
            resolve(KeyCode::Char('q'), KeyModifiers::NONE, ctx(Focus::Input)),
            Some(Action::Insert('q'))
        );
        assert_eq!(
            resolve(KeyCode::Char('q'), KeyModifiers::NONE, ctx(Focus::Result)),
            Some(Action::Quit)
        );
        assert_eq!(
            resolve(KeyCode::Char('q'), KeyModifiers::CONTROL, ctx(Focus::Input)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_history_navigation() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            resolve(KeyCode::Down, none, ctx(Focus::History)),
            Some(Action::HistoryDown)
        );
        assert_eq!(resolve(KeyCode::Down, none, ctx(Focus::Result)), None);
        assert_eq!(
            resolve(KeyCode::Enter, none, ctx(Focus::History)),
            Some(Action::CopyHistory)
        );
    }
}
