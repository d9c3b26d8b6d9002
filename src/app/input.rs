use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    NextStop,
    PrevStop,
    /// Enter: click a label or toggle the focused field.
    Activate,
    /// Esc: close the focused field.
    Dismiss,
    /// Left/Right: cycle select options.
    Cycle(i32),
    Type(char),
    Backspace,
    None,
}

pub fn classify(key: &KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyCommand::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => KeyCommand::Quit,
            _ => KeyCommand::None,
        };
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => KeyCommand::NextStop,
        KeyCode::BackTab | KeyCode::Up => KeyCommand::PrevStop,
        KeyCode::Enter => KeyCommand::Activate,
        KeyCode::Esc => KeyCommand::Dismiss,
        KeyCode::Left => KeyCommand::Cycle(-1),
        KeyCode::Right => KeyCommand::Cycle(1),
        KeyCode::Backspace => KeyCommand::Backspace,
        KeyCode::Char(ch) => KeyCommand::Type(ch),
        _ => KeyCommand::None,
    }
}
