use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Start / flap / restart, depending on game phase.
    Flap,
    OpenFeedSelector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorCommand {
    Input(char),
    Backspace,
    Up,
    Down,
    Select,
    Close,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Char(' ') => Some(UiCommand::Flap),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'f' | 't' => Some(UiCommand::OpenFeedSelector),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_selector_command(key_code: &KeyCode) -> Option<SelectorCommand> {
    match key_code {
        KeyCode::Esc => Some(SelectorCommand::Close),
        KeyCode::Enter => Some(SelectorCommand::Select),
        KeyCode::Up => Some(SelectorCommand::Up),
        KeyCode::Down => Some(SelectorCommand::Down),
        KeyCode::Backspace => Some(SelectorCommand::Backspace),
        KeyCode::Char(c) => Some(SelectorCommand::Input(*c)),
        _ => None,
    }
}
