use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::audio::Accent;
use crate::speller::Keystroke;

/// What a key press asks the practice screen to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Type(Keystroke),
    Prev,
    Next,
    /// Pronounce the word; `None` uses the configured accent.
    Speak(Option<Accent>),
    ToggleReveal,
    NextMode,
    PrevMode,
    Quit,
}

/// Maps a terminal key press to a command. Key releases and repeats are dropped.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let modifier = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Left => Some(Command::Prev),
        KeyCode::Right => Some(Command::Next),
        KeyCode::Up => Some(Command::PrevMode),
        KeyCode::Down => Some(Command::NextMode),
        KeyCode::Tab => Some(Command::ToggleReveal),
        KeyCode::Enter => Some(Command::Speak(None)),
        KeyCode::Char('1') if !modifier => Some(Command::Speak(Some(Accent::Us))),
        KeyCode::Char('2') if !modifier => Some(Command::Speak(Some(Accent::Uk))),
        KeyCode::Char(ch) => Some(Command::Type(Keystroke { ch, modifier })),
        _ => None,
    }
}
