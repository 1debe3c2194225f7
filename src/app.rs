use crate::keymap::{command_for, Command};
use crate::practice::PracticeSession;
use crate::runtime::PracticeEvent;

/// Host state around a practice session.
pub struct App {
    pub session: PracticeSession,
    pub book_name: String,
    /// Show masked letters anyway (the hover/tap reveal).
    pub reveal: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: PracticeSession, book_name: impl Into<String>) -> Self {
        Self {
            session,
            book_name: book_name.into(),
            reveal: false,
            should_quit: false,
        }
    }

    pub fn handle_event(&mut self, event: PracticeEvent) {
        match event {
            PracticeEvent::Tick => self.session.on_tick(),
            PracticeEvent::Resize => {}
            PracticeEvent::Key(key) => {
                if let Some(command) = command_for(&key) {
                    self.apply(command);
                }
            }
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Type(key) => {
                self.session.handle_keystroke(key);
            }
            Command::Prev => {
                self.session.prev();
            }
            Command::Next => {
                self.session.next();
            }
            Command::Speak(accent) => {
                self.session.speak(accent);
            }
            Command::ToggleReveal => self.reveal = !self.reveal,
            Command::NextMode => {
                let mode = self.session.display_mode().next();
                self.session.set_display_mode(mode);
            }
            Command::PrevMode => {
                let mode = self.session.display_mode().previous();
                self.session.set_display_mode(mode);
            }
            Command::Quit => {
                self.session.teardown();
                self.should_quit = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioCoordinator;
    use crate::practice::PracticeOptions;
    use crate::progress::{MemoryScheduler, ProgressEmitter};
    use crate::speller::Keystroke;
    use crate::timers::ManualClock;
    use crate::visibility::DisplayMode;
    use crate::word::Word;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn test_app(texts: &[&str]) -> App {
        let words = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Word::new(i.to_string(), *t))
            .collect();
        let session = PracticeSession::new(
            words,
            PracticeOptions::default(),
            AudioCoordinator::silent(),
            ProgressEmitter::new(Box::new(MemoryScheduler::new())),
            Box::new(ManualClock::new()),
        )
        .unwrap();
        App::new(session, "test")
    }

    #[test]
    fn test_key_events_reach_session() {
        let mut app = test_app(&["cat"]);
        app.handle_event(PracticeEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::NONE,
        )));
        assert_eq!(app.session.speller().position(), 1);
    }

    #[test]
    fn test_toggle_reveal() {
        let mut app = test_app(&["cat"]);
        app.apply(Command::ToggleReveal);
        assert!(app.reveal);
        app.apply(Command::ToggleReveal);
        assert!(!app.reveal);
    }

    #[test]
    fn test_mode_cycling() {
        let mut app = test_app(&["cat"]);
        app.apply(Command::NextMode);
        assert_eq!(app.session.display_mode(), DisplayMode::HideVowels);
        app.apply(Command::PrevMode);
        app.apply(Command::PrevMode);
        assert_eq!(app.session.display_mode(), DisplayMode::HideAll);
    }

    #[test]
    fn test_navigation_commands() {
        let mut app = test_app(&["cat", "dog"]);
        app.apply(Command::Next);
        assert_eq!(app.session.current_index(), 1);
        app.apply(Command::Prev);
        assert_eq!(app.session.current_index(), 0);
    }

    #[test]
    fn test_quit() {
        let mut app = test_app(&["cat"]);
        app.apply(Command::Type(Keystroke::plain('c')));
        app.apply(Command::Quit);
        assert!(app.should_quit);
    }
}
