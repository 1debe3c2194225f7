use std::collections::BTreeMap;

use crate::word::{chars_match, first_inputtable_at_or_after, is_inputtable};

/// A single key press as seen by the speller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keystroke {
    pub ch: char,
    /// Ctrl, Alt or another modifier was held.
    pub modifier: bool,
}

impl Keystroke {
    pub fn plain(ch: char) -> Self {
        Self {
            ch,
            modifier: false,
        }
    }

    pub fn modified(ch: char) -> Self {
        Self { ch, modifier: true }
    }
}

/// Result of feeding one keystroke to the speller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Preconditions not met; nothing changed.
    Ignored,
    Advanced { from: usize, to: usize },
    Completed,
    Failed { expected: char, got: char },
}

/// Live typing state for the word on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct InputState {
    position: usize,
    /// Display value per index: what was typed, or the literal char for
    /// auto-filled positions (spaces, hyphens and anything else not typed).
    entered: BTreeMap<usize, char>,
    error: bool,
    complete: bool,
}

/// Character-matching automaton for one word.
#[derive(Clone, Debug)]
pub struct Speller {
    chars: Vec<char>,
    state: InputState,
}

impl Speller {
    pub fn new(text: &str) -> Self {
        let mut speller = Self {
            chars: text.chars().collect(),
            state: InputState::default(),
        };
        speller.reset();
        speller
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn entered(&self) -> &BTreeMap<usize, char> {
        &self.state.entered
    }

    pub fn is_error(&self) -> bool {
        self.state.error
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    pub fn expected_char(&self) -> Option<char> {
        self.chars.get(self.state.position).copied()
    }

    /// Fresh start for the word. A word without inputtable characters has
    /// nothing left to type and is complete straight away.
    pub fn reset(&mut self) {
        let first = first_inputtable_at_or_after(&self.chars, 0);
        self.state = InputState {
            position: first,
            entered: BTreeMap::new(),
            error: false,
            complete: first == self.chars.len(),
        };
        self.fill_between(0, first);
    }

    /// Clears a failed attempt so the word can be typed again from the start.
    pub fn recover(&mut self) {
        if self.state.error {
            self.reset();
        }
    }

    pub fn handle_keystroke(&mut self, key: Keystroke) -> Transition {
        if self.state.complete || self.state.error || key.modifier || !is_inputtable(key.ch) {
            return Transition::Ignored;
        }

        let position = self.state.position;
        let Some(target) = self.chars.get(position).copied() else {
            return Transition::Ignored;
        };

        self.state.entered.insert(position, key.ch);

        if !chars_match(key.ch, target) {
            self.state.error = true;
            return Transition::Failed {
                expected: target,
                got: key.ch,
            };
        }

        let next = first_inputtable_at_or_after(&self.chars, position + 1);
        self.fill_between(position + 1, next);
        self.state.position = next;

        if next == self.chars.len() {
            self.state.complete = true;
            Transition::Completed
        } else {
            Transition::Advanced {
                from: position,
                to: next,
            }
        }
    }
}

impl Speller {
    // Everything in `from..to` lies between cursor stops and is never typed.
    fn fill_between(&mut self, from: usize, to: usize) {
        for idx in from..to {
            self.state.entered.insert(idx, self.chars[idx]);
        }
    }
}
