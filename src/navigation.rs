use thiserror::Error;

use crate::word::Word;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a practice session needs at least one word")]
    Empty,
}

/// Ordered words and the index of the one being practised.
#[derive(Clone, Debug)]
pub struct Navigator {
    words: Vec<Word>,
    current: usize,
}

impl Navigator {
    pub fn new(words: Vec<Word>) -> Result<Self, SessionError> {
        if words.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self { words, current: 0 })
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Word {
        &self.words[self.current]
    }

    pub fn can_prev(&self) -> bool {
        self.current > 0
    }

    pub fn can_next(&self) -> bool {
        self.current + 1 < self.words.len()
    }

    /// Steps back one word. Returns false at the first word.
    pub fn prev(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Steps forward one word. Returns false at the last word.
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.current += 1;
        true
    }
}
