use serde::{Deserialize, Serialize};

/// A vocabulary entry as supplied by the word source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Word {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            pronunciation: None,
            definitions: vec![],
            examples: vec![],
        }
    }

    pub fn inputtable_count(&self) -> usize {
        self.text.chars().filter(|c| is_inputtable(*c)).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    /// Needs an explicit keystroke: letters and apostrophes.
    Inputtable,
    /// Auto-filled once the keystrokes around it are done.
    Skippable,
    Other,
}

pub fn classify(c: char) -> CharClass {
    if is_inputtable(c) {
        CharClass::Inputtable
    } else if c == ' ' {
        CharClass::Skippable
    } else {
        CharClass::Other
    }
}

pub fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

pub fn is_inputtable(c: char) -> bool {
    c.is_alphabetic() || is_apostrophe(c)
}

pub fn is_skippable(c: char) -> bool {
    classify(c) == CharClass::Skippable
}

pub fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Case-insensitive comparison; both apostrophe forms compare equal.
pub fn chars_match(typed: char, target: char) -> bool {
    if is_apostrophe(typed) && is_apostrophe(target) {
        return true;
    }
    typed.to_lowercase().eq(target.to_lowercase())
}

/// Index of the first inputtable char at or after `from`, or `chars.len()` if none.
pub fn first_inputtable_at_or_after(chars: &[char], from: usize) -> usize {
    chars
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, c)| is_inputtable(**c))
        .map(|(i, _)| i)
        .unwrap_or(chars.len())
}

pub fn inputtable_indices(chars: &[char]) -> Vec<usize> {
    chars
        .iter()
        .enumerate()
        .filter(|(_, c)| is_inputtable(**c))
        .map(|(i, _)| i)
        .collect()
}
