use std::collections::{BTreeMap, BTreeSet};

use clap::ValueEnum;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::word::{inputtable_indices, is_vowel};

/// Glyph drawn in place of a hidden letter.
pub const PLACEHOLDER: char = '_';

/// How much of the word is shown while spelling it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    Full,
    HideVowels,
    HideConsonants,
    HideRandom,
    HideAll,
}

impl DisplayMode {
    const ALL: [DisplayMode; 5] = [
        DisplayMode::Full,
        DisplayMode::HideVowels,
        DisplayMode::HideConsonants,
        DisplayMode::HideRandom,
        DisplayMode::HideAll,
    ];

    fn ordinal(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.ordinal() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.ordinal() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Indices of `text` that render as [`PLACEHOLDER`] under `mode`.
///
/// Only inputtable positions are ever masked. `HideRandom` hides
/// `floor(n / 2) + 1` of the `n` inputtable positions, picked by an RNG
/// keyed on `seed` and the text, so the same word and seed always
/// produce the same mask.
pub fn visibility_mask(text: &str, mode: DisplayMode, seed: u64) -> BTreeSet<usize> {
    let chars: Vec<char> = text.chars().collect();
    let inputtable = inputtable_indices(&chars);

    match mode {
        DisplayMode::Full => BTreeSet::new(),
        DisplayMode::HideVowels => inputtable
            .into_iter()
            .filter(|&i| is_vowel(chars[i]))
            .collect(),
        DisplayMode::HideConsonants => inputtable
            .into_iter()
            .filter(|&i| chars[i].is_alphabetic() && !is_vowel(chars[i]))
            .collect(),
        DisplayMode::HideAll => inputtable.into_iter().collect(),
        DisplayMode::HideRandom => {
            if inputtable.is_empty() {
                return BTreeSet::new();
            }
            let hidden = inputtable.len() / 2 + 1;
            let mut rng = StdRng::seed_from_u64(seed ^ text_hash(text));
            inputtable
                .choose_multiple(&mut rng, hidden)
                .copied()
                .collect()
        }
    }
}

/// Whether position `idx` is drawn as a placeholder right now.
pub fn is_hidden(
    mask: &BTreeSet<usize>,
    idx: usize,
    entered: &BTreeMap<usize, char>,
    reveal: bool,
) -> bool {
    !reveal && mask.contains(&idx) && !entered.contains_key(&idx)
}

// FNV-1a, stable across builds unlike `DefaultHasher`.
fn text_hash(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [&str; 8] = [
        "cat",
        "top gun",
        "don't",
        "rhythm",
        "ice cream",
        "accommodate",
        "o'clock",
        "a",
    ];

    const MODES: [DisplayMode; 5] = DisplayMode::ALL;

    fn inputtable_set(text: &str) -> BTreeSet<usize> {
        let chars: Vec<char> = text.chars().collect();
        inputtable_indices(&chars).into_iter().collect()
    }

    #[test]
    fn test_full_mode_hides_nothing() {
        for word in WORDS {
            assert!(visibility_mask(word, DisplayMode::Full, 7).is_empty());
        }
    }

    #[test]
    fn test_masks_only_contain_inputtable_positions() {
        for word in WORDS {
            let allowed = inputtable_set(word);
            for mode in MODES {
                for seed in 0..5 {
                    let mask = visibility_mask(word, mode, seed);
                    assert!(
                        mask.is_subset(&allowed),
                        "{mode} on {word:?} masked a non-inputtable index: {mask:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_hide_vowels_exact_set() {
        assert_eq!(
            visibility_mask("ice cream", DisplayMode::HideVowels, 0),
            BTreeSet::from([0, 2, 6, 7])
        );
        assert!(visibility_mask("rhythm", DisplayMode::HideVowels, 0).is_empty());
    }

    #[test]
    fn test_hide_vowels_is_case_insensitive() {
        assert_eq!(
            visibility_mask("OtTo", DisplayMode::HideVowels, 0),
            BTreeSet::from([0, 3])
        );
    }

    #[test]
    fn test_hide_consonants_exact_set() {
        assert_eq!(
            visibility_mask("don't", DisplayMode::HideConsonants, 0),
            BTreeSet::from([0, 2, 4])
        );
        assert_eq!(
            visibility_mask("top gun", DisplayMode::HideConsonants, 0),
            BTreeSet::from([0, 2, 4, 6])
        );
    }

    #[test]
    fn test_hide_all_covers_apostrophes() {
        assert_eq!(
            visibility_mask("o'clock", DisplayMode::HideAll, 0),
            inputtable_set("o'clock")
        );
    }

    #[test]
    fn test_hide_random_hides_more_than_half() {
        for word in WORDS {
            let n = inputtable_set(word).len();
            for seed in 0..20 {
                let mask = visibility_mask(word, DisplayMode::HideRandom, seed);
                assert!(mask.len() > n / 2, "{word:?} seed {seed}: {mask:?}");
                assert!(mask.len() <= n);
            }
        }
    }

    #[test]
    fn test_hide_random_is_deterministic_per_seed() {
        let a = visibility_mask("accommodate", DisplayMode::HideRandom, 42);
        let b = visibility_mask("accommodate", DisplayMode::HideRandom, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hide_random_empty_word() {
        assert!(visibility_mask("   ", DisplayMode::HideRandom, 1).is_empty());
        assert!(visibility_mask("", DisplayMode::HideRandom, 1).is_empty());
    }

    #[test]
    fn test_is_hidden_respects_entered_and_reveal() {
        let mask = BTreeSet::from([1]);
        let mut entered = BTreeMap::new();

        assert!(is_hidden(&mask, 1, &entered, false));
        assert!(!is_hidden(&mask, 0, &entered, false));
        assert!(!is_hidden(&mask, 1, &entered, true));

        entered.insert(1, 'a');
        assert!(!is_hidden(&mask, 1, &entered, false));
    }

    #[test]
    fn test_display_mode_cycle() {
        let mut mode = DisplayMode::Full;
        for _ in 0..MODES.len() {
            mode = mode.next();
        }
        assert_eq!(mode, DisplayMode::Full);
        assert_eq!(DisplayMode::Full.previous(), DisplayMode::HideAll);
        assert_eq!(DisplayMode::HideAll.next(), DisplayMode::Full);
    }

    #[test]
    fn test_display_mode_names() {
        assert_eq!(DisplayMode::HideVowels.to_string(), "hide-vowels");
        assert_eq!(
            serde_json::to_string(&DisplayMode::HideRandom).unwrap(),
            "\"hide-random\""
        );
    }
}
