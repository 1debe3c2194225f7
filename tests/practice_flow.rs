use std::collections::BTreeSet;
use std::time::Duration;

use assert_matches::assert_matches;

use spelldrill::audio::AudioCoordinator;
use spelldrill::practice::{PracticeOptions, PracticeSession};
use spelldrill::progress::{MemoryScheduler, ProgressEmitter};
use spelldrill::speller::{Keystroke, Transition};
use spelldrill::timers::ManualClock;
use spelldrill::visibility::{visibility_mask, DisplayMode};
use spelldrill::word::{inputtable_indices, is_vowel, Word};
use spelldrill::word_source::{builtin_names, load_builtin};

fn session(texts: &[&str], clock: &ManualClock) -> PracticeSession {
    let words = texts
        .iter()
        .enumerate()
        .map(|(i, t)| Word::new(i.to_string(), *t))
        .collect();
    PracticeSession::new(
        words,
        PracticeOptions::default(),
        AudioCoordinator::silent(),
        ProgressEmitter::new(Box::new(MemoryScheduler::new())),
        Box::new(clock.clone()),
    )
    .unwrap()
}

fn trace(session: &mut PracticeSession, keys: &str) -> Vec<(Transition, usize)> {
    keys.chars()
        .map(|c| {
            let t = session.handle_keystroke(Keystroke::plain(c));
            (t, session.speller().position())
        })
        .collect()
}

#[test]
fn cat_completes_once_without_errors() {
    let clock = ManualClock::new();
    let mut s = session(&["cat"], &clock);
    let steps = trace(&mut s, "cAt");

    let positions: Vec<usize> = steps.iter().map(|(_, p)| *p).collect();
    assert_eq!(positions, vec![1, 2, 3]);
    let completes = steps
        .iter()
        .filter(|(t, _)| *t == Transition::Completed)
        .count();
    assert_eq!(completes, 1);
    assert!(steps
        .iter()
        .all(|(t, _)| !matches!(t, Transition::Failed { .. })));
    assert_eq!(s.stats().correct_count, 1);
}

#[test]
fn top_gun_space_needs_no_keystroke() {
    let clock = ManualClock::new();
    let mut s = session(&["top gun"], &clock);
    let steps = trace(&mut s, "topgun");

    assert_eq!(s.speller().entered().get(&3), Some(&' '));
    assert_eq!(steps.last().map(|(t, _)| *t), Some(Transition::Completed));
    assert!(steps[..5]
        .iter()
        .all(|(t, _)| matches!(t, Transition::Advanced { .. })));
}

#[test]
fn wrong_first_letter_recovers_after_delay() {
    let clock = ManualClock::new();
    let mut s = session(&["cat"], &clock);

    assert_matches!(
        s.handle_keystroke(Keystroke::plain('x')),
        Transition::Failed { expected: 'c', got: 'x' }
    );
    assert!(s.speller().is_error());

    clock.advance(Duration::from_millis(1000));
    s.on_tick();

    assert_eq!(s.speller().position(), 0);
    assert!(!s.speller().is_error());
    assert!(s.speller().entered().is_empty());
}

#[test]
fn boundaries_never_move_or_reset() {
    let clock = ManualClock::new();
    let mut s = session(&["cat", "dog", "owl"], &clock);
    trace(&mut s, "c");

    assert!(!s.prev());
    assert_eq!(s.current_index(), 0);
    assert_eq!(s.speller().position(), 1);

    s.next();
    s.next();
    trace(&mut s, "o");
    let attempts = s.stats().input_count;

    assert!(!s.next());
    assert_eq!(s.current_index(), 2);
    assert_eq!(s.speller().position(), 1);
    assert_eq!(s.stats().input_count, attempts);
}

#[test]
fn fresh_start_replays_identically() {
    let clock = ManualClock::new();
    let mut s = session(&["ice cream", "queue"], &clock);
    let keys = "icqe";

    let first = trace(&mut s, keys);
    clock.advance(Duration::from_millis(1000));
    s.on_tick();

    s.next();
    trace(&mut s, "queue");
    s.prev();

    let second = trace(&mut s, keys);
    assert_eq!(first, second);
}

#[test]
fn builtin_books_satisfy_mask_properties() {
    for name in builtin_names() {
        let book = load_builtin(&name).unwrap();
        for word in &book.words {
            let chars: Vec<char> = word.text.chars().collect();
            let inputtable: BTreeSet<usize> = inputtable_indices(&chars).into_iter().collect();
            let vowels: BTreeSet<usize> = inputtable
                .iter()
                .copied()
                .filter(|&i| is_vowel(chars[i]))
                .collect();
            let consonants: BTreeSet<usize> = inputtable
                .iter()
                .copied()
                .filter(|&i| chars[i].is_alphabetic() && !is_vowel(chars[i]))
                .collect();

            assert_eq!(
                visibility_mask(&word.text, DisplayMode::HideVowels, 0),
                vowels
            );
            assert_eq!(
                visibility_mask(&word.text, DisplayMode::HideConsonants, 0),
                consonants
            );
            assert_eq!(
                visibility_mask(&word.text, DisplayMode::HideAll, 0),
                inputtable
            );

            let random = visibility_mask(&word.text, DisplayMode::HideRandom, 11);
            assert!(random.is_subset(&inputtable));
            assert!(random.len() > inputtable.len() / 2);
        }
    }
}

#[test]
fn builtin_words_can_be_spelled() {
    let clock = ManualClock::new();
    for name in builtin_names() {
        let book = load_builtin(&name).unwrap();
        let texts: Vec<&str> = book.words.iter().map(|w| w.text.as_str()).collect();
        let mut s = session(&texts, &clock);

        for word in &book.words {
            let keys: String = word.text.chars().filter(|c| *c != ' ').collect();
            let steps = trace(&mut s, &keys);
            assert_eq!(
                steps.last().map(|(t, _)| *t),
                Some(Transition::Completed),
                "could not spell {:?}",
                word.text
            );
            clock.advance(Duration::from_millis(300));
            s.on_tick();
        }
        assert!(s.is_finished());
    }
}
