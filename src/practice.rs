use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::audio::{Accent, AudioCoordinator, SoundEffect};
use crate::navigation::{Navigator, SessionError};
use crate::progress::{ProgressEmitter, Stats};
use crate::speller::{Keystroke, Speller, Transition};
use crate::timers::{Clock, Deferred, TaskSlot};
use crate::visibility::{visibility_mask, DisplayMode};
use crate::word::Word;

/// Shake frames, in columns of horizontal offset.
const SHAKE_FRAMES: [u16; 4] = [1, 2, 1, 0];
const SHAKE_FRAME_MS: u128 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// From spelling the word to moving to the next one.
    pub advance_delay: Duration,
    /// From a wrong letter to the retry.
    pub recovery_delay: Duration,
    pub shake_duration: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            advance_delay: Duration::from_millis(300),
            recovery_delay: Duration::from_millis(1000),
            shake_duration: Duration::from_millis(400),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PracticeOptions {
    pub display_mode: DisplayMode,
    /// Seed for [`DisplayMode::HideRandom`].
    pub seed: u64,
    pub timings: Timings,
}

/// One practice run over a list of words.
///
/// Owns the speller for the word on screen, the navigator, the audio
/// coordinator and the progress emitter, and runs the delayed
/// transitions (advance after success, retry after a mistake). Any
/// change of word cancels whatever was still pending for the previous one.
pub struct PracticeSession {
    navigator: Navigator,
    speller: Speller,
    audio: AudioCoordinator,
    progress: ProgressEmitter,
    clock: Box<dyn Clock>,
    pending: TaskSlot,
    display_mode: DisplayMode,
    seed: u64,
    mask: BTreeSet<usize>,
    timings: Timings,
    shake_started: Option<Instant>,
}

impl PracticeSession {
    pub fn new(
        words: Vec<Word>,
        options: PracticeOptions,
        audio: AudioCoordinator,
        progress: ProgressEmitter,
        clock: Box<dyn Clock>,
    ) -> Result<Self, SessionError> {
        let navigator = Navigator::new(words)?;
        let speller = Speller::new(&navigator.current().text);

        let mut session = Self {
            navigator,
            speller,
            audio,
            progress,
            clock,
            pending: TaskSlot::new(),
            display_mode: options.display_mode,
            seed: options.seed,
            mask: BTreeSet::new(),
            timings: options.timings,
            shake_started: None,
        };
        session.start_word();
        Ok(session)
    }

    pub fn current_word(&self) -> &Word {
        self.navigator.current()
    }

    pub fn current_index(&self) -> usize {
        self.navigator.current_index()
    }

    pub fn word_count(&self) -> usize {
        self.navigator.word_count()
    }

    pub fn can_prev(&self) -> bool {
        self.navigator.can_prev()
    }

    pub fn can_next(&self) -> bool {
        self.navigator.can_next()
    }

    pub fn speller(&self) -> &Speller {
        &self.speller
    }

    pub fn mask(&self) -> &BTreeSet<usize> {
        &self.mask
    }

    pub fn stats(&self) -> Stats {
        self.progress.stats()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn accent(&self) -> Accent {
        self.audio.accent()
    }

    pub fn pending(&self) -> Option<Deferred> {
        self.pending.pending()
    }

    /// The last word has been spelled.
    pub fn is_finished(&self) -> bool {
        !self.navigator.can_next() && self.speller.is_complete()
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_started
            .is_some_and(|started| self.clock.now() < started + self.timings.shake_duration)
    }

    /// Horizontal offset of the word while the failure shake is running.
    pub fn shake_offset(&self) -> u16 {
        match self.shake_started {
            Some(started) if self.is_shaking() => {
                let frame = self.clock.now().duration_since(started).as_millis() / SHAKE_FRAME_MS;
                SHAKE_FRAMES[frame as usize % SHAKE_FRAMES.len()]
            }
            _ => 0,
        }
    }

    pub fn handle_keystroke(&mut self, key: Keystroke) -> Transition {
        let transition = self.speller.handle_keystroke(key);
        let now = self.clock.now();
        let word = self.navigator.current();

        match transition {
            Transition::Completed => {
                debug!("spelled {:?}", word.text);
                self.audio.play_effect(SoundEffect::Success);
                self.progress.word_succeeded(&word.id);
                self.pending
                    .schedule(Deferred::Advance, now, self.timings.advance_delay);
            }
            Transition::Failed { expected, got } => {
                debug!("{:?}: expected {expected:?}, got {got:?}", word.text);
                self.audio.play_effect(SoundEffect::Failure);
                self.progress.word_failed(&word.id);
                self.shake_started = Some(now);
                self.pending
                    .schedule(Deferred::Recover, now, self.timings.recovery_delay);
            }
            Transition::Advanced { .. } | Transition::Ignored => {}
        }

        transition
    }

    /// Runs the pending transition once its delay has passed.
    pub fn on_tick(&mut self) {
        let now = self.clock.now();
        if !self.is_shaking() {
            self.shake_started = None;
        }

        match self.pending.take_due(now) {
            Some(Deferred::Advance) => {
                self.next();
            }
            Some(Deferred::Recover) => {
                self.speller.recover();
                let text = &self.navigator.current().text;
                self.audio.pronounce(text);
            }
            None => {}
        }
    }

    /// Moves to the previous word. Returns false at the first word.
    pub fn prev(&mut self) -> bool {
        if !self.navigator.prev() {
            return false;
        }
        self.start_word();
        true
    }

    /// Moves to the next word. Returns false at the last word.
    pub fn next(&mut self) -> bool {
        if !self.navigator.next() {
            return false;
        }
        self.start_word();
        true
    }

    /// Pronounces the current word, in `accent` if given.
    pub fn speak(&mut self, accent: Option<Accent>) -> bool {
        let accent = accent.unwrap_or(self.audio.accent());
        let text = &self.navigator.current().text;
        self.audio.pronounce_with(text, accent)
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
        self.mask = visibility_mask(&self.navigator.current().text, mode, self.seed);
    }

    /// Cancels pending work and silences speech. Also runs on drop.
    pub fn teardown(&mut self) {
        if let Some(task) = self.pending.cancel() {
            debug!("cancelled pending {task:?} on teardown");
        }
        self.audio.stop_speech();
    }

    fn start_word(&mut self) {
        if let Some(task) = self.pending.cancel() {
            debug!("cancelled stale {task:?}");
        }
        self.shake_started = None;

        let word = self.navigator.current();
        self.speller = Speller::new(&word.text);
        self.mask = visibility_mask(&word.text, self.display_mode, self.seed);
        self.progress.word_started(&word.id);

        self.audio.stop_speech();
        self.audio.pronounce(&word.text);

        if self.speller.is_complete() {
            warn!("word {} has nothing to type, skipping", word.id);
            self.pending.schedule(
                Deferred::Advance,
                self.clock.now(),
                self.timings.advance_delay,
            );
        }
    }
}

impl Drop for PracticeSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
