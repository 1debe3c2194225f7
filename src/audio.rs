//! Pronunciation and sound-effect playback.
//!
//! Speech goes through a [`SpeechEngine`] guarded so that only one
//! pronunciation is audible at a time. Sound effects use a separate
//! [`SoundEffectPlayer`] and are never held back by that guard.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::rc::Rc;

use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Words per minute `espeak` uses at rate 1.0.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Accent {
    #[default]
    Us,
    Uk,
}

impl Accent {
    pub fn voice(self) -> &'static str {
        match self {
            Accent::Us => "en-us",
            Accent::Uk => "en-gb",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub accent: Accent,
    /// Multiplier on the engine's normal speaking rate.
    pub rate: f32,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("speech engine is not available")]
    Unavailable,
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("playback failed: {0}")]
    Playback(String),
}

pub trait SpeechEngine {
    fn is_supported(&self) -> bool;
    fn is_playing(&mut self) -> bool;
    /// Starts speaking and returns without waiting for the utterance to end.
    fn speak(&mut self, request: &SpeechRequest) -> Result<(), AudioError>;
    fn stop(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundEffect {
    Success,
    Failure,
}

impl SoundEffect {
    /// (frequency in Hz, duration in ms) for each tone of the chime.
    pub fn tones(self) -> &'static [(f32, u64)] {
        match self {
            SoundEffect::Success => &[(880.0, 90), (1320.0, 140)],
            SoundEffect::Failure => &[(220.0, 220)],
        }
    }
}

pub trait SoundEffectPlayer {
    fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError>;
}

/// Speaks through an external `espeak-ng`/`espeak` process.
#[derive(Debug)]
pub struct CommandSpeechEngine {
    program: Option<PathBuf>,
    child: Option<Child>,
}

impl CommandSpeechEngine {
    pub const CANDIDATES: [&'static str; 2] = ["espeak-ng", "espeak"];

    /// Looks for a known speech program on `PATH`.
    pub fn detect() -> Self {
        let program = Self::CANDIDATES.iter().find_map(|name| find_in_path(name));
        match &program {
            Some(path) => debug!("using speech program {}", path.display()),
            None => debug!("no speech program found on PATH"),
        }
        Self {
            program,
            child: None,
        }
    }

    pub fn with_program<P: AsRef<Path>>(program: P) -> Self {
        Self {
            program: Some(program.as_ref().to_path_buf()),
            child: None,
        }
    }
}

impl SpeechEngine for CommandSpeechEngine {
    fn is_supported(&self) -> bool {
        self.program.is_some()
    }

    fn is_playing(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(_)) => {
                self.child = None;
                false
            }
            Err(e) => {
                warn!("lost track of speech process: {e}");
                self.child = None;
                false
            }
        }
    }

    fn speak(&mut self, request: &SpeechRequest) -> Result<(), AudioError> {
        let program = self.program.as_ref().ok_or(AudioError::Unavailable)?;
        let words_per_minute = (BASE_WORDS_PER_MINUTE * request.rate).round().max(80.0) as u32;

        let child = Command::new(program)
            .arg("-v")
            .arg(request.accent.voice())
            .arg("-s")
            .arg(words_per_minute.to_string())
            .arg(&request.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AudioError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for CommandSpeechEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Engine for hosts without speech output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSpeech;

impl SpeechEngine for NullSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    fn is_playing(&mut self) -> bool {
        false
    }

    fn speak(&mut self, _request: &SpeechRequest) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn stop(&mut self) {}
}

/// Keeps every request instead of speaking it. Clones share the record,
/// so a handle can be kept after the engine is moved into a session.
/// Utterances finish instantly unless `set_playing` says otherwise.
#[derive(Clone, Debug)]
pub struct RecordingSpeech {
    supported: bool,
    playing: Rc<Cell<bool>>,
    spoken: Rc<RefCell<Vec<SpeechRequest>>>,
    stops: Rc<Cell<usize>>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self {
            supported: true,
            playing: Rc::new(Cell::new(false)),
            spoken: Rc::new(RefCell::new(vec![])),
            stops: Rc::new(Cell::new(0)),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.set(playing);
    }

    pub fn spoken(&self) -> Vec<SpeechRequest> {
        self.spoken.borrow().clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken.borrow().iter().map(|r| r.text.clone()).collect()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.get()
    }
}

impl Default for RecordingSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for RecordingSpeech {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn is_playing(&mut self) -> bool {
        self.playing.get()
    }

    fn speak(&mut self, request: &SpeechRequest) -> Result<(), AudioError> {
        if !self.supported {
            return Err(AudioError::Unavailable);
        }
        self.spoken.borrow_mut().push(request.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
        self.playing.set(false);
    }
}

/// Rings the terminal bell for every effect.
#[derive(Clone, Copy, Debug, Default)]
pub struct BellEffects;

impl SoundEffectPlayer for BellEffects {
    fn play(&mut self, _effect: SoundEffect) -> Result<(), AudioError> {
        let mut out = io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| AudioError::Playback(e.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SilentEffects;

impl SoundEffectPlayer for SilentEffects {
    fn play(&mut self, _effect: SoundEffect) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Records played effects; clones share the record.
#[derive(Clone, Debug, Default)]
pub struct RecordingEffects {
    played: Rc<RefCell<Vec<SoundEffect>>>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<SoundEffect> {
        self.played.borrow().clone()
    }
}

impl SoundEffectPlayer for RecordingEffects {
    fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
        self.played.borrow_mut().push(effect);
        Ok(())
    }
}

/// Sine-tone chimes on the default output device.
#[cfg(feature = "chimes")]
pub struct ChimeEffects {
    // Playback stops when the stream is dropped.
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
    volume: f32,
}

#[cfg(feature = "chimes")]
impl ChimeEffects {
    pub fn new(volume: f32) -> Result<Self, AudioError> {
        let (stream, handle) =
            rodio::OutputStream::try_default().map_err(|e| AudioError::Playback(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
            volume,
        })
    }
}

#[cfg(feature = "chimes")]
impl SoundEffectPlayer for ChimeEffects {
    fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
        use rodio::source::{SineWave, Source};
        use std::time::Duration;

        let sink =
            rodio::Sink::try_new(&self.handle).map_err(|e| AudioError::Playback(e.to_string()))?;
        for &(frequency, millis) in effect.tones() {
            sink.append(
                SineWave::new(frequency)
                    .take_duration(Duration::from_millis(millis))
                    .amplify(self.volume),
            );
        }
        sink.detach();
        Ok(())
    }
}

/// One per practice session; owns the speech engine and effect player.
pub struct AudioCoordinator {
    speech: Box<dyn SpeechEngine>,
    effects: Box<dyn SoundEffectPlayer>,
    accent: Accent,
    rate: f32,
}

impl AudioCoordinator {
    pub fn new(
        speech: Box<dyn SpeechEngine>,
        effects: Box<dyn SoundEffectPlayer>,
        accent: Accent,
        rate: f32,
    ) -> Self {
        Self {
            speech,
            effects,
            accent,
            rate,
        }
    }

    /// No speech and no effects.
    pub fn silent() -> Self {
        Self::new(
            Box::new(NullSpeech),
            Box::new(SilentEffects),
            Accent::default(),
            1.0,
        )
    }

    pub fn accent(&self) -> Accent {
        self.accent
    }

    pub fn speech_available(&self) -> bool {
        self.speech.is_supported()
    }

    /// Speaks `text` in the configured accent. Returns whether playback started.
    pub fn pronounce(&mut self, text: &str) -> bool {
        self.pronounce_with(text, self.accent)
    }

    /// Speaks `text` in `accent` for this request only. Requests made while
    /// speech is unsupported or already playing are dropped.
    pub fn pronounce_with(&mut self, text: &str, accent: Accent) -> bool {
        if !self.speech.is_supported() {
            debug!("speech unsupported, dropping pronunciation of {text:?}");
            return false;
        }
        if self.speech.is_playing() {
            debug!("pronunciation in progress, dropping {text:?}");
            return false;
        }

        let request = SpeechRequest {
            text: text.to_string(),
            accent,
            rate: self.rate,
        };
        match self.speech.speak(&request) {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to pronounce {text:?}: {e}");
                false
            }
        }
    }

    pub fn stop_speech(&mut self) {
        self.speech.stop();
    }

    pub fn play_effect(&mut self, effect: SoundEffect) {
        if let Err(e) = self.effects.play(effect) {
            warn!("failed to play {effect:?} sound: {e}");
        }
    }
}

impl Drop for AudioCoordinator {
    fn drop(&mut self) {
        self.speech.stop();
    }
}
