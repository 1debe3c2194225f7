//! Quality scores and session counters handed to the review scheduler.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use chrono::{DateTime, Local};
use log::{info, warn};
use serde::Serialize;

/// Outcome of one attempt at a word, on the scheduler's 1-5 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum Quality {
    Failed = 1,
    Succeeded = 5,
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q as u8
    }
}

/// Receives review signals. The scheduling formula lives on the other side.
pub trait ReviewScheduler {
    fn record_quality(&mut self, word_id: &str, quality: Quality);
    /// Set when an attempt fails, cleared when the word is spelled correctly.
    fn mark_mistake(&mut self, word_id: &str, mistaken: bool);
}

/// Writes every signal to the log and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogScheduler;

impl ReviewScheduler for LogScheduler {
    fn record_quality(&mut self, word_id: &str, quality: Quality) {
        info!("review {word_id}: quality {}", quality as u8);
    }

    fn mark_mistake(&mut self, word_id: &str, mistaken: bool) {
        info!("review {word_id}: mistake flag {mistaken}");
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReviewEvent {
    Quality { word_id: String, quality: Quality },
    Mistake { word_id: String, mistaken: bool },
}

/// Keeps review events in memory; clones share the list.
#[derive(Clone, Debug, Default)]
pub struct MemoryScheduler {
    events: Rc<RefCell<Vec<ReviewEvent>>>,
}

impl MemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReviewEvent> {
        self.events.borrow().clone()
    }

    pub fn qualities(&self) -> Vec<Quality> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ReviewEvent::Quality { quality, .. } => Some(*quality),
                ReviewEvent::Mistake { .. } => None,
            })
            .collect()
    }
}

impl ReviewScheduler for MemoryScheduler {
    fn record_quality(&mut self, word_id: &str, quality: Quality) {
        self.events.borrow_mut().push(ReviewEvent::Quality {
            word_id: word_id.to_string(),
            quality,
        });
    }

    fn mark_mistake(&mut self, word_id: &str, mistaken: bool) {
        self.events.borrow_mut().push(ReviewEvent::Mistake {
            word_id: word_id.to_string(),
            mistaken,
        });
    }
}

#[derive(Serialize)]
struct TimestampedEvent<'a> {
    at: DateTime<Local>,
    #[serde(flatten)]
    event: &'a ReviewEvent,
}

/// One JSON object per line, for a scheduler running in another process.
pub struct JsonLinesScheduler<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesScheduler<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, event: &ReviewEvent) -> std::io::Result<()> {
        let line = TimestampedEvent {
            at: Local::now(),
            event,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    fn emit(&mut self, event: ReviewEvent) {
        if let Err(e) = self.write_line(&event) {
            warn!("failed to write review event: {e}");
        }
    }
}

impl<W: Write> ReviewScheduler for JsonLinesScheduler<W> {
    fn record_quality(&mut self, word_id: &str, quality: Quality) {
        self.emit(ReviewEvent::Quality {
            word_id: word_id.to_string(),
            quality,
        });
    }

    fn mark_mistake(&mut self, word_id: &str, mistaken: bool) {
        self.emit(ReviewEvent::Mistake {
            word_id: word_id.to_string(),
            mistaken,
        });
    }
}

/// On-screen session counters. Never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Fresh starts on a word (navigation or auto-advance), not error recoveries.
    pub input_count: u32,
    /// Words spelled through to the end.
    pub correct_count: u32,
}

impl Stats {
    pub fn accuracy(&self) -> f64 {
        if self.input_count == 0 {
            return 0.0;
        }
        ((self.correct_count as f64 / self.input_count as f64) * 100.0).round()
    }
}

/// Turns speller outcomes into scheduler signals and counter updates.
pub struct ProgressEmitter {
    scheduler: Box<dyn ReviewScheduler>,
    stats: Stats,
}

impl ProgressEmitter {
    pub fn new(scheduler: Box<dyn ReviewScheduler>) -> Self {
        Self {
            scheduler,
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn word_started(&mut self, word_id: &str) {
        self.stats.input_count += 1;
        self.scheduler.mark_mistake(word_id, false);
    }

    pub fn word_succeeded(&mut self, word_id: &str) {
        self.stats.correct_count += 1;
        self.scheduler.mark_mistake(word_id, false);
        self.scheduler.record_quality(word_id, Quality::Succeeded);
    }

    pub fn word_failed(&mut self, word_id: &str) {
        self.scheduler.mark_mistake(word_id, true);
        self.scheduler.record_quality(word_id, Quality::Failed);
    }
}
