use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of "now" for scheduled transitions.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Work deferred until a delay elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// Move on after the word was spelled correctly.
    Advance,
    /// Clear a failed attempt and replay the pronunciation.
    Recover,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scheduled {
    task: Deferred,
    due: Instant,
}

/// Holds at most one pending task. Scheduling replaces whatever was
/// pending, and a cancelled task never fires.
#[derive(Debug, Default)]
pub struct TaskSlot {
    pending: Option<Scheduled>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: Deferred, now: Instant, delay: Duration) {
        if let Some(previous) = self.pending.take() {
            log::debug!("replacing pending {:?} with {:?}", previous.task, task);
        }
        self.pending = Some(Scheduled {
            task,
            due: now + delay,
        });
    }

    pub fn cancel(&mut self) -> Option<Deferred> {
        self.pending.take().map(|s| s.task)
    }

    pub fn pending(&self) -> Option<Deferred> {
        self.pending.map(|s| s.task)
    }

    /// Takes the pending task if its delay has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<Deferred> {
        match self.pending {
            Some(s) if now >= s.due => {
                self.pending = None;
                Some(s.task)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = clock.now();

        other.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - start, Duration::from_millis(250));
    }

    #[test]
    fn test_task_fires_only_after_delay() {
        let clock = ManualClock::new();
        let mut slot = TaskSlot::new();
        slot.schedule(Deferred::Advance, clock.now(), Duration::from_millis(300));

        clock.advance(Duration::from_millis(299));
        assert_eq!(slot.take_due(clock.now()), None);

        clock.advance(Duration::from_millis(1));
        assert_eq!(slot.take_due(clock.now()), Some(Deferred::Advance));
        assert_eq!(slot.take_due(clock.now()), None);
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let clock = ManualClock::new();
        let mut slot = TaskSlot::new();
        slot.schedule(Deferred::Recover, clock.now(), Duration::from_millis(10));

        assert_eq!(slot.cancel(), Some(Deferred::Recover));
        clock.advance(Duration::from_secs(5));
        assert_eq!(slot.take_due(clock.now()), None);
    }

    #[test]
    fn test_schedule_replaces_pending() {
        let clock = ManualClock::new();
        let mut slot = TaskSlot::new();
        slot.schedule(Deferred::Recover, clock.now(), Duration::from_millis(10));
        slot.schedule(Deferred::Advance, clock.now(), Duration::from_millis(500));

        clock.advance(Duration::from_millis(100));
        assert_eq!(slot.take_due(clock.now()), None);
        assert_eq!(slot.pending(), Some(Deferred::Advance));
    }
}
