use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum PracticeEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Where key presses come from. The practice loop only sees this trait,
/// so the capture mechanism can be swapped without touching it.
pub trait KeyEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<PracticeEvent, RecvTimeoutError>;
}

/// Reads the terminal through crossterm on a background thread
pub struct TerminalEventSource {
    rx: Receiver<PracticeEvent>,
}

impl TerminalEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(PracticeEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(PracticeEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("terminal event stream closed: {e}");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for TerminalEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyEventSource for TerminalEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PracticeEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Events pushed in by the host through a channel: scripted input,
/// tests, or a front end that captures keys some other way.
pub struct ChannelEventSource {
    rx: Receiver<PracticeEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<PracticeEvent>) -> Self {
        Self { rx }
    }

    /// A source plus the sender that feeds it.
    pub fn pair() -> (Sender<PracticeEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }
}

impl KeyEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PracticeEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: KeyEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: KeyEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> PracticeEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                PracticeEvent::Tick
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, es) = ChannelEventSource::pair();
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        match runner.step() {
            PracticeEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, es) = ChannelEventSource::pair();
        tx.send(PracticeEvent::Key(KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
        )))
        .unwrap();
        let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(10)));

        match runner.step() {
            PracticeEvent::Key(key) => assert_eq!(key.code, KeyCode::Char('a')),
            _ => panic!("expected Key event"),
        }
    }

    #[test]
    fn step_ticks_after_sender_dropped() {
        let (tx, es) = ChannelEventSource::pair();
        drop(tx);
        let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(1)));
        assert!(matches!(runner.step(), PracticeEvent::Tick));
    }
}
