//! Terminal event abstraction.
//!
//! Crossterm's `poll`/`read` block, so they run on a blocking thread and
//! forward key presses, resizes and idle ticks over a channel.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Nothing happened for `tick_rate`; used to animate the cursor blink.
    Tick,
    /// The terminal stopped delivering input.  Always the last event sent.
    InputFailed(String),
}

/// Where terminal events come from.
pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<CtEvent>;
}

/// The real terminal.
pub struct CrosstermSource;

impl EventSource for CrosstermSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<CtEvent> {
        event::read()
    }
}

/// Spawns a blocking reader and returns the receiving end of its channel.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::task::spawn_blocking(move || read_events(CrosstermSource, tick_rate, &tx));
    rx
}

/// Forward events until the receiver is dropped.  A terminal error ends the
/// loop with [`AppEvent::InputFailed`] so the owner can shut down.
pub fn read_events<S: EventSource>(
    mut source: S,
    tick_rate: Duration,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    loop {
        let app_event = match source.poll(tick_rate) {
            Ok(true) => match source.read() {
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => AppEvent::Key(k),
                Ok(CtEvent::Resize(w, h)) => AppEvent::Resize(w, h),
                Ok(_) => continue,
                Err(err) => {
                    tracing::error!(%err, "terminal read failed");
                    let _ = tx.send(AppEvent::InputFailed(err.to_string()));
                    return;
                }
            },
            Ok(false) => AppEvent::Tick,
            Err(err) => {
                tracing::error!(%err, "terminal poll failed");
                let _ = tx.send(AppEvent::InputFailed(err.to_string()));
                return;
            }
        };
        if tx.send(app_event).is_err() {
            return; // receiver dropped
        }
    }
}
