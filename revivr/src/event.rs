//! Event bus for revivr.
//!
//! Terminal input, timer ticks, and review results are normalised into one
//! `AppEvent` enum and sent over a tokio unbounded MPSC channel. The main loop
//! receives from this channel and dispatches accordingly.
//!
//! Two independent intervals drive the render and logic cycles:
//! - **Render interval** (33 ms ≈ 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (250 ms = 4 Hz) advances the loading spinner.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use revivr_core::{PendingReview, RequestToken, ReviewClient, ReviewError, ReviewReply};
use tokio::sync::mpsc;
use tokio::time::interval;

/// All events the application can receive from any source.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only; release/repeat are filtered).
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Logic tick (4 Hz).
    Tick,
    /// Render tick (≈30 FPS).
    Render,
    /// A spawned review call finished.
    ReviewFinished {
        token: RequestToken,
        outcome: Result<ReviewReply, ReviewError>,
    },
    Quit,
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender is cloned into background tasks; the receiver is owned by the
/// main loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background task that feeds terminal input and timer ticks into `tx`.
///
/// The task ends when the input stream fails or closes, after sending `Quit`.
/// Send errors are ignored: a dropped receiver means the app is shutting down.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(250));
        let mut render = interval(Duration::from_millis(33));
        let mut input = EventStream::new();

        loop {
            let event = tokio::select! {
                _ = tick.tick() => AppEvent::Tick,
                _ = render.tick() => AppEvent::Render,
                next = input.next().fuse() => match next {
                    Some(Ok(raw)) => match translate(raw) {
                        Some(event) => event,
                        None => continue,
                    },
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "terminal input failed");
                        let _ = tx.send(AppEvent::Quit);
                        break;
                    }
                    None => {
                        let _ = tx.send(AppEvent::Quit);
                        break;
                    }
                },
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    });
}

/// Maps a crossterm event onto the app's events; key releases and repeats are dropped.
fn translate(raw: Event) -> Option<AppEvent> {
    match raw {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Runs one review call off the event loop and reports back as `ReviewFinished`.
///
/// The UI stays responsive while the call is pending; no timeout is applied.
pub fn spawn_review(
    client: Arc<dyn ReviewClient>,
    pending: PendingReview,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        let outcome = client.review(&pending.payload).await;
        let _ = tx.send(AppEvent::ReviewFinished {
            token: pending.token,
            outcome,
        });
    });
}
