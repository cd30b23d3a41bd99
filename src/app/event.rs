//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.  The
//! task lives exactly as long as the returned [`EventReader`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Handle to the reader task.  Dropping it stops the task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    alive: Arc<AtomicBool>,
}

impl EventReader {
    pub async fn recv(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn the reader.  `poll_rate` bounds how long shutdown can take.
pub fn spawn_event_reader(poll_rate: Duration) -> EventReader {
    let (tx, rx) = mpsc::unbounded_channel();
    let alive = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&alive);

    tokio::task::spawn_blocking(move || {
        while flag.load(Ordering::Relaxed) {
            if !event::poll(poll_rate).unwrap_or(false) {
                continue;
            }
            let Ok(ev) = event::read() else {
                continue;
            };
            let app_event = match ev {
                // Release/repeat events would double every keystroke on
                // terminals that report them.
                CtEvent::Key(k) if k.kind == KeyEventKind::Press => AppEvent::Key(k),
                CtEvent::Mouse(m) => AppEvent::Mouse(m),
                CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
                _ => continue,
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
        tracing::debug!("event reader stopped");
    });

    EventReader { rx, alive }
}
