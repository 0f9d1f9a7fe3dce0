//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop never blocks on the terminal.

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

impl AppEvent {
    /// Map a raw crossterm event.  Key releases and repeats-as-release on
    /// terminals that report them are dropped, as are focus and paste events.
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(k) if k.kind != KeyEventKind::Release => Some(Self::Key(k)),
            CtEvent::Mouse(m) => Some(Self::Mouse(m)),
            CtEvent::Resize(w, h) => Some(Self::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
pub fn spawn_event_reader(poll_interval: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        // Poll with a timeout so a dropped receiver is noticed even when the
        // terminal is idle.
        if tx.is_closed() {
            break;
        }
        match event::poll(poll_interval) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                tracing::warn!("terminal poll failed: {err}");
                break;
            }
        }
        let Ok(ev) = event::read() else {
            continue;
        };
        if let Some(app_event) = AppEvent::from_crossterm(ev) {
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}
