use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

use crate::error::{AppError, Result};

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Emitted when no input arrived within the tick rate.
    Tick,
    /// Terminal resize event.
    Resize,
}

/// Polls crossterm on a blocking thread and forwards events via a channel.
///
/// Events that arrive while the tree is being re-rendered wait in the
/// channel and are handled once the walk has been committed.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

/// Map a terminal event to an application event, dropping the ones the
/// app does not handle.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        // Windows reports releases too
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read().ok().and_then(translate) {
                    Some(event) => event,
                    None => continue,
                }
            } else {
                Event::Tick
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }

    /// Receive the next event (waits until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| AppError::Terminal("Event channel closed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn translate_keeps_presses_only() {
        assert!(matches!(translate(key(KeyEventKind::Press)), Some(Event::Key(_))));
        assert!(translate(key(KeyEventKind::Release)).is_none());
    }

    #[test]
    fn translate_resize_and_focus() {
        assert!(matches!(translate(CrosstermEvent::Resize(80, 24)), Some(Event::Resize)));
        assert!(translate(CrosstermEvent::FocusGained).is_none());
    }
}
