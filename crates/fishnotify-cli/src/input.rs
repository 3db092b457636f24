use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::shutdown::ShutdownSignal;

/// What a key press asks the polling loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleChat,
}

/// Spawn a thread that turns key presses into actions.
///
/// Quit keys (Esc, q, Ctrl+C) trigger `shutdown` directly. Everything else
/// the loop cares about is forwarded on `actions`; the thread exits once
/// shutdown is triggered or the receiver is gone.
pub fn spawn_keyboard_monitor(
    shutdown: Arc<ShutdownSignal>,
    actions: Sender<KeyAction>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Keyboard monitor started");

        while !shutdown.is_shutdown() {
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let Ok(Event::Key(key_event)) = event::read() else {
                continue;
            };

            match key_action(&key_event) {
                Some(KeyAction::Quit) => {
                    debug!("Quit key pressed: {:?}", key_event.code);
                    shutdown.trigger();
                    break;
                }
                Some(action) => {
                    if actions.send(action).is_err() {
                        break;
                    }
                }
                None => {}
            }
        }

        debug!("Keyboard monitor stopped");
    })
}

fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    match event.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(KeyAction::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char('c') | KeyCode::Char('C') => Some(KeyAction::ToggleChat),
        _ => None,
    }
}
