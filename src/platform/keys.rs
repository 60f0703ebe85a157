//! Keyboard mapping
//!
//! Maps DOM `KeyboardEvent.code` values to held buttons and lifecycle
//! commands. Kept free of web-sys so it runs under native tests.

use super::InputProvider;
use crate::sim::TickInput;

/// What a key event asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Not a game key; let the browser handle it
    Ignored,
    /// A held button changed (already applied to the input)
    Held,
    TogglePause,
    Restart,
}

/// Held-button state, updated from key events and polled once per frame
#[derive(Debug, Default, Clone)]
pub struct Keyboard {
    input: TickInput,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, code: &str, down: bool) -> KeyAction {
        match code {
            "ArrowLeft" | "KeyA" => self.input.left = down,
            "ArrowRight" | "KeyD" => self.input.right = down,
            "Space" | "Enter" => self.input.fire = down,
            // Lifecycle keys act on press only
            "KeyP" if down => return KeyAction::TogglePause,
            "KeyR" if down => return KeyAction::Restart,
            "KeyI" if down => {
                self.input.idle_mode = !self.input.idle_mode;
                log::info!("Idle mode: {}", self.input.idle_mode);
            }
            "KeyP" | "KeyR" | "KeyI" => {}
            _ => return KeyAction::Ignored,
        }
        KeyAction::Held
    }

    /// Drop every held button, e.g. when the window loses focus and key-up
    /// events will not arrive
    pub fn release_all(&mut self) {
        self.input = TickInput {
            idle_mode: self.input.idle_mode,
            ..Default::default()
        };
    }
}

impl InputProvider for Keyboard {
    fn poll(&mut self) -> TickInput {
        self.input
    }
}
