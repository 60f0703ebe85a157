//! Platform abstraction layer
//!
//! The simulation talks to the outside world only through these boundaries:
//! - Input: three held buttons, polled once per frame
//! - Audio: fire-and-forget sound effects
//! - Notifications: transient user-facing messages
//! - Rendering: a read-only snapshot each frame
//!
//! `headless` backs them with the log facade for native runs, `keys` maps
//! browser key codes to input, and `web` binds the game to a browser page on
//! wasm32.

pub mod headless;
pub mod keys;
#[cfg(target_arch = "wasm32")]
pub mod web;

use serde::Serialize;

use crate::audio::SoundEffect;
use crate::sim::{GameEvent, Snapshot, TickInput};

/// Source of held-button state
pub trait InputProvider {
    fn poll(&mut self) -> TickInput;
}

pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

pub trait NotificationSink {
    fn notify(&mut self, note: Notification);
}

pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot);
}

/// Transient user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Notification {
    LifeLost { lives_left: i32 },
    GameOver { score: u64 },
    Paused,
    Resumed,
    LevelReady { level: u32 },
}

impl Notification {
    /// Notification for a simulation event, if it has one
    pub fn for_event(event: &GameEvent, level: u32) -> Option<Self> {
        match *event {
            GameEvent::LifeLost { lives_left } if lives_left > 0 => {
                Some(Notification::LifeLost { lives_left })
            }
            GameEvent::GameOver { score } => Some(Notification::GameOver { score }),
            GameEvent::Paused => Some(Notification::Paused),
            GameEvent::Resumed => Some(Notification::Resumed),
            GameEvent::LevelUp { level } => Some(Notification::LevelReady { level }),
            GameEvent::GameStarted => Some(Notification::LevelReady { level }),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notification::LifeLost { lives_left } => {
                format!("Life lost! {lives_left} remaining")
            }
            Notification::GameOver { score } => {
                format!("GAME OVER - score {score}. Press R to restart")
            }
            Notification::Paused => "Paused".to_string(),
            Notification::Resumed => "Resumed".to_string(),
            Notification::LevelReady { level } => {
                format!("Level {level} - ready! Use arrows to move, space to fire")
            }
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Null sinks for hosts that do not care about a channel
impl AudioSink for () {
    fn play(&mut self, _effect: SoundEffect) {}
}

impl NotificationSink for () {
    fn notify(&mut self, _note: Notification) {}
}

impl RenderSink for () {
    fn render(&mut self, _snapshot: &Snapshot) {}
}
