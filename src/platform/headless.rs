//! Native headless host pieces
//!
//! No window and no sound card: audio and notifications go to the log, the
//! renderer just keeps the latest snapshot, and input comes from the
//! autopilot.

use super::{AudioSink, InputProvider, Notification, NotificationSink, RenderSink};
use crate::audio::SoundEffect;
use crate::sim::{Snapshot, TickInput};

/// Logs sound effects at trace level and notifications at info level
#[derive(Debug, Default)]
pub struct LogSink {
    pub sounds_played: u64,
}

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect) {
        self.sounds_played += 1;
        log::trace!("sfx {:?}", effect);
    }
}

impl NotificationSink for LogSink {
    fn notify(&mut self, note: Notification) {
        log::info!("{}", note);
    }
}

/// Keeps the most recent frame
#[derive(Debug, Default)]
pub struct LastFrame {
    pub frames: u64,
    pub snapshot: Option<Snapshot>,
}

impl RenderSink for LastFrame {
    fn render(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        self.snapshot = Some(snapshot.clone());
    }
}

/// Hands control to the simulation's idle-mode autopilot
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoInput;

impl InputProvider for DemoInput {
    fn poll(&mut self) -> TickInput {
        TickInput {
            idle_mode: true,
            ..Default::default()
        }
    }
}
