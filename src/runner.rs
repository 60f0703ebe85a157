//! Frame driver
//!
//! One `frame` per display refresh: clamp the elapsed time, run a single
//! simulation tick, then hand events and the snapshot to the host sinks.
//! Sinks run after the tick, so nothing they do can feed back into it.

use crate::audio::SoundEffect;
use crate::consts::MAX_FRAME_MS;
use crate::platform::{AudioSink, InputProvider, Notification, NotificationSink, RenderSink};
use crate::sim::{self, GameEvent, GamePhase, GameState, Snapshot};
use crate::tuning::{Tuning, TuningError};

/// Host-side output channels for one frame
pub struct Sinks<'a> {
    pub audio: &'a mut dyn AudioSink,
    pub notifications: &'a mut dyn NotificationSink,
    pub render: &'a mut dyn RenderSink,
}

pub struct Runner {
    pub state: GameState,
}

impl Runner {
    /// New runner with the first level already set up. Rejects tuning the
    /// simulation cannot run with (empty spider speed range, zero lives, ...).
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut state = GameState::with_tuning(seed, tuning);
        sim::start_game(&mut state);
        Ok(Self { state })
    }

    /// Lifecycle command: full restart
    pub fn start_game(&mut self) {
        sim::start_game(&mut self.state);
    }

    /// Lifecycle command: pause/resume
    pub fn toggle_pause(&mut self) {
        sim::toggle_pause(&mut self.state);
    }

    /// Pause only if the game is running; used when the player loses sight of
    /// the game. Returns true if it paused.
    pub fn pause(&mut self) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        sim::toggle_pause(&mut self.state);
        true
    }

    /// Run one frame. Returns the events that were dispatched.
    pub fn frame(
        &mut self,
        elapsed_ms: f64,
        input: &mut dyn InputProvider,
        sinks: &mut Sinks<'_>,
    ) -> Vec<GameEvent> {
        let dt = (elapsed_ms as f32).clamp(0.0, MAX_FRAME_MS);
        let input = input.poll();
        sim::tick(&mut self.state, &input, dt);

        let events = self.state.drain_events();
        for event in &events {
            if let Some(effect) = SoundEffect::for_event(event) {
                sinks.audio.play(effect);
            }
            if let Some(note) = Notification::for_event(event, self.state.level) {
                sinks.notifications.notify(note);
            }
        }
        sinks.render.render(&Snapshot::capture(&self.state));
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }
}
