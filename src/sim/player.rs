//! Player cannon

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Milliseconds until the next shot is allowed (may go negative)
    pub fire_cooldown: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(Self::center_x(), PLAYER_Y),
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            fire_cooldown: 0.0,
        }
    }
}

impl Player {
    fn center_x() -> f32 {
        CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0
    }

    /// Integrate horizontal input and clamp to the canvas
    pub fn steer(&mut self, left: bool, right: bool, speed: f32, dt_ms: f32) {
        let axis = (right as i32 - left as i32) as f32;
        self.pos.x += axis * speed * (dt_ms / 1000.0);
        self.pos.x = self.pos.x.clamp(0.0, CANVAS_WIDTH - self.width);
    }

    /// Tick the cooldown; returns true if a shot is fired this tick.
    /// Held fire auto-repeats at the cooldown rate.
    pub fn try_fire(&mut self, fire_held: bool, fire_delay_ms: f32, dt_ms: f32) -> bool {
        self.fire_cooldown -= dt_ms;
        if fire_held && self.fire_cooldown <= 0.0 {
            self.fire_cooldown = fire_delay_ms;
            true
        } else {
            false
        }
    }

    /// Where bullets leave the cannon
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0 - 1.0, self.pos.y - MUZZLE_OFFSET)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn recenter(&mut self) {
        self.pos.x = Self::center_x();
    }
}
