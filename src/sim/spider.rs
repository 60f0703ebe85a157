//! Spider bonus target
//!
//! Bounces around the lower band of the field for a limited time. Bullets use
//! a tight hitbox (half the radius) while the player check uses a generous one
//! (radius plus a margin).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spider {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifetime_ms: f32,
}

impl Spider {
    /// Random cell-aligned column, pixel row inside the lower band, random
    /// heading on both axes.
    pub fn spawn<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let x = rng.random_range(0..COLS) as f32 * CELL;
        let y = rng.random_range((ROWS - 12) as f32 * CELL..=(ROWS - 5) as f32 * CELL);
        let axis_speed = |rng: &mut R| {
            let sign = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
            sign * rng.random_range(tuning.spider_speed_min..=tuning.spider_speed_max)
        };
        let vx = axis_speed(&mut *rng);
        let vy = axis_speed(&mut *rng);
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            radius: tuning.spider_radius,
            lifetime_ms: tuning.spider_lifetime_ms,
        }
    }

    /// Age, move and bounce. Returns false once the lifetime has run out.
    pub fn update(&mut self, dt_ms: f32) -> bool {
        self.lifetime_ms -= dt_ms;
        self.pos += self.vel * (dt_ms / 1000.0);

        if self.pos.x < SPIDER_EDGE_MARGIN {
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x > CANVAS_WIDTH - SPIDER_EDGE_MARGIN {
            self.vel.x = -self.vel.x.abs();
        }
        if self.pos.y < SPIDER_BAND_TOP {
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y > CANVAS_HEIGHT - SPIDER_EDGE_MARGIN {
            self.vel.y = -self.vel.y.abs();
        }

        self.lifetime_ms > 0.0
    }

    pub fn is_shot_by(&self, bullet: Vec2) -> bool {
        let r = self.radius * 0.5;
        self.pos.distance_squared(bullet) <= r * r
    }

    pub fn touches(&self, player_center: Vec2, margin: f32) -> bool {
        let r = self.radius + margin;
        self.pos.distance_squared(player_center) <= r * r
    }
}
