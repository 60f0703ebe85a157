//! Idle/demo mode steering
//!
//! Keeps the cannon under the lowest centipede segment and fires constantly,
//! stepping away from the spider when it gets close.

use std::cmp::Reverse;

use super::grid::column_in_bounds;
use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;

/// Spider distance (in radii) that triggers evasion
const EVADE_RADII: f32 = 4.0;

pub fn steer(state: &GameState) -> TickInput {
    let center = state.player.center();

    if let Some(spider) = &state.spider {
        let away = center - spider.pos;
        if away.length() < spider.radius * EVADE_RADII {
            return TickInput {
                left: away.x < 0.0,
                right: away.x >= 0.0,
                fire: true,
                idle_mode: true,
            };
        }
    }

    let target = state
        .centipedes
        .iter()
        .flat_map(|c| c.segments.iter())
        .filter(|s| column_in_bounds(s.cell.x))
        .map(|s| (s.cell.to_pixel().x + CELL / 2.0, s.cell.y))
        .min_by_key(|(x, row)| (Reverse(*row), (x - center.x).abs() as i32))
        .map(|(x, _)| x);

    let dx = target.map_or(0.0, |x| x - center.x);
    let dead_zone = CELL / 2.0;
    TickInput {
        left: dx < -dead_zone,
        right: dx > dead_zone,
        fire: true,
        idle_mode: true,
    }
}
