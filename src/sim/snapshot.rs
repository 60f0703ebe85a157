//! Read-only view of the game for renderers
//!
//! Built once per frame after the tick. Everything is in pixel space except
//! the cell coordinates of mushrooms and segments, which renderers scale by
//! `CELL` themselves.

use glam::Vec2;
use serde::Serialize;

use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MushroomView {
    pub x: i32,
    pub y: i32,
    pub hp: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentView {
    pub x: i32,
    pub y: i32,
    pub head: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpiderView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub score: u64,
    pub lives: i32,
    pub level: u32,
    pub phase: GamePhase,
    pub player: PlayerView,
    pub bullets: Vec<Vec2>,
    pub mushrooms: Vec<MushroomView>,
    pub centipedes: Vec<Vec<SegmentView>>,
    pub spider: Option<SpiderView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            score: state.score,
            lives: state.lives,
            level: state.level,
            phase: state.phase,
            player: PlayerView {
                pos: state.player.pos,
                width: state.player.width,
                height: state.player.height,
            },
            bullets: state.bullets.iter().map(|b| b.pos).collect(),
            mushrooms: state
                .field
                .sorted()
                .into_iter()
                .map(|(cell, hp)| MushroomView {
                    x: cell.x,
                    y: cell.y,
                    hp,
                })
                .collect(),
            centipedes: state
                .centipedes
                .iter()
                .map(|chain| {
                    chain
                        .segments
                        .iter()
                        .map(|s| SegmentView {
                            x: s.cell.x,
                            y: s.cell.y,
                            head: s.head,
                        })
                        .collect()
                })
                .collect(),
            spider: state.spider.as_ref().map(|s| SpiderView {
                pos: s.pos,
                radius: s.radius,
            }),
        }
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}
