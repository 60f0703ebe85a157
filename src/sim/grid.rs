//! Grid geometry
//!
//! Mushrooms and centipede segments live in cell space; the player, bullets and
//! the spider live in pixel space. `pixel = cell * CELL`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A discrete grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a pixel-space point
    pub fn from_pixel(pos: Vec2) -> Self {
        Self {
            x: (pos.x / CELL).floor() as i32,
            y: (pos.y / CELL).floor() as i32,
        }
    }

    /// Top-left corner of the cell in pixel space
    pub fn to_pixel(self) -> Vec2 {
        Vec2::new(self.x as f32 * CELL, self.y as f32 * CELL)
    }

    /// Inclusive pixel box test (edges count as inside)
    pub fn contains_point(self, p: Vec2) -> bool {
        let origin = self.to_pixel();
        p.x >= origin.x && p.x <= origin.x + CELL && p.y >= origin.y && p.y <= origin.y + CELL
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(self) -> bool {
        column_in_bounds(self.x) && (0..ROWS).contains(&self.y)
    }
}

#[inline]
pub fn column_in_bounds(x: i32) -> bool {
    (0..COLS).contains(&x)
}

/// Horizontal heading of a centipede segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column delta for one step (-1 or +1)
    pub fn step(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
