//! Centipede chains
//!
//! A chain is an ordered list of segments, index 0 is the head. All segments of
//! a chain share one movement clock: every segment accumulates frame time, but
//! only the head's accumulator decides when the whole chain steps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::Field;
use super::grid::{Cell, Direction, column_in_bounds};
use crate::consts::*;

/// One cell-aligned body unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub cell: Cell,
    pub dir: Direction,
    pub head: bool,
    /// Milliseconds since the chain last stepped
    pub move_timer: f32,
    /// Cells per second
    pub speed: f32,
}

/// What a movement update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Accumulator not full yet
    Waiting,
    Moved,
    /// Hit an edge or mushroom: reversed and dropped a row
    Turned,
    /// Head entered the player zone
    ReachedPlayer,
}

/// Result of cutting a chain at a hit segment
#[derive(Debug)]
pub struct Split {
    /// Where the hit segment was (becomes a mushroom)
    pub cell: Cell,
    pub head_part: Option<Centipede>,
    pub tail_part: Option<Centipede>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centipede {
    pub id: u32,
    pub segments: Vec<Segment>,
}

impl Centipede {
    /// Lay out a fresh chain on `row`, trailing segments behind the head.
    pub fn spawn(id: u32, len: usize, speed: f32, dir: Direction, row: i32) -> Self {
        let start_x = match dir {
            Direction::Right => 2,
            Direction::Left => COLS - 3,
        };
        let segments = (0..len)
            .map(|i| Segment {
                cell: Cell::new(start_x - i as i32 * dir.step(), row),
                dir,
                head: i == 0,
                move_timer: 0.0,
                speed,
            })
            .collect();
        Self { id, segments }
    }

    /// Wrap existing segments as a chain, promoting the first to head.
    /// Returns None for an empty list; a chain is never empty.
    pub fn from_segments(id: u32, mut segments: Vec<Segment>) -> Option<Self> {
        let first = segments.first_mut()?;
        first.head = true;
        Some(Self { id, segments })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    /// Advance the shared clock and step the chain if it is due.
    pub fn advance(&mut self, dt_ms: f32, field: &Field) -> StepOutcome {
        for seg in &mut self.segments {
            seg.move_timer += dt_ms;
        }
        let head = &self.segments[0];
        if head.move_timer < 1000.0 / head.speed {
            return StepOutcome::Waiting;
        }
        for seg in &mut self.segments {
            seg.move_timer = 0.0;
        }

        let turned = self.step(field);
        if self.segments[0].cell.y >= PLAYER_ZONE_ROW {
            StepOutcome::ReachedPlayer
        } else if turned {
            StepOutcome::Turned
        } else {
            StepOutcome::Moved
        }
    }

    /// Move one cell. Returns true if the head was blocked and turned.
    fn step(&mut self, field: &Field) -> bool {
        let head = &self.segments[0];
        let mut dir = head.dir;
        let mut next = head.cell.offset(dir.step(), 0);
        let blocked = !column_in_bounds(next.x) || field.is_blocking(next);
        if blocked {
            dir = dir.reversed();
            next = Cell::new(
                (head.cell.x + dir.step()).clamp(0, COLS - 1),
                head.cell.y + 1,
            );
        }
        self.segments[0].dir = dir;

        // Follow the leader, back to front, before the head moves
        for i in (1..self.segments.len()).rev() {
            self.segments[i].cell = self.segments[i - 1].cell;
            self.segments[i].dir = self.segments[i - 1].dir;
        }
        self.segments[0].cell = next;
        blocked
    }

    /// Index of the first segment whose cell box contains `point`
    pub fn hit_index(&self, point: Vec2) -> Option<usize> {
        self.segments.iter().position(|s| s.cell.contains_point(point))
    }

    /// Cut the chain at `index`. The hit segment is dropped; the parts before
    /// and after it become independent chains (each with its own head).
    pub fn split(mut self, index: usize, tail_id: u32) -> Split {
        let tail = self.segments.split_off(index + 1);
        let cell = self.segments.remove(index).cell;
        let head_part = Centipede::from_segments(self.id, self.segments);
        let tail_part = Centipede::from_segments(tail_id, tail);
        Split {
            cell,
            head_part,
            tail_part,
        }
    }

    /// Push every segment up by `rows`, stopping at row 0
    pub fn nudge_up(&mut self, rows: i32) {
        for seg in &mut self.segments {
            seg.cell.y = (seg.cell.y - rows).max(0);
        }
    }

    /// Exactly one head, and it is at index 0
    pub fn has_single_head(&self) -> bool {
        !self.segments.is_empty()
            && self.segments[0].head
            && self.segments.iter().filter(|s| s.head).count() == 1
    }
}

/// Chain length for a level
pub fn length_for_level(base: u32, level: u32) -> usize {
    (base + (level * 2).min(10)) as usize
}

/// Chain speed (cells/sec) for a level
pub fn speed_for_level(base: f32, level: u32) -> f32 {
    base + level.min(6) as f32
}
