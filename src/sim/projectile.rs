//! Player bullets
//!
//! Bullets fly straight up and are single-hit: the first target under the
//! bullet consumes it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::centipede::Centipede;
use super::field::Field;
use super::grid::Cell;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// px/s, negative is up
    pub vy: f32,
    /// Consumed this tick; compacted away at the end of the bullet pass
    #[serde(skip)]
    pub spent: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            vy: -speed,
            spent: false,
        }
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.pos.y += self.vy * (dt_ms / 1000.0);
    }

    /// Fully past the top edge
    pub fn off_screen(&self) -> bool {
        self.pos.y < -CELL
    }

    pub fn cell(&self) -> Cell {
        Cell::from_pixel(self.pos)
    }
}

/// What a bullet struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletHit {
    Mushroom(Cell),
    /// Chain index into the collection, segment index within the chain
    Segment { chain: usize, index: usize },
}

/// First target under `point`. Mushrooms win over segments; chains are
/// scanned newest first, segments head to tail.
pub fn find_hit(point: Vec2, field: &Field, centipedes: &[Centipede]) -> Option<BulletHit> {
    let cell = Cell::from_pixel(point);
    if field.is_blocking(cell) {
        return Some(BulletHit::Mushroom(cell));
    }
    centipedes
        .iter()
        .enumerate()
        .rev()
        .find_map(|(chain, c)| c.hit_index(point).map(|index| BulletHit::Segment { chain, index }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Direction;

    #[test]
    fn test_bullet_moves_up() {
        let mut bullet = Bullet::new(Vec2::new(100.0, 200.0), 420.0);
        bullet.advance(100.0);
        assert!((bullet.pos.y - 158.0).abs() < 1e-4);
        assert!(!bullet.off_screen());
    }

    #[test]
    fn test_off_screen_after_top_margin() {
        let bullet = Bullet::new(Vec2::new(10.0, -CELL - 0.5), 420.0);
        assert!(bullet.off_screen());
        let bullet = Bullet::new(Vec2::new(10.0, -CELL + 0.5), 420.0);
        assert!(!bullet.off_screen());
    }

    #[test]
    fn test_mushroom_takes_priority() {
        let mut field = Field::new();
        field.add_mushroom(Cell::new(5, 5), 2);
        let mut chain = Centipede::spawn(1, 1, 8.0, Direction::Right, 5);
        chain.segments[0].cell = Cell::new(5, 5);

        let hit = find_hit(Vec2::new(65.0, 65.0), &field, &[chain]);
        assert_eq!(hit, Some(BulletHit::Mushroom(Cell::new(5, 5))));
    }

    #[test]
    fn test_segment_hit_reports_indices() {
        let field = Field::new();
        let first = Centipede::spawn(1, 3, 8.0, Direction::Right, 4);
        let second = Centipede::spawn(2, 3, 8.0, Direction::Right, 8);
        // Second chain's middle segment sits at column 1, row 8
        let hit = find_hit(Vec2::new(18.0, 100.0), &field, &[first, second]);
        assert_eq!(hit, Some(BulletHit::Segment { chain: 1, index: 1 }));
    }

    #[test]
    fn test_empty_space_misses() {
        let field = Field::new();
        let chain = Centipede::spawn(1, 3, 8.0, Direction::Right, 0);
        assert_eq!(find_hit(Vec2::new(200.0, 300.0), &field, &[chain]), None);
    }
}
