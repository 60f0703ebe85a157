//! Mushroom field
//!
//! Sparse map from cell to hit points. Every entry has hp in
//! `[MUSHROOM_MIN_HP, MUSHROOM_MAX_HP]`; an entry whose hp would reach zero is
//! removed instead.

use std::collections::HashMap;

use rand::Rng;

use super::grid::Cell;
use crate::consts::*;

#[derive(Debug, Clone, Default)]
pub struct Field {
    mushrooms: HashMap<Cell, u8>,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a mushroom. Cells below the spawn floor (and cells
    /// outside the grid) are left untouched.
    pub fn add_mushroom(&mut self, cell: Cell, hp: u8) {
        if cell.y > ROWS - SPAWN_FLOOR_MARGIN || !cell.in_bounds() {
            return;
        }
        self.mushrooms
            .insert(cell, hp.clamp(MUSHROOM_MIN_HP, MUSHROOM_MAX_HP));
    }

    /// Take one point of damage. Returns true if a mushroom was there, whether
    /// or not it survived.
    pub fn damage(&mut self, cell: Cell) -> bool {
        let Some(hp) = self.mushrooms.get_mut(&cell) else {
            return false;
        };
        *hp -= 1;
        if *hp == 0 {
            self.mushrooms.remove(&cell);
        }
        true
    }

    pub fn is_blocking(&self, cell: Cell) -> bool {
        self.mushrooms.contains_key(&cell)
    }

    pub fn hp_at(&self, cell: Cell) -> Option<u8> {
        self.mushrooms.get(&cell).copied()
    }

    /// Clear, then roll every interior cell of the spawn band independently.
    pub fn populate<R: Rng>(&mut self, density: f64, rng: &mut R) {
        self.mushrooms.clear();
        for y in FIELD_TOP_ROW..ROWS - FIELD_BOTTOM_MARGIN {
            for x in 1..COLS - 1 {
                if rng.random::<f64>() < density {
                    let hp = rng.random_range(2..=MUSHROOM_MAX_HP);
                    self.add_mushroom(Cell::new(x, y), hp);
                }
            }
        }
        log::debug!("Field populated: {} mushrooms at density {:.3}", self.len(), density);
    }

    pub fn clear(&mut self) {
        self.mushrooms.clear();
    }

    pub fn len(&self) -> usize {
        self.mushrooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mushrooms.is_empty()
    }

    /// Mushrooms in row-major order (stable for rendering and comparisons)
    pub fn sorted(&self) -> Vec<(Cell, u8)> {
        let mut out: Vec<_> = self.mushrooms.iter().map(|(c, hp)| (*c, *hp)).collect();
        out.sort_by_key(|(c, _)| (c.y, c.x));
        out
    }
}

/// Mushroom density for a level (1-based)
pub fn density_for_level(base: f64, per_level: f64, level: u32) -> f64 {
    base + level.saturating_sub(1) as f64 * per_level
}
