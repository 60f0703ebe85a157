//! Centipede - a grid-based arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound effect vocabulary (and Web Audio synthesis on wasm32)
//! - `platform`: Input/output boundary traits and host implementations
//! - `runner`: Frame driver tying the simulation to the host sinks

pub mod audio;
pub mod platform;
pub mod runner;
pub mod sim;
pub mod tuning;

pub use runner::Runner;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Logical cell size in pixels
    pub const CELL: f32 = 12.0;
    /// Grid columns
    pub const COLS: i32 = 30;
    /// Grid rows
    pub const ROWS: i32 = 45;

    /// Canvas dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = COLS as f32 * CELL;
    pub const CANVAS_HEIGHT: f32 = ROWS as f32 * CELL;

    /// Frame delta clamp, keeps a stalled tab from producing a huge step
    pub const MAX_FRAME_MS: f32 = 48.0;

    /// Mushroom hit points range
    pub const MUSHROOM_MIN_HP: u8 = 1;
    pub const MUSHROOM_MAX_HP: u8 = 4;
    /// No mushroom is ever created below `ROWS - SPAWN_FLOOR_MARGIN`
    pub const SPAWN_FLOOR_MARGIN: i32 = 4;
    /// Initial population covers rows `[FIELD_TOP_ROW, ROWS - FIELD_BOTTOM_MARGIN)`
    pub const FIELD_TOP_ROW: i32 = 2;
    pub const FIELD_BOTTOM_MARGIN: i32 = 6;

    /// Centipede head reaching this row costs a life
    pub const PLAYER_ZONE_ROW: i32 = ROWS - 2;
    /// Rows every segment is pushed back up after a lost life
    pub const LIFE_LOST_NUDGE_ROWS: i32 = 3;

    /// Player box
    pub const PLAYER_WIDTH: f32 = CELL * 2.0;
    pub const PLAYER_HEIGHT: f32 = CELL;
    pub const PLAYER_Y: f32 = (ROWS - 2) as f32 * CELL;

    /// Bullets spawn this far above the player's top edge
    pub const MUZZLE_OFFSET: f32 = 8.0;

    /// Spider bounce band
    pub const SPIDER_EDGE_MARGIN: f32 = 10.0;
    pub const SPIDER_BAND_TOP: f32 = CANVAS_HEIGHT * 0.65;
}

