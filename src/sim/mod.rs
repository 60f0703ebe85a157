//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame delta only
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering, audio or platform dependencies (side effects leave as events)

pub mod autopilot;
pub mod centipede;
pub mod field;
pub mod grid;
pub mod player;
pub mod projectile;
pub mod snapshot;
pub mod spider;
pub mod state;
pub mod tick;

pub use centipede::{Centipede, Segment, Split, StepOutcome};
pub use field::Field;
pub use grid::{Cell, Direction};
pub use player::Player;
pub use projectile::{Bullet, BulletHit};
pub use snapshot::Snapshot;
pub use spider::Spider;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, lose_life, reset, start_game, tick, toggle_pause};
