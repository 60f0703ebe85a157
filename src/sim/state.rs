//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything the simulation mutates. The
//! tick phases borrow it in turn; nothing lives in globals.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::centipede::Centipede;
use super::field::Field;
use super::grid::Cell;
use super::player::Player;
use super::projectile::Bullet;
use super::spider::Spider;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused, nothing advances
    Paused,
    /// Out of lives; only a restart leaves this phase
    GameOver,
}

/// Something that happened during a tick or lifecycle command.
///
/// Hosts drain these after each frame and turn them into sounds and
/// notifications; the simulation never calls out directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Shot,
    MushroomHit { cell: Cell, destroyed: bool },
    SegmentHit { cell: Cell, head: bool },
    SpiderDestroyed,
    LifeLost { lives_left: i32 },
    GameOver { score: u64 },
    LevelUp { level: u32 },
    GameStarted,
    Paused,
    Resumed,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Score (never decreases during a run)
    pub score: u64,
    /// Remaining lives; game over at zero
    pub lives: i32,
    /// Current level (1-based)
    pub level: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub field: Field,
    /// Independent chains, in spawn order
    pub centipedes: Vec<Centipede>,
    pub spider: Option<Spider>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next centipede ID
    next_id: u32,
}

impl GameState {
    /// Create a new, empty game state with default tuning. Call
    /// `tick::start_game` to populate the first level.
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// `tuning` must already be validated; see `Tuning::validate`
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        debug_assert!(tuning.validate().is_ok(), "unvalidated tuning: {tuning:?}");
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: tuning.starting_lives,
            tuning,
            score: 0,
            level: 1,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::default(),
            bullets: Vec::new(),
            field: Field::new(),
            centipedes: Vec::new(),
            spider: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new chain ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn segment_count(&self) -> usize {
        self.centipedes.iter().map(Centipede::len).sum()
    }
}
