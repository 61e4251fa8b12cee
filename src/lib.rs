//! Gift Dash - A tick-driven grid arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tick loop, hazards, collisions, game state)
//! - `engine`: Fixed-timestep driver and lifecycle commands
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and input mapping live outside this crate; they read
//! [`sim::Snapshot`]s, drain [`sim::GameEvent`]s and feed [`sim::Direction`]
//! intents.

pub mod engine;
pub mod sim;
pub mod tuning;

pub use engine::Engine;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Grid is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: i32 = 8;
    /// Player spawn cell
    pub const PLAYER_START: (i32, i32) = (3, 3);

    /// Fixed simulation timestep (ms)
    pub const TICK_MS: u64 = 100;
    /// Slowest tick period a tuning file may ask for (ms)
    pub const MAX_TICK_MS: u64 = 1000;
    /// Maximum ticks per engine update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Gifts
    pub const MAX_GIFTS: usize = 5;
    pub const INITIAL_GIFTS: usize = 3;
    pub const GIFT_SPAWN_INTERVAL_MS: u64 = 2000;
    pub const SCORE_PER_GIFT: u64 = 1;

    /// Power-up / bonus mode
    pub const BONUS_DURATION_MS: u64 = 5000;
    pub const BONUS_MULTIPLIER: u64 = 2;
    pub const POWER_UP_INTERVAL_MS: u64 = 10_000;
    pub const POWER_UP_CHANCE: f64 = 0.5;

    /// Area hazard phases
    pub const AREA_WARNING_MS: u64 = 1500;
    pub const AREA_ACTIVE_MS: u64 = 1500;
    /// Hazard-selection cycles before another area hazard may be chosen
    pub const AREA_COOLDOWN_CYCLES: i32 = 5;
    pub const AREA_CHANCE: f64 = 0.4;

    /// Projectiles
    pub const PROJECTILE_TELEGRAPH_MS: u64 = 1200;
    pub const SWEEPER_CHANCE: f64 = 0.4;
    pub const MAX_CARRIER_DROPS: u32 = 3;
    pub const CARRIER_DROP_CHANCE: f64 = 0.4;
    /// Share of carrier drops that are gifts (rest are ground hazards)
    pub const CARRIER_GIFT_CHANCE: f64 = 0.2;
    /// Lifetime of a dropped ground hazard
    pub const GROUND_HAZARD_MS: u64 = 1500;

    /// Difficulty: hazard interval = max(MIN, BASE - score * STEP)
    pub const BASE_HAZARD_INTERVAL_MS: u64 = 3000;
    pub const MIN_HAZARD_INTERVAL_MS: u64 = 800;
    pub const HAZARD_SCALING_STEP_MS: u64 = 50;

    /// Bounded retries for random placement
    pub const EMPTY_CELL_ATTEMPTS: u32 = 100;
    pub const LANE_REPEAT_ATTEMPTS: u32 = 10;
}
