//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod director;
pub mod grid;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, resolve};
pub use director::{Obstacle, fire_due, launch_projectile, spawn_area_hazard, telegraph_projectile, trigger_obstacle};
pub use grid::{AreaPattern, Axis, Direction, Lane, Side, in_grid, random_empty_cell};
pub use scheduler::{Deferred, DeferredEffect, Launch, Scheduler};
pub use state::{
    AreaHazard, AreaPhase, Bonus, DeathCause, GameEvent, GameState, GameStatus, Gift, GroundHazard,
    PowerUp, Projectile, ProjectileKind, SessionSummary, Snapshot, Warning,
};
pub use tick::{move_player, tick};
