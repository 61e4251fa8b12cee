//! Game state and core simulation types
//!
//! One owned `GameState` is the single writer for a session: intents and
//! ticks both borrow it mutably, one at a time.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{AreaPattern, Direction, Lane, random_empty_cell};
use crate::consts::{GRID_SIZE, PLAYER_START};
use crate::tuning::Tuning;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Created, not started yet
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by a lethal collision
    Ended,
}

/// Projectile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Consumes gifts in its path
    Sweeper,
    /// May drop gifts or ground hazards along its path
    Carrier,
}

/// A collectible gift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gift {
    pub id: u32,
    pub pos: IVec2,
}

/// The power-up granting bonus mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: IVec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaPhase {
    Warning,
    Active,
}

/// Region hazard covering half the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaHazard {
    pub pattern: AreaPattern,
    pub phase: AreaPhase,
    /// Time left in the current phase
    pub timer_ms: u64,
}

impl AreaHazard {
    /// Lethal coverage: only an active hazard hurts
    pub fn covers(&self, cell: IVec2) -> bool {
        self.phase == AreaPhase::Active && self.pattern.contains(cell)
    }
}

/// Single-cell hazard with a fixed lifetime, placed without warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundHazard {
    pub id: u32,
    pub pos: IVec2,
    pub created_at_ms: u64,
    pub expires_at_ms: u64,
}

/// A projectile crossing the field along one lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub pos: IVec2,
    /// Axis-aligned unit step, fixed for the projectile's lifetime
    pub dir: IVec2,
    pub drop_count: u32,
}

impl Projectile {
    /// Projectiles may sit one cell outside the field; past that they are gone
    pub fn in_travel_range(pos: IVec2) -> bool {
        pos.x >= -1 && pos.x <= GRID_SIZE && pos.y >= -1 && pos.y <= GRID_SIZE
    }
}

/// Telegraph cell for an incoming projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub id: u32,
    /// Shared by every warning cell of one projectile
    pub batch_id: u32,
    pub pos: IVec2,
    pub kind: ProjectileKind,
    pub direction: Direction,
    pub expires_at_ms: u64,
}

/// Bonus mode: invulnerability plus score multiplier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub active: bool,
    pub remaining_ms: u64,
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    AreaHazard,
    GroundHazard,
    Projectile(ProjectileKind),
}

/// Notable moments for audio/visual collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GiftCollected { points: u64 },
    GiftConsumed { pos: IVec2 },
    PowerUpSpawned { pos: IVec2 },
    PowerUpCollected,
    BonusExpired,
    AreaHazardWarning { pattern: AreaPattern },
    AreaHazardActive { pattern: AreaPattern },
    AreaHazardCleared,
    ProjectileWarning { kind: ProjectileKind, lane: Lane },
    ProjectileLaunched { kind: ProjectileKind },
    GroundHazardDropped { pos: IVec2 },
    GameOver { cause: DeathCause },
}

/// Final stats, computed once when a run ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub elapsed_secs: f64,
    pub score: u64,
    /// Points per second (0 if no time elapsed)
    pub score_per_sec: f64,
    pub cause: DeathCause,
}

/// Read-only view of everything a presentation layer draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub status: GameStatus,
    pub clock_ms: u64,
    pub score: u64,
    pub player: IVec2,
    pub bonus: Bonus,
    pub gifts: Vec<Gift>,
    pub power_up: Option<PowerUp>,
    pub area_hazard: Option<AreaHazard>,
    pub ground_hazards: Vec<GroundHazard>,
    pub projectiles: Vec<Projectile>,
    pub warnings: Vec<Warning>,
}

/// Complete session state (deterministic for a given seed and intent stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Seed the RNG was created from
    pub seed: u64,
    /// Incremented on every (re)start; tags deferred effects
    pub run_id: u32,
    pub status: GameStatus,
    /// Simulation clock, advanced one tick period per tick
    pub clock_ms: u64,
    pub score: u64,
    pub started_at_ms: u64,
    /// Last hazard-selection cycle (None: fire on the next tick)
    pub last_hazard_at: Option<u64>,
    pub last_gift_spawn_at: Option<u64>,
    pub last_power_up_at: Option<u64>,
    /// Area hazard is eligible once this drops to 0 or below
    pub hazard_cooldown: i32,
    /// Lane of the previous projectile, for repeat avoidance
    pub last_lane: Option<Lane>,
    pub player: IVec2,
    pub bonus: Bonus,
    /// Entity collections (ascending id order)
    pub gifts: Vec<Gift>,
    pub power_up: Option<PowerUp>,
    pub area_hazard: Option<AreaHazard>,
    pub ground_hazards: Vec<GroundHazard>,
    pub projectiles: Vec<Projectile>,
    pub warnings: Vec<Warning>,
    pub summary: Option<SessionSummary>,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle session with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let cooldown = tuning.area_cooldown_cycles;
        Self {
            tuning,
            seed,
            run_id: 0,
            status: GameStatus::Idle,
            clock_ms: 0,
            score: 0,
            started_at_ms: 0,
            last_hazard_at: None,
            last_gift_spawn_at: None,
            last_power_up_at: None,
            hazard_cooldown: cooldown,
            last_lane: None,
            player: IVec2::new(PLAYER_START.0, PLAYER_START.1),
            bonus: Bonus::default(),
            gifts: Vec::new(),
            power_up: None,
            area_hazard: None,
            ground_hazards: Vec::new(),
            projectiles: Vec::new(),
            warnings: Vec::new(),
            summary: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Begin the first run. Ignored while a run is in progress.
    pub fn start(&mut self) {
        if self.is_running() {
            log::debug!("start ignored: run {} already in progress", self.run_id);
            return;
        }
        self.begin_run();
    }

    /// Reset everything and begin a fresh run
    pub fn restart(&mut self) {
        self.begin_run();
    }

    fn begin_run(&mut self) {
        self.reset();
        self.run_id += 1;
        self.status = GameStatus::Running;
        self.started_at_ms = self.clock_ms;
        let spawned = self.spawn_gifts(self.tuning.initial_gifts);
        log::info!("Run {} started (seed {}, {} gifts)", self.run_id, self.seed, spawned);
    }

    /// Clear counters, timers and collections. The RNG stream and run id
    /// carry over so consecutive runs differ but stay reproducible.
    fn reset(&mut self) {
        self.status = GameStatus::Idle;
        self.clock_ms = 0;
        self.score = 0;
        self.started_at_ms = 0;
        self.last_hazard_at = None;
        self.last_gift_spawn_at = None;
        self.last_power_up_at = None;
        self.hazard_cooldown = self.tuning.area_cooldown_cycles;
        self.last_lane = None;
        self.player = IVec2::new(PLAYER_START.0, PLAYER_START.1);
        self.bonus = Bonus::default();
        self.gifts.clear();
        self.power_up = None;
        self.area_hazard = None;
        self.ground_hazards.clear();
        self.projectiles.clear();
        self.warnings.clear();
        self.summary = None;
        self.events.clear();
    }

    /// End the run. Only the first lethal hit of a run counts.
    pub fn end(&mut self, cause: DeathCause) {
        if !self.is_running() {
            return;
        }
        self.status = GameStatus::Ended;

        let elapsed_secs = self.clock_ms.saturating_sub(self.started_at_ms) as f64 / 1000.0;
        let score_per_sec = if elapsed_secs > 0.0 {
            self.score as f64 / elapsed_secs
        } else {
            0.0
        };
        self.summary = Some(SessionSummary {
            elapsed_secs,
            score: self.score,
            score_per_sec,
            cause,
        });
        self.push_event(GameEvent::GameOver { cause });
        log::info!(
            "Run {} over: {:?}, score {} in {:.1}s",
            self.run_id,
            cause,
            self.score,
            elapsed_secs
        );
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn gift_index_at(&self, cell: IVec2) -> Option<usize> {
        self.gifts.iter().position(|g| g.pos == cell)
    }

    /// Spawn up to `count` gifts on free cells, never exceeding the cap.
    /// Returns how many were placed.
    pub fn spawn_gifts(&mut self, count: usize) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            if self.gifts.len() >= self.tuning.max_gifts {
                break;
            }
            let mut occupied: Vec<IVec2> = Vec::with_capacity(self.gifts.len() + self.ground_hazards.len() + 2);
            occupied.push(self.player);
            occupied.extend(self.gifts.iter().map(|g| g.pos));
            occupied.extend(self.power_up.iter().map(|p| p.pos));
            occupied.extend(self.ground_hazards.iter().map(|t| t.pos));

            let pos = random_empty_cell(&mut self.rng, &occupied);
            let id = self.next_entity_id();
            self.gifts.push(Gift { id, pos });
            spawned += 1;
        }
        spawned
    }

    /// Place the power-up on a free cell, replacing any existing one
    pub fn spawn_power_up(&mut self) {
        let mut occupied: Vec<IVec2> = self.gifts.iter().map(|g| g.pos).collect();
        occupied.push(self.player);
        occupied.extend(self.ground_hazards.iter().map(|t| t.pos));

        let pos = random_empty_cell(&mut self.rng, &occupied);
        let id = self.next_entity_id();
        self.power_up = Some(PowerUp { id, pos });
        self.push_event(GameEvent::PowerUpSpawned { pos });
        log::debug!("Power-up spawned at ({}, {})", pos.x, pos.y);
    }

    /// Enter bonus mode for the full duration (restarts the countdown)
    pub fn activate_bonus(&mut self) {
        self.bonus = Bonus {
            active: true,
            remaining_ms: self.tuning.bonus_duration_ms,
        };
    }

    /// Immutable copy of the presentation-relevant state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            clock_ms: self.clock_ms,
            score: self.score,
            player: self.player,
            bonus: self.bonus.clone(),
            gifts: self.gifts.clone(),
            power_up: self.power_up.clone(),
            area_hazard: self.area_hazard.clone(),
            ground_hazards: self.ground_hazards.clone(),
            projectiles: self.projectiles.clone(),
            warnings: self.warnings.clone(),
        }
    }
}
