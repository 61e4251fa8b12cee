//! Fixed-timestep driver
//!
//! Owns the session and its deferred effects. Real elapsed time goes in
//! through [`Engine::update`]; whole ticks come out, each followed by any
//! deferred effects that fell due.

use crate::consts::MAX_SUBSTEPS;
use crate::sim::{
    self, CollisionResult, Direction, GameEvent, GameState, GameStatus, Scheduler, SessionSummary,
    Snapshot,
};
use crate::tuning::Tuning;

/// Game instance holding all simulation state
#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
    scheduler: Scheduler,
    accumulator_ms: u64,
}

impl Engine {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            scheduler: Scheduler::new(),
            accumulator_ms: 0,
        }
    }

    pub fn start(&mut self) {
        self.state.start();
        self.accumulator_ms = 0;
    }

    /// Reset then start. Deferred effects from earlier runs stay queued and
    /// are dropped by the run-id check when they fall due.
    pub fn restart(&mut self) {
        self.state.restart();
        self.accumulator_ms = 0;
    }

    /// Movement intent from the input adapter
    pub fn move_player(&mut self, direction: Direction) -> Option<CollisionResult> {
        sim::move_player(&mut self.state, direction)
    }

    /// Run simulation ticks for `dt_ms` of real time. Returns ticks run.
    pub fn update(&mut self, dt_ms: u64) -> u32 {
        if !self.state.is_running() {
            self.accumulator_ms = 0;
            return 0;
        }

        let tick_ms = self.state.tuning.tick_ms;
        // Long stalls (tab hidden, debugger) must not replay as a burst
        let dt_ms = dt_ms.min(tick_ms.saturating_mul(MAX_SUBSTEPS as u64));
        self.accumulator_ms += dt_ms;

        let mut substeps = 0;
        while self.accumulator_ms >= tick_ms && substeps < MAX_SUBSTEPS && self.state.is_running() {
            self.step();
            self.accumulator_ms -= tick_ms;
            substeps += 1;
        }
        substeps
    }

    /// Exactly one tick, then due deferred effects
    pub fn step(&mut self) {
        sim::tick(&mut self.state, &mut self.scheduler);
        sim::fire_due(&mut self.state, &mut self.scheduler);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.state.summary.as_ref()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Deferred effects still waiting to fire
    pub fn pending_effects(&self) -> usize {
        self.scheduler.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AreaPattern, AreaPhase, Axis, DeathCause, Gift, Lane, PowerUp, ProjectileKind, Side};
    use glam::IVec2;

    fn engine(seed: u64) -> Engine {
        let mut engine = Engine::new(seed, Tuning::default());
        engine.start();
        engine
    }

    /// Stop periodic hazards/gifts/power-ups so a scenario is fully scripted
    fn park_cadences(engine: &mut Engine) {
        engine.state.last_hazard_at = Some(u64::MAX);
        engine.state.last_gift_spawn_at = Some(u64::MAX);
        engine.state.last_power_up_at = Some(u64::MAX);
    }

    fn place_gifts(engine: &mut Engine, cells: &[(i32, i32)]) {
        engine.state.gifts.clear();
        for &(x, y) in cells {
            let id = engine.state.next_entity_id();
            engine.state.gifts.push(Gift { id, pos: IVec2::new(x, y) });
        }
    }

    #[test]
    fn test_update_accumulates_partial_ticks() {
        let mut engine = engine(1);
        assert_eq!(engine.update(250), 2);
        assert_eq!(engine.state().clock_ms, 200);
        assert_eq!(engine.update(60), 1);
        assert_eq!(engine.update(30), 0);
    }

    #[test]
    fn test_update_caps_substeps() {
        let mut engine = engine(1);
        park_cadences(&mut engine);
        assert_eq!(engine.update(60_000), MAX_SUBSTEPS);
        assert_eq!(engine.update(0), 0);
    }

    #[test]
    fn test_update_huge_tick_period_does_not_overflow() {
        let tuning = Tuning {
            tick_ms: u64::MAX,
            ..Default::default()
        };
        let mut engine = Engine::new(1, tuning);
        engine.start();
        assert_eq!(engine.update(1000), 0);
        assert_eq!(engine.state().clock_ms, 0);
    }

    #[test]
    fn test_update_idle_does_nothing() {
        let mut engine = Engine::new(1, Tuning::default());
        assert_eq!(engine.update(1000), 0);
        assert_eq!(engine.status(), GameStatus::Idle);
    }

    #[test]
    fn test_determinism() {
        // Two engines with the same seed and intents stay identical
        let mut a = engine(99999);
        let mut b = engine(99999);
        let moves = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        for i in 0..120 {
            if i % 7 == 0 {
                let d = moves[(i / 7) % 4];
                a.move_player(d);
                b.move_player(d);
            }
            a.update(100);
            b.update(100);
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_scenario_gift_pickup_replaces() {
        let mut engine = engine(10);
        assert_eq!(engine.state().player, IVec2::new(3, 3));
        assert_eq!(engine.state().gifts.len(), 3);

        place_gifts(&mut engine, &[(4, 3), (0, 0), (7, 7)]);
        let result = engine.move_player(Direction::Right).unwrap();
        assert_eq!(result.points, 1);
        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.state().gifts.len(), 3);
        assert!(engine.drain_events().contains(&GameEvent::GiftCollected { points: 1 }));
    }

    fn area_scenario(with_bonus: bool) -> Engine {
        let mut engine = engine(20);
        park_cadences(&mut engine);
        engine.state.player = IVec2::new(1, 1);
        if with_bonus {
            engine.state.activate_bonus();
        }
        sim::spawn_area_hazard(&mut engine.state, AreaPattern::Top);

        for _ in 0..15 {
            engine.step();
        }
        let area = engine.state().area_hazard.clone().unwrap();
        assert_eq!(area.phase, AreaPhase::Active);
        assert!(engine.state().is_running());

        engine.step();
        engine
    }

    #[test]
    fn test_scenario_active_area_kills() {
        let engine = area_scenario(false);
        assert_eq!(engine.status(), GameStatus::Ended);
        assert_eq!(engine.summary().unwrap().cause, DeathCause::AreaHazard);
    }

    #[test]
    fn test_scenario_bonus_survives_area() {
        let mut engine = area_scenario(true);
        assert_eq!(engine.status(), GameStatus::Running);
        for _ in 0..14 {
            engine.step();
        }
        assert!(engine.state().area_hazard.is_none());
        assert_eq!(engine.status(), GameStatus::Running);
    }

    #[test]
    fn test_scenario_bonus_doubles_then_expires() {
        let mut engine = engine(30);
        park_cadences(&mut engine);
        place_gifts(&mut engine, &[(5, 3), (5, 0)]);
        engine.state.power_up = Some(PowerUp { id: 900, pos: IVec2::new(4, 3) });

        engine.move_player(Direction::Right);
        assert!(engine.state().bonus.active);
        assert_eq!(engine.state().bonus.remaining_ms, 5000);

        engine.move_player(Direction::Right);
        assert_eq!(engine.state().score, 2);

        for _ in 0..49 {
            engine.step();
        }
        assert!(engine.state().bonus.active);
        engine.step();
        assert!(!engine.state().bonus.active);
        assert_eq!(engine.state().bonus.remaining_ms, 0);

        // back to base score
        place_gifts(&mut engine, &[(5, 2)]);
        engine.move_player(Direction::Up);
        assert_eq!(engine.state().score, 3);
    }

    #[test]
    fn test_scenario_sweeper_eats_gift() {
        let mut engine = engine(40);
        park_cadences(&mut engine);
        place_gifts(&mut engine, &[(2, 0)]);
        sim::telegraph_projectile(
            &mut engine.state,
            &mut engine.scheduler,
            ProjectileKind::Sweeper,
            Lane::new(Axis::Row, 0),
            Side::Low,
        );
        assert_eq!(engine.state().warnings.len(), 8);

        for _ in 0..12 {
            engine.step();
        }
        assert!(engine.state().warnings.is_empty());
        assert_eq!(engine.state().projectiles[0].pos, IVec2::new(-1, 0));

        engine.step();
        engine.step();
        assert_eq!(engine.state().projectiles[0].pos, IVec2::new(1, 0));
        assert_eq!(engine.state().gifts.len(), 1);

        engine.step();
        assert_eq!(engine.state().projectiles[0].pos, IVec2::new(2, 0));
        assert!(engine.state().gifts.is_empty());
    }

    #[test]
    fn test_scenario_restart_is_clean() {
        let mut engine = engine(50);
        engine.state.score = 17;
        engine.state.hazard_cooldown = -2;
        sim::spawn_area_hazard(&mut engine.state, AreaPattern::Left);
        sim::telegraph_projectile(
            &mut engine.state,
            &mut engine.scheduler,
            ProjectileKind::Carrier,
            Lane::new(Axis::Column, 3),
            Side::High,
        );
        engine.state.end(DeathCause::Projectile(ProjectileKind::Carrier));
        assert_eq!(engine.pending_effects(), 1);

        engine.restart();
        let state = engine.state();
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.hazard_cooldown, 5);
        assert!(state.area_hazard.is_none());
        assert!(state.warnings.is_empty());
        assert!(state.projectiles.is_empty());
        assert!(state.ground_hazards.is_empty());
        assert_eq!(state.gifts.len(), 3);

        // The stale launch comes due while the new run is Running: dropped
        park_cadences(&mut engine);
        for _ in 0..12 {
            engine.step();
        }
        assert_eq!(engine.pending_effects(), 0);
        assert!(engine.state().projectiles.is_empty());
        assert!(engine.state().is_running());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut engine = engine(60);
        engine.update(100);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, GameStatus::Running);
        assert_eq!(snapshot.clock_ms, 100);
        assert_eq!(snapshot.gifts, engine.state().gifts);
        assert_eq!(snapshot.warnings.len(), engine.state().warnings.len());
    }
}
