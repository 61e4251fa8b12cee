//! Obstacle director: picks and sets up the next hazard
//!
//! One call per hazard-selection cycle. The area hazard is gated by a
//! cooldown counted in cycles; projectiles are telegraphed along a lane and
//! launched by a deferred effect once the telegraph elapses.

use rand::Rng;

use super::grid::{AreaPattern, Lane, Side};
use super::scheduler::{DeferredEffect, Launch, Scheduler};
use super::state::{AreaHazard, AreaPhase, GameEvent, GameState, Projectile, ProjectileKind, Warning};
use crate::consts::LANE_REPEAT_ATTEMPTS;

/// Outcome of one hazard-selection cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obstacle {
    Area(AreaPattern),
    Projectile(ProjectileKind),
}

/// Run one hazard-selection cycle
pub fn trigger_obstacle(state: &mut GameState, scheduler: &mut Scheduler) -> Obstacle {
    let area_chance = state.tuning.area_chance;
    let sweeper_chance = state.tuning.sweeper_chance;

    let area = state.hazard_cooldown <= 0 && state.rng.random_bool(area_chance);
    if area {
        let pattern = AreaPattern::random(&mut state.rng);
        spawn_area_hazard(state, pattern);
        return Obstacle::Area(pattern);
    }

    let kind = if state.rng.random_bool(sweeper_chance) {
        ProjectileKind::Sweeper
    } else {
        ProjectileKind::Carrier
    };
    let lane = pick_lane(state);
    let side = if state.rng.random_bool(0.5) { Side::Low } else { Side::High };
    telegraph_projectile(state, scheduler, kind, lane, side);
    Obstacle::Projectile(kind)
}

/// Start an area hazard in its warning phase and reset the cooldown
pub fn spawn_area_hazard(state: &mut GameState, pattern: AreaPattern) {
    state.hazard_cooldown = state.tuning.area_cooldown_cycles;
    state.area_hazard = Some(AreaHazard {
        pattern,
        phase: AreaPhase::Warning,
        timer_ms: state.tuning.area_warning_ms,
    });
    state.push_event(GameEvent::AreaHazardWarning { pattern });
    log::debug!("Area hazard {:?} warning", pattern);
}

/// Random lane, redrawn a bounded number of times to avoid repeating the
/// previous projectile's exact lane. The last draw wins on exhaustion.
fn pick_lane(state: &mut GameState) -> Lane {
    let mut lane = Lane::random(&mut state.rng);
    let mut attempts = 1;
    while attempts < LANE_REPEAT_ATTEMPTS && state.last_lane == Some(lane) {
        lane = Lane::random(&mut state.rng);
        attempts += 1;
    }
    lane
}

/// Emit warnings along `lane` and schedule the projectile launch
///
/// Counts as a projectile cycle: the area cooldown ticks down (it may go
/// negative) and the lane becomes the one to avoid next time.
pub fn telegraph_projectile(
    state: &mut GameState,
    scheduler: &mut Scheduler,
    kind: ProjectileKind,
    lane: Lane,
    side: Side,
) {
    state.hazard_cooldown -= 1;
    state.last_lane = Some(lane);

    let batch_id = state.next_entity_id();
    let direction = lane.direction(side);
    let expires_at_ms = state.clock_ms + state.tuning.projectile_telegraph_ms;
    for pos in lane.cells() {
        let id = state.next_entity_id();
        state.warnings.push(Warning {
            id,
            batch_id,
            pos,
            kind,
            direction,
            expires_at_ms,
        });
    }

    scheduler.schedule(
        state.run_id,
        expires_at_ms,
        DeferredEffect::LaunchProjectile(Launch {
            batch_id,
            kind,
            start: lane.entry_cell(side),
            direction,
        }),
    );
    state.push_event(GameEvent::ProjectileWarning { kind, lane });
    log::debug!("{:?} telegraphed on {:?} heading {:?}", kind, lane, direction);
}

/// Materialize a telegraphed projectile
///
/// Stale launches (another run, or the run already over) are dropped.
/// Returns whether the projectile was created.
pub fn launch_projectile(state: &mut GameState, run_id: u32, launch: &Launch) -> bool {
    if !state.is_running() || run_id != state.run_id {
        log::trace!("Dropping stale launch for batch {} (run {})", launch.batch_id, run_id);
        return false;
    }

    state.warnings.retain(|w| w.batch_id != launch.batch_id);
    state.projectiles.push(Projectile {
        id: launch.batch_id,
        kind: launch.kind,
        pos: launch.start,
        dir: launch.direction.delta(),
        drop_count: 0,
    });
    state.push_event(GameEvent::ProjectileLaunched { kind: launch.kind });
    true
}

/// Apply every due deferred effect to the session
pub fn fire_due(state: &mut GameState, scheduler: &mut Scheduler) {
    for deferred in scheduler.take_due(state.clock_ms) {
        match &deferred.effect {
            DeferredEffect::LaunchProjectile(launch) => {
                launch_projectile(state, deferred.run_id, launch);
            }
        }
    }
}
