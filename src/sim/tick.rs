//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one tick period. Sub-steps
//! run in a fixed order and mutate the live collections as they go; checks
//! marked "snapshot" read the values captured at the start of the tick.

use glam::IVec2;
use rand::Rng;

use super::collision::{self, CollisionResult};
use super::director;
use super::grid::{Direction, in_grid};
use super::scheduler::Scheduler;
use super::state::{
    AreaPhase, DeathCause, GameEvent, GameState, Gift, GroundHazard, Projectile, ProjectileKind,
};

/// Start-of-tick values shared by the sub-steps
#[derive(Debug, Clone)]
struct TickSnapshot {
    bonus_active: bool,
    score: u64,
    player: IVec2,
    gift_cells: Vec<IVec2>,
    ground_cells: Vec<IVec2>,
    area_present: bool,
}

impl TickSnapshot {
    fn capture(state: &GameState) -> Self {
        Self {
            bonus_active: state.bonus.active,
            score: state.score,
            player: state.player,
            gift_cells: state.gifts.iter().map(|g| g.pos).collect(),
            ground_cells: state.ground_hazards.iter().map(|t| t.pos).collect(),
            area_present: state.area_hazard.is_some(),
        }
    }
}

/// Advance the game state by one fixed timestep
///
/// Does nothing unless the session is running. A lethal hit mid-tick ends
/// the run but the remaining sub-steps still complete.
pub fn tick(state: &mut GameState, scheduler: &mut Scheduler) {
    if !state.is_running() {
        return;
    }

    state.clock_ms += state.tuning.tick_ms;
    let now = state.clock_ms;
    let snap = TickSnapshot::capture(state);

    update_bonus(state);
    hazard_cadence(state, scheduler, &snap, now);
    gift_cadence(state, &snap, now);
    power_up_cadence(state, &snap, now);
    if snap.area_present {
        update_area_hazard(state, &snap);
    }
    update_ground_hazards(state, &snap, now);
    update_projectiles(state, &snap, now);
}

/// Apply a movement intent
///
/// Ignored unless running; clamped to the field; a move that leaves the
/// player where it was is a no-op. Returns the collision outcome of an
/// accepted move.
pub fn move_player(state: &mut GameState, direction: Direction) -> Option<CollisionResult> {
    if !state.is_running() {
        return None;
    }
    let next = direction.apply_clamped(state.player);
    if next == state.player {
        return None;
    }
    state.player = next;
    Some(collision::resolve(state, next))
}

/// Whether an interval has elapsed (strictly) since `last`; never-run fires
fn elapsed(last: Option<u64>, now: u64, interval_ms: u64) -> bool {
    last.is_none_or(|t| now.saturating_sub(t) > interval_ms)
}

fn update_bonus(state: &mut GameState) {
    if !state.bonus.active {
        return;
    }
    let tick_ms = state.tuning.tick_ms;
    if state.bonus.remaining_ms <= tick_ms {
        state.bonus.remaining_ms = 0;
        state.bonus.active = false;
        state.push_event(GameEvent::BonusExpired);
        log::debug!("Bonus mode expired");
    } else {
        state.bonus.remaining_ms -= tick_ms;
    }
}

fn hazard_cadence(state: &mut GameState, scheduler: &mut Scheduler, snap: &TickSnapshot, now: u64) {
    let interval = state.tuning.hazard_interval_ms(snap.score);
    if elapsed(state.last_hazard_at, now, interval) {
        state.last_hazard_at = Some(now);
        let obstacle = director::trigger_obstacle(state, scheduler);
        log::trace!("t={} interval={} -> {:?}", now, interval, obstacle);
    }
}

fn gift_cadence(state: &mut GameState, snap: &TickSnapshot, now: u64) {
    if elapsed(state.last_gift_spawn_at, now, state.tuning.gift_spawn_interval_ms) {
        state.last_gift_spawn_at = Some(now);
        if snap.gift_cells.len() < state.tuning.max_gifts {
            state.spawn_gifts(1);
        }
    }
}

fn power_up_cadence(state: &mut GameState, snap: &TickSnapshot, now: u64) {
    if state.power_up.is_some() || snap.bonus_active {
        return;
    }
    if elapsed(state.last_power_up_at, now, state.tuning.power_up_interval_ms) {
        if state.rng.random_bool(state.tuning.power_up_chance) {
            state.spawn_power_up();
        }
        state.last_power_up_at = Some(now);
    }
}

fn update_area_hazard(state: &mut GameState, snap: &TickSnapshot) {
    let tick_ms = state.tuning.tick_ms;
    let active_ms = state.tuning.area_active_ms;
    let Some(area) = state.area_hazard.as_mut() else {
        return;
    };

    match area.phase {
        AreaPhase::Warning => {
            if area.timer_ms <= tick_ms {
                area.phase = AreaPhase::Active;
                area.timer_ms = active_ms;
                let pattern = area.pattern;
                state.push_event(GameEvent::AreaHazardActive { pattern });
                log::debug!("Area hazard {:?} active", pattern);
            } else {
                area.timer_ms -= tick_ms;
            }
        }
        AreaPhase::Active => {
            let expired = area.timer_ms <= tick_ms;
            area.timer_ms = area.timer_ms.saturating_sub(tick_ms);
            let pattern = area.pattern;

            // Lethal check sees the hazard before this tick's countdown
            if !snap.bonus_active && pattern.contains(snap.player) {
                state.end(DeathCause::AreaHazard);
            }
            if expired {
                state.area_hazard = None;
                state.push_event(GameEvent::AreaHazardCleared);
            }
        }
    }
}

fn update_ground_hazards(state: &mut GameState, snap: &TickSnapshot, now: u64) {
    state.ground_hazards.retain(|t| t.expires_at_ms > now);
    if !snap.bonus_active && collision::ground_hit(state, snap.player) {
        state.end(DeathCause::GroundHazard);
    }
}

fn update_projectiles(state: &mut GameState, snap: &TickSnapshot, now: u64) {
    let moving = std::mem::take(&mut state.projectiles);
    let mut kept = Vec::with_capacity(moving.len());

    for mut projectile in moving {
        let next = projectile.pos + projectile.dir;
        if !Projectile::in_travel_range(next) {
            continue;
        }
        projectile.pos = next;

        match projectile.kind {
            ProjectileKind::Sweeper => consume_gifts(state, next),
            ProjectileKind::Carrier => carrier_drop(state, &mut projectile, snap, now),
        }

        if !snap.bonus_active && next == snap.player {
            state.end(DeathCause::Projectile(projectile.kind));
        }
        kept.push(projectile);
    }

    state.projectiles = kept;
}

fn consume_gifts(state: &mut GameState, cell: IVec2) {
    let before = state.gifts.len();
    state.gifts.retain(|g| g.pos != cell);
    if state.gifts.len() != before {
        state.push_event(GameEvent::GiftConsumed { pos: cell });
    }
}

/// Maybe drop a gift or ground hazard under a carrier
///
/// Occupancy is judged against the start-of-tick player, gifts and ground
/// hazards. A gift drop at the cap is skipped and does not count.
fn carrier_drop(state: &mut GameState, projectile: &mut Projectile, snap: &TickSnapshot, now: u64) {
    let cell = projectile.pos;
    let occupied =
        snap.player == cell || snap.gift_cells.contains(&cell) || snap.ground_cells.contains(&cell);
    if occupied || !in_grid(cell) {
        return;
    }
    if projectile.drop_count >= state.tuning.max_carrier_drops
        || !state.rng.random_bool(state.tuning.carrier_drop_chance)
    {
        return;
    }

    if state.rng.random_bool(state.tuning.carrier_gift_chance) {
        if state.gifts.len() >= state.tuning.max_gifts {
            return;
        }
        let id = state.next_entity_id();
        state.gifts.push(Gift { id, pos: cell });
    } else {
        let id = state.next_entity_id();
        state.ground_hazards.push(GroundHazard {
            id,
            pos: cell,
            created_at_ms: now,
            expires_at_ms: now + state.tuning.ground_hazard_ms,
        });
        state.push_event(GameEvent::GroundHazardDropped { pos: cell });
    }
    projectile.drop_count += 1;
}
