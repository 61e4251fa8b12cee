//! Collision resolution between the player cell and every entity category
//!
//! Pickups are applied independently of each other and of any lethal hit in
//! the same pass; nothing is rolled back. Lethal checks are skipped while the
//! bonus was active at the start of the pass.

use glam::IVec2;

use super::state::{DeathCause, GameEvent, GameState, ProjectileKind};

/// What a resolution pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionResult {
    /// Points gained from a gift pickup
    pub points: u64,
    pub power_up: bool,
    /// Lethal hit that ended the run
    pub lethal: Option<DeathCause>,
}

/// Resolve every interaction for the player standing on `cell`
pub fn resolve(state: &mut GameState, cell: IVec2) -> CollisionResult {
    let bonus_active = state.bonus.active;
    let mut result = CollisionResult::default();

    if let Some(index) = state.gift_index_at(cell) {
        state.gifts.remove(index);
        let points = state.tuning.gift_points(bonus_active);
        state.score += points;
        state.push_event(GameEvent::GiftCollected { points });
        state.spawn_gifts(1);
        result.points = points;
    }

    if state.power_up.as_ref().is_some_and(|p| p.pos == cell) {
        state.power_up = None;
        state.activate_bonus();
        state.push_event(GameEvent::PowerUpCollected);
        log::debug!("Bonus mode on for {}ms", state.tuning.bonus_duration_ms);
        result.power_up = true;
    }

    if !bonus_active {
        result.lethal = lethal_hit(state, cell);
        if let Some(cause) = result.lethal {
            state.end(cause);
        }
    }

    result
}

/// First lethal hazard occupying `cell`: area, then ground, then projectile
pub fn lethal_hit(state: &GameState, cell: IVec2) -> Option<DeathCause> {
    if area_hit(state, cell) {
        return Some(DeathCause::AreaHazard);
    }
    if ground_hit(state, cell) {
        return Some(DeathCause::GroundHazard);
    }
    projectile_hit(state, cell).map(DeathCause::Projectile)
}

/// Active area hazard covers the cell
pub fn area_hit(state: &GameState, cell: IVec2) -> bool {
    state.area_hazard.as_ref().is_some_and(|a| a.covers(cell))
}

pub fn ground_hit(state: &GameState, cell: IVec2) -> bool {
    state.ground_hazards.iter().any(|t| t.pos == cell)
}

/// Kind of the first projectile on the cell
pub fn projectile_hit(state: &GameState, cell: IVec2) -> Option<ProjectileKind> {
    state.projectiles.iter().find(|p| p.pos == cell).map(|p| p.kind)
}
