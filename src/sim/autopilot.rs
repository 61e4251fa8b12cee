//! Idle/demo mode - a simple AI that plays the game
//!
//! Greedy one-step lookahead: stay off anything that is or is about to be
//! lethal, otherwise walk toward the nearest pickup.

use glam::IVec2;

use super::grid::{Direction, in_grid};
use super::state::GameState;

/// Cost of stepping onto a cell that is (or is about to be) lethal
const DANGER: i32 = 1000;

/// Pick the next move, or `None` to stay put
pub fn choose_move(state: &GameState) -> Option<Direction> {
    if !state.is_running() {
        return None;
    }

    let danger = danger_cells(state);
    let targets: Vec<IVec2> = state
        .gifts
        .iter()
        .map(|g| g.pos)
        .chain(state.power_up.iter().map(|p| p.pos))
        .collect();

    let cost = |cell: IVec2| -> i32 {
        let threat = if danger.contains(&cell) && !state.bonus.active {
            DANGER
        } else {
            0
        };
        let distance = targets
            .iter()
            .map(|t| (*t - cell).abs().element_sum())
            .min()
            .unwrap_or(0);
        threat + distance
    };

    let mut best: Option<Direction> = None;
    let mut best_cost = cost(state.player);
    for direction in Direction::ALL {
        let next = direction.apply_clamped(state.player);
        if next == state.player {
            continue;
        }
        let c = cost(next);
        if c < best_cost {
            best_cost = c;
            best = Some(direction);
        }
    }
    best
}

/// Cells that are lethal now or will be within the next tick or telegraph
fn danger_cells(state: &GameState) -> Vec<IVec2> {
    let mut cells = Vec::new();

    if let Some(area) = &state.area_hazard {
        cells.extend(area.pattern.cells());
    }
    cells.extend(state.ground_hazards.iter().map(|t| t.pos));
    for p in &state.projectiles {
        cells.push(p.pos);
        cells.push(p.pos + p.dir);
    }
    cells.extend(state.warnings.iter().map(|w| w.pos));

    cells.retain(|c| in_grid(*c));
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::AreaPattern;
    use crate::sim::state::{AreaHazard, AreaPhase, Gift};
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut state = GameState::new(5, Tuning::default());
        state.start();
        state.gifts.clear();
        state
    }

    #[test]
    fn test_walks_toward_nearest_gift() {
        let mut state = running();
        state.gifts.push(Gift { id: 100, pos: IVec2::new(3, 6) });
        assert_eq!(choose_move(&state), Some(Direction::Down));
    }

    #[test]
    fn test_stays_when_nothing_to_do() {
        let state = running();
        assert_eq!(choose_move(&state), None);
    }

    #[test]
    fn test_leaves_warned_area() {
        let mut state = running();
        state.player = IVec2::new(2, 4);
        state.area_hazard = Some(AreaHazard {
            pattern: AreaPattern::Bottom,
            phase: AreaPhase::Warning,
            timer_ms: 1500,
        });
        assert_eq!(choose_move(&state), Some(Direction::Up));
    }

    #[test]
    fn test_idle_when_not_running() {
        let state = GameState::new(5, Tuning::default());
        assert_eq!(choose_move(&state), None);
    }
}
