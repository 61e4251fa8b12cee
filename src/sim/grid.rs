//! Grid geometry: cells, directions, area patterns and random placement
//!
//! The field is GRID_SIZE x GRID_SIZE integer cells with (0, 0) top-left,
//! x growing right and y growing down.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{EMPTY_CELL_ATTEMPTS, GRID_SIZE};

/// Whether a cell lies on the playable field
#[inline]
pub fn in_grid(cell: IVec2) -> bool {
    cell.x >= 0 && cell.x < GRID_SIZE && cell.y >= 0 && cell.y < GRID_SIZE
}

/// Clamp a cell onto the playable field
#[inline]
pub fn clamp_to_grid(cell: IVec2) -> IVec2 {
    cell.clamp(IVec2::ZERO, IVec2::splat(GRID_SIZE - 1))
}

/// Pick a uniformly random cell not in `exclude`
///
/// Best effort: after `EMPTY_CELL_ATTEMPTS` colliding samples the last sample
/// is returned anyway, so a crowded board never blocks placement.
pub fn random_empty_cell<R: Rng + ?Sized>(rng: &mut R, exclude: &[IVec2]) -> IVec2 {
    let mut cell = random_cell(rng);
    let mut attempts = 1;
    while exclude.contains(&cell) && attempts < EMPTY_CELL_ATTEMPTS {
        cell = random_cell(rng);
        attempts += 1;
    }
    cell
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R) -> IVec2 {
    IVec2::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE))
}

/// Movement / travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit step for this direction
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    /// Step one cell, staying on the field
    pub fn apply_clamped(self, cell: IVec2) -> IVec2 {
        clamp_to_grid(cell + self.delta())
    }
}

/// Which axis a projectile lane runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal lane, index is the y coordinate
    Row,
    /// Vertical lane, index is the x coordinate
    Column,
}

/// A full row or column of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub axis: Axis,
    pub index: i32,
}

impl Lane {
    pub fn new(axis: Axis, index: i32) -> Self {
        Self { axis, index }
    }

    /// Uniformly random axis and index
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let axis = if rng.random_bool(0.5) { Axis::Row } else { Axis::Column };
        Self::new(axis, rng.random_range(0..GRID_SIZE))
    }

    /// Cells of the lane in increasing coordinate order
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..GRID_SIZE).map(move |i| match self.axis {
            Axis::Row => IVec2::new(i, self.index),
            Axis::Column => IVec2::new(self.index, i),
        })
    }

    /// Travel direction for an entry from the low side (left/top) or high side
    pub fn direction(&self, side: Side) -> Direction {
        match (self.axis, side) {
            (Axis::Row, Side::Low) => Direction::Right,
            (Axis::Row, Side::High) => Direction::Left,
            (Axis::Column, Side::Low) => Direction::Down,
            (Axis::Column, Side::High) => Direction::Up,
        }
    }

    /// Cell just outside the field where a projectile entering from `side` starts
    pub fn entry_cell(&self, side: Side) -> IVec2 {
        let along = match side {
            Side::Low => -1,
            Side::High => GRID_SIZE,
        };
        match self.axis {
            Axis::Row => IVec2::new(along, self.index),
            Axis::Column => IVec2::new(self.index, along),
        }
    }
}

/// Entry side of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Left edge for rows, top edge for columns
    Low,
    /// Right edge for rows, bottom edge for columns
    High,
}

/// Region covered by an area hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaPattern {
    Top,
    Bottom,
    Left,
    Right,
    TriTopLeft,
    TriTopRight,
    TriBottomLeft,
    TriBottomRight,
}

impl AreaPattern {
    pub const ALL: [AreaPattern; 8] = [
        AreaPattern::Top,
        AreaPattern::Bottom,
        AreaPattern::Left,
        AreaPattern::Right,
        AreaPattern::TriTopLeft,
        AreaPattern::TriTopRight,
        AreaPattern::TriBottomLeft,
        AreaPattern::TriBottomRight,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Check if a cell is covered by this pattern
    ///
    /// Half-planes split at GRID_SIZE / 2. Triangles include their diagonal,
    /// so opposite triangles overlap on it.
    pub fn contains(self, cell: IVec2) -> bool {
        let half = GRID_SIZE / 2;
        let last = GRID_SIZE - 1;
        let IVec2 { x, y } = cell;
        match self {
            AreaPattern::Top => y < half,
            AreaPattern::Bottom => y >= half,
            AreaPattern::Left => x < half,
            AreaPattern::Right => x >= half,
            AreaPattern::TriTopLeft => x + y <= last,
            AreaPattern::TriBottomRight => x + y >= last,
            AreaPattern::TriTopRight => x >= y,
            AreaPattern::TriBottomLeft => x <= y,
        }
    }

    /// Field cells covered by this pattern
    pub fn cells(self) -> impl Iterator<Item = IVec2> {
        (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| IVec2::new(x, y)))
            .filter(move |&c| self.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_half_planes_cover_half_the_grid() {
        for pattern in [AreaPattern::Top, AreaPattern::Bottom, AreaPattern::Left, AreaPattern::Right] {
            assert_eq!(pattern.cells().count(), 32, "{:?}", pattern);
        }
        assert!(AreaPattern::Top.contains(IVec2::new(5, 1)));
        assert!(!AreaPattern::Top.contains(IVec2::new(5, 4)));
        assert!(AreaPattern::Right.contains(IVec2::new(4, 0)));
    }

    #[test]
    fn test_triangles_include_diagonal() {
        // 8 diagonal cells + 28 strictly on one side
        for pattern in [
            AreaPattern::TriTopLeft,
            AreaPattern::TriTopRight,
            AreaPattern::TriBottomLeft,
            AreaPattern::TriBottomRight,
        ] {
            assert_eq!(pattern.cells().count(), 36, "{:?}", pattern);
        }
        assert!(AreaPattern::TriTopLeft.contains(IVec2::new(0, 7)));
        assert!(AreaPattern::TriBottomRight.contains(IVec2::new(0, 7)));
        assert!(!AreaPattern::TriTopLeft.contains(IVec2::new(7, 7)));
        assert!(AreaPattern::TriTopRight.contains(IVec2::new(7, 0)));
        assert!(!AreaPattern::TriBottomLeft.contains(IVec2::new(7, 0)));
    }

    #[test]
    fn test_random_empty_cell_avoids_exclusions() {
        let mut rng = Pcg32::seed_from_u64(7);
        let exclude: Vec<IVec2> = (0..GRID_SIZE).map(|x| IVec2::new(x, 0)).collect();
        for _ in 0..200 {
            let cell = random_empty_cell(&mut rng, &exclude);
            assert!(in_grid(cell));
            assert!(!exclude.contains(&cell));
        }
    }

    #[test]
    fn test_random_empty_cell_full_board_returns_some_cell() {
        let mut rng = Pcg32::seed_from_u64(7);
        let everything: Vec<IVec2> = AreaPattern::Top
            .cells()
            .chain(AreaPattern::Bottom.cells())
            .collect();
        let mut replay = rng.clone();

        let cell = random_empty_cell(&mut rng, &everything);

        // Gives up after the attempt budget and hands back the final draw
        let mut last = random_cell(&mut replay);
        for _ in 1..EMPTY_CELL_ATTEMPTS {
            last = random_cell(&mut replay);
        }
        assert!(in_grid(cell));
        assert_eq!(cell, last);
        assert_eq!(rng, replay);
    }

    #[test]
    fn test_lane_entry_and_direction() {
        let row = Lane::new(Axis::Row, 2);
        assert_eq!(row.entry_cell(Side::Low), IVec2::new(-1, 2));
        assert_eq!(row.entry_cell(Side::High), IVec2::new(GRID_SIZE, 2));
        assert_eq!(row.direction(Side::High), Direction::Left);

        let col = Lane::new(Axis::Column, 5);
        assert_eq!(col.entry_cell(Side::Low), IVec2::new(5, -1));
        assert_eq!(col.direction(Side::Low), Direction::Down);
        assert!(col.cells().all(|c| c.x == 5));
        assert_eq!(col.cells().count(), GRID_SIZE as usize);
    }

    #[test]
    fn test_direction_clamps_at_edges() {
        assert_eq!(Direction::Up.apply_clamped(IVec2::new(0, 0)), IVec2::new(0, 0));
        assert_eq!(Direction::Right.apply_clamped(IVec2::new(7, 3)), IVec2::new(7, 3));
        assert_eq!(Direction::Down.apply_clamped(IVec2::new(2, 3)), IVec2::new(2, 4));
    }

    proptest! {
        #[test]
        fn prop_opposite_patterns_cover_field(x in 0..GRID_SIZE, y in 0..GRID_SIZE) {
            let c = IVec2::new(x, y);
            prop_assert!(AreaPattern::Top.contains(c) != AreaPattern::Bottom.contains(c));
            prop_assert!(AreaPattern::Left.contains(c) != AreaPattern::Right.contains(c));
            prop_assert!(AreaPattern::TriTopLeft.contains(c) || AreaPattern::TriBottomRight.contains(c));
            prop_assert!(AreaPattern::TriTopRight.contains(c) || AreaPattern::TriBottomLeft.contains(c));
        }

        #[test]
        fn prop_clamped_step_stays_on_field(x in 0..GRID_SIZE, y in 0..GRID_SIZE, d in 0usize..4) {
            let from = IVec2::new(x, y);
            let to = Direction::ALL[d].apply_clamped(from);
            prop_assert!(in_grid(to));
            prop_assert!((to - from).abs().element_sum() <= 1);
        }
    }
}
