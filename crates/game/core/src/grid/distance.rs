//! Multi-source breadth-first distance fields.

use std::collections::VecDeque;

use super::{Direction, Grid};
use crate::state::Position;

/// Sentinel stored for cells no seed could reach.
pub const UNREACHED: i32 = -1;

/// Per-cell step count from the nearest seed.
///
/// Expansion is directional: the `enterable(from, to)` predicate decides
/// whether the walk may move from an already reached cell into a neighbour,
/// so walls can be made to stop expansion either on entry or on exit.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceField {
    distances: Grid<i32>,
}

impl DistanceField {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            distances: Grid::filled(width, height, UNREACHED),
        }
    }

    /// Resets every cell to [`UNREACHED`].
    pub fn clear(&mut self) {
        self.distances.fill(UNREACHED);
    }

    /// Recomputes the field from `seeds`, which all start at distance zero.
    ///
    /// Seeds outside the grid are ignored.
    pub fn compute<I, F>(&mut self, seeds: I, directions: &[Direction], mut enterable: F)
    where
        I: IntoIterator<Item = Position>,
        F: FnMut(Position, Position) -> bool,
    {
        self.clear();
        let mut queue = VecDeque::new();
        for seed in seeds {
            if self.distances.get(seed) == Some(&UNREACHED) {
                self.distances[seed] = 0;
                queue.push_back(seed);
            }
        }

        while let Some(current) = queue.pop_front() {
            let next = self.distances[current] + 1;
            for &direction in directions {
                let neighbour = current.step(direction);
                if self.distances.get(neighbour) != Some(&UNREACHED)
                    || !enterable(current, neighbour)
                {
                    continue;
                }
                self.distances[neighbour] = next;
                queue.push_back(neighbour);
            }
        }
    }

    /// Distance of `position`, or `None` when unreached or out of bounds.
    pub fn distance(&self, position: Position) -> Option<u32> {
        match self.raw(position) {
            UNREACHED => None,
            d => Some(d as u32),
        }
    }

    /// Raw stored value, [`UNREACHED`] for cells outside the grid.
    pub fn raw(&self, position: Position) -> i32 {
        self.distances.get(position).copied().unwrap_or(UNREACHED)
    }

    pub fn is_reached(&self, position: Position) -> bool {
        self.raw(position) != UNREACHED
    }

    /// Reached cells that are not seeds, with their distance.
    pub fn frontier(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        self.distances
            .iter()
            .filter(|(_, d)| **d > 0)
            .map(|(position, d)| (position, *d as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_seed_on_open_grid_is_chebyshev() {
        for (width, height) in [(1, 1), (5, 3), (9, 9), (12, 4)] {
            let mut field = DistanceField::new(width, height);
            let seed = Position::new(width as i32 / 2, height as i32 / 3);
            field.compute([seed], &Direction::ALL, |_, _| true);

            let grid = Grid::filled(width, height, ());
            for position in grid.positions() {
                assert_eq!(field.distance(position), Some(seed.chebyshev_distance(position)));
            }
        }
    }

    #[test]
    fn cardinal_expansion_is_manhattan() {
        let mut field = DistanceField::new(5, 5);
        field.compute([Position::new(0, 0)], &Direction::CARDINAL, |_, _| true);
        assert_eq!(field.distance(Position::new(4, 4)), Some(8));
    }

    #[test]
    fn isolated_cells_stay_unreached() {
        // column x = 2 is a wall that cannot be entered
        let mut field = DistanceField::new(5, 3);
        field.compute([Position::new(0, 1)], &Direction::ALL, |_, to| to.x != 2);
        assert_eq!(field.raw(Position::new(2, 0)), UNREACHED);
        assert_eq!(field.raw(Position::new(4, 2)), UNREACHED);
        assert_eq!(field.distance(Position::new(1, 2)), Some(1));
        assert_eq!(field.raw(Position::new(-1, 0)), UNREACHED);
    }

    #[test]
    fn exit_blocking_marks_walls_but_not_beyond() {
        // leaving the wall column is forbidden, entering it is fine
        let mut field = DistanceField::new(5, 1);
        field.compute([Position::new(0, 0)], &Direction::ALL, |from, _| from.x != 2);
        assert_eq!(field.distance(Position::new(2, 0)), Some(2));
        assert!(!field.is_reached(Position::new(3, 0)));
        let frontier: Vec<_> = field.frontier().collect();
        assert_eq!(frontier, vec![(Position::new(1, 0), 1), (Position::new(2, 0), 2)]);
    }

    #[test]
    fn multiple_seeds_take_the_nearest() {
        let mut field = DistanceField::new(7, 1);
        field.compute(
            [Position::new(0, 0), Position::new(6, 0)],
            &Direction::ALL,
            |_, _| true,
        );
        let values: Vec<_> = (0..7).map(|x| field.raw(Position::new(x, 0))).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 2, 1, 0]);
    }
}
