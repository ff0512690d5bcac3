//! Connected-component exploration over a [`Grid`].
//!
//! Two cells are joined when the caller's comparator returns
//! [`Ordering::Equal`] for them, so "both solid" and "both open" style
//! partitions need nothing more than a key comparison.

use std::cmp::Ordering;
use std::collections::VecDeque;

use super::{Direction, Grid};
use crate::state::Position;

/// Optional bound on how far a flood fill may travel from its origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Radius {
    Chebyshev(u32),
    Euclidean(f32),
}

impl Radius {
    fn admits(self, origin: Position, position: Position) -> bool {
        match self {
            Radius::Chebyshev(limit) => origin.chebyshev_distance(position) <= limit,
            Radius::Euclidean(limit) => origin.euclidean_distance(position) <= limit,
        }
    }
}

/// Pops the next cell of a breadth-first walk and enqueues its compatible,
/// unvisited neighbours. Shared by [`FloodFill`] and [`Regions`].
fn visit_next<T, F>(
    grid: &Grid<T>,
    visited: &mut Grid<bool>,
    queue: &mut VecDeque<Position>,
    directions: &[Direction],
    compare: &F,
    admits: impl Fn(Position) -> bool,
) -> Option<Position>
where
    F: Fn(&T, &T) -> Ordering,
{
    let current = queue.pop_front()?;
    for (_, neighbour) in grid.neighbours(current, directions) {
        if visited[neighbour] || !admits(neighbour) {
            continue;
        }
        if compare(&grid[current], &grid[neighbour]) == Ordering::Equal {
            visited[neighbour] = true;
            queue.push_back(neighbour);
        }
    }
    Some(current)
}

/// Lazy breadth-first walk over the region containing a start cell.
pub struct FloodFill<'a, T, F> {
    grid: &'a Grid<T>,
    directions: &'a [Direction],
    origin: Position,
    radius: Option<Radius>,
    compare: F,
    visited: Grid<bool>,
    queue: VecDeque<Position>,
}

impl<'a, T, F> FloodFill<'a, T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(
        grid: &'a Grid<T>,
        origin: Position,
        directions: &'a [Direction],
        radius: Option<Radius>,
        compare: F,
    ) -> Self {
        let mut visited = Grid::filled(grid.width(), grid.height(), false);
        let mut queue = VecDeque::new();
        if grid.contains(origin) {
            visited[origin] = true;
            queue.push_back(origin);
        }
        Self {
            grid,
            directions,
            origin,
            radius,
            compare,
            visited,
            queue,
        }
    }
}

impl<T, F> Iterator for FloodFill<'_, T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let origin = self.origin;
        let radius = self.radius;
        visit_next(
            self.grid,
            &mut self.visited,
            &mut self.queue,
            self.directions,
            &self.compare,
            |p| radius.is_none_or(|r| r.admits(origin, p)),
        )
    }
}

/// A maximal set of mutually reachable cells, in discovery order.
///
/// The cells are collected in full when [`Regions`] yields the region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region(pub Vec<Position>);

impl Region {
    pub fn cells(&self) -> &[Position] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Partition of a whole grid into [`Region`]s, one region per `next`.
///
/// Regions are produced in row-major order of their first cell and every
/// cell appears in exactly one of them.
pub struct Regions<'a, T, F> {
    grid: &'a Grid<T>,
    directions: &'a [Direction],
    compare: F,
    visited: Grid<bool>,
    queue: VecDeque<Position>,
    cursor: usize,
}

impl<'a, T, F> Regions<'a, T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(grid: &'a Grid<T>, directions: &'a [Direction], compare: F) -> Self {
        Self {
            grid,
            directions,
            compare,
            visited: Grid::filled(grid.width(), grid.height(), false),
            queue: VecDeque::new(),
            cursor: 0,
        }
    }
}

impl<T, F> Iterator for Regions<'_, T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        let width = self.grid.width() as usize;
        let seed = loop {
            if self.cursor >= self.grid.len() {
                return None;
            }
            let candidate = Position::new(
                (self.cursor % width) as i32,
                (self.cursor / width) as i32,
            );
            self.cursor += 1;
            if !self.visited[candidate] {
                break candidate;
            }
        };

        self.visited[seed] = true;
        self.queue.push_back(seed);

        let mut cells = Vec::new();
        while let Some(cell) = visit_next(
            self.grid,
            &mut self.visited,
            &mut self.queue,
            self.directions,
            &self.compare,
            |_| true,
        ) {
            cells.push(cell);
        }
        Some(Region(cells))
    }
}

impl<T> Grid<T> {
    /// Walks the region containing `origin`, optionally bounded by `radius`.
    pub fn flood_fill<'a, F>(
        &'a self,
        origin: Position,
        directions: &'a [Direction],
        radius: Option<Radius>,
        compare: F,
    ) -> FloodFill<'a, T, F>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        FloodFill::new(self, origin, directions, radius, compare)
    }

    /// Partitions the grid into maximal regions under `compare`.
    pub fn regions<'a, F>(&'a self, directions: &'a [Direction], compare: F) -> Regions<'a, T, F>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        Regions::new(self, directions, compare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walls(rows: &[&str]) -> Grid<bool> {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        Grid::from_fn(width, height, |p| {
            rows[p.y as usize].as_bytes()[p.x as usize] == b'#'
        })
    }

    #[test]
    fn constant_predicate_yields_single_region() {
        let grid = Grid::filled(7, 5, 0u8);
        let regions: Vec<_> = grid.regions(&Direction::CARDINAL, |_, _| Ordering::Equal).collect();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 35);
    }

    #[test]
    fn every_cell_appears_in_exactly_one_region() {
        let grid = walls(&["..#..", "..#..", "#####", "..#.."]);
        let mut seen = Grid::filled(grid.width(), grid.height(), 0u32);
        let regions: Vec<_> = grid.regions(&Direction::CARDINAL, bool::cmp).collect();
        for region in &regions {
            for &cell in region.cells() {
                seen[cell] += 1;
            }
        }
        assert!(seen.iter().all(|(_, count)| *count == 1));
        // four open quadrants and one cross of walls
        assert_eq!(regions.len(), 5);
    }

    #[test]
    fn a_yielded_region_is_already_complete() {
        let grid = walls(&["..#", "..#", "###"]);
        let mut regions = grid.regions(&Direction::CARDINAL, bool::cmp);
        let first = regions.next().unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first.cells()[0], Position::new(0, 0));
        assert_eq!(regions.next().map(|region| region.len()), Some(5));
        assert_eq!(regions.next(), None);
    }

    #[test]
    fn diagonal_directions_join_corner_cells() {
        let grid = walls(&["#.", ".#"]);
        assert_eq!(grid.regions(&Direction::CARDINAL, bool::cmp).count(), 4);
        assert_eq!(grid.regions(&Direction::ALL, bool::cmp).count(), 2);
    }

    #[test]
    fn flood_fill_respects_radius() {
        let grid = Grid::filled(11, 11, ());
        let centre = Position::new(5, 5);
        let square: Vec<_> = grid
            .flood_fill(centre, &Direction::ALL, Some(Radius::Chebyshev(1)), |_, _| {
                Ordering::Equal
            })
            .collect();
        assert_eq!(square.len(), 9);
        assert_eq!(square[0], centre);

        let disc = grid
            .flood_fill(centre, &Direction::ALL, Some(Radius::Euclidean(2.0)), |_, _| {
                Ordering::Equal
            })
            .count();
        // cells with dx^2 + dy^2 <= 4
        assert_eq!(disc, 13);
    }

    #[test]
    fn flood_fill_stops_at_incompatible_cells() {
        let grid = walls(&["..#..", "..#..", "..#.."]);
        let left: Vec<_> = grid
            .flood_fill(Position::new(0, 0), &Direction::ALL, None, bool::cmp)
            .collect();
        assert_eq!(left.len(), 6);
        assert!(left.iter().all(|p| p.x < 2));
    }
}
