//! Rectangular cell grids and the algorithms that run over them.
//!
//! Every per-cell decoration in the simulation (spatial occupancy, atmosphere,
//! distance fields) is a [`Grid`] of the same dimensions as the level, indexed
//! by [`Position`].

mod best_set;
mod direction;
mod distance;
mod flood_fill;
mod line;

use std::ops::{Index, IndexMut};

use crate::state::Position;

pub use best_set::BestSet;
pub use direction::Direction;
pub use distance::{DistanceField, UNREACHED};
pub use flood_fill::{FloodFill, Radius, Region, Regions};
pub use line::{Line, Trajectory};

/// Fixed-size 2D grid stored in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid by evaluating `init` at every position, row by row.
    pub fn from_fn(width: u32, height: u32, mut init: impl FnMut(Position) -> T) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(init(Position::new(x, y)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    /// True for cells on the outermost ring of the grid.
    pub fn is_border(&self, position: Position) -> bool {
        self.contains(position)
            && (position.x == 0
                || position.y == 0
                || position.x as u32 == self.width - 1
                || position.y as u32 == self.height - 1)
    }

    fn offset(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn get(&self, position: Position) -> Option<&T> {
        self.offset(position).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        self.offset(position).map(|i| &mut self.cells[i])
    }

    /// Iterates every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<T> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        self.positions().zip(self.cells.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Position, &mut T)> {
        self.positions().zip(self.cells.iter_mut())
    }

    /// In-bounds neighbours of `position` along `directions`.
    pub fn neighbours<'a>(
        &'a self,
        position: Position,
        directions: &'a [Direction],
    ) -> impl Iterator<Item = (Direction, Position)> + 'a {
        directions
            .iter()
            .map(move |&direction| (direction, position.step(direction)))
            .filter(|(_, neighbour)| self.contains(*neighbour))
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; (width * height) as usize],
        }
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    fn index(&self, position: Position) -> &T {
        match self.offset(position) {
            Some(i) => &self.cells[i],
            None => panic!("{position} is outside a {}x{} grid", self.width, self.height),
        }
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    fn index_mut(&mut self, position: Position) -> &mut T {
        match self.offset(position) {
            Some(i) => &mut self.cells[i],
            None => panic!("{position} is outside a {}x{} grid", self.width, self.height),
        }
    }
}
