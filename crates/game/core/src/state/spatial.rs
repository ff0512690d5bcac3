use bitflags::bitflags;

use super::{EntityId, Position};
use crate::grid::Grid;

bitflags! {
    /// What the atmosphere needs to know about a cell's occupants.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        const SOLID = 1 << 0;
        const VOID  = 1 << 1;
    }
}

/// Per-cell list of the entities positioned there.
#[derive(Clone, Debug)]
pub struct SpatialHash {
    cells: Grid<Vec<EntityId>>,
}

impl SpatialHash {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: Grid::from_fn(width, height, |_| Vec::new()),
        }
    }

    pub fn at(&self, position: Position) -> &[EntityId] {
        self.cells.get(position).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, position: Position, entity: EntityId) {
        if let Some(cell) = self.cells.get_mut(position) {
            cell.push(entity);
        }
    }

    pub fn remove(&mut self, position: Position, entity: EntityId) {
        if let Some(cell) = self.cells.get_mut(position) {
            cell.retain(|&e| e != entity);
        }
    }

    pub fn relocate(&mut self, from: Position, to: Position, entity: EntityId) {
        self.remove(from, entity);
        self.insert(to, entity);
    }
}
