use std::any::type_name;

use hecs::{Component, ComponentError, DynamicBundle};

use super::spatial::{CellFlags, SpatialHash};
use super::{EntityId, PlayerCharacter, Position, Solid, StateError, TakesTurns, Tick, Void};
use crate::action::Action;
use crate::engine::{ActionQueue, TurnQueue};
use crate::grid::Grid;
use crate::systems::atmosphere::{Atmosphere, PressureClass};

/// An entity waiting to be moved to another level once the current commit ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub entity: EntityId,
    pub level: usize,
    pub arrival: Position,
}

/// One level of the ship and everything that lives on it.
///
/// A `World` exclusively owns its entities, the spatial index over their
/// positions, its turn queue, its pending-action queue and its atmosphere.
/// Entities and components are only reachable through it, so removing an
/// entity here removes it from every index at once.
pub struct World {
    depth: u32,
    ecs: hecs::World,
    spatial: SpatialHash,
    atmosphere: Atmosphere,
    pub(crate) turns: TurnQueue,
    pub(crate) pending: ActionQueue,
    transfers: Vec<Transfer>,
}

/// Last path segment of a component's type name, for error messages.
fn component_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

impl World {
    pub fn new(depth: u32, width: u32, height: u32) -> Self {
        Self {
            depth,
            ecs: hecs::World::new(),
            spatial: SpatialHash::new(width, height),
            atmosphere: Atmosphere::new(width, height),
            turns: TurnQueue::new(),
            pending: ActionQueue::new(),
            transfers: Vec::new(),
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn width(&self) -> u32 {
        self.atmosphere.grid().width()
    }

    pub fn height(&self) -> u32 {
        self.atmosphere.grid().height()
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        self.atmosphere.grid().contains(position)
    }

    fn check_bounds(&self, position: Position) -> Result<(), StateError> {
        if self.in_bounds(position) {
            Ok(())
        } else {
            Err(StateError::OutOfBounds {
                position,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    // ===== entity lifecycle =====

    /// Creates an entity from a component bundle and indexes it.
    ///
    /// Entities with a [`Position`] enter the spatial index; entities that
    /// [`TakesTurns`] are queued at the current clock.
    pub fn emplace_entity(&mut self, components: impl DynamicBundle) -> Result<EntityId, StateError> {
        let id = EntityId(self.ecs.spawn(components));
        self.index(id)?;
        Ok(id)
    }

    /// Removes an entity and all of its components.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<(), StateError> {
        self.unindex(id)?;
        self.ecs.despawn(id.0).map_err(|_| StateError::Detached(id))
    }

    /// Swaps every component of `id` for `components`, keeping its identity.
    pub fn replace_with(
        &mut self,
        id: EntityId,
        components: impl DynamicBundle,
    ) -> Result<(), StateError> {
        self.unindex(id)?;
        self.ecs.despawn(id.0).map_err(|_| StateError::Detached(id))?;
        self.ecs.spawn_at(id.0, components);
        self.index(id)
    }

    /// Detaches an entity from this world, handing its components to the caller.
    pub(crate) fn take_entity(&mut self, id: EntityId) -> Result<hecs::TakenEntity<'_>, StateError> {
        self.unindex(id)?;
        self.ecs.take(id.0).map_err(|_| StateError::Detached(id))
    }

    /// Inserts components taken from another world at `arrival`.
    pub(crate) fn adopt_entity(
        &mut self,
        components: impl DynamicBundle,
        arrival: Position,
    ) -> Result<EntityId, StateError> {
        self.check_bounds(arrival)?;
        let id = EntityId(self.ecs.spawn(components));
        self.ecs
            .insert_one(id.0, arrival)
            .map_err(|_| StateError::Detached(id))?;
        self.index(id)?;
        Ok(id)
    }

    fn index(&mut self, id: EntityId) -> Result<(), StateError> {
        if let Some(position) = self.position(id) {
            if let Err(error) = self.check_bounds(position) {
                let _ = self.ecs.despawn(id.0);
                return Err(error);
            }
            self.spatial.insert(position, id);
        }
        if self.has::<TakesTurns>(id) {
            let clock = self.turns.clock();
            self.turns.insert(id, clock);
        }
        Ok(())
    }

    fn unindex(&mut self, id: EntityId) -> Result<(), StateError> {
        if !self.contains(id) {
            return Err(StateError::Detached(id));
        }
        if let Some(position) = self.position(id) {
            self.spatial.remove(position, id);
        }
        self.turns.remove(id);
        Ok(())
    }

    // ===== component access =====

    pub fn contains(&self, id: EntityId) -> bool {
        self.ecs.contains(id.0)
    }

    pub fn get<T: Component>(&self, id: EntityId) -> Option<hecs::Ref<'_, T>> {
        self.ecs.get::<&T>(id.0).ok()
    }

    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<hecs::RefMut<'_, T>> {
        self.ecs.get::<&mut T>(id.0).ok()
    }

    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.ecs
            .entity(id.0)
            .map(|entity| entity.has::<T>())
            .unwrap_or(false)
    }

    /// Like [`World::get`], but a missing entity or component is an error.
    pub fn require<T: Component>(&self, id: EntityId) -> Result<hecs::Ref<'_, T>, StateError> {
        self.ecs
            .get::<&T>(id.0)
            .map_err(|error| Self::component_error::<T>(id, error))
    }

    pub fn require_mut<T: Component>(
        &mut self,
        id: EntityId,
    ) -> Result<hecs::RefMut<'_, T>, StateError> {
        self.ecs
            .get::<&mut T>(id.0)
            .map_err(|error| Self::component_error::<T>(id, error))
    }

    fn component_error<T>(id: EntityId, error: ComponentError) -> StateError {
        match error {
            ComponentError::NoSuchEntity => StateError::Detached(id),
            ComponentError::MissingComponent(_) => StateError::MissingComponent {
                entity: id,
                component: component_name::<T>(),
            },
        }
    }

    /// Attaches (or replaces) a component.
    ///
    /// Positions must go through [`World::set_position`] so the spatial index
    /// stays in sync.
    pub fn attach<T: Component>(&mut self, id: EntityId, component: T) -> Result<(), StateError> {
        self.ecs
            .insert_one(id.0, component)
            .map_err(|_| StateError::Detached(id))
    }

    pub fn detach<T: Component>(&mut self, id: EntityId) -> Option<T> {
        self.ecs.remove_one::<T>(id.0).ok()
    }

    /// Raw ECS query for iterating entities by component.
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.ecs.query::<Q>()
    }

    /// Entities carrying `T`, in stable identifier order.
    pub fn ids_with<T: Component>(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self
            .ecs
            .query::<&T>()
            .iter()
            .map(|(entity, _)| EntityId(entity))
            .collect();
        ids.sort();
        ids
    }

    pub fn player(&self) -> Option<EntityId> {
        self.ids_with::<PlayerCharacter>().into_iter().next()
    }

    // ===== spatial =====

    pub fn position(&self, id: EntityId) -> Option<Position> {
        self.get::<Position>(id).map(|position| *position)
    }

    pub fn set_position(&mut self, id: EntityId, to: Position) -> Result<(), StateError> {
        self.check_bounds(to)?;
        if !self.contains(id) {
            return Err(StateError::Detached(id));
        }
        let from = self.position(id);
        self.ecs
            .insert_one(id.0, to)
            .map_err(|_| StateError::Detached(id))?;
        match from {
            Some(from) => self.spatial.relocate(from, to, id),
            None => self.spatial.insert(to, id),
        }
        Ok(())
    }

    pub fn entities_at(&self, position: Position) -> &[EntityId] {
        self.spatial.at(position)
    }

    /// First entity at `position` carrying `T`.
    pub fn find_at<T: Component>(&self, position: Position) -> Option<EntityId> {
        self.entities_at(position)
            .iter()
            .copied()
            .find(|&id| self.has::<T>(id))
    }

    pub fn cell_flags(&self, position: Position) -> CellFlags {
        let mut flags = CellFlags::empty();
        for &id in self.entities_at(position) {
            let Ok(entity) = self.ecs.entity(id.0) else {
                continue;
            };
            if entity.has::<Solid>() {
                flags |= CellFlags::SOLID;
            }
            if entity.has::<Void>() {
                flags |= CellFlags::VOID;
            }
        }
        flags
    }

    pub fn flags_grid(&self) -> Grid<CellFlags> {
        Grid::from_fn(self.width(), self.height(), |position| {
            self.cell_flags(position)
        })
    }

    // ===== atmosphere =====

    pub fn atmosphere(&self) -> &Atmosphere {
        &self.atmosphere
    }

    pub(crate) fn atmosphere_mut(&mut self) -> &mut Atmosphere {
        &mut self.atmosphere
    }

    /// Full recomputation: pressurized regions, then frontiers.
    pub fn refresh_atmosphere(&mut self) {
        let flags = self.flags_grid();
        self.atmosphere.refresh(&flags);
    }

    pub fn update_venting(&mut self) {
        let flags = self.flags_grid();
        self.atmosphere.update_venting(&flags);
    }

    pub fn pressure_class(&self, position: Position) -> Option<PressureClass> {
        self.atmosphere.class(position)
    }

    // ===== scheduling =====

    pub fn clock(&self) -> Tick {
        self.turns.clock()
    }

    pub fn turns(&self) -> &TurnQueue {
        &self.turns
    }

    pub fn pending(&self) -> &ActionQueue {
        &self.pending
    }

    /// Queues an action `delay` ticks after the one currently committing.
    pub fn schedule(&mut self, action: impl Into<Action>, delay: u64) {
        self.pending.schedule(action.into(), delay);
    }

    pub(crate) fn queue_transfer(&mut self, transfer: Transfer) {
        self.transfers.push(transfer);
    }

    pub(crate) fn take_transfers(&mut self) -> Vec<Transfer> {
        std::mem::take(&mut self.transfers)
    }
}
