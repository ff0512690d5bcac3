//! Asynchronous abstraction for sourcing player and NPC intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so the simulation
//! can run with human input, scripted fixtures, or simple AI policies.
use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use breach_core::action::weapons;
use breach_core::state::{Controller, Weapon, WeaponKind};
use breach_core::{
    Action, ActionBody, CellFlags, Direction, EntityId, HudSnapshot, Position, Tick, World,
};

use super::errors::{Result, RuntimeError};

/// What a provider may know when deciding an entity's action.
///
/// Built by the simulation worker at the start of each turn; the world
/// itself never leaves the worker.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnView {
    pub entity: EntityId,
    pub controller: Controller,
    pub clock: Tick,
    pub level: usize,
    pub position: Option<Position>,
    pub weapon: Option<Weapon>,
    pub player_position: Option<Position>,
    /// Directions the entity could step without hitting a wall.
    pub open_directions: Vec<Direction>,
    pub hud: HudSnapshot,
}

impl TurnView {
    pub fn capture(
        world: &World,
        entity: EntityId,
        controller: Controller,
        clock: Tick,
        level: usize,
        hud: HudSnapshot,
    ) -> Self {
        let position = world.position(entity);
        let open_directions = position
            .map(|from| {
                Direction::ALL
                    .into_iter()
                    .filter(|&direction| {
                        let to = from.step(direction);
                        world.in_bounds(to) && !world.cell_flags(to).contains(CellFlags::SOLID)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            entity,
            controller,
            clock,
            level,
            position,
            weapon: weapons::wielded(world, entity),
            player_position: world.player().and_then(|player| world.position(player)),
            open_directions,
            hud,
        }
    }
}

/// Trait for providing actions based on a view of the current turn.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - NPC decisions
/// - Scripted/replayed actions
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide an action for `view.entity`.
    async fn provide_action(&self, view: &TurnView) -> Result<Action>;
}

/// A simple action provider that always returns Wait action.
/// Useful for testing or as a fallback.
pub struct WaitActionProvider;

#[async_trait]
impl ActionProvider for WaitActionProvider {
    async fn provide_action(&self, view: &TurnView) -> Result<Action> {
        Ok(Action::wait(view.entity))
    }
}

/// Player intent, independent of which entity currently is the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    Wait,
    Walk(Direction),
    /// Fire the wielded weapon at a cell.
    Fire(Position),
    /// Close the door at a neighbouring cell.
    CloseDoor(EntityId),
    PickUp,
    NextWeapon,
    PreviousWeapon,
    /// Wield the weapon in a 1-based slot.
    SelectWeapon(usize),
}

impl PlayerCommand {
    pub fn into_action(self, view: &TurnView) -> Action {
        let entity = view.entity;
        match self {
            PlayerCommand::Wait => Action::wait(entity),
            PlayerCommand::Walk(direction) => Action::walk(entity, direction),
            PlayerCommand::Fire(target) => {
                let kind = view.weapon.map_or(WeaponKind::Pistol, |weapon| weapon.kind);
                weapons::fire(entity, kind, target)
            }
            PlayerCommand::CloseDoor(door) => ActionBody::CloseDoor { entity, door }.into(),
            PlayerCommand::PickUp => ActionBody::PickUp { entity }.into(),
            PlayerCommand::NextWeapon => ActionBody::NextWeapon { entity }.into(),
            PlayerCommand::PreviousWeapon => ActionBody::PreviousWeapon { entity }.into(),
            PlayerCommand::SelectWeapon(slot) => ActionBody::SpecificWeapon { entity, slot }.into(),
        }
    }
}

/// Waits for the next [`PlayerCommand`] from a channel.
///
/// The receiving end lives here; UIs keep the sender.
pub struct ChannelActionProvider {
    commands: Mutex<mpsc::Receiver<PlayerCommand>>,
}

impl ChannelActionProvider {
    pub fn new(commands: mpsc::Receiver<PlayerCommand>) -> Self {
        Self {
            commands: Mutex::new(commands),
        }
    }

    /// A provider and the sender that feeds it.
    pub fn channel(buffer: usize) -> (mpsc::Sender<PlayerCommand>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl ActionProvider for ChannelActionProvider {
    async fn provide_action(&self, view: &TurnView) -> Result<Action> {
        let command = self
            .commands
            .lock()
            .await
            .recv()
            .await
            .ok_or(RuntimeError::ActionProviderChannelClosed)?;
        Ok(command.into_action(view))
    }
}

/// Walks straight at the player and waits when it can't.
///
/// Bumping into the player is how monsters attack.
pub struct ApproachPlayerProvider;

#[async_trait]
impl ActionProvider for ApproachPlayerProvider {
    async fn provide_action(&self, view: &TurnView) -> Result<Action> {
        let (Some(from), Some(target)) = (view.position, view.player_position) else {
            return Ok(Action::wait(view.entity));
        };
        let step = Position::new(
            from.x + (target.x - from.x).signum(),
            from.y + (target.y - from.y).signum(),
        );
        let action = match from.direction_to(step) {
            Some(direction) if view.open_directions.contains(&direction) => {
                Action::walk(view.entity, direction)
            }
            _ => Action::wait(view.entity),
        };
        Ok(action)
    }
}
