//! Turn scheduling and the action pipeline.
//!
//! The [`Engine`] owns every level, the listener registry, the random
//! generator and the HUD. All world changes flow through the same drain loop:
//! pop the earliest pending action, broadcast it to its listeners, commit it
//! unless vetoed, then apply any level transfer the commit requested.

mod errors;
mod listener;
mod queue;
mod turns;

pub use errors::ExecuteError;
pub use listener::{ActionListener, ListenerRegistry};
pub use queue::{ActionQueue, ScheduledAction};
pub use turns::{TurnError, TurnQueue, TurnStatus};

use tracing::{debug, error, info};

use crate::action::{Action, ActionContext};
use crate::config::GameConfig;
use crate::env::{DiceRng, PcgRng};
use crate::error::GameError;
use crate::hud::Hud;
use crate::state::{
    Controller, EntityId, PlayerCharacter, StateError, StuckInSpace, TakesTurns, Tick, Transfer,
    World, Won,
};
use crate::systems::{atmosphere, fire, progression};

/// How a game ended for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum GameOutcome {
    Died,
    LostInSpace,
    Won,
}

/// The entity whose turn it is, handed to whoever decides its action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnRequest {
    pub entity: EntityId,
    pub controller: Controller,
    pub clock: Tick,
    pub level: usize,
}

/// Synchronous decision maker for turn-taking entities.
pub trait TurnTaker {
    fn decide_action(&mut self, request: &TurnRequest, world: &World) -> Action;
}

impl<F> TurnTaker for F
where
    F: FnMut(&TurnRequest, &World) -> Action,
{
    fn decide_action(&mut self, request: &TurnRequest, world: &World) -> Action {
        self(request, world)
    }
}

/// Deterministic simulation driver.
///
/// Given the same levels, seed and sequence of turn actions, an engine
/// always produces the same worlds.
pub struct Engine {
    config: GameConfig,
    levels: Vec<World>,
    current: usize,
    listeners: ListenerRegistry,
    rng: Box<dyn DiceRng>,
    hud: Hud,
    acting: Option<(usize, EntityId)>,
}

fn pair_mut(levels: &mut [World], a: usize, b: usize) -> Option<(&mut World, &mut World)> {
    if a < b {
        let (left, right) = levels.split_at_mut(b);
        Some((left.get_mut(a)?, right.first_mut()?))
    } else {
        let (left, right) = levels.split_at_mut(a);
        Some((right.first_mut()?, left.get_mut(b)?))
    }
}

impl Engine {
    /// Creates an engine with the built-in systems and a seeded generator.
    pub fn new(config: GameConfig, seed: u64, first_level: World) -> Self {
        Self::with_rng(config, Box::new(PcgRng::new(seed)), first_level)
    }

    pub fn with_rng(config: GameConfig, rng: Box<dyn DiceRng>, first_level: World) -> Self {
        let mut engine = Self {
            config,
            levels: Vec::new(),
            current: 0,
            listeners: ListenerRegistry::default_systems(),
            rng,
            hud: Hud::new(),
            acting: None,
        };
        engine.add_level(first_level);
        engine
    }

    /// Adds a level and computes its initial atmosphere. Returns its index.
    pub fn add_level(&mut self, mut world: World) -> usize {
        world.atmosphere_mut().set_vent_rate(self.config.vent_rate);
        world.refresh_atmosphere();
        if self.levels.len() == self.current {
            self.hud.observe(&world);
        }
        self.levels.push(world);
        self.levels.len() - 1
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    /// The level the player is on.
    pub fn world(&self) -> &World {
        &self.levels[self.current]
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.levels[self.current]
    }

    pub fn level(&self, index: usize) -> Option<&World> {
        self.levels.get(index)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn current_level(&self) -> usize {
        self.current
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut Hud {
        &mut self.hud
    }

    pub fn player(&self) -> Option<EntityId> {
        self.world().player()
    }

    /// The entity currently between `begin_turn` and `complete_turn`.
    pub fn acting(&self) -> Option<EntityId> {
        self.acting.map(|(_, entity)| entity)
    }

    /// `Some` once the game is over for the player.
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.player() {
            Some(player) if self.world().has::<Won>(player) => Some(GameOutcome::Won),
            Some(player) if self.world().has::<StuckInSpace>(player) => {
                Some(GameOutcome::LostInSpace)
            }
            Some(_) => None,
            // a player was observed at some point and is gone now
            None if self.hud.snapshot().max_health > 0.0 => Some(GameOutcome::Died),
            None => None,
        }
    }

    // ===== action pipeline =====

    /// Queues an action on the current level.
    pub fn schedule(&mut self, action: impl Into<Action>, delay: u64) {
        self.world_mut().schedule(action, delay);
    }

    /// Processes the current level's pending actions until none are left.
    pub fn drain(&mut self) -> Result<(), ExecuteError> {
        self.drain_level(self.current)
    }

    /// Advances atmosphere, fire and transformations on the current level by
    /// `time_delta` turns.
    pub fn progress_environment(&mut self, time_delta: f32) -> Result<(), ExecuteError> {
        self.progress_level(self.current, time_delta)
    }

    fn context(
        &mut self,
        level: usize,
    ) -> Result<(ActionContext<'_>, &ListenerRegistry), ExecuteError> {
        let world = self
            .levels
            .get_mut(level)
            .ok_or(ExecuteError::UnknownLevel(level))?;
        let ctx = ActionContext::new(world, self.rng.as_mut(), &mut self.hud, &self.config);
        Ok((ctx, &self.listeners))
    }

    fn progress_level(&mut self, level: usize, time_delta: f32) -> Result<(), ExecuteError> {
        {
            let (mut ctx, _) = self.context(level)?;
            atmosphere::progress(&mut ctx, time_delta);
            fire::progress(&mut ctx, time_delta);
            progression::progress(&mut ctx, time_delta);
        }
        self.drain_level(level)
    }

    fn drain_level(&mut self, level: usize) -> Result<(), ExecuteError> {
        loop {
            let world = self
                .levels
                .get_mut(level)
                .ok_or(ExecuteError::UnknownLevel(level))?;
            let Some(scheduled) = world.pending.pop() else {
                world.pending.reset_clock();
                return Ok(());
            };
            if let Err(err) = self.dispatch(level, scheduled.action) {
                error!(
                    target: "core::engine",
                    error = %err,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "drain halted, discarding pending actions"
                );
                if let Some(world) = self.levels.get_mut(level) {
                    world.pending.clear();
                }
                return Err(err);
            }
        }
    }

    fn dispatch(&mut self, level: usize, mut action: Action) -> Result<(), ExecuteError> {
        let kind = action.kind();
        {
            let (mut ctx, listeners) = self.context(level)?;
            let removed = action
                .participants()
                .into_iter()
                .find(|&entity| !ctx.world.contains(entity));
            if let Some(entity) = removed {
                debug!(target: "core::engine", %kind, %entity, "dropped, participant removed");
                return Ok(());
            }

            listeners.broadcast(&mut action, &mut ctx)?;
            if !action.success {
                return Ok(());
            }
            action.commit(&mut ctx)?;
        }
        debug!(target: "core::engine", %kind, "committed");

        self.apply_transfers(level)?;
        if let Some(world) = self.levels.get(self.current) {
            self.hud.observe(world);
        }
        Ok(())
    }

    fn apply_transfers(&mut self, level: usize) -> Result<(), ExecuteError> {
        let transfers = match self.levels.get_mut(level) {
            Some(world) => world.take_transfers(),
            None => return Ok(()),
        };
        for transfer in transfers {
            self.transfer(level, transfer)?;
        }
        Ok(())
    }

    /// Moves an entity between levels; the player takes the view along.
    ///
    /// Reactions to the arrival are drained on the destination right away.
    fn transfer(&mut self, from: usize, transfer: Transfer) -> Result<(), ExecuteError> {
        let Transfer {
            entity,
            level,
            arrival,
        } = transfer;
        if level == from {
            let world = self
                .levels
                .get_mut(from)
                .ok_or(ExecuteError::UnknownLevel(from))?;
            return Ok(world.set_position(entity, arrival)?);
        }

        let (source, destination) =
            pair_mut(&mut self.levels, from, level).ok_or(ExecuteError::UnknownLevel(level))?;
        if !destination.in_bounds(arrival) {
            return Err(StateError::OutOfBounds {
                position: arrival,
                width: destination.width(),
                height: destination.height(),
            }
            .into());
        }
        let is_player = source.has::<PlayerCharacter>(entity);
        let arrived = {
            let taken = source.take_entity(entity)?;
            destination.adopt_entity(taken, arrival)?
        };
        progression::on_arrival(destination, arrived);

        info!(
            target: "core::engine",
            %entity,
            %arrived,
            from,
            to = level,
            %arrival,
            "level transfer"
        );
        if is_player {
            self.current = level;
            if let Some(world) = self.levels.get(level) {
                self.hud.observe(world);
            }
        }
        self.drain_level(level)
    }

    // ===== turns =====

    /// Selects the next entity to act on the current level.
    ///
    /// Time between the clock and that entity's ready tick is spent
    /// progressing the environment first.
    pub fn begin_turn(&mut self) -> Result<TurnRequest, ExecuteError> {
        if let Some((_, entity)) = self.acting {
            return Err(TurnError::TurnInProgress(entity).into());
        }
        loop {
            let level = self.current;
            let world = self
                .levels
                .get_mut(level)
                .ok_or(ExecuteError::UnknownLevel(level))?;
            let (entity, ready_at) = world.turns.peek().ok_or(TurnError::NoActiveEntities)?;
            let clock = world.turns.clock();
            if ready_at > clock {
                world.turns.advance_to(ready_at);
                self.progress_level(level, GameConfig::turns(ready_at.since(clock)))?;
                continue;
            }

            let controller = world.require::<TakesTurns>(entity)?.controller;
            world.turns.pop_next();
            self.acting = Some((level, entity));
            debug!(target: "core::engine", %entity, ?controller, %clock, "turn begins");
            return Ok(TurnRequest {
                entity,
                controller,
                clock,
                level,
            });
        }
    }

    /// Runs the acting entity's action and puts it back in the queue.
    ///
    /// An action by anyone else is rejected and the turn stays open.
    pub fn complete_turn(&mut self, action: Action) -> Result<(), ExecuteError> {
        let (level, entity) = self.acting.ok_or(TurnError::NoTurnInProgress)?;
        if action.actor() != Some(entity) {
            return Err(ExecuteError::ActorMismatch {
                expected: entity,
                provided: action.actor(),
            });
        }
        self.acting = None;

        let world = self
            .levels
            .get_mut(level)
            .ok_or(ExecuteError::UnknownLevel(level))?;
        let cost = action.cost(world);
        debug!(target: "core::engine", %entity, kind = %action.kind(), cost, "turn action");
        world.schedule(action, 0);

        let drained = self.drain_level(level);
        if let Some(world) = self.levels.get_mut(level) {
            let ready_at = world.turns.clock() + cost;
            world.turns.requeue(entity, ready_at);
        }
        drained
    }

    /// One full turn: select, decide, execute.
    pub fn progress_schedule(&mut self, taker: &mut dyn TurnTaker) -> Result<(), ExecuteError> {
        let request = self.begin_turn()?;
        let action = taker.decide_action(&request, self.world());
        self.complete_turn(action)
    }
}
