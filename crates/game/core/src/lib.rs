//! Deterministic simulation core for a space-hulk roguelike.
//!
//! `breach-core` defines the rules of the ship: entities and their components,
//! the action pipeline, the turn scheduler, and the atmosphere, fire and
//! combat systems. It performs no I/O. All state mutation flows through
//! [`engine::Engine`], which hosts (the runtime, tests, offline tools) drive
//! one turn at a time.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod grid;
pub mod hud;
pub mod prototypes;
pub mod state;
pub mod systems;

pub use action::{Action, ActionBody, ActionContext, ActionKind};
pub use config::GameConfig;
pub use engine::{
    ActionListener, ActionQueue, Engine, ExecuteError, GameOutcome, ListenerRegistry, TurnError,
    TurnQueue, TurnRequest, TurnStatus, TurnTaker,
};
pub use env::{DiceRng, PcgRng, ScriptedRng};
pub use error::{ErrorSeverity, GameError};
pub use grid::{BestSet, Direction, DistanceField, Grid, Line, Trajectory};
pub use hud::{Hud, HudSnapshot};
pub use state::{CellFlags, EntityId, Position, StateError, Tick, World};
pub use systems::{Atmosphere, AtmosphereCell, PressureClass};
