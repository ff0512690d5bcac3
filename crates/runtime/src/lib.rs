//! Runtime orchestration for the Breach simulation.
//!
//! This crate wires together the action provider abstraction, the ASCII
//! scenario loader and the simulation worker into a cohesive runtime API.
//! Consumers embed [`Runtime`] to drive turns, subscribe to events, and query
//! the game through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`scenario`] turns ASCII maps into levels
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod runtime;
pub mod scenario;

mod workers;

pub use api::{
    ActionProvider, ApproachPlayerProvider, ChannelActionProvider, GameEvent, PlayerCommand,
    ProviderKind, Result, RuntimeError, RuntimeHandle, TurnView, WaitActionProvider,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scenario::Scenario;
