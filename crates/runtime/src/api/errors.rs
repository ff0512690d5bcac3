//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the simulation and action
//! providers so clients can bubble them up with consistent context.
use std::fmt;

use thiserror::Error;
use tokio::sync::oneshot;

use breach_core::{EntityId, ExecuteError, GameError, StateError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} action provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("action provider channel closed")]
    ActionProviderChannelClosed,

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires at least one level before building")]
    MissingLevels,

    #[error("simulation failed")]
    Simulation(#[from] ExecuteError),

    #[error("action actor {provided:?} does not match current entity {expected}")]
    InvalidActionActor {
        expected: EntityId,
        provided: Option<EntityId>,
    },

    #[error("failed to populate a level")]
    Populate(#[from] StateError),

    #[error("scenario level {level}, row {row}, column {column}: {reason}")]
    InvalidScenario {
        level: usize,
        row: usize,
        column: usize,
        reason: &'static str,
    },
}

impl RuntimeError {
    /// True when the simulation cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Simulation(error) => error.severity().is_internal(),
            Self::InvalidActionActor { .. } | Self::ProviderNotSet { .. } => false,
            _ => true,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    Player,
    Npc,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Player => "player",
            ProviderKind::Npc => "npc",
        };
        write!(f, "{}", label)
    }
}
