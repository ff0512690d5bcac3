//! Error types for the action pipeline and turn protocol.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, StateError};

use super::TurnError;

/// Errors that halt a drain of the pending-action queue.
///
/// Any of these means the pipeline itself is inconsistent. The engine clears
/// whatever was still pending before returning it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("action by {provided:?} submitted while {expected} is acting")]
    ActorMismatch {
        expected: EntityId,
        provided: Option<EntityId>,
    },

    #[error("no level at index {0}")]
    UnknownLevel(usize),
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::State(error) => error.severity(),
            Self::Turn(error) => error.severity(),
            Self::ActorMismatch { .. } => ErrorSeverity::Validation,
            Self::UnknownLevel(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::State(error) => error.error_code(),
            Self::Turn(error) => error.error_code(),
            Self::ActorMismatch { .. } => "EXECUTE_ACTOR_MISMATCH",
            Self::UnknownLevel(_) => "EXECUTE_UNKNOWN_LEVEL",
        }
    }
}
