//! Errors raised by direct world manipulation.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, Position};

/// Invariant violations detected while reading or mutating a [`World`](super::World).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// An operation required a component the entity does not carry.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: EntityId,
        component: &'static str,
    },

    /// The entity was removed from this world (or never belonged to it).
    #[error("entity {0} is not part of this world")]
    Detached(EntityId),

    /// Position is outside the level bounds.
    #[error("position {position} is out of bounds (level size: {width}x{height})")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingComponent { .. } => "STATE_MISSING_COMPONENT",
            Self::Detached(_) => "STATE_DETACHED_ENTITY",
            Self::OutOfBounds { .. } => "STATE_OUT_OF_BOUNDS",
        }
    }
}
