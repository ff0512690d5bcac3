//! Common error infrastructure for breach-core.
//!
//! Domain errors live next to the code that raises them ([`StateError`] in
//! `state`, [`ExecuteError`] and [`TurnError`] in `engine`). This module holds
//! the shared classification used when logging or surfacing them.
//!
//! Vetoed actions and expected misses (a dodge, an empty magazine) are never
//! errors; they travel through the action pipeline like any other outcome.
//!
//! [`StateError`]: crate::state::StateError
//! [`ExecuteError`]: crate::engine::ExecuteError
//! [`TurnError`]: crate::engine::TurnError

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid request from the host, should not retry without changes.
    ///
    /// Examples: acting out of turn, asking for a turn mid-turn
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// Examples: missing required component, acting on a removed entity
    /// These indicate bugs and should be investigated.
    Internal,

    /// Simulation cannot continue.
    ///
    /// Examples: no turn takers left, unknown level
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all breach-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
