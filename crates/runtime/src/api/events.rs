//! Events emitted during simulation for front-ends to observe.
//!
//! Consumers subscribe to [`GameEvent`] to react to state changes without
//! blocking the worker loop.
use breach_core::{ActionKind, EntityId, GameOutcome, HudSnapshot, Tick};

/// Events emitted by the runtime during game simulation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An entity was selected to act
    TurnStarted { entity: EntityId, clock: Tick },
    /// A turn action and everything it set off were processed
    TurnCompleted {
        entity: EntityId,
        kind: ActionKind,
        clock: Tick,
    },
    /// A turn action halted the simulation pipeline
    TurnFailed {
        entity: Option<EntityId>,
        kind: ActionKind,
        error: String,
    },
    /// Messages written to the HUD since the previous event
    Messages { lines: Vec<String> },
    /// Vitals after the last turn
    Hud(HudSnapshot),
    /// The player moved to another level
    LevelChanged { level: usize, depth: u32 },
    /// The game is over for the player
    GameOver { outcome: GameOutcome },
}
