//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! stepping the simulation or streaming events.
use tokio::sync::{broadcast, mpsc, oneshot};

use breach_core::{Action, GameOutcome, HudSnapshot, Position, PressureClass};

use super::errors::{Result, RuntimeError};
use super::events::GameEvent;
use super::providers::TurnView;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<GameEvent>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<GameEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Selects the next entity to act and returns what it can see.
    pub async fn begin_turn(&self) -> Result<TurnView> {
        self.request(|reply| Command::BeginTurn { reply }).await?
    }

    /// Executes the action of the entity selected by [`Self::begin_turn`].
    pub async fn complete_turn(&self, action: Action) -> Result<()> {
        self.request(|reply| Command::CompleteTurn { action, reply })
            .await?
    }

    /// Current HUD readout
    pub async fn query_hud(&self) -> Result<HudSnapshot> {
        self.request(|reply| Command::QueryHud { reply }).await
    }

    /// Pressure class of a cell on the player's level
    pub async fn query_pressure(&self, position: Position) -> Result<Option<PressureClass>> {
        self.request(|reply| Command::QueryPressure { position, reply })
            .await
    }

    pub async fn query_outcome(&self) -> Result<Option<GameOutcome>> {
        self.request(|reply| Command::QueryOutcome { reply }).await
    }

    /// Subscribe to game events
    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.event_tx.subscribe()
    }
}
