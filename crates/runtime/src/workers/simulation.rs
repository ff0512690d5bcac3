//! Simulation worker that owns the authoritative [`breach_core::Engine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), drives the
//! turn protocol, and publishes [`GameEvent`] notifications.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, info};

use breach_core::{
    Action, Engine, ExecuteError, GameError, GameOutcome, HudSnapshot, Position, PressureClass,
};

use crate::api::{GameEvent, Result, RuntimeError, TurnView};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Select the next entity to act and describe what it can see.
    BeginTurn {
        reply: oneshot::Sender<Result<TurnView>>,
    },
    /// Execute the acting entity's action (a turn must be open).
    CompleteTurn {
        action: Action,
        reply: oneshot::Sender<Result<()>>,
    },
    QueryHud {
        reply: oneshot::Sender<HudSnapshot>,
    },
    QueryPressure {
        position: Position,
        reply: oneshot::Sender<Option<PressureClass>>,
    },
    QueryOutcome {
        reply: oneshot::Sender<Option<GameOutcome>>,
    },
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    engine: Engine,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<GameEvent>,
    game_over: bool,
}

impl SimulationWorker {
    pub fn new(
        engine: Engine,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<GameEvent>,
    ) -> Self {
        Self {
            engine,
            command_rx,
            event_tx,
            game_over: false,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        debug!(target: "runtime::worker", "simulation worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::BeginTurn { reply } => {
                let result = self.begin_turn();
                let _ = reply.send(result);
            }
            Command::CompleteTurn { action, reply } => {
                let result = self.complete_turn(action);
                let _ = reply.send(result);
            }
            Command::QueryHud { reply } => {
                let _ = reply.send(self.engine.hud().snapshot());
            }
            Command::QueryPressure { position, reply } => {
                let _ = reply.send(self.engine.world().pressure_class(position));
            }
            Command::QueryOutcome { reply } => {
                let _ = reply.send(self.engine.outcome());
            }
        }
    }

    fn begin_turn(&mut self) -> Result<TurnView> {
        let request = self.engine.begin_turn().inspect_err(|error| {
            self.log_error("turn selection failed", error);
        });
        // waiting for the turn may have progressed the environment
        self.publish_messages();
        let request = request?;

        let view = TurnView::capture(
            self.engine.world(),
            request.entity,
            request.controller,
            request.clock,
            request.level,
            self.engine.hud().snapshot(),
        );

        let _ = self.event_tx.send(GameEvent::TurnStarted {
            entity: request.entity,
            clock: request.clock,
        });

        Ok(view)
    }

    fn complete_turn(&mut self, action: Action) -> Result<()> {
        let entity = action.actor();
        let kind = action.kind();
        let level_before = self.engine.current_level();

        match self.engine.complete_turn(action) {
            Ok(()) => {
                if let Some(entity) = entity {
                    let _ = self.event_tx.send(GameEvent::TurnCompleted {
                        entity,
                        kind,
                        clock: self.engine.world().clock(),
                    });
                }
            }
            Err(ExecuteError::ActorMismatch { expected, provided }) => {
                debug!(
                    target: "runtime::worker",
                    %expected,
                    ?provided,
                    "action rejected: wrong actor"
                );
                return Err(RuntimeError::InvalidActionActor { expected, provided });
            }
            Err(error) => {
                self.log_error("action execution failed", &error);
                let _ = self.event_tx.send(GameEvent::TurnFailed {
                    entity,
                    kind,
                    error: error.to_string(),
                });
                self.publish_messages();
                return Err(error.into());
            }
        }

        self.publish_messages();
        let _ = self
            .event_tx
            .send(GameEvent::Hud(self.engine.hud().snapshot()));

        let level = self.engine.current_level();
        if level != level_before {
            let depth = self.engine.world().depth();
            info!(target: "runtime::worker", level, depth, "player changed level");
            let _ = self.event_tx.send(GameEvent::LevelChanged { level, depth });
        }

        if let (false, Some(outcome)) = (self.game_over, self.engine.outcome()) {
            self.game_over = true;
            info!(target: "runtime::worker", %outcome, "game over");
            let _ = self.event_tx.send(GameEvent::GameOver { outcome });
        }

        Ok(())
    }

    fn publish_messages(&mut self) {
        let lines = self.engine.hud_mut().take_unread();
        if !lines.is_empty() {
            let _ = self.event_tx.send(GameEvent::Messages { lines });
        }
    }

    fn log_error(&self, context: &'static str, error: &ExecuteError) {
        if error.severity().is_internal() {
            error!(
                target: "runtime::worker",
                code = error.error_code(),
                severity = error.severity().as_str(),
                error = %error,
                "{context}"
            );
        } else {
            debug!(
                target: "runtime::worker",
                code = error.error_code(),
                error = %error,
                "{context}"
            );
        }
    }
}
