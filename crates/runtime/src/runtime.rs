//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the game.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use breach_core::state::Controller;
use breach_core::{Engine, GameConfig, GameOutcome, World};

use crate::api::{ActionProvider, GameEvent, ProviderKind, Result, RuntimeError, RuntimeHandle};
use crate::workers::{Command, SimulationWorker};

/// Environment variable holding a fixed simulation seed.
pub const SEED_ENV_VAR: &str = "BREACH_RNG_SEED";

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Fixed seed for the simulation; a random one is drawn when `None`.
    pub rng_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            rng_seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Default configuration with the seed taken from `BREACH_RNG_SEED`.
    pub fn from_env() -> Self {
        let rng_seed = match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(seed) => Some(seed),
                Err(error) => {
                    warn!(
                        target: "runtime::config",
                        value = %raw,
                        %error,
                        "ignoring unparsable seed"
                    );
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            rng_seed,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// Main runtime that orchestrates game simulation
///
/// Runtime owns the worker and coordinates turns.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,

    // Action providers (injected by user)
    player_provider: Option<Box<dyn ActionProvider>>,
    npc_provider: Option<Box<dyn ActionProvider>>,

    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to game events
    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.handle.subscribe_events()
    }

    /// Execute a single turn: select the next entity, ask its provider, run the action.
    pub async fn step(&mut self) -> Result<()> {
        let view = self.handle.begin_turn().await?;

        let provider = match view.controller {
            Controller::Player => self
                .player_provider
                .as_ref()
                .ok_or(RuntimeError::ProviderNotSet {
                    kind: ProviderKind::Player,
                })?,
            Controller::Npc => self
                .npc_provider
                .as_ref()
                .ok_or(RuntimeError::ProviderNotSet {
                    kind: ProviderKind::Npc,
                })?,
        };

        let action = provider.provide_action(&view).await?;
        self.handle.complete_turn(action).await
    }

    /// Run turns until the game is over for the player.
    pub async fn run(&mut self) -> Result<GameOutcome> {
        loop {
            if let Some(outcome) = self.handle.query_outcome().await? {
                return Ok(outcome);
            }
            self.step().await?;
        }
    }

    /// Set the player action provider
    pub fn set_player_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.player_provider = Some(Box::new(provider));
    }

    /// Set the NPC action provider
    pub fn set_npc_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.npc_provider = Some(Box::new(provider));
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every handle clone has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    levels: Vec<World>,
    player_provider: Option<Box<dyn ActionProvider>>,
    npc_provider: Option<Box<dyn ActionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            levels: Vec::new(),
            player_provider: None,
            npc_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a level. The first one added is where the game starts.
    pub fn level(mut self, world: World) -> Self {
        self.levels.push(world);
        self
    }

    pub fn levels(mut self, worlds: impl IntoIterator<Item = World>) -> Self {
        self.levels.extend(worlds);
        self
    }

    /// Set player action provider (optional)
    pub fn player_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.player_provider = Some(Box::new(provider));
        self
    }

    /// Set NPC action provider (optional)
    pub fn npc_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.npc_provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and spawn its worker.
    pub async fn build(self) -> Result<Runtime> {
        let mut levels = self.levels.into_iter();
        let first = levels.next().ok_or(RuntimeError::MissingLevels)?;

        let seed = self.config.rng_seed.unwrap_or_else(rand::random::<u64>);
        info!(target: "runtime::worker", seed, "starting simulation");

        let mut engine = Engine::new(self.config.game_config, seed, first);
        for level in levels {
            engine.add_level(level);
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (event_tx, _event_rx) = broadcast::channel::<GameEvent>(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_tx.clone());

        let sim_worker = SimulationWorker::new(engine, command_rx, event_tx);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            player_provider: self.player_provider,
            npc_provider: self.npc_provider,
            sim_worker_handle,
        })
    }
}
