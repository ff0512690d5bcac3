//! Listener registry: reactions to actions before they commit.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::ExecuteError;
use crate::action::{Action, ActionContext, ActionKind};

/// A reaction to actions of particular kinds.
///
/// Listeners run before the action commits. They may veto it, schedule
/// follow-up actions, and read or mutate the world through the context.
pub trait ActionListener: Send + Sync {
    /// Returns the name of this listener (for logging and debugging).
    fn name(&self) -> &'static str;

    /// The action kinds this listener wants to see.
    fn kinds(&self) -> &[ActionKind];

    fn on_action(
        &self,
        action: &mut Action,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), ExecuteError>;
}

type ListenerFn =
    dyn Fn(&mut Action, &mut ActionContext<'_>) -> Result<(), ExecuteError> + Send + Sync;

/// Adapter registered through [`ListenerRegistry::on`].
struct FnListener {
    name: &'static str,
    kind: [ActionKind; 1],
    f: Box<ListenerFn>,
}

impl ActionListener for FnListener {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kinds(&self) -> &[ActionKind] {
        &self.kind
    }

    fn on_action(
        &self,
        action: &mut Action,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), ExecuteError> {
        (self.f)(action, ctx)
    }
}

/// Listeners keyed by the action kind they react to.
///
/// For a given kind, listeners run in registration order. Every listener sees
/// the action even after an earlier one vetoed it, so side reactions such as
/// scheduling an attack instead of a move are never skipped.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    listeners: HashMap<ActionKind, Vec<Arc<dyn ActionListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in system.
    ///
    /// Registration order, per kind:
    /// - Collision: movement, projectile flight
    /// - Items: auto-pickup and teleporters after a step
    /// - Atmosphere: breaches, doors, flamethrowers in vacuum
    /// - Combat: melee resolution
    /// - Death events: skeletons and bloats
    pub fn default_systems() -> Self {
        use crate::systems::{
            AtmosphereListener, CollisionListener, CombatListener, DeathListener, ItemListener,
        };

        let mut registry = Self::new();
        registry.register(Arc::new(CollisionListener));
        registry.register(Arc::new(ItemListener));
        registry.register(Arc::new(AtmosphereListener));
        registry.register(Arc::new(CombatListener));
        registry.register(Arc::new(DeathListener));
        registry
    }

    /// Adds `listener` for every kind it declares.
    pub fn register(&mut self, listener: Arc<dyn ActionListener>) {
        for &kind in listener.kinds() {
            self.listeners
                .entry(kind)
                .or_default()
                .push(Arc::clone(&listener));
            debug!(
                target: "core::listeners",
                listener = listener.name(),
                %kind,
                position = self.count(kind),
                "registered"
            );
        }
    }

    /// Adds a closure listener for a single kind.
    pub fn on<F>(&mut self, kind: ActionKind, name: &'static str, f: F)
    where
        F: Fn(&mut Action, &mut ActionContext<'_>) -> Result<(), ExecuteError>
            + Send
            + Sync
            + 'static,
    {
        self.register(Arc::new(FnListener {
            name,
            kind: [kind],
            f: Box::new(f),
        }));
    }

    /// Number of listeners registered for `kind`.
    pub fn count(&self, kind: ActionKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Names of the listeners for `kind`, in call order (for debugging).
    pub fn names(&self, kind: ActionKind) -> impl Iterator<Item = &'static str> + '_ {
        self.listeners
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|listener| listener.name())
    }

    /// Shows `action` to every listener registered for its kind.
    ///
    /// The first listener error aborts the broadcast.
    pub fn broadcast(
        &self,
        action: &mut Action,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), ExecuteError> {
        let Some(listeners) = self.listeners.get(&action.kind()) else {
            return Ok(());
        };
        for listener in listeners {
            let was_successful = action.success;
            listener.on_action(action, ctx)?;
            if was_successful && !action.success {
                debug!(
                    target: "core::listeners",
                    listener = listener.name(),
                    kind = %action.kind(),
                    "vetoed"
                );
            }
        }
        Ok(())
    }
}
