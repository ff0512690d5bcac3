use std::collections::{BTreeMap, HashMap};

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, Tick};

/// Errors that can occur during turn operations
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("no entities are currently active")]
    NoActiveEntities,

    #[error("no turn is in progress")]
    NoTurnInProgress,

    #[error("entity {0} is still taking its turn")]
    TurnInProgress(EntityId),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActiveEntities => ErrorSeverity::Fatal,
            Self::NoTurnInProgress | Self::TurnInProgress(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActiveEntities => "TURN_NO_ACTIVE_ENTITIES",
            Self::NoTurnInProgress => "TURN_NOT_IN_PROGRESS",
            Self::TurnInProgress(_) => "TURN_IN_PROGRESS",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnStatus {
    /// Queued and waiting for its ready tick.
    Waiting,
    /// Popped from the queue; its action has not completed yet.
    Acting,
    /// Never scheduled again.
    Disabled,
}

/// Ordering key: ready tick first, then insertion order.
type TurnKey = (Tick, u64);

#[derive(Clone, Copy, Debug)]
struct TurnEntry {
    status: TurnStatus,
    key: Option<TurnKey>,
}

/// Priority queue of turn-taking entities ordered by ready time.
///
/// Entities with equal ready times act in the order they were queued. The
/// clock only moves forward and is advanced by whoever drives the turns.
#[derive(Clone, Debug, Default)]
pub struct TurnQueue {
    queue: BTreeMap<TurnKey, EntityId>,
    entries: HashMap<EntityId, TurnEntry>,
    clock: Tick,
    next_sequence: u64,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current timeline clock value.
    pub fn clock(&self) -> Tick {
        self.clock
    }

    /// Moves the clock forward to `tick`. Earlier ticks are ignored.
    pub fn advance_to(&mut self, tick: Tick) {
        self.clock = self.clock.max(tick);
    }

    pub fn status(&self, entity: EntityId) -> Option<TurnStatus> {
        self.entries.get(&entity).map(|entry| entry.status)
    }

    /// Number of entities waiting for a turn.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queues `entity` to act at `ready_at`. Disabled entities stay disabled.
    pub fn insert(&mut self, entity: EntityId, ready_at: Tick) {
        if self.status(entity) == Some(TurnStatus::Disabled) {
            return;
        }
        self.enqueue(entity, ready_at);
    }

    fn enqueue(&mut self, entity: EntityId, ready_at: Tick) {
        if let Some(key) = self.entries.get(&entity).and_then(|entry| entry.key) {
            self.queue.remove(&key);
        }
        let key = (ready_at, self.next_sequence);
        self.next_sequence += 1;
        self.queue.insert(key, entity);
        self.entries.insert(
            entity,
            TurnEntry {
                status: TurnStatus::Waiting,
                key: Some(key),
            },
        );
    }

    /// The next entity to act and its ready tick, without removing it.
    pub fn peek(&self) -> Option<(EntityId, Tick)> {
        self.queue
            .iter()
            .next()
            .map(|(&(ready_at, _), &entity)| (entity, ready_at))
    }

    /// Removes the next entity and marks it as acting.
    pub fn pop_next(&mut self) -> Option<(EntityId, Tick)> {
        let ((ready_at, _), entity) = self.queue.pop_first()?;
        self.entries.insert(
            entity,
            TurnEntry {
                status: TurnStatus::Acting,
                key: None,
            },
        );
        Some((entity, ready_at))
    }

    /// Puts an acting entity back in the queue.
    ///
    /// Returns false when the entity stopped acting in the meantime (it was
    /// disabled, removed or moved to another level) and nothing was queued.
    pub fn requeue(&mut self, entity: EntityId, ready_at: Tick) -> bool {
        if self.status(entity) != Some(TurnStatus::Acting) {
            return false;
        }
        self.enqueue(entity, ready_at);
        true
    }

    /// Stops scheduling `entity`, permanently.
    pub fn disable(&mut self, entity: EntityId) {
        if let Some(key) = self.entries.get(&entity).and_then(|entry| entry.key) {
            self.queue.remove(&key);
        }
        self.entries.insert(
            entity,
            TurnEntry {
                status: TurnStatus::Disabled,
                key: None,
            },
        );
    }

    /// Forgets `entity` entirely.
    pub fn remove(&mut self, entity: EntityId) {
        if let Some(TurnEntry { key: Some(key), .. }) = self.entries.remove(&entity) {
            self.queue.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<EntityId> {
        let mut world = hecs::World::new();
        (0..count).map(|_| EntityId(world.spawn(()))).collect()
    }

    #[test]
    fn earliest_ready_time_goes_first() {
        let e = ids(3);
        let mut turns = TurnQueue::new();
        turns.insert(e[0], Tick(300));
        turns.insert(e[1], Tick(100));
        turns.insert(e[2], Tick(200));

        let order: Vec<_> = std::iter::from_fn(|| turns.pop_next())
            .map(|(entity, _)| entity)
            .collect();
        assert_eq!(order, vec![e[1], e[2], e[0]]);
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let e = ids(3);
        let mut turns = TurnQueue::new();
        for &entity in &e {
            turns.insert(entity, Tick(50));
        }
        assert_eq!(turns.pop_next(), Some((e[0], Tick(50))));
        assert_eq!(turns.status(e[0]), Some(TurnStatus::Acting));
        assert!(turns.requeue(e[0], Tick(50)));
        assert_eq!(turns.pop_next(), Some((e[1], Tick(50))));
        assert_eq!(turns.pop_next(), Some((e[2], Tick(50))));
        assert_eq!(turns.pop_next(), Some((e[0], Tick(50))));
    }

    #[test]
    fn disabled_entities_are_never_requeued() {
        let e = ids(2);
        let mut turns = TurnQueue::new();
        turns.insert(e[0], Tick(0));
        turns.insert(e[1], Tick(10));

        let (acting, _) = turns.pop_next().unwrap();
        turns.disable(acting);
        assert!(!turns.requeue(acting, Tick(100)));
        turns.insert(acting, Tick(100));
        assert_eq!(turns.len(), 1);
        assert_eq!(turns.peek(), Some((e[1], Tick(10))));
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut turns = TurnQueue::new();
        turns.advance_to(Tick(40));
        turns.advance_to(Tick(10));
        assert_eq!(turns.clock(), Tick(40));
    }

    #[test]
    fn removal_drops_waiting_entries() {
        let e = ids(1);
        let mut turns = TurnQueue::new();
        turns.insert(e[0], Tick(5));
        turns.remove(e[0]);
        assert!(turns.is_empty());
        assert_eq!(turns.status(e[0]), None);
    }
}
