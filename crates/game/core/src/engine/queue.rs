use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::action::Action;

/// An action waiting in the pending queue.
#[derive(Clone, Debug)]
pub struct ScheduledAction {
    pub action: Action,
    /// Absolute tick within the current drain.
    pub time: u64,
    /// Insertion order, used to break ties between equal times.
    pub sequence: u64,
}

impl PartialEq for ScheduledAction {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl Eq for ScheduledAction {}

impl PartialOrd for ScheduledAction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledAction {
    // BinaryHeap is a max-heap; the earliest (time, sequence) must compare greatest.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.time, other.sequence).cmp(&(self.time, self.sequence))
    }
}

/// Min-priority queue of actions keyed on delay, FIFO among equal delays.
///
/// Delays are relative to the action being processed when they were
/// scheduled, so an action scheduled with delay 0 from a commit runs before
/// anything scheduled later, but after everything already queued at the same
/// tick.
#[derive(Clone, Debug, Default)]
pub struct ActionQueue {
    heap: BinaryHeap<ScheduledAction>,
    now: u64,
    next_sequence: u64,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, action: Action, delay: u64) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledAction {
            action,
            time: self.now + delay,
            sequence,
        });
    }

    /// Removes the earliest action and moves the queue clock to its time.
    pub fn pop(&mut self) -> Option<ScheduledAction> {
        let next = self.heap.pop()?;
        self.now = next.time;
        Some(next)
    }

    /// Time of the action most recently popped.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops everything still pending.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.reset_clock();
    }

    /// Rewinds the drain clock once the queue has emptied.
    pub fn reset_clock(&mut self) {
        if self.heap.is_empty() {
            self.now = 0;
            self.next_sequence = 0;
        }
    }
}
