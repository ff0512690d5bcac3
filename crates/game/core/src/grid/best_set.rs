use std::cmp::Ordering;

use arrayvec::ArrayVec;

use crate::env::DiceRng;

/// Running set of the best items seen so far under a total order.
///
/// Items comparing [`Ordering::Greater`] than the current best replace the
/// whole set, ties are kept (up to `N`), everything else is dropped.
pub struct BestSet<T, const N: usize> {
    items: ArrayVec<T, N>,
    compare: fn(&T, &T) -> Ordering,
}

impl<T, const N: usize> BestSet<T, N> {
    pub fn new(compare: fn(&T, &T) -> Ordering) -> Self {
        Self {
            items: ArrayVec::new(),
            compare,
        }
    }

    pub fn insert(&mut self, item: T) {
        let Some(best) = self.items.first() else {
            self.items.push(item);
            return;
        };
        match (self.compare)(&item, best) {
            Ordering::Greater => {
                self.items.clear();
                self.items.push(item);
            }
            Ordering::Equal => {
                let _ = self.items.try_push(item);
            }
            Ordering::Less => {}
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Picks one of the tied best items uniformly.
    pub fn choose(&self, rng: &mut dyn DiceRng) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        let index = rng.range(0, self.items.len() as u32 - 1) as usize;
        self.items.get(index)
    }
}
