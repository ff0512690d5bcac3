//! Seeded dice for every probabilistic decision in the simulation.
//!
//! # Determinism
//!
//! A single generator is owned by the engine and threaded through every
//! listener and commit. Given the same seed and the same sequence of player
//! actions, a game unfolds identically.

use std::collections::VecDeque;

/// Source of uniformly distributed integers.
pub trait DiceRng: Send {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Roll a die with N sides (1-N inclusive).
    fn roll(&mut self, sides: u32) -> u32 {
        if sides <= 1 {
            return 1;
        }
        (self.next_u32() % sides) + 1
    }

    /// Roll a d100 (1-100 inclusive).
    ///
    /// Common for percentage-based mechanics like hit chance.
    fn roll_d100(&mut self) -> u32 {
        self.roll(100)
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32() % range)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from
/// 64-bit state.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    /// Advance the state using the LCG formula
    /// `state' = (state * multiplier + increment) mod 2^64`.
    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output function (xorshift high, random rotate).
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl DiceRng for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

/// Replays a fixed list of raw values, then falls back to a seeded generator.
///
/// Values are raw outputs, so `roll(6)` on a scripted `4` yields `5`.
/// Use [`ScriptedRng::rolls`] to script die faces directly.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    script: VecDeque<u32>,
    fallback: PcgRng,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: values.into_iter().collect(),
            fallback: PcgRng::new(0),
        }
    }

    /// Scripts die faces: each value `v` makes the next `roll(n)` return `v`
    /// for any `n >= v`.
    pub fn rolls(faces: impl IntoIterator<Item = u32>) -> Self {
        Self::new(faces.into_iter().map(|face| face.saturating_sub(1)))
    }

    /// Number of scripted values not consumed yet.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DiceRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.script
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PcgRng::new(42);
        let mut b = PcgRng::new(42);
        let xs: Vec<_> = (0..32).map(|_| a.next_u32()).collect();
        let ys: Vec<_> = (0..32).map(|_| b.next_u32()).collect();
        assert_eq!(xs, ys);

        let mut c = PcgRng::new(43);
        let zs: Vec<_> = (0..32).map(|_| c.next_u32()).collect();
        assert_ne!(xs, zs);
    }

    #[test]
    fn rolls_stay_in_range() {
        let mut rng = PcgRng::new(1);
        for _ in 0..1000 {
            let d6 = rng.roll(6);
            assert!((1..=6).contains(&d6));
            let pct = rng.roll_d100();
            assert!((1..=100).contains(&pct));
            let r = rng.range(3, 5);
            assert!((3..=5).contains(&r));
        }
        assert_eq!(rng.range(9, 2), 9);
        assert_eq!(rng.roll(1), 1);
    }

    #[test]
    fn scripted_rolls_replay_faces() {
        let mut rng = ScriptedRng::rolls([6, 1, 100]);
        assert_eq!(rng.roll(6), 6);
        assert_eq!(rng.roll(20), 1);
        assert_eq!(rng.roll_d100(), 100);
        assert_eq!(rng.remaining(), 0);
        assert!((1..=6).contains(&rng.roll(6)));
    }
}
