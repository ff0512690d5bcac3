//! Nondeterministic inputs the simulation consumes deterministically.
//!
//! The only external input the engine owns is randomness. It is exposed
//! behind [`DiceRng`] so hosts seed it explicitly and tests can replace it
//! with a fixed sequence.
mod rng;

pub use rng::{DiceRng, PcgRng, ScriptedRng};
