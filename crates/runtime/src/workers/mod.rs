//! Background workers owned by the runtime.
//!
//! Workers are internal implementation details; clients talk to them through
//! [`crate::RuntimeHandle`].
mod simulation;

pub use simulation::{Command, SimulationWorker};
