//! Level state: entities, components and the indexes kept alongside them.
//!
//! Entities live in a [`World`]; every mutation of positions or membership
//! goes through it so the spatial hash and turn queue never drift from the
//! component store.
mod error;
mod spatial;
mod types;
mod world;

pub use error::StateError;
pub use spatial::{CellFlags, SpatialHash};
pub use types::*;
pub use world::{Transfer, World};
