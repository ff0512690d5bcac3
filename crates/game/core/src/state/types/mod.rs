mod common;
mod components;
mod inventory;

pub use common::{EntityId, Position, Tick};
pub use components::*;
pub use inventory::{Stowed, WeaponInventory};
