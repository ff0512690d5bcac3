//! Simulation systems.
//!
//! Listeners react to actions before they commit; the `progress` functions
//! turn elapsed time into actions (suction, breathing, burning,
//! transformations).
pub mod atmosphere;
mod collision;
mod combat;
mod death;
pub mod fire;
mod items;
pub mod progression;

pub use atmosphere::{Atmosphere, AtmosphereCell, AtmosphereListener, PressureClass};
pub use collision::CollisionListener;
pub use combat::CombatListener;
pub use death::DeathListener;
pub use items::ItemListener;
