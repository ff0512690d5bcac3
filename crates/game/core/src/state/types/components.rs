//! Component types attached to entities.
//!
//! Marker components carry no data; their presence alone changes how the
//! systems treat an entity. Everything here is plain data, behaviour lives in
//! actions and systems.

use super::common::Position;

/// Blocks movement, projectiles and airflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Solid;

/// Open space. Any region of open cells touching one cannot hold pressure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Void;

/// Occupies its cell: walking or shooting into it bumps instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Collider;

/// Can be shattered by gunfire or shockwaves (windows).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Breakable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerCharacter;

/// Venting cells drag this entity towards the vacuum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ventable;

/// Bullets and shockwaves can push this entity back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Knockable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fireproof;

/// Turns to water when fire is near.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Meltable;

/// Collapses into bones instead of dying.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Skeleton;

/// Bursts when killed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bloat;

/// The entity drifted out of the ship; the game is lost for the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StuckInSpace;

/// The entity reached a teleporter; the game is won for the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Won;

/// Stepping on it wins the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Teleport;

/// Lying items can be picked up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Getable;

/// Picks up whatever it walks onto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutoPickup;

/// Restores up to `value` health when picked up by a wounded entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthKit {
    pub value: f32,
}

/// Gains health the first time it reaches each new depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradesOnDescent {
    /// Deepest level reached so far.
    pub max_depth: u32,
    pub health_per_depth: f32,
}

impl UpgradesOnDescent {
    /// Health gained on first reaching `depth`.
    pub fn amount(&self, depth: u32) -> f32 {
        depth as f32 * self.health_per_depth
    }
}

/// What a [`TimedTransformation`] turns its entity into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transformation {
    Skeleton,
}

/// Becomes something else once `time` turns have passed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedTransformation {
    pub time: f32,
    pub into: Transformation,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Door {
    pub open: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Health {
    pub value: f32,
    pub max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { value: max, max }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oxygen {
    pub value: f32,
    pub max: f32,
}

impl Oxygen {
    pub fn full(max: f32) -> Self {
        Self { value: max, max }
    }
}

/// Oxygen consumed per turn in vacuum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breathing {
    pub rate: f32,
}

/// Percent chance to land a melee attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accuracy(pub u32);

/// Percent chance to avoid a landed melee attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dodge(pub u32);

/// Number of d6 rolled for melee damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attack(pub u32);

/// Number of d6 rolled to soak melee damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Defense(pub u32);

/// Who decides what a turn-taking entity does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Controller {
    Player,
    Npc,
}

/// The entity is scheduled by the turn queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TakesTurns {
    pub controller: Controller,
}

/// Turns spent per step. Entities without it walk at one turn per step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkTime(pub f32);

/// Burns for `burn_time` turns once lit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flammable {
    pub burn_time: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burning {
    pub time: f32,
    pub infinite: bool,
}

impl Burning {
    pub fn new(time: f32) -> Self {
        Self {
            time,
            infinite: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    Bullet,
    ShockWave,
    Fireball,
    Rocket,
}

/// An entity in flight along a trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projectile {
    pub kind: ProjectileKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum WeaponKind {
    Pistol,
    Shotgun,
    MachineGun,
    Flamethrower,
    RocketLauncher,
}

impl WeaponKind {
    /// Every kind, in slot order.
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Pistol,
        WeaponKind::Shotgun,
        WeaponKind::MachineGun,
        WeaponKind::Flamethrower,
        WeaponKind::RocketLauncher,
    ];

    /// Inventory slot number, starting at 1.
    pub fn slot(self) -> usize {
        self as usize + 1
    }

    pub fn from_slot(slot: usize) -> Option<Self> {
        slot.checked_sub(1)
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }
}

/// A weapon and its remaining ammunition.
///
/// Attached to an entity with a position it is an item lying on the floor;
/// wielders keep theirs in a [`WeaponInventory`](super::WeaponInventory).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weapon {
    pub kind: WeaponKind,
    pub ammo: u32,
}

/// Staircase leading to another level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DownStairs {
    pub level: usize,
    pub arrival: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpStairs {
    pub level: usize,
    pub arrival: Position,
}
