//! Actions: tagged descriptions of world changes.
//!
//! Every change to a level is expressed as an [`Action`]. An action is
//! scheduled into the level's pending queue, broadcast to the listeners
//! registered for its [`ActionKind`] (any of which may veto it or schedule
//! follow-ups), and finally committed if it is still successful.
//!
//! - `context`: the mutable view listeners and commits operate on
//! - `commit`: what each action does to the world once accepted
//! - `weapons`: firing patterns that expand one trigger pull into many actions
mod commit;
mod context;
pub mod weapons;

use arrayvec::ArrayVec;

pub use context::ActionContext;

use crate::config::GameConfig;
use crate::grid::{Direction, Line, Trajectory};
use crate::state::{EntityId, Position, WalkTime, WeaponKind, World};

/// Payload of an action. The variant is the action's kind.
#[derive(Clone, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(
    name(ActionKind),
    derive(Hash, strum::Display, strum::EnumIter, strum::IntoStaticStr),
    strum(serialize_all = "snake_case")
)]
pub enum ActionBody {
    // ===== turn actions =====
    Wait {
        entity: EntityId,
    },
    Walk {
        entity: EntityId,
        direction: Direction,
    },
    OpenDoor {
        entity: EntityId,
        door: EntityId,
    },
    CloseDoor {
        entity: EntityId,
        door: EntityId,
    },
    Descend {
        entity: EntityId,
        stairs: EntityId,
    },
    Ascend {
        entity: EntityId,
        stairs: EntityId,
    },
    FireGun {
        entity: EntityId,
        target: Position,
    },
    FireFlamethrower {
        entity: EntityId,
        target: Position,
    },
    FireRocket {
        entity: EntityId,
        target: Position,
    },
    /// Pick up whatever lies on the entity's cell.
    PickUp {
        entity: EntityId,
    },
    NextWeapon {
        entity: EntityId,
    },
    PreviousWeapon {
        entity: EntityId,
    },
    /// Wield the weapon in a 1-based inventory slot.
    SpecificWeapon {
        entity: EntityId,
        slot: usize,
    },

    // ===== movement =====
    /// Pulled one cell by escaping air. `source` is where the pull started.
    Vent {
        entity: EntityId,
        source: Position,
        direction: Direction,
    },
    Knockback {
        entity: EntityId,
        destination: Position,
    },
    FallIntoSpace {
        entity: EntityId,
    },

    // ===== combat =====
    MeleeAttack {
        attacker: EntityId,
        target: EntityId,
    },
    MeleeAttackHit {
        attacker: EntityId,
        target: EntityId,
        damage: u32,
    },
    TakeDamage {
        entity: EntityId,
        damage: f32,
    },
    Die {
        entity: EntityId,
    },
    CollapseSkeleton {
        entity: EntityId,
    },
    Explode {
        position: Position,
        radius: u32,
    },

    // ===== weapons and projectiles =====
    FireBullet {
        entity: EntityId,
        weapon: WeaponKind,
        destination: Position,
    },
    FireFlame {
        entity: EntityId,
        line: Line,
    },
    ReduceAmmo {
        entity: EntityId,
        weapon: WeaponKind,
    },
    FailFire {
        entity: EntityId,
    },
    SprayFlamethrowerFuel {
        entity: EntityId,
    },
    FireProjectile {
        shooter: Option<EntityId>,
        projectile: EntityId,
        trajectory: Trajectory,
    },
    ProjectileStep {
        projectile: EntityId,
        destination: Position,
        trajectory: Trajectory,
    },
    ProjectileTerminate {
        projectile: EntityId,
    },
    ProjectileCollide {
        projectile: EntityId,
        contact: EntityId,
        trajectory: Trajectory,
    },
    GetShot {
        entity: EntityId,
        trajectory: Trajectory,
    },
    ShockWaveHit {
        entity: EntityId,
        trajectory: Trajectory,
    },
    RocketHit {
        entity: EntityId,
        trajectory: Trajectory,
    },

    // ===== fire and matter =====
    CatchFire {
        entity: EntityId,
    },
    /// Burn for `time` turns.
    Burn {
        entity: EntityId,
        time: f32,
    },
    Extinguish {
        entity: EntityId,
    },
    Melt {
        entity: EntityId,
    },
    Destroy {
        entity: EntityId,
    },
    ProgressTransformation {
        entity: EntityId,
        time: f32,
    },

    // ===== items and progression =====
    Get {
        entity: EntityId,
        item: EntityId,
    },
    /// First arrival at `depth`: gain `amount` health.
    Upgrade {
        entity: EntityId,
        depth: u32,
        amount: f32,
    },
    Win {
        entity: EntityId,
    },

    // ===== atmosphere =====
    OpenBreach {
        breached: bool,
    },
    CloseBreach,
    ConsumeOxygen {
        entity: EntityId,
        amount: f32,
    },
    ReplenishOxygen {
        entity: EntityId,
        amount: f32,
    },
}

/// An action together with its success flag.
///
/// Listeners flip `success` through [`Action::veto`]; a vetoed action is not
/// committed but every listener still sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub body: ActionBody,
    pub success: bool,
}

impl From<ActionBody> for Action {
    fn from(body: ActionBody) -> Self {
        Self {
            body,
            success: true,
        }
    }
}

impl Action {
    pub fn wait(entity: EntityId) -> Self {
        ActionBody::Wait { entity }.into()
    }

    pub fn walk(entity: EntityId, direction: Direction) -> Self {
        ActionBody::Walk { entity, direction }.into()
    }

    pub fn kind(&self) -> ActionKind {
        ActionKind::from(&self.body)
    }

    pub fn veto(&mut self) {
        self.success = false;
    }

    pub fn is_vetoed(&self) -> bool {
        !self.success
    }

    /// The entity this action is performed by or happens to, if any.
    pub fn actor(&self) -> Option<EntityId> {
        use ActionBody::*;
        match self.body {
            Wait { entity }
            | Walk { entity, .. }
            | OpenDoor { entity, .. }
            | CloseDoor { entity, .. }
            | Descend { entity, .. }
            | Ascend { entity, .. }
            | FireGun { entity, .. }
            | FireFlamethrower { entity, .. }
            | FireRocket { entity, .. }
            | PickUp { entity }
            | NextWeapon { entity }
            | PreviousWeapon { entity }
            | SpecificWeapon { entity, .. }
            | Vent { entity, .. }
            | Knockback { entity, .. }
            | FallIntoSpace { entity }
            | TakeDamage { entity, .. }
            | Die { entity }
            | CollapseSkeleton { entity }
            | FireBullet { entity, .. }
            | FireFlame { entity, .. }
            | ReduceAmmo { entity, .. }
            | FailFire { entity }
            | SprayFlamethrowerFuel { entity }
            | GetShot { entity, .. }
            | ShockWaveHit { entity, .. }
            | RocketHit { entity, .. }
            | CatchFire { entity }
            | Burn { entity, .. }
            | Extinguish { entity }
            | Melt { entity }
            | Destroy { entity }
            | ProgressTransformation { entity, .. }
            | Get { entity, .. }
            | Upgrade { entity, .. }
            | Win { entity }
            | ConsumeOxygen { entity, .. }
            | ReplenishOxygen { entity, .. } => Some(entity),
            MeleeAttack { attacker, .. } | MeleeAttackHit { attacker, .. } => Some(attacker),
            FireProjectile { projectile, .. }
            | ProjectileStep { projectile, .. }
            | ProjectileTerminate { projectile }
            | ProjectileCollide { projectile, .. } => Some(projectile),
            Explode { .. } | OpenBreach { .. } | CloseBreach => None,
        }
    }

    /// Entities that must still exist for this action to make sense.
    ///
    /// A scheduled action whose participant was removed before its turn in
    /// the queue is dropped without being broadcast.
    pub fn participants(&self) -> ArrayVec<EntityId, 2> {
        use ActionBody::*;
        let mut participants = ArrayVec::new();
        match self.body {
            OpenDoor { door, .. } | CloseDoor { door, .. } => participants.push(door),
            Descend { entity, stairs } | Ascend { entity, stairs } => {
                participants.push(entity);
                participants.push(stairs);
            }
            Get { entity, item } => {
                participants.push(entity);
                participants.push(item);
            }
            MeleeAttack { attacker, target } | MeleeAttackHit { attacker, target, .. } => {
                participants.push(attacker);
                participants.push(target);
            }
            // the shooter may be gone by the time its shots land
            _ => participants.extend(self.actor()),
        }
        participants
    }

    /// Time in ticks the acting entity spends on this action.
    pub fn cost(&self, world: &World) -> u64 {
        match self.body {
            ActionBody::Walk { entity, .. } => world
                .get::<WalkTime>(entity)
                .map(|walk| (walk.0 * GameConfig::TICKS_PER_TURN as f32).round() as u64)
                .unwrap_or(GameConfig::DEFAULT_ACTION_COST),
            _ => GameConfig::DEFAULT_ACTION_COST,
        }
    }
}
