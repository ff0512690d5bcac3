//! Component bundles for everything a level is built from.
//!
//! Creatures carry many components and are returned as
//! [`hecs::EntityBuilder`]s; spawn them with
//! `world.emplace_entity(prototypes::zombie(position).build())`. Fixtures and
//! projectiles are plain tuples.

use hecs::EntityBuilder;

use crate::state::{
    Accuracy, Attack, AutoPickup, Bloat, Breakable, Breathing, Collider, Controller, Defense,
    Dodge, Door, DownStairs, Flammable, Getable, Health, HealthKit, Knockable, Name, Oxygen,
    PlayerCharacter, Position, Projectile, ProjectileKind, Skeleton, Solid, TakesTurns, Teleport,
    TimedTransformation, Transformation, UpStairs, UpgradesOnDescent, Ventable, Void, WalkTime,
    Weapon, WeaponInventory, WeaponKind,
};

/// Turns a collapsed skeleton spends as a pile of bones.
pub const SKELETON_REASSEMBLY_TIME: f32 = 20.0;
/// Health restored by a health kit.
pub const HEALTH_KIT_VALUE: f32 = 10.0;

/// Melee profile shared by every creature.
struct Fighter {
    health: f32,
    attack: u32,
    defense: u32,
    accuracy: u32,
    dodge: u32,
}

fn creature(position: Position, name: &str, fighter: Fighter, controller: Controller) -> EntityBuilder {
    let mut builder = EntityBuilder::new();
    builder
        .add(position)
        .add(Name::new(name))
        .add(Health::full(fighter.health))
        .add(Attack(fighter.attack))
        .add(Defense(fighter.defense))
        .add(Accuracy(fighter.accuracy))
        .add(Dodge(fighter.dodge))
        .add(Collider)
        .add(Knockable)
        .add(Ventable)
        .add(TakesTurns { controller });
    builder
}

fn monster(
    position: Position,
    name: &str,
    fighter: Fighter,
    walk_time: f32,
    burn_time: f32,
) -> EntityBuilder {
    let mut builder = creature(position, name, fighter, Controller::Npc);
    builder
        .add(WalkTime(walk_time))
        .add(Flammable { burn_time });
    builder
}

pub fn player(position: Position) -> EntityBuilder {
    let fighter = Fighter {
        health: 20.0,
        attack: 2,
        defense: 1,
        accuracy: 80,
        dodge: 1,
    };
    let mut builder = creature(position, "You", fighter, Controller::Player);
    builder
        .add(PlayerCharacter)
        .add(Oxygen::full(20.0))
        .add(Breathing { rate: 1.0 })
        .add(WeaponInventory::new())
        .add(AutoPickup)
        .add(UpgradesOnDescent {
            max_depth: 1,
            health_per_depth: 2.0,
        });
    builder
}

pub fn zombie(position: Position) -> EntityBuilder {
    let fighter = Fighter {
        health: 20.0,
        attack: 2,
        defense: 1,
        accuracy: 100,
        dodge: 2,
    };
    monster(position, "zombie", fighter, 1.5, 100.0)
}

pub fn skeleton(position: Position) -> EntityBuilder {
    let fighter = Fighter {
        health: 10.0,
        attack: 1,
        defense: 1,
        accuracy: 80,
        dodge: 20,
    };
    let mut builder = monster(position, "skeleton", fighter, 0.5, 2.0);
    builder.add(Skeleton);
    builder
}

pub fn bloat(position: Position) -> EntityBuilder {
    let fighter = Fighter {
        health: 5.0,
        attack: 1,
        defense: 1,
        accuracy: 80,
        dodge: 20,
    };
    let mut builder = monster(position, "bloat", fighter, 2.0, 100.0);
    builder.add(Bloat);
    builder
}

pub fn wall(position: Position) -> (Position, Solid, Name) {
    (position, Solid, Name::new("wall"))
}

pub fn window(position: Position) -> (Position, Solid, Breakable, Name) {
    (position, Solid, Breakable, Name::new("window"))
}

/// A closed door.
pub fn door(position: Position) -> (Position, Solid, Door, Name) {
    (position, Solid, Door { open: false }, Name::new("door"))
}

pub fn void_cell(position: Position) -> (Position, Void) {
    (position, Void)
}

pub fn down_stairs(position: Position, level: usize, arrival: Position) -> (Position, DownStairs, Name) {
    (position, DownStairs { level, arrival }, Name::new("stairs down"))
}

pub fn up_stairs(position: Position, level: usize, arrival: Position) -> (Position, UpStairs, Name) {
    (position, UpStairs { level, arrival }, Name::new("stairs up"))
}

/// Inventory for a wielder starting with a fully loaded weapon.
pub fn armed(kind: WeaponKind) -> WeaponInventory {
    WeaponInventory::armed(Weapon::loaded(kind))
}

/// A weapon lying on the floor.
pub fn weapon_item(position: Position, weapon: Weapon) -> (Position, Weapon, Getable, Name) {
    let name = match weapon.kind {
        WeaponKind::Pistol => "pistol",
        WeaponKind::Shotgun => "shotgun",
        WeaponKind::MachineGun => "machine gun",
        WeaponKind::Flamethrower => "flamethrower",
        WeaponKind::RocketLauncher => "rocket launcher",
    };
    (position, weapon, Getable, Name::new(name))
}

pub fn health_kit(position: Position) -> (Position, HealthKit, Getable, Name) {
    (
        position,
        HealthKit {
            value: HEALTH_KIT_VALUE,
        },
        Getable,
        Name::new("health kit"),
    )
}

pub fn teleport(position: Position) -> (Position, Teleport, Name) {
    (position, Teleport, Name::new("teleporter"))
}

pub fn bullet(position: Position) -> (Position, Projectile, Name) {
    (
        position,
        Projectile {
            kind: ProjectileKind::Bullet,
        },
        Name::new("bullet"),
    )
}

pub fn shock_wave(position: Position) -> (Position, Projectile, Name) {
    (
        position,
        Projectile {
            kind: ProjectileKind::ShockWave,
        },
        Name::new("shock wave"),
    )
}

pub fn fireball(position: Position) -> (Position, Projectile, Name) {
    (
        position,
        Projectile {
            kind: ProjectileKind::Fireball,
        },
        Name::new("fireball"),
    )
}

pub fn bones(position: Position) -> (Position, Name) {
    (position, Name::new("bones"))
}

/// Bones that pull themselves back together into a skeleton.
pub fn collapsed_skeleton(position: Position) -> (Position, Name, TimedTransformation) {
    (
        position,
        Name::new("bones"),
        TimedTransformation {
            time: SKELETON_REASSEMBLY_TIME,
            into: Transformation::Skeleton,
        },
    )
}

pub fn rocket(position: Position) -> (Position, Projectile, Name) {
    (
        position,
        Projectile {
            kind: ProjectileKind::Rocket,
        },
        Name::new("rocket"),
    )
}

pub fn water(position: Position) -> (Position, Name) {
    (position, Name::new("water"))
}
