//! Firing patterns.
//!
//! Pulling a trigger is a single turn action; the weapon expands it into a
//! burst of delayed shots and ammo reductions on the pending queue.

use std::cmp::Ordering;

use tracing::debug;

use super::{Action, ActionBody, ActionContext};
use crate::engine::ExecuteError;
use crate::grid::{Direction, Grid, Line, Radius};
use crate::prototypes;
use crate::state::{EntityId, Position, Weapon, WeaponInventory, WeaponKind, World};

/// When a burst pays for its ammunition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmmoReduction {
    PerShot,
    PerBurst,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GunStats {
    /// Spread radius per cell of distance to the target.
    pub spread: f32,
    pub burst_size: u32,
    pub time_between_shots: u64,
    pub ammo_reduction: AmmoReduction,
}

/// Flame cone parameters.
pub const FLAMETHROWER_SPREAD: f32 = 0.25;
pub const FLAMETHROWER_RANGE: u32 = 10;
pub const FLAMETHROWER_BURST: u32 = 4;
pub const FLAMETHROWER_WAVE_DELAY: u64 = 10;

impl WeaponKind {
    /// Ballistics of bullet-firing weapons, `None` for the flamethrower and
    /// the rocket launcher.
    pub fn gun_stats(self) -> Option<GunStats> {
        match self {
            WeaponKind::Pistol => Some(GunStats {
                spread: 1.0 / 16.0,
                burst_size: 1,
                time_between_shots: 0,
                ammo_reduction: AmmoReduction::PerShot,
            }),
            WeaponKind::Shotgun => Some(GunStats {
                spread: 1.0 / 3.0,
                burst_size: 6,
                time_between_shots: 0,
                ammo_reduction: AmmoReduction::PerBurst,
            }),
            WeaponKind::MachineGun => Some(GunStats {
                spread: 1.0 / 5.0,
                burst_size: 6,
                time_between_shots: 20,
                ammo_reduction: AmmoReduction::PerShot,
            }),
            WeaponKind::Flamethrower | WeaponKind::RocketLauncher => None,
        }
    }

    pub fn default_ammo(self) -> u32 {
        match self {
            WeaponKind::Pistol => 12,
            WeaponKind::Shotgun => 8,
            WeaponKind::MachineGun => 60,
            WeaponKind::Flamethrower => 20,
            WeaponKind::RocketLauncher => 5,
        }
    }
}

impl Weapon {
    pub fn loaded(kind: WeaponKind) -> Self {
        Self {
            kind,
            ammo: kind.default_ammo(),
        }
    }
}

/// The turn action for `entity` firing a weapon of `kind` at `target`.
pub fn fire(entity: EntityId, kind: WeaponKind, target: Position) -> Action {
    match kind {
        WeaponKind::Flamethrower => ActionBody::FireFlamethrower { entity, target },
        WeaponKind::RocketLauncher => ActionBody::FireRocket { entity, target },
        _ => ActionBody::FireGun { entity, target },
    }
    .into()
}

/// The weapon `entity` currently wields.
pub fn wielded(world: &World, entity: EntityId) -> Option<Weapon> {
    world
        .get::<WeaponInventory>(entity)
        .and_then(|inventory| inventory.current())
}

/// Rounds left in the `kind` weapon `entity` carries, 0 if it has none.
pub fn ammo(world: &World, entity: EntityId, kind: WeaponKind) -> u32 {
    world
        .get::<WeaponInventory>(entity)
        .and_then(|inventory| inventory.get(kind))
        .map_or(0, |weapon| weapon.ammo)
}

/// Cells within `radius` of `centre`, discovered outward from it.
fn spread(world: &World, centre: Position, radius: f32) -> Vec<Position> {
    let grid = Grid::filled(world.width(), world.height(), ());
    grid.flood_fill(
        centre,
        &Direction::ALL,
        Some(Radius::Euclidean(radius)),
        |_, _| Ordering::Equal,
    )
    .collect()
}

pub(super) fn fire_gun(
    ctx: &mut ActionContext<'_>,
    entity: EntityId,
    target: Position,
) -> Result<(), ExecuteError> {
    let origin = *ctx.world.require::<Position>(entity)?;
    let current = ctx.world.require::<WeaponInventory>(entity)?.current();
    let Some(weapon) = current else {
        ctx.schedule(ActionBody::FailFire { entity });
        return Ok(());
    };
    let Some(stats) = weapon.kind.gun_stats() else {
        debug!(target: "core::weapons", %entity, weapon = %weapon.kind, "not a gun");
        return Ok(());
    };
    if origin == target {
        return Ok(());
    }

    let mut cells = spread(ctx.world, target, stats.spread * origin.euclidean_distance(target));
    if cells.is_empty() {
        cells.push(target);
    }

    let mut delay = 0;
    for shot in 0..stats.burst_size {
        let index = ctx.rng.range(0, cells.len() as u32 - 1) as usize;
        let destination = cells[index];
        ctx.schedule_in(
            ActionBody::FireBullet {
                entity,
                weapon: weapon.kind,
                destination,
            },
            delay,
        );
        if stats.ammo_reduction == AmmoReduction::PerShot {
            ctx.schedule_in(
                ActionBody::ReduceAmmo {
                    entity,
                    weapon: weapon.kind,
                },
                delay,
            );
        }
        if shot + 1 < stats.burst_size {
            delay += stats.time_between_shots;
        }
    }
    if stats.ammo_reduction == AmmoReduction::PerBurst {
        ctx.schedule_in(
            ActionBody::ReduceAmmo {
                entity,
                weapon: weapon.kind,
            },
            delay,
        );
    }
    debug!(
        target: "core::weapons",
        %entity,
        weapon = %weapon.kind,
        %target,
        shots = stats.burst_size,
        "burst scheduled"
    );
    Ok(())
}

pub(super) fn fire_flamethrower(
    ctx: &mut ActionContext<'_>,
    entity: EntityId,
    target: Position,
) -> Result<(), ExecuteError> {
    let origin = *ctx.world.require::<Position>(entity)?;
    if origin == target {
        return Ok(());
    }

    let centre = Line::new(origin, target).coord_at(FLAMETHROWER_RANGE);
    let range = FLAMETHROWER_RANGE as f32;
    let cells: Vec<_> = spread(
        ctx.world,
        centre,
        FLAMETHROWER_SPREAD * origin.euclidean_distance(centre),
    )
    .into_iter()
    .filter(|cell| {
        let distance = origin.euclidean_distance(*cell);
        distance >= range - 1.0 && distance <= range + 1.0
    })
    .collect();

    let mut delay = 0;
    for _ in 0..FLAMETHROWER_BURST {
        for &cell in &cells {
            ctx.schedule_in(
                ActionBody::FireFlame {
                    entity,
                    line: Line::new(origin, cell),
                },
                delay,
            );
        }
        ctx.schedule_in(
            ActionBody::ReduceAmmo {
                entity,
                weapon: WeaponKind::Flamethrower,
            },
            delay,
        );
        delay += FLAMETHROWER_WAVE_DELAY;
    }
    Ok(())
}

/// One rocket along the line to `target`, stopping there.
pub(super) fn fire_rocket(
    ctx: &mut ActionContext<'_>,
    entity: EntityId,
    target: Position,
) -> Result<(), ExecuteError> {
    let origin = *ctx.world.require::<Position>(entity)?;
    if origin == target {
        return Ok(());
    }
    if ammo(ctx.world, entity, WeaponKind::RocketLauncher) == 0 {
        ctx.schedule(ActionBody::FailFire { entity });
        return Ok(());
    }

    let rocket = ctx.world.emplace_entity(prototypes::rocket(origin))?;
    ctx.schedule(ActionBody::FireProjectile {
        shooter: Some(entity),
        projectile: rocket,
        trajectory: Line::new(origin, target).trajectory(),
    });
    ctx.schedule(ActionBody::ReduceAmmo {
        entity,
        weapon: WeaponKind::RocketLauncher,
    });
    debug!(target: "core::weapons", %entity, %target, "rocket away");
    Ok(())
}
