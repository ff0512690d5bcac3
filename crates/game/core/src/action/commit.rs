//! World changes applied by accepted actions.

use std::cmp::Ordering;

use tracing::{debug, info};

use super::{Action, ActionBody, ActionContext, weapons};
use crate::engine::ExecuteError;
use crate::grid::{Direction, Grid, Line, Radius, Trajectory};
use crate::prototypes;
use crate::state::{
    Burning, Door, DownStairs, EntityId, Flammable, Getable, Health, HealthKit, Knockable, Name,
    Oxygen, PlayerCharacter, Position, Solid, Stowed, StuckInSpace, TimedTransformation,
    Transfer, Transformation, UpStairs, UpgradesOnDescent, Weapon, WeaponInventory, WeaponKind,
    Won,
};
use crate::systems::{atmosphere, fire};

impl Action {
    /// Applies this action to the world. Only called for successful actions.
    pub(crate) fn commit(&self, ctx: &mut ActionContext<'_>) -> Result<(), ExecuteError> {
        use ActionBody::*;
        match self.body {
            Wait { .. } | MeleeAttack { .. } => {}

            Walk { entity, direction } => {
                let from = *ctx.world.require::<Position>(entity)?;
                ctx.world.set_position(entity, from.step(direction))?;
            }
            Vent {
                entity,
                source,
                direction,
            } => {
                if ctx.world.position(entity).is_some() {
                    ctx.world.set_position(entity, source.step(direction))?;
                }
            }
            Knockback {
                entity,
                destination,
            } => ctx.world.set_position(entity, destination)?,
            FallIntoSpace { entity } => {
                if ctx.world.has::<PlayerCharacter>(entity) {
                    ctx.world.turns.disable(entity);
                    ctx.world.attach(entity, StuckInSpace)?;
                    ctx.message("You drift away from the ship.");
                } else {
                    ctx.world.remove_entity(entity)?;
                }
            }

            OpenDoor { door, .. } => {
                ctx.world.require_mut::<Door>(door)?.open = true;
                ctx.world.detach::<Solid>(door);
            }
            CloseDoor { door, .. } => {
                ctx.world.require_mut::<Door>(door)?.open = false;
                ctx.world.attach(door, Solid)?;
            }
            Descend { entity, stairs } => {
                let stairs = *ctx.world.require::<DownStairs>(stairs)?;
                ctx.world.queue_transfer(Transfer {
                    entity,
                    level: stairs.level,
                    arrival: stairs.arrival,
                });
            }
            Ascend { entity, stairs } => {
                let stairs = *ctx.world.require::<UpStairs>(stairs)?;
                ctx.world.queue_transfer(Transfer {
                    entity,
                    level: stairs.level,
                    arrival: stairs.arrival,
                });
            }

            MeleeAttackHit { target, damage, .. } => ctx.schedule(TakeDamage {
                entity: target,
                damage: damage as f32,
            }),
            TakeDamage { entity, damage } => take_damage(ctx, entity, damage),
            Die { entity } => {
                ctx.world.turns.disable(entity);
                if ctx.world.has::<PlayerCharacter>(entity) {
                    ctx.hud.observe(ctx.world);
                }
                ctx.world.remove_entity(entity)?;
            }
            CollapseSkeleton { entity } => {
                if let Some(position) = ctx.world.position(entity) {
                    ctx.world
                        .replace_with(entity, prototypes::collapsed_skeleton(position))?;
                }
            }
            Explode { position, radius } => explode(ctx, position, radius)?,

            FireGun { entity, target } => weapons::fire_gun(ctx, entity, target)?,
            FireFlamethrower { entity, target } => {
                weapons::fire_flamethrower(ctx, entity, target)?
            }
            FireRocket { entity, target } => weapons::fire_rocket(ctx, entity, target)?,
            FireBullet {
                entity,
                weapon,
                destination,
            } => {
                let origin = *ctx.world.require::<Position>(entity)?;
                let line = Line::new(origin, destination);
                launch(ctx, entity, weapon, line, prototypes::bullet(origin))?;
            }
            FireFlame { entity, line } => {
                let fireball = prototypes::fireball(line.start);
                launch(ctx, entity, WeaponKind::Flamethrower, line, fireball)?;
            }
            ReduceAmmo { entity, weapon } => {
                if let Some(mut inventory) = ctx.world.get_mut::<WeaponInventory>(entity) {
                    if let Some(carried) = inventory.get_mut(weapon) {
                        carried.ammo = carried.ammo.saturating_sub(1);
                    }
                }
            }
            FailFire { .. } => ctx.message("<click>"),
            SprayFlamethrowerFuel { .. } => {
                ctx.message("You spray some fuel which fails to ignite.")
            }

            FireProjectile {
                projectile,
                trajectory,
                ..
            } => advance_projectile(ctx, projectile, trajectory, 0),
            ProjectileStep {
                projectile,
                destination,
                trajectory,
            } => {
                ctx.world.set_position(projectile, destination)?;
                let delay = ctx.config.projectile_step_delay;
                advance_projectile(ctx, projectile, trajectory, delay);
            }
            ProjectileTerminate { projectile } | ProjectileCollide { projectile, .. } => {
                ctx.world.remove_entity(projectile)?;
            }
            GetShot { entity, trajectory } => {
                let damage = 3 + ctx.roll(3);
                impact(ctx, entity, trajectory, damage, 4);
            }
            ShockWaveHit { entity, trajectory } => {
                let damage = 1 + ctx.roll(6);
                impact(ctx, entity, trajectory, damage, 2);
            }
            RocketHit { entity, trajectory } => {
                let damage = 4 + ctx.roll(6);
                impact(ctx, entity, trajectory, damage, 1);
            }

            CatchFire { entity } => {
                let Some(burn_time) = ctx.world.get::<Flammable>(entity).map(|f| f.burn_time)
                else {
                    return Ok(());
                };
                let already_burning = ctx.world.get_mut::<Burning>(entity).map(|mut burning| {
                    burning.time = burn_time;
                });
                if already_burning.is_none() {
                    ctx.world.attach(entity, Burning::new(burn_time))?;
                }
            }
            Burn { entity, time } => fire::burn(ctx, entity, time)?,
            Extinguish { entity } => {
                ctx.world.detach::<Burning>(entity);
            }
            Melt { entity } => {
                if let Some(position) = ctx.world.position(entity) {
                    ctx.world.replace_with(entity, prototypes::water(position))?;
                }
            }
            Destroy { entity } => ctx.world.remove_entity(entity)?,
            ProgressTransformation { entity, time } => transform(ctx, entity, time)?,

            PickUp { entity } => {
                let here = *ctx.world.require::<Position>(entity)?;
                let items: Vec<_> = ctx
                    .world
                    .entities_at(here)
                    .iter()
                    .copied()
                    .filter(|&item| ctx.world.has::<Getable>(item))
                    .collect();
                if items.is_empty() {
                    ctx.message("There is nothing here to pick up.");
                }
                for item in items {
                    ctx.schedule(Get { entity, item });
                }
            }
            Get { entity, item } => get(ctx, entity, item)?,
            NextWeapon { entity } => {
                if let Some(mut inventory) = ctx.world.get_mut::<WeaponInventory>(entity) {
                    inventory.switch_forwards();
                }
            }
            PreviousWeapon { entity } => {
                if let Some(mut inventory) = ctx.world.get_mut::<WeaponInventory>(entity) {
                    inventory.switch_backwards();
                }
            }
            SpecificWeapon { entity, slot } => {
                if let Some(mut inventory) = ctx.world.get_mut::<WeaponInventory>(entity) {
                    inventory.switch_to(slot);
                }
            }
            Upgrade {
                entity,
                depth,
                amount,
            } => {
                if let Some(mut health) = ctx.world.get_mut::<Health>(entity) {
                    health.max += amount;
                    health.value += amount;
                }
                if let Some(mut upgrades) = ctx.world.get_mut::<UpgradesOnDescent>(entity) {
                    upgrades.max_depth = depth;
                }
                debug!(target: "core::commit", %entity, depth, amount, "upgraded");
            }
            Win { entity } => {
                ctx.world.turns.disable(entity);
                ctx.world.attach(entity, Won)?;
                ctx.message("The teleporter hums and the ship falls away.");
                info!(target: "core::commit", %entity, "game won");
            }

            OpenBreach { breached } => {
                ctx.world.update_venting();
                if breached {
                    atmosphere::suck_entities(ctx, 1.0);
                }
            }
            CloseBreach => ctx.world.refresh_atmosphere(),
            ConsumeOxygen { entity, amount } => {
                if let Some(mut oxygen) = ctx.world.get_mut::<Oxygen>(entity) {
                    oxygen.value = (oxygen.value - amount).max(0.0);
                }
            }
            ReplenishOxygen { entity, amount } => {
                if let Some(mut oxygen) = ctx.world.get_mut::<Oxygen>(entity) {
                    oxygen.value = (oxygen.value + amount).min(oxygen.max);
                }
            }
        }
        Ok(())
    }
}

fn take_damage(ctx: &mut ActionContext<'_>, entity: EntityId, damage: f32) {
    let dead = match ctx.world.get_mut::<Health>(entity) {
        Some(mut health) => {
            health.value -= damage;
            health.value <= 0.0
        }
        None => return,
    };
    debug!(target: "core::commit", %entity, damage, dead, "damage taken");
    if dead {
        ctx.schedule(ActionBody::Die { entity });
    }
}

/// Spawns a projectile for `shooter` if its `weapon` still has ammunition.
fn launch(
    ctx: &mut ActionContext<'_>,
    shooter: EntityId,
    weapon: WeaponKind,
    line: Line,
    projectile: impl hecs::DynamicBundle,
) -> Result<(), ExecuteError> {
    if weapons::ammo(ctx.world, shooter, weapon) == 0 {
        ctx.schedule(ActionBody::FailFire { entity: shooter });
        return Ok(());
    }
    let projectile = ctx.world.emplace_entity(projectile)?;
    ctx.schedule(ActionBody::FireProjectile {
        shooter: Some(shooter),
        projectile,
        trajectory: line.trajectory(),
    });
    Ok(())
}

fn advance_projectile(
    ctx: &mut ActionContext<'_>,
    projectile: EntityId,
    mut trajectory: Trajectory,
    delay: u64,
) {
    match trajectory.next() {
        Some(destination) => ctx.schedule_in(
            ActionBody::ProjectileStep {
                projectile,
                destination,
                trajectory,
            },
            delay,
        ),
        None => ctx.schedule_in(ActionBody::ProjectileTerminate { projectile }, delay),
    }
}

/// Damage from a projectile, with a 1-in-`knockback_odds` shove along its path.
fn impact(
    ctx: &mut ActionContext<'_>,
    entity: EntityId,
    mut trajectory: Trajectory,
    damage: u32,
    knockback_odds: u32,
) {
    ctx.schedule(ActionBody::TakeDamage {
        entity,
        damage: damage as f32,
    });
    if ctx.world.has::<Knockable>(entity) && ctx.roll(knockback_odds) == 1 {
        if let Some(destination) = trajectory.next() {
            ctx.schedule(ActionBody::Knockback {
                entity,
                destination,
            });
        }
    }
}

/// Sends a ring of shock waves from `origin` out to `radius`.
fn explode(
    ctx: &mut ActionContext<'_>,
    origin: Position,
    radius: u32,
) -> Result<(), ExecuteError> {
    let grid = Grid::filled(ctx.world.width(), ctx.world.height(), ());
    let edge = radius as f32 - 1.0;
    let targets: Vec<_> = grid
        .flood_fill(
            origin,
            &Direction::ALL,
            Some(Radius::Euclidean(radius as f32)),
            |_, _| Ordering::Equal,
        )
        .filter(|&cell| origin.euclidean_distance(cell) >= edge || grid.is_border(cell))
        .collect();

    debug!(target: "core::commit", %origin, radius, waves = targets.len(), "explosion");
    for target in targets {
        let projectile = ctx.world.emplace_entity(prototypes::shock_wave(origin))?;
        ctx.schedule(ActionBody::FireProjectile {
            shooter: None,
            projectile,
            trajectory: Line::new(origin, target).trajectory(),
        });
    }
    Ok(())
}

/// Picks `item` up: weapons go to the inventory, health kits are used on the spot.
fn get(ctx: &mut ActionContext<'_>, entity: EntityId, item: EntityId) -> Result<(), ExecuteError> {
    let name = ctx
        .world
        .get::<Name>(item)
        .map(|name| name.0.clone())
        .unwrap_or_default();

    let lying = ctx.world.get::<Weapon>(item).map(|weapon| *weapon);
    if let Some(mut weapon) = lying {
        let stowed = ctx
            .world
            .require_mut::<WeaponInventory>(entity)?
            .add(&mut weapon);
        match stowed {
            Stowed::Taken => {
                ctx.world.remove_entity(item)?;
                ctx.message(format!("You take the {name}"));
            }
            Stowed::Unloaded { ammo } => {
                ctx.world.remove_entity(item)?;
                if ammo > 0 {
                    ctx.message(format!("You unload the {name}"));
                }
            }
        }
        return Ok(());
    }

    let Some(kit) = ctx.world.get::<HealthKit>(item).map(|kit| *kit) else {
        return Ok(());
    };
    let healed = match ctx.world.get_mut::<Health>(entity) {
        Some(mut health) if health.value < health.max => {
            health.value = (health.value + kit.value).min(health.max);
            true
        }
        _ => false,
    };
    if healed {
        ctx.world.remove_entity(item)?;
        ctx.message("You use the health kit");
    }
    Ok(())
}

/// Commit of [`ActionBody::ProgressTransformation`].
fn transform(ctx: &mut ActionContext<'_>, entity: EntityId, time: f32) -> Result<(), ExecuteError> {
    let due = match ctx.world.get_mut::<TimedTransformation>(entity) {
        Some(mut transformation) => {
            transformation.time = (transformation.time - time).max(0.0);
            (transformation.time == 0.0).then_some(transformation.into)
        }
        None => None,
    };
    let (Some(into), Some(position)) = (due, ctx.world.position(entity)) else {
        return Ok(());
    };
    debug!(target: "core::commit", %entity, ?into, %position, "transformed");
    match into {
        Transformation::Skeleton => {
            let mut skeleton = prototypes::skeleton(position);
            ctx.world.replace_with(entity, skeleton.build())?;
        }
    }
    Ok(())
}
