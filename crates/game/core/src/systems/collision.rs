use crate::action::{Action, ActionBody, ActionContext, ActionKind};
use crate::engine::{ActionListener, ExecuteError};
use crate::state::{
    Collider, Door, DownStairs, EntityId, Health, PlayerCharacter, Position, Projectile,
    ProjectileKind, Solid, UpStairs, Void,
};

/// Blocks movement into obstacles and turns bumps into door opening or
/// melee; stops projectiles at whatever they hit.
#[derive(Debug)]
pub struct CollisionListener;

impl CollisionListener {
    const KINDS: [ActionKind; 4] = [
        ActionKind::Walk,
        ActionKind::Vent,
        ActionKind::Knockback,
        ActionKind::ProjectileStep,
    ];
}

impl ActionListener for CollisionListener {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn kinds(&self) -> &[ActionKind] {
        &Self::KINDS
    }

    fn on_action(
        &self,
        action: &mut Action,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), ExecuteError> {
        match action.body {
            ActionBody::Walk { entity, direction } => match ctx.world.position(entity) {
                Some(from) => move_into(action, ctx, entity, from.step(direction), true),
                None => action.veto(),
            },
            ActionBody::Vent {
                entity,
                source,
                direction,
            } => move_into(action, ctx, entity, source.step(direction), false),
            ActionBody::Knockback {
                entity,
                destination,
            } => move_into(action, ctx, entity, destination, false),
            ActionBody::ProjectileStep {
                projectile,
                destination,
                trajectory,
            } => {
                if !ctx.world.in_bounds(destination) {
                    action.veto();
                    ctx.schedule(ActionBody::ProjectileTerminate { projectile });
                    return Ok(());
                }
                let Some(contact) = obstacle(ctx, projectile, destination) else {
                    return Ok(());
                };
                action.veto();
                ctx.schedule(ActionBody::ProjectileCollide {
                    projectile,
                    contact,
                    trajectory,
                });
                let kind = ctx.world.get::<Projectile>(projectile).map(|p| p.kind);
                let has_health = ctx.world.has::<Health>(contact);
                match kind {
                    Some(ProjectileKind::Bullet) if has_health => {
                        ctx.schedule(ActionBody::GetShot {
                            entity: contact,
                            trajectory,
                        })
                    }
                    Some(ProjectileKind::ShockWave) if has_health => {
                        ctx.schedule(ActionBody::ShockWaveHit {
                            entity: contact,
                            trajectory,
                        })
                    }
                    Some(ProjectileKind::Fireball) => {
                        ctx.schedule(ActionBody::CatchFire { entity: contact })
                    }
                    Some(ProjectileKind::Rocket) if has_health => {
                        ctx.schedule(ActionBody::RocketHit {
                            entity: contact,
                            trajectory,
                        })
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// First entity at `position` other than `mover` that blocks movement.
fn obstacle(ctx: &ActionContext<'_>, mover: EntityId, position: Position) -> Option<EntityId> {
    ctx.world.entities_at(position).iter().copied().find(|&other| {
        other != mover && (ctx.world.has::<Collider>(other) || ctx.world.has::<Solid>(other))
    })
}

/// Only the player and monsters fight; monsters jostling each other just wait.
fn hostile(ctx: &ActionContext<'_>, a: EntityId, b: EntityId) -> bool {
    ctx.world.has::<PlayerCharacter>(a) != ctx.world.has::<PlayerCharacter>(b)
}

fn move_into(
    action: &mut Action,
    ctx: &mut ActionContext<'_>,
    entity: EntityId,
    to: Position,
    walking: bool,
) {
    if !ctx.world.in_bounds(to) {
        action.veto();
        return;
    }

    if walking {
        let closed_door = ctx
            .world
            .entities_at(to)
            .iter()
            .copied()
            .find(|&door| ctx.world.get::<Door>(door).is_some_and(|door| !door.open));
        if let Some(door) = closed_door {
            action.veto();
            ctx.schedule(ActionBody::OpenDoor { entity, door });
            return;
        }

        let foe = ctx.world.entities_at(to).iter().copied().find(|&other| {
            other != entity && ctx.world.has::<Collider>(other) && ctx.world.has::<Health>(other)
        });
        if let Some(target) = foe {
            action.veto();
            if hostile(ctx, entity, target) {
                ctx.schedule(ActionBody::MeleeAttack {
                    attacker: entity,
                    target,
                });
            }
            return;
        }
    }

    if obstacle(ctx, entity, to).is_some() {
        action.veto();
        return;
    }

    if ctx.world.find_at::<Void>(to).is_some() {
        ctx.schedule(ActionBody::FallIntoSpace { entity });
    } else if walking && ctx.world.has::<PlayerCharacter>(entity) {
        if let Some(stairs) = ctx.world.find_at::<DownStairs>(to) {
            ctx.schedule(ActionBody::Descend { entity, stairs });
        } else if let Some(stairs) = ctx.world.find_at::<UpStairs>(to) {
            ctx.schedule(ActionBody::Ascend { entity, stairs });
        }
    }
}
