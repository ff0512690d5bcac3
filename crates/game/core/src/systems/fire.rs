//! Burning entities: spread, melting, damage and burn-out.

use crate::action::{ActionBody, ActionContext};
use crate::engine::ExecuteError;
use crate::grid::Direction;
use crate::state::{Burning, EntityId, Fireproof, Flammable, Health, Meltable, Position};

/// Odds (1 in N) a flammable neighbour catches per whole turn of burning.
const SPREAD_ODDS: u32 = 20;

/// Schedules a [`ActionBody::Burn`] for every burning entity.
pub fn progress(ctx: &mut ActionContext<'_>, time_delta: f32) {
    let mut burning: Vec<EntityId> = ctx
        .world
        .query::<(&Burning, &Position)>()
        .iter()
        .map(|(entity, _)| EntityId(entity))
        .collect();
    burning.sort();

    for entity in burning {
        ctx.schedule(ActionBody::Burn {
            entity,
            time: time_delta,
        });
    }
}

/// Commit of [`ActionBody::Burn`].
///
/// Every whole turn crossed while burning gives each neighbouring entity a
/// chance to catch fire or melt.
pub(crate) fn burn(
    ctx: &mut ActionContext<'_>,
    entity: EntityId,
    time: f32,
) -> Result<(), ExecuteError> {
    let Some(burning) = ctx.world.get::<Burning>(entity).map(|b| *b) else {
        return Ok(());
    };

    let remaining = burning.time - time;
    if let Some(position) = ctx.world.position(entity) {
        let crossed = (burning.time.floor() - remaining.floor()).max(0.0) as u32;
        for _ in 0..crossed {
            spread(ctx, position);
        }
    }

    if !burning.infinite {
        if let Some(mut current) = ctx.world.get_mut::<Burning>(entity) {
            current.time = remaining;
        }
    }

    let alive = ctx.world.has::<Health>(entity);
    if alive && !ctx.world.has::<Fireproof>(entity) {
        ctx.schedule(ActionBody::TakeDamage {
            entity,
            damage: time,
        });
    }

    if !burning.infinite && remaining <= 0.0 {
        if alive {
            ctx.world.detach::<Burning>(entity);
        } else {
            ctx.world.remove_entity(entity)?;
        }
    }
    Ok(())
}

fn spread(ctx: &mut ActionContext<'_>, position: Position) {
    for direction in Direction::ALL {
        let neighbours = ctx.world.entities_at(position.step(direction)).to_vec();
        for other in neighbours {
            let flammable =
                ctx.world.has::<Flammable>(other) && !ctx.world.has::<Burning>(other);
            if flammable && ctx.roll(SPREAD_ODDS) == 1 {
                ctx.schedule(ActionBody::CatchFire { entity: other });
            }
            if ctx.world.has::<Meltable>(other) && ctx.roll(6) <= 2 {
                ctx.schedule(ActionBody::Melt { entity: other });
            }
        }
    }
}
