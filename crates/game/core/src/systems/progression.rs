//! Things that change with time or depth: timed transformations and the
//! upgrades earned by reaching new levels.

use tracing::debug;

use crate::action::{ActionBody, ActionContext};
use crate::state::{EntityId, TimedTransformation, UpgradesOnDescent, World};

/// Schedules a [`ActionBody::ProgressTransformation`] for every entity
/// waiting to transform.
pub fn progress(ctx: &mut ActionContext<'_>, time_delta: f32) {
    for entity in ctx.world.ids_with::<TimedTransformation>() {
        ctx.schedule(ActionBody::ProgressTransformation {
            entity,
            time: time_delta,
        });
    }
}

/// Queues an [`ActionBody::Upgrade`] on `world` if `entity` just arrived
/// deeper than it has ever been.
pub fn on_arrival(world: &mut World, entity: EntityId) {
    let depth = world.depth();
    let Some(upgrades) = world.get::<UpgradesOnDescent>(entity).map(|u| *u) else {
        return;
    };
    if depth <= upgrades.max_depth {
        return;
    }
    debug!(target: "core::progression", %entity, depth, "new depth reached");
    world.schedule(
        ActionBody::Upgrade {
            entity,
            depth,
            amount: upgrades.amount(depth),
        },
        0,
    );
}
