use crate::action::{Action, ActionBody, ActionContext, ActionKind};
use crate::engine::{ActionListener, ExecuteError};
use crate::state::{Bloat, Skeleton};

/// Special deaths: skeletons fall apart instead of dying, bloats burst.
#[derive(Debug)]
pub struct DeathListener;

impl DeathListener {
    const KINDS: [ActionKind; 1] = [ActionKind::Die];
}

impl ActionListener for DeathListener {
    fn name(&self) -> &'static str {
        "death_events"
    }

    fn kinds(&self) -> &[ActionKind] {
        &Self::KINDS
    }

    fn on_action(
        &self,
        action: &mut Action,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), ExecuteError> {
        let ActionBody::Die { entity } = action.body else {
            return Ok(());
        };
        if ctx.world.has::<Skeleton>(entity) {
            action.veto();
            ctx.schedule(ActionBody::CollapseSkeleton { entity });
        } else if ctx.world.has::<Bloat>(entity) {
            if let Some(position) = ctx.world.position(entity) {
                ctx.message("The bloat bursts!");
                ctx.schedule(ActionBody::Explode {
                    position,
                    radius: ctx.config.explosion_radius,
                });
            }
        }
        Ok(())
    }
}
