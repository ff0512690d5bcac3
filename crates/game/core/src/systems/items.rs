use crate::action::{Action, ActionBody, ActionContext, ActionKind};
use crate::engine::{ActionListener, ExecuteError};
use crate::state::{AutoPickup, Getable, PlayerCharacter, Teleport};

/// Reacts to completed steps: picks up items for auto-pickers and ends the
/// game when the player reaches a teleporter.
///
/// Must run after collision so blocked walks are already vetoed.
#[derive(Debug)]
pub struct ItemListener;

impl ItemListener {
    const KINDS: [ActionKind; 1] = [ActionKind::Walk];
}

impl ActionListener for ItemListener {
    fn name(&self) -> &'static str {
        "items"
    }

    fn kinds(&self) -> &[ActionKind] {
        &Self::KINDS
    }

    fn on_action(
        &self,
        action: &mut Action,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), ExecuteError> {
        let ActionBody::Walk { entity, direction } = action.body else {
            return Ok(());
        };
        if !action.success {
            return Ok(());
        }
        let Some(to) = ctx.world.position(entity).map(|from| from.step(direction)) else {
            return Ok(());
        };

        if ctx.world.has::<AutoPickup>(entity) {
            let items: Vec<_> = ctx
                .world
                .entities_at(to)
                .iter()
                .copied()
                .filter(|&item| ctx.world.has::<Getable>(item))
                .collect();
            for item in items {
                ctx.schedule(ActionBody::Get { entity, item });
            }
        }

        if ctx.world.has::<PlayerCharacter>(entity) && ctx.world.find_at::<Teleport>(to).is_some()
        {
            ctx.schedule(ActionBody::Win { entity });
        }
        Ok(())
    }
}
