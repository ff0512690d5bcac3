use tracing::debug;

use crate::action::{Action, ActionBody, ActionContext, ActionKind};
use crate::engine::{ActionListener, ExecuteError};
use crate::state::{Accuracy, Attack, Defense, Dodge};

/// Resolves melee attacks into hits.
///
/// The raw attack is always vetoed. A d100 at or under the attacker's
/// accuracy lands, then a d100 at or under the target's dodge avoids it.
/// Damage is the attacker's d6 pool minus the target's d6 pool; only a
/// positive result becomes a [`ActionBody::MeleeAttackHit`].
#[derive(Debug)]
pub struct CombatListener;

impl CombatListener {
    const KINDS: [ActionKind; 1] = [ActionKind::MeleeAttack];
}

impl ActionListener for CombatListener {
    fn name(&self) -> &'static str {
        "combat"
    }

    fn kinds(&self) -> &[ActionKind] {
        &Self::KINDS
    }

    fn on_action(
        &self,
        action: &mut Action,
        ctx: &mut ActionContext<'_>,
    ) -> Result<(), ExecuteError> {
        let ActionBody::MeleeAttack { attacker, target } = action.body else {
            return Ok(());
        };
        action.veto();

        let accuracy = ctx.world.get::<Accuracy>(attacker).map_or(0, |a| a.0);
        let dodge = ctx.world.get::<Dodge>(target).map_or(0, |d| d.0);
        let attack_dice = ctx.world.get::<Attack>(attacker).map_or(0, |a| a.0);
        let defense_dice = ctx.world.get::<Defense>(target).map_or(0, |d| d.0);

        let hit_roll = ctx.rng.roll_d100();
        let dodge_roll = ctx.rng.roll_d100();
        if hit_roll > accuracy {
            debug!(target: "core::combat", %attacker, %target, hit_roll, accuracy, "missed");
            return Ok(());
        }
        if dodge_roll <= dodge {
            debug!(target: "core::combat", %attacker, %target, dodge_roll, dodge, "dodged");
            return Ok(());
        }

        let attack: u32 = (0..attack_dice).map(|_| ctx.roll(6)).sum();
        let defense: u32 = (0..defense_dice).map(|_| ctx.roll(6)).sum();
        let damage = attack.saturating_sub(defense);
        debug!(target: "core::combat", %attacker, %target, attack, defense, damage, "melee resolved");
        if damage > 0 {
            ctx.schedule(ActionBody::MeleeAttackHit {
                attacker,
                target,
                damage,
            });
        }
        Ok(())
    }
}
