use crate::config::GameConfig;
use crate::env::DiceRng;
use crate::hud::Hud;
use crate::state::World;

use super::Action;

/// Everything a listener or commit may touch while one action is processed.
///
/// The world is the level the action was scheduled on; follow-up actions
/// scheduled through the context land in that level's pending queue.
pub struct ActionContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut dyn DiceRng,
    pub hud: &'a mut Hud,
    pub config: &'a GameConfig,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        world: &'a mut World,
        rng: &'a mut dyn DiceRng,
        hud: &'a mut Hud,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            world,
            rng,
            hud,
            config,
        }
    }

    /// Queues `action` right after everything already pending at this tick.
    pub fn schedule(&mut self, action: impl Into<Action>) {
        self.world.schedule(action, 0);
    }

    pub fn schedule_in(&mut self, action: impl Into<Action>, delay: u64) {
        self.world.schedule(action, delay);
    }

    pub fn roll(&mut self, sides: u32) -> u32 {
        self.rng.roll(sides)
    }

    pub fn message(&mut self, text: impl Into<String>) {
        self.hud.message(text);
    }
}
