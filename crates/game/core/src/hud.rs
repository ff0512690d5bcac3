//! Player-facing readouts: vitals, weapons and the message log.

use std::collections::VecDeque;

use crate::state::{Health, Oxygen, Weapon, WeaponInventory, WeaponKind, World};

/// Messages kept for late readers.
const LOG_CAPACITY: usize = 32;

/// Values a status bar shows.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HudSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub oxygen: f32,
    pub max_oxygen: f32,
    pub depth: u32,
    /// The wielded weapon and its ammunition.
    pub weapon: Option<Weapon>,
    /// Kinds carried, in slot order.
    pub carried: Vec<WeaponKind>,
    pub message: Option<String>,
}

/// Message sink written by commits, plus the player's last observed vitals.
///
/// Vitals are refreshed after every committed action, so they still show
/// the final values once the player has been removed from the world.
#[derive(Clone, Debug, Default)]
pub struct Hud {
    snapshot: HudSnapshot,
    log: VecDeque<String>,
    unread: usize,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(text.clone());
        self.unread = (self.unread + 1).min(LOG_CAPACITY);
        self.snapshot.message = Some(text);
    }

    pub fn last_message(&self) -> Option<&str> {
        self.snapshot.message.as_deref()
    }

    /// Messages written since the previous call, oldest first.
    pub fn take_unread(&mut self) -> Vec<String> {
        let start = self.log.len() - self.unread;
        self.unread = 0;
        self.log.iter().skip(start).cloned().collect()
    }

    /// Copies the vitals of `world`'s player, if it has one.
    pub fn observe(&mut self, world: &World) {
        self.snapshot.depth = world.depth();
        let Some(player) = world.player() else {
            return;
        };
        if let Some(health) = world.get::<Health>(player) {
            self.snapshot.health = health.value;
            self.snapshot.max_health = health.max;
        }
        if let Some(oxygen) = world.get::<Oxygen>(player) {
            self.snapshot.oxygen = oxygen.value;
            self.snapshot.max_oxygen = oxygen.max;
        }
        if let Some(inventory) = world.get::<WeaponInventory>(player) {
            self.snapshot.weapon = inventory.current();
            self.snapshot.carried = inventory.carried().map(|weapon| weapon.kind).collect();
        }
    }

    pub fn snapshot(&self) -> HudSnapshot {
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototypes;
    use crate::state::Position;

    #[test]
    fn unread_messages_are_taken_once() {
        let mut hud = Hud::new();
        hud.message("<click>");
        hud.message("You drift away from the ship.");
        assert_eq!(hud.last_message(), Some("You drift away from the ship."));
        assert_eq!(hud.take_unread().len(), 2);
        assert!(hud.take_unread().is_empty());
        hud.message("again");
        assert_eq!(hud.take_unread(), vec!["again".to_string()]);
    }

    #[test]
    fn log_is_bounded() {
        let mut hud = Hud::new();
        for i in 0..(LOG_CAPACITY + 5) {
            hud.message(format!("message {i}"));
        }
        let unread = hud.take_unread();
        assert_eq!(unread.len(), LOG_CAPACITY);
        assert_eq!(unread[0], "message 5");
    }

    #[test]
    fn observe_reports_the_wielded_weapon() {
        let mut world = World::new(2, 3, 3);
        let player = world
            .emplace_entity(prototypes::player(Position::new(1, 1)).build())
            .unwrap();
        world
            .attach(player, prototypes::armed(WeaponKind::Shotgun))
            .unwrap();

        let mut hud = Hud::new();
        hud.observe(&world);
        let snapshot = hud.snapshot();

        assert_eq!(snapshot.depth, 2);
        assert_eq!(snapshot.weapon, Some(Weapon::loaded(WeaponKind::Shotgun)));
        assert_eq!(snapshot.carried, vec![WeaponKind::Shotgun]);
    }
}
