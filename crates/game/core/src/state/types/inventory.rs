//! Weapon inventory carried by the player.
//!
//! One slot per [`WeaponKind`], numbered from 1 in [`WeaponKind::ALL`] order.
//! At most one slot is wielded at a time.

use super::components::{Weapon, WeaponKind};

const SLOTS: usize = WeaponKind::ALL.len();

/// Result of stowing a weapon picked up from the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stowed {
    /// The slot was empty; the weapon now lives in the inventory.
    Taken,
    /// A weapon of that kind was already carried; `ammo` rounds moved over.
    Unloaded { ammo: u32 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponInventory {
    slots: [Option<Weapon>; SLOTS],
    current: Option<WeaponKind>,
}

impl WeaponInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// An inventory holding and wielding `weapon`.
    pub fn armed(weapon: Weapon) -> Self {
        let mut inventory = Self::new();
        inventory.slots[weapon.kind as usize] = Some(weapon);
        inventory.current = Some(weapon.kind);
        inventory
    }

    /// The wielded weapon.
    pub fn current(&self) -> Option<Weapon> {
        self.current.and_then(|kind| self.get(kind))
    }

    pub fn current_kind(&self) -> Option<WeaponKind> {
        self.current
    }

    pub fn get(&self, kind: WeaponKind) -> Option<Weapon> {
        self.slots[kind as usize]
    }

    pub fn get_mut(&mut self, kind: WeaponKind) -> Option<&mut Weapon> {
        self.slots[kind as usize].as_mut()
    }

    /// Carried weapons in slot order.
    pub fn carried(&self) -> impl Iterator<Item = Weapon> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Stows `item`, emptying it into the carried weapon of the same kind if
    /// there is one. Taking the first weapon also wields it.
    pub fn add(&mut self, item: &mut Weapon) -> Stowed {
        match self.slots[item.kind as usize].as_mut() {
            Some(carried) => {
                let ammo = std::mem::take(&mut item.ammo);
                carried.ammo += ammo;
                Stowed::Unloaded { ammo }
            }
            None => {
                self.slots[item.kind as usize] = Some(*item);
                self.current.get_or_insert(item.kind);
                Stowed::Taken
            }
        }
    }

    /// Wields the next carried weapon after the current one, wrapping around.
    pub fn switch_forwards(&mut self) -> bool {
        let start = self.current.map_or(SLOTS - 1, |kind| kind as usize);
        self.switch_by((1..=SLOTS).map(|offset| (start + offset) % SLOTS))
    }

    pub fn switch_backwards(&mut self) -> bool {
        let start = self.current.map_or(0, |kind| kind as usize);
        self.switch_by((1..=SLOTS).map(|offset| (start + SLOTS - offset) % SLOTS))
    }

    /// Wields the weapon in `slot` (1-based). Empty slots change nothing.
    pub fn switch_to(&mut self, slot: usize) -> bool {
        match WeaponKind::from_slot(slot) {
            Some(kind) if self.get(kind).is_some() => {
                let changed = self.current != Some(kind);
                self.current = Some(kind);
                changed
            }
            _ => false,
        }
    }

    fn switch_by(&mut self, mut order: impl Iterator<Item = usize>) -> bool {
        let Some(index) = order.find(|&index| self.slots[index].is_some()) else {
            return false;
        };
        let kind = WeaponKind::ALL[index];
        let changed = self.current != Some(kind);
        self.current = Some(kind);
        changed
    }
}
