//! Levels drawn as ASCII maps.
//!
//! Each level is a block of text, one character per cell:
//!
//! | char  | cell                                   |
//! |-------|----------------------------------------|
//! | `.`   | floor                                  |
//! | `#`   | wall                                   |
//! | `=`   | window (breakable wall)                |
//! | `+`   | closed door                            |
//! | ` `   | open space                             |
//! | `@`   | the player                             |
//! | `z`   | zombie                                 |
//! | `s`   | skeleton                               |
//! | `b`   | bloat                                  |
//! | `>`   | stairs down to the next level's `<`    |
//! | `<`   | stairs up to the previous level's `>`  |
//! | `1`-`5` | weapon lying on the floor, by slot   |
//! | `$`   | health kit                             |
//! | `&`   | pile of bones                          |
//! | `T`   | teleporter                             |
//!
//! Rows shorter than the widest one are padded with open space. Empty
//! lines before the first row and after the last one are ignored.

use serde::{Deserialize, Serialize};
use tracing::debug;

use breach_core::state::{Weapon, WeaponKind};
use breach_core::{Position, World, prototypes};

use crate::api::{Result, RuntimeError};

/// Rounds in a weapon found lying on a map.
fn floor_ammo(kind: WeaponKind) -> u32 {
    match kind {
        WeaponKind::Pistol | WeaponKind::Shotgun | WeaponKind::Flamethrower => 20,
        WeaponKind::MachineGun => 200,
        WeaponKind::RocketLauncher => 5,
    }
}

/// A stack of levels, first one on top.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub levels: Vec<String>,
    /// Weapon the player starts out wielding.
    #[serde(default)]
    pub player_weapon: Option<WeaponKind>,
}

/// One parsed level, before stairs are linked.
struct Layout {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl Layout {
    fn parse(map: &str) -> Self {
        let mut rows: Vec<Vec<char>> = map.lines().map(|line| line.chars().collect()).collect();
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }
        let leading = rows.iter().take_while(|row| row.is_empty()).count();
        rows.drain(..leading);

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(row, line)| {
            (0..self.width).map(move |column| (row, column, line.get(column).copied().unwrap_or(' ')))
        })
    }

    fn find(&self, tile: char) -> Option<Position> {
        self.cells()
            .find(|&(_, _, c)| c == tile)
            .map(|(row, column, _)| Position::new(column as i32, row as i32))
    }
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a level below the existing ones.
    pub fn level(mut self, map: impl Into<String>) -> Self {
        self.levels.push(map.into());
        self
    }

    pub fn arm_player(mut self, kind: WeaponKind) -> Self {
        self.player_weapon = Some(kind);
        self
    }

    /// Builds one world per level, in order. Depth starts at 1.
    pub fn build(&self) -> Result<Vec<World>> {
        let layouts: Vec<Layout> = self.levels.iter().map(|map| Layout::parse(map)).collect();
        let mut worlds = Vec::with_capacity(layouts.len());
        let mut player_seen = false;

        for (level, layout) in layouts.iter().enumerate() {
            let invalid = |row: usize, column: usize, reason: &'static str| {
                RuntimeError::InvalidScenario {
                    level,
                    row,
                    column,
                    reason,
                }
            };

            if layout.width == 0 {
                return Err(invalid(0, 0, "empty level"));
            }
            let width = u32::try_from(layout.width).map_err(|_| invalid(0, 0, "level too wide"))?;
            let height =
                u32::try_from(layout.rows.len()).map_err(|_| invalid(0, 0, "level too tall"))?;
            let mut world = World::new(level as u32 + 1, width, height);

            for (row, column, tile) in layout.cells() {
                let position = Position::new(column as i32, row as i32);
                match tile {
                    '.' => {}
                    ' ' => {
                        world.emplace_entity(prototypes::void_cell(position))?;
                    }
                    '#' => {
                        world.emplace_entity(prototypes::wall(position))?;
                    }
                    '=' => {
                        world.emplace_entity(prototypes::window(position))?;
                    }
                    '+' => {
                        world.emplace_entity(prototypes::door(position))?;
                    }
                    '@' => {
                        if player_seen {
                            return Err(invalid(row, column, "more than one player"));
                        }
                        player_seen = true;
                        let player = world.emplace_entity(prototypes::player(position).build())?;
                        if let Some(kind) = self.player_weapon {
                            world.attach(player, prototypes::armed(kind))?;
                        }
                    }
                    'z' => {
                        world.emplace_entity(prototypes::zombie(position).build())?;
                    }
                    's' => {
                        world.emplace_entity(prototypes::skeleton(position).build())?;
                    }
                    'b' => {
                        world.emplace_entity(prototypes::bloat(position).build())?;
                    }
                    '1'..='5' => {
                        let slot = tile as usize - '0' as usize;
                        let kind = WeaponKind::from_slot(slot)
                            .ok_or_else(|| invalid(row, column, "unknown weapon slot"))?;
                        let weapon = Weapon {
                            kind,
                            ammo: floor_ammo(kind),
                        };
                        world.emplace_entity(prototypes::weapon_item(position, weapon))?;
                    }
                    '$' => {
                        world.emplace_entity(prototypes::health_kit(position))?;
                    }
                    '&' => {
                        world.emplace_entity(prototypes::bones(position))?;
                    }
                    'T' => {
                        world.emplace_entity(prototypes::teleport(position))?;
                    }
                    '>' => {
                        let arrival = layouts
                            .get(level + 1)
                            .and_then(|below| below.find('<'))
                            .ok_or_else(|| invalid(row, column, "no stairs up on the level below"))?;
                        world.emplace_entity(prototypes::down_stairs(position, level + 1, arrival))?;
                    }
                    '<' => {
                        let arrival = level
                            .checked_sub(1)
                            .and_then(|above| layouts.get(above))
                            .and_then(|above| above.find('>'))
                            .ok_or_else(|| invalid(row, column, "no stairs down on the level above"))?;
                        world.emplace_entity(prototypes::up_stairs(position, level - 1, arrival))?;
                    }
                    _ => return Err(invalid(row, column, "unknown tile")),
                }
            }

            debug!(
                target: "runtime::scenario",
                level,
                width,
                height,
                "level built"
            );
            worlds.push(world);
        }

        Ok(worlds)
    }
}
