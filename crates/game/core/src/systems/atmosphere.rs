//! Breathable air: pressure regions, venting toward breaches, suction and
//! suffocation.
//!
//! Every recomputation here is a full pass over the level. Solid and void
//! information comes from the spatial [`CellFlags`] summary, so the
//! atmosphere never holds entity references of its own.

use std::cmp::Ordering;

use tracing::debug;

use crate::action::{Action, ActionBody, ActionContext, ActionKind, weapons};
use crate::config::GameConfig;
use crate::engine::{ActionListener, ExecuteError};
use crate::grid::{BestSet, Direction, DistanceField, Grid, UNREACHED};
use crate::state::{
    Breakable, Breathing, Burning, CellFlags, EntityId, Oxygen, PlayerCharacter, Position,
    Projectile, ProjectileKind, Ventable, WeaponKind,
};

/// Atmosphere state of a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereCell {
    /// Fraction of a breathable atmosphere, in `[0, 1]`.
    pub pressure: f32,
    /// Air is escaping through a breach.
    pub venting: bool,
    /// Pressure lost per turn while venting.
    pub vent_rate: f32,
    pub facing_vacuum: bool,
    pub facing_atmosphere: bool,
    /// Steps to the nearest vacuum while venting, [`UNREACHED`] otherwise.
    pub vacuum_distance: i32,
}

impl AtmosphereCell {
    fn new(vent_rate: f32) -> Self {
        Self {
            pressure: 0.0,
            venting: false,
            vent_rate,
            facing_vacuum: false,
            facing_atmosphere: false,
            vacuum_distance: UNREACHED,
        }
    }

    /// A solid cell with vacuum on one side and air on the other.
    pub fn is_pressure_wall(&self) -> bool {
        self.facing_vacuum && self.facing_atmosphere
    }

    pub fn class(&self) -> PressureClass {
        if self.is_pressure_wall() {
            PressureClass::PressureWall
        } else if self.pressure <= 0.0 {
            PressureClass::Vacuum
        } else if self.venting || self.pressure < 1.0 {
            PressureClass::Venting
        } else {
            PressureClass::Pressurized
        }
    }
}

/// What a renderer needs to know about a cell's air.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PressureClass {
    Vacuum,
    Venting,
    Pressurized,
    PressureWall,
}

/// Ranks a cell as a destination for something being sucked out:
/// vacuum beats venting beats still air; among venting cells, nearer the
/// vacuum is better.
fn compare_vent_target(a: &AtmosphereCell, b: &AtmosphereCell) -> Ordering {
    fn rank(cell: &AtmosphereCell) -> u8 {
        if cell.pressure <= 0.0 {
            2
        } else if cell.venting {
            1
        } else {
            0
        }
    }
    rank(a).cmp(&rank(b)).then_with(|| {
        if a.venting && b.venting {
            b.vacuum_distance.cmp(&a.vacuum_distance)
        } else {
            Ordering::Equal
        }
    })
}

/// Per-level atmosphere grid.
#[derive(Clone, Debug)]
pub struct Atmosphere {
    cells: Grid<AtmosphereCell>,
    scratch: DistanceField,
}

impl Atmosphere {
    /// Every cell starts airless until [`Atmosphere::refresh`] seals rooms.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: Grid::filled(
                width,
                height,
                AtmosphereCell::new(GameConfig::DEFAULT_VENT_RATE),
            ),
            scratch: DistanceField::new(width, height),
        }
    }

    pub fn grid(&self) -> &Grid<AtmosphereCell> {
        &self.cells
    }

    pub fn cell(&self, position: Position) -> Option<&AtmosphereCell> {
        self.cells.get(position)
    }

    /// Pressure at `position`; outside the level is vacuum.
    pub fn pressure(&self, position: Position) -> f32 {
        self.cell(position).map_or(0.0, |cell| cell.pressure)
    }

    pub fn is_venting(&self, position: Position) -> bool {
        self.cell(position).is_some_and(|cell| cell.venting)
    }

    pub fn is_pressure_wall(&self, position: Position) -> bool {
        self.cell(position).is_some_and(AtmosphereCell::is_pressure_wall)
    }

    pub fn class(&self, position: Position) -> Option<PressureClass> {
        self.cell(position).map(AtmosphereCell::class)
    }

    pub fn set_vent_rate(&mut self, vent_rate: f32) {
        for (_, cell) in self.cells.iter_mut() {
            cell.vent_rate = vent_rate;
        }
    }

    /// Connectivity, then frontiers.
    pub fn refresh(&mut self, flags: &Grid<CellFlags>) {
        self.refresh_connectivity(flags);
        self.refresh_frontiers(flags);
    }

    /// Regions sealed off from every void cell are repressurized.
    pub fn refresh_connectivity(&mut self, flags: &Grid<CellFlags>) {
        let solid = |a: &CellFlags, b: &CellFlags| {
            a.contains(CellFlags::SOLID)
                .cmp(&b.contains(CellFlags::SOLID))
        };
        for region in flags.regions(&Direction::ALL, solid) {
            let open_to_space = region
                .cells()
                .iter()
                .any(|&cell| flags[cell].contains(CellFlags::VOID));
            if open_to_space {
                continue;
            }
            for &cell in region.cells() {
                let atmosphere = &mut self.cells[cell];
                atmosphere.pressure = 1.0;
                atmosphere.venting = false;
            }
        }
    }

    /// Marks cells bordering vacuum and cells bordering breathable air.
    pub fn refresh_frontiers(&mut self, flags: &Grid<CellFlags>) {
        for (_, cell) in self.cells.iter_mut() {
            cell.facing_vacuum = false;
            cell.facing_atmosphere = false;
        }
        let out_of_open_cells =
            |from: Position, _: Position| !flags[from].contains(CellFlags::SOLID);

        let vacuum: Vec<_> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.pressure != 1.0)
            .map(|(position, _)| position)
            .collect();
        self.scratch
            .compute(vacuum, &Direction::ALL, out_of_open_cells);
        for (position, _) in self.scratch.frontier() {
            self.cells[position].facing_vacuum = true;
        }

        let air: Vec<_> = self
            .cells
            .iter()
            .filter(|(position, cell)| {
                cell.pressure == 1.0
                    && !cell.venting
                    && !flags[*position].contains(CellFlags::SOLID)
            })
            .map(|(position, _)| position)
            .collect();
        self.scratch.compute(air, &Direction::ALL, out_of_open_cells);
        for (position, _) in self.scratch.frontier() {
            self.cells[position].facing_atmosphere = true;
        }
    }

    /// Every open cell connected to a vacuum starts venting toward it.
    pub fn update_venting(&mut self, flags: &Grid<CellFlags>) {
        let vacuum: Vec<_> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.pressure == 0.0)
            .map(|(position, _)| position)
            .collect();
        self.scratch.compute(vacuum, &Direction::ALL, |_, to| {
            !flags[to].contains(CellFlags::SOLID)
        });

        for (_, cell) in self.cells.iter_mut() {
            cell.vacuum_distance = UNREACHED;
        }
        for (position, distance) in self.scratch.frontier() {
            let cell = &mut self.cells[position];
            cell.venting = true;
            cell.vacuum_distance = distance as i32;
        }
        self.refresh_frontiers(flags);
    }

    /// Lowers the pressure of venting cells. Returns true if any cell emptied.
    pub fn reduce_pressure(&mut self, time_delta: f32) -> bool {
        let mut emptied = false;
        for (_, cell) in self.cells.iter_mut().filter(|(_, cell)| cell.venting) {
            cell.pressure = (cell.pressure - cell.vent_rate * time_delta).max(0.0);
            if cell.pressure == 0.0 {
                cell.venting = false;
                emptied = true;
            }
        }
        emptied
    }

    /// The most attractive open neighbours of `position` for venting.
    pub fn vent_targets(
        &self,
        position: Position,
        flags: impl Fn(Position) -> CellFlags,
    ) -> BestSet<(Direction, AtmosphereCell), 8> {
        let mut best: BestSet<(Direction, AtmosphereCell), 8> =
            BestSet::new(|a, b| compare_vent_target(&a.1, &b.1));
        for (direction, neighbour) in self.cells.neighbours(position, &Direction::ALL) {
            if flags(neighbour).contains(CellFlags::SOLID) {
                continue;
            }
            best.insert((direction, self.cells[neighbour]));
        }
        best
    }
}

/// Advances the atmosphere by `time_delta` turns.
///
/// Suction, breathing and extinguishing are decided against the pressure at
/// the start of the step; pressure decays last.
pub fn progress(ctx: &mut ActionContext<'_>, time_delta: f32) {
    suck_entities(ctx, time_delta);
    breathe(ctx, time_delta);
    extinguish(ctx);

    if ctx.world.atmosphere_mut().reduce_pressure(time_delta) {
        let flags = ctx.world.flags_grid();
        ctx.world.atmosphere_mut().refresh_frontiers(&flags);
    }
}

/// Rolls, for each ventable entity in a venting cell, whether escaping air
/// drags it one cell toward the breach.
pub fn suck_entities(ctx: &mut ActionContext<'_>, time_delta: f32) {
    let mut ventables: Vec<(EntityId, Position)> = ctx
        .world
        .query::<(&Position, &Ventable)>()
        .iter()
        .map(|(entity, (position, _))| (EntityId(entity), *position))
        .collect();
    ventables.sort();

    let pulses = time_delta.ceil() as u32;
    for (entity, position) in ventables {
        if !ctx.world.atmosphere().is_venting(position) {
            continue;
        }
        let odds = if ctx.world.has::<PlayerCharacter>(entity) {
            ctx.config.player_vent_resistance
        } else {
            ctx.config.vent_resistance
        };
        for _ in 0..pulses {
            if ctx.roll(odds) != 1 {
                continue;
            }
            let world = &*ctx.world;
            let targets = world
                .atmosphere()
                .vent_targets(position, |cell| world.cell_flags(cell));
            if let Some(&(direction, _)) = targets.choose(ctx.rng) {
                debug!(target: "core::atmosphere", %entity, %position, %direction, "sucked");
                ctx.schedule(ActionBody::Vent {
                    entity,
                    source: position,
                    direction,
                });
            }
        }
    }
}

fn breathe(ctx: &mut ActionContext<'_>, time_delta: f32) {
    let mut breathers: Vec<(EntityId, f32, Oxygen, Position)> = ctx
        .world
        .query::<(&Breathing, &Oxygen, &Position)>()
        .iter()
        .map(|(entity, (breathing, oxygen, position))| {
            (EntityId(entity), breathing.rate, *oxygen, *position)
        })
        .collect();
    breathers.sort_by_key(|(entity, ..)| *entity);

    for (entity, rate, oxygen, position) in breathers {
        let amount = time_delta * rate;
        let pressure = ctx.world.atmosphere().pressure(position);
        if pressure <= 0.0 {
            if oxygen.value > 0.0 {
                ctx.schedule(ActionBody::ConsumeOxygen { entity, amount });
            } else {
                ctx.schedule(ActionBody::TakeDamage {
                    entity,
                    damage: amount,
                });
            }
        } else if pressure >= 1.0 {
            if oxygen.value < oxygen.max {
                ctx.schedule(ActionBody::ReplenishOxygen { entity, amount });
            }
        } else if oxygen.value <= 0.0 {
            ctx.schedule(ActionBody::TakeDamage {
                entity,
                damage: amount,
            });
        }
    }
}

fn extinguish(ctx: &mut ActionContext<'_>) {
    let mut burning: Vec<(EntityId, Position)> = ctx
        .world
        .query::<(&Burning, &Position)>()
        .iter()
        .map(|(entity, (_, position))| (EntityId(entity), *position))
        .collect();
    burning.sort();

    for (entity, position) in burning {
        if ctx.world.atmosphere().pressure(position) <= 0.0 {
            ctx.schedule(ActionBody::Extinguish { entity });
        }
    }
}

/// Structural reactions: doors, breaches, broken windows, fire in vacuum.
#[derive(Debug)]
pub struct AtmosphereListener;

impl AtmosphereListener {
    const KINDS: [ActionKind; 5] = [
        ActionKind::OpenDoor,
        ActionKind::CloseDoor,
        ActionKind::Destroy,
        ActionKind::ProjectileCollide,
        ActionKind::FireFlame,
    ];
}

impl ActionListener for AtmosphereListener {
    fn name(&self) -> &'static str {
        "atmosphere"
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
            ActionBody::OpenDoor { door, .. } if action.success => {
                let breached = ctx
                    .world
                    .position(door)
                    .is_some_and(|position| ctx.world.atmosphere().is_pressure_wall(position));
                ctx.schedule(ActionBody::OpenBreach { breached });
            }
            ActionBody::CloseDoor { .. } if action.success => {
                ctx.schedule(ActionBody::CloseBreach);
            }
            ActionBody::Destroy { entity } if action.success => {
                let breached = ctx
                    .world
                    .position(entity)
                    .is_some_and(|position| ctx.world.atmosphere().is_pressure_wall(position));
                let delay = ctx.config.breach_delay;
                ctx.schedule_in(ActionBody::OpenBreach { breached }, delay);
            }
            ActionBody::ProjectileCollide {
                projectile,
                contact,
                ..
            } => {
                if !ctx.world.has::<Breakable>(contact) {
                    return Ok(());
                }
                let Some(kind) = ctx.world.get::<Projectile>(projectile).map(|p| p.kind) else {
                    return Ok(());
                };
                let on_pressure_wall = ctx
                    .world
                    .position(contact)
                    .is_some_and(|position| ctx.world.atmosphere().is_pressure_wall(position));
                let shattered = match kind {
                    ProjectileKind::Bullet => on_pressure_wall && ctx.roll(3) == 1,
                    ProjectileKind::ShockWave => ctx.roll(3) > 1,
                    ProjectileKind::Rocket => true,
                    ProjectileKind::Fireball => false,
                };
                if shattered {
                    ctx.schedule(ActionBody::Destroy { entity: contact });
                }
            }
            ActionBody::FireFlame { entity, .. } => {
                let in_vacuum = ctx
                    .world
                    .position(entity)
                    .is_some_and(|position| ctx.world.atmosphere().pressure(position) <= 0.0);
                let loaded = weapons::ammo(ctx.world, entity, WeaponKind::Flamethrower) > 0;
                if in_vacuum && loaded {
                    action.veto();
                    ctx.schedule(ActionBody::SprayFlamethrowerFuel { entity });
                }
            }
            _ => {}
        }
        Ok(())
    }
}
