use breach_core::prototypes;
use breach_core::state::{
    Breathing, Burning, Collider, Flammable, Health, Meltable, Name, Oxygen, Projectile, Ventable,
    WeaponKind,
};
use breach_core::{
    ActionBody, EntityId, Engine, GameConfig, Line, Position, PressureClass, ScriptedRng, World,
};

/// A sealed room (x 1..=3) behind a closed door at (4, 1), and an open
/// corridor (x 5..=7) ending in space at (8, 1).
///
/// ```text
/// #########
/// #...+...
/// #########
/// ```
fn breach_corridor() -> (World, EntityId) {
    let mut world = World::new(1, 9, 3);
    for x in 0..9 {
        world.emplace_entity(prototypes::wall(Position::new(x, 0))).unwrap();
        world.emplace_entity(prototypes::wall(Position::new(x, 2))).unwrap();
    }
    world.emplace_entity(prototypes::wall(Position::new(0, 1))).unwrap();
    world.emplace_entity(prototypes::void_cell(Position::new(8, 1))).unwrap();
    let door = world.emplace_entity(prototypes::door(Position::new(4, 1))).unwrap();
    (world, door)
}

fn breather(oxygen: f32) -> (Position, Oxygen, Breathing, Health) {
    (
        Position::new(1, 0),
        Oxygen {
            value: oxygen,
            max: 20.0,
        },
        Breathing { rate: 1.0 },
        Health::full(10.0),
    )
}

/// A 3x1 strip whose open cells all touch space.
fn airless_strip() -> World {
    let mut world = World::new(1, 3, 1);
    world.emplace_entity(prototypes::void_cell(Position::new(0, 0))).unwrap();
    world
}

#[test]
fn breathing_in_vacuum_consumes_oxygen_first() {
    let mut world = airless_strip();
    let id = world.emplace_entity(breather(20.0)).unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, world);

    engine.progress_environment(1.0).unwrap();

    let world = engine.world();
    assert_eq!(world.get::<Oxygen>(id).unwrap().value, 19.0);
    assert_eq!(world.get::<Health>(id).unwrap().value, 10.0);
}

#[test]
fn breathing_in_vacuum_without_oxygen_hurts() {
    let mut world = airless_strip();
    let id = world.emplace_entity(breather(0.0)).unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, world);

    engine.progress_environment(1.0).unwrap();

    let world = engine.world();
    assert_eq!(world.get::<Oxygen>(id).unwrap().value, 0.0);
    assert_eq!(world.get::<Health>(id).unwrap().value, 9.0);
}

#[test]
fn breathing_air_replenishes_oxygen_up_to_max() {
    let mut world = World::new(1, 3, 1);
    let id = world.emplace_entity(breather(5.0)).unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, world);

    engine.progress_environment(2.0).unwrap();
    assert_eq!(engine.world().get::<Oxygen>(id).unwrap().value, 7.0);

    engine.progress_environment(50.0).unwrap();
    assert_eq!(engine.world().get::<Oxygen>(id).unwrap().value, 20.0);
}

#[test]
fn opening_a_pressure_wall_door_vents_the_room() {
    let (mut world, door) = breach_corridor();
    let opener = world
        .emplace_entity((Position::new(3, 1), Name::new("hand")))
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, world);

    assert_eq!(
        engine.world().pressure_class(Position::new(4, 1)),
        Some(PressureClass::PressureWall)
    );
    assert_eq!(
        engine.world().pressure_class(Position::new(2, 1)),
        Some(PressureClass::Pressurized)
    );
    assert_eq!(
        engine.world().pressure_class(Position::new(6, 1)),
        Some(PressureClass::Vacuum)
    );

    engine.schedule(
        ActionBody::OpenDoor {
            entity: opener,
            door,
        },
        0,
    );
    engine.drain().unwrap();

    let atmosphere = engine.world().atmosphere();
    let distances: Vec<_> = (1..=4)
        .rev()
        .map(|x| {
            let cell = atmosphere.cell(Position::new(x, 1)).unwrap();
            assert!(cell.venting, "cell ({x}, 1) should vent");
            cell.vacuum_distance
        })
        .collect();
    // moving away from the breach
    assert_eq!(distances, vec![1, 2, 3, 4]);
    assert_eq!(
        engine.world().pressure_class(Position::new(2, 1)),
        Some(PressureClass::Venting)
    );
}

#[test]
fn vented_room_drains_to_vacuum() {
    let (mut world, door) = breach_corridor();
    let opener = world
        .emplace_entity((Position::new(3, 1), Name::new("hand")))
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, world);
    engine.schedule(
        ActionBody::OpenDoor {
            entity: opener,
            door,
        },
        0,
    );
    engine.drain().unwrap();

    for _ in 0..11 {
        engine.progress_environment(1.0).unwrap();
    }

    let world = engine.world();
    assert_eq!(world.atmosphere().pressure(Position::new(1, 1)), 0.0);
    assert!(!world.atmosphere().is_venting(Position::new(1, 1)));
    assert_eq!(
        world.pressure_class(Position::new(1, 1)),
        Some(PressureClass::Vacuum)
    );
}

#[test]
fn breach_drags_loose_objects_toward_space() {
    let (mut world, door) = breach_corridor();
    let crate_id = world
        .emplace_entity((Position::new(3, 1), Ventable, Name::new("crate")))
        .unwrap();
    let config = GameConfig::default().with_vent_resistance(1, 1);
    let mut engine = Engine::new(config, 1, world);

    engine.schedule(
        ActionBody::OpenDoor {
            entity: crate_id,
            door,
        },
        0,
    );
    engine.drain().unwrap();

    assert_eq!(engine.world().position(crate_id), Some(Position::new(4, 1)));
}

#[test]
fn closing_the_door_seals_the_room_again() {
    let (mut world, door) = breach_corridor();
    let opener = world
        .emplace_entity((Position::new(3, 1), Name::new("hand")))
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, world);
    engine.schedule(
        ActionBody::OpenDoor {
            entity: opener,
            door,
        },
        0,
    );
    engine.drain().unwrap();
    engine.progress_environment(2.0).unwrap();
    assert!(engine.world().atmosphere().pressure(Position::new(2, 1)) < 1.0);

    engine.schedule(
        ActionBody::CloseDoor {
            entity: opener,
            door,
        },
        0,
    );
    engine.drain().unwrap();

    assert_eq!(engine.world().atmosphere().pressure(Position::new(2, 1)), 1.0);
    assert!(!engine.world().atmosphere().is_venting(Position::new(2, 1)));
}

#[test]
fn fire_burns_creatures_and_goes_out_in_vacuum() {
    let mut world = World::new(1, 5, 5);
    let torch = world
        .emplace_entity((
            Position::new(2, 2),
            Health::full(10.0),
            Flammable { burn_time: 3.0 },
            Burning::new(3.0),
        ))
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, world);

    engine.progress_environment(1.0).unwrap();
    let world = engine.world();
    assert_eq!(world.get::<Burning>(torch).unwrap().time, 2.0);
    assert_eq!(world.get::<Health>(torch).unwrap().value, 9.0);

    let mut strip = airless_strip();
    let ember = strip
        .emplace_entity((Position::new(2, 0), Burning::new(5.0), Name::new("ember")))
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, strip);
    engine.progress_environment(1.0).unwrap();
    assert!(!engine.world().has::<Burning>(ember));
}

#[test]
fn burnt_out_items_are_removed() {
    let mut world = World::new(1, 3, 3);
    let rag = world
        .emplace_entity((Position::new(1, 1), Burning::new(1.0), Name::new("rag")))
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, world);

    engine.progress_environment(1.0).unwrap();
    assert!(!engine.world().contains(rag));
}

/// `breach_corridor` with a window in place of the door.
fn windowed_corridor() -> (World, EntityId) {
    let (mut world, door) = breach_corridor();
    world.remove_entity(door).unwrap();
    let window = world
        .emplace_entity(prototypes::window(Position::new(4, 1)))
        .unwrap();
    (world, window)
}

fn gunner(world: &mut World, position: Position, kind: WeaponKind) -> EntityId {
    world
        .emplace_entity((position, Name::new("gunner"), prototypes::armed(kind)))
        .unwrap()
}

#[test]
fn shooting_out_a_pressure_wall_window_opens_a_breach() {
    let (mut world, window) = windowed_corridor();
    let shooter = gunner(&mut world, Position::new(2, 1), WeaponKind::Pistol);
    // raw 0: the d3 shatter roll comes up 1
    let rng = ScriptedRng::new([0]);
    let mut engine = Engine::with_rng(GameConfig::default(), Box::new(rng), world);
    assert_eq!(
        engine.world().pressure_class(Position::new(4, 1)),
        Some(PressureClass::PressureWall)
    );

    engine.schedule(
        ActionBody::FireBullet {
            entity: shooter,
            weapon: WeaponKind::Pistol,
            destination: Position::new(6, 1),
        },
        0,
    );
    engine.drain().unwrap();

    let world = engine.world();
    assert!(!world.contains(window));
    assert!(world.ids_with::<Projectile>().is_empty());
    let distances: Vec<_> = (1..=4)
        .map(|x| {
            let cell = world.atmosphere().cell(Position::new(x, 1)).unwrap();
            assert!(cell.venting, "cell ({x}, 1) should vent");
            cell.vacuum_distance
        })
        .collect();
    assert_eq!(distances, vec![4, 3, 2, 1]);
}

#[test]
fn a_window_that_holds_keeps_the_room_sealed() {
    let (mut world, window) = windowed_corridor();
    let shooter = gunner(&mut world, Position::new(2, 1), WeaponKind::Pistol);
    // raw 1: the d3 shatter roll comes up 2
    let rng = ScriptedRng::new([1]);
    let mut engine = Engine::with_rng(GameConfig::default(), Box::new(rng), world);

    engine.schedule(
        ActionBody::FireBullet {
            entity: shooter,
            weapon: WeaponKind::Pistol,
            destination: Position::new(6, 1),
        },
        0,
    );
    engine.drain().unwrap();

    let world = engine.world();
    assert!(world.contains(window));
    assert!(world.ids_with::<Projectile>().is_empty());
    assert!(!world.atmosphere().is_venting(Position::new(2, 1)));
    assert_eq!(world.atmosphere().pressure(Position::new(2, 1)), 1.0);
}

#[test]
fn flamethrowers_only_spray_fuel_in_vacuum() {
    let mut strip = airless_strip();
    let shooter = gunner(&mut strip, Position::new(1, 0), WeaponKind::Flamethrower);
    let mut engine = Engine::new(GameConfig::default(), 1, strip);

    engine.schedule(
        ActionBody::FireFlame {
            entity: shooter,
            line: Line::new(Position::new(1, 0), Position::new(2, 0)),
        },
        0,
    );
    engine.drain().unwrap();

    assert!(engine.world().ids_with::<Projectile>().is_empty());
    assert_eq!(
        engine.hud().last_message(),
        Some("You spray some fuel which fails to ignite.")
    );
}

#[test]
fn flamethrowers_ignite_in_air() {
    let mut world = World::new(1, 3, 1);
    let shooter = gunner(&mut world, Position::new(0, 0), WeaponKind::Flamethrower);
    let target = world
        .emplace_entity((
            Position::new(2, 0),
            Collider,
            Flammable { burn_time: 5.0 },
            Name::new("crate"),
        ))
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 1, world);

    engine.schedule(
        ActionBody::FireFlame {
            entity: shooter,
            line: Line::new(Position::new(0, 0), Position::new(2, 0)),
        },
        0,
    );
    engine.drain().unwrap();

    assert!(engine.world().has::<Burning>(target));
    assert!(engine.world().ids_with::<Projectile>().is_empty());
    assert_eq!(engine.hud().last_message(), None);
}

#[test]
fn fire_melts_ice_next_to_it() {
    let mut world = World::new(1, 3, 3);
    world
        .emplace_entity((Position::new(1, 1), Burning::new(3.0), Name::new("torch")))
        .unwrap();
    let ice = world
        .emplace_entity((Position::new(2, 1), Meltable, Name::new("ice")))
        .unwrap();
    // one spread: a d6 melt roll of 2
    let rng = ScriptedRng::rolls([2]);
    let mut engine = Engine::with_rng(GameConfig::default(), Box::new(rng), world);

    engine.progress_environment(1.0).unwrap();

    let world = engine.world();
    assert_eq!(world.get::<Name>(ice).unwrap().0, "water");
    assert!(!world.has::<Meltable>(ice));
    assert_eq!(world.position(ice), Some(Position::new(2, 1)));
}
