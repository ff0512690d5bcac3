use breach_core::action::weapons;
use breach_core::prototypes;
use breach_core::state::{
    Health, Name, PlayerCharacter, Projectile, Weapon, WeaponInventory, WeaponKind,
};
use breach_core::{
    Action, ActionBody, Direction, Engine, GameConfig, GameOutcome, Position, ScriptedRng, World,
};

fn spawn_player(world: &mut World, position: Position) -> breach_core::EntityId {
    world
        .emplace_entity(prototypes::player(position).build())
        .unwrap()
}

#[test]
fn stairs_move_the_player_to_another_level() {
    let mut upper = World::new(1, 5, 5);
    let player = spawn_player(&mut upper, Position::new(1, 1));
    upper
        .emplace_entity(prototypes::down_stairs(
            Position::new(2, 1),
            1,
            Position::new(3, 3),
        ))
        .unwrap();
    let mut lower = World::new(2, 5, 5);
    lower
        .emplace_entity(prototypes::up_stairs(
            Position::new(3, 3),
            0,
            Position::new(2, 1),
        ))
        .unwrap();

    let mut engine = Engine::new(GameConfig::default(), 9, upper);
    assert_eq!(engine.add_level(lower), 1);

    let request = engine.begin_turn().unwrap();
    assert_eq!(request.entity, player);
    engine
        .complete_turn(Action::walk(player, Direction::East))
        .unwrap();

    assert_eq!(engine.current_level(), 1);
    assert!(engine.level(0).unwrap().player().is_none());
    assert!(engine.level(0).unwrap().turns().is_empty());

    let arrived = engine.player().unwrap();
    assert_eq!(engine.world().position(arrived), Some(Position::new(3, 3)));
    assert_eq!(engine.world().turns().len(), 1);
    assert_eq!(engine.hud().snapshot().depth, 2);

    // the arrival acts on its new level
    assert_eq!(engine.begin_turn().unwrap().entity, arrived);
}

#[test]
fn walking_into_space_loses_the_player() {
    let mut world = World::new(1, 4, 3);
    let player = spawn_player(&mut world, Position::new(1, 1));
    world
        .emplace_entity(prototypes::void_cell(Position::new(2, 1)))
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 9, world);
    assert_eq!(engine.outcome(), None);

    engine.begin_turn().unwrap();
    engine
        .complete_turn(Action::walk(player, Direction::East))
        .unwrap();

    assert_eq!(engine.outcome(), Some(GameOutcome::LostInSpace));
    assert_eq!(
        engine.hud().last_message(),
        Some("You drift away from the ship.")
    );
}

#[test]
fn player_death_ends_the_game_with_last_vitals() {
    let mut world = World::new(1, 3, 3);
    let player = spawn_player(&mut world, Position::new(1, 1));
    let mut engine = Engine::new(GameConfig::default(), 9, world);

    engine.schedule(
        ActionBody::TakeDamage {
            entity: player,
            damage: 25.0,
        },
        0,
    );
    engine.drain().unwrap();

    assert!(engine.world().ids_with::<PlayerCharacter>().is_empty());
    assert_eq!(engine.outcome(), Some(GameOutcome::Died));
    let snapshot = engine.hud().snapshot();
    assert_eq!(snapshot.health, -5.0);
    assert_eq!(snapshot.max_health, 20.0);
}

#[test]
fn skeletons_collapse_into_bones() {
    let mut world = World::new(1, 3, 3);
    let skeleton = world
        .emplace_entity(prototypes::skeleton(Position::new(1, 1)).build())
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 9, world);

    engine.schedule(
        ActionBody::TakeDamage {
            entity: skeleton,
            damage: 50.0,
        },
        0,
    );
    engine.drain().unwrap();

    let world = engine.world();
    assert!(world.contains(skeleton));
    assert_eq!(world.get::<Name>(skeleton).unwrap().0, "bones");
    assert!(!world.has::<Health>(skeleton));
    assert!(world.turns().is_empty());
}

#[test]
fn bloats_burst_into_shock_waves() {
    let mut world = World::new(1, 11, 11);
    let bloat = world
        .emplace_entity(prototypes::bloat(Position::new(5, 5)).build())
        .unwrap();
    let zombie = world
        .emplace_entity(prototypes::zombie(Position::new(7, 5)).build())
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 9, world);

    engine.schedule(
        ActionBody::TakeDamage {
            entity: bloat,
            damage: 10.0,
        },
        0,
    );
    engine.drain().unwrap();

    let world = engine.world();
    assert!(!world.contains(bloat));
    assert!(world.ids_with::<Projectile>().is_empty());
    let zombie_health = world.get::<Health>(zombie).map(|health| health.value);
    assert!(zombie_health.is_none_or(|value| value < 20.0));
    let messages = engine.hud_mut().take_unread();
    assert!(messages.iter().any(|message| message == "The bloat bursts!"));
}

#[test]
fn pistol_shot_hits_the_target_and_spends_a_round() {
    let mut world = World::new(1, 8, 3);
    let player = spawn_player(&mut world, Position::new(1, 1));
    world
        .attach(player, prototypes::armed(WeaponKind::Pistol))
        .unwrap();
    let zombie = world
        .emplace_entity(prototypes::zombie(Position::new(5, 1)).build())
        .unwrap();
    // raw values: d3 damage roll of 3, then a knockback d4 of 2
    let rng = ScriptedRng::new([2, 1]);
    let mut engine = Engine::with_rng(GameConfig::default(), Box::new(rng), world);

    engine.begin_turn().unwrap();
    engine
        .complete_turn(weapons::fire(
            player,
            WeaponKind::Pistol,
            Position::new(5, 1),
        ))
        .unwrap();

    let world = engine.world();
    assert_eq!(weapons::wielded(world, player).unwrap().ammo, 11);
    assert_eq!(world.get::<Health>(zombie).unwrap().value, 14.0);
    assert!(world.ids_with::<Projectile>().is_empty());
}

#[test]
fn shotgun_pays_once_per_burst_and_empty_guns_click() {
    let mut world = World::new(1, 10, 10);
    let player = spawn_player(&mut world, Position::new(1, 1));
    world
        .attach(
            player,
            WeaponInventory::armed(Weapon {
                kind: WeaponKind::Shotgun,
                ammo: 1,
            }),
        )
        .unwrap();
    let mut engine = Engine::new(GameConfig::default(), 9, world);

    engine.begin_turn().unwrap();
    engine
        .complete_turn(weapons::fire(
            player,
            WeaponKind::Shotgun,
            Position::new(7, 7),
        ))
        .unwrap();
    assert_eq!(weapons::wielded(engine.world(), player).unwrap().ammo, 0);

    engine.begin_turn().unwrap();
    engine
        .complete_turn(weapons::fire(
            player,
            WeaponKind::Shotgun,
            Position::new(7, 7),
        ))
        .unwrap();
    assert_eq!(engine.hud().last_message(), Some("<click>"));
    assert!(engine.world().ids_with::<Projectile>().is_empty());
}
