use std::sync::{Arc, Mutex};

use breach_core::state::{Accuracy, Attack, Collider, Defense, Dodge, Health, Name};
use breach_core::{
    Action, ActionBody, ActionKind, Direction, Engine, EntityId, ExecuteError, GameConfig,
    Position, ScriptedRng, StateError, World,
};

fn engine_with(world: World, rolls: impl IntoIterator<Item = u32>) -> Engine {
    Engine::with_rng(
        GameConfig::default(),
        Box::new(ScriptedRng::rolls(rolls)),
        world,
    )
}

/// Records the actor of every action of `kind` that reaches the listeners.
fn record(engine: &mut Engine, kind: ActionKind) -> Arc<Mutex<Vec<(EntityId, bool)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    engine.listeners_mut().on(kind, "recorder", move |action, _| {
        if let Some(actor) = action.actor() {
            sink.lock().unwrap().push((actor, action.success));
        }
        Ok(())
    });
    seen
}

#[test]
fn equal_delays_drain_in_schedule_order() {
    let mut world = World::new(1, 4, 4);
    let ids: Vec<_> = (0..4)
        .map(|i| world.emplace_entity((Name::new(format!("crate {i}")),)).unwrap())
        .collect();
    let mut engine = engine_with(world, []);
    let seen = record(&mut engine, ActionKind::Wait);

    engine.schedule(Action::wait(ids[0]), 10);
    engine.schedule(Action::wait(ids[1]), 0);
    engine.schedule(Action::wait(ids[2]), 10);
    engine.schedule(Action::wait(ids[3]), 0);
    engine.drain().unwrap();

    let order: Vec<_> = seen.lock().unwrap().iter().map(|(id, _)| *id).collect();
    assert_eq!(order, vec![ids[1], ids[3], ids[0], ids[2]]);
    assert!(engine.world().pending().is_empty());
}

#[test]
fn vetoed_actions_do_not_commit_but_replacements_do() {
    let mut world = World::new(1, 5, 5);
    let walker = world.emplace_entity((Position::new(1, 1),)).unwrap();
    let mut engine = engine_with(world, []);

    engine
        .listeners_mut()
        .on(ActionKind::Walk, "redirect", |action, ctx| {
            if let ActionBody::Walk { entity, .. } = action.body {
                action.veto();
                ctx.schedule(ActionBody::Knockback {
                    entity,
                    destination: Position::new(3, 3),
                });
            }
            Ok(())
        });
    let seen = record(&mut engine, ActionKind::Walk);

    engine.schedule(Action::walk(walker, Direction::East), 0);
    engine.drain().unwrap();

    // later listeners still see the vetoed walk
    assert_eq!(seen.lock().unwrap().as_slice(), &[(walker, false)]);
    assert_eq!(engine.world().position(walker), Some(Position::new(3, 3)));
}

#[test]
fn actions_on_removed_entities_are_dropped() {
    let mut world = World::new(1, 4, 4);
    let doomed = world
        .emplace_entity((Position::new(2, 2), Name::new("crate")))
        .unwrap();
    let mut engine = engine_with(world, []);
    let seen = record(&mut engine, ActionKind::Wait);

    engine.schedule(ActionBody::Destroy { entity: doomed }, 0);
    engine.schedule(Action::wait(doomed), 0);
    engine.drain().unwrap();

    assert!(!engine.world().contains(doomed));
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn commit_errors_halt_the_drain_and_clear_pending() {
    let mut world = World::new(1, 4, 4);
    let not_a_door = world
        .emplace_entity((Position::new(1, 1), Name::new("crate")))
        .unwrap();
    let mut engine = engine_with(world, []);

    engine.schedule(
        ActionBody::OpenDoor {
            entity: not_a_door,
            door: not_a_door,
        },
        0,
    );
    engine.schedule(Action::wait(not_a_door), 50);
    let error = engine.drain().unwrap_err();

    assert_eq!(
        error,
        ExecuteError::State(StateError::MissingComponent {
            entity: not_a_door,
            component: "Door",
        })
    );
    assert!(engine.world().pending().is_empty());
}

#[test]
fn melee_with_certain_hit_deals_attack_minus_defense() {
    let mut world = World::new(1, 4, 4);
    let attacker = world
        .emplace_entity((
            Position::new(1, 1),
            Accuracy(100),
            Attack(2),
            Health::full(20.0),
            Collider,
        ))
        .unwrap();
    let target = world
        .emplace_entity((
            Position::new(2, 1),
            Dodge(0),
            Defense(1),
            Health::full(20.0),
            Collider,
        ))
        .unwrap();
    // hit roll, dodge roll, two attack dice, one defense die
    let mut engine = engine_with(world, [50, 50, 6, 5, 2]);

    let damage = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&damage);
    engine
        .listeners_mut()
        .on(ActionKind::TakeDamage, "recorder", move |action, _| {
            if let ActionBody::TakeDamage { entity, damage } = action.body {
                sink.lock().unwrap().push((entity, damage));
            }
            Ok(())
        });

    engine.schedule(ActionBody::MeleeAttack { attacker, target }, 0);
    engine.drain().unwrap();

    assert_eq!(damage.lock().unwrap().as_slice(), &[(target, 9.0)]);
    assert_eq!(engine.world().get::<Health>(target).unwrap().value, 11.0);
}

#[test]
fn dodged_melee_schedules_nothing() {
    let mut world = World::new(1, 4, 4);
    let attacker = world
        .emplace_entity((Position::new(1, 1), Accuracy(100), Attack(3), Collider))
        .unwrap();
    let target = world
        .emplace_entity((Position::new(2, 1), Dodge(30), Health::full(5.0), Collider))
        .unwrap();
    let mut engine = engine_with(world, [1, 30]);
    let seen = record(&mut engine, ActionKind::MeleeAttackHit);

    engine.schedule(ActionBody::MeleeAttack { attacker, target }, 0);
    engine.drain().unwrap();

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(engine.world().get::<Health>(target).unwrap().value, 5.0);
}

#[test]
fn walking_into_a_hostile_attacks_instead() {
    let mut world = World::new(1, 5, 5);
    let player = world
        .emplace_entity(breach_core::prototypes::player(Position::new(1, 1)).build())
        .unwrap();
    let zombie = world
        .emplace_entity(breach_core::prototypes::zombie(Position::new(2, 1)).build())
        .unwrap();
    let mut engine = engine_with(world, []);
    let attacks = record(&mut engine, ActionKind::MeleeAttack);

    engine.schedule(Action::walk(player, Direction::East), 0);
    engine.drain().unwrap();

    assert_eq!(attacks.lock().unwrap().as_slice(), &[(player, false)]);
    assert_eq!(engine.world().position(player), Some(Position::new(1, 1)));
    assert!(engine.world().contains(zombie));
}
