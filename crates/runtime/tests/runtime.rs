use breach_core::state::Controller;
use breach_core::{Action, ActionKind, Direction, GameOutcome, Position, PressureClass};
use breach_runtime::{
    ActionProvider, ApproachPlayerProvider, ChannelActionProvider, GameEvent, PlayerCommand,
    ProviderKind, Runtime, RuntimeConfig, RuntimeError, Scenario, WaitActionProvider,
};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

const ROOM: &str = "
#####
#...#
#.@.#
#...#
#####
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config() -> RuntimeConfig {
    RuntimeConfig::default().with_seed(7)
}

fn drain(events: &mut broadcast::Receiver<GameEvent>) -> Vec<GameEvent> {
    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    received
}

#[tokio::test]
async fn waiting_player_keeps_full_vitals() {
    init_tracing();
    let mut runtime = Runtime::builder()
        .config(config())
        .levels(Scenario::new().level(ROOM).build().unwrap())
        .player_provider(WaitActionProvider)
        .npc_provider(WaitActionProvider)
        .build()
        .await
        .unwrap();
    let mut events = runtime.subscribe_events();

    for _ in 0..3 {
        runtime.step().await.unwrap();
    }

    let handle = runtime.handle();
    let hud = handle.query_hud().await.unwrap();
    assert_eq!((hud.health, hud.max_health), (20.0, 20.0));
    assert_eq!((hud.oxygen, hud.depth), (20.0, 1));
    assert_eq!(handle.query_outcome().await.unwrap(), None);

    let completed: Vec<_> = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::TurnCompleted { kind, clock, .. } => Some((kind, clock.0)),
            _ => None,
        })
        .collect();
    assert_eq!(
        completed,
        vec![
            (ActionKind::Wait, 0),
            (ActionKind::Wait, 100),
            (ActionKind::Wait, 200)
        ]
    );

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn sealed_rooms_are_pressurized() {
    let runtime = Runtime::builder()
        .config(config())
        .level(Scenario::new().level(ROOM).build().unwrap().remove(0))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    assert_eq!(
        handle.query_pressure(Position::new(1, 1)).await.unwrap(),
        Some(PressureClass::Pressurized)
    );
    assert_eq!(handle.query_pressure(Position::new(9, 9)).await.unwrap(), None);
}

#[tokio::test]
async fn walking_into_space_ends_the_run() {
    let (commands, provider) = ChannelActionProvider::channel(4);
    let mut runtime = Runtime::builder()
        .config(config())
        .levels(Scenario::new().level("###\n#@ \n###").build().unwrap())
        .player_provider(provider)
        .npc_provider(WaitActionProvider)
        .build()
        .await
        .unwrap();
    let mut events = runtime.subscribe_events();

    commands
        .send(PlayerCommand::Walk(Direction::East))
        .await
        .unwrap();
    let outcome = runtime.run().await.unwrap();
    assert_eq!(outcome, GameOutcome::LostInSpace);

    let received = drain(&mut events);
    assert!(matches!(received[0], GameEvent::TurnStarted { .. }));
    assert!(received.iter().any(|event| matches!(
        event,
        GameEvent::TurnCompleted {
            kind: ActionKind::Walk,
            ..
        }
    )));
    assert!(received.iter().any(|event| matches!(
        event,
        GameEvent::Messages { lines } if lines.iter().any(|line| line == "You drift away from the ship.")
    )));
    assert_eq!(
        received.last(),
        Some(&GameEvent::GameOver {
            outcome: GameOutcome::LostInSpace
        })
    );
}

#[tokio::test]
async fn monsters_close_in_and_never_share_the_player_cell() {
    let runtime = Runtime::builder()
        .config(config())
        .levels(Scenario::new().level("######\n#@..z#\n######").build().unwrap())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let mut zombie_positions = Vec::new();
    for _ in 0..8 {
        let view = handle.begin_turn().await.unwrap();
        let action = match view.controller {
            Controller::Player => PlayerCommand::Wait.into_action(&view),
            Controller::Npc => {
                zombie_positions.push(view.position.unwrap());
                ApproachPlayerProvider.provide_action(&view).await.unwrap()
            }
        };
        handle.complete_turn(action).await.unwrap();
    }

    assert_eq!(zombie_positions[0], Position::new(4, 1));
    assert_eq!(zombie_positions[1], Position::new(3, 1));
    assert!(
        zombie_positions[2..]
            .iter()
            .all(|&position| position == Position::new(2, 1))
    );
}

#[tokio::test]
async fn actions_for_the_wrong_entity_are_rejected() {
    let runtime = Runtime::builder()
        .config(config())
        .levels(Scenario::new().level("#####\n#@.z#\n#####").build().unwrap())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let player = handle.begin_turn().await.unwrap();
    handle
        .complete_turn(Action::wait(player.entity))
        .await
        .unwrap();

    let zombie = handle.begin_turn().await.unwrap();
    assert_eq!(zombie.controller, Controller::Npc);
    let error = handle
        .complete_turn(Action::wait(player.entity))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::InvalidActionActor { expected, provided }
            if expected == zombie.entity && provided == Some(player.entity)
    ));
    assert!(!error.is_fatal());

    // the turn is still open for the right entity
    handle
        .complete_turn(Action::wait(zombie.entity))
        .await
        .unwrap();
}

#[tokio::test]
async fn steps_need_a_provider_for_the_acting_entity() {
    let mut runtime = Runtime::builder()
        .config(config())
        .levels(Scenario::new().level(ROOM).build().unwrap())
        .build()
        .await
        .unwrap();

    let error = runtime.step().await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::ProviderNotSet {
            kind: ProviderKind::Player
        }
    ));
}

#[tokio::test]
async fn building_without_levels_fails() {
    let error = Runtime::builder().build().await.err().unwrap();
    assert!(matches!(error, RuntimeError::MissingLevels));
}

#[tokio::test]
async fn hud_snapshots_serialize_for_front_ends() {
    let runtime = Runtime::builder()
        .config(config())
        .levels(Scenario::new().level(ROOM).build().unwrap())
        .build()
        .await
        .unwrap();

    let hud = runtime.handle().query_hud().await.unwrap();
    let json = serde_json::to_value(&hud).unwrap();
    assert_eq!(json["max_health"], 20.0);
    assert_eq!(json["depth"], 1);
}

#[tokio::test]
async fn reaching_the_teleporter_wins() {
    let (commands, provider) = ChannelActionProvider::channel(4);
    let mut runtime = Runtime::builder()
        .config(config())
        .levels(Scenario::new().level("#####\n#@$T#\n#####").build().unwrap())
        .player_provider(provider)
        .npc_provider(WaitActionProvider)
        .build()
        .await
        .unwrap();
    let mut events = runtime.subscribe_events();

    commands.send(PlayerCommand::PickUp).await.unwrap();
    commands
        .send(PlayerCommand::Walk(Direction::East))
        .await
        .unwrap();
    commands
        .send(PlayerCommand::Walk(Direction::East))
        .await
        .unwrap();
    assert_eq!(runtime.run().await.unwrap(), GameOutcome::Won);

    let lines: Vec<String> = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::Messages { lines } => Some(lines),
            _ => None,
        })
        .flatten()
        .collect();
    assert!(lines.iter().any(|line| line == "There is nothing here to pick up."));
    // the kit stays put while the player is unhurt
    assert!(!lines.iter().any(|line| line == "You use the health kit"));

    let hud = runtime.handle().query_hud().await.unwrap();
    assert_eq!(hud.health, hud.max_health);
}
