use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use pursuit_core::{
    ContestType, MessageId, Participant, ParticipantId, PursuitCommand, PursuitError, RollResult,
    Side, SkillTest, SuccessLevel, User, UserId,
};
use pursuit_runtime::{
    ChatEvent, Event, FileMessageRepository, RollProvider, RollRequest, Runtime, RuntimeConfig,
    RuntimeError, Topic,
};

/// Replays fixed tests per participant id.
struct ScriptedRolls(HashMap<String, SkillTest>);

impl ScriptedRolls {
    /// `(id, success level)` pairs, expressed as tests against a target of 50.
    fn new(entries: &[(&str, i32)]) -> Self {
        Self(
            entries
                .iter()
                .map(|&(id, sl)| {
                    let roll = (5 - sl) * 10 + 1;
                    (id.to_owned(), SkillTest::new(50, roll as u32))
                })
                .collect(),
        )
    }
}

#[async_trait]
impl RollProvider for ScriptedRolls {
    async fn roll(&self, request: RollRequest<'_>) -> pursuit_runtime::Result<SkillTest> {
        self.0
            .get(request.participant.id.as_str())
            .copied()
            .ok_or_else(|| RuntimeError::RollFailed(format!("no script for {}", request.participant.id)))
    }
}

fn gm() -> User {
    User::game_master("gm", "Game Master")
}

fn player() -> User {
    User::player("p1", "Anna")
}

fn quarry() -> Vec<Participant> {
    vec![
        Participant::new("thief", "Thief", 50),
        Participant::new("fence", "Fence", 50),
    ]
}

fn pursuers() -> Vec<Participant> {
    vec![
        Participant::new("guard", "Guard", 50),
        Participant::new("captain", "Captain", 50),
    ]
}

fn sl_of(results: &pursuit_core::ResultList, id: &str) -> Option<i32> {
    results
        .get(&ParticipantId::new(id))
        .map(|entry| entry.success_level.get())
}

async fn table() -> Runtime {
    Runtime::builder()
        .user(gm())
        .user(player())
        .build()
        .await
        .expect("runtime should start")
}

#[tokio::test]
async fn full_round_closes_the_distance() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();
    let anna = runtime.handle_for(&UserId::new("p1")).unwrap();

    let first = gm
        .start_pursuit(&PursuitCommand::parse("/pursuit 5 Simple Athletics true").unwrap())
        .await
        .unwrap()
        .expect("simple pursuit posts a card");
    assert_eq!(first.system.distance, 5.0);
    assert_eq!(first.system.round, 1);
    assert_eq!(first.ownership_of(&UserId::new("p1")), pursuit_core::OwnershipLevel::Owner);

    let quarry_dice = ScriptedRolls::new(&[("thief", 2), ("fence", 5)]);
    let pursuer_dice = ScriptedRolls::new(&[("guard", 1), ("captain", 4)]);

    // The player's rolls travel through the relay.
    anna.roll(first.id, Side::Quarry, &quarry(), &quarry_dice)
        .await
        .unwrap();
    let rolled = gm
        .roll(first.id, Side::Pursuers, &pursuers(), &pursuer_dice)
        .await
        .unwrap();

    assert_eq!(sl_of(&rolled.system.quarry, "thief"), Some(2));
    assert_eq!(sl_of(&rolled.system.quarry, "fence"), Some(5));
    assert_eq!(sl_of(&rolled.system.pursuers, "captain"), Some(4));

    let next = gm.resolve_round(first.id).await.unwrap();
    assert_ne!(next.id, first.id);
    assert_eq!(next.system.distance, 3.0);
    assert_eq!(next.system.round, 2);
    assert!(next.system.quarry.is_empty());
    assert!(next.system.pursuers.is_empty());
    assert_eq!(next.system.skill, rolled.system.skill);

    // The resolved card keeps its results.
    let old = gm.message(first.id).await.unwrap();
    assert_eq!(old.system, rolled.system);
    assert_eq!(gm.messages().await.unwrap().len(), 2);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn rerolling_replaces_the_previous_entry() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();
    let anna = runtime.handle_for(&UserId::new("p1")).unwrap();

    let card = gm
        .start_pursuit(&PursuitCommand::new(4))
        .await
        .unwrap()
        .unwrap();

    let thief = &quarry()[..1];
    anna.roll(card.id, Side::Quarry, thief, &ScriptedRolls::new(&[("thief", 1)]))
        .await
        .unwrap();
    let after = anna
        .roll(card.id, Side::Quarry, thief, &ScriptedRolls::new(&[("thief", -2)]))
        .await
        .unwrap();

    assert_eq!(after.system.quarry.len(), 1);
    assert_eq!(sl_of(&after.system.quarry, "thief"), Some(-2));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn concurrent_writes_for_different_participants_both_land() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();
    let anna = runtime.handle_for(&UserId::new("p1")).unwrap();

    let card = gm
        .start_pursuit(&PursuitCommand::new(6))
        .await
        .unwrap()
        .unwrap();

    let entry = |id: &str, sl: i32| RollResult::new(ParticipantId::new(id), id, SuccessLevel(sl));

    let (relayed, direct) = tokio::join!(
        anna.record_result(card.id, Side::Quarry, entry("thief", 3)),
        gm.record_result(card.id, Side::Quarry, entry("fence", 0)),
    );
    relayed.unwrap();
    direct.unwrap();

    let stored = gm.message(card.id).await.unwrap();
    assert_eq!(stored.system.quarry.len(), 2);
    assert_eq!(sl_of(&stored.system.quarry, "thief"), Some(3));
    assert_eq!(sl_of(&stored.system.quarry, "fence"), Some(0));

    runtime.shutdown().await.unwrap();
}

/// Applies `steps` to a fresh pursuit, writing through `writer`'s handle.
async fn play_sequence(writer: &str, steps: &[(Side, &str, i32)]) -> pursuit_core::PursuitState {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();
    let handle = runtime.handle_for(&UserId::new(writer)).unwrap();

    let card = gm
        .start_pursuit(&PursuitCommand::new(6))
        .await
        .unwrap()
        .unwrap();
    for &(side, id, sl) in steps {
        let entry = RollResult::new(ParticipantId::new(id), id, SuccessLevel(sl));
        handle.record_result(card.id, side, entry).await.unwrap();
    }

    let state = gm.message(card.id).await.unwrap().system;
    runtime.shutdown().await.unwrap();
    state
}

#[tokio::test]
async fn same_sequence_converges_through_relay_and_direct() {
    let steps = [
        (Side::Quarry, "thief", 2),
        (Side::Pursuers, "guard", -1),
        (Side::Quarry, "fence", 0),
        (Side::Quarry, "thief", -3),
        (Side::Pursuers, "captain", 4),
        (Side::Pursuers, "guard", 1),
    ];

    let relayed = play_sequence("p1", &steps).await;
    let direct = play_sequence("gm", &steps).await;

    assert_eq!(relayed, direct);
    assert_eq!(relayed.quarry.len(), 2);
    assert_eq!(sl_of(&relayed.quarry, "thief"), Some(-3));
    assert_eq!(sl_of(&relayed.pursuers, "guard"), Some(1));
}

#[tokio::test]
async fn resolved_cards_accept_no_more_play() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();
    let anna = runtime.handle_for(&UserId::new("p1")).unwrap();
    let mut notes = anna.subscribe(Topic::Notification);

    let card = gm
        .start_pursuit(&PursuitCommand::new(5))
        .await
        .unwrap()
        .unwrap();
    gm.roll(card.id, Side::Quarry, &quarry(), &ScriptedRolls::new(&[("thief", 2), ("fence", 5)]))
        .await
        .unwrap();
    gm.roll(card.id, Side::Pursuers, &pursuers(), &ScriptedRolls::new(&[("guard", 1), ("captain", 4)]))
        .await
        .unwrap();
    let history = gm.message(card.id).await.unwrap().system;
    let next = gm.resolve_round(card.id).await.unwrap();

    // A late roll on the resolved card is refused and reported.
    let late = RollResult::new(ParticipantId::new("thief"), "Thief", SuccessLevel(-4));
    let outcome = anna.record_result(card.id, Side::Quarry, late).await;
    assert!(matches!(
        outcome,
        Err(RuntimeError::Pursuit(PursuitError::RoundClosed { round: 1, superseded_by }))
            if superseded_by == next.id
    ));
    match notes.recv().await {
        Ok(Event::Notification(note)) => assert_eq!(note.key, "PURSUIT.RoundClosed"),
        other => panic!("expected notification, got {other:?}"),
    }

    // Resolving it again does not fork the pursuit.
    assert!(matches!(
        gm.resolve_round(card.id).await,
        Err(RuntimeError::Pursuit(PursuitError::RoundClosed { .. }))
    ));

    let old = gm.message(card.id).await.unwrap();
    assert_eq!(old.system, history);
    assert_eq!(old.superseded_by, Some(next.id));
    assert_eq!(gm.messages().await.unwrap().len(), 2);

    // The successor card is still open for play.
    anna.roll(next.id, Side::Quarry, &quarry()[..1], &ScriptedRolls::new(&[("thief", 0)]))
        .await
        .unwrap();

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn extreme_success_levels_keep_the_authority_alive() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();

    let card = gm
        .start_pursuit(&PursuitCommand::new(5))
        .await
        .unwrap()
        .unwrap();
    gm.record_result(
        card.id,
        Side::Quarry,
        RollResult::new(ParticipantId::new("thief"), "Thief", SuccessLevel(i32::MIN)),
    )
    .await
    .unwrap();
    gm.record_result(
        card.id,
        Side::Pursuers,
        RollResult::new(ParticipantId::new("guard"), "Guard", SuccessLevel(1)),
    )
    .await
    .unwrap();

    let next = gm.resolve_round(card.id).await.unwrap();
    assert_eq!(next.system.distance, 5.0 - (1.0 - f64::from(i32::MIN)));
    assert!(gm.message(next.id).await.is_ok());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn fractional_distance_starts_a_pursuit() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();

    let card = gm
        .start_pursuit(&PursuitCommand::parse("/pursuit 4.5 simple athletics").unwrap())
        .await
        .unwrap()
        .expect("simple pursuit posts a card");
    assert_eq!(card.system.distance, 4.5);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn resolving_without_both_sides_rolled_is_rejected() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();
    let mut notes = gm.subscribe(Topic::Notification);

    let card = gm
        .start_pursuit(&PursuitCommand::new(5))
        .await
        .unwrap()
        .unwrap();
    gm.roll(
        card.id,
        Side::Pursuers,
        &pursuers(),
        &ScriptedRolls::new(&[("guard", 1), ("captain", 1)]),
    )
    .await
    .unwrap();

    let outcome = gm.resolve_round(card.id).await;
    assert!(matches!(
        outcome,
        Err(RuntimeError::Pursuit(PursuitError::MissingRolls { side: Side::Quarry }))
    ));
    match notes.recv().await {
        Ok(Event::Notification(note)) => assert_eq!(note.key, "PURSUIT.MissingRolls"),
        other => panic!("expected notification, got {other:?}"),
    }
    assert_eq!(gm.messages().await.unwrap().len(), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn players_cannot_start_or_resolve() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();
    let anna = runtime.handle_for(&UserId::new("p1")).unwrap();
    let mut notes = anna.subscribe(Topic::Notification);

    // Permission is checked before the distance.
    let started = anna
        .start_pursuit(&PursuitCommand::parse("42").unwrap())
        .await;
    assert!(matches!(
        started,
        Err(RuntimeError::Pursuit(PursuitError::NotGameMaster { .. }))
    ));
    match notes.recv().await {
        Ok(Event::Notification(note)) => {
            assert_eq!(note.user, UserId::new("p1"));
            assert_eq!(note.key, "MARKET.GMOnlyCommand");
        }
        other => panic!("expected notification, got {other:?}"),
    }

    let card = gm
        .start_pursuit(&PursuitCommand::new(3))
        .await
        .unwrap()
        .unwrap();
    let resolved = anna.resolve_round(card.id).await;
    assert!(matches!(
        resolved,
        Err(RuntimeError::Pursuit(PursuitError::NotGameMaster { .. }))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_distances_post_nothing() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();

    for input in ["0", "10", "-1", "NaN", "fast", ""] {
        let outcome = gm
            .start_pursuit(&PursuitCommand::parse(input).unwrap())
            .await;
        assert!(
            matches!(
                outcome,
                Err(RuntimeError::Pursuit(PursuitError::InvalidDistance { .. }))
            ),
            "{input:?} should be rejected"
        );
    }
    assert!(gm.messages().await.unwrap().is_empty());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn complex_pursuits_are_ignored() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();

    let outcome = gm
        .start_pursuit(&PursuitCommand::new(5).with_contest_type(ContestType::Complex))
        .await
        .unwrap();
    assert!(outcome.is_none());
    assert!(gm.messages().await.unwrap().is_empty());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn chat_events_follow_the_session() {
    let runtime = table().await;
    let gm = runtime.handle_for(&UserId::new("gm")).unwrap();
    let anna = runtime.handle_for(&UserId::new("p1")).unwrap();
    let mut chat = runtime.subscribe(Topic::Chat);

    let card = gm
        .start_pursuit(&PursuitCommand::new(2))
        .await
        .unwrap()
        .unwrap();
    anna.roll(
        card.id,
        Side::Quarry,
        &quarry()[..1],
        &ScriptedRolls::new(&[("thief", 1)]),
    )
    .await
    .unwrap();

    match chat.recv().await.unwrap() {
        Event::Chat(ChatEvent::MessageCreated { message, requested_by }) => {
            assert_eq!(message.id, card.id);
            assert_eq!(requested_by, UserId::new("gm"));
        }
        other => panic!("unexpected event {other:?}"),
    }
    match chat.recv().await.unwrap() {
        Event::Chat(ChatEvent::MessageUpdated {
            side,
            requested_by,
            relayed,
            ..
        }) => {
            assert_eq!(side, Side::Quarry);
            assert_eq!(requested_by, UserId::new("p1"));
            assert!(relayed);
        }
        other => panic!("unexpected event {other:?}"),
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn runtime_requires_a_game_master() {
    let outcome = Runtime::builder().user(player()).build().await;
    assert!(matches!(outcome, Err(RuntimeError::MissingGameMaster)));
}

#[tokio::test]
async fn unknown_users_get_no_handle() {
    let runtime = table().await;
    assert!(matches!(
        runtime.handle_for(&UserId::new("stranger")),
        Err(RuntimeError::UnknownUser(_))
    ));
    assert!(matches!(
        runtime
            .handle_for(&UserId::new("gm"))
            .unwrap()
            .message(MessageId(99))
            .await,
        Err(RuntimeError::MessageNotFound(MessageId(99)))
    ));
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn messages_survive_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = RuntimeConfig {
        relay_timeout: Duration::from_secs(1),
        ..RuntimeConfig::default()
    };

    let runtime = Runtime::builder()
        .config(config.clone())
        .user(gm())
        .repository(FileMessageRepository::new(dir.path()).unwrap())
        .build()
        .await
        .unwrap();
    let card = runtime
        .handle_for(&UserId::new("gm"))
        .unwrap()
        .start_pursuit(&PursuitCommand::new(7))
        .await
        .unwrap()
        .unwrap();
    runtime.shutdown().await.unwrap();

    let reopened = Runtime::builder()
        .config(config)
        .user(gm())
        .repository(FileMessageRepository::new(dir.path()).unwrap())
        .build()
        .await
        .unwrap();
    let gm = reopened.handle_for(&UserId::new("gm")).unwrap();
    assert_eq!(gm.message(card.id).await.unwrap(), card);

    let second = gm
        .start_pursuit(&PursuitCommand::new(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.id, card.id.next());

    reopened.shutdown().await.unwrap();
}
