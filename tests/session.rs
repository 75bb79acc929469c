use std::collections::HashSet;

use fruit_fall::consts::STEPS_PER_SECOND;
use fruit_fall::sim::{
    DifficultyState, EnvironmentPhase, FallingObject, FruitKind, GameEvent, GameSession,
    SessionState, SessionStatus, TickInput, tick,
};
use fruit_fall::tuning::PhaseDwell;
use fruit_fall::{Settings, Tuning};
use proptest::prelude::*;

fn steps(seconds: u32) -> u32 {
    (seconds as f32 * STEPS_PER_SECOND) as u32
}

fn run(session: &mut GameSession, input: &TickInput, n: u32) {
    for _ in 0..n {
        tick(session, input);
    }
}

#[test]
fn test_milestone_level_up() {
    let mut tuning = Tuning::default();
    tuning.difficulty.level_milestone = 10;
    let mut session = GameSession::new(tuning, &Settings::default(), 1);
    session.start_or_restart();

    for _ in 0..10 {
        session.register_catch();
    }
    assert_eq!(session.hud().level, 2);
    assert_eq!(session.hud().score, 10);
}

#[test]
fn test_miss_threshold_ends_once() {
    let mut tuning = Tuning::default();
    tuning.session.max_misses = 10;
    let mut session = GameSession::new(tuning, &Settings::default(), 1);
    session.start_or_restart();
    session.drain_events();

    for _ in 0..15 {
        session.register_miss();
    }
    assert!(session.is_over());
    assert_eq!(session.state().miss_count, 10);

    let events = session.drain_events();
    let overs: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .collect();
    assert_eq!(overs, vec![&GameEvent::GameOver { final_score: 0 }]);
}

#[test]
fn test_fall_time_matches_speed() {
    let mut tuning = Tuning::default();
    tuning.field.height = 600.0;
    // Keep the spawner out of the way after its first object
    tuning.difficulty.base_wave_interval_ms = 1_000_000_000;
    tuning.difficulty.min_wave_interval_ms = 1_000_000_000;
    let mut session = GameSession::new(tuning, &Settings::default(), 3);
    session.start_or_restart();
    session.step();
    let first = session.objects()[0].id;

    session.set_paddle(0.0, 120.0);
    let id = session.insert_object(FallingObject::new(0, FruitKind::Banana, 740.0, 1.5));
    let object = session.objects().iter().find(|o| o.id == id).unwrap();
    assert!((object.fall_duration_secs(600.0) - 8.0).abs() < 1e-4);

    session.drain_events();
    for _ in 0..steps(8) {
        session.step();
    }

    let missed: Vec<u32> = session
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::ObjectMissed { id } => Some(id),
            _ => None,
        })
        .collect();
    assert!(missed.contains(&id));
    assert_eq!(missed.iter().filter(|&&m| m == id).count(), 1);
    assert!(session.objects().iter().all(|o| o.id != id));
    assert_ne!(first, id);
}

#[test]
fn test_weather_follows_session_clock() {
    let mut tuning = Tuning::default();
    tuning.session.max_misses = 10_000;
    tuning.environment.phases = vec![
        PhaseDwell::new(EnvironmentPhase::Day, 20),
        PhaseDwell::new(EnvironmentPhase::Rain, 20),
    ];
    let mut session = GameSession::new(tuning, &Settings::default(), 5);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    session.start_or_restart();

    run(&mut session, &input, steps(25));
    assert_eq!(session.state().elapsed_secs, 25);
    assert_eq!(session.environment().current(), EnvironmentPhase::Rain);
    assert!(session.environment().has_ambient());

    run(&mut session, &input, steps(20));
    assert_eq!(session.state().elapsed_secs, 45);
    assert_eq!(session.environment().current(), EnvironmentPhase::Day);
    assert_eq!(session.environment().phase_secs(), 5);
    assert!(!session.environment().has_ambient());

    let phases: Vec<_> = session
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::PhaseChanged(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            EnvironmentPhase::Day,
            EnvironmentPhase::Rain,
            EnvironmentPhase::Day
        ]
    );
}

#[test]
fn test_display_time_never_rewinds() {
    let mut tuning = Tuning::default();
    tuning.session.max_misses = 10_000;
    let mut session = GameSession::new(tuning, &Settings::default(), 8);
    session.start_or_restart();
    // Reset publishes TimeChanged(0) before the clock runs
    session.drain_events();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut last = 0;
    for _ in 0..steps(250) {
        tick(&mut session, &input);
        for event in session.drain_events() {
            if let GameEvent::TimeChanged(t) = event {
                assert_eq!(t, last + 1);
                last = t;
            }
        }
    }
    // Past one full 210 s cycle
    assert_eq!(last, 250);
    assert_eq!(session.environment().phase_secs(), 250 % 210);
}

#[test]
fn test_storm_cleared_on_game_over() {
    let mut tuning = Tuning::default();
    tuning.environment.phases = vec![PhaseDwell::new(EnvironmentPhase::Storm, 60)];
    let mut session = GameSession::new(tuning, &Settings::default(), 5);
    session.start_or_restart();
    run(&mut session, &TickInput::default(), steps(3));
    assert!(session.environment().has_ambient());
    assert!(session.has_pending_schedules());

    session.end();
    assert!(!session.environment().has_ambient());
    assert!(!session.has_pending_schedules());
}

#[test]
fn test_huge_schedule_values_do_not_panic() {
    let mut tuning = Tuning::default();
    tuning.environment.phases = vec![
        PhaseDwell::new(EnvironmentPhase::Day, 5),
        PhaseDwell::new(EnvironmentPhase::Storm, 5),
    ];
    tuning.environment.lightning_min_ms = u64::MAX;
    tuning.environment.lightning_max_ms = u64::MAX;
    tuning.difficulty.base_wave_interval_ms = u64::MAX;
    tuning.difficulty.min_wave_interval_ms = u64::MAX;
    tuning.spawner.intra_wave_delay_ms = u64::MAX;
    let mut session = GameSession::new(tuning, &Settings::default(), 9);
    session.start_or_restart();

    run(&mut session, &TickInput::default(), 300);
    assert_eq!(session.environment().current(), EnvironmentPhase::Storm);
    assert!(session.environment().has_ambient());
    assert_eq!(session.state().elapsed_secs, 6);
}

#[test]
fn test_reseed_restarts_from_new_seed() {
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut fresh = GameSession::new(Tuning::default(), &Settings::default(), 77);
    fresh.start_or_restart();
    run(&mut fresh, &input, steps(10));

    let mut session = GameSession::new(Tuning::default(), &Settings::default(), 1);
    session.start_or_restart();
    run(&mut session, &input, steps(3));
    session.reseed(77);
    assert_eq!(session.seed(), 77);
    assert_eq!(session.status(), SessionStatus::NotStarted);
    session.start();
    run(&mut session, &input, steps(10));

    let placed = |s: &GameSession| -> Vec<(u32, FruitKind, f32, f32)> {
        s.objects()
            .iter()
            .map(|o| (o.id, o.kind, o.x, o.progress))
            .collect()
    };
    assert!(!fresh.objects().is_empty());
    assert_eq!(placed(&session), placed(&fresh));
    assert_eq!(session.state(), fresh.state());
}

#[derive(Debug, Clone)]
enum Op {
    Catch,
    Miss,
    Steps(u16),
    Paddle(f32),
    Start,
    End,
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Catch),
        Just(Op::Miss),
        (1u16..400).prop_map(Op::Steps),
        (-100.0f32..900.0).prop_map(Op::Paddle),
        Just(Op::Start),
        Just(Op::End),
        Just(Op::Reset),
    ]
}

fn apply(session: &mut GameSession, op: &Op) {
    match *op {
        Op::Catch => session.register_catch(),
        Op::Miss => session.register_miss(),
        Op::Steps(n) => {
            for _ in 0..n {
                session.step();
            }
        }
        Op::Paddle(x) => session.set_paddle(x, 120.0),
        Op::Start => session.start(),
        Op::End => session.end(),
        Op::Reset => session.reset(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_reset_restores_initial_state(seed in any::<u64>(), ops in proptest::collection::vec(op(), 1..40)) {
        let mut session = GameSession::new(Tuning::default(), &Settings::default(), seed);
        for op in &ops {
            apply(&mut session, op);
        }
        session.reset();

        prop_assert_eq!(session.status(), SessionStatus::NotStarted);
        prop_assert_eq!(session.state(), &SessionState::default());
        prop_assert_eq!(session.difficulty(), &DifficultyState::initial(&session.tuning().difficulty));
        prop_assert!(session.objects().is_empty());
        prop_assert!(!session.environment().has_ambient());
        prop_assert!(!session.has_pending_schedules());
    }

    #[test]
    fn prop_each_object_resolves_once(seed in any::<u64>(), ops in proptest::collection::vec(op(), 1..40)) {
        let mut session = GameSession::new(Tuning::default(), &Settings::default(), seed);
        session.start();

        let mut spawned = HashSet::new();
        let mut resolved = HashSet::new();
        let mut over_events = 0;
        let mut was_over = false;

        for op in &ops {
            // Reset restarts ids; track per session
            if matches!(op, Op::Reset) {
                spawned.clear();
                resolved.clear();
                was_over = false;
            }
            apply(&mut session, op);
            for event in session.drain_events() {
                match event {
                    GameEvent::ObjectSpawned { id, .. } => {
                        prop_assert!(spawned.insert(id));
                    }
                    GameEvent::ObjectCaught { id } | GameEvent::ObjectMissed { id } => {
                        prop_assert!(spawned.contains(&id));
                        prop_assert!(resolved.insert(id), "object {} resolved twice", id);
                    }
                    GameEvent::GameOver { .. } => {
                        prop_assert!(!was_over);
                        was_over = true;
                        over_events += 1;
                    }
                    _ => {}
                }
            }
            prop_assert!(session.state().miss_count <= session.tuning().session.max_misses);
            for object in session.objects() {
                prop_assert!(!resolved.contains(&object.id));
            }
        }
        prop_assert!(over_events <= ops.iter().filter(|o| matches!(o, Op::Reset)).count() + 1);
    }
}
