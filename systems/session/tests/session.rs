use glam::Vec3;
use parkour_core::{Aabb, DeathCause, DifficultyLevel, Event, ObstacleKind};
use parkour_system_movement::{InputEvent, Key};
use parkour_system_session::{GameConfig, Phase, Session};

const DT: f32 = 1.0 / 60.0;

fn started() -> (Session, Vec<Event>) {
    let mut session = Session::new(GameConfig::default());
    let mut events = Vec::new();
    session.start_game(&mut events);
    (session, events)
}

fn run(session: &mut Session, seconds: f32, events: &mut Vec<Event>) {
    let frames = (seconds / DT).round() as usize;
    for _ in 0..frames {
        session.tick(DT, events);
    }
}

#[test]
fn ticks_are_ignored_until_started() {
    let mut session = Session::new(GameConfig::default());
    let mut events = Vec::new();
    session.tick(DT, &mut events);

    assert_eq!(session.phase(), Phase::Idle);
    assert!(events.is_empty());
    assert_eq!(session.scoreboard().time, 0.0);
}

#[test]
fn starting_spawns_above_the_origin_platform() {
    let (session, _) = started();

    assert_eq!(session.phase(), Phase::Running);
    assert_eq!(session.player().position(), Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(session.run_seed(), GameConfig::default().seed);
    assert_eq!(session.welcome_banner(), "Welcome to Parkour Runner.");
}

#[test]
fn idle_player_lands_and_scores_the_spawn_platform() {
    let (mut session, mut events) = started();
    run(&mut session, 1.0, &mut events);

    let board = session.scoreboard();
    assert!(session.player().is_grounded());
    assert!(!session.player().is_dead());
    assert!((session.player().position().y - 0.25).abs() < 1e-4);
    assert_eq!(board.platforms, 1);
    assert_eq!(board.score, 20 + 10 * board.coins);
    assert_eq!(board.deaths, 0);
    assert!((board.time - 1.0).abs() < 1e-3);
}

#[test]
fn jump_pad_launches_the_player_in_one_tick() {
    let (mut session, mut events) = started();
    run(&mut session, 0.5, &mut events);
    assert!(session.player().is_grounded());
    let pad = session
        .world_mut()
        .insert_jump_pad(Vec3::new(0.0, 0.55, 0.0), 15.0);

    events.clear();
    session.tick(DT, &mut events);

    assert!(!session.player().is_grounded());
    assert_eq!(session.player().velocity().y, 15.0);
    assert!(events.contains(&Event::JumpPadTriggered { pad }));
}

#[test]
fn coins_score_once_and_raise_difficulty() {
    let (mut session, mut events) = started();
    run(&mut session, 0.5, &mut events);
    let before = session.scoreboard();
    let coin = session
        .world_mut()
        .insert_coin(Vec3::new(0.0, 1.0, 0.0), 100);

    events.clear();
    session.tick(DT, &mut events);
    session.tick(DT, &mut events);

    let collected = events
        .iter()
        .filter(|event| matches!(event, Event::CoinCollected { .. }))
        .count();
    assert_eq!(collected, 1);
    assert!(events.contains(&Event::CoinCollected { coin, value: 100 }));
    assert!(events.contains(&Event::DifficultyChanged {
        level: DifficultyLevel::new(2)
    }));
    let board = session.scoreboard();
    assert_eq!(board.coins, before.coins + 1);
    assert_eq!(board.score, before.score + 100);
    assert_eq!(board.level, DifficultyLevel::new(2));
}

#[test]
fn hazards_kill_and_respawn_on_the_last_platform() {
    let (mut session, mut events) = started();
    run(&mut session, 0.5, &mut events);
    let obstacle = session.world_mut().insert_obstacle(
        ObstacleKind::SpikeTrap,
        Aabb::from_center_size(Vec3::new(0.0, 0.75, 0.0), Vec3::ONE),
    );

    events.clear();
    session.tick(DT, &mut events);

    assert_eq!(
        events,
        vec![
            Event::TimeAdvanced {
                dt: std::time::Duration::from_secs_f32(DT)
            },
            Event::ObstacleHit {
                obstacle,
                kind: ObstacleKind::SpikeTrap
            },
            Event::PlayerDied {
                cause: DeathCause::Hazard
            },
            Event::PlayerRespawned {
                position: Vec3::new(0.0, 1.25, 0.0)
            },
        ]
    );
    assert_eq!(session.scoreboard().deaths, 1);
    assert!(!session.player().is_dead());
    assert_eq!(session.player().velocity(), Vec3::ZERO);
}

fn barrier_hit() -> (Session, Vec<Event>) {
    let (mut session, mut events) = started();
    run(&mut session, 0.5, &mut events);
    let _ = session.world_mut().insert_obstacle(
        ObstacleKind::EnergyBarrier,
        Aabb::from_center_size(Vec3::new(0.0, 0.75, 0.0), Vec3::ONE),
    );
    events.clear();
    session.tick(DT, &mut events);
    (session, events)
}

#[test]
fn energy_barriers_knock_the_respawned_player_away() {
    let (session, events) = barrier_hit();

    assert!(events.contains(&Event::PlayerDied {
        cause: DeathCause::Hazard
    }));
    assert!(events.contains(&Event::PlayerRespawned {
        position: Vec3::new(0.0, 1.25, 0.0)
    }));
    let push = session.player().velocity();
    assert!((push.length() - 10.0).abs() < 1e-3, "{push}");
    assert!(push.y > 0.0);
    assert!(!session.player().is_grounded());
    assert!(!session.player().is_dead());
    assert_eq!(session.scoreboard().deaths, 1);

    let (twin, _) = barrier_hit();
    assert_eq!(twin.player().velocity(), push);
}

#[test]
fn pausing_freezes_the_clock() {
    let (mut session, mut events) = started();
    run(&mut session, 0.25, &mut events);
    let before = session.scoreboard();

    session.pause_game();
    events.clear();
    run(&mut session, 0.25, &mut events);
    assert_eq!(session.phase(), Phase::Paused);
    assert!(events.is_empty());
    assert_eq!(session.scoreboard(), before);

    session.resume_game();
    session.tick(DT, &mut events);
    assert!(session.scoreboard().time > before.time);
}

#[test]
fn non_finite_steps_advance_by_the_longest_step() {
    let (mut session, mut events) = started();
    session.tick(f32::NAN, &mut events);
    assert!((session.scoreboard().time - 0.1).abs() < 1e-6);

    session.tick(-3.0, &mut events);
    assert!((session.scoreboard().time - 0.1).abs() < 1e-6);
}

#[test]
fn restart_reseeds_and_resets_the_run() {
    let (mut session, mut events) = started();
    session.handle_input(InputEvent::Key {
        key: Key::Forward,
        pressed: true,
    });
    run(&mut session, 1.0, &mut events);
    let first_seed = session.run_seed();

    session.restart_game(&mut events);

    let board = session.scoreboard();
    assert_ne!(session.run_seed(), first_seed);
    assert_eq!(board.score, 0);
    assert_eq!(board.time, 0.0);
    assert_eq!(board.level, DifficultyLevel::FIRST);
    assert_eq!(board.stamina, 1.0);
    assert_eq!(session.player().position(), Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(session.phase(), Phase::Running);
}

#[test]
fn second_start_is_ignored() {
    let (mut session, _) = started();
    let mut events = Vec::new();
    session.start_game(&mut events);
    assert!(events.is_empty());
}

#[test]
fn identical_sessions_replay_identically() {
    let script = |session: &mut Session, events: &mut Vec<Event>| {
        session.handle_input(InputEvent::Key {
            key: Key::Forward,
            pressed: true,
        });
        for frame in 0..600 {
            if frame % 40 == 0 {
                session.handle_input(InputEvent::Key {
                    key: Key::Jump,
                    pressed: true,
                });
            } else if frame % 40 == 1 {
                session.handle_input(InputEvent::Key {
                    key: Key::Jump,
                    pressed: false,
                });
            }
            session.tick(DT, events);
        }
    };

    let (mut first, mut first_events) = started();
    let (mut second, mut second_events) = started();
    script(&mut first, &mut first_events);
    script(&mut second, &mut second_events);

    assert_eq!(first_events, second_events);
    assert_eq!(first.scoreboard(), second.scoreboard());
    assert_eq!(first.player().position(), second.player().position());
}
