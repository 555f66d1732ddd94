use std::time::Duration;

use glam::Vec3;
use parkour_core::{Command, Event};
use parkour_system_movement::{InputEvent, Key, MovementTuning, PlayerController};
use parkour_world::{self as world, World};

const DT: f32 = 1.0 / 30.0;

#[test]
fn scripted_run_replays_identically() {
    let first = replay(17);
    let second = replay(17);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::Jumped { .. })));
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    position: Vec3,
    velocity: Vec3,
    deaths: u32,
}

fn replay(seed: u64) -> ReplayOutcome {
    let mut world = World::with_seed(seed);
    let mut player = PlayerController::new(Vec3::new(0.0, 2.0, 0.0), MovementTuning::default());
    let mut log = Vec::new();

    player.handle_input(InputEvent::Key {
        key: Key::Forward,
        pressed: true,
    });
    for frame in 0..300 {
        if frame % 20 == 0 {
            player.handle_input(InputEvent::Key {
                key: Key::Jump,
                pressed: true,
            });
        }
        if frame % 20 == 1 {
            player.handle_input(InputEvent::Key {
                key: Key::Jump,
                pressed: false,
            });
        }
        if frame % 45 == 0 {
            player.handle_input(InputEvent::Look { dx: 40.0, dy: 0.0 });
        }

        player.update(DT, &world, &mut log);
        if player.is_dead() {
            player.respawn(&world, &mut log);
        }
        world::apply(
            &mut world,
            Command::Advance {
                player_position: player.position(),
                dt: Duration::from_secs_f32(DT),
            },
            &mut log,
        );
    }

    ReplayOutcome {
        events: log,
        position: player.position(),
        velocity: player.velocity(),
        deaths: player.deaths(),
    }
}
