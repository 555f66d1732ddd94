use std::{collections::HashSet, time::Duration};

use glam::Vec3;
use parkour_core::{
    Aabb, Command, DifficultyLevel, Event, GridCoord, ObstacleKind, PlayerProbe,
};
use parkour_world::{
    self as world, query, GenerationTuning, PlatformMotion, World, WorldConfig,
};

fn advance(world: &mut World, position: Vec3, events: &mut Vec<Event>) {
    world::apply(
        world,
        Command::Advance {
            player_position: position,
            dt: Duration::from_millis(100),
        },
        events,
    );
}

fn walk_north(world: &mut World, distance: f32) -> Vec<Event> {
    let mut events = Vec::new();
    let mut z = 0.0;
    while z <= distance {
        advance(world, Vec3::new(0.0, 0.25, z), &mut events);
        z += 3.0;
    }
    events
}

fn probe_at(position: Vec3) -> PlayerProbe {
    PlayerProbe {
        position,
        velocity: Vec3::ZERO,
        grounded: true,
        collider: Aabb::from_feet(position, 0.3, 1.8, 0.3),
    }
}

#[test]
fn origin_platform_top_sits_at_base_height() {
    let world = World::with_seed(42);
    let platform = query::platform_at(&world, GridCoord::ORIGIN).expect("origin platform");

    assert!((platform.top() - 0.25).abs() < 1e-5);
    assert_eq!(platform.bounds().center().x, 0.0);
    assert_eq!(platform.bounds().center().z, 0.0);
}

#[test]
fn live_cells_are_generated_at_most_once() {
    let config = WorldConfig {
        retain_radius: None,
        ..WorldConfig::default()
    };
    let mut world = World::with_config(7, config);
    let mut events = walk_north(&mut world, 420.0);
    let mut back = Vec::new();
    let mut z = 420.0;
    while z >= 0.0 {
        advance(&mut world, Vec3::new(0.0, 0.25, z), &mut back);
        z -= 6.0;
    }
    events.extend(back);

    let mut seen: HashSet<GridCoord> = (-1..=1)
        .flat_map(|x| (1..=5).map(move |z| GridCoord::new(x, z)))
        .collect();
    let _ = seen.insert(GridCoord::ORIGIN);
    for event in &events {
        if let Event::CellGenerated { cell } = event {
            assert!(seen.insert(*cell), "cell {cell:?} generated twice");
        }
    }
}

#[test]
fn returning_to_retired_ground_finds_footing() {
    let mut world = World::with_seed(3);
    let _ = walk_north(&mut world, 420.0);
    assert!(query::cell(&world, GridCoord::ORIGIN).is_none());

    let home = Vec3::new(0.0, 0.25, 24.0);
    let mut events = Vec::new();
    for _ in 0..200 {
        advance(&mut world, home, &mut events);
    }

    let rebuilt: Vec<GridCoord> = events
        .iter()
        .filter_map(|event| match event {
            Event::CellGenerated { cell } => Some(*cell),
            _ => None,
        })
        .collect();
    assert!(!rebuilt.is_empty(), "no cells rebuilt around {home:?}");
    for cell in &rebuilt {
        assert!(query::is_known(&world, *cell));
    }
    assert!(rebuilt
        .iter()
        .any(|cell| query::platform_at(&world, *cell).is_some()));
}

#[test]
fn far_cells_are_retired_but_remembered() {
    let mut world = World::with_seed(3);
    let events = walk_north(&mut world, 420.0);

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::CellsRetired { count } if *count > 0)));
    assert!(query::cell(&world, GridCoord::ORIGIN).is_none());
    assert!(query::is_known(&world, GridCoord::ORIGIN));
    assert!(query::known_cell_count(&world) > query::live_cell_count(&world));
}

#[test]
fn unbounded_retention_keeps_every_cell() {
    let config = WorldConfig {
        retain_radius: None,
        ..WorldConfig::default()
    };
    let mut world = World::with_config(3, config);
    let events = walk_north(&mut world, 300.0);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::CellsRetired { .. })));
    assert_eq!(
        query::known_cell_count(&world),
        query::live_cell_count(&world)
    );
}

#[test]
fn sections_change_while_running() {
    let mut world = World::with_seed(11);
    let events = walk_north(&mut world, 420.0);

    let transitions: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::SectionChanged { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert!(!transitions.is_empty(), "expected at least one section change");
    for (from, to) in transitions {
        assert_ne!(from, to);
    }
}

#[test]
fn same_seed_generates_same_geometry() {
    let mut first = World::with_seed(99);
    let mut second = World::with_seed(99);
    let first_events = walk_north(&mut first, 240.0);
    let second_events = walk_north(&mut second, 240.0);

    assert_eq!(first_events, second_events);
    let first_bounds: Vec<Aabb> = query::platforms(&first).map(|p| p.bounds()).collect();
    let second_bounds: Vec<Aabb> = query::platforms(&second).map(|p| p.bounds()).collect();
    assert_eq!(first_bounds, second_bounds);
    let first_coins: Vec<Vec3> = query::coins(&first).map(|c| c.position()).collect();
    let second_coins: Vec<Vec3> = query::coins(&second).map(|c| c.position()).collect();
    assert_eq!(first_coins, second_coins);
}

#[test]
fn reset_rebuilds_the_fresh_starting_area() {
    let fresh = World::with_seed(21);
    let mut world = World::with_seed(5);
    let _ = walk_north(&mut world, 120.0);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::AdjustDifficulty {
            level: DifficultyLevel::new(4),
        },
        &mut events,
    );
    world::apply(&mut world, Command::ResetWorld { seed: 21 }, &mut events);

    let expected: Vec<Aabb> = query::platforms(&fresh).map(|p| p.bounds()).collect();
    let actual: Vec<Aabb> = query::platforms(&world).map(|p| p.bounds()).collect();
    assert_eq!(actual, expected);
    assert_eq!(query::difficulty(&world), DifficultyLevel::FIRST);
    assert_eq!(query::seed(&world), 21);
}

#[test]
fn adjusting_difficulty_swaps_tuning_and_forces_transition() {
    let mut world = World::with_seed(8);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::AdjustDifficulty {
            level: DifficultyLevel::new(3),
        },
        &mut events,
    );

    assert_eq!(
        *query::tuning(&world),
        GenerationTuning {
            platform_spacing: 7.0,
            obstacle_chance: 0.3,
            height_variation: 2.0,
            grid_spacing: 10.0,
            path_width: 1,
            section_length: 10,
        }
    );
    assert_eq!(
        events.first(),
        Some(&Event::DifficultyChanged {
            level: DifficultyLevel::new(3)
        })
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::SectionChanged { .. })));
}

#[test]
fn difficulty_speeds_up_moving_platforms() {
    let mut world = World::with_seed(8);
    let rest = Aabb::from_center_size(Vec3::new(500.0, 3.0, 0.0), Vec3::new(4.0, 0.3, 4.0));
    let id = world.insert_moving_platform(
        rest,
        PlatformMotion {
            direction: Vec3::X,
            amplitude: 3.0,
            speed: 1.0,
        },
    );
    let mut events = Vec::new();
    world.adjust_difficulty(DifficultyLevel::new(2), &mut events);

    let motion = query::platform(&world, id)
        .and_then(|platform| platform.motion().copied())
        .expect("moving platform");
    assert!((motion.speed - 1.2).abs() < 1e-5);
}

#[test]
fn moving_platforms_are_found_where_they_are() {
    let mut world = World::with_seed(1);
    let rest = Aabb::from_center_size(Vec3::new(500.0, 3.0, 0.0), Vec3::new(4.0, 0.3, 4.0));
    let id = world.insert_moving_platform(
        rest,
        PlatformMotion {
            direction: Vec3::X,
            amplitude: 3.0,
            speed: 1.0,
        },
    );
    let mut events = Vec::new();
    world.update(Vec3::ZERO, std::f32::consts::FRAC_PI_2, &mut events);

    let platform = query::platform(&world, id).expect("moving platform");
    assert!((platform.bounds().center().x - 503.0).abs() < 1e-3);
    let around = Aabb::from_center_size(Vec3::new(503.0, 3.0, 0.0), Vec3::ONE);
    let found: Vec<_> = query::platforms_near(&world, &around)
        .into_iter()
        .map(|platform| platform.id())
        .collect();
    assert_eq!(found, vec![id]);
}

#[test]
fn obstacle_contact_reports_damage() {
    let mut world = World::with_seed(2);
    let bounds = Aabb::from_center_size(Vec3::new(-400.0, 1.0, 0.0), Vec3::new(0.2, 2.0, 0.2));
    let id = world.insert_obstacle(ObstacleKind::EnergyBarrier, bounds);

    let hit = world
        .check_obstacle_collision(&probe_at(Vec3::new(-400.1, 0.0, 0.0)))
        .expect("player should touch the barrier");
    assert_eq!(hit.obstacle, id);
    assert_eq!(hit.damage, 0.5);
    assert!(world
        .check_obstacle_collision(&probe_at(Vec3::new(-395.0, 0.0, 0.0)))
        .is_none());
}

#[test]
fn clearing_forgets_everything() {
    let mut world = World::with_seed(4);
    let mut events = Vec::new();
    world::apply(&mut world, Command::ClearWorld, &mut events);

    assert_eq!(events, vec![Event::WorldCleared]);
    assert_eq!(query::known_cell_count(&world), 0);
    assert!(query::coins(&world).next().is_none());
}

#[test]
fn advance_reports_elapsed_time_first() {
    let mut world = World::with_seed(4);
    let mut events = Vec::new();
    advance(&mut world, Vec3::ZERO, &mut events);

    assert_eq!(
        events.first(),
        Some(&Event::TimeAdvanced {
            dt: Duration::from_millis(100)
        })
    );
    assert!((query::elapsed(&world) - 0.1).abs() < 1e-6);
}
