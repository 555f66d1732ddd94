#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game loop that ties the world and the player controller into a run.
//!
//! A [`Session`] owns both halves of the simulation, orders them within each
//! tick, turns their events into score and difficulty, and exposes the
//! start, pause, resume and restart controls a front end needs.

mod config;

use std::time::Duration;

use glam::Vec3;
use log::{debug, info};
use parkour_core::{Command, DifficultyLevel, Event, GridCoord};
use parkour_system_movement::{CameraPose, CameraRig, InputEvent, PlayerController};
use parkour_world::{self as world, query, World};

pub use config::{ConfigError, GameConfig};

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created but not started; ticks are ignored.
    Idle,
    /// Simulating.
    Running,
    /// Frozen until resumed; ticks are ignored.
    Paused,
}

/// Values a HUD displays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scoreboard {
    /// Total points.
    pub score: u32,
    /// Coins picked up.
    pub coins: u32,
    /// Distinct platforms reached.
    pub platforms: u32,
    /// Simulated seconds since the run started.
    pub time: f32,
    /// Active difficulty level.
    pub level: DifficultyLevel,
    /// Deaths during the run.
    pub deaths: u32,
    /// Player stamina in `[0, 1]`.
    pub stamina: f32,
}

/// Owns the world and the player and advances them together.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    world: World,
    player: PlayerController,
    camera: CameraRig,
    pose: CameraPose,
    phase: Phase,
    runs: u64,
    score: u32,
    coins: u32,
    platforms: u32,
    time: f32,
    level: DifficultyLevel,
}

impl Session {
    /// Creates an idle session; call [`Session::start_game`] to begin.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let world = World::with_config(config.seed, config.world);
        let spawn = spawn_point(&world, &config);
        let player = PlayerController::new(spawn, config.movement.clone());
        let camera = CameraRig::new(&player);
        let pose = parkour_system_movement::camera_pose(&player);
        Self {
            config,
            world,
            player,
            camera,
            pose,
            phase: Phase::Idle,
            runs: 0,
            score: 0,
            coins: 0,
            platforms: 0,
            time: 0.0,
            level: DifficultyLevel::FIRST,
        }
    }

    /// Begins the first run. Ignored unless the session is idle.
    pub fn start_game(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Idle {
            debug!("start ignored in phase {:?}", self.phase);
            return;
        }
        self.begin_run(out_events);
    }

    /// Freezes a running session.
    pub fn pause_game(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            info!("game paused");
        }
    }

    /// Continues a paused session.
    pub fn resume_game(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            info!("game resumed");
        }
    }

    /// Discards the current run and starts a new one with a fresh seed.
    pub fn restart_game(&mut self, out_events: &mut Vec<Event>) {
        self.runs = self.runs.wrapping_add(1);
        self.begin_run(out_events);
    }

    /// Switches the world to the tuning of `level`.
    pub fn adjust_difficulty(&mut self, level: DifficultyLevel, out_events: &mut Vec<Event>) {
        self.level = level;
        world::apply(
            &mut self.world,
            Command::AdjustDifficulty { level },
            out_events,
        );
    }

    /// Forwards raw input to the player controller.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.player.handle_input(event);
    }

    /// Advances a running session by `raw_dt` seconds.
    ///
    /// Non-finite steps are treated as the longest allowed step, negative
    /// ones as zero.
    pub fn tick(&mut self, raw_dt: f32, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Running {
            return;
        }
        let dt = sanitize_delta(raw_dt, self.config.max_delta);
        let first = out_events.len();

        self.player.update(dt, &self.world, out_events);
        if self.player.is_dead() {
            self.player.respawn(&self.world, out_events);
        }

        world::apply(
            &mut self.world,
            Command::Advance {
                player_position: self.player.position(),
                dt: Duration::from_secs_f32(dt),
            },
            out_events,
        );

        if let Some(launch) = self.world.check_jump_pad_collision(&self.player.probe()) {
            self.player.apply_launch(launch.velocity);
            out_events.push(Event::JumpPadTriggered { pad: launch.pad });
        }

        while let Some(pickup) = self.world.check_collectibles(&self.player.probe()) {
            out_events.push(Event::CoinCollected {
                coin: pickup.coin,
                value: pickup.value,
            });
        }

        if let Some(hit) = self.world.check_obstacle_collision(&self.player.probe()) {
            out_events.push(Event::ObstacleHit {
                obstacle: hit.obstacle,
                kind: hit.kind,
            });
            self.player.take_damage(hit.damage, out_events);
            self.player.respawn(&self.world, out_events);
            if let Some(push) = self.world.obstacle_knockback(hit.kind) {
                debug!("knocked back by {:?} at {push}", hit.kind);
                self.player.apply_knockback(push);
            }
        }

        self.time += dt;
        self.score_events(first, out_events);

        let earned = level_for_score(self.score, &self.config.difficulty_thresholds);
        if earned > self.level {
            info!("score {} reached level {}", self.score, earned.get());
            self.adjust_difficulty(earned, out_events);
        }

        self.pose = self.camera.follow(&self.player, dt);
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// HUD snapshot of the run.
    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            score: self.score,
            coins: self.coins,
            platforms: self.platforms,
            time: self.time,
            level: self.level,
            deaths: self.player.deaths(),
            stamina: self.player.stamina(),
        }
    }

    /// Seed driving the current run.
    #[must_use]
    pub fn run_seed(&self) -> u64 {
        query::seed(&self.world)
    }

    /// Smoothed camera pose after the last tick.
    #[must_use]
    pub const fn camera(&self) -> CameraPose {
        self.pose
    }

    /// Banner an adapter may show when the session boots.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Read access to the world for renderers.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Write access to the world for embedding hand-made content.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Read access to the player.
    #[must_use]
    pub const fn player(&self) -> &PlayerController {
        &self.player
    }

    /// Configuration the session was created with.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    fn begin_run(&mut self, out_events: &mut Vec<Event>) {
        let seed = run_seed(self.config.seed, self.runs);
        world::apply(&mut self.world, Command::ResetWorld { seed }, out_events);

        let spawn = spawn_point(&self.world, &self.config);
        self.player.reset(spawn);
        self.camera.snap(&self.player);
        self.pose = parkour_system_movement::camera_pose(&self.player);

        self.score = 0;
        self.coins = 0;
        self.platforms = 0;
        self.time = 0.0;
        self.level = DifficultyLevel::FIRST;
        self.phase = Phase::Running;
        info!("run {} started with seed {seed:#x}", self.runs);
    }

    fn score_events(&mut self, first: usize, events: &[Event]) {
        for event in events.iter().skip(first) {
            match event {
                Event::PlatformReached { .. } => {
                    self.platforms += 1;
                    self.score = self.score.saturating_add(self.config.platform_score);
                }
                Event::CoinCollected { value, .. } => {
                    self.coins += 1;
                    self.score = self.score.saturating_add(*value);
                }
                _ => {}
            }
        }
    }
}

/// Difficulty earned by `score`: one level plus one per threshold reached.
#[must_use]
pub fn level_for_score(score: u32, thresholds: &[u32]) -> DifficultyLevel {
    let reached = thresholds
        .iter()
        .filter(|threshold| score >= **threshold)
        .count();
    DifficultyLevel::new(1 + u32::try_from(reached).unwrap_or(u32::MAX - 1))
}

fn sanitize_delta(raw: f32, max_delta: f32) -> f32 {
    if !raw.is_finite() {
        return max_delta;
    }
    raw.clamp(0.0, max_delta)
}

fn run_seed(base: u64, run: u64) -> u64 {
    base ^ run.wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

fn spawn_point(world: &World, config: &GameConfig) -> Vec3 {
    match query::platform_at(world, GridCoord::ORIGIN) {
        Some(platform) => platform.bounds().center() + Vec3::Y * config.spawn_lift,
        None => config.movement.respawn_point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_thresholds() {
        let thresholds = [100, 300, 600, 1000, 1500];
        assert_eq!(level_for_score(0, &thresholds).get(), 1);
        assert_eq!(level_for_score(99, &thresholds).get(), 1);
        assert_eq!(level_for_score(100, &thresholds).get(), 2);
        assert_eq!(level_for_score(999, &thresholds).get(), 4);
        assert_eq!(level_for_score(40_000, &thresholds).get(), 6);
    }

    #[test]
    fn deltas_are_sanitized() {
        assert_eq!(sanitize_delta(f32::NAN, 0.1), 0.1);
        assert_eq!(sanitize_delta(f32::INFINITY, 0.1), 0.1);
        assert_eq!(sanitize_delta(-1.0, 0.1), 0.0);
        assert_eq!(sanitize_delta(0.5, 0.1), 0.1);
        assert_eq!(sanitize_delta(0.016, 0.1), 0.016);
    }

    #[test]
    fn first_run_uses_the_base_seed() {
        assert_eq!(run_seed(42, 0), 42);
        assert_ne!(run_seed(42, 1), 42);
    }
}
