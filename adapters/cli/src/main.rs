#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Parkour Runner session.

mod autopilot;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use parkour_core::{DifficultyLevel, Event};
use parkour_system_session::{GameConfig, Session};
use parkour_world::query;

use crate::autopilot::Autopilot;

#[derive(Debug, Parser)]
#[command(
    name = "parkour",
    about = "Run a headless parkour session and print a summary"
)]
struct Cli {
    /// Seed for the generated course; overrides the config file
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Simulation steps per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,
    /// TOML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Difficulty level to start at
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    difficulty: Option<u32>,
    /// Seconds between autopilot jumps; zero disables jumping
    #[arg(long, default_value_t = 0.9)]
    jump_every: f32,
    /// Walk instead of sprinting
    #[arg(long)]
    no_sprint: bool,
}

/// Counts of the notable events seen during a run.
#[derive(Debug, Default)]
struct Tally {
    cells_generated: u32,
    cells_retired: usize,
    sections: u32,
    landmarks: u32,
    jumps: u32,
    wall_jumps: u32,
    wall_runs: u32,
    pads: u32,
    hazards: u32,
}

impl Tally {
    fn record(&mut self, event: &Event) {
        debug!("{event:?}");
        match event {
            Event::CellGenerated { .. } => self.cells_generated += 1,
            Event::CellsRetired { count } => self.cells_retired += count,
            Event::SectionChanged { from, to, heading } => {
                self.sections += 1;
                info!("section {from:?} -> {to:?} heading {heading:?}");
            }
            Event::LandmarkRaised { .. } => self.landmarks += 1,
            Event::Jumped { from_wall } => {
                self.jumps += 1;
                if *from_wall {
                    self.wall_jumps += 1;
                }
            }
            Event::WallRunStarted { .. } => self.wall_runs += 1,
            Event::JumpPadTriggered { .. } => self.pads += 1,
            Event::ObstacleHit { kind, .. } => {
                self.hazards += 1;
                info!("hit {kind:?}");
            }
            Event::PlayerDied { cause } => info!("player died: {cause:?}"),
            Event::DifficultyChanged { level } => info!("difficulty now {}", level.get()),
            _ => {}
        }
    }
}

/// Entry point for the Parkour Runner command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();
    if !(cli.seconds.is_finite() && cli.seconds >= 0.0) {
        bail!("--seconds must be a non-negative number, got {}", cli.seconds);
    }
    if !cli.jump_every.is_finite() {
        bail!("--jump-every must be finite, got {}", cli.jump_every);
    }

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut session = Session::new(config);
    println!("{}", session.welcome_banner());

    let mut events = Vec::new();
    let mut tally = Tally::default();
    session.start_game(&mut events);
    if let Some(level) = cli.difficulty {
        session.adjust_difficulty(DifficultyLevel::new(level), &mut events);
    }

    let jump_every = (cli.jump_every > 0.0).then_some(cli.jump_every);
    let mut pilot = Autopilot::new(jump_every, !cli.no_sprint);
    let dt = 1.0 / cli.fps as f32;
    let frames = (cli.seconds * cli.fps as f32).round() as u64;
    let mut furthest = 0.0_f32;

    for _ in 0..frames {
        for input in pilot.drive(&session, dt) {
            session.handle_input(input);
        }
        session.tick(dt, &mut events);
        for event in events.drain(..) {
            tally.record(&event);
        }
        let position = session.player().position();
        furthest = furthest.max(position.x.hypot(position.z));
    }

    let board = session.scoreboard();
    let position = session.player().position();
    println!("seed            {:#x}", session.run_seed());
    println!("time            {:.1}s", board.time);
    println!("score           {}", board.score);
    println!("platforms       {}", board.platforms);
    println!("coins           {}", board.coins);
    println!("difficulty      {}", board.level.get());
    let tuning = query::tuning(session.world());
    println!(
        "spacing         {:.1} platforms, {:.1} grid",
        tuning.platform_spacing, tuning.grid_spacing
    );
    println!("deaths          {}", board.deaths);
    println!("stamina         {:.2}", board.stamina);
    println!(
        "position        ({:.1}, {:.1}, {:.1})",
        position.x, position.y, position.z
    );
    println!("furthest        {furthest:.1}");
    println!(
        "jumps           {} ({} off walls)",
        tally.jumps, tally.wall_jumps
    );
    println!("wall runs       {}", tally.wall_runs);
    println!("jump pads       {}", tally.pads);
    println!("hazards hit     {}", tally.hazards);
    println!("section changes {}", tally.sections);
    println!("landmarks       {}", tally.landmarks);
    println!(
        "cells           {} generated, {} retired, {} live",
        tally.cells_generated,
        tally.cells_retired,
        query::live_cell_count(session.world())
    );
    Ok(())
}
