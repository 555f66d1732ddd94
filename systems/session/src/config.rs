//! Game configuration loaded from TOML.

use std::{fs, path::Path, path::PathBuf};

use parkour_system_movement::MovementTuning;
use parkour_world::{WorldConfig, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file was not valid TOML or did not match the schema.
    #[error("failed to parse config toml")]
    Parse(#[from] toml::de::Error),
    /// The values parsed but cannot drive a session.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything a session needs to start a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Base seed; restarts mix in the run counter.
    pub seed: u64,
    /// Longest simulated step in seconds; longer frames are clamped.
    pub max_delta: f32,
    /// Points awarded for reaching a new platform.
    pub platform_score: u32,
    /// Scores at which the difficulty rises by one level, ascending.
    pub difficulty_thresholds: Vec<u32>,
    /// Height above the spawn platform's center the player starts at.
    pub spawn_lift: f32,
    /// Streaming window of the world.
    pub world: WorldConfig,
    /// Movement constants of the player.
    pub movement: MovementTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_delta: 0.1,
            platform_score: 20,
            difficulty_thresholds: vec![100, 300, 600, 1000, 1500],
            spawn_lift: 2.0,
            world: WorldConfig::default(),
            movement: MovementTuning::default(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document. Missing keys keep their
    /// defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Rejects values that would stall or destabilise the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_delta.is_finite() && self.max_delta > 0.0) {
            return Err(invalid(format!(
                "max_delta must be positive, got {}",
                self.max_delta
            )));
        }
        if self
            .difficulty_thresholds
            .windows(2)
            .any(|pair| pair[0] >= pair[1])
        {
            return Err(invalid(
                "difficulty_thresholds must be strictly ascending".to_string(),
            ));
        }
        if self.world.grid_radius < 1 {
            return Err(invalid(format!(
                "world.grid_radius must be at least 1, got {}",
                self.world.grid_radius
            )));
        }
        if !self.spawn_lift.is_finite() {
            return Err(invalid("spawn_lift must be finite".to_string()));
        }

        let movement = &self.movement;
        let positive = [
            ("movement.gravity", movement.gravity),
            ("movement.move_speed", movement.move_speed),
            ("movement.sprint_speed", movement.sprint_speed),
            ("movement.max_wall_run_time", movement.max_wall_run_time),
            ("movement.half_width", movement.half_width),
            ("movement.height", movement.height),
        ];
        if let Some((name, value)) = positive
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            return Err(invalid(format!("{name} must be positive, got {value}")));
        }
        if !movement.respawn_point.is_finite() {
            return Err(invalid("movement.respawn_point must be finite".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
