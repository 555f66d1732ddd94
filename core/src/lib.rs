#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Parkour Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the player systems. Adapters and the session loop
//! submit [`Command`] values describing desired world mutations, the world
//! executes those commands via its `apply` entry point, and broadcasts
//! [`Event`] values. The movement controller appends its own events to the
//! same stream so the session can score, play audio cues, and update the HUD
//! from a single ordered log.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub mod spatial;

pub use spatial::Aabb;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Parkour Runner.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards all generated content, reseeds the generator and rebuilds the
    /// starting area.
    ResetWorld {
        /// Seed that drives every random decision made by the generator.
        seed: u64,
    },
    /// Rebuilds the guaranteed-safe starting area around the origin.
    GenerateInitial,
    /// Advances the simulation clock and streams geometry around the player.
    Advance {
        /// Feet position of the player used to center the streaming window.
        player_position: Vec3,
        /// Duration of simulated time that elapsed since the previous advance.
        dt: Duration,
    },
    /// Replaces the generation tuning with the values of the provided level.
    AdjustDifficulty {
        /// Difficulty level that should become active.
        level: DifficultyLevel,
    },
    /// Removes every generated entity and forgets all known cells.
    ClearWorld,
}

/// Events broadcast by the world and the player systems.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a previously unknown cell was generated.
    CellGenerated {
        /// Grid coordinate of the new cell.
        cell: GridCoord,
    },
    /// Reports that far-away cells released their geometry.
    CellsRetired {
        /// Number of cells retired during the tick.
        count: usize,
    },
    /// Announces that the generator switched to a new section pattern.
    SectionChanged {
        /// Pattern that was active before the transition.
        from: SectionType,
        /// Pattern that is active after the transition.
        to: SectionType,
        /// Direction the path advances in after the transition.
        heading: Heading,
    },
    /// Confirms that a cosmetic landmark was raised beside the path.
    LandmarkRaised {
        /// Shape of the landmark.
        kind: LandmarkKind,
        /// World-space anchor of the landmark.
        position: Vec3,
    },
    /// Announces that the generation tuning changed.
    DifficultyChanged {
        /// Level whose tuning is now active.
        level: DifficultyLevel,
    },
    /// Confirms that every generated entity was discarded.
    WorldCleared,
    /// Reports that the player landed on a platform different from the
    /// previous one.
    PlatformReached {
        /// Platform the player is now standing on.
        platform: PlatformId,
    },
    /// Reports that the player performed a jump.
    Jumped {
        /// Indicates whether the jump kicked off a wall.
        from_wall: bool,
    },
    /// Reports that the player started running along a wall.
    WallRunStarted {
        /// Wall the player attached to.
        wall: WallId,
    },
    /// Reports that the player died.
    PlayerDied {
        /// Reason for the death.
        cause: DeathCause,
    },
    /// Reports that the player was placed back into the world.
    PlayerRespawned {
        /// Feet position the player respawned at.
        position: Vec3,
    },
    /// Reports that the player picked up a coin.
    CoinCollected {
        /// Identifier of the collected coin.
        coin: CoinId,
        /// Score value awarded for the coin.
        value: u32,
    },
    /// Reports that the player touched a hazard.
    ObstacleHit {
        /// Identifier of the obstacle that was touched.
        obstacle: ObstacleId,
        /// Kind of hazard that was touched.
        kind: ObstacleKind,
    },
    /// Reports that a jump pad launched the player.
    JumpPadTriggered {
        /// Identifier of the pad that fired.
        pad: JumpPadId,
    },
}

/// Reason attached to a player death.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// The player fell below the void threshold.
    Void,
    /// The player touched a hazard.
    Hazard,
}

/// Difficulty level driving generation tuning. Levels start at one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DifficultyLevel(u32);

impl DifficultyLevel {
    /// Easiest level, active when a session starts.
    pub const FIRST: Self = Self(1);

    /// Creates a new level, raising zero to the first level.
    #[must_use]
    pub const fn new(level: u32) -> Self {
        if level == 0 {
            Self::FIRST
        } else {
            Self(level)
        }
    }

    /// Retrieves the numeric representation of the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for DifficultyLevel {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Integer coordinate of a generation cell on the horizontal plane.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    x: i32,
    z: i32,
}

impl GridCoord {
    /// Cell containing the world origin.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column index along the world X axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index along the world Z axis.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Cell containing the provided world position for the given spacing.
    ///
    /// Positions are rounded to the nearest cell center. A non-positive or
    /// non-finite spacing maps every position onto the origin cell.
    #[must_use]
    pub fn from_world(position: Vec3, spacing: f32) -> Self {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Self::ORIGIN;
        }
        Self::new(
            (position.x / spacing).round() as i32,
            (position.z / spacing).round() as i32,
        )
    }

    /// Returns the coordinate shifted by the provided deltas.
    #[must_use]
    pub const fn shifted(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.z.saturating_add(dz))
    }

    /// Returns the coordinate `steps` cells ahead along `heading`.
    #[must_use]
    pub const fn ahead(self, heading: Heading, steps: i32) -> Self {
        let (dx, dz) = heading.step();
        self.shifted(dx * steps, dz * steps)
    }

    /// Returns the coordinate `steps` cells to the lateral side of `heading`.
    #[must_use]
    pub const fn beside(self, heading: Heading, steps: i32) -> Self {
        let (dx, dz) = heading.lateral();
        self.shifted(dx * steps, dz * steps)
    }

    /// World-space center of the cell at height `y`.
    #[must_use]
    pub fn to_world(self, spacing: f32, y: f32) -> Vec3 {
        Vec3::new(self.x as f32 * spacing, y, self.z as f32 * spacing)
    }

    /// Euclidean distance from the origin measured in cells.
    #[must_use]
    pub fn distance_from_origin(self) -> f32 {
        let x = self.x as f32;
        let z = self.z as f32;
        (x * x + z * z).sqrt()
    }

    /// Chebyshev distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }
}

/// Cardinal direction the generated path advances in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Toward positive Z. The path starts heading north.
    #[default]
    North,
    /// Toward positive X.
    East,
    /// Toward negative Z.
    South,
    /// Toward negative X.
    West,
}

impl Heading {
    /// Grid step taken when advancing one cell along the heading.
    #[must_use]
    pub const fn step(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Positive-axis step perpendicular to the heading.
    #[must_use]
    pub const fn lateral(self) -> (i32, i32) {
        match self {
            Self::North | Self::South => (1, 0),
            Self::East | Self::West => (0, 1),
        }
    }

    /// The two headings perpendicular to this one.
    #[must_use]
    pub const fn perpendiculars(self) -> [Heading; 2] {
        match self {
            Self::North | Self::South => [Self::East, Self::West],
            Self::East | Self::West => [Self::North, Self::South],
        }
    }

    /// Reports whether the heading advances along the Z axis.
    #[must_use]
    pub const fn is_along_z(self) -> bool {
        matches!(self, Self::North | Self::South)
    }

    /// Unit vector of the heading in world space.
    #[must_use]
    pub fn unit(self) -> Vec3 {
        let (dx, dz) = self.step();
        Vec3::new(dx as f32, 0.0, dz as f32)
    }
}

/// Generation pattern applied to a run of consecutive cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    /// Single-file path flanked by walls.
    Narrow,
    /// Wide field of platforms with random gaps.
    Open,
    /// Staircase of rising platforms assisted by jump pads.
    Climbing,
    /// Staircase of falling platforms with occasional flanking walls.
    Descent,
    /// Path alternating between the two lateral sides.
    Zigzag,
    /// Undulating steps with lower side ledges.
    Stepped,
    /// Sparse islands surrounded by satellite platforms.
    Islands,
    /// High-altitude platforms reached via jump pads.
    Floating,
}

impl SectionType {
    /// Every section pattern in declaration order.
    pub const ALL: [SectionType; 8] = [
        Self::Narrow,
        Self::Open,
        Self::Climbing,
        Self::Descent,
        Self::Zigzag,
        Self::Stepped,
        Self::Islands,
        Self::Floating,
    ];
}

/// Kind of hazard placed along the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Rotating horizontal blade.
    SpinningBlade,
    /// Thin vertical energy field.
    EnergyBarrier,
    /// Low plate bristling with spikes.
    SpikeTrap,
}

impl ObstacleKind {
    /// Every obstacle kind in declaration order.
    pub const ALL: [ObstacleKind; 3] = [Self::SpinningBlade, Self::EnergyBarrier, Self::SpikeTrap];

    /// Damage dealt when the player touches the hazard.
    #[must_use]
    pub const fn damage(self) -> f32 {
        match self {
            Self::SpinningBlade | Self::SpikeTrap => 1.0,
            Self::EnergyBarrier => 0.5,
        }
    }
}

/// Shape of a cosmetic landmark raised at section transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandmarkKind {
    /// Tall obelisk with a glowing spire.
    Obelisk,
    /// Floating formation of crystals.
    CrystalCluster,
    /// Gateway arch spanning the path side.
    Archway,
    /// Pulsing energy beacon.
    Beacon,
}

impl LandmarkKind {
    /// Every landmark kind in declaration order.
    pub const ALL: [LandmarkKind; 4] = [
        Self::Obelisk,
        Self::CrystalCluster,
        Self::Archway,
        Self::Beacon,
    ];
}

/// Arrangement used when scattering coins above a platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinPattern {
    /// One coin above the platform center.
    Single,
    /// Three coins in a row along the path heading.
    Line,
    /// Four coins alternating left and right of the path.
    Zigzag,
    /// Ring of five coins around a bonus coin.
    Circle,
    /// Three coins on a rising arc.
    Arc,
}

impl CoinPattern {
    /// Every coin pattern in declaration order.
    pub const ALL: [CoinPattern; 5] = [
        Self::Single,
        Self::Line,
        Self::Zigzag,
        Self::Circle,
        Self::Arc,
    ];
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to a platform.
    PlatformId
);
entity_id!(
    /// Unique identifier assigned to a wall.
    WallId
);
entity_id!(
    /// Unique identifier assigned to an obstacle.
    ObstacleId
);
entity_id!(
    /// Unique identifier assigned to a jump pad.
    JumpPadId
);
entity_id!(
    /// Unique identifier assigned to a coin.
    CoinId
);

/// Read-only snapshot of the player handed to world collision checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerProbe {
    /// Feet position of the player.
    pub position: Vec3,
    /// Current velocity of the player.
    pub velocity: Vec3,
    /// Indicates whether the player stands on a surface.
    pub grounded: bool,
    /// Collision volume of the player.
    pub collider: Aabb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_coord_rounds_to_nearest_cell() {
        let coord = GridCoord::from_world(Vec3::new(17.0, 3.0, -5.9), 12.0);
        assert_eq!(coord, GridCoord::new(1, 0));

        let coord = GridCoord::from_world(Vec3::new(-18.1, 0.0, 30.0), 12.0);
        assert_eq!(coord, GridCoord::new(-2, 3));
    }

    #[test]
    fn invalid_spacing_maps_to_origin() {
        assert_eq!(
            GridCoord::from_world(Vec3::splat(40.0), 0.0),
            GridCoord::ORIGIN
        );
        assert_eq!(
            GridCoord::from_world(Vec3::splat(40.0), f32::NAN),
            GridCoord::ORIGIN
        );
    }

    #[test]
    fn headings_turn_perpendicular() {
        for heading in [Heading::North, Heading::East, Heading::South, Heading::West] {
            for turned in heading.perpendiculars() {
                assert_ne!(heading.is_along_z(), turned.is_along_z());
                assert_eq!(heading.unit().dot(turned.unit()), 0.0);
            }
        }
    }

    #[test]
    fn lateral_is_perpendicular_to_step() {
        for heading in [Heading::North, Heading::East, Heading::South, Heading::West] {
            let (sx, sz) = heading.step();
            let (lx, lz) = heading.lateral();
            assert_eq!(sx * lx + sz * lz, 0);
        }
    }

    #[test]
    fn difficulty_level_never_drops_below_first() {
        assert_eq!(DifficultyLevel::new(0), DifficultyLevel::FIRST);
        assert_eq!(DifficultyLevel::new(4).get(), 4);
    }

    #[test]
    fn grid_coord_round_trips_through_bincode() {
        let coord = GridCoord::new(-7, 42);
        let bytes = bincode::serialize(&coord).expect("serialize grid coord");
        let restored: GridCoord = bincode::deserialize(&bytes).expect("deserialize grid coord");
        assert_eq!(restored, coord);
    }

    #[test]
    fn obstacle_damage_matches_kind() {
        assert_eq!(ObstacleKind::SpinningBlade.damage(), 1.0);
        assert_eq!(ObstacleKind::EnergyBarrier.damage(), 0.5);
        assert_eq!(ObstacleKind::SpikeTrap.damage(), 1.0);
    }
}
