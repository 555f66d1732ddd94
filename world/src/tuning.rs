//! Generation parameters derived from the difficulty level and the static
//! streaming configuration.

use parkour_core::DifficultyLevel;
use serde::{Deserialize, Serialize};

/// Difficulty-dependent knobs consulted whenever a cell is generated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationTuning {
    /// Nominal gap between consecutive path platforms at this level.
    ///
    /// Reported to front ends with the rest of the row; placement itself
    /// follows `grid_spacing` and the section footprints.
    pub platform_spacing: f32,
    /// Probability weight for hazards on freshly generated cells.
    pub obstacle_chance: f32,
    /// Amplitude of the height noise applied to platforms.
    pub height_variation: f32,
    /// World-space distance between neighbouring cell centers.
    pub grid_spacing: f32,
    /// Number of extra platforms flanking the path in open areas.
    pub path_width: i32,
    /// Number of spine cells generated before the section pattern changes.
    pub section_length: u32,
}

impl GenerationTuning {
    /// Tuning for the provided difficulty level.
    ///
    /// The table is a step function; levels beyond the fifth reuse the
    /// fifth row.
    #[must_use]
    pub fn for_level(level: DifficultyLevel) -> Self {
        match level.get() {
            0 | 1 => Self {
                platform_spacing: 10.0,
                obstacle_chance: 0.1,
                height_variation: 0.0,
                grid_spacing: 12.0,
                path_width: 2,
                section_length: 15,
            },
            2 => Self {
                platform_spacing: 8.0,
                obstacle_chance: 0.2,
                height_variation: 1.0,
                grid_spacing: 12.0,
                path_width: 1,
                section_length: 12,
            },
            3 => Self {
                platform_spacing: 7.0,
                obstacle_chance: 0.3,
                height_variation: 2.0,
                grid_spacing: 10.0,
                path_width: 1,
                section_length: 10,
            },
            4 => Self {
                platform_spacing: 6.0,
                obstacle_chance: 0.4,
                height_variation: 3.0,
                grid_spacing: 10.0,
                path_width: 1,
                section_length: 8,
            },
            _ => Self {
                platform_spacing: 5.0,
                obstacle_chance: 0.5,
                height_variation: 4.0,
                grid_spacing: 8.0,
                path_width: 1,
                section_length: 6,
            },
        }
    }
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self::for_level(DifficultyLevel::FIRST)
    }
}

/// Static configuration of the streaming window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of cells generated ahead of the player.
    pub grid_radius: i32,
    /// Chebyshev radius, in cells, beyond which geometry is retired.
    /// `None` keeps every generated cell alive.
    pub retain_radius: Option<u32>,
    /// Height of the platform centers on flat ground.
    pub base_height: f32,
    /// Lowest platform center a descent section may produce.
    pub min_section_height: f32,
    /// Thickness of generated platforms.
    pub platform_thickness: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_radius: 4,
            retain_radius: Some(16),
            base_height: 0.0,
            min_section_height: -8.0,
            platform_thickness: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_beyond_table_reuse_last_row() {
        assert_eq!(
            GenerationTuning::for_level(DifficultyLevel::new(9)),
            GenerationTuning::for_level(DifficultyLevel::new(5))
        );
    }

    #[test]
    fn platform_spacing_tightens_within_the_grid() {
        let rows: Vec<GenerationTuning> = (1..=5)
            .map(|level| GenerationTuning::for_level(DifficultyLevel::new(level)))
            .collect();
        let spacings: Vec<f32> = rows.iter().map(|row| row.platform_spacing).collect();
        assert_eq!(spacings, vec![10.0, 8.0, 7.0, 6.0, 5.0]);
        for row in &rows {
            assert!(row.platform_spacing < row.grid_spacing);
        }
    }

    #[test]
    fn level_two_keeps_wide_grid() {
        let tuning = GenerationTuning::for_level(DifficultyLevel::new(2));
        assert_eq!(tuning.grid_spacing, 12.0);
        assert_eq!(tuning.path_width, 1);
    }
}
