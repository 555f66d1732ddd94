//! Section patterns that decide which cells appear ahead of the player.

use parkour_core::{GridCoord, Heading, SectionType};
use rand::Rng;

use crate::tuning::{GenerationTuning, WorldConfig};

/// Generation request produced by a section pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum CellPlan {
    /// Platform cell, optionally at a forced height. Spine cells advance the
    /// section counter.
    Platform {
        cell: GridCoord,
        height: Option<f32>,
        spine: bool,
    },
    /// Solid wall cell standing on the given base height.
    Wall { cell: GridCoord, base: Option<f32> },
    /// Jump pad on top of an already generated platform.
    JumpPad { cell: GridCoord },
}

/// Outcome of a section transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) from: SectionType,
    pub(crate) to: SectionType,
    pub(crate) heading: Heading,
}

/// Tracks the active section pattern and path heading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionGenerator {
    heading: Heading,
    section: SectionType,
    spine_cells: u32,
}

impl Default for SectionGenerator {
    fn default() -> Self {
        Self {
            heading: Heading::North,
            section: SectionType::Open,
            spine_cells: 0,
        }
    }
}

impl SectionGenerator {
    /// Direction the path currently advances in.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Pattern currently used for new cells.
    #[must_use]
    pub const fn section(&self) -> SectionType {
        self.section
    }

    /// Spine cells generated since the last transition.
    #[must_use]
    pub const fn spine_cells(&self) -> u32 {
        self.spine_cells
    }

    #[cfg(test)]
    pub(crate) fn fixed(heading: Heading, section: SectionType) -> Self {
        Self {
            heading,
            section,
            spine_cells: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Adds freshly generated spine cells and reports whether the section
    /// reached its configured length.
    pub(crate) fn record_spine(&mut self, generated: u32, section_length: u32) -> bool {
        self.spine_cells = self.spine_cells.saturating_add(generated);
        self.spine_cells >= section_length
    }

    /// Switches to a successor pattern, possibly turning the path.
    pub(crate) fn transition<R: Rng>(&mut self, rng: &mut R) -> Transition {
        let from = self.section;
        if rng.gen_bool(0.5) {
            let options = self.heading.perpendiculars();
            self.heading = options[rng.gen_range(0..options.len())];
        }
        let choices = successors(from);
        self.section = choices[rng.gen_range(0..choices.len())];
        self.spine_cells = 0;

        Transition {
            from,
            to: self.section,
            heading: self.heading,
        }
    }

    /// Cell requests for the streaming window starting at `origin`.
    pub(crate) fn plan<R: Rng>(
        &self,
        origin: GridCoord,
        tuning: &GenerationTuning,
        config: &WorldConfig,
        rng: &mut R,
    ) -> Vec<CellPlan> {
        let heading = self.heading;
        let base = config.base_height;
        let variation = tuning.height_variation;
        let mut plans = Vec::new();

        for i in 1..=config.grid_radius.max(1) {
            let spine = origin.ahead(heading, i);
            let step = i as f32;
            match self.section {
                SectionType::Narrow => {
                    plans.push(spine_cell(spine, None));
                    plans.push(CellPlan::Wall {
                        cell: spine.beside(heading, -1),
                        base: None,
                    });
                    plans.push(CellPlan::Wall {
                        cell: spine.beside(heading, 1),
                        base: None,
                    });
                }
                SectionType::Open => {
                    let width = tuning.path_width + 1;
                    for w in -width..=width {
                        let gap = rng.gen::<f32>() < 0.2;
                        if gap && w != 0 {
                            continue;
                        }
                        let cell = spine.beside(heading, w);
                        if w == 0 {
                            plans.push(spine_cell(cell, None));
                        } else {
                            plans.push(side_cell(cell, None));
                        }
                    }
                }
                SectionType::Climbing => {
                    let height = base + step * (2.0 + variation);
                    plans.push(spine_cell(spine, Some(height)));
                    if i % 2 == 0 {
                        plans.push(CellPlan::JumpPad {
                            cell: origin.ahead(heading, i - 1),
                        });
                    }
                }
                SectionType::Descent => {
                    let height =
                        (base + step * (-1.5 - variation * 0.5)).max(config.min_section_height);
                    plans.push(spine_cell(spine, Some(height)));
                    if i % 3 == 0 {
                        plans.push(CellPlan::Wall {
                            cell: spine.beside(heading, -1),
                            base: Some(height),
                        });
                        plans.push(CellPlan::Wall {
                            cell: spine.beside(heading, 1),
                            base: Some(height),
                        });
                    }
                }
                SectionType::Zigzag => {
                    let side = if i % 2 == 0 { 1 } else { -1 };
                    let cell = spine.beside(heading, side);
                    plans.push(spine_cell(cell, None));
                    if i % 3 == 0 {
                        plans.push(CellPlan::JumpPad { cell });
                    }
                }
                SectionType::Stepped => {
                    let height = base + (step * std::f32::consts::PI / 3.0).sin() * 3.0;
                    plans.push(spine_cell(spine, Some(height)));
                    if i % 2 == 0 {
                        plans.push(side_cell(spine.beside(heading, 1), Some(height - 1.0)));
                        plans.push(side_cell(spine.beside(heading, -1), Some(height - 1.0)));
                    }
                }
                SectionType::Islands => {
                    if i % 3 == 0 {
                        continue;
                    }
                    let height = base + (step * 0.7).sin() * 2.0;
                    plans.push(spine_cell(spine, Some(height)));
                    for _ in 0..3 {
                        let dx = ((rng.gen::<f32>() - 0.5) * 3.0).round() as i32;
                        let dz = ((rng.gen::<f32>() - 0.5) * 3.0).round() as i32;
                        if dx == 0 && dz == 0 {
                            continue;
                        }
                        let satellite_height = height + (rng.gen::<f32>() - 0.5) * 2.0;
                        plans.push(side_cell(spine.shifted(dx, dz), Some(satellite_height)));
                    }
                }
                SectionType::Floating => {
                    let height = base + 8.0 + (step * 0.8).sin() * 4.0;
                    plans.push(spine_cell(spine, Some(height)));
                    if i % 2 == 0 {
                        plans.push(side_cell(spine.beside(heading, 1), Some(height - 1.5)));
                        plans.push(side_cell(spine.beside(heading, -1), Some(height - 1.5)));
                        if i % 4 == 0 {
                            plans.push(CellPlan::JumpPad { cell: spine });
                        }
                    }
                }
            }
        }

        plans
    }
}

/// Patterns allowed to follow `section`.
pub(crate) fn successors(section: SectionType) -> &'static [SectionType] {
    use SectionType::*;

    match section {
        Climbing => &[Descent, Open, Floating],
        Descent => &[Open, Islands, Stepped],
        Narrow => &[Climbing, Zigzag, Floating],
        Zigzag => &[Open, Climbing, Islands],
        Islands => &[Open, Stepped, Narrow],
        Stepped => &[Climbing, Zigzag, Narrow],
        Floating => &[Descent, Open, Islands],
        Open => &[Narrow, Climbing, Descent, Zigzag, Stepped, Islands, Floating],
    }
}

fn spine_cell(cell: GridCoord, height: Option<f32>) -> CellPlan {
    CellPlan::Platform {
        cell,
        height,
        spine: true,
    }
}

fn side_cell(cell: GridCoord, height: Option<f32>) -> CellPlan {
    CellPlan::Platform {
        cell,
        height,
        spine: false,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn successors_never_repeat_the_section() {
        for section in SectionType::ALL {
            assert!(!successors(section).contains(&section));
            assert!(!successors(section).is_empty());
        }
    }

    #[test]
    fn transitions_turn_only_perpendicular() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut generator = SectionGenerator::default();
        for _ in 0..64 {
            let before = generator.clone();
            let transition = generator.transition(&mut rng);
            assert_ne!(transition.from, transition.to);
            assert_eq!(generator.spine_cells(), 0);
            if transition.heading != before.heading() {
                assert!(before.heading().perpendiculars().contains(&transition.heading));
            }
        }
    }

    #[test]
    fn narrow_section_flanks_spine_with_walls() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let generator = SectionGenerator {
            heading: Heading::East,
            section: SectionType::Narrow,
            spine_cells: 0,
        };
        let plans = generator.plan(
            GridCoord::ORIGIN,
            &GenerationTuning::default(),
            &WorldConfig::default(),
            &mut rng,
        );

        assert_eq!(plans.len(), 12);
        assert!(plans.contains(&CellPlan::Wall {
            cell: GridCoord::new(2, 1),
            base: None,
        }));
        assert!(plans.contains(&CellPlan::Wall {
            cell: GridCoord::new(2, -1),
            base: None,
        }));
    }

    #[test]
    fn descent_heights_respect_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let generator = SectionGenerator {
            heading: Heading::North,
            section: SectionType::Descent,
            spine_cells: 0,
        };
        let config = WorldConfig::default();
        let tuning = GenerationTuning::for_level(parkour_core::DifficultyLevel::new(5));
        for plan in generator.plan(GridCoord::ORIGIN, &tuning, &config, &mut rng) {
            if let CellPlan::Platform {
                height: Some(height),
                ..
            } = plan
            {
                assert!(height >= config.min_section_height);
            }
        }
    }
}
