//! Per-cell dressing: coin patterns and the single optional feature.

use std::f32::consts::PI;

use glam::Vec3;
use parkour_core::{Aabb, CoinPattern, Heading, ObstacleKind, SectionType};
use rand::Rng;

use crate::{
    animation::AnimationProfile,
    entities::{PlatformMotion, BONUS_COIN_VALUE, COIN_VALUE},
    tuning::GenerationTuning,
};

const COIN_CHANCE: f32 = 0.4;
const COIN_LIFT: f32 = 1.5;

/// Feature attached to a platform cell in addition to its coins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Feature {
    Wall { height: f32 },
    JumpPad,
    Obstacle,
    MovingPlatform,
}

/// Rolls the coin pattern for a new cell, if any.
pub(crate) fn roll_coin_pattern<R: Rng>(
    distance: f32,
    section: SectionType,
    rng: &mut R,
) -> Option<CoinPattern> {
    if rng.gen::<f32>() >= COIN_CHANCE {
        return None;
    }
    if distance < 5.0 {
        return (rng.gen::<f32>() < 0.4).then_some(CoinPattern::Single);
    }

    let roll = rng.gen::<f32>();
    match section {
        SectionType::Narrow => pick(roll, &[(0.3, CoinPattern::Line), (0.4, CoinPattern::Zigzag)]),
        SectionType::Open => pick(
            roll,
            &[
                (0.2, CoinPattern::Circle),
                (0.35, CoinPattern::Arc),
                (0.5, CoinPattern::Single),
            ],
        ),
        SectionType::Climbing => pick(
            roll,
            &[(0.3, CoinPattern::Zigzag), (0.5, CoinPattern::Line)],
        ),
        SectionType::Descent => pick(
            roll,
            &[
                (0.25, CoinPattern::Arc),
                (0.35, CoinPattern::Circle),
                (0.5, CoinPattern::Single),
            ],
        ),
        SectionType::Zigzag => pick(
            roll,
            &[(0.4, CoinPattern::Zigzag), (0.5, CoinPattern::Line)],
        ),
        SectionType::Stepped | SectionType::Islands | SectionType::Floating => (roll < 0.3)
            .then(|| CoinPattern::ALL[rng.gen_range(0..CoinPattern::ALL.len())]),
    }
}

fn pick(roll: f32, table: &[(f32, CoinPattern)]) -> Option<CoinPattern> {
    table
        .iter()
        .find(|(threshold, _)| roll < *threshold)
        .map(|(_, pattern)| *pattern)
}

/// Coin positions and values for a pattern centered above `platform_center`.
pub(crate) fn coin_layout(
    pattern: CoinPattern,
    platform_center: Vec3,
    heading: Heading,
) -> Vec<(Vec3, u32)> {
    let center = platform_center + Vec3::Y * COIN_LIFT;
    let forward = heading.unit();
    let side = Vec3::new(forward.z, 0.0, -forward.x);

    match pattern {
        CoinPattern::Single => vec![(center, COIN_VALUE)],
        CoinPattern::Line => [-2.0, 0.0, 2.0]
            .into_iter()
            .map(|along| (center + forward * along, COIN_VALUE))
            .collect(),
        CoinPattern::Zigzag => [-3.0_f32, -1.0, 1.0, 3.0]
            .into_iter()
            .enumerate()
            .map(|(index, along)| {
                let offset = if index % 2 == 0 { 1.5 } else { -1.5 };
                (center + forward * along + side * offset, COIN_VALUE)
            })
            .collect(),
        CoinPattern::Circle => {
            let mut coins: Vec<(Vec3, u32)> = (0..5)
                .map(|index| {
                    let angle = index as f32 / 5.0 * PI * 2.0;
                    (
                        center + Vec3::new(angle.cos() * 2.5, 0.0, angle.sin() * 2.5),
                        COIN_VALUE,
                    )
                })
                .collect();
            coins.push((center, BONUS_COIN_VALUE));
            coins
        }
        CoinPattern::Arc => (0..3)
            .map(|index| {
                let t = index as f32 / 2.0;
                let angle = PI * 0.25 + t * PI * 0.5;
                (
                    center
                        + Vec3::new(
                            angle.cos() * 3.0,
                            (t * PI).sin() * 1.5,
                            angle.sin() * 3.0,
                        ),
                    COIN_VALUE,
                )
            })
            .collect(),
    }
}

/// Animation parameters of a freshly placed coin.
pub(crate) fn coin_profile<R: Rng>(rng: &mut R) -> AnimationProfile {
    AnimationProfile {
        spin_speed: 2.0 + rng.gen::<f32>() * 3.0,
        bob_speed: 1.0 + rng.gen::<f32>(),
        bob_height: 0.3,
        pulse_speed: 0.0,
    }
}

/// Rolls the optional feature of a new cell.
///
/// A single roll is tested against an else-if chain so at most one feature
/// appears. `safe` suppresses hazards and walls.
pub(crate) fn roll_feature<R: Rng>(
    distance: f32,
    tuning: &GenerationTuning,
    safe: bool,
    rng: &mut R,
) -> Option<Feature> {
    let roll = rng.gen::<f32>();
    let obstacle_threshold = 0.3 + tuning.obstacle_chance;
    let moving_threshold =
        0.35 + (tuning.obstacle_chance * (1.0 + distance * 0.05)).min(0.4);

    let feature = if roll < 0.1 && distance > 3.0 {
        Some(Feature::Wall {
            height: 4.0 + rng.gen::<f32>() * 2.0,
        })
    } else if roll < 0.2 && distance > 2.0 {
        Some(Feature::JumpPad)
    } else if roll < obstacle_threshold && distance > 4.0 {
        Some(Feature::Obstacle)
    } else if roll < moving_threshold && distance > 5.0 && tuning.height_variation >= 2.0 {
        Some(Feature::MovingPlatform)
    } else {
        None
    };

    match feature {
        Some(Feature::JumpPad) => feature,
        Some(_) if safe => None,
        other => other,
    }
}

/// Shape of a generated hazard.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ObstacleShape {
    pub(crate) kind: ObstacleKind,
    pub(crate) bounds: Aabb,
    pub(crate) spikes: Vec<Vec3>,
    pub(crate) profile: AnimationProfile,
    pub(crate) yaw: f32,
}

/// Rolls a hazard standing on the platform whose center is `base`.
pub(crate) fn obstacle_shape<R: Rng>(base: Vec3, rng: &mut R) -> ObstacleShape {
    let kind = ObstacleKind::ALL[rng.gen_range(0..ObstacleKind::ALL.len())];
    match kind {
        ObstacleKind::SpinningBlade => ObstacleShape {
            kind,
            bounds: Aabb::from_center_size(base + Vec3::Y, Vec3::new(0.2, 2.0, 0.2)),
            spikes: Vec::new(),
            profile: AnimationProfile {
                spin_speed: 5.0 + rng.gen::<f32>() * 5.0,
                ..AnimationProfile::STILL
            },
            yaw: 0.0,
        },
        ObstacleKind::EnergyBarrier => {
            let yaw = rng.gen::<f32>() * PI;
            let span_x = (3.0 * yaw.cos().abs()).max(0.1);
            let span_z = (3.0 * yaw.sin().abs()).max(0.1);
            ObstacleShape {
                kind,
                bounds: Aabb::from_center_size(
                    base + Vec3::Y * 1.5,
                    Vec3::new(span_x, 3.0, span_z),
                ),
                spikes: Vec::new(),
                profile: AnimationProfile::STILL,
                yaw,
            }
        }
        ObstacleKind::SpikeTrap => {
            let anchor = base + Vec3::Y * 0.5;
            let spikes: Vec<Vec3> = (0..5)
                .map(|_| {
                    Vec3::new(
                        (rng.gen::<f32>() - 0.5) * 2.0,
                        0.0,
                        (rng.gen::<f32>() - 0.5) * 2.0,
                    )
                })
                .collect();
            let spike_size = Vec3::new(0.4, 1.0, 0.4);
            let bounds = spikes
                .iter()
                .map(|offset| Aabb::from_center_size(anchor + *offset, spike_size))
                .reduce(|acc, spike| acc.union(&spike))
                .unwrap_or_else(|| Aabb::from_center_size(anchor, spike_size));
            ObstacleShape {
                kind,
                bounds,
                spikes,
                profile: AnimationProfile::STILL,
                yaw: 0.0,
            }
        }
    }
}

/// Rolls the oscillation of a moving platform.
pub(crate) fn platform_motion<R: Rng>(rng: &mut R) -> PlatformMotion {
    let speed = 0.5 + rng.gen::<f32>() * 1.5;
    let raw = Vec3::new(
        rng.gen::<f32>() - 0.5,
        rng.gen::<f32>() * 0.5,
        rng.gen::<f32>() - 0.5,
    );
    let direction = raw.try_normalize().unwrap_or(Vec3::X);
    let amplitude = 3.0 + rng.gen::<f32>() * 3.0;
    PlatformMotion {
        direction,
        amplitude,
        speed,
    }
}
