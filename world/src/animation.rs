//! Cosmetic animation of generated entities.
//!
//! Nothing in this module feeds back into collision: coins collide at their
//! rest position and obstacles keep their rest bounds no matter how they
//! spin.

use crate::entities::{Coin, JumpPad, Landmark, Obstacle, SectionMarker};

/// Parameters describing how an entity spins, bobs and pulses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationProfile {
    /// Rotation speed around the vertical axis in radians per second.
    pub spin_speed: f32,
    /// Angular frequency of the vertical bob.
    pub bob_speed: f32,
    /// Amplitude of the vertical bob.
    pub bob_height: f32,
    /// Angular frequency of the scale pulse; zero disables pulsing.
    pub pulse_speed: f32,
}

impl AnimationProfile {
    /// Profile that leaves the entity perfectly still.
    pub const STILL: Self = Self {
        spin_speed: 0.0,
        bob_speed: 0.0,
        bob_height: 0.0,
        pulse_speed: 0.0,
    };
}

/// Transform applied on top of an entity's rest pose when presenting it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualPose {
    /// Accumulated rotation around the vertical axis.
    pub yaw: f32,
    /// Vertical offset from the rest position.
    pub lift: f32,
    /// Uniform scale factor.
    pub scale: f32,
}

impl Default for VisualPose {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            lift: 0.0,
            scale: 1.0,
        }
    }
}

impl VisualPose {
    fn advance(&mut self, profile: &AnimationProfile, clock: f32, dt: f32) {
        self.yaw = (self.yaw + profile.spin_speed * dt) % std::f32::consts::TAU;
        self.lift = (clock * profile.bob_speed).sin() * profile.bob_height;
        self.scale = if profile.pulse_speed > 0.0 {
            0.9 + 0.2 * (clock * profile.pulse_speed).sin()
        } else {
            1.0
        };
    }
}

/// Advances every cosmetic pose by one frame.
///
/// `elapsed` is the world's simulated clock after the frame and `dt` the
/// frame duration. Markers older than their lifespan are dropped.
pub(crate) fn animate<'a>(
    elapsed: f32,
    dt: f32,
    coins: impl Iterator<Item = &'a mut Coin>,
    pads: impl Iterator<Item = &'a mut JumpPad>,
    obstacles: impl Iterator<Item = &'a mut Obstacle>,
    markers: &mut Vec<SectionMarker>,
    landmarks: &mut [Landmark],
) {
    for coin in coins {
        coin.pose.advance(&coin.profile, elapsed, dt);
    }
    for pad in pads {
        pad.pose.advance(&pad.profile, elapsed, dt);
    }
    for obstacle in obstacles {
        obstacle.pose.advance(&obstacle.profile, elapsed, dt);
    }

    for marker in markers.iter_mut() {
        marker.age += dt;
        let age = marker.age;
        marker.pose.advance(&marker.profile, age, dt);
    }
    markers.retain(|marker| marker.age <= marker.lifespan);

    for landmark in landmarks.iter_mut() {
        landmark.pose.advance(&landmark.profile, elapsed, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_profile_keeps_rest_pose() {
        let mut pose = VisualPose::default();
        pose.advance(&AnimationProfile::STILL, 3.0, 0.5);
        assert_eq!(pose, VisualPose::default());
    }

    #[test]
    fn pulse_stays_within_band() {
        let profile = AnimationProfile {
            pulse_speed: 2.0,
            ..AnimationProfile::STILL
        };
        let mut pose = VisualPose::default();
        for step in 0..100 {
            pose.advance(&profile, step as f32 * 0.05, 0.05);
            assert!(pose.scale > 0.69 && pose.scale < 1.11);
        }
    }
}
