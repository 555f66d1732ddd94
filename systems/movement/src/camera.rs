//! First-person camera that follows the player's eyes.

use glam::Vec3;

use crate::PlayerController;

/// Position and orientation a renderer should use for the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// World-space eye position.
    pub eye: Vec3,
    /// Rotation around the vertical axis; zero looks toward negative Z.
    pub yaw: f32,
    /// Rotation around the lateral axis; positive looks up.
    pub pitch: f32,
}

impl CameraPose {
    /// Unit view direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }
}

/// Camera pose looking out of the player's eyes without smoothing.
#[must_use]
pub fn camera_pose(player: &PlayerController) -> CameraPose {
    CameraPose {
        eye: player.position() + Vec3::Y * player.tuning().eye_height,
        yaw: player.yaw(),
        pitch: player.pitch(),
    }
}

/// Exponentially smoothed follow camera.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraRig {
    eye: Vec3,
}

impl CameraRig {
    /// Creates a rig already positioned at the player's eyes.
    #[must_use]
    pub fn new(player: &PlayerController) -> Self {
        Self {
            eye: camera_pose(player).eye,
        }
    }

    /// Moves the eye toward the player and returns the smoothed pose.
    pub fn follow(&mut self, player: &PlayerController, dt: f32) -> CameraPose {
        let target = camera_pose(player);
        let sharpness = player.tuning().camera_sharpness;
        let blend = if dt.is_finite() && dt > 0.0 {
            1.0 - (-sharpness * dt).exp()
        } else {
            0.0
        };
        self.eye = self.eye.lerp(target.eye, blend.clamp(0.0, 1.0));
        CameraPose {
            eye: self.eye,
            ..target
        }
    }

    /// Jumps straight to the player's eyes, e.g. after a respawn.
    pub fn snap(&mut self, player: &PlayerController) {
        self.eye = camera_pose(player).eye;
    }

    /// Current smoothed eye position.
    #[must_use]
    pub const fn eye(&self) -> Vec3 {
        self.eye
    }
}
