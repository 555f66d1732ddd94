//! Axis-aligned bounding volumes shared by the world and movement systems.
//!
//! Every predicate in this module treats box faces as open intervals: two
//! boxes that merely touch along a face do not intersect. The player resting
//! exactly on a platform top therefore never "intersects" the platform, and
//! all callers agree on that convention.

use glam::Vec3;

/// Axis-aligned box described by its minimum and maximum corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Creates a box spanning the two corners, normalizing the axis order.
    #[must_use]
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box centered on `center` with full extents `size`.
    #[must_use]
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Creates a feet-anchored collider: `feet` is the bottom-center point.
    #[must_use]
    pub fn from_feet(feet: Vec3, half_width: f32, height: f32, half_depth: f32) -> Self {
        Self::from_corners(
            Vec3::new(feet.x - half_width, feet.y, feet.z - half_depth),
            Vec3::new(feet.x + half_width, feet.y + height, feet.z + half_depth),
        )
    }

    /// Minimum corner of the box.
    #[must_use]
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner of the box.
    #[must_use]
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half extents along each axis.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Reports whether the two boxes overlap with positive volume.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Overlap length along each axis; zero on any axis where the boxes are
    /// separated or touching.
    #[must_use]
    pub fn overlap_extent(&self, other: &Aabb) -> Vec3 {
        let low = self.min.max(other.min);
        let high = self.max.min(other.max);
        (high - low).max(Vec3::ZERO)
    }

    /// Reports whether the point's horizontal projection lies strictly inside
    /// the box footprint.
    #[must_use]
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.z > self.min.z && point.z < self.max.z
    }

    /// Returns the box shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Smallest box enclosing both inputs.
    #[must_use]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns the box grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        let margin = Vec3::splat(margin.max(0.0));
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }
}
