//! Narrow-phase resolution of the player collider against world geometry.

use glam::Vec3;
use parkour_core::{Aabb, PlatformId, WallId};
use parkour_world::{FaceAxis, Platform, Wall};

/// Gap left between the player and a surface it was pushed out of.
pub(crate) const SKIN: f32 = 1e-3;

/// Vertical tolerance of the swept landing test.
pub(crate) const LANDING_TOLERANCE: f32 = 0.5;

/// Collider dimensions of the player, anchored at the feet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Body {
    pub(crate) half_width: f32,
    pub(crate) height: f32,
}

impl Body {
    pub(crate) fn collider(self, feet: Vec3) -> Aabb {
        Aabb::from_feet(feet, self.half_width, self.height, self.half_width)
    }
}

/// Pushes the player out of every intersecting wall along the axis of least
/// penetration and cancels the velocity on that axis.
pub(crate) fn resolve_walls(body: Body, position: &mut Vec3, velocity: &mut Vec3, walls: &[&Wall]) {
    for wall in walls {
        let bounds = wall.bounds();
        let collider = body.collider(*position);
        if !collider.intersects(&bounds) {
            continue;
        }

        let overlap = collider.overlap_extent(&bounds);
        let center = bounds.center();
        if overlap.x < overlap.z {
            position.x = if position.x < center.x {
                bounds.min().x - body.half_width - SKIN
            } else {
                bounds.max().x + body.half_width + SKIN
            };
            velocity.x = 0.0;
        } else {
            position.z = if position.z < center.z {
                bounds.min().z - body.half_width - SKIN
            } else {
                bounds.max().z + body.half_width + SKIN
            };
            velocity.z = 0.0;
        }
    }
}

/// Outcome of the vertical resolution against platforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Support {
    /// Feet crossed the top of the platform while descending.
    Landed { platform: PlatformId, top: f32 },
    /// Head struck the underside of a platform while ascending.
    Bumped { ceiling: f32 },
    /// Nothing underfoot or overhead.
    Free,
}

/// Swept landing test of the vertical sub-step from `previous_feet` to
/// `position`.
///
/// Platforms are expected in identifier order; the first qualifying one wins.
pub(crate) fn resolve_platforms(
    body: Body,
    previous_feet: f32,
    position: Vec3,
    vertical_velocity: f32,
    platforms: &[&Platform],
) -> Support {
    let feet = position.y;
    if vertical_velocity <= 0.0 {
        let landing = platforms.iter().find(|platform| {
            let top = platform.top();
            platform.bounds().contains_xz(position)
                && previous_feet >= top - LANDING_TOLERANCE
                && feet <= top + LANDING_TOLERANCE
        });
        return match landing {
            Some(platform) => Support::Landed {
                platform: platform.id(),
                top: platform.top(),
            },
            None => Support::Free,
        };
    }

    let head = feet + body.height;
    let previous_head = previous_feet + body.height;
    platforms
        .iter()
        .map(|platform| platform.bounds())
        .find(|bounds| {
            let underside = bounds.min().y;
            bounds.contains_xz(position) && previous_head <= underside && head > underside
        })
        .map_or(Support::Free, |bounds| Support::Bumped {
            ceiling: bounds.min().y,
        })
}

/// Wall the player is running along.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WallContact {
    pub(crate) wall: WallId,
    pub(crate) normal: Vec3,
}

/// Finds a wall whose broad face lies within `tolerance` of the collider.
///
/// The player must sit strictly inside the face's span along the other
/// horizontal axis and overlap the wall vertically.
pub(crate) fn wall_contact(
    body: Body,
    position: Vec3,
    tolerance: f32,
    walls: &[&Wall],
) -> Option<WallContact> {
    let reach = body.half_width + tolerance;
    walls.iter().find_map(|wall| {
        let bounds = wall.bounds();
        let (min, max) = (bounds.min(), bounds.max());
        let vertical = position.y < max.y && position.y + body.height > min.y;
        if !vertical {
            return None;
        }

        let (along, lower, upper, span_point, span_min, span_max, axis) = match wall.face_axis() {
            FaceAxis::X => (position.x, min.x, max.x, position.z, min.z, max.z, Vec3::X),
            FaceAxis::Z => (position.z, min.z, max.z, position.x, min.x, max.x, Vec3::Z),
        };
        if !(span_point > span_min && span_point < span_max) {
            return None;
        }

        let normal = if (0.0..=reach).contains(&(lower - along)) {
            -axis
        } else if (0.0..=reach).contains(&(along - upper)) {
            axis
        } else {
            return None;
        };
        Some(WallContact {
            wall: wall.id(),
            normal,
        })
    })
}
