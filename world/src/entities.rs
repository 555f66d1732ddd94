//! Entities attached to generated cells.

use glam::Vec3;
use parkour_core::{
    Aabb, CoinId, GridCoord, Heading, JumpPadId, LandmarkKind, ObstacleId, ObstacleKind,
    PlatformId, SectionType, WallId,
};

use crate::animation::{AnimationProfile, VisualPose};

/// Vertical launch speed applied by a jump pad unless overridden.
pub const DEFAULT_JUMP_BOOST: f32 = 15.0;
/// Horizontal radius around a jump pad center that triggers a launch.
pub const JUMP_PAD_RADIUS: f32 = 1.0;
/// Score value of a regular coin.
pub const COIN_VALUE: u32 = 10;
/// Score value of the bonus coin at the center of a circle pattern.
pub const BONUS_COIN_VALUE: u32 = 25;
/// Seconds a section marker stays alive.
pub const SECTION_MARKER_LIFESPAN: f32 = 15.0;

const COIN_EXTENT: f32 = 1.0;

/// Static or oscillating surface the player can stand on.
#[derive(Clone, Debug, PartialEq)]
pub struct Platform {
    id: PlatformId,
    cell: Option<GridCoord>,
    rest: Aabb,
    bounds: Aabb,
    velocity: Vec3,
    motion: Option<PlatformMotion>,
}

impl Platform {
    pub(crate) fn fixed(id: PlatformId, cell: Option<GridCoord>, bounds: Aabb) -> Self {
        Self {
            id,
            cell,
            rest: bounds,
            bounds,
            velocity: Vec3::ZERO,
            motion: None,
        }
    }

    pub(crate) fn moving(
        id: PlatformId,
        cell: Option<GridCoord>,
        bounds: Aabb,
        motion: PlatformMotion,
        elapsed: f32,
    ) -> Self {
        let mut platform = Self::fixed(id, cell, bounds);
        platform.motion = Some(motion);
        platform.advance(elapsed);
        platform
    }

    /// Identifier of the platform.
    #[must_use]
    pub const fn id(&self) -> PlatformId {
        self.id
    }

    /// Cell that owns the platform; `None` for manually placed platforms.
    #[must_use]
    pub const fn cell(&self) -> Option<GridCoord> {
        self.cell
    }

    /// Current world-space bounds of the platform.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Height of the walkable top surface.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.bounds.max().y
    }

    /// Instantaneous velocity; zero for static platforms.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Oscillation parameters of a moving platform.
    #[must_use]
    pub const fn motion(&self) -> Option<&PlatformMotion> {
        self.motion.as_ref()
    }

    /// Reports whether the platform oscillates.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    pub(crate) fn advance(&mut self, elapsed: f32) {
        if let Some(motion) = &self.motion {
            self.bounds = self.rest.translated(motion.offset(elapsed));
            self.velocity = motion.velocity(elapsed);
        }
    }

    pub(crate) fn accelerate(&mut self, factor: f32) {
        if let Some(motion) = &mut self.motion {
            motion.speed *= factor;
        }
    }
}

/// Sinusoidal oscillation of a moving platform around its rest position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformMotion {
    /// Unit direction of travel.
    pub direction: Vec3,
    /// Maximum displacement from the rest position.
    pub amplitude: f32,
    /// Angular frequency of the oscillation.
    pub speed: f32,
}

impl PlatformMotion {
    /// Displacement from the rest position at the given world time.
    #[must_use]
    pub fn offset(&self, elapsed: f32) -> Vec3 {
        self.direction * (elapsed * self.speed).sin() * self.amplitude
    }

    /// Analytic derivative of [`PlatformMotion::offset`].
    #[must_use]
    pub fn velocity(&self, elapsed: f32) -> Vec3 {
        self.direction * (elapsed * self.speed).cos() * self.speed * self.amplitude
    }
}

/// Horizontal axis along which a wall's broad faces point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceAxis {
    /// Broad faces point toward negative and positive X.
    X,
    /// Broad faces point toward negative and positive Z.
    Z,
}

impl FaceAxis {
    /// Normal axis of the thinner horizontal extent; X on a tie.
    #[must_use]
    pub fn thinnest(bounds: &Aabb) -> Self {
        let size = bounds.size();
        if size.x <= size.z {
            Self::X
        } else {
            Self::Z
        }
    }

    /// Axis facing a path that runs along `heading`.
    #[must_use]
    pub const fn across(heading: Heading) -> Self {
        if heading.is_along_z() {
            Self::X
        } else {
            Self::Z
        }
    }
}

/// Blocking vertical volume that doubles as a wall-run surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    id: WallId,
    cell: Option<GridCoord>,
    bounds: Aabb,
    faces: FaceAxis,
}

impl Wall {
    pub(crate) fn new(id: WallId, cell: Option<GridCoord>, bounds: Aabb, faces: FaceAxis) -> Self {
        Self {
            id,
            cell,
            bounds,
            faces,
        }
    }

    /// Identifier of the wall.
    #[must_use]
    pub const fn id(&self) -> WallId {
        self.id
    }

    /// Cell that owns the wall; `None` for manually placed walls.
    #[must_use]
    pub const fn cell(&self) -> Option<GridCoord> {
        self.cell
    }

    /// World-space bounds of the wall.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Normal axis of the broad faces.
    ///
    /// Walls flanking the path face it; free-standing walls face along their
    /// thinner horizontal extent.
    #[must_use]
    pub const fn face_axis(&self) -> FaceAxis {
        self.faces
    }
}

/// Hazard that kills the player on contact.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    id: ObstacleId,
    kind: ObstacleKind,
    cell: Option<GridCoord>,
    bounds: Aabb,
    spikes: Vec<Vec3>,
    pub(crate) profile: AnimationProfile,
    pub(crate) pose: VisualPose,
}

impl Obstacle {
    pub(crate) fn new(
        id: ObstacleId,
        kind: ObstacleKind,
        cell: Option<GridCoord>,
        bounds: Aabb,
        spikes: Vec<Vec3>,
        profile: AnimationProfile,
        initial_yaw: f32,
    ) -> Self {
        Self {
            id,
            kind,
            cell,
            bounds,
            spikes,
            profile,
            pose: VisualPose {
                yaw: initial_yaw,
                ..VisualPose::default()
            },
        }
    }

    /// Identifier of the obstacle.
    #[must_use]
    pub const fn id(&self) -> ObstacleId {
        self.id
    }

    /// Kind of hazard.
    #[must_use]
    pub const fn kind(&self) -> ObstacleKind {
        self.kind
    }

    /// Cell that owns the obstacle; `None` for manually placed obstacles.
    #[must_use]
    pub const fn cell(&self) -> Option<GridCoord> {
        self.cell
    }

    /// Collision bounds of the obstacle.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Offsets of the individual spikes of a spike trap relative to its base.
    #[must_use]
    pub fn spikes(&self) -> &[Vec3] {
        &self.spikes
    }

    /// Current cosmetic pose.
    #[must_use]
    pub const fn pose(&self) -> VisualPose {
        self.pose
    }
}

/// Pad that launches a grounded player into the air.
#[derive(Clone, Debug, PartialEq)]
pub struct JumpPad {
    id: JumpPadId,
    cell: Option<GridCoord>,
    center: Vec3,
    boost: f32,
    pub(crate) profile: AnimationProfile,
    pub(crate) pose: VisualPose,
}

impl JumpPad {
    pub(crate) fn new(id: JumpPadId, cell: Option<GridCoord>, center: Vec3, boost: f32) -> Self {
        Self {
            id,
            cell,
            center,
            boost,
            profile: AnimationProfile {
                spin_speed: 0.5,
                bob_speed: 5.0,
                bob_height: 0.15,
                pulse_speed: 5.0,
            },
            pose: VisualPose::default(),
        }
    }

    /// Identifier of the pad.
    #[must_use]
    pub const fn id(&self) -> JumpPadId {
        self.id
    }

    /// Cell that owns the pad; `None` for manually placed pads.
    #[must_use]
    pub const fn cell(&self) -> Option<GridCoord> {
        self.cell
    }

    /// Center of the pad surface.
    #[must_use]
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Vertical launch speed.
    #[must_use]
    pub const fn boost(&self) -> f32 {
        self.boost
    }

    /// Reports whether a point lies within the trigger radius horizontally.
    #[must_use]
    pub fn covers(&self, point: Vec3) -> bool {
        let dx = point.x - self.center.x;
        let dz = point.z - self.center.z;
        (dx * dx + dz * dz).sqrt() < JUMP_PAD_RADIUS
    }

    /// Current cosmetic pose.
    #[must_use]
    pub const fn pose(&self) -> VisualPose {
        self.pose
    }
}

/// Collectible coin floating above a platform.
#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    id: CoinId,
    cell: Option<GridCoord>,
    position: Vec3,
    value: u32,
    pub(crate) profile: AnimationProfile,
    pub(crate) pose: VisualPose,
}

impl Coin {
    pub(crate) fn new(
        id: CoinId,
        cell: Option<GridCoord>,
        position: Vec3,
        value: u32,
        profile: AnimationProfile,
    ) -> Self {
        Self {
            id,
            cell,
            position,
            value,
            profile,
            pose: VisualPose::default(),
        }
    }

    /// Identifier of the coin.
    #[must_use]
    pub const fn id(&self) -> CoinId {
        self.id
    }

    /// Cell that owns the coin; `None` for manually placed coins.
    #[must_use]
    pub const fn cell(&self) -> Option<GridCoord> {
        self.cell
    }

    /// Rest position used for collision.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Score value awarded on pickup.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Collision bounds around the rest position.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, Vec3::splat(COIN_EXTENT))
    }

    /// Position including the cosmetic bob.
    #[must_use]
    pub fn visual_position(&self) -> Vec3 {
        self.position + Vec3::Y * self.pose.lift
    }

    /// Current cosmetic pose.
    #[must_use]
    pub const fn pose(&self) -> VisualPose {
        self.pose
    }
}

/// Transient ring announcing a section transition.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionMarker {
    section: SectionType,
    heading: Heading,
    position: Vec3,
    pub(crate) age: f32,
    pub(crate) lifespan: f32,
    pub(crate) profile: AnimationProfile,
    pub(crate) pose: VisualPose,
}

impl SectionMarker {
    pub(crate) fn new(section: SectionType, heading: Heading, position: Vec3) -> Self {
        Self {
            section,
            heading,
            position,
            age: 0.0,
            lifespan: SECTION_MARKER_LIFESPAN,
            profile: AnimationProfile {
                spin_speed: 1.0,
                bob_speed: 0.8,
                bob_height: 0.5,
                pulse_speed: 0.0,
            },
            pose: VisualPose::default(),
        }
    }

    /// Section the marker announces.
    #[must_use]
    pub const fn section(&self) -> SectionType {
        self.section
    }

    /// Path heading when the marker was placed.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Rest position of the marker.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Seconds since the marker was placed.
    #[must_use]
    pub const fn age(&self) -> f32 {
        self.age
    }

    /// Current cosmetic pose.
    #[must_use]
    pub const fn pose(&self) -> VisualPose {
        self.pose
    }
}

/// Decorative structure raised beside the path; never collides.
#[derive(Clone, Debug, PartialEq)]
pub struct Landmark {
    kind: LandmarkKind,
    position: Vec3,
    pub(crate) profile: AnimationProfile,
    pub(crate) pose: VisualPose,
}

impl Landmark {
    pub(crate) fn new(kind: LandmarkKind, position: Vec3) -> Self {
        let profile = match kind {
            LandmarkKind::Obelisk => AnimationProfile {
                pulse_speed: 1.5,
                ..AnimationProfile::STILL
            },
            LandmarkKind::CrystalCluster => AnimationProfile {
                spin_speed: 0.2,
                bob_speed: 0.5,
                bob_height: 0.5,
                pulse_speed: 0.0,
            },
            LandmarkKind::Archway => AnimationProfile::STILL,
            LandmarkKind::Beacon => AnimationProfile {
                spin_speed: 0.5,
                bob_speed: 0.7,
                bob_height: 0.3,
                pulse_speed: 2.0,
            },
        };
        Self {
            kind,
            position,
            profile,
            pose: VisualPose::default(),
        }
    }

    /// Shape of the landmark.
    #[must_use]
    pub const fn kind(&self) -> LandmarkKind {
        self.kind
    }

    /// Ground anchor of the landmark.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Current cosmetic pose.
    #[must_use]
    pub const fn pose(&self) -> VisualPose {
        self.pose
    }
}
