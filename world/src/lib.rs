#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Parkour Runner.
//!
//! The world lazily generates cells on a sparse integer grid as the player
//! advances, dresses them with coins and features, animates cosmetic state,
//! and retires geometry that falls far behind. Generated coordinates are
//! remembered for the lifetime of the world so nothing is ever generated
//! twice.

mod animation;
mod decoration;
mod entities;
mod generator;
mod spatial_hash;
mod tuning;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use glam::Vec3;
use log::{debug, info, trace};
use parkour_core::{
    Aabb, CoinId, Command, DifficultyLevel, Event, GridCoord, Heading, JumpPadId, LandmarkKind,
    ObstacleId, ObstacleKind, PlatformId, PlayerProbe, SectionType, WallId, WELCOME_BANNER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use animation::{AnimationProfile, VisualPose};
pub use entities::{
    Coin, FaceAxis, JumpPad, Landmark, Obstacle, Platform, PlatformMotion, SectionMarker, Wall,
    BONUS_COIN_VALUE, COIN_VALUE, DEFAULT_JUMP_BOOST, JUMP_PAD_RADIUS, SECTION_MARKER_LIFESPAN,
};
pub use generator::SectionGenerator;
pub use tuning::{GenerationTuning, WorldConfig};

use decoration::Feature;
use generator::CellPlan;
use spatial_hash::{EntityRef, SpatialIndex};

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 0x5eed_c0de_2a7b_91f3;

const WALL_CELL_FOOTPRINT: f32 = 0.8;
const DECOR_WALL_WIDTH: f32 = 0.5;
const DECOR_WALL_DEPTH: f32 = 0.7;
const JUMP_PAD_LIFT: f32 = 0.3;
const MOVING_PLATFORM_LIFT: f32 = 3.0;
const MOVING_PLATFORM_FOOTPRINT: f32 = 0.4;
const MOVING_PLATFORM_THICKNESS: f32 = 0.3;
const MOVING_PLATFORM_SPEEDUP: f32 = 1.2;
const MARKER_LIFT: f32 = 5.0;
const LANDMARK_AHEAD: i32 = 3;
const LANDMARK_ASIDE: i32 = 3;
const CRYSTAL_LIFT: f32 = 5.0;
const LAUNCH_SPEED: f32 = 8.0;
const LAUNCH_NUDGE: f32 = 4.0;
const KNOCKBACK_SPEED: f32 = 10.0;

/// Shape of the geometry owned by a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// The cell carries a walkable platform.
    Platform,
    /// The cell is filled by a solid wall.
    Wall,
}

/// Unit of world generation keyed by its grid coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    coord: GridCoord,
    anchor: Vec3,
    kind: CellKind,
    entities: Vec<EntityRef>,
}

impl Cell {
    fn new(coord: GridCoord, anchor: Vec3, kind: CellKind) -> Self {
        Self {
            coord,
            anchor,
            kind,
            entities: Vec::new(),
        }
    }

    /// Grid coordinate of the cell.
    #[must_use]
    pub const fn coord(&self) -> GridCoord {
        self.coord
    }

    /// World-space center of the cell's primary geometry.
    #[must_use]
    pub const fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Shape of the geometry owned by the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Platform generated for the cell, if any.
    #[must_use]
    pub fn platform(&self) -> Option<PlatformId> {
        self.entities.iter().find_map(|entity| match entity {
            EntityRef::Platform(id) => Some(*id),
            _ => None,
        })
    }

    fn has_jump_pad(&self) -> bool {
        self.entities
            .iter()
            .any(|entity| matches!(entity, EntityRef::JumpPad(_)))
    }
}

/// Coin removed from the world by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pickup {
    /// Identifier of the collected coin.
    pub coin: CoinId,
    /// Score value of the coin.
    pub value: u32,
}

/// Hazard touched by the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleHit {
    /// Identifier of the obstacle.
    pub obstacle: ObstacleId,
    /// Kind of hazard.
    pub kind: ObstacleKind,
    /// Damage dealt by the hazard.
    pub damage: f32,
}

/// Launch requested by a jump pad; the player applies it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpPadLaunch {
    /// Identifier of the pad that fired.
    pub pad: JumpPadId,
    /// Velocity the player should adopt.
    pub velocity: Vec3,
}

/// Represents the authoritative Parkour Runner world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    tuning: GenerationTuning,
    level: DifficultyLevel,
    seed: u64,
    rng: ChaCha8Rng,
    generator: SectionGenerator,
    cells: HashMap<GridCoord, Cell>,
    retired: HashSet<GridCoord>,
    platforms: BTreeMap<PlatformId, Platform>,
    moving: BTreeSet<PlatformId>,
    walls: BTreeMap<WallId, Wall>,
    obstacles: BTreeMap<ObstacleId, Obstacle>,
    jump_pads: BTreeMap<JumpPadId, JumpPad>,
    coins: BTreeMap<CoinId, Coin>,
    markers: Vec<SectionMarker>,
    landmarks: Vec<Landmark>,
    index: SpatialIndex,
    focus: GridCoord,
    last_sweep: Option<GridCoord>,
    elapsed: f32,
    next_id: u32,
}

impl World {
    /// Creates a world seeded with [`DEFAULT_SEED`] and its starting area
    /// already generated.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_SEED, WorldConfig::default())
    }

    /// Creates a world driven by the provided seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(seed, WorldConfig::default())
    }

    /// Creates a world with an explicit seed and streaming configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: WorldConfig) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            config,
            tuning: GenerationTuning::default(),
            level: DifficultyLevel::FIRST,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            generator: SectionGenerator::default(),
            cells: HashMap::new(),
            retired: HashSet::new(),
            platforms: BTreeMap::new(),
            moving: BTreeSet::new(),
            walls: BTreeMap::new(),
            obstacles: BTreeMap::new(),
            jump_pads: BTreeMap::new(),
            coins: BTreeMap::new(),
            markers: Vec::new(),
            landmarks: Vec::new(),
            index: SpatialIndex::default(),
            focus: GridCoord::ORIGIN,
            last_sweep: None,
            elapsed: 0.0,
            next_id: 0,
        };
        let mut events = Vec::new();
        world.generate_initial(&mut events);
        world
    }

    /// Discards all content, reseeds the generator, drops back to the first
    /// difficulty level and rebuilds the starting area.
    pub fn reset(&mut self, seed: u64, out_events: &mut Vec<Event>) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.level = DifficultyLevel::FIRST;
        self.tuning = GenerationTuning::default();
        self.elapsed = 0.0;
        self.generate_initial(out_events);
    }

    /// Rebuilds the starting area: the origin cell plus a three-wide corridor
    /// heading north. The starting area never carries hazards.
    pub fn generate_initial(&mut self, out_events: &mut Vec<Event>) {
        self.clear();
        self.generator.reset();
        self.focus = GridCoord::ORIGIN;

        let _ = self.generate_cell(GridCoord::ORIGIN, None, true, out_events);
        for z in 1..=5 {
            for x in [0, -1, 1] {
                let _ = self.generate_cell(GridCoord::new(x, z), None, true, out_events);
            }
        }
        info!(
            "generated starting area with {} cells (seed {:#x})",
            self.cells.len(),
            self.seed
        );
    }

    /// Advances the world clock and streams geometry around the player.
    pub fn update(&mut self, player_position: Vec3, dt: f32, out_events: &mut Vec<Event>) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        if player_position.is_finite() {
            self.focus = GridCoord::from_world(player_position, self.tuning.grid_spacing);
        }

        let plans = self
            .generator
            .plan(self.focus, &self.tuning, &self.config, &mut self.rng);
        let spine = self.realize(plans, out_events);
        if self
            .generator
            .record_spine(spine, self.tuning.section_length)
        {
            self.change_section(out_events);
        }

        for id in &self.moving {
            if let Some(platform) = self.platforms.get_mut(id) {
                platform.advance(self.elapsed);
            }
        }

        animation::animate(
            self.elapsed,
            dt,
            self.coins.values_mut(),
            self.jump_pads.values_mut(),
            self.obstacles.values_mut(),
            &mut self.markers,
            &mut self.landmarks,
        );

        self.retire_far_cells(out_events);
    }

    /// Replaces the generation tuning with the level's values, speeds up every
    /// moving platform and forces a section transition.
    pub fn adjust_difficulty(&mut self, level: DifficultyLevel, out_events: &mut Vec<Event>) {
        self.level = level;
        self.tuning = GenerationTuning::for_level(level);
        for id in &self.moving {
            if let Some(platform) = self.platforms.get_mut(id) {
                platform.accelerate(MOVING_PLATFORM_SPEEDUP);
            }
        }
        info!("difficulty adjusted to level {}", level.get());
        out_events.push(Event::DifficultyChanged { level });
        self.change_section(out_events);
    }

    /// Removes the first coin overlapping the player and reports its value.
    pub fn check_collectibles(&mut self, probe: &PlayerProbe) -> Option<Pickup> {
        let coin = self
            .index
            .query(&probe.collider)
            .into_iter()
            .filter_map(|entity| match entity {
                EntityRef::Coin(id) => self.coins.get(&id),
                _ => None,
            })
            .find(|coin| coin.bounds().intersects(&probe.collider))
            .map(|coin| (coin.id(), coin.value(), coin.bounds()))?;

        let (id, value, bounds) = coin;
        let _ = self.coins.remove(&id);
        self.index.remove(EntityRef::Coin(id), &bounds);
        debug!("coin {} collected for {value}", id.get());
        Some(Pickup { coin: id, value })
    }

    /// Reports the first hazard overlapping the player.
    #[must_use]
    pub fn check_obstacle_collision(&self, probe: &PlayerProbe) -> Option<ObstacleHit> {
        self.index
            .query(&probe.collider)
            .into_iter()
            .filter_map(|entity| match entity {
                EntityRef::Obstacle(id) => self.obstacles.get(&id),
                _ => None,
            })
            .find(|obstacle| obstacle.bounds().intersects(&probe.collider))
            .map(|obstacle| ObstacleHit {
                obstacle: obstacle.id(),
                kind: obstacle.kind(),
                damage: obstacle.kind().damage(),
            })
    }

    /// Rolls the push an energy barrier gives the player after a hit.
    ///
    /// Other hazards only kill, so they yield `None`.
    pub fn obstacle_knockback(&mut self, kind: ObstacleKind) -> Option<Vec3> {
        if kind != ObstacleKind::EnergyBarrier {
            return None;
        }
        let push = Vec3::new(
            self.rng.gen::<f32>() - 0.5,
            0.5,
            self.rng.gen::<f32>() - 0.5,
        );
        Some(push.normalize() * KNOCKBACK_SPEED)
    }

    /// Computes the launch of a jump pad under a grounded player.
    ///
    /// A moving player is flung along their horizontal direction; a
    /// stationary one receives a small random nudge.
    pub fn check_jump_pad_collision(&mut self, probe: &PlayerProbe) -> Option<JumpPadLaunch> {
        if !probe.grounded {
            return None;
        }
        let region = Aabb::from_center_size(
            probe.position,
            Vec3::new(JUMP_PAD_RADIUS * 2.0, 1.0, JUMP_PAD_RADIUS * 2.0),
        );
        let (pad, boost) = self
            .index
            .query(&region)
            .into_iter()
            .filter_map(|entity| match entity {
                EntityRef::JumpPad(id) => self.jump_pads.get(&id),
                _ => None,
            })
            .find(|pad| pad.covers(probe.position))
            .map(|pad| (pad.id(), pad.boost()))?;

        let horizontal = Vec3::new(probe.velocity.x, 0.0, probe.velocity.z);
        let horizontal = match horizontal.try_normalize() {
            Some(direction) => direction * LAUNCH_SPEED,
            None => Vec3::new(
                (self.rng.gen::<f32>() - 0.5) * LAUNCH_NUDGE,
                0.0,
                (self.rng.gen::<f32>() - 0.5) * LAUNCH_NUDGE,
            ),
        };
        debug!("jump pad {} fired", pad.get());
        Some(JumpPadLaunch {
            pad,
            velocity: Vec3::new(horizontal.x, boost, horizontal.z),
        })
    }

    /// Removes every entity and forgets all known cells.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.retired.clear();
        self.platforms.clear();
        self.moving.clear();
        self.walls.clear();
        self.obstacles.clear();
        self.jump_pads.clear();
        self.coins.clear();
        self.markers.clear();
        self.landmarks.clear();
        self.index.clear();
        self.last_sweep = None;
    }

    /// Places a static platform outside of any cell.
    pub fn insert_platform(&mut self, bounds: Aabb) -> PlatformId {
        let id = PlatformId::new(self.allocate_id());
        self.index.insert(EntityRef::Platform(id), &bounds);
        let _ = self.platforms.insert(id, Platform::fixed(id, None, bounds));
        id
    }

    /// Places an oscillating platform whose rest bounds are `bounds`.
    pub fn insert_moving_platform(&mut self, bounds: Aabb, motion: PlatformMotion) -> PlatformId {
        self.spawn_moving_platform(None, bounds, motion)
    }

    /// Places a wall outside of any cell.
    pub fn insert_wall(&mut self, bounds: Aabb) -> WallId {
        self.spawn_wall(None, bounds, FaceAxis::thinnest(&bounds))
    }

    /// Places a jump pad centered on `center`.
    pub fn insert_jump_pad(&mut self, center: Vec3, boost: f32) -> JumpPadId {
        self.spawn_jump_pad(None, center, boost)
    }

    /// Places a coin at `position` worth `value`.
    pub fn insert_coin(&mut self, position: Vec3, value: u32) -> CoinId {
        let profile = decoration::coin_profile(&mut self.rng);
        self.spawn_coin(None, position, value, profile)
    }

    /// Places a hazard occupying `bounds`.
    pub fn insert_obstacle(&mut self, kind: ObstacleKind, bounds: Aabb) -> ObstacleId {
        self.spawn_obstacle(
            None,
            decoration::ObstacleShape {
                kind,
                bounds,
                spikes: Vec::new(),
                profile: AnimationProfile::STILL,
                yaw: 0.0,
            },
        )
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_id = self.next_id.wrapping_add(1);
        self.next_id
    }

    fn is_known(&self, coord: GridCoord) -> bool {
        self.cells.contains_key(&coord) || self.retired.contains(&coord)
    }

    /// Reserves a coordinate for generation. Live cells are never built
    /// twice; a retired one is rebuilt when the window reaches it again.
    fn claim(&mut self, coord: GridCoord) -> bool {
        if self.cells.contains_key(&coord) {
            return false;
        }
        if self.retired.remove(&coord) {
            trace!("rebuilding retired cell {:?}", coord);
        }
        true
    }

    fn realize(&mut self, plans: Vec<CellPlan>, out_events: &mut Vec<Event>) -> u32 {
        let mut spine_generated = 0;
        for plan in plans {
            match plan {
                CellPlan::Platform {
                    cell,
                    height,
                    spine,
                } => {
                    if self.generate_cell(cell, height, false, out_events) && spine {
                        spine_generated += 1;
                    }
                }
                CellPlan::Wall { cell, base } => {
                    let _ = self.generate_wall_cell(cell, base, out_events);
                }
                CellPlan::JumpPad { cell } => self.place_jump_pad(cell),
            }
        }
        spine_generated
    }

    fn generate_cell(
        &mut self,
        coord: GridCoord,
        custom_height: Option<f32>,
        safe: bool,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if !self.claim(coord) {
            return false;
        }

        let distance = coord.distance_from_origin();
        let variation = self.tuning.height_variation;
        let height = custom_height.unwrap_or_else(|| {
            let mut height = self.config.base_height;
            if variation > 0.0 {
                height += (coord.x() as f32 * 0.5).sin() * (coord.z() as f32 * 0.5).cos() * variation;
                if distance > 5.0 {
                    height += variation.min(distance * 0.1);
                }
            }
            height
        });

        let spacing = self.tuning.grid_spacing;
        let anchor = coord.to_world(spacing, height);
        let (width, depth) = platform_footprint(
            self.generator.section(),
            self.generator.heading(),
            spacing,
        );
        let bounds = Aabb::from_center_size(
            anchor,
            Vec3::new(width, self.config.platform_thickness, depth),
        );

        let mut cell = Cell::new(coord, anchor, CellKind::Platform);
        let platform = PlatformId::new(self.allocate_id());
        self.index.insert(EntityRef::Platform(platform), &bounds);
        let _ = self
            .platforms
            .insert(platform, Platform::fixed(platform, Some(coord), bounds));
        cell.entities.push(EntityRef::Platform(platform));

        if let Some(pattern) =
            decoration::roll_coin_pattern(distance, self.generator.section(), &mut self.rng)
        {
            for (position, value) in
                decoration::coin_layout(pattern, anchor, self.generator.heading())
            {
                let profile = decoration::coin_profile(&mut self.rng);
                let coin = self.spawn_coin(Some(coord), position, value, profile);
                cell.entities.push(EntityRef::Coin(coin));
            }
        }

        match decoration::roll_feature(distance, &self.tuning, safe, &mut self.rng) {
            Some(Feature::Wall { height: wall_height }) => {
                let wall_bounds = Aabb::from_center_size(
                    anchor + Vec3::Y * (wall_height * 0.5),
                    Vec3::new(DECOR_WALL_WIDTH, wall_height, spacing * DECOR_WALL_DEPTH),
                );
                let faces = FaceAxis::thinnest(&wall_bounds);
                let wall = self.spawn_wall(Some(coord), wall_bounds, faces);
                cell.entities.push(EntityRef::Wall(wall));
            }
            Some(Feature::JumpPad) => {
                let pad = self.spawn_jump_pad(
                    Some(coord),
                    anchor + Vec3::Y * JUMP_PAD_LIFT,
                    DEFAULT_JUMP_BOOST,
                );
                cell.entities.push(EntityRef::JumpPad(pad));
            }
            Some(Feature::Obstacle) => {
                let shape = decoration::obstacle_shape(anchor, &mut self.rng);
                let obstacle = self.spawn_obstacle(Some(coord), shape);
                cell.entities.push(EntityRef::Obstacle(obstacle));
            }
            Some(Feature::MovingPlatform) => {
                let motion = decoration::platform_motion(&mut self.rng);
                let size = spacing * MOVING_PLATFORM_FOOTPRINT;
                let rest = Aabb::from_center_size(
                    anchor + Vec3::Y * MOVING_PLATFORM_LIFT,
                    Vec3::new(size, MOVING_PLATFORM_THICKNESS, size),
                );
                let platform = self.spawn_moving_platform(Some(coord), rest, motion);
                cell.entities.push(EntityRef::Platform(platform));
            }
            None => {}
        }

        trace!("generated cell {:?} at height {height:.2}", coord);
        let _ = self.cells.insert(coord, cell);
        out_events.push(Event::CellGenerated { cell: coord });
        true
    }

    fn generate_wall_cell(
        &mut self,
        coord: GridCoord,
        base: Option<f32>,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if !self.claim(coord) {
            return false;
        }

        let spacing = self.tuning.grid_spacing;
        let base = base.unwrap_or(self.config.base_height);
        let height = 6.0 + self.rng.gen::<f32>() * 2.0;
        let anchor = coord.to_world(spacing, base + height * 0.5);
        let footprint = spacing * WALL_CELL_FOOTPRINT;
        let bounds = Aabb::from_center_size(anchor, Vec3::new(footprint, height, footprint));

        let mut cell = Cell::new(coord, anchor, CellKind::Wall);
        let faces = FaceAxis::across(self.generator.heading());
        let wall = self.spawn_wall(Some(coord), bounds, faces);
        cell.entities.push(EntityRef::Wall(wall));
        let _ = self.cells.insert(coord, cell);
        out_events.push(Event::CellGenerated { cell: coord });
        true
    }

    fn place_jump_pad(&mut self, coord: GridCoord) {
        let Some(cell) = self.cells.get(&coord) else {
            return;
        };
        if cell.has_jump_pad() {
            return;
        }
        let Some(center) = cell
            .platform()
            .and_then(|id| self.platforms.get(&id))
            .map(|platform| platform.bounds().center())
        else {
            return;
        };

        let pad = self.spawn_jump_pad(
            Some(coord),
            center + Vec3::Y * JUMP_PAD_LIFT,
            DEFAULT_JUMP_BOOST,
        );
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.entities.push(EntityRef::JumpPad(pad));
        }
    }

    fn spawn_moving_platform(
        &mut self,
        cell: Option<GridCoord>,
        rest: Aabb,
        motion: PlatformMotion,
    ) -> PlatformId {
        let id = PlatformId::new(self.allocate_id());
        let platform = Platform::moving(id, cell, rest, motion, self.elapsed);
        let _ = self.platforms.insert(id, platform);
        let _ = self.moving.insert(id);
        id
    }

    fn spawn_wall(&mut self, cell: Option<GridCoord>, bounds: Aabb, faces: FaceAxis) -> WallId {
        let id = WallId::new(self.allocate_id());
        self.index.insert(EntityRef::Wall(id), &bounds);
        let _ = self.walls.insert(id, Wall::new(id, cell, bounds, faces));
        id
    }

    fn spawn_jump_pad(&mut self, cell: Option<GridCoord>, center: Vec3, boost: f32) -> JumpPadId {
        let id = JumpPadId::new(self.allocate_id());
        self.index.insert(EntityRef::JumpPad(id), &jump_pad_bounds(center));
        let _ = self.jump_pads.insert(id, JumpPad::new(id, cell, center, boost));
        id
    }

    fn spawn_coin(
        &mut self,
        cell: Option<GridCoord>,
        position: Vec3,
        value: u32,
        profile: AnimationProfile,
    ) -> CoinId {
        let id = CoinId::new(self.allocate_id());
        let coin = Coin::new(id, cell, position, value, profile);
        self.index.insert(EntityRef::Coin(id), &coin.bounds());
        let _ = self.coins.insert(id, coin);
        id
    }

    fn spawn_obstacle(
        &mut self,
        cell: Option<GridCoord>,
        shape: decoration::ObstacleShape,
    ) -> ObstacleId {
        let id = ObstacleId::new(self.allocate_id());
        self.index.insert(EntityRef::Obstacle(id), &shape.bounds);
        let obstacle = Obstacle::new(
            id,
            shape.kind,
            cell,
            shape.bounds,
            shape.spikes,
            shape.profile,
            shape.yaw,
        );
        let _ = self.obstacles.insert(id, obstacle);
        id
    }

    fn change_section(&mut self, out_events: &mut Vec<Event>) {
        let transition = self.generator.transition(&mut self.rng);
        info!(
            "section changed from {:?} to {:?} heading {:?}",
            transition.from, transition.to, transition.heading
        );
        out_events.push(Event::SectionChanged {
            from: transition.from,
            to: transition.to,
            heading: transition.heading,
        });

        self.place_section_marker(transition.to, transition.heading);
        if self.rng.gen_bool(0.5) {
            self.raise_landmark(transition.heading, out_events);
        }
    }

    fn place_section_marker(&mut self, section: SectionType, heading: Heading) {
        let coord = self.focus.ahead(heading, self.config.grid_radius - 1);
        let Some(platform) = self
            .cells
            .get(&coord)
            .and_then(Cell::platform)
            .and_then(|id| self.platforms.get(&id))
        else {
            return;
        };
        let center = platform.bounds().center();
        self.markers.push(SectionMarker::new(
            section,
            heading,
            center + Vec3::Y * MARKER_LIFT,
        ));
    }

    fn raise_landmark(&mut self, heading: Heading, out_events: &mut Vec<Event>) {
        let kind = LandmarkKind::ALL[self.rng.gen_range(0..LandmarkKind::ALL.len())];
        let coord = self
            .focus
            .ahead(heading, LANDMARK_AHEAD)
            .beside(heading, LANDMARK_ASIDE);
        let lift = match kind {
            LandmarkKind::CrystalCluster => CRYSTAL_LIFT,
            _ => 0.0,
        };
        let position = coord.to_world(self.tuning.grid_spacing, self.config.base_height + lift);
        self.landmarks.push(Landmark::new(kind, position));
        out_events.push(Event::LandmarkRaised { kind, position });
    }

    fn retire_far_cells(&mut self, out_events: &mut Vec<Event>) {
        let Some(radius) = self.config.retain_radius else {
            return;
        };
        if self.last_sweep == Some(self.focus) {
            return;
        }
        self.last_sweep = Some(self.focus);

        let focus = self.focus;
        let mut far: Vec<GridCoord> = self
            .cells
            .keys()
            .copied()
            .filter(|coord| coord.chebyshev_distance(focus) > radius)
            .collect();
        if far.is_empty() {
            return;
        }
        far.sort_unstable();

        for coord in &far {
            if let Some(cell) = self.cells.remove(coord) {
                self.release(&cell.entities);
                let _ = self.retired.insert(*coord);
            }
        }
        debug!("retired {} cells around {:?}", far.len(), focus);
        out_events.push(Event::CellsRetired { count: far.len() });
    }

    fn release(&mut self, entities: &[EntityRef]) {
        for entity in entities {
            match *entity {
                EntityRef::Platform(id) => {
                    let _ = self.moving.remove(&id);
                    if let Some(platform) = self.platforms.remove(&id) {
                        self.index.remove(*entity, &platform.bounds());
                    }
                }
                EntityRef::Wall(id) => {
                    if let Some(wall) = self.walls.remove(&id) {
                        self.index.remove(*entity, &wall.bounds());
                    }
                }
                EntityRef::Obstacle(id) => {
                    if let Some(obstacle) = self.obstacles.remove(&id) {
                        self.index.remove(*entity, &obstacle.bounds());
                    }
                }
                EntityRef::JumpPad(id) => {
                    if let Some(pad) = self.jump_pads.remove(&id) {
                        self.index.remove(*entity, &jump_pad_bounds(pad.center()));
                    }
                }
                EntityRef::Coin(id) => {
                    if let Some(coin) = self.coins.remove(&id) {
                        self.index.remove(*entity, &coin.bounds());
                    }
                }
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_footprint(section: SectionType, heading: Heading, spacing: f32) -> (f32, f32) {
    let (width, depth) = match section {
        SectionType::Narrow if heading.is_along_z() => (0.5, 0.9),
        SectionType::Narrow => (0.9, 0.5),
        SectionType::Open => (0.85, 0.85),
        SectionType::Climbing => (0.75, 0.75),
        SectionType::Descent => (0.9, 0.9),
        SectionType::Zigzag => (0.7, 0.7),
        SectionType::Stepped | SectionType::Islands | SectionType::Floating => (0.8, 0.8),
    };
    (width * spacing, depth * spacing)
}

fn jump_pad_bounds(center: Vec3) -> Aabb {
    Aabb::from_center_size(
        center,
        Vec3::new(JUMP_PAD_RADIUS * 2.0, 0.5, JUMP_PAD_RADIUS * 2.0),
    )
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ResetWorld { seed } => world.reset(seed, out_events),
        Command::GenerateInitial => world.generate_initial(out_events),
        Command::Advance {
            player_position,
            dt,
        } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.update(player_position, dt.as_secs_f32(), out_events);
        }
        Command::AdjustDifficulty { level } => world.adjust_difficulty(level, out_events),
        Command::ClearWorld => {
            world.clear();
            out_events.push(Event::WorldCleared);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec3;
    use parkour_core::{Aabb, DifficultyLevel, GridCoord, Heading, PlatformId, SectionType};

    use super::{
        Cell, Coin, EntityRef, GenerationTuning, JumpPad, Landmark, Obstacle, Platform,
        SectionMarker, Wall, World, WorldConfig,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Seed driving the generator.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Simulated seconds accumulated by the world clock.
    #[must_use]
    pub fn elapsed(world: &World) -> f32 {
        world.elapsed
    }

    /// Difficulty level whose tuning is active.
    #[must_use]
    pub fn difficulty(world: &World) -> DifficultyLevel {
        world.level
    }

    /// Active generation tuning.
    #[must_use]
    pub fn tuning(world: &World) -> &GenerationTuning {
        &world.tuning
    }

    /// Streaming configuration of the world.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Section pattern currently used for new cells.
    #[must_use]
    pub fn section(world: &World) -> SectionType {
        world.generator.section()
    }

    /// Direction the path currently advances in.
    #[must_use]
    pub fn heading(world: &World) -> Heading {
        world.generator.heading()
    }

    /// Cell the streaming window is centered on.
    #[must_use]
    pub fn focus(world: &World) -> GridCoord {
        world.focus
    }

    /// Live cell at the coordinate, if it has not been retired.
    #[must_use]
    pub fn cell(world: &World, coord: GridCoord) -> Option<&Cell> {
        world.cells.get(&coord)
    }

    /// Reports whether the coordinate was ever generated.
    #[must_use]
    pub fn is_known(world: &World, coord: GridCoord) -> bool {
        world.is_known(coord)
    }

    /// Number of coordinates generated so far, retired ones included.
    #[must_use]
    pub fn known_cell_count(world: &World) -> usize {
        world.cells.len() + world.retired.len()
    }

    /// Number of cells whose geometry is still alive.
    #[must_use]
    pub fn live_cell_count(world: &World) -> usize {
        world.cells.len()
    }

    /// Resolves a platform handle; `None` once the platform was retired.
    #[must_use]
    pub fn platform(world: &World, id: PlatformId) -> Option<&Platform> {
        world.platforms.get(&id)
    }

    /// Platform owned by the cell at the coordinate.
    #[must_use]
    pub fn platform_at(world: &World, coord: GridCoord) -> Option<&Platform> {
        world
            .cells
            .get(&coord)
            .and_then(Cell::platform)
            .and_then(|id| world.platforms.get(&id))
    }

    /// Platforms, moving ones included, whose bounds intersect the region,
    /// ordered by identifier.
    #[must_use]
    pub fn platforms_near<'w>(world: &'w World, region: &Aabb) -> Vec<&'w Platform> {
        let mut found: Vec<&Platform> = world
            .index
            .query(region)
            .into_iter()
            .filter_map(|entity| match entity {
                EntityRef::Platform(id) => world.platforms.get(&id),
                _ => None,
            })
            .chain(world.moving.iter().filter_map(|id| world.platforms.get(id)))
            .filter(|platform| platform.bounds().intersects(region))
            .collect();
        found.sort_by_key(|platform| platform.id());
        found.dedup_by_key(|platform| platform.id());
        found
    }

    /// Walls whose bounds intersect the region, ordered by identifier.
    #[must_use]
    pub fn walls_near<'w>(world: &'w World, region: &Aabb) -> Vec<&'w Wall> {
        world
            .index
            .query(region)
            .into_iter()
            .filter_map(|entity| match entity {
                EntityRef::Wall(id) => world.walls.get(&id),
                _ => None,
            })
            .filter(|wall| wall.bounds().intersects(region))
            .collect()
    }

    /// Obstacles whose bounds intersect the region, ordered by identifier.
    #[must_use]
    pub fn obstacles_near<'w>(world: &'w World, region: &Aabb) -> Vec<&'w Obstacle> {
        world
            .index
            .query(region)
            .into_iter()
            .filter_map(|entity| match entity {
                EntityRef::Obstacle(id) => world.obstacles.get(&id),
                _ => None,
            })
            .filter(|obstacle| obstacle.bounds().intersects(region))
            .collect()
    }

    /// Jump pads whose center lies within `radius` of `point` horizontally.
    #[must_use]
    pub fn jump_pads_near(world: &World, point: Vec3, radius: f32) -> Vec<&JumpPad> {
        let region = Aabb::from_center_size(point, Vec3::new(radius * 2.0, 1.0, radius * 2.0));
        world
            .index
            .query(&region)
            .into_iter()
            .filter_map(|entity| match entity {
                EntityRef::JumpPad(id) => world.jump_pads.get(&id),
                _ => None,
            })
            .filter(|pad| {
                let offset = pad.center() - point;
                Vec3::new(offset.x, 0.0, offset.z).length() <= radius
            })
            .collect()
    }

    /// Every live platform ordered by identifier.
    pub fn platforms(world: &World) -> impl Iterator<Item = &Platform> {
        world.platforms.values()
    }

    /// Every live wall ordered by identifier.
    pub fn walls(world: &World) -> impl Iterator<Item = &Wall> {
        world.walls.values()
    }

    /// Every live obstacle ordered by identifier.
    pub fn obstacles(world: &World) -> impl Iterator<Item = &Obstacle> {
        world.obstacles.values()
    }

    /// Every live jump pad ordered by identifier.
    pub fn jump_pads(world: &World) -> impl Iterator<Item = &JumpPad> {
        world.jump_pads.values()
    }

    /// Every uncollected coin ordered by identifier.
    pub fn coins(world: &World) -> impl Iterator<Item = &Coin> {
        world.coins.values()
    }

    /// Section markers that have not expired yet.
    #[must_use]
    pub fn section_markers(world: &World) -> &[SectionMarker] {
        &world.markers
    }

    /// Landmarks raised so far.
    #[must_use]
    pub fn landmarks(world: &World) -> &[Landmark] {
        &world.landmarks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_at(position: Vec3, grounded: bool) -> PlayerProbe {
        PlayerProbe {
            position,
            velocity: Vec3::ZERO,
            grounded,
            collider: Aabb::from_feet(position, 0.3, 1.8, 0.3),
        }
    }

    #[test]
    fn starting_area_is_generated_on_construction() {
        let world = World::with_seed(1);

        assert_eq!(query::live_cell_count(&world), 16);
        assert!(query::platform_at(&world, GridCoord::ORIGIN).is_some());
        assert!(query::obstacles(&world).next().is_none());
        assert!(query::walls(&world).next().is_none());
    }

    #[test]
    fn generating_known_cell_is_noop() {
        let mut world = World::with_seed(2);
        let mut events = Vec::new();
        let platforms = query::platforms(&world).count();

        assert!(!world.generate_cell(GridCoord::ORIGIN, Some(40.0), false, &mut events));
        assert!(!world.generate_wall_cell(GridCoord::new(1, 1), None, &mut events));
        assert!(events.is_empty());
        assert_eq!(query::platforms(&world).count(), platforms);
    }

    #[test]
    fn coin_is_collected_once() {
        let mut world = World::with_seed(3);
        let coin = world.insert_coin(Vec3::new(200.0, 1.0, 200.0), 10);
        let probe = probe_at(Vec3::new(200.0, 0.5, 200.0), true);

        assert_eq!(
            world.check_collectibles(&probe),
            Some(Pickup { coin, value: 10 })
        );
        assert_eq!(world.check_collectibles(&probe), None);
    }

    #[test]
    fn airborne_player_does_not_trigger_pads() {
        let mut world = World::with_seed(4);
        let _ = world.insert_jump_pad(Vec3::new(300.0, 0.3, 0.0), DEFAULT_JUMP_BOOST);

        assert!(world
            .check_jump_pad_collision(&probe_at(Vec3::new(300.0, 0.25, 0.0), false))
            .is_none());
        let launch = world
            .check_jump_pad_collision(&probe_at(Vec3::new(300.2, 0.25, 0.1), true))
            .expect("grounded player on pad should launch");
        assert_eq!(launch.velocity.y, DEFAULT_JUMP_BOOST);
    }

    #[test]
    fn returning_to_retired_ground_rebuilds_the_path() {
        let mut world = World::with_seed(3);
        let mut events = Vec::new();
        let mut z = 0.0;
        while z <= 420.0 {
            world.update(Vec3::new(0.0, 0.25, z), 0.1, &mut events);
            z += 3.0;
        }
        assert!(world.retired.contains(&GridCoord::ORIGIN));

        let home = Vec3::new(0.0, 0.25, 24.0);
        let focus = GridCoord::from_world(home, world.tuning.grid_spacing);
        let mut rng = world.rng.clone();
        let spine: Vec<GridCoord> = world
            .generator
            .plan(focus, &world.tuning, &world.config, &mut rng)
            .into_iter()
            .filter_map(|plan| match plan {
                CellPlan::Platform {
                    cell, spine: true, ..
                } => Some(cell),
                _ => None,
            })
            .collect();
        assert!(!spine.is_empty());
        assert!(spine.iter().any(|cell| world.retired.contains(cell)));

        world.update(home, 0.1, &mut events);
        for cell in spine {
            assert!(!world.retired.contains(&cell));
            assert!(
                query::platform_at(&world, cell).is_some(),
                "no footing at {cell:?}"
            );
        }
        for _ in 0..200 {
            world.update(home, 0.1, &mut events);
        }
        assert!(query::live_cell_count(&world) > 0);
    }

    #[test]
    fn path_walls_face_the_path() {
        let mut world = World::with_seed(6);
        let mut events = Vec::new();
        world.generator = SectionGenerator::fixed(Heading::East, SectionType::Narrow);
        world.update(Vec3::new(0.0, 0.25, 0.0), 0.1, &mut events);

        let path_walls: Vec<&Wall> = query::walls(&world)
            .filter(|wall| {
                wall.cell()
                    .and_then(|cell| query::cell(&world, cell))
                    .map_or(false, |cell| cell.kind() == CellKind::Wall)
            })
            .collect();
        assert!(!path_walls.is_empty());
        for wall in path_walls {
            let size = wall.bounds().size();
            assert_eq!(size.x, size.z);
            assert_eq!(wall.face_axis(), FaceAxis::Z);
        }

        let free = world.insert_wall(Aabb::from_center_size(
            Vec3::new(900.0, 3.0, 0.0),
            Vec3::new(6.0, 6.0, 0.5),
        ));
        assert_eq!(world.walls[&free].face_axis(), FaceAxis::Z);
    }

    #[test]
    fn only_energy_barriers_knock_back() {
        let mut world = World::with_seed(7);
        let mut twin = World::with_seed(7);

        assert_eq!(world.obstacle_knockback(ObstacleKind::SpinningBlade), None);
        assert_eq!(world.obstacle_knockback(ObstacleKind::SpikeTrap), None);
        let push = world
            .obstacle_knockback(ObstacleKind::EnergyBarrier)
            .expect("energy barriers push the player");
        assert!((push.length() - KNOCKBACK_SPEED).abs() < 1e-4);
        assert!(push.y > 0.0);
        assert!(push.y >= push.x.abs() && push.y >= push.z.abs());
        assert_eq!(
            twin.obstacle_knockback(ObstacleKind::EnergyBarrier),
            Some(push)
        );
    }

    #[test]
    fn clear_forgets_known_cells() {
        let mut world = World::with_seed(5);
        world.clear();

        assert_eq!(query::known_cell_count(&world), 0);
        assert!(query::platforms(&world).next().is_none());
    }
}
