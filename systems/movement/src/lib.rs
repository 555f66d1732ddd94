#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! First-person player controller for Parkour Runner.
//!
//! The controller owns the player's body and movement state machine. It reads
//! the world through `parkour_world::query`, never mutates it, and reports
//! gameplay milestones by appending [`Event`] values to the caller's sink.

mod camera;
mod collision;
mod stamina;

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use log::{debug, info, warn};
use parkour_core::{Aabb, DeathCause, Event, PlatformId, PlayerProbe};
use parkour_world::{query, World};
use serde::{Deserialize, Serialize};

pub use camera::{camera_pose, CameraPose, CameraRig};

use collision::{Body, Support, WallContact};
use stamina::Stamina;

/// Yaw that faces the player toward positive Z, the direction the path starts
/// in.
pub const NORTH_YAW: f32 = PI;

/// Tunable constants of the movement model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Target ground speed while walking.
    pub move_speed: f32,
    /// Target ground speed while sprinting.
    pub sprint_speed: f32,
    /// Vertical speed of a ground jump.
    pub jump_impulse: f32,
    /// Downward acceleration while airborne.
    pub gravity: f32,
    /// Gravity multiplier applied while ascending.
    pub rise_scale: f32,
    /// Gravity multiplier applied while descending.
    pub fall_scale: f32,
    /// Fraction of the ground acceleration available in the air.
    pub air_control: f32,
    /// Deceleration rate on the ground without input.
    pub friction: f32,
    /// Rate at which the horizontal velocity approaches its target.
    pub acceleration: f32,
    /// Downward acceleration while wall-running.
    pub wall_run_gravity: f32,
    /// Longest continuous wall-run in seconds.
    pub max_wall_run_time: f32,
    /// Vertical speed of a wall jump.
    pub wall_jump_impulse: f32,
    /// Speed added along the wall normal by a wall jump.
    pub wall_jump_push: f32,
    /// Largest gap between the player and a wall face that allows a run.
    pub wall_run_tolerance: f32,
    /// Horizontal speed limit.
    pub max_horizontal_speed: f32,
    /// Vertical speed limit in either direction.
    pub max_vertical_speed: f32,
    /// Fraction of a moving platform's horizontal velocity passed to a
    /// player standing on it.
    pub carry_fraction: f32,
    /// Feet height below which the player dies.
    pub void_threshold: f32,
    /// Optional infinite floor; `None` lets the player fall into the void.
    pub world_floor: Option<f32>,
    /// Fallback respawn position when the last platform no longer exists.
    pub respawn_point: Vec3,
    /// Radians of rotation per unit of look input.
    pub mouse_sensitivity: f32,
    /// Largest absolute pitch.
    pub pitch_limit: f32,
    /// Stamina regained per second while resting.
    pub stamina_regen: f32,
    /// Stamina spent per second of sprinting.
    pub sprint_drain: f32,
    /// Stamina spent per second of wall-running.
    pub wall_run_drain: f32,
    /// Stamina spent by a ground jump.
    pub jump_cost: f32,
    /// Stamina spent by a wall jump.
    pub wall_jump_cost: f32,
    /// Half of the collider's horizontal extent.
    pub half_width: f32,
    /// Height of the collider above the feet.
    pub height: f32,
    /// Height of the eyes above the feet.
    pub eye_height: f32,
    /// Responsiveness of the follow camera.
    pub camera_sharpness: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            sprint_speed: 8.0,
            jump_impulse: 10.0,
            gravity: 30.0,
            rise_scale: 0.8,
            fall_scale: 1.3,
            air_control: 0.5,
            friction: 10.0,
            acceleration: 20.0,
            wall_run_gravity: 10.0,
            max_wall_run_time: 1.5,
            wall_jump_impulse: 6.0,
            wall_jump_push: 5.0,
            wall_run_tolerance: 0.6,
            max_horizontal_speed: 20.0,
            max_vertical_speed: 30.0,
            carry_fraction: 0.8,
            void_threshold: -10.0,
            world_floor: None,
            respawn_point: Vec3::new(0.0, 4.0, 0.0),
            mouse_sensitivity: 0.002,
            pitch_limit: FRAC_PI_2 * 0.95,
            stamina_regen: 0.25,
            sprint_drain: 0.2,
            wall_run_drain: 0.3,
            jump_cost: 0.1,
            wall_jump_cost: 0.25,
            half_width: 0.3,
            height: 1.8,
            eye_height: 1.6,
            camera_sharpness: 15.0,
        }
    }
}

/// Movement keys recognised by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move toward the view direction.
    Forward,
    /// Move away from the view direction.
    Backward,
    /// Strafe left.
    Left,
    /// Strafe right.
    Right,
    /// Jump, or kick off a wall while wall-running.
    Jump,
    /// Run faster while stamina lasts.
    Sprint,
}

/// Raw input delivered to the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A key changed state.
    Key {
        /// Key that changed.
        key: Key,
        /// Indicates whether the key is now held.
        pressed: bool,
    },
    /// Relative pointer motion.
    Look {
        /// Horizontal motion; positive turns right.
        dx: f32,
        /// Vertical motion; positive looks down.
        dy: f32,
    },
}

/// State of the movement state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementState {
    /// Standing on a platform or the world floor.
    Grounded,
    /// Falling or rising freely.
    Airborne,
    /// Sliding along a wall with reduced gravity.
    WallRunning,
    /// Dead until respawned.
    Dead,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct HeldKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    jump: bool,
    sprint: bool,
}

impl HeldKeys {
    fn slot(&mut self, key: Key) -> &mut bool {
        match key {
            Key::Forward => &mut self.forward,
            Key::Backward => &mut self.backward,
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Jump => &mut self.jump,
            Key::Sprint => &mut self.sprint,
        }
    }
}

/// Player body, input state and movement state machine.
#[derive(Clone, Debug)]
pub struct PlayerController {
    tuning: MovementTuning,
    position: Vec3,
    velocity: Vec3,
    yaw: f32,
    pitch: f32,
    state: MovementState,
    stamina: Stamina,
    held: HeldKeys,
    jump_requested: bool,
    pending: Vec<InputEvent>,
    last_platform: Option<PlatformId>,
    wall: Option<WallContact>,
    wall_run_time: f32,
    wall_run_locked: bool,
    sprinting: bool,
    deaths: u32,
}

impl PlayerController {
    /// Creates an airborne player at `spawn` facing north.
    #[must_use]
    pub fn new(spawn: Vec3, tuning: MovementTuning) -> Self {
        Self {
            tuning,
            position: spawn,
            velocity: Vec3::ZERO,
            yaw: NORTH_YAW,
            pitch: 0.0,
            state: MovementState::Airborne,
            stamina: Stamina::full(),
            held: HeldKeys::default(),
            jump_requested: false,
            pending: Vec::new(),
            last_platform: None,
            wall: None,
            wall_run_time: 0.0,
            wall_run_locked: false,
            sprinting: false,
            deaths: 0,
        }
    }

    /// Restores the freshly created state at `spawn`, keeping the tuning.
    pub fn reset(&mut self, spawn: Vec3) {
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::new(spawn, tuning);
    }

    /// Queues raw input; it is consumed at the start of the next update.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Advances the player by `dt` seconds against the current world.
    pub fn update(&mut self, dt: f32, world: &World, out_events: &mut Vec<Event>) {
        self.consume_input();
        if self.state == MovementState::Dead {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let body = self.body();

        let wish = self.wish_direction();
        let moving = wish != Vec3::ZERO;

        self.update_stamina(dt, moving);
        self.steer(dt, wish);
        self.try_jump(out_events);
        self.apply_gravity(dt);
        self.clamp_velocity();

        let previous = self.position;
        self.carry(dt, world);
        self.position.x += self.velocity.x * dt;
        self.position.z += self.velocity.z * dt;

        let sweep = body.collider(previous).union(&body.collider(self.position));
        let walls = query::walls_near(world, &sweep.expanded(self.tuning.wall_run_tolerance));
        collision::resolve_walls(body, &mut self.position, &mut self.velocity, &walls);

        self.position.y += self.velocity.y * dt;
        self.settle(body, previous.y, world, out_events);

        self.update_wall_run(dt, body, &walls, out_events);

        if self.position.y < self.tuning.void_threshold {
            self.die(DeathCause::Void, out_events);
        }
    }

    /// Places the player back on the last platform it stood on, or at the
    /// respawn point when that platform is gone.
    pub fn respawn(&mut self, world: &World, out_events: &mut Vec<Event>) {
        let position = match self.last_platform {
            Some(id) => match query::platform(world, id) {
                Some(platform) => {
                    let center = platform.bounds().center();
                    Vec3::new(center.x, platform.top() + 1.0, center.z)
                }
                None => {
                    debug!("platform {} no longer exists, using respawn point", id.get());
                    self.tuning.respawn_point
                }
            },
            None => self.tuning.respawn_point,
        };

        self.position = position;
        self.velocity = Vec3::ZERO;
        self.state = MovementState::Grounded;
        self.end_wall_run(false);
        self.wall_run_locked = false;
        self.jump_requested = false;
        info!("player respawned at {position}");
        out_events.push(Event::PlayerRespawned { position });
    }

    /// Applies hazard damage. Any hit is fatal.
    pub fn take_damage(&mut self, amount: f32, out_events: &mut Vec<Event>) {
        debug!("player took {amount} damage");
        self.die(DeathCause::Hazard, out_events);
    }

    /// Replaces the velocity with a jump pad launch.
    pub fn apply_launch(&mut self, velocity: Vec3) {
        if self.state == MovementState::Dead || !velocity.is_finite() {
            return;
        }
        self.velocity = velocity;
        self.end_wall_run(false);
        self.state = MovementState::Airborne;
    }

    /// Adds a hazard push to the velocity; an upward push leaves the ground.
    pub fn apply_knockback(&mut self, impulse: Vec3) {
        if self.state == MovementState::Dead || !impulse.is_finite() {
            return;
        }
        self.velocity += impulse;
        if impulse.y > 0.0 {
            self.end_wall_run(false);
            self.state = MovementState::Airborne;
        }
    }

    /// Snapshot handed to the world's collision checks.
    #[must_use]
    pub fn probe(&self) -> PlayerProbe {
        PlayerProbe {
            position: self.position,
            velocity: self.velocity,
            grounded: self.state == MovementState::Grounded,
            collider: self.collider(),
        }
    }

    /// Collision volume at the current position.
    #[must_use]
    pub fn collider(&self) -> Aabb {
        self.body().collider(self.position)
    }

    /// Feet position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleports the player without touching its velocity.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Overrides the velocity.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Rotation around the vertical axis.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Overrides the view yaw.
    pub fn set_yaw(&mut self, yaw: f32) {
        if yaw.is_finite() {
            self.yaw = yaw;
        }
    }

    /// Rotation around the lateral axis.
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Current state of the movement state machine.
    #[must_use]
    pub const fn state(&self) -> MovementState {
        self.state
    }

    /// Reports whether the player stands on a surface.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.state == MovementState::Grounded
    }

    /// Reports whether the player is waiting for a respawn.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.state == MovementState::Dead
    }

    /// Reports whether the last update spent stamina on sprinting.
    #[must_use]
    pub const fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    /// Stamina in `[0, 1]`.
    #[must_use]
    pub const fn stamina(&self) -> f32 {
        self.stamina.level()
    }

    /// Seconds spent on the current wall-run.
    #[must_use]
    pub const fn wall_run_time(&self) -> f32 {
        self.wall_run_time
    }

    /// Number of deaths since creation or the last reset.
    #[must_use]
    pub const fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Handle of the last platform the player landed on.
    #[must_use]
    pub const fn last_platform(&self) -> Option<PlatformId> {
        self.last_platform
    }

    /// Movement constants in use.
    #[must_use]
    pub const fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    fn body(&self) -> Body {
        Body {
            half_width: self.tuning.half_width,
            height: self.tuning.height,
        }
    }

    fn consume_input(&mut self) {
        for event in std::mem::take(&mut self.pending) {
            match event {
                InputEvent::Key { key, pressed } => {
                    let slot = self.held.slot(key);
                    if key == Key::Jump && pressed && !*slot {
                        self.jump_requested = true;
                    }
                    *slot = pressed;
                }
                InputEvent::Look { dx, dy } => {
                    if !(dx.is_finite() && dy.is_finite()) {
                        continue;
                    }
                    let sensitivity = self.tuning.mouse_sensitivity;
                    let limit = self.tuning.pitch_limit;
                    self.yaw -= dx * sensitivity;
                    self.pitch = (self.pitch - dy * sensitivity).clamp(-limit, limit);
                }
            }
        }
    }

    fn wish_direction(&self) -> Vec3 {
        let (sin, cos) = self.yaw.sin_cos();
        let forward = Vec3::new(-sin, 0.0, -cos);
        let right = Vec3::new(cos, 0.0, -sin);

        let mut wish = Vec3::ZERO;
        if self.held.forward {
            wish += forward;
        }
        if self.held.backward {
            wish -= forward;
        }
        if self.held.right {
            wish += right;
        }
        if self.held.left {
            wish -= right;
        }
        wish.normalize_or_zero()
    }

    fn update_stamina(&mut self, dt: f32, moving: bool) {
        let sprint_cost = self.tuning.sprint_drain * dt;
        let footing = matches!(
            self.state,
            MovementState::Grounded | MovementState::WallRunning
        );
        self.sprinting =
            self.held.sprint && moving && footing && self.stamina.can_afford(sprint_cost);

        let wall_running = self.state == MovementState::WallRunning;
        if self.sprinting {
            self.stamina.drain(sprint_cost);
        }
        if wall_running {
            self.stamina.drain(self.tuning.wall_run_drain * dt);
        }
        if !self.sprinting && !wall_running {
            self.stamina.regenerate(self.tuning.stamina_regen * dt);
        }

        if wall_running && self.stamina.is_empty() {
            debug!("wall-run ended: out of stamina");
            self.end_wall_run(true);
        }
    }

    fn steer(&mut self, dt: f32, wish: Vec3) {
        let horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        let steered = if wish != Vec3::ZERO {
            let speed = if self.sprinting {
                self.tuning.sprint_speed
            } else {
                self.tuning.move_speed
            };
            let rate = match self.state {
                MovementState::Airborne => self.tuning.acceleration * self.tuning.air_control,
                _ => self.tuning.acceleration,
            };
            horizontal.lerp(wish * speed, (rate * dt).clamp(0.0, 1.0))
        } else if self.state == MovementState::Grounded {
            horizontal.lerp(Vec3::ZERO, (self.tuning.friction * dt).clamp(0.0, 1.0))
        } else {
            horizontal
        };
        self.velocity.x = steered.x;
        self.velocity.z = steered.z;
    }

    fn try_jump(&mut self, out_events: &mut Vec<Event>) {
        if !std::mem::take(&mut self.jump_requested) {
            return;
        }
        match self.state {
            MovementState::Grounded => {
                if self.stamina.spend(self.tuning.jump_cost) {
                    self.velocity.y = self.tuning.jump_impulse;
                    self.state = MovementState::Airborne;
                    out_events.push(Event::Jumped { from_wall: false });
                }
            }
            MovementState::WallRunning => {
                let Some(contact) = self.wall else {
                    return;
                };
                if self.stamina.spend(self.tuning.wall_jump_cost) {
                    self.velocity.y = self.tuning.wall_jump_impulse;
                    self.velocity += contact.normal * self.tuning.wall_jump_push;
                    self.end_wall_run(false);
                    out_events.push(Event::Jumped { from_wall: true });
                }
            }
            MovementState::Airborne | MovementState::Dead => {}
        }
    }

    fn apply_gravity(&mut self, dt: f32) {
        match self.state {
            MovementState::Grounded | MovementState::Dead => {}
            MovementState::WallRunning => self.velocity.y -= self.tuning.wall_run_gravity * dt,
            MovementState::Airborne => {
                let scale = if self.velocity.y > 0.0 {
                    self.tuning.rise_scale
                } else {
                    self.tuning.fall_scale
                };
                self.velocity.y -= self.tuning.gravity * scale * dt;
            }
        }
    }

    fn clamp_velocity(&mut self) {
        if !self.velocity.is_finite() {
            warn!("discarding non-finite player velocity {}", self.velocity);
            self.velocity = Vec3::ZERO;
        }
        let horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z)
            .clamp_length_max(self.tuning.max_horizontal_speed);
        let limit = self.tuning.max_vertical_speed;
        self.velocity = Vec3::new(
            horizontal.x,
            self.velocity.y.clamp(-limit, limit),
            horizontal.z,
        );
    }

    fn carry(&mut self, dt: f32, world: &World) {
        if self.state != MovementState::Grounded {
            return;
        }
        let Some(platform) = self.last_platform.and_then(|id| query::platform(world, id)) else {
            return;
        };
        if platform.is_moving() {
            let drift = platform.velocity() * self.tuning.carry_fraction * dt;
            self.position.x += drift.x;
            self.position.z += drift.z;
        }
    }

    fn settle(
        &mut self,
        body: Body,
        previous_feet: f32,
        world: &World,
        out_events: &mut Vec<Event>,
    ) {
        let reach = collision::LANDING_TOLERANCE;
        let region = body
            .collider(self.position)
            .union(&body.collider(Vec3::new(
                self.position.x,
                previous_feet,
                self.position.z,
            )))
            .expanded(reach);
        let platforms = query::platforms_near(world, &region);

        match collision::resolve_platforms(
            body,
            previous_feet,
            self.position,
            self.velocity.y,
            &platforms,
        ) {
            Support::Landed { platform, top } => {
                self.position.y = top;
                self.land();
                if self.last_platform != Some(platform) {
                    self.last_platform = Some(platform);
                    out_events.push(Event::PlatformReached { platform });
                }
                return;
            }
            Support::Bumped { ceiling } => {
                self.position.y = ceiling - body.height - collision::SKIN;
                self.velocity.y = 0.0;
            }
            Support::Free => {}
        }

        match self.tuning.world_floor {
            Some(floor) if self.velocity.y <= 0.0 && self.position.y <= floor => {
                self.position.y = floor;
                self.land();
            }
            _ => {
                if self.state == MovementState::Grounded {
                    self.state = MovementState::Airborne;
                }
            }
        }
    }

    fn land(&mut self) {
        self.velocity.y = 0.0;
        self.state = MovementState::Grounded;
        self.end_wall_run(false);
        self.wall_run_locked = false;
    }

    fn update_wall_run(
        &mut self,
        dt: f32,
        body: Body,
        walls: &[&parkour_world::Wall],
        out_events: &mut Vec<Event>,
    ) {
        let contact = collision::wall_contact(
            body,
            self.position,
            self.tuning.wall_run_tolerance,
            walls,
        );

        match self.state {
            MovementState::Airborne => {
                let eligible = self.velocity.y < 0.0
                    && !self.wall_run_locked
                    && !self.stamina.is_empty();
                if let (true, Some(contact)) = (eligible, contact) {
                    self.state = MovementState::WallRunning;
                    self.wall = Some(contact);
                    self.wall_run_time = 0.0;
                    self.velocity.y = (self.velocity.y * 0.5).max(0.0);
                    debug!("wall-run started on wall {}", contact.wall.get());
                    out_events.push(Event::WallRunStarted { wall: contact.wall });
                }
            }
            MovementState::WallRunning => {
                if contact.is_none() {
                    self.end_wall_run(false);
                    return;
                }
                self.wall = contact;
                self.wall_run_time += dt;
                if self.wall_run_time >= self.tuning.max_wall_run_time {
                    debug!("wall-run ended: time limit");
                    self.end_wall_run(true);
                }
            }
            MovementState::Grounded | MovementState::Dead => {}
        }
    }

    fn end_wall_run(&mut self, lock: bool) {
        if self.state == MovementState::WallRunning {
            self.state = MovementState::Airborne;
        }
        self.wall = None;
        self.wall_run_time = 0.0;
        if lock {
            self.wall_run_locked = true;
        }
    }

    fn die(&mut self, cause: DeathCause, out_events: &mut Vec<Event>) {
        if self.state == MovementState::Dead {
            return;
        }
        self.state = MovementState::Dead;
        self.end_wall_run(false);
        self.deaths = self.deaths.saturating_add(1);
        info!("player died ({cause:?}) at {}", self.position);
        out_events.push(Event::PlayerDied { cause });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_faces_north() {
        let mut player = PlayerController::new(Vec3::ZERO, MovementTuning::default());
        player.held.forward = true;
        let wish = player.wish_direction();
        assert!(wish.abs_diff_eq(Vec3::Z, 1e-5), "{wish}");
    }

    #[test]
    fn jump_is_edge_triggered() {
        let mut player = PlayerController::new(Vec3::ZERO, MovementTuning::default());
        player.handle_input(InputEvent::Key {
            key: Key::Jump,
            pressed: true,
        });
        player.consume_input();
        assert!(player.jump_requested);

        player.jump_requested = false;
        player.handle_input(InputEvent::Key {
            key: Key::Jump,
            pressed: true,
        });
        player.consume_input();
        assert!(!player.jump_requested);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut player = PlayerController::new(Vec3::ZERO, MovementTuning::default());
        player.handle_input(InputEvent::Look {
            dx: 0.0,
            dy: -10_000.0,
        });
        player.consume_input();
        assert!((player.pitch() - FRAC_PI_2 * 0.95).abs() < 1e-6);
    }

    #[test]
    fn wall_runs_start_only_while_falling() {
        let mut world = World::new();
        let bounds =
            Aabb::from_center_size(Vec3::new(800.0, 0.0, 800.0), Vec3::new(0.5, 40.0, 8.0));
        let _ = world.insert_wall(bounds);
        let walls = query::walls_near(&world, &bounds.expanded(2.0));
        let mut player =
            PlayerController::new(Vec3::new(799.25, 5.0, 800.0), MovementTuning::default());
        let body = player.body();
        let mut events = Vec::new();

        player.update_wall_run(0.1, body, &walls, &mut events);
        assert_eq!(player.velocity().y, 0.0);
        assert_eq!(player.state(), MovementState::Airborne);
        assert!(events.is_empty());

        player.set_velocity(Vec3::new(0.0, -1.0, 4.0));
        player.update_wall_run(0.1, body, &walls, &mut events);
        assert_eq!(player.state(), MovementState::WallRunning);
        assert!(matches!(events.as_slice(), [Event::WallRunStarted { .. }]));
    }

    #[test]
    fn knockback_lifts_a_grounded_player() {
        let mut player = PlayerController::new(Vec3::ZERO, MovementTuning::default());
        player.state = MovementState::Grounded;
        player.set_velocity(Vec3::new(1.0, 0.0, 0.0));

        player.apply_knockback(Vec3::new(0.0, 8.0, 6.0));
        assert_eq!(player.velocity(), Vec3::new(1.0, 8.0, 6.0));
        assert_eq!(player.state(), MovementState::Airborne);

        let mut events = Vec::new();
        player.take_damage(1.0, &mut events);
        player.apply_knockback(Vec3::Y * 5.0);
        assert_eq!(player.velocity(), Vec3::new(1.0, 8.0, 6.0));
        assert!(player.is_dead());
    }

    #[test]
    fn reset_keeps_tuning_but_clears_progress() {
        let tuning = MovementTuning {
            move_speed: 7.0,
            ..MovementTuning::default()
        };
        let mut player = PlayerController::new(Vec3::ZERO, tuning);
        let mut events = Vec::new();
        player.take_damage(1.0, &mut events);
        player.stamina.drain(0.5);

        player.reset(Vec3::Y);

        assert_eq!(player.tuning().move_speed, 7.0);
        assert_eq!(player.deaths(), 0);
        assert_eq!(player.stamina(), 1.0);
        assert_eq!(player.state(), MovementState::Airborne);
        assert_eq!(events, vec![Event::PlayerDied { cause: DeathCause::Hazard }]);
    }
}
