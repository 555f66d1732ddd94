//! Scripted input that keeps a headless run moving along the course.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use parkour_core::Heading;
use parkour_system_movement::{InputEvent, Key};
use parkour_system_session::Session;
use parkour_world::query;

/// Fastest the autopilot turns the view, in radians per second.
const TURN_RATE: f32 = 6.0;

/// Holds forward, optionally sprints, jumps on a fixed cadence and turns
/// toward the heading the course is currently advancing in.
#[derive(Debug)]
pub(crate) struct Autopilot {
    jump_every: Option<f32>,
    sprint: bool,
    engaged: bool,
    jump_held: bool,
    since_jump: f32,
}

impl Autopilot {
    pub(crate) fn new(jump_every: Option<f32>, sprint: bool) -> Self {
        Self {
            jump_every,
            sprint,
            engaged: false,
            jump_held: false,
            since_jump: 0.0,
        }
    }

    /// Inputs to feed the session before the next tick of length `dt`.
    pub(crate) fn drive(&mut self, session: &Session, dt: f32) -> Vec<InputEvent> {
        let mut inputs = Vec::new();

        if !self.engaged {
            self.engaged = true;
            inputs.push(press(Key::Forward));
            if self.sprint {
                inputs.push(press(Key::Sprint));
            }
        }

        if self.jump_held {
            self.jump_held = false;
            inputs.push(release(Key::Jump));
        }
        if let Some(every) = self.jump_every {
            self.since_jump += dt;
            if self.since_jump >= every {
                self.since_jump = 0.0;
                self.jump_held = true;
                inputs.push(press(Key::Jump));
            }
        }

        let player = session.player();
        let wanted = heading_yaw(query::heading(session.world()));
        let step = wrap_angle(wanted - player.yaw()).clamp(-TURN_RATE * dt, TURN_RATE * dt);
        let sensitivity = player.tuning().mouse_sensitivity;
        if step.abs() > 1e-6 && sensitivity > 0.0 {
            inputs.push(InputEvent::Look {
                dx: -step / sensitivity,
                dy: 0.0,
            });
        }

        inputs
    }
}

/// Yaw at which walking forward follows `heading`.
fn heading_yaw(heading: Heading) -> f32 {
    match heading {
        Heading::North => PI,
        Heading::East => -FRAC_PI_2,
        Heading::South => 0.0,
        Heading::West => FRAC_PI_2,
    }
}

/// Maps an angle into `[-PI, PI)`.
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

fn press(key: Key) -> InputEvent {
    InputEvent::Key { key, pressed: true }
}

fn release(key: Key) -> InputEvent {
    InputEvent::Key {
        key,
        pressed: false,
    }
}
