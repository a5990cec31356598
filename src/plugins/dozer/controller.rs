//! Drive controller.
//!
//! Pipeline:
//! - Update: sample the keyboard into `DriveIntent` (skipped when there is no keyboard)
//! - FixedUpdate: resolve the intent into throttle/turn and write the dozer's velocities
//!
//! Turning sets angular velocity directly instead of applying torque so rotation
//! never oscillates. Drive force is applied as the velocity change it causes over
//! one step, `dv = F * dt / m`, with `m` taken from the assembled layout.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use avian2d::prelude::*;
use bevy::prelude::*;

use super::Dozer;
use crate::common::tunables::{DriveTuning, Tunables};
use crate::plugins::economy::Economy;

/// What the player (or a bot) wants this step.
///
/// Keyboard values are already in [-1, 1]. `stick`, when present, is a world
/// space direction whose length is the push strength.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct DriveIntent {
    pub throttle: f32,
    pub turn: f32,
    pub stick: Option<Vec2>,
}

/// Final throttle/turn for one step. `turn > 0` steers right (clockwise).
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct DriveCommand {
    pub throttle: f32,
    pub turn: f32,
}

/// Joystick reverse-mode hysteresis.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickSteering {
    pub reversing: bool,
}

/// Normalise into (-PI, PI].
pub fn wrap_angle(a: f32) -> f32 {
    let r = (a + PI).rem_euclid(TAU) - PI;
    if r <= -PI { r + TAU } else { r }
}

/// World direction the plow faces for a body angle.
#[inline]
pub fn forward(angle: f32) -> Vec2 {
    Vec2::from_angle(angle + FRAC_PI_2)
}

#[inline]
pub fn right(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

impl JoystickSteering {
    pub fn resolve(&mut self, intent: &DriveIntent, body_angle: f32, t: &DriveTuning) -> DriveCommand {
        let keyboard = DriveCommand {
            throttle: intent.throttle.clamp(-1.0, 1.0),
            turn: intent.turn.clamp(-1.0, 1.0),
        };

        let Some(stick) = intent.stick else {
            self.reversing = false;
            return keyboard;
        };
        let magnitude = stick.length().min(1.0);
        if magnitude <= t.stick_deadzone {
            return keyboard;
        }

        let target = stick.to_angle();
        let heading = body_angle + FRAC_PI_2;
        let delta = wrap_angle(target - heading);

        if !self.reversing && delta.abs() > t.reverse_threshold {
            self.reversing = true;
        } else if self.reversing && delta.abs() < t.forward_threshold {
            self.reversing = false;
        }

        // Positive delta means the target is counter-clockwise, i.e. to the left.
        let steer = |d: f32| (-d * t.steer_gain).clamp(-1.0, 1.0);
        if self.reversing {
            // Point the rear at the stick.
            DriveCommand {
                throttle: -magnitude,
                turn: steer(wrap_angle(target + PI - heading)),
            }
        } else {
            DriveCommand {
                throttle: magnitude,
                turn: steer(delta),
            }
        }
    }
}

/// Drive force for the given levels: exponential in engine level, scaled by
/// how far the engine is ahead of (or behind) the plow it has to push.
pub fn engine_force(dozer_level: u32, plow_level: u32, t: &DriveTuning) -> f32 {
    let gap = (dozer_level as i32 - plow_level as i32).clamp(-t.load_factor_range, t.load_factor_range);
    let load = (1.0 + gap as f32 * t.load_factor_step).max(0.0);
    t.base_force * t.force_growth.powi(dozer_level as i32) * load
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub linear: Vec2,
    pub angular: f32,
}

/// One controller step on a body at `angle`.
pub fn drive_step(
    motion: Motion,
    angle: f32,
    cmd: DriveCommand,
    force: f32,
    mass: f32,
    dt: f32,
    t: &DriveTuning,
) -> Motion {
    let angular = if cmd.turn != 0.0 {
        -cmd.turn * t.turn_speed
    } else {
        motion.angular * t.spin_damping
    };

    let side = right(angle);
    let mut linear = motion.linear - side * motion.linear.dot(side) * t.lateral_damping;

    if cmd.throttle != 0.0 && mass > 0.0 {
        linear += forward(angle) * (cmd.throttle * force / mass * dt);
    }

    Motion { linear, angular }
}

pub(super) fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut intent: ResMut<DriveIntent>) {
    let Some(keys) = keys else {
        return;
    };

    let axis = |pos: [KeyCode; 2], neg: [KeyCode; 2]| {
        let mut v = 0.0;
        if keys.any_pressed(pos) {
            v += 1.0;
        }
        if keys.any_pressed(neg) {
            v -= 1.0;
        }
        v
    };

    intent.throttle = axis([KeyCode::KeyW, KeyCode::ArrowUp], [KeyCode::KeyS, KeyCode::ArrowDown]);
    intent.turn = axis([KeyCode::KeyD, KeyCode::ArrowRight], [KeyCode::KeyA, KeyCode::ArrowLeft]);
}

pub(super) fn drive_dozer(
    time: Res<Time>,
    tunables: Res<Tunables>,
    economy: Res<Economy>,
    intent: Res<DriveIntent>,
    mut steering: ResMut<JoystickSteering>,
    mut q_dozer: Query<(&Dozer, &Rotation, &mut LinearVelocity, &mut AngularVelocity)>,
) {
    let Ok((dozer, rot, mut lin, mut ang)) = q_dozer.single_mut() else {
        return;
    };

    let t = &tunables.drive;
    let angle = rot.as_radians();
    let cmd = steering.resolve(&intent, angle, t);
    let force = engine_force(economy.levels.dozer, economy.levels.plow, t);

    let next = drive_step(
        Motion { linear: lin.0, angular: ang.0 },
        angle,
        cmd,
        force,
        dozer.mass,
        time.delta_secs(),
        t,
    );
    lin.0 = next.linear;
    ang.0 = next.angular;
}
