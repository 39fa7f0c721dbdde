#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates per-frame player input into pose commands.

use std::time::Duration;

use glam::DVec2;
use raycast_maze_core::{
    Command, Pose, MOUSE_SENSITIVITY, MOVE_SPEED, RUN_MULTIPLIER, TURN_SPEED,
};

/// Longest frame delta applied to movement and key turning.
pub const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Snapshot of the controls relevant to locomotion for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocomotionInput {
    /// Walk along the facing vector.
    pub forward: bool,
    /// Walk against the facing vector.
    pub backward: bool,
    /// Side-step to the left.
    pub strafe_left: bool,
    /// Side-step to the right.
    pub strafe_right: bool,
    /// Multiply walking speed by the run factor.
    pub run: bool,
    /// Turn left at the configured turn speed.
    pub turn_left: bool,
    /// Turn right at the configured turn speed.
    pub turn_right: bool,
    /// Horizontal mouse motion accumulated since the previous frame, in pixels.
    pub mouse_delta_x: f64,
}

/// Tunables controlling how input maps onto motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionConfig {
    /// Walking speed in cells per second.
    pub move_speed: f64,
    /// Factor applied to the walking speed while running.
    pub run_multiplier: f64,
    /// Key turn speed in radians per second.
    pub turn_speed: f64,
    /// Yaw applied per pixel of horizontal mouse motion.
    pub mouse_sensitivity: f64,
    /// Upper bound applied to the frame delta before integrating motion.
    pub max_frame_delta: Duration,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            run_multiplier: RUN_MULTIPLIER,
            turn_speed: TURN_SPEED,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
        }
    }
}

/// Pure system that converts input snapshots into rotation and movement commands.
#[derive(Clone, Debug, Default)]
pub struct Locomotion {
    config: LocomotionConfig,
}

impl Locomotion {
    /// Creates a locomotion system using the provided tunables.
    #[must_use]
    pub const fn new(config: LocomotionConfig) -> Self {
        Self { config }
    }

    /// Tunables currently in effect.
    #[must_use]
    pub const fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Emits the commands for one frame.
    ///
    /// Rotation, if any, comes first; a `MovePlayer` is always emitted, even
    /// for a zero displacement, so the world re-resolves collisions and
    /// records the current cell every frame. The displacement uses the facing
    /// after this frame's rotation.
    pub fn handle(
        &self,
        dt: Duration,
        input: &LocomotionInput,
        pose: &Pose,
        out: &mut Vec<Command>,
    ) {
        let seconds = dt.min(self.config.max_frame_delta).as_secs_f64();

        let radians = self.yaw(seconds, input);
        let mut facing = *pose;
        if radians != 0.0 {
            facing.rotate(radians);
            out.push(Command::RotatePlayer { radians });
        }

        out.push(Command::MovePlayer {
            displacement: self.displacement(seconds, input, &facing),
        });
    }

    fn yaw(&self, seconds: f64, input: &LocomotionInput) -> f64 {
        let mut radians = if input.mouse_delta_x.is_finite() {
            input.mouse_delta_x * self.config.mouse_sensitivity
        } else {
            0.0
        };
        let turn = self.config.turn_speed * seconds;
        if input.turn_right {
            radians += turn;
        }
        if input.turn_left {
            radians -= turn;
        }
        radians
    }

    fn displacement(&self, seconds: f64, input: &LocomotionInput, pose: &Pose) -> DVec2 {
        let mut speed = self.config.move_speed * seconds;
        if input.run {
            speed *= self.config.run_multiplier;
        }

        let right = pose.right();
        let mut displacement = DVec2::ZERO;
        if input.forward {
            displacement += pose.direction * speed;
        }
        if input.backward {
            displacement -= pose.direction * speed;
        }
        if input.strafe_left {
            displacement -= right * speed;
        }
        if input.strafe_right {
            displacement += right * speed;
        }
        displacement
    }
}
