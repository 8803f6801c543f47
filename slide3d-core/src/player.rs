//! First-person mover driving the collision core once per tick.
//!
//! The core only resolves a single tick's displacement; this module owns the
//! time integration around it: accumulating gravity into a fall velocity,
//! scaling walk input by the tick length, and allowing a jump only while the
//! previous tick reported ground contact.

use nalgebra::{Point3, Vector3};

use crate::collide::{SlideResult, Slider};
use crate::world::World;

/// Default downward acceleration, in world units per second squared.
pub const DEFAULT_GRAVITY: f32 = 20.0;
pub const DEFAULT_WALK_SPEED: f32 = 4.0;
pub const DEFAULT_JUMP_SPEED: f32 = 7.0;

/// Movement intent for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerInput {
    /// Desired horizontal direction; scaled by the walk speed, not normalized.
    pub wish: Vector3<f32>,
    pub jump: bool,
}

/// A collider walking over a [`World`].
#[derive(Debug, Clone)]
pub struct PhysicsPlayer {
    pub position: Point3<f32>,
    pub gravity: Vector3<f32>,
    pub walk_speed: f32,
    pub jump_speed: f32,
    fall_velocity: Vector3<f32>,
    grounded: bool,
    slider: Slider,
}

impl PhysicsPlayer {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            gravity: Vector3::new(0.0, -DEFAULT_GRAVITY, 0.0),
            walk_speed: DEFAULT_WALK_SPEED,
            jump_speed: DEFAULT_JUMP_SPEED,
            fall_velocity: Vector3::zeros(),
            grounded: false,
            slider: Slider::new(),
        }
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn fall_velocity(&self) -> Vector3<f32> {
        self.fall_velocity
    }

    /// Advance by `dt` seconds. Returns `None` and leaves the player
    /// untouched when `dt` is not a positive finite duration.
    pub fn tick(&mut self, world: &World, input: PlayerInput, dt: f32) -> Option<SlideResult> {
        if !(dt.is_finite() && dt > 0.0) {
            return None;
        }

        self.fall_velocity += self.gravity * dt;
        if input.jump && self.grounded {
            let up = -self.gravity.try_normalize(0.0).unwrap_or_else(|| -Vector3::y());
            self.fall_velocity = up * self.jump_speed;
        }

        let velocity = input.wish * self.walk_speed * dt;
        let result =
            self.slider
                .collide_and_slide(world, self.position, velocity, self.fall_velocity * dt);

        self.position = result.position;
        self.grounded = result.grounded;
        self.fall_velocity = if result.gravity.iter().all(|c| c.is_finite()) {
            result.gravity / dt
        } else {
            Vector3::zeros()
        };
        if self.grounded && self.fall_velocity.dot(&self.gravity) > 0.0 {
            self.fall_velocity = Vector3::zeros();
        }

        Some(result)
    }
}
