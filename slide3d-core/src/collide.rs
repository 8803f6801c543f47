/// Per-tick frame orchestration: horizontal pass, ground probe, gravity pass
use nalgebra::{Point3, Vector3};

use crate::config::CollisionConfig;
use crate::geometry::Triangle;
use crate::slide::collide_with_world;
use crate::world::World;

/// `|normal · gravity|` below which a plane cannot be reached along gravity.
const GRAZING_EPSILON: f32 = 1e-6;

/// World-space outcome of one [`Slider::collide_and_slide`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideResult {
    pub position: Point3<f32>,
    /// The gravity displacement, with its vertical component cleared when
    /// the mover was pushed into a ceiling.
    pub gravity: Vector3<f32>,
    pub grounded: bool,
}

/// Collision state carried by one mover between ticks.
///
/// Holds the last usable gravity direction so a tick with a zero or NaN
/// gravity vector still probes for ground the way the previous tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    gravity_direction: Vector3<f32>,
}

impl Slider {
    pub fn new() -> Self {
        Self {
            gravity_direction: -Vector3::y(),
        }
    }

    /// Normalized, in ellipsoid space.
    pub fn gravity_direction(&self) -> Vector3<f32> {
        self.gravity_direction
    }

    /// Move a collider of the World's radius from `position` by `velocity`,
    /// then by `gravity`, sliding along the World's triangles. All arguments
    /// and results are in world space.
    pub fn collide_and_slide(
        &mut self,
        world: &World,
        position: Point3<f32>,
        velocity: Vector3<f32>,
        gravity: Vector3<f32>,
    ) -> SlideResult {
        let radius = world.radius();
        let config = world.config();

        let mut position = Point3::from(position.coords.component_div(&radius));
        let velocity = velocity.component_div(&radius);
        if is_movement(&velocity) {
            let candidates = world.close_triangles(&position, &velocity);
            position = collide_with_world(position, velocity, &candidates, config);
        }

        let mut gravity = gravity;
        let mut velocity = gravity.component_div(&radius);
        if !velocity.iter().any(|c| c.is_nan()) {
            if let Some(direction) = velocity.try_normalize(0.0) {
                self.gravity_direction = direction;
            }
        }

        let mut grounded = false;
        let candidates = world.close_triangles(&position, &velocity);
        for triangle in &candidates {
            if !self.touches(triangle, &position, config) {
                continue;
            }
            if self.gravity_direction.y > 0.0 {
                velocity.y = 0.0;
                gravity.y = 0.0;
            } else {
                grounded = true;
            }
        }

        if is_movement(&velocity) {
            position = collide_with_world(position, velocity, &candidates, config);
        }

        SlideResult {
            position: Point3::from(position.coords.component_mul(&radius)),
            gravity,
            grounded,
        }
    }

    /// Whether the mover rests against `triangle` along the gravity direction.
    fn touches(&self, triangle: &Triangle, position: &Point3<f32>, config: &CollisionConfig) -> bool {
        let down = self.gravity_direction;
        if (triangle.center - position).dot(&down) <= 0.0 {
            return false;
        }

        let plane = &triangle.plane;
        let along = plane.normal.dot(&down);
        if along.abs() < GRAZING_EPSILON {
            return false;
        }
        let t = -plane.signed_distance(position) / along;
        if t < 0.0 {
            return false;
        }

        let projected = position + down * t;
        (projected - position).norm() <= config.ground_contact_distance && triangle.contains(&projected)
    }
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

fn is_movement(velocity: &Vector3<f32>) -> bool {
    let length_squared = velocity.norm_squared();
    length_squared.is_finite() && length_squared > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use approx::assert_relative_eq;
    use nalgebra::Matrix4;

    fn floor_world(radius: Vector3<f32>) -> World {
        World::from_mesh(&Mesh::floor(20.0, 0.0), &Matrix4::identity(), radius).unwrap()
    }

    #[test]
    fn test_empty_world_moves_freely() {
        let world = World::new(Vector3::new(0.5, 1.0, 0.5)).unwrap();
        let mut slider = Slider::new();
        let result = slider.collide_and_slide(
            &world,
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(0.5, 0.0, -0.5),
            Vector3::new(0.0, -0.25, 0.0),
        );
        assert_relative_eq!(result.position, Point3::new(1.5, 1.75, 2.5), epsilon = 1e-5);
        assert_eq!(result.gravity, Vector3::new(0.0, -0.25, 0.0));
        assert!(!result.grounded);
    }

    #[test]
    fn test_resting_on_floor_is_grounded() {
        let radius = Vector3::new(0.4, 1.0, 0.4);
        let world = floor_world(radius);
        let mut slider = Slider::new();
        let result = slider.collide_and_slide(
            &world,
            Point3::new(0.0, 1.02, 0.0),
            Vector3::zeros(),
            Vector3::new(0.0, -0.1, 0.0),
        );
        assert!(result.grounded);
        assert_relative_eq!(result.position.y, 1.005, epsilon = 1e-4);
    }

    #[test]
    fn test_nan_gravity_keeps_last_direction() {
        let radius = Vector3::new(0.4, 1.0, 0.4);
        let world = floor_world(radius);
        let mut slider = Slider::new();
        let start = Point3::new(0.0, 1.05, 0.0);

        let result = slider.collide_and_slide(
            &world,
            start,
            Vector3::new(f32::NAN, 0.0, 0.0),
            Vector3::new(0.0, f32::NAN, 0.0),
        );
        assert_eq!(slider.gravity_direction(), -Vector3::y());
        assert!(result.grounded);
        assert_eq!(result.position, start);
    }

    #[test]
    fn test_zero_gravity_keeps_last_direction() {
        let radius = Vector3::repeat(1.0);
        let world = World::new(radius).unwrap();
        let mut slider = Slider::new();
        slider.collide_and_slide(&world, Point3::origin(), Vector3::zeros(), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(slider.gravity_direction(), Vector3::x());
        slider.collide_and_slide(&world, Point3::origin(), Vector3::zeros(), Vector3::zeros());
        assert_eq!(slider.gravity_direction(), Vector3::x());
    }

    #[test]
    fn test_ellipsoid_scaling_round_trips() {
        let radius = Vector3::new(0.25, 2.0, 0.5);
        let world = floor_world(radius);
        let mut slider = Slider::new();
        let result = slider.collide_and_slide(
            &world,
            Point3::new(1.0, 6.0, -1.0),
            Vector3::new(0.5, 0.0, 0.5),
            Vector3::new(0.0, -10.0, 0.0),
        );
        // Lands with the ellipsoid's lower tip just above the floor.
        assert_relative_eq!(result.position, Point3::new(1.5, 2.0 * 1.005, -0.5), epsilon = 1e-4);
    }

    #[test]
    fn test_horizontal_move_blocked_by_wall() {
        let radius = Vector3::new(0.5, 1.0, 0.5);
        let mut mesh = Mesh::floor(20.0, 0.0);
        // Wall in the plane x = 2.
        mesh.add_quad(
            Point3::new(2.0, 0.0, -20.0),
            Vector3::new(0.0, 0.0, 40.0),
            Vector3::new(0.0, 5.0, 0.0),
        );
        let world = World::from_mesh(&mesh, &Matrix4::identity(), radius).unwrap();
        let mut slider = Slider::new();
        let result = slider.collide_and_slide(
            &world,
            Point3::new(0.0, 1.005, 0.0),
            Vector3::new(3.0, 0.0, 1.0),
            Vector3::new(0.0, -0.01, 0.0),
        );
        assert!(result.position.x < 2.0 - 0.5 + 1e-3);
        assert_relative_eq!(result.position.z, 1.0, epsilon = 1e-2);
        assert!(result.grounded);
    }
}
