/// Slide resolver: turns a blocked sweep into motion along the contact
use log::trace;
use nalgebra::{Point3, Vector3};

use crate::config::CollisionConfig;
use crate::geometry::{Plane, Triangle};
use crate::sweep::scene_intersection;

/// Outcome of [`resolve`], with the number of sweeps it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Resolution {
    pub position: Point3<f32>,
    pub sweeps: u32,
}

/// Move a unit sphere from `position` by `velocity` through `candidates`,
/// sliding along whatever it hits. Everything is in ellipsoid space.
///
/// After `config.max_slide_depth` slides the current position is returned
/// as is, accepting a little lost motion in sharp concave corners.
pub fn collide_with_world(
    position: Point3<f32>,
    velocity: Vector3<f32>,
    candidates: &[&Triangle],
    config: &CollisionConfig,
) -> Point3<f32> {
    resolve(position, velocity, candidates, config).position
}

pub(crate) fn resolve(
    mut position: Point3<f32>,
    mut velocity: Vector3<f32>,
    candidates: &[&Triangle],
    config: &CollisionConfig,
) -> Resolution {
    let epsilon = config.accuracy_epsilon;

    for depth in 0..=config.max_slide_depth {
        let sweeps = depth + 1;
        let Some(hit) = scene_intersection(&position, &velocity, candidates) else {
            return Resolution {
                position: position + velocity,
                sweeps,
            };
        };
        let Some(direction) = velocity.try_normalize(0.0) else {
            return Resolution { position, sweeps };
        };

        let destination = position + velocity;
        // Stop `epsilon` short of the contact; when already closer than that
        // this backs the mover off instead.
        position += direction * (hit.distance - epsilon);
        let contact = hit.point - direction * epsilon;

        let Some(plane) = sliding_plane(&position, &contact) else {
            return Resolution { position, sweeps };
        };
        velocity = slide_velocity(&plane, &destination, &contact);
        if velocity.norm_squared() < epsilon * epsilon {
            return Resolution { position, sweeps };
        }
    }

    trace!("slide depth cap reached at {position:?}");
    Resolution {
        position,
        sweeps: config.max_slide_depth + 1,
    }
}

/// Plane through `contact` facing the mover.
pub(crate) fn sliding_plane(position: &Point3<f32>, contact: &Point3<f32>) -> Option<Plane> {
    let normal = (position - contact).try_normalize(f32::EPSILON)?;
    Some(Plane::from_normal_and_point(normal, contact))
}

/// Remaining displacement once `destination` is flattened onto `plane`.
pub(crate) fn slide_velocity(
    plane: &Plane,
    destination: &Point3<f32>,
    contact: &Point3<f32>,
) -> Vector3<f32> {
    plane.project(destination) - contact
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad(corner: Point3<f32>, u: Vector3<f32>, v: Vector3<f32>) -> [Triangle; 2] {
        [
            Triangle::new(corner, corner + u, corner + u + v).unwrap(),
            Triangle::new(corner, corner + u + v, corner + v).unwrap(),
        ]
    }

    fn floor(height: f32) -> [Triangle; 2] {
        quad(
            Point3::new(-50.0, height, -50.0),
            Vector3::new(0.0, 0.0, 100.0),
            Vector3::new(100.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_free_move_is_unchanged() {
        let config = CollisionConfig::default();
        let start = Point3::new(1.0, 2.0, 3.0);
        let velocity = Vector3::new(0.5, -0.25, 4.0);
        assert_eq!(collide_with_world(start, velocity, &[], &config), start + velocity);

        let far = floor(-100.0);
        let candidates: Vec<&Triangle> = far.iter().collect();
        assert_eq!(
            collide_with_world(start, velocity, &candidates, &config),
            start + velocity
        );
    }

    #[test]
    fn test_fall_stops_above_floor() {
        let config = CollisionConfig::default();
        let floor = floor(0.0);
        let candidates: Vec<&Triangle> = floor.iter().collect();
        let end = collide_with_world(
            Point3::new(0.3, 5.0, 0.3),
            Vector3::new(0.0, -10.0, 0.0),
            &candidates,
            &config,
        );
        assert_relative_eq!(end, Point3::new(0.3, 1.0 + config.accuracy_epsilon, 0.3), epsilon = 1e-4);
    }

    #[test]
    fn test_diagonal_fall_slides_along_floor() {
        let config = CollisionConfig::default();
        let floor = floor(0.0);
        let candidates: Vec<&Triangle> = floor.iter().collect();
        let end = collide_with_world(
            Point3::new(0.0, 2.0, 0.0),
            Vector3::new(3.0, -3.0, 0.0),
            &candidates,
            &config,
        );
        // The gap is kept along the 45° approach, so it shrinks by √2 vertically.
        let gap = config.accuracy_epsilon / 2f32.sqrt();
        assert_relative_eq!(end.y, 1.0 + gap, epsilon = 1e-4);
        assert_relative_eq!(end.x, 3.0, epsilon = 1e-2);
    }

    #[test]
    fn test_slide_velocity_is_tangent() {
        let position = Point3::new(0.2, 1.3, -0.4);
        let contact = Point3::new(0.0, 0.5, 0.1);
        let plane = sliding_plane(&position, &contact).unwrap();
        let velocity = slide_velocity(&plane, &Point3::new(4.0, -2.0, 1.5), &contact);
        assert_relative_eq!(velocity.dot(&plane.normal), 0.0, epsilon = 1e-5);
        assert_relative_eq!(plane.signed_distance(&position), (position - contact).norm(), epsilon = 1e-6);
    }

    #[test]
    fn test_sliding_plane_needs_separation() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(sliding_plane(&p, &p).is_none());
    }

    #[test]
    fn test_narrow_gap_terminates() {
        let config = CollisionConfig::default();
        // Floor and ceiling 0.01 further apart than the sphere's diameter.
        let floor = floor(0.0);
        let ceiling = floor_at_flipped(2.01);
        let candidates: Vec<&Triangle> = floor.iter().chain(ceiling.iter()).collect();

        let resolution = resolve(
            Point3::new(0.0, 1.005, 0.0),
            Vector3::new(5.0, -3.0, 2.0),
            &candidates,
            &config,
        );
        let end = resolution.position;
        assert!(resolution.sweeps <= config.max_slide_depth + 1);
        assert!(end.coords.iter().all(|c| c.is_finite()));
        assert!(end.y > 1.0 - config.accuracy_epsilon && end.y < 1.01 + config.accuracy_epsilon);
    }

    #[test]
    fn test_wedge_corner_terminates() {
        let config = CollisionConfig::default();
        let floor = floor(0.0);
        // A roof meeting the floor along x = 0 at a shallow angle, opening towards +X.
        let roof = quad(
            Point3::new(0.0, 0.0, -50.0),
            Vector3::new(0.0, 0.0, 100.0),
            Vector3::new(50.0, 5.0, 0.0),
        );
        let candidates: Vec<&Triangle> = floor.iter().chain(roof.iter()).collect();

        let resolution = resolve(
            Point3::new(30.0, 1.005, 0.0),
            Vector3::new(-20.0, 0.0, 0.3),
            &candidates,
            &config,
        );
        let end = resolution.position;
        assert!(resolution.sweeps <= config.max_slide_depth + 1);
        assert!(end.coords.iter().all(|c| c.is_finite()));
        // The sphere wedges where the gap narrows to its diameter, near x = 20.1.
        assert!(end.x > 19.5 && end.x < 21.0);
        assert!(end.y > 1.0 - config.accuracy_epsilon);
    }

    fn floor_at_flipped(height: f32) -> [Triangle; 2] {
        quad(
            Point3::new(-50.0, height, -50.0),
            Vector3::new(100.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 100.0),
        )
    }
}
