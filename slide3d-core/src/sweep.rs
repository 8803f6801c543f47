/// Narrow phase: swept unit sphere against a set of triangles
///
/// Every input is in ellipsoid space. The sweep covers `position + t·velocity`
/// for `t ∈ [0, 1]` and reports the earliest contact across all candidates:
/// the triangle face first, and its three vertices and three edges when the
/// sphere reaches the plane outside the triangle or is already embedded in it.
use nalgebra::{Point3, Vector3};

use crate::geometry::Triangle;

/// Below this `|normal · velocity|` the sweep runs parallel to a plane.
const PARALLEL_EPSILON: f32 = 1e-6;
/// Below this leading coefficient a quadratic is solved as linear.
const ROOT_EPSILON: f32 = 1e-12;

/// Earliest contact found by [`scene_intersection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Point on the triangle the sphere touches first.
    pub point: Point3<f32>,
    /// Sweep parameter of the contact, in `[0, 1]`.
    pub time: f32,
    /// `time · |velocity|`.
    pub distance: f32,
}

/// Smallest root of `a·t² + b·t + c = 0` within `[0, max]`.
///
/// Both vertex and edge tests use this, so the tie-breaking is fixed here:
/// roots are sorted ascending and the first one inside the range wins. A
/// vanishing `a` degrades to the linear equation.
pub fn lowest_root(a: f32, b: f32, c: f32, max: f32) -> Option<f32> {
    let in_range = |root: &f32| (0.0..=max).contains(root);

    if a.abs() < ROOT_EPSILON {
        if b.abs() < ROOT_EPSILON {
            return None;
        }
        return Some(-c / b).filter(in_range);
    }

    let determinant = b * b - 4.0 * a * c;
    if !(determinant >= 0.0) {
        return None;
    }
    let sqrt = determinant.sqrt();
    let r1 = (-b - sqrt) / (2.0 * a);
    let r2 = (-b + sqrt) / (2.0 * a);
    let (low, high) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
    [low, high].into_iter().find(in_range)
}

/// Nearest contact of a unit sphere swept from `position` along `velocity`
/// with any of `candidates`. `None` means the move is unobstructed, i.e. an
/// infinite intersection distance.
pub fn scene_intersection(
    position: &Point3<f32>,
    velocity: &Vector3<f32>,
    candidates: &[&Triangle],
) -> Option<SweepHit> {
    let mut best: Option<(f32, Point3<f32>)> = None;
    for triangle in candidates {
        let bound = best.map_or(1.0, |(time, _)| time);
        if let Some(hit) = sweep_triangle(position, velocity, triangle, bound) {
            best = Some(hit);
        }
    }

    best.map(|(time, point)| SweepHit {
        point,
        time,
        distance: time * velocity.norm(),
    })
}

/// Earliest contact with one triangle no later than `bound`.
fn sweep_triangle(
    position: &Point3<f32>,
    velocity: &Vector3<f32>,
    triangle: &Triangle,
    bound: f32,
) -> Option<(f32, Point3<f32>)> {
    let plane = &triangle.plane;
    let distance = plane.signed_distance(position);
    let normal_velocity = plane.normal.dot(velocity);

    if normal_velocity.abs() < PARALLEL_EPSILON {
        if distance.abs() > 1.0 {
            return None;
        }
        // Embedded in the plane's slab for the whole sweep: the face test is
        // meaningless, fall through to vertices and edges.
    } else {
        let enter = (1.0 - distance) / normal_velocity;
        let leave = (-1.0 - distance) / normal_velocity;
        let (t0, t1) = if enter <= leave { (enter, leave) } else { (leave, enter) };
        if t0 > 1.0 || t1 < 0.0 {
            return None;
        }

        let t0 = t0.clamp(0.0, 1.0);
        let contact = plane.project(&(position + velocity * t0));
        if triangle.contains(&contact) {
            // Nothing on the border can be touched before the face itself.
            return (t0 <= bound).then_some((t0, contact));
        }
    }

    let mut best: Option<(f32, Point3<f32>)> = None;
    let mut bound = bound;
    let speed_squared = velocity.norm_squared();

    for vertex in &triangle.points {
        let to_position = position - vertex;
        let a = speed_squared;
        let b = 2.0 * velocity.dot(&to_position);
        let c = to_position.norm_squared() - 1.0;
        if let Some(t) = lowest_root(a, b, c, bound) {
            bound = t;
            best = Some((t, *vertex));
        }
    }

    let [p0, p1, p2] = &triangle.points;
    for (start, end) in [(p0, p1), (p1, p2), (p2, p0)] {
        let edge = end - start;
        let to_start = start - position;
        let edge_squared = edge.norm_squared();
        let edge_dot_velocity = edge.dot(velocity);
        let edge_dot_start = edge.dot(&to_start);

        let a = edge_squared * -speed_squared + edge_dot_velocity * edge_dot_velocity;
        let b = edge_squared * (2.0 * velocity.dot(&to_start))
            - 2.0 * edge_dot_velocity * edge_dot_start;
        let c = edge_squared * (1.0 - to_start.norm_squared()) + edge_dot_start * edge_dot_start;

        if let Some(t) = lowest_root(a, b, c, bound) {
            let along = (edge_dot_velocity * t - edge_dot_start) / edge_squared;
            if (0.0..=1.0).contains(&along) {
                bound = t;
                best = Some((t, start + edge * along));
            }
        }
    }

    best
}
