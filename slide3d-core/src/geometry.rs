/// Collision geometry primitives: planes and ellipsoid-space triangles
use nalgebra::{Point3, Vector3};

/// Normals shorter than this are treated as coming from a zero-area face.
const DEGENERATE_NORMAL: f32 = 1e-12;

/// An oriented plane `normal · p = value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub value: f32,
}

impl Plane {
    /// Build the plane with the given unit `normal` passing through `point`.
    pub fn from_normal_and_point(normal: Vector3<f32>, point: &Point3<f32>) -> Self {
        Self {
            normal,
            value: normal.dot(&point.coords),
        }
    }

    /// Positive on the side the normal points to.
    pub fn signed_distance(&self, point: &Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.value
    }

    /// Orthogonal projection of `point` onto the plane.
    pub fn project(&self, point: &Point3<f32>) -> Point3<f32> {
        point - self.normal * self.signed_distance(point)
    }
}

/// An immutable collision triangle.
///
/// Vertices must already be in the coordinate space used at query time
/// (ellipsoid space, see [`Triangle::in_ellipsoid_space`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub points: [Point3<f32>; 3],
    pub center: Point3<f32>,
    pub plane: Plane,
    bounding_radius_squared: f32,
}

impl Triangle {
    /// Returns `None` for zero-area triangles, which have no plane.
    pub fn new(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Option<Self> {
        let normal = (p1 - p0).cross(&(p2 - p0)).try_normalize(DEGENERATE_NORMAL)?;
        let center = Point3::from((p0.coords + p1.coords + p2.coords) / 3.0);
        let bounding_radius_squared = [p0, p1, p2]
            .iter()
            .map(|p| (p - center).norm_squared())
            .fold(0.0, f32::max);

        Some(Self {
            points: [p0, p1, p2],
            center,
            plane: Plane::from_normal_and_point(normal, &p0),
            bounding_radius_squared,
        })
    }

    /// Build from world-space vertices, dividing each component by the
    /// collider's semi-axis lengths.
    pub fn in_ellipsoid_space(points: [Point3<f32>; 3], radius: &Vector3<f32>) -> Option<Self> {
        let [p0, p1, p2] = points.map(|p| Point3::from(p.coords.component_div(radius)));
        Self::new(p0, p1, p2)
    }

    /// Largest squared distance from the centroid to a vertex.
    pub fn bounding_radius_squared(&self) -> f32 {
        self.bounding_radius_squared
    }

    /// Whether `point`, assumed to lie on the triangle's plane, is inside the
    /// triangle or on its border.
    pub fn contains(&self, point: &Point3<f32>) -> bool {
        let n = self.plane.normal;
        let [a, b, c] = self.points;
        [(a, b), (b, c), (c, a)]
            .iter()
            .all(|(from, to)| (to - from).cross(&(point - from)).dot(&n) >= -1e-6)
    }
}
