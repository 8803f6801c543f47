/// The World handle: static level geometry baked into ellipsoid space
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CollisionConfig;
use crate::error::WorldError;
use crate::geometry::Triangle;
use crate::mesh::Mesh;

/// Static collision geometry for one collider shape.
///
/// Triangles are stored divided by the collider radius the World was baked
/// for, so queries can treat the collider as a unit sphere. The handle is
/// only ever repopulated wholesale; queries borrow it immutably.
#[derive(Debug, Clone)]
pub struct World {
    triangles: Vec<Triangle>,
    radius: Vector3<f32>,
    config: CollisionConfig,
}

impl World {
    /// An empty world for a collider with the given semi-axis lengths.
    pub fn new(radius: Vector3<f32>) -> Result<Self, WorldError> {
        Self::with_config(radius, CollisionConfig::default())
    }

    pub fn with_config(radius: Vector3<f32>, config: CollisionConfig) -> Result<Self, WorldError> {
        if !radius.iter().all(|r| r.is_finite() && *r > 0.0) {
            return Err(WorldError::InvalidRadius {
                x: radius.x,
                y: radius.y,
                z: radius.z,
            });
        }
        config.validate()?;
        Ok(Self {
            triangles: Vec::new(),
            radius,
            config,
        })
    }

    /// Bake `mesh`, placed by `transform`, for a collider of `radius`.
    pub fn from_mesh(
        mesh: &Mesh,
        transform: &Matrix4<f32>,
        radius: Vector3<f32>,
    ) -> Result<Self, WorldError> {
        let mut world = Self::new(radius)?;
        world.rebuild(mesh, transform);
        Ok(world)
    }

    /// Replace every triangle. Zero-area faces are dropped.
    pub fn rebuild(&mut self, mesh: &Mesh, transform: &Matrix4<f32>) {
        let radius = self.radius;
        self.triangles = mesh
            .faces
            .iter()
            .filter_map(|face| {
                let placed = face.map(|p| transform.transform_point(&p));
                Triangle::in_ellipsoid_space(placed, &radius)
            })
            .collect();

        let dropped = mesh.faces.len() - self.triangles.len();
        debug!(
            "world rebuilt: {} triangles, {} degenerate faces dropped",
            self.triangles.len(),
            dropped
        );
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn radius(&self) -> Vector3<f32> {
        self.radius
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Broad phase: every triangle that could be touched by a sweep from
    /// `position` along `velocity`, both in ellipsoid space.
    ///
    /// The squared bounding radius and squared speed are each floored at
    /// [`CollisionConfig::smallest_distance_approximation`]. A triangle is
    /// rejected when its squared centroid distance exceeds the squared reach
    /// `(bounding radius + 1 + speed)²`, the 1 being the unit collider, so no
    /// triangle the sweep can touch is ever dropped.
    pub fn close_triangles(&self, position: &Point3<f32>, velocity: &Vector3<f32>) -> Vec<&Triangle> {
        let floor = self.config.smallest_distance_approximation;
        // NaN speed falls back to the floor.
        let speed = velocity.norm_squared().max(floor).sqrt();

        self.triangles
            .iter()
            .filter(|triangle| {
                let distance_squared = (position - triangle.center).norm_squared();
                let reach = triangle.bounding_radius_squared().max(floor).sqrt() + 1.0 + speed;
                distance_squared <= reach * reach
            })
            .collect()
    }
}
