/// World-space source geometry handed to the World builder
use nalgebra::{Matrix4, Point3, Vector3};

/// Three world-space corners of a mesh face.
pub type Face = [Point3<f32>; 3];

/// A triangle soup in world space, as produced by a loader or a builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self { faces: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            faces: Vec::with_capacity(capacity),
        }
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Two faces covering the rectangle spanned by `corner`, `corner + u`,
    /// `corner + v`.
    pub fn add_quad(&mut self, corner: Point3<f32>, u: Vector3<f32>, v: Vector3<f32>) {
        self.add_face([corner, corner + u, corner + u + v]);
        self.add_face([corner, corner + u + v, corner + v]);
    }

    pub fn extend(&mut self, other: Mesh) {
        self.faces.extend(other.faces);
    }

    /// Apply an affine transform to every vertex.
    pub fn transformed(&self, transform: &Matrix4<f32>) -> Self {
        Self {
            faces: self
                .faces
                .iter()
                .map(|face| face.map(|p| transform.transform_point(&p)))
                .collect(),
        }
    }

    /// Axis-aligned cube of edge length `size` centred on the origin.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(12);
        let x = Vector3::x() * size;
        let y = Vector3::y() * size;
        let z = Vector3::z() * size;

        // Bottom / top
        mesh.add_quad(Point3::new(-h, -h, -h), x, z);
        mesh.add_quad(Point3::new(-h, h, -h), z, x);
        // Front / back
        mesh.add_quad(Point3::new(-h, -h, h), x, y);
        mesh.add_quad(Point3::new(-h, -h, -h), y, x);
        // Left / right
        mesh.add_quad(Point3::new(-h, -h, -h), z, y);
        mesh.add_quad(Point3::new(h, -h, -h), y, z);

        mesh
    }

    /// Horizontal square at `height` with the given half extent.
    pub fn floor(half_extent: f32, height: f32) -> Self {
        let mut mesh = Self::with_capacity(2);
        let side = 2.0 * half_extent;
        mesh.add_quad(
            Point3::new(-half_extent, height, -half_extent),
            Vector3::z() * side,
            Vector3::x() * side,
        );
        mesh
    }

    /// A flight of `steps` stairs climbing along +X from the origin, each
    /// with a vertical riser and a horizontal tread, spanning `width` in Z.
    pub fn stairs(steps: usize, rise: f32, run: f32, width: f32) -> Self {
        let mut mesh = Self::with_capacity(steps * 4);
        let half = width / 2.0;
        let across = Vector3::z() * width;
        for i in 0..steps {
            let x = i as f32 * run;
            let y = i as f32 * rise;
            mesh.add_quad(
                Point3::new(x, y, -half),
                Vector3::y() * rise,
                across,
            );
            mesh.add_quad(
                Point3::new(x, y + rise, -half),
                across,
                Vector3::x() * run,
            );
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_has_twelve_faces_on_its_surface() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.faces.len(), 12);
        for face in &cube.faces {
            for p in face {
                assert_relative_eq!(p.coords.amax(), 1.0);
            }
        }
    }

    #[test]
    fn test_stairs_top_tread_height() {
        let stairs = Mesh::stairs(3, 0.25, 0.5, 2.0);
        assert_eq!(stairs.faces.len(), 12);
        let top = stairs
            .faces
            .iter()
            .flatten()
            .map(|p| p.y)
            .fold(f32::MIN, f32::max);
        assert_relative_eq!(top, 0.75);
    }

    #[test]
    fn test_transformed_translates_vertices() {
        let floor = Mesh::floor(1.0, 0.0);
        let moved = floor.transformed(&Matrix4::new_translation(&Vector3::new(0.0, 3.0, 0.0)));
        assert!(moved.faces.iter().flatten().all(|p| (p.y - 3.0).abs() < 1e-6));
    }
}
