/// World transforms baked into collision geometry
use nalgebra::{Matrix4, Vector3};

/// Euler rotation around the three axes, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

/// Placement of a level in the world: scale, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: RotationState,
    pub translation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            rotation: RotationState::default(),
            translation: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Self::translation_matrix(&self.translation)
            * Self::rotation_matrix(&self.rotation)
            * Self::scale_matrix(&self.scale)
    }

    /// Rotations applied in order X, Y, Z.
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));
        rz * ry * rx
    }

    pub fn translation_matrix(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(translation)
    }

    pub fn scale_matrix(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
