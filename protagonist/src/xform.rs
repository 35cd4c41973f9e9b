// xform.rs     Node transforms
//
// Copyright (c) 2024  Douglas Lau
//
use glam::{Affine3A, Quat, Vec3};

/// Rotation from Euler angles, applied X then Y then Z (local axes)
pub fn euler_xyz(angles: Vec3) -> Quat {
    Quat::from_rotation_x(angles.x)
        * Quat::from_rotation_y(angles.y)
        * Quat::from_rotation_z(angles.z)
}

/// Local transform of a scene node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation from parent origin
    pub translation: Vec3,

    /// Rotation
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a transform with a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Transform {
            translation,
            ..Default::default()
        }
    }

    /// Rotate around local X axis
    pub fn rotate_x(&mut self, angle: f32) {
        self.rotation *= Quat::from_rotation_x(angle);
    }

    /// Rotate around local Y axis
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation *= Quat::from_rotation_y(angle);
    }

    /// Rotate around local Z axis
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotation *= Quat::from_rotation_z(angle);
    }

    /// Apply Euler angles one axis at a time: X, then Y, then Z
    pub fn rotate_xyz(&mut self, angles: Vec3) {
        self.rotate_x(angles.x);
        self.rotate_y(angles.y);
        self.rotate_z(angles.z);
    }

    /// Replace rotation with Euler angles (XYZ order)
    pub fn set_euler(&mut self, angles: Vec3) {
        self.rotation = euler_xyz(angles);
    }

    /// Get the affine matrix (scale, then rotate, then translate)
    pub fn affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}
