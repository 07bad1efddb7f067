//! Scene camera
//!
//! Position, quaternion orientation, and perspective projection parameters.

use glam::{Mat4, Quat, Vec3};

/// A perspective scene camera.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    orientation: Quat,
    /// Field of view angle in degrees.
    fov_degrees: f32,
    aspect: f32,
    z_near: f32,
    z_far: f32,
}

impl Camera {
    /// Create a camera at the origin with identity orientation.
    pub fn new(fov_degrees: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov_degrees,
            aspect,
            z_near,
            z_far,
        }
    }

    /// Return the camera to the origin with identity orientation. The
    /// projection parameters are kept.
    pub fn reset(&mut self) {
        self.position = Vec3::ZERO;
        self.orientation = Quat::IDENTITY;
    }

    /// The projection matrix.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.z_near,
            self.z_far,
        )
    }

    /// The orientation as a rotation matrix.
    pub fn orientation_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation)
    }

    /// The world-to-camera matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation.inverse()) * Mat4::from_translation(-self.position)
    }

    /// Rotate around `axis` by `angle` radians.
    pub fn rotate_axis_angle(&mut self, axis: Vec3, angle: f32) {
        self.rotate(Quat::from_axis_angle(axis.normalize(), angle));
    }

    /// Apply `rotation` on top of the current orientation.
    pub fn rotate(&mut self, rotation: Quat) {
        self.orientation = (rotation * self.orientation).normalize();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Move the camera by `translation` in world space.
    pub fn translate(&mut self, translation: Vec3) {
        self.position += translation;
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Field of view angle in degrees.
    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn set_fov_degrees(&mut self, fov_degrees: f32) {
        self.fov_degrees = fov_degrees;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Distance of the near clipping plane.
    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn set_z_near(&mut self, z_near: f32) {
        self.z_near = z_near;
    }

    /// Distance of the far clipping plane.
    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    pub fn set_z_far(&mut self, z_far: f32) {
        self.z_far = z_far;
    }
}
