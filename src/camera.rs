//! Perspective camera and screen-point-to-ray derivation.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::raycast::Ray;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        // perspective_rh already uses [0,1] depth range
        let proj = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        proj * view
    }

    /// Derive the world-space ray through a normalized device
    /// coordinate (x and y in [-1, 1], +y up).
    ///
    /// Unprojects the near- and far-plane points at `ndc` through the
    /// inverse view-projection; the ray runs from the near point
    /// toward the far point.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv_view_proj = self.view_projection().inverse();

        let ndc_near = Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let ndc_far = Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let world_near = inv_view_proj * ndc_near;
        let world_far = inv_view_proj * ndc_far;

        // Perspective divide
        let origin = world_near.truncate() / world_near.w;
        let far = world_far.truncate() / world_far.w;

        Ray {
            origin,
            dir: (far - origin).normalize(),
        }
    }
}
