//! Camera: produces view and projection matrices and the world-space origin.
//! Moving the camera is left to the caller; this only holds state.

use serde::{Serialize, Deserialize};

use super::math::{Matrix, Vec3};

/// Camera state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub origin: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(origin: Vec3, fov_degrees: f32, aspect_ratio: f32) -> Self {
        Self {
            origin,
            fov_degrees,
            aspect_ratio,
            ..Default::default()
        }
    }

    fn rotation(&self) -> Matrix {
        Matrix::rotation_x(self.pitch) * Matrix::rotation_y(self.yaw)
    }

    /// Direction the camera looks along in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation().transform_vector(Vec3::UNIT_Z).normalize()
    }

    /// Inverse of the camera's orthonormal basis placed at `origin`
    pub fn view_matrix(&self) -> Matrix {
        Matrix::translation(-self.origin) * self.rotation().transpose()
    }

    pub fn projection_matrix(&self) -> Matrix {
        Matrix::perspective_fov_lh(self.fov_degrees.to_radians(), self.aspect_ratio, self.near, self.far)
    }

    pub fn rotate(&mut self, d_pitch: f32, d_yaw: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 0.0, -10.0),
            fov_degrees: 60.0,
            aspect_ratio: 1.0,
            pitch: 0.0,
            yaw: 0.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_moves_origin_to_zero() {
        let cam = Camera::new(Vec3::new(1.0, 2.0, -5.0), 60.0, 1.0);
        let p = cam.view_matrix().transform_point(cam.origin);
        assert!(p.x.abs() < 0.001 && p.y.abs() < 0.001 && p.z.abs() < 0.001);
    }

    #[test]
    fn test_point_ahead_projects_to_center() {
        let cam = Camera::default();
        let view_proj = cam.view_matrix() * cam.projection_matrix();
        let clip = view_proj.transform_point(Vec3::ZERO);
        assert!((clip.w - 10.0).abs() < 0.001);
        assert!((clip.x / clip.w).abs() < 0.001);
        let z = clip.z / clip.w;
        assert!(z > 0.0 && z < 1.0);
    }

    #[test]
    fn test_yaw_turns_forward() {
        let mut cam = Camera::default();
        cam.rotate(0.0, std::f32::consts::FRAC_PI_2);
        let f = cam.forward();
        assert!((f.x.abs() - 1.0).abs() < 0.001);
        assert!(f.z.abs() < 0.001);
    }

    #[test]
    fn test_yawed_view_keeps_forward_point_centered() {
        let mut cam = Camera::default();
        cam.rotate(0.2, 0.8);
        let target = cam.origin + cam.forward() * 5.0;
        let clip = (cam.view_matrix() * cam.projection_matrix()).transform_point(target);
        assert!((clip.x / clip.w).abs() < 0.001);
        assert!((clip.y / clip.w).abs() < 0.001);
        assert!((clip.w - 5.0).abs() < 0.001);
    }
}
