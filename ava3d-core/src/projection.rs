/// Pinhole camera basis and perspective projection to surface pixels
use crate::definition::CameraDefinition;
use crate::math::{normalize, Vec2, Vec3};
use crate::surface::SurfaceSize;

/// Points at or closer than this along the view axis are not visible.
pub const NEAR_THRESHOLD: f32 = 0.01;
const PARALLEL_EPSILON: f32 = 1e-6;

/// A world point mapped onto the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub screen: Vec2,
    /// Distance along the camera's forward axis
    pub depth: f32,
}

/// Orthonormal right-handed camera frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov: f32) -> Self {
        let forward = normalize(&(target - position));
        let mut up_hint = Vec3::y();
        if forward.cross(&up_hint).norm() < PARALLEL_EPSILON {
            up_hint = Vec3::z();
        }
        let right = normalize(&forward.cross(&up_hint));
        let up = normalize(&right.cross(&forward));

        Self {
            position,
            forward,
            right,
            up,
            fov,
        }
    }

    /// Camera-space coordinates: (right, up, forward).
    pub fn to_camera_space(&self, point: &Vec3) -> Vec3 {
        let rel = point - self.position;
        Vec3::new(rel.dot(&self.right), rel.dot(&self.up), rel.dot(&self.forward))
    }

    /// Project a world point to surface pixels.
    ///
    /// Returns `None` when the point is at or behind the camera; callers drop
    /// such points.
    pub fn project(&self, point: &Vec3, size: SurfaceSize) -> Option<Projected> {
        let cam = self.to_camera_space(point);
        if cam.z <= NEAR_THRESHOLD {
            return None;
        }

        let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let aspect = size.aspect();
        let ndc_x = cam.x * f / aspect / cam.z;
        let ndc_y = cam.y * f / cam.z;

        let width = size.width as f32;
        let height = size.height as f32;
        let screen_x = (ndc_x + 1.0) * 0.5 * width;
        let screen_y = (1.0 - ndc_y) * 0.5 * height;

        Some(Projected {
            screen: Vec2::new(screen_x, screen_y),
            depth: cam.z,
        })
    }
}

impl From<&CameraDefinition> for Camera {
    fn from(def: &CameraDefinition) -> Self {
        Self::new(def.position, def.target, def.fov)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from(&CameraDefinition::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: SurfaceSize = SurfaceSize {
        width: 800,
        height: 600,
    };

    fn looking_down_z() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::zeros(), 60.0)
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 5.0), Vec3::new(0.0, 0.5, 0.0), 45.0);
        for v in [camera.forward, camera.right, camera.up] {
            assert!((v.norm() - 1.0).abs() < 1e-5);
        }
        assert!(camera.forward.dot(&camera.right).abs() < 1e-5);
        assert!(camera.forward.dot(&camera.up).abs() < 1e-5);
        assert!(camera.right.dot(&camera.up).abs() < 1e-5);
        assert!(camera.up.y > 0.0);
    }

    #[test]
    fn test_vertical_view_uses_fallback_up() {
        let camera = Camera::new(Vec3::new(0.0, 10.0, 0.0), Vec3::zeros(), 60.0);
        assert!((camera.right.norm() - 1.0).abs() < 1e-5);
        assert!((camera.up.norm() - 1.0).abs() < 1e-5);
        assert!(camera.project(&Vec3::zeros(), SIZE).is_some());
    }

    #[test]
    fn test_point_on_axis_projects_to_center() {
        let projected = looking_down_z().project(&Vec3::zeros(), SIZE).unwrap();
        assert_eq!(projected.screen, Vec2::new(400.0, 300.0));
        assert!((projected.depth - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_points_at_or_behind_camera_are_dropped() {
        let camera = looking_down_z();
        assert!(camera.project(&Vec3::new(0.0, 0.0, 10.0), SIZE).is_none());
        assert!(camera.project(&Vec3::new(0.0, 0.0, 12.0), SIZE).is_none());
        assert!(camera.project(&Vec3::new(1.0, 1.0, 10.005), SIZE).is_none());
    }

    #[test]
    fn test_screen_axes() {
        let camera = looking_down_z();
        let right = camera.project(&Vec3::new(1.0, 0.0, 0.0), SIZE).unwrap();
        let up = camera.project(&Vec3::new(0.0, 1.0, 0.0), SIZE).unwrap();
        assert!(right.screen.x > 400.0);
        assert!((right.screen.y - 300.0).abs() < 1e-3);
        // Y is flipped: world up is screen up
        assert!(up.screen.y < 300.0);
    }

    #[test]
    fn test_fov_edge_maps_to_surface_edge() {
        let camera = looking_down_z();
        // tan(30 deg) * 10 units sits on the top edge of a 60 deg frustum
        let top = camera
            .project(&Vec3::new(0.0, 10.0 * 30f32.to_radians().tan(), 0.0), SIZE)
            .unwrap();
        assert!(top.screen.y.abs() < 1e-2);
    }
}
