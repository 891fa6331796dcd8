/// Orbit camera controlled from the keyboard
use ava3d_core::{CameraDefinition, Vec3};

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 20.0;
/// Stay short of the poles so the view up vector stays usable
const MAX_PITCH: f32 = 1.4;

/// Spherical coordinates around the camera target
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    fov: f32,
}

impl Orbit {
    pub fn from_camera(camera: &CameraDefinition) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.norm();
        let (yaw, pitch) = if distance > f32::EPSILON {
            (
                offset.x.atan2(offset.z),
                (offset.y / distance).clamp(-1.0, 1.0).asin(),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            target: camera.target,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            fov: camera.fov,
        }
    }

    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Multiply the distance to the target by `factor`.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    pub fn camera(&self) -> CameraDefinition {
        CameraDefinition {
            position: self.position(),
            target: self.target,
            fov: self.fov,
        }
    }
}
