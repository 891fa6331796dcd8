/// Per-frame pose kinematics: local transforms, head tilt, global sway and bob
use crate::avatar::{LocalTransform, MeshDefinition};
use crate::definition::PoseDefinition;
use crate::math::{rotate, scale, Vec3};

const BODY_SWAY_FREQUENCY: f32 = 1.6;
const HEAD_SWAY_FREQUENCY: f32 = 2.2;
const HEAD_SWAY_SHARE: f32 = 0.35;
const BOB_FREQUENCY: f32 = 1.8;

/// Whole-figure motion at one instant, derived from a pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMotion {
    pub global_rotation: Vec3,
    pub head_rotation: Vec3,
    /// Vertical offset applied after the global rotation
    pub bob: f32,
}

impl FrameMotion {
    /// Sample the pose at `time` seconds.
    pub fn sample(pose: &PoseDefinition, time: f32) -> Self {
        let body_sway = (time * BODY_SWAY_FREQUENCY).sin() * pose.sway;
        let head_sway = (time * HEAD_SWAY_FREQUENCY).sin() * pose.sway * HEAD_SWAY_SHARE;

        Self {
            global_rotation: pose.rotation + Vec3::new(0.0, body_sway, 0.0),
            head_rotation: pose.head_tilt + Vec3::new(0.0, 0.0, head_sway),
            bob: pose.bob_offset + (time * BOB_FREQUENCY).sin() * pose.bob_amplitude,
        }
    }

    /// Still figure: no rotation, no bob.
    pub fn rest() -> Self {
        Self {
            global_rotation: Vec3::zeros(),
            head_rotation: Vec3::zeros(),
            bob: 0.0,
        }
    }

    /// Carry one model-space vertex of a mesh into world space.
    pub fn apply(&self, local: &LocalTransform, attach_to_head: bool, vertex: &Vec3) -> Vec3 {
        let mut p = rotate(&scale(vertex, &local.scale), &local.rotation) + local.translation;
        if attach_to_head {
            let pivot = local.translation;
            p = rotate(&(p - pivot), &self.head_rotation) + pivot;
        }
        let mut p = rotate(&p, &self.global_rotation);
        p.y += self.bob;
        p
    }

    /// World-space copy of every vertex of `mesh`. The geometry itself is
    /// left untouched.
    pub fn world_vertices(&self, mesh: &MeshDefinition) -> Vec<Vec3> {
        mesh.geometry
            .vertices()
            .iter()
            .map(|v| self.apply(&mesh.transform, mesh.attach_to_head, v))
            .collect()
    }
}
