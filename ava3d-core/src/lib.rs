/// AVA3D Core Library - Software rendering pipeline for low-poly avatars
///
/// This library builds the avatar meshes from a style definition, animates
/// them with simple pose kinematics, projects them through a pinhole camera,
/// shades them with a single directional light and paints them back to front
/// onto any 2D surface. Hosts drive it through [`RenderLoop`].

pub mod animation;
pub mod avatar;
pub mod color;
pub mod compositor;
pub mod definition;
pub mod error;
pub mod geometry;
pub mod math;
pub mod projection;
pub mod render_loop;
pub mod shading;
pub mod surface;

// Re-export commonly used types
pub use animation::FrameMotion;
pub use avatar::{AvatarMeshes, Material, MeshDefinition};
pub use color::{parse_color, Rgb8};
pub use compositor::{Compositor, DrawTriangle, FrameStats};
pub use definition::{
    AccessoryDefinition, AccessoryKind, BodyKind, CameraDefinition, PoseDefinition,
    SceneDefinition, StyleDefinition,
};
pub use error::RenderError;
pub use geometry::{Face, Geometry};
pub use math::{Vec2, Vec3};
pub use projection::{Camera, Projected};
pub use render_loop::{FrameInputs, FrameReport, FrameScheduler, LoopState, RenderLoop};
pub use surface::{PixelBuffer, Surface, SurfaceSize};
