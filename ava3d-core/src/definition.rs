//! Declarative inputs owned by the host: how the avatar looks (style), how it
//! moves (pose) and where it is seen from (camera).
//!
//! All three deserialize from JSON with every field optional; vectors are
//! `[x, y, z]` arrays.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::math::Vec3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub emissive: String,
    pub floor: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#5b8def".to_string(),
            secondary: "#f2d0a4".to_string(),
            accent: "#ffd166".to_string(),
            emissive: "#1b2a4a".to_string(),
            floor: "#2b2d42".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    #[default]
    Round,
    Slim,
    Gem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDefinition {
    pub kind: BodyKind,
    pub scale: Vec3,
}

impl Default for BodyDefinition {
    fn default() -> Self {
        Self {
            kind: BodyKind::Round,
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadDefinition {
    pub radius: f32,
    /// Height of the head centre above the body origin
    pub offset: f32,
}

impl Default for HeadDefinition {
    fn default() -> Self {
        Self {
            radius: 0.42,
            offset: 1.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessoryKind {
    Visor,
    Crown,
    Orb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryDefinition {
    pub kind: AccessoryKind,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    /// Relative to the head centre for head-worn kinds, to the body origin
    /// otherwise
    #[serde(default)]
    pub offset: Vec3,
    #[serde(default)]
    pub rotation: Option<Vec3>,
}

fn unit_scale() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialHints {
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for MaterialHints {
    fn default() -> Self {
        Self {
            roughness: 0.5,
            metalness: 0.1,
        }
    }
}

/// Appearance of the avatar
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefinition {
    pub palette: Palette,
    pub body: BodyDefinition,
    pub head: HeadDefinition,
    pub accessory: Option<AccessoryDefinition>,
    pub material: MaterialHints,
}

/// Animation parameters, read once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseDefinition {
    /// Peak yaw sway in radians
    pub sway: f32,
    pub bob_offset: f32,
    pub bob_amplitude: f32,
    pub rotation: Vec3,
    pub head_tilt: Vec3,
}

impl Default for PoseDefinition {
    fn default() -> Self {
        Self {
            sway: 0.12,
            bob_offset: 0.0,
            bob_amplitude: 0.04,
            rotation: Vec3::zeros(),
            head_tilt: Vec3::zeros(),
        }
    }
}

/// Viewpoint, read once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDefinition {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for CameraDefinition {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.9, 4.2),
            target: Vec3::new(0.0, 0.35, 0.0),
            fov: 40.0,
        }
    }
}

/// Style, pose and camera bundled for hosts that read a single file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDefinition {
    pub style: StyleDefinition,
    pub pose: PoseDefinition,
    pub camera: CameraDefinition,
}

macro_rules! impl_from_json {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl $ty {
                pub fn from_json(json: &str) -> Result<Self, RenderError> {
                    serde_json::from_str(json)
                        .map_err(|source| RenderError::Definition { kind: $kind, source })
                }
            }
        )*
    };
}

impl_from_json!(
    StyleDefinition => "style",
    PoseDefinition => "pose",
    CameraDefinition => "camera",
    SceneDefinition => "scene",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        assert_eq!(StyleDefinition::from_json("{}").unwrap(), StyleDefinition::default());
        assert_eq!(PoseDefinition::from_json("{}").unwrap(), PoseDefinition::default());
        assert_eq!(CameraDefinition::from_json("{}").unwrap(), CameraDefinition::default());
    }

    #[test]
    fn test_style_from_json() {
        let style = StyleDefinition::from_json(
            r##"{
                "palette": { "primary": "#ff0000" },
                "body": { "kind": "gem", "scale": [1.0, 1.2, 1.0] },
                "accessory": { "kind": "crown", "offset": [0.0, 0.4, 0.0] }
            }"##,
        )
        .unwrap();

        assert_eq!(style.palette.primary, "#ff0000");
        assert_eq!(style.palette.floor, Palette::default().floor);
        assert_eq!(style.body.kind, BodyKind::Gem);
        assert!((style.body.scale.y - 1.2).abs() < 1e-6);

        let accessory = style.accessory.unwrap();
        assert_eq!(accessory.kind, AccessoryKind::Crown);
        assert_eq!(accessory.scale, Vec3::new(1.0, 1.0, 1.0));
        assert!(accessory.rotation.is_none());
    }

    #[test]
    fn test_scene_from_json() {
        let scene = SceneDefinition::from_json(
            r#"{ "camera": { "position": [0, 0, 10], "target": [0, 0, 0], "fov": 60 } }"#,
        )
        .unwrap();
        assert_eq!(scene.camera.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(scene.pose, PoseDefinition::default());
    }

    #[test]
    fn test_malformed_json_reports_kind() {
        let err = PoseDefinition::from_json("{ not json").unwrap_err();
        assert!(matches!(err, RenderError::Definition { kind: "pose", .. }));
        assert!(err.to_string().starts_with("invalid pose definition"));
    }

    #[test]
    fn test_unknown_accessory_kind_is_rejected() {
        let err = StyleDefinition::from_json(r#"{ "accessory": { "kind": "cape" } }"#).unwrap_err();
        assert!(matches!(err, RenderError::Definition { kind: "style", .. }));
    }
}
