//! Builds the fixed set of avatar meshes from a style definition.
//!
//! The result is cached by the render loop and only rebuilt when the style
//! changes.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use crate::color::parse_color;
use crate::definition::{AccessoryKind, BodyKind, StyleDefinition};
use crate::geometry::Geometry;
use crate::math::{finite_or, Vec3};

const BODY_HEIGHT: f32 = 1.4;
const BODY_SEGMENTS: usize = 18;
const ROUND_BODY_RADIUS: f32 = 0.55;
const SLIM_BODY_RADIUS: f32 = 0.42;
const GEM_SIZE: f32 = 0.62;
const GEM_HEIGHT: f32 = 1.6;

const HEAD_WIDTH_SEGMENTS: usize = 16;
const HEAD_HEIGHT_SEGMENTS: usize = 12;

const FLOOR_RADIUS: f32 = 1.3;
const FLOOR_SEGMENTS: usize = 32;
const FLOOR_HEIGHT: f32 = -0.75;

// Visual tuning values, multiples of the palette emissive colour
const HEAD_GLOW: f32 = 1.4;
const ACCESSORY_GLOW: f32 = 1.4;
const CROWN_GLOW: f32 = 1.2;
const ORB_GLOW: f32 = 1.5;

/// Surface response of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub emissive: Vec3,
    pub roughness: f32,
    pub metalness: f32,
}

impl Material {
    /// Clamp colour, roughness and metalness into 0-1 and replace non-finite
    /// values. Emissive may exceed 1; shading clamps the final colour.
    pub fn sanitized(self) -> Self {
        let unit = |v: f32, fallback: f32| {
            if v.is_finite() {
                v.clamp(0.0, 1.0)
            } else {
                fallback
            }
        };
        Self {
            color: finite_or(&self.color, 1.0).map(|c| c.clamp(0.0, 1.0)),
            emissive: finite_or(&self.emissive, 0.0),
            roughness: unit(self.roughness, 1.0),
            metalness: unit(self.metalness, 0.0),
        }
    }
}

/// Local placement of a mesh: scale, then rotate (X, Y, Z), then translate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub scale: Vec3,
    pub rotation: Vec3,
    pub translation: Vec3,
}

impl LocalTransform {
    pub fn at(translation: Vec3) -> Self {
        Self {
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation: Vec3::zeros(),
            translation,
        }
    }

    fn sanitized(self) -> Self {
        Self {
            scale: finite_or(&self.scale, 1.0),
            rotation: finite_or(&self.rotation, 0.0),
            translation: finite_or(&self.translation, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshDefinition {
    pub geometry: Arc<Geometry>,
    pub material: Material,
    pub transform: LocalTransform,
    /// Follows head tilt, pivoting around its own translation
    pub attach_to_head: bool,
}

impl MeshDefinition {
    fn new(geometry: Geometry, material: Material, transform: LocalTransform) -> Self {
        Self {
            geometry: Arc::new(geometry),
            material: material.sanitized(),
            transform: transform.sanitized(),
            attach_to_head: false,
        }
    }

    fn attached_to_head(mut self, attached: bool) -> Self {
        self.attach_to_head = attached;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvatarMeshes {
    pub body: MeshDefinition,
    pub head: MeshDefinition,
    pub accessory: Option<MeshDefinition>,
    pub floor: MeshDefinition,
}

impl AvatarMeshes {
    /// Meshes in draw-list order: floor, body, head, accessory.
    pub fn iter(&self) -> impl Iterator<Item = &MeshDefinition> {
        [Some(&self.floor), Some(&self.body), Some(&self.head), self.accessory.as_ref()]
            .into_iter()
            .flatten()
    }

    pub fn build(style: &StyleDefinition) -> Self {
        let palette = &style.palette;
        let emissive = parse_color(&palette.emissive);
        let hints = &style.material;

        let body_geometry = match style.body.kind {
            BodyKind::Gem => Geometry::diamond(GEM_SIZE, GEM_HEIGHT),
            BodyKind::Round => Geometry::cylinder(ROUND_BODY_RADIUS, BODY_HEIGHT, BODY_SEGMENTS),
            BodyKind::Slim => Geometry::cylinder(SLIM_BODY_RADIUS, BODY_HEIGHT, BODY_SEGMENTS),
        };
        let body = MeshDefinition::new(
            body_geometry,
            Material {
                color: parse_color(&palette.primary),
                emissive,
                roughness: hints.roughness,
                metalness: hints.metalness,
            },
            LocalTransform {
                scale: style.body.scale,
                ..LocalTransform::at(Vec3::zeros())
            },
        );

        let head_center = Vec3::new(0.0, style.head.offset, 0.0);
        let head = MeshDefinition::new(
            Geometry::sphere(style.head.radius, HEAD_WIDTH_SEGMENTS, HEAD_HEIGHT_SEGMENTS),
            Material {
                color: parse_color(&palette.secondary),
                emissive: emissive * HEAD_GLOW,
                roughness: hints.roughness,
                metalness: hints.metalness,
            },
            LocalTransform::at(head_center),
        )
        .attached_to_head(true);

        let accessory = style.accessory.as_ref().map(|def| {
            let archetype = Accessory::from(def.kind);
            let anchor = if archetype.head_worn() {
                head_center
            } else {
                Vec3::zeros()
            };
            let transform = LocalTransform {
                scale: def.scale,
                rotation: def.rotation.unwrap_or_else(Vec3::zeros),
                translation: anchor + def.offset,
            };
            let material = Material {
                color: parse_color(&palette.accent),
                emissive: emissive * ACCESSORY_GLOW * archetype.glow(),
                roughness: archetype.roughness(),
                metalness: archetype.metalness(),
            };
            MeshDefinition::new(archetype.geometry(), material, transform)
                .attached_to_head(archetype.head_worn())
        });

        let floor = MeshDefinition::new(
            Geometry::disc(FLOOR_RADIUS, FLOOR_SEGMENTS),
            Material {
                color: parse_color(&palette.floor),
                emissive: Vec3::zeros(),
                roughness: 0.9,
                metalness: 0.0,
            },
            LocalTransform {
                rotation: Vec3::new(-FRAC_PI_2, 0.0, 0.0),
                ..LocalTransform::at(Vec3::new(0.0, FLOOR_HEIGHT, 0.0))
            },
        );

        tracing::debug!(
            body = ?style.body.kind,
            accessory = ?style.accessory.as_ref().map(|a| a.kind),
            "assembled avatar meshes"
        );

        Self {
            body,
            head,
            accessory,
            floor,
        }
    }
}

/// Accessory archetype, resolved once from the style's accessory kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessory {
    Visor,
    Crown,
    Orb,
}

impl From<AccessoryKind> for Accessory {
    fn from(kind: AccessoryKind) -> Self {
        match kind {
            AccessoryKind::Visor => Self::Visor,
            AccessoryKind::Crown => Self::Crown,
            AccessoryKind::Orb => Self::Orb,
        }
    }
}

impl Accessory {
    fn geometry(self) -> Geometry {
        match self {
            Self::Visor => Geometry::cuboid(0.78, 0.16, 0.2),
            Self::Crown => Geometry::ring(0.26, 0.34, 0.16, 16),
            Self::Orb => Geometry::sphere(0.14, 12, 8),
        }
    }

    fn head_worn(self) -> bool {
        !matches!(self, Self::Orb)
    }

    fn glow(self) -> f32 {
        match self {
            Self::Visor => 1.0,
            Self::Crown => CROWN_GLOW,
            Self::Orb => ORB_GLOW,
        }
    }

    fn roughness(self) -> f32 {
        match self {
            Self::Visor => 0.2,
            Self::Crown => 0.35,
            Self::Orb => 0.1,
        }
    }

    fn metalness(self) -> f32 {
        match self {
            Self::Visor => 0.6,
            Self::Crown => 0.85,
            Self::Orb => 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::AccessoryDefinition;

    fn style_with(kind: BodyKind, accessory: Option<AccessoryKind>) -> StyleDefinition {
        let mut style = StyleDefinition::default();
        style.body.kind = kind;
        style.accessory = accessory.map(|kind| AccessoryDefinition {
            kind,
            scale: Vec3::new(1.0, 1.0, 1.0),
            offset: Vec3::new(0.0, 0.1, 0.0),
            rotation: None,
        });
        style
    }

    #[test]
    fn test_gem_body_is_diamond() {
        let meshes = AvatarMeshes::build(&style_with(BodyKind::Gem, None));
        assert_eq!(meshes.body.geometry.vertices().len(), 6);
        assert_eq!(meshes.body.geometry.faces().len(), 8);
        assert!(meshes.accessory.is_none());
    }

    #[test]
    fn test_body_radius_follows_kind() {
        let round = AvatarMeshes::build(&style_with(BodyKind::Round, None));
        let slim = AvatarMeshes::build(&style_with(BodyKind::Slim, None));
        assert_eq!(round.body.geometry.faces().len(), 4 * BODY_SEGMENTS);
        assert!((round.body.geometry.vertices()[0].x - ROUND_BODY_RADIUS).abs() < 1e-6);
        assert!((slim.body.geometry.vertices()[0].x - SLIM_BODY_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn test_head_is_attached_and_offset() {
        let style = StyleDefinition::default();
        let meshes = AvatarMeshes::build(&style);
        assert!(meshes.head.attach_to_head);
        assert!(!meshes.body.attach_to_head);
        assert!(!meshes.floor.attach_to_head);
        assert_eq!(meshes.head.transform.translation, Vec3::new(0.0, style.head.offset, 0.0));
    }

    #[test]
    fn test_accessory_archetypes() {
        let visor = AvatarMeshes::build(&style_with(BodyKind::Round, Some(AccessoryKind::Visor)));
        let visor = visor.accessory.unwrap();
        assert!(visor.attach_to_head);
        assert_eq!(visor.geometry.vertices().len(), 8);

        let crown = AvatarMeshes::build(&style_with(BodyKind::Round, Some(AccessoryKind::Crown)));
        let crown = crown.accessory.unwrap();
        assert!(crown.attach_to_head);
        assert_eq!(crown.geometry.faces().len(), 8 * 16);

        let orb = AvatarMeshes::build(&style_with(BodyKind::Round, Some(AccessoryKind::Orb)));
        let orb = orb.accessory.unwrap();
        assert!(!orb.attach_to_head);
        assert_eq!(orb.transform.translation, Vec3::new(0.0, 0.1, 0.0));
        assert!((orb.material.roughness - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_emissive_multipliers() {
        let mut style = style_with(BodyKind::Round, Some(AccessoryKind::Crown));
        style.palette.emissive = "#646464".to_string();
        let meshes = AvatarMeshes::build(&style);

        let base = 100.0 / 255.0;
        assert!((meshes.body.material.emissive.x - base).abs() < 1e-5);
        assert!((meshes.head.material.emissive.x - base * 1.4).abs() < 1e-5);
        let crown = meshes.accessory.unwrap();
        assert!((crown.material.emissive.x - base * 1.4 * 1.2).abs() < 1e-5);
        assert_eq!(meshes.floor.material.emissive, Vec3::zeros());
    }

    #[test]
    fn test_bright_glow_is_not_clipped() {
        let mut style = style_with(BodyKind::Round, Some(AccessoryKind::Orb));
        style.palette.emissive = "#fff".to_string();
        let meshes = AvatarMeshes::build(&style);

        assert!((meshes.head.material.emissive.y - 1.4).abs() < 1e-5);
        let orb = meshes.accessory.unwrap();
        assert!((orb.material.emissive.y - 1.4 * 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_floor_lies_flat_below_origin() {
        let meshes = AvatarMeshes::build(&StyleDefinition::default());
        let floor = &meshes.floor;
        assert!(floor.transform.translation.y < 0.0);
        assert_eq!(floor.material.metalness, 0.0);
        assert!((floor.material.roughness - 0.9).abs() < 1e-6);
        assert!((floor.transform.rotation.x + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_malformed_colours_become_white() {
        let mut style = StyleDefinition::default();
        style.palette.primary = "bogus".to_string();
        let meshes = AvatarMeshes::build(&style);
        assert_eq!(meshes.body.material.color, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_material_sanitized() {
        let material = Material {
            color: Vec3::new(2.0, f32::NAN, -1.0),
            emissive: Vec3::new(f32::INFINITY, 2.1, 0.5),
            roughness: 3.0,
            metalness: f32::NAN,
        }
        .sanitized();
        assert_eq!(material.color, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(material.emissive, Vec3::new(0.0, 2.1, 0.5));
        assert_eq!(material.roughness, 1.0);
        assert_eq!(material.metalness, 0.0);
    }

    #[test]
    fn test_draw_order() {
        let meshes = AvatarMeshes::build(&style_with(BodyKind::Round, Some(AccessoryKind::Orb)));
        let order: Vec<_> = meshes.iter().map(|m| m.geometry.faces().len()).collect();
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], FLOOR_SEGMENTS);
        assert_eq!(meshes.iter().count(), 4);

        let bare = AvatarMeshes::build(&StyleDefinition::default());
        assert_eq!(bare.iter().count(), 3);
    }
}
