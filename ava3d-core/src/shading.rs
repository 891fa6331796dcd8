/// Single directional light, diffuse plus a metalness-weighted specular lobe
use crate::avatar::Material;
use crate::color::Rgb8;
use crate::math::{normalize, Vec3};

const AMBIENT: f32 = 0.35;
const DIFFUSE_BASE: f32 = 0.55;
const DIFFUSE_GLOSS: f32 = 0.45;
// Visual tuning values
const SPECULAR_EXPONENT: i32 = 12;
const SPECULAR_WEIGHT: f32 = 0.35;
const MAX_SHADING: f32 = 1.25;

/// Direction towards the light, fixed for every frame
pub fn light_direction() -> Vec3 {
    normalize(&Vec3::new(0.45, 0.8, 0.55))
}

/// Scalar brightness for a unit face normal seen along `view` (surface to
/// camera, any length).
pub fn shading_factor(normal: &Vec3, view: &Vec3, light: &Vec3, material: &Material) -> f32 {
    let diffuse = normal.dot(light).max(0.0);
    let half = normalize(&(light + normalize(view)));
    let specular =
        normal.dot(&half).max(0.0).powi(SPECULAR_EXPONENT) * material.metalness * SPECULAR_WEIGHT;

    let gloss = DIFFUSE_BASE + (1.0 - material.roughness) * DIFFUSE_GLOSS;
    (AMBIENT + diffuse * gloss + specular).clamp(0.0, MAX_SHADING)
}

/// Final 8-bit colour of a face.
pub fn shade(normal: &Vec3, view: &Vec3, light: &Vec3, material: &Material) -> Rgb8 {
    let factor = shading_factor(normal, view, light, material);
    let color = material.color * factor + material.emissive;
    Rgb8::from_unit(&color.map(|c| c.clamp(0.0, 1.0)))
}
