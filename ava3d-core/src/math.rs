/// Vector primitives and rotations shared by every pipeline stage
use nalgebra::{Matrix3, Rotation3, Vector2, Vector3};

pub type Vec3 = Vector3<f32>;
pub type Vec2 = Vector2<f32>;

/// Normalize `v`, returning the zero vector when `v` has no length.
pub fn normalize(v: &Vec3) -> Vec3 {
    v.try_normalize(0.0).unwrap_or_else(Vec3::zeros)
}

/// Build a rotation matrix from per-axis angles (radians).
///
/// Rotations are applied X first, then Y, then Z. An axis whose angle is
/// exactly zero contributes nothing.
pub fn rotation_matrix(angles: &Vec3) -> Matrix3<f32> {
    let mut m = Matrix3::identity();
    if angles.x != 0.0 {
        m = Rotation3::from_axis_angle(&Vector3::x_axis(), angles.x).into_inner() * m;
    }
    if angles.y != 0.0 {
        m = Rotation3::from_axis_angle(&Vector3::y_axis(), angles.y).into_inner() * m;
    }
    if angles.z != 0.0 {
        m = Rotation3::from_axis_angle(&Vector3::z_axis(), angles.z).into_inner() * m;
    }
    m
}

/// Rotate `v` about X, then Y, then Z.
pub fn rotate(v: &Vec3, angles: &Vec3) -> Vec3 {
    if angles.x == 0.0 && angles.y == 0.0 && angles.z == 0.0 {
        return *v;
    }
    rotation_matrix(angles) * v
}

/// Component-wise product.
pub fn scale(v: &Vec3, factors: &Vec3) -> Vec3 {
    v.component_mul(factors)
}

/// Replace non-finite components with `fallback`.
pub fn finite_or(v: &Vec3, fallback: f32) -> Vec3 {
    v.map(|c| if c.is_finite() { c } else { fallback })
}
