/// Indexed triangle meshes and the procedural primitive builders
use std::f32::consts::{PI, TAU};

use crate::math::Vec3;

/// Three vertex indices, counter-clockwise when seen from the outward side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face(pub usize, pub usize, pub usize);

impl Face {
    pub fn indices(&self) -> [usize; 3] {
        [self.0, self.1, self.2]
    }
}

/// Immutable vertex/face pair produced by one of the builders below
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Geometry {
    /// Geometry from raw parts; `None` if any face indexes past the vertex
    /// list.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Option<Self> {
        let in_bounds = faces
            .iter()
            .all(|f| f.indices().iter().all(|&i| i < vertices.len()));
        in_bounds.then(|| Self::from_parts(vertices, faces))
    }

    fn from_parts(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        debug_assert!(faces
            .iter()
            .all(|f| f.indices().iter().all(|&i| i < vertices.len())));
        Self { vertices, faces }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Upright cylinder centred on the origin, axis along Y.
    ///
    /// Vertex `2i` is on the top rim, `2i + 1` on the bottom rim, followed by
    /// the top and bottom cap centres.
    pub fn cylinder(radius: f32, height: f32, segments: usize) -> Self {
        let n = segments;
        let half = height / 2.0;
        let mut vertices = Vec::with_capacity(2 * n + 2);
        for i in 0..n {
            let (sin, cos) = (TAU * i as f32 / n as f32).sin_cos();
            vertices.push(Vec3::new(radius * cos, half, radius * sin));
            vertices.push(Vec3::new(radius * cos, -half, radius * sin));
        }
        let top_center = vertices.len();
        vertices.push(Vec3::new(0.0, half, 0.0));
        let bottom_center = vertices.len();
        vertices.push(Vec3::new(0.0, -half, 0.0));

        let mut faces = Vec::with_capacity(4 * n);
        for i in 0..n {
            let j = (i + 1) % n;
            let (top_i, bottom_i) = (2 * i, 2 * i + 1);
            let (top_j, bottom_j) = (2 * j, 2 * j + 1);
            faces.push(Face(top_i, top_j, bottom_i));
            faces.push(Face(bottom_i, top_j, bottom_j));
            faces.push(Face(top_center, top_j, top_i));
            faces.push(Face(bottom_center, bottom_i, bottom_j));
        }

        Self::from_parts(vertices, faces)
    }

    /// Axis-aligned box centred on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
        // Bit 0 selects +x, bit 1 +y, bit 2 +z
        let vertices = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 != 0 { hw } else { -hw },
                    if i & 2 != 0 { hh } else { -hh },
                    if i & 4 != 0 { hd } else { -hd },
                )
            })
            .collect();

        let faces = vec![
            Face(4, 5, 7), Face(4, 7, 6), // +z
            Face(1, 0, 2), Face(1, 2, 3), // -z
            Face(5, 1, 3), Face(5, 3, 7), // +x
            Face(0, 4, 6), Face(0, 6, 2), // -x
            Face(6, 7, 3), Face(6, 3, 2), // +y
            Face(0, 1, 5), Face(0, 5, 4), // -y
        ];

        Self::from_parts(vertices, faces)
    }

    /// Square bipyramid: poles at `±height / 2`, equator points at distance
    /// `size` on the X and Z axes.
    pub fn diamond(size: f32, height: f32) -> Self {
        let half = height / 2.0;
        let vertices = vec![
            Vec3::new(0.0, half, 0.0),
            Vec3::new(0.0, -half, 0.0),
            Vec3::new(size, 0.0, 0.0),
            Vec3::new(0.0, 0.0, size),
            Vec3::new(-size, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -size),
        ];

        let mut faces = Vec::with_capacity(8);
        for i in 0..4 {
            let a = 2 + i;
            let b = 2 + (i + 1) % 4;
            faces.push(Face(0, b, a));
            faces.push(Face(1, a, b));
        }

        Self::from_parts(vertices, faces)
    }

    /// Latitude/longitude sphere.
    ///
    /// The first and last rows all sit on the poles; the triangles touching
    /// them are zero-area and are dropped at shading time.
    pub fn sphere(radius: f32, width_segments: usize, height_segments: usize) -> Self {
        let w = width_segments;
        let h = height_segments;
        let fraction = |i: usize, of: usize| if of == 0 { 0.0 } else { i as f32 / of as f32 };

        let mut vertices = Vec::with_capacity((w + 1) * (h + 1));
        for iy in 0..=h {
            let phi = PI * fraction(iy, h);
            for ix in 0..=w {
                let theta = TAU * fraction(ix, w);
                vertices.push(Vec3::new(
                    -radius * theta.cos() * phi.sin(),
                    radius * phi.cos(),
                    radius * theta.sin() * phi.sin(),
                ));
            }
        }

        let row = w + 1;
        let mut faces = Vec::with_capacity(2 * w * h);
        for iy in 0..h {
            for ix in 0..w {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                faces.push(Face(a, b, d));
                faces.push(Face(b, c, d));
            }
        }

        Self::from_parts(vertices, faces)
    }

    /// Flat triangle fan in the XY plane facing +Z.
    pub fn disc(radius: f32, segments: usize) -> Self {
        let n = segments;
        let mut vertices = Vec::with_capacity(n + 1);
        vertices.push(Vec3::zeros());
        for i in 0..n {
            let (sin, cos) = (TAU * i as f32 / n as f32).sin_cos();
            vertices.push(Vec3::new(radius * cos, radius * sin, 0.0));
        }

        let faces = (0..n).map(|i| Face(0, i + 1, (i + 1) % n + 1)).collect();

        Self::from_parts(vertices, faces)
    }

    /// Flat annulus with thickness, axis along Y.
    ///
    /// Per segment `i` the vertices are outer-top, outer-bottom, inner-top,
    /// inner-bottom at `4i..4i + 4`.
    pub fn ring(inner_radius: f32, outer_radius: f32, height: f32, segments: usize) -> Self {
        let n = segments;
        let half = height / 2.0;
        let mut vertices = Vec::with_capacity(4 * n);
        for i in 0..n {
            let (sin, cos) = (TAU * i as f32 / n as f32).sin_cos();
            vertices.push(Vec3::new(outer_radius * cos, half, outer_radius * sin));
            vertices.push(Vec3::new(outer_radius * cos, -half, outer_radius * sin));
            vertices.push(Vec3::new(inner_radius * cos, half, inner_radius * sin));
            vertices.push(Vec3::new(inner_radius * cos, -half, inner_radius * sin));
        }

        let mut faces = Vec::with_capacity(8 * n);
        for i in 0..n {
            let j = (i + 1) % n;
            let (ot_i, ob_i, it_i, ib_i) = (4 * i, 4 * i + 1, 4 * i + 2, 4 * i + 3);
            let (ot_j, ob_j, it_j, ib_j) = (4 * j, 4 * j + 1, 4 * j + 2, 4 * j + 3);
            // outer wall
            faces.push(Face(ot_i, ot_j, ob_i));
            faces.push(Face(ob_i, ot_j, ob_j));
            // inner wall faces the axis
            faces.push(Face(it_i, ib_i, it_j));
            faces.push(Face(ib_i, ib_j, it_j));
            // top
            faces.push(Face(ot_i, it_i, ot_j));
            faces.push(Face(it_i, it_j, ot_j));
            // bottom
            faces.push(Face(ob_i, ob_j, ib_i));
            faces.push(Face(ib_i, ob_j, ib_j));
        }

        Self::from_parts(vertices, faces)
    }

    /// Unnormalized normal of `face` (edge cross product).
    pub fn face_normal(&self, face: &Face) -> Vec3 {
        let [a, b, c] = face.indices().map(|i| self.vertices[i]);
        (b - a).cross(&(c - a))
    }
}
