//! Culls, shades, depth-sorts and fills the avatar's triangles.
//!
//! There is no depth buffer: triangles are filled farthest first so that
//! nearer ones overpaint them (painter's algorithm).

use crate::animation::FrameMotion;
use crate::avatar::{AvatarMeshes, MeshDefinition};
use crate::color::Rgb8;
use crate::math::{Vec2, Vec3};
use crate::projection::Camera;
use crate::shading::{light_direction, shade};
use crate::surface::{Surface, SurfaceSize};

/// Face normals shorter than this belong to zero-area triangles.
const DEGENERATE_EPSILON: f32 = 1e-6;

/// One triangle ready for the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTriangle {
    pub points: [Vec2; 3],
    /// Mean camera-space depth of the three corners
    pub depth: f32,
    pub color: Rgb8,
}

/// Per-frame triangle accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    /// Degenerate, back-facing or behind-camera triangles
    pub culled: usize,
}

pub struct Compositor {
    light: Vec3,
    draw_list: Vec<DrawTriangle>,
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            light: light_direction(),
            draw_list: Vec::new(),
        }
    }

    /// Shade the visible faces of one mesh whose world-space vertices are
    /// `world`, appending them to the draw list.
    pub fn collect_mesh(
        &mut self,
        mesh: &MeshDefinition,
        world: &[Vec3],
        camera: &Camera,
        size: SurfaceSize,
    ) -> usize {
        let mut culled = 0;
        for face in mesh.geometry.faces() {
            let [a, b, c] = face.indices().map(|i| world[i]);

            let normal = (b - a).cross(&(c - a));
            let length = normal.norm();
            if length <= DEGENERATE_EPSILON {
                culled += 1;
                continue;
            }
            let normal = normal / length;

            let centroid = (a + b + c) / 3.0;
            let view = camera.position - centroid;
            if normal.dot(&view) <= 0.0 {
                culled += 1;
                continue;
            }

            let (Some(pa), Some(pb), Some(pc)) = (
                camera.project(&a, size),
                camera.project(&b, size),
                camera.project(&c, size),
            ) else {
                culled += 1;
                continue;
            };

            self.draw_list.push(DrawTriangle {
                points: [pa.screen, pb.screen, pc.screen],
                depth: (pa.depth + pb.depth + pc.depth) / 3.0,
                color: shade(&normal, &view, &self.light, &mesh.material),
            });
        }
        culled
    }

    /// Order the draw list farthest first. Equal depths keep draw-list order.
    pub fn sort(&mut self) {
        self.draw_list.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    }

    pub fn draw_list(&self) -> &[DrawTriangle] {
        &self.draw_list
    }

    /// Fill the sorted draw list and empty it.
    pub fn fill<S: Surface>(&mut self, surface: &mut S) -> usize {
        let drawn = self.draw_list.len();
        for tri in self.draw_list.drain(..) {
            surface.fill_triangle(&tri.points, tri.color);
        }
        drawn
    }

    /// Render one full frame of the avatar onto `surface`.
    pub fn render<S: Surface>(
        &mut self,
        meshes: &AvatarMeshes,
        motion: &FrameMotion,
        camera: &Camera,
        surface: &mut S,
    ) -> FrameStats {
        let size = surface.size();
        self.draw_list.clear();

        let mut culled = 0;
        for mesh in meshes.iter() {
            let world = motion.world_vertices(mesh);
            culled += self.collect_mesh(mesh, &world, camera, size);
        }
        self.sort();

        surface.clear();
        let drawn = self.fill(surface);
        FrameStats { drawn, culled }
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}
