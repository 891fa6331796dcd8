/// 2D drawing surfaces the compositor fills triangles onto
use crate::color::Rgb8;
use crate::math::Vec2;

/// Backing pixel dimensions of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Pixel size for a logical (CSS) size at the given device pixel ratio.
    pub fn from_logical(width: f64, height: f64, pixel_ratio: f64) -> Self {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let px = |v: f64| {
            if v.is_finite() && v > 0.0 {
                (v * ratio).round() as u32
            } else {
                0
            }
        };
        Self::new(px(width), px(height))
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Anything triangles can be painted onto. Later fills overpaint earlier ones.
pub trait Surface {
    fn size(&self) -> SurfaceSize;

    /// Match the backing store to a new pixel size.
    fn resize(&mut self, size: SurfaceSize);

    fn clear(&mut self);

    fn fill_triangle(&mut self, points: &[Vec2; 3], color: Rgb8);
}

/// RGBA8 software surface
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    size: SurfaceSize,
    background: Rgb8,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(size: SurfaceSize, background: Rgb8) -> Self {
        let mut buffer = Self {
            size,
            background,
            pixels: Vec::new(),
        };
        buffer.resize(size);
        buffer
    }

    /// Row-major RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = (y as usize * self.size.width as usize + x as usize) * 4;
        Some(Rgb8::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    fn put(&mut self, x: usize, y: usize, color: Rgb8) {
        let i = (y * self.size.width as usize + x) * 4;
        self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
    }
}

impl Surface for PixelBuffer {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.pixels = vec![0; size.width as usize * size.height as usize * 4];
        self.clear();
    }

    fn clear(&mut self) {
        let bg = self.background;
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[bg.r, bg.g, bg.b, 255]);
        }
    }

    fn fill_triangle(&mut self, points: &[Vec2; 3], color: Rgb8) {
        let [v0, v1, v2] = *points;

        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i64;

        let min_x = min_x.max(0);
        let max_x = max_x.min(self.size.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.size.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(&v0, &v1, &v2, &p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.put(x as usize, y as usize, color);
                    }
                }
            }
        }
    }
}

/// Barycentric weights of `p`, or `None` for a zero-area triangle.
fn barycentric(v0: &Vec2, v1: &Vec2, v2: &Vec2, p: &Vec2) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
