//! Canvas 2D backed drawing surface.

use ava3d_core::{RenderError, Rgb8, Surface, SurfaceSize, Vec2};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    size: SurfaceSize,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RenderError> {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(RenderError::SurfaceUnavailable)?;
        let size = SurfaceSize::new(canvas.width(), canvas.height());

        Ok(Self {
            canvas,
            context,
            size,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Backing size matching the canvas's current layout size.
    pub fn measure(&self) -> SurfaceSize {
        let ratio = web_sys::window().map_or(1.0, |window| window.device_pixel_ratio());
        display_size(self.canvas.client_width(), self.canvas.client_height(), ratio)
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        self.size = size;
    }

    fn clear(&mut self) {
        self.context.clear_rect(
            0.0,
            0.0,
            f64::from(self.size.width),
            f64::from(self.size.height),
        );
    }

    fn fill_triangle(&mut self, points: &[Vec2; 3], color: Rgb8) {
        let [a, b, c] = points;
        self.context.begin_path();
        self.context.move_to(f64::from(a.x), f64::from(a.y));
        self.context.line_to(f64::from(b.x), f64::from(b.y));
        self.context.line_to(f64::from(c.x), f64::from(c.y));
        self.context.close_path();
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill();
    }
}

/// Pixel size for a canvas laid out at `client_width` x `client_height` CSS
/// pixels. Unlaid-out canvases report zero or negative sizes.
pub fn display_size(client_width: i32, client_height: i32, pixel_ratio: f64) -> SurfaceSize {
    SurfaceSize::from_logical(
        f64::from(client_width.max(0)),
        f64::from(client_height.max(0)),
        pixel_ratio,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_size_scales_by_ratio() {
        assert_eq!(display_size(320, 240, 2.0), SurfaceSize::new(640, 480));
        assert_eq!(display_size(301, 200, 1.25), SurfaceSize::new(376, 250));
    }

    #[test]
    fn test_display_size_of_hidden_canvas() {
        assert_eq!(display_size(0, 0, 1.0), SurfaceSize::new(1, 1));
        assert_eq!(display_size(-5, 100, 1.0), SurfaceSize::new(1, 100));
    }
}
