/// Half-block truecolor surface for terminal rendering
use ava3d_core::{PixelBuffer, Rgb8, Surface, SurfaceSize, Vec2};
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '\u{2580}';

const BACKGROUND: Rgb8 = Rgb8::new(18, 18, 28);

/// Renders into a pixel buffer two pixels tall per terminal cell
pub struct BlockRenderer {
    buffer: PixelBuffer,
}

impl BlockRenderer {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            buffer: PixelBuffer::new(Self::size_for(columns, rows), BACKGROUND),
        }
    }

    /// Pixel size backing a grid of terminal cells.
    pub fn size_for(columns: u16, rows: u16) -> SurfaceSize {
        SurfaceSize::new(u32::from(columns), u32::from(rows) * 2)
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let size = self.buffer.size();
        let rows = size.height / 2;
        let mut current: Option<(Rgb8, Rgb8)> = None;

        for row in 0..rows {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for x in 0..size.width {
                let top = self.buffer.pixel(x, row * 2).unwrap_or(BACKGROUND);
                let bottom = self.buffer.pixel(x, row * 2 + 1).unwrap_or(BACKGROUND);

                if current != Some((top, bottom)) {
                    writer.queue(SetForegroundColor(to_color(top)))?;
                    writer.queue(SetBackgroundColor(to_color(bottom)))?;
                    current = Some((top, bottom));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for BlockRenderer {
    fn size(&self) -> SurfaceSize {
        self.buffer.size()
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.buffer.resize(size);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn fill_triangle(&mut self, points: &[Vec2; 3], color: Rgb8) {
        self.buffer.fill_triangle(points, color);
    }
}

fn to_color(c: Rgb8) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_pixels_per_cell() {
        let renderer = BlockRenderer::new(40, 12);
        assert_eq!(renderer.size(), SurfaceSize::new(40, 24));
    }

    #[test]
    fn test_draw_emits_one_block_per_cell() {
        let mut renderer = BlockRenderer::new(6, 3);
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(6.0, 0.0), Vec2::new(0.0, 6.0)];
        renderer.fill_triangle(&tri, Rgb8::new(200, 10, 10));

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 18);
        assert!(text.contains("200;10;10"));
    }
}
