/// Offline rendering of a single frame to a PNG file
use anyhow::Context;
use ava3d_core::{
    AvatarMeshes, Camera, Compositor, FrameMotion, FrameStats, PixelBuffer, Rgb8,
    SceneDefinition, Surface, SurfaceSize,
};
use std::path::Path;

pub const SNAPSHOT_BACKGROUND: Rgb8 = Rgb8::new(18, 18, 28);

/// Render `scene` as it looks `time` seconds into its animation.
pub fn render_snapshot(
    scene: &SceneDefinition,
    size: SurfaceSize,
    time: f32,
) -> (PixelBuffer, FrameStats) {
    let meshes = AvatarMeshes::build(&scene.style);
    let motion = FrameMotion::sample(&scene.pose, time);
    let camera = Camera::from(&scene.camera);

    let mut buffer = PixelBuffer::new(size, SNAPSHOT_BACKGROUND);
    let stats = Compositor::new().render(&meshes, &motion, &camera, &mut buffer);
    (buffer, stats)
}

pub fn save_png(buffer: &PixelBuffer, path: &Path) -> anyhow::Result<()> {
    let size = buffer.size();
    let image = image::RgbaImage::from_raw(size.width, size.height, buffer.pixels().to_vec())
        .context("pixel buffer does not match its dimensions")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), width = size.width, height = size.height, "snapshot saved");
    Ok(())
}
