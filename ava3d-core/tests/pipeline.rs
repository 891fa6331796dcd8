use ava3d_core::{
    AccessoryDefinition, AccessoryKind, AvatarMeshes, BodyKind, CameraDefinition, FrameInputs,
    FrameScheduler, PixelBuffer, RenderError, RenderLoop, Rgb8, SceneDefinition,
    StyleDefinition, Surface, SurfaceSize, Vec3,
};

const BACKGROUND: Rgb8 = Rgb8::new(0, 0, 0);

/// Fires frames only when the test says so
#[derive(Default)]
struct TestScheduler {
    pending: Option<u64>,
    issued: u64,
}

impl FrameScheduler for TestScheduler {
    type Handle = u64;

    fn request_frame(&mut self) -> Result<u64, RenderError> {
        self.issued += 1;
        self.pending = Some(self.issued);
        Ok(self.issued)
    }

    fn cancel_frame(&mut self, handle: u64) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

fn crowned_gem() -> StyleDefinition {
    let mut style = StyleDefinition::default();
    style.body.kind = BodyKind::Gem;
    style.palette.primary = "#22aa88".to_string();
    style.palette.floor = "#333".to_string();
    style.accessory = Some(AccessoryDefinition {
        kind: AccessoryKind::Crown,
        scale: Vec3::new(1.0, 1.0, 1.0),
        offset: Vec3::new(0.0, 0.38, 0.0),
        rotation: None,
    });
    style
}

fn coverage(buffer: &PixelBuffer) -> usize {
    let size = buffer.size();
    (0..size.height)
        .flat_map(|y| (0..size.width).map(move |x| (x, y)))
        .filter(|&(x, y)| buffer.pixel(x, y) != Some(BACKGROUND))
        .count()
}

#[test]
fn gem_avatar_without_accessory() {
    let mut style = StyleDefinition::default();
    style.body.kind = BodyKind::Gem;
    let meshes = AvatarMeshes::build(&style);

    assert_eq!(meshes.body.geometry.vertices().len(), 6);
    assert_eq!(meshes.body.geometry.faces().len(), 8);
    assert!(meshes.accessory.is_none());
}

#[test]
fn avatar_is_drawn_over_background() {
    let inputs = FrameInputs::from(SceneDefinition {
        style: crowned_gem(),
        ..SceneDefinition::default()
    });
    let mut render_loop = RenderLoop::new(TestScheduler::default(), inputs);
    render_loop
        .mount(PixelBuffer::new(SurfaceSize::new(160, 120), BACKGROUND))
        .unwrap();

    let report = render_loop.frame(0.0).unwrap();
    assert!(report.stats.drawn > 0);

    let buffer = render_loop.surface().unwrap();
    let covered = coverage(buffer);
    assert!(covered > 160 * 120 / 20, "only {covered} pixels drawn");
    assert!(covered < 160 * 120);

    // The figure stands in the middle of the frame
    assert_ne!(buffer.pixel(80, 60), Some(BACKGROUND));
    assert_eq!(buffer.pixel(0, 0), Some(BACKGROUND));
}

#[test]
fn camera_behind_target_shows_other_side() {
    let mut render_loop = RenderLoop::new(TestScheduler::default(), FrameInputs::default());
    render_loop
        .mount(PixelBuffer::new(SurfaceSize::new(80, 60), BACKGROUND))
        .unwrap();
    let front = render_loop.frame(0.0).unwrap().stats;

    render_loop.update_camera(CameraDefinition {
        position: Vec3::new(0.0, 0.9, -4.2),
        ..CameraDefinition::default()
    });
    let back = render_loop.frame(16.0).unwrap().stats;

    // Same meshes, so every face is still accounted for either way
    assert_eq!(front.drawn + front.culled, back.drawn + back.culled);
    assert!(back.drawn > 0);
}

#[test]
fn camera_facing_away_draws_nothing() {
    let mut render_loop = RenderLoop::new(TestScheduler::default(), FrameInputs::default());
    render_loop
        .mount(PixelBuffer::new(SurfaceSize::new(80, 60), BACKGROUND))
        .unwrap();
    // Looking straight away from the avatar
    render_loop.update_camera(CameraDefinition {
        position: Vec3::new(0.0, 0.5, 5.0),
        target: Vec3::new(0.0, 0.5, 10.0),
        fov: 50.0,
    });
    let report = render_loop.frame(0.0).unwrap();
    assert_eq!(report.stats.drawn, 0);
    assert_eq!(coverage(render_loop.surface().unwrap()), 0);
}

#[test]
fn dispose_clears_pending_frame() {
    let mut render_loop = RenderLoop::new(TestScheduler::default(), FrameInputs::default());
    render_loop
        .mount(PixelBuffer::new(SurfaceSize::new(40, 30), BACKGROUND))
        .unwrap();
    render_loop.frame(0.0);
    assert_eq!(render_loop.scheduler().pending, Some(2));

    render_loop.dispose();
    assert_eq!(render_loop.scheduler().pending, None);
    assert!(render_loop.frame(16.0).is_none());
}
