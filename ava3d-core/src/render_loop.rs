//! Frame-driven controller tying inputs, cached meshes and a surface together.
//!
//! The loop never schedules anything itself; it asks a host-provided
//! [`FrameScheduler`] for the next frame and the host calls
//! [`RenderLoop::frame`] when that frame fires.

use std::sync::Arc;

use crate::animation::FrameMotion;
use crate::avatar::AvatarMeshes;
use crate::compositor::{Compositor, FrameStats};
use crate::definition::{CameraDefinition, PoseDefinition, SceneDefinition, StyleDefinition};
use crate::error::RenderError;
use crate::projection::Camera;
use crate::surface::{Surface, SurfaceSize};

/// The host's "call me back next frame" primitive
pub trait FrameScheduler {
    type Handle;

    fn request_frame(&mut self) -> Result<Self::Handle, RenderError>;

    fn cancel_frame(&mut self, handle: Self::Handle);
}

#[derive(Debug, PartialEq, Eq)]
pub enum LoopState<H> {
    Idle,
    Running { pending: Option<H> },
}

/// Point-in-time input snapshots. Updates replace a whole value.
#[derive(Debug, Clone, Default)]
pub struct FrameInputs {
    pub style: Arc<StyleDefinition>,
    pub pose: Arc<PoseDefinition>,
    pub camera: Arc<CameraDefinition>,
}

impl From<SceneDefinition> for FrameInputs {
    fn from(scene: SceneDefinition) -> Self {
        Self {
            style: Arc::new(scene.style),
            pose: Arc::new(scene.pose),
            camera: Arc::new(scene.camera),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub stats: FrameStats,
    /// Seconds since the first frame after mount
    pub elapsed: f32,
}

pub struct RenderLoop<S, F: FrameScheduler> {
    scheduler: F,
    surface: Option<S>,
    state: LoopState<F::Handle>,
    inputs: FrameInputs,
    meshes: Option<AvatarMeshes>,
    compositor: Compositor,
    clock: Clock,
}

impl<S: Surface, F: FrameScheduler> RenderLoop<S, F> {
    pub fn new(scheduler: F, inputs: FrameInputs) -> Self {
        Self {
            scheduler,
            surface: None,
            state: LoopState::Idle,
            inputs,
            meshes: None,
            compositor: Compositor::new(),
            clock: Clock::default(),
        }
    }

    pub fn state(&self) -> &LoopState<F::Handle> {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    pub fn inputs(&self) -> &FrameInputs {
        &self.inputs
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Start animating on `surface` and request the first frame.
    pub fn mount(&mut self, surface: S) -> Result<(), RenderError> {
        if self.is_running() {
            return Err(RenderError::AlreadyMounted);
        }

        let handle = self.scheduler.request_frame()?;
        let size = surface.size();
        self.surface = Some(surface);
        self.state = LoopState::Running {
            pending: Some(handle),
        };
        self.clock.reset();
        tracing::info!(width = size.width, height = size.height, "render loop mounted");
        Ok(())
    }

    /// Stop animating: cancel the pending frame and release the surface.
    pub fn dispose(&mut self) {
        if let LoopState::Running { pending } = std::mem::replace(&mut self.state, LoopState::Idle)
        {
            if let Some(handle) = pending {
                self.scheduler.cancel_frame(handle);
            }
            tracing::info!("render loop disposed");
        }
        self.surface = None;
    }

    pub fn update_style(&mut self, style: StyleDefinition) {
        self.inputs.style = Arc::new(style);
        self.meshes = None;
    }

    pub fn update_pose(&mut self, pose: PoseDefinition) {
        self.inputs.pose = Arc::new(pose);
    }

    pub fn update_camera(&mut self, camera: CameraDefinition) {
        self.inputs.camera = Arc::new(camera);
    }

    /// Re-synchronize the surface's pixel size. Animation carries on.
    pub fn resize(&mut self, size: SurfaceSize) {
        if let Some(surface) = self.surface.as_mut() {
            if surface.size() != size {
                tracing::debug!(width = size.width, height = size.height, "surface resized");
                surface.resize(size);
            }
        }
    }

    /// Freeze animation time; frames keep rendering the same instant.
    pub fn set_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.clock.paused_at.is_some()
    }

    /// Run one scheduled frame and request the next one.
    ///
    /// Returns `None` without drawing when the loop is idle, e.g. a callback
    /// that fired after [`RenderLoop::dispose`].
    pub fn frame(&mut self, timestamp_ms: f64) -> Option<FrameReport> {
        match &mut self.state {
            LoopState::Running { pending } => {
                pending.take();
            }
            LoopState::Idle => return None,
        }
        let surface = self.surface.as_mut()?;

        let elapsed = self.clock.elapsed(timestamp_ms);
        let style = &self.inputs.style;
        let meshes = self
            .meshes
            .get_or_insert_with(|| AvatarMeshes::build(style));
        let motion = FrameMotion::sample(&self.inputs.pose, elapsed);
        let camera = Camera::from(self.inputs.camera.as_ref());
        let stats = self.compositor.render(meshes, &motion, &camera, surface);
        tracing::trace!(drawn = stats.drawn, culled = stats.culled, elapsed, "frame");

        if let LoopState::Running { pending } = &mut self.state {
            match self.scheduler.request_frame() {
                Ok(handle) => *pending = Some(handle),
                Err(err) => {
                    tracing::warn!(%err, "next frame could not be scheduled, stopping");
                    self.state = LoopState::Idle;
                }
            }
        }

        Some(FrameReport { stats, elapsed })
    }
}

/// Animation time measured from the first frame after mount
#[derive(Debug, Default)]
struct Clock {
    epoch_ms: Option<f64>,
    last_ms: f64,
    paused_at: Option<f32>,
}

impl Clock {
    fn reset(&mut self) {
        self.epoch_ms = None;
    }

    fn seconds_at(&self, timestamp_ms: f64) -> f32 {
        self.epoch_ms
            .map_or(0.0, |epoch| ((timestamp_ms - epoch) / 1000.0) as f32)
    }

    fn elapsed(&mut self, timestamp_ms: f64) -> f32 {
        self.epoch_ms.get_or_insert(timestamp_ms);
        self.last_ms = timestamp_ms;
        self.paused_at
            .unwrap_or_else(|| self.seconds_at(timestamp_ms))
    }

    fn set_paused(&mut self, paused: bool) {
        match (paused, self.paused_at) {
            (true, None) => self.paused_at = Some(self.seconds_at(self.last_ms)),
            (false, Some(at)) => {
                if self.epoch_ms.is_some() {
                    self.epoch_ms = Some(self.last_ms - f64::from(at) * 1000.0);
                }
                self.paused_at = None;
            }
            _ => {}
        }
    }
}
