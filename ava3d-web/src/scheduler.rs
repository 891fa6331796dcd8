//! `requestAnimationFrame` based frame scheduling.

use std::cell::RefCell;
use std::rc::Rc;

use ava3d_core::{FrameScheduler, RenderError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Shared slot for the per-frame callback. Filled once the loop that the
/// callback drives exists.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Result<i32, RenderError> {
        let slot = self.callback.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| RenderError::Schedule("frame callback not installed".to_string()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|err| RenderError::Schedule(format!("{err:?}")))
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            web_sys::console::warn_2(&"cancelAnimationFrame failed".into(), &err);
        }
    }
}
