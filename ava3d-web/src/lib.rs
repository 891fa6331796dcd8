/// AVA3D Web - avatar rendered onto an HTML canvas through the 2D context
///
/// The core pipeline runs in WASM; each frame is painted with canvas path
/// fills and paced by `requestAnimationFrame`.
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ava3d_core::{
    CameraDefinition, FrameInputs, PoseDefinition, RenderError, RenderLoop, StyleDefinition,
};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, ResizeObserver};

pub mod scheduler;
pub mod surface;

pub use scheduler::{AnimationFrameScheduler, FrameCallback};
pub use surface::CanvasSurface;

type WebLoop = RenderLoop<CanvasSurface, AnimationFrameScheduler>;

/// Keeps the observer and its callback alive together
struct ResizeWatch {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

/// Avatar view bound to one canvas element
#[wasm_bindgen]
pub struct AvatarCanvas {
    state: Rc<RefCell<WebLoop>>,
    frame_callback: FrameCallback,
    resize_watch: Option<ResizeWatch>,
}

#[wasm_bindgen]
impl AvatarCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<AvatarCanvas, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = AnimationFrameScheduler::new(window, frame_callback.clone());
        let state = Rc::new(RefCell::new(RenderLoop::new(scheduler, FrameInputs::default())));

        let weak = Rc::downgrade(&state);
        *frame_callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            with_loop(&weak, |render_loop| {
                render_loop.frame(timestamp);
            });
        }));

        Ok(Self {
            state,
            frame_callback,
            resize_watch: None,
        })
    }

    /// Start rendering into the canvas with the given element id.
    pub fn mount(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        self.try_mount(canvas_id).map_err(|err| {
            web_sys::console::error_2(&"ava3d: mount failed".into(), &err);
            err
        })
    }

    pub fn set_style_json(&mut self, json: &str) -> Result<(), JsValue> {
        let style = StyleDefinition::from_json(json).map_err(to_js_error)?;
        self.state.borrow_mut().update_style(style);
        Ok(())
    }

    pub fn set_pose_json(&mut self, json: &str) -> Result<(), JsValue> {
        let pose = PoseDefinition::from_json(json).map_err(to_js_error)?;
        self.state.borrow_mut().update_pose(pose);
        Ok(())
    }

    pub fn set_camera_json(&mut self, json: &str) -> Result<(), JsValue> {
        let camera = CameraDefinition::from_json(json).map_err(to_js_error)?;
        self.state.borrow_mut().update_camera(camera);
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state.borrow_mut().set_paused(paused);
    }

    /// Re-read the canvas layout size. Called automatically on resize.
    pub fn resize(&mut self) {
        resize_to_layout(&mut self.state.borrow_mut());
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.state.borrow().is_running()
    }

    /// Stop rendering and release the canvas. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(watch) = self.resize_watch.take() {
            watch.observer.disconnect();
        }
        if let Ok(mut render_loop) = self.state.try_borrow_mut() {
            render_loop.dispose();
        }
    }
}

impl AvatarCanvas {
    fn try_mount(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .ok_or("no window")?
            .document()
            .ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;

        let surface = CanvasSurface::new(canvas.clone()).map_err(to_js_error)?;
        {
            let mut render_loop = self.state.borrow_mut();
            render_loop.mount(surface).map_err(to_js_error)?;
            resize_to_layout(&mut render_loop);
        }

        self.watch_resizes(&canvas)
    }

    fn watch_resizes(&mut self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.state);
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
            with_loop(&weak, resize_to_layout);
        });
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(canvas);

        if let Some(previous) = self.resize_watch.replace(ResizeWatch {
            observer,
            _callback: callback,
        }) {
            previous.observer.disconnect();
        }
        Ok(())
    }
}

impl Drop for AvatarCanvas {
    fn drop(&mut self) {
        self.dispose();
        // Nothing can fire the frame callback once the loop is disposed
        self.frame_callback.borrow_mut().take();
    }
}

/// Run `f` on the loop if it is still alive and not already borrowed.
fn with_loop(weak: &Weak<RefCell<WebLoop>>, f: impl FnOnce(&mut WebLoop)) {
    if let Some(state) = weak.upgrade() {
        if let Ok(mut render_loop) = state.try_borrow_mut() {
            f(&mut render_loop);
        }
    }
}

fn resize_to_layout(render_loop: &mut WebLoop) {
    if let Some(size) = render_loop.surface().map(CanvasSurface::measure) {
        render_loop.resize(size);
    }
}

fn to_js_error(err: RenderError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    Ok(())
}
