/// Terminal host for the avatar renderer
use ava3d_core::{FrameInputs, FrameScheduler, RenderError, RenderLoop, SceneDefinition};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod orbit;
pub mod renderer;
pub mod snapshot;

pub use orbit::Orbit;
pub use renderer::BlockRenderer;
pub use snapshot::{render_snapshot, save_png};

const ORBIT_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 1.1;

/// Frame pacing against the wall clock at a fixed rate
#[derive(Debug)]
pub struct TickScheduler {
    interval: Duration,
    deadline: Option<Instant>,
}

impl TickScheduler {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            deadline: None,
        }
    }

    /// Time left before the pending frame is due, if one is pending.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl FrameScheduler for TickScheduler {
    type Handle = Instant;

    fn request_frame(&mut self) -> Result<Instant, RenderError> {
        let deadline = Instant::now() + self.interval;
        self.deadline = Some(deadline);
        Ok(deadline)
    }

    fn cancel_frame(&mut self, handle: Instant) {
        if self.deadline == Some(handle) {
            self.deadline = None;
        }
    }
}

/// Main application struct for the terminal avatar viewer
pub struct TerminalApp {
    render_loop: RenderLoop<BlockRenderer, TickScheduler>,
    orbit: Orbit,
    started: Instant,
    last_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: SceneDefinition, fps: u32) -> Self {
        let orbit = Orbit::from_camera(&scene.camera);
        let now = Instant::now();

        Self {
            render_loop: RenderLoop::new(TickScheduler::new(fps), FrameInputs::from(scene)),
            orbit,
            started: now,
            last_sample: now,
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let (columns, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;

        let result = self.while_mounted(columns, rows, |app| {
            execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
            Ok(app.main_loop()?)
        });

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    /// Mount a `columns` x `rows` renderer, run `body`, then dispose the loop
    /// whether or not `body` succeeded.
    fn while_mounted(
        &mut self,
        columns: u16,
        rows: u16,
        body: impl FnOnce(&mut Self) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        self.render_loop.mount(BlockRenderer::new(columns, rows))?;
        let result = body(self);
        self.render_loop.dispose();
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.render_loop.is_running() {
            let wait = self
                .render_loop
                .scheduler()
                .time_until_due(Instant::now())
                .unwrap_or(Duration::ZERO);

            if event::poll(wait)? {
                self.handle_event(event::read()?);
                continue;
            }

            let timestamp_ms = self.started.elapsed().as_secs_f64() * 1000.0;
            if self.render_loop.frame(timestamp_ms).is_some() {
                self.present()?;
                self.count_frame();
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(columns, rows) => {
                self.render_loop
                    .resize(BlockRenderer::size_for(columns, rows));
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let moved = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.render_loop.dispose();
                false
            }
            KeyCode::Char(' ') => {
                let paused = !self.render_loop.is_paused();
                self.render_loop.set_paused(paused);
                false
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.orbit.rotate(-ORBIT_STEP, 0.0);
                true
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.orbit.rotate(ORBIT_STEP, 0.0);
                true
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.orbit.rotate(0.0, ORBIT_STEP);
                true
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.orbit.rotate(0.0, -ORBIT_STEP);
                true
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.orbit.zoom(1.0 / ZOOM_STEP);
                true
            }
            KeyCode::Char('-') => {
                self.orbit.zoom(ZOOM_STEP);
                true
            }
            _ => false,
        };

        if moved {
            self.render_loop.update_camera(self.orbit.camera());
        }
    }

    fn present(&self) -> io::Result<()> {
        let Some(renderer) = self.render_loop.surface() else {
            return Ok(());
        };

        let mut stdout = stdout().lock();
        renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let status = if self.render_loop.is_paused() {
            " [paused]"
        } else {
            ""
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "AVA3D | FPS: {:.1}{} | Arrows=Orbit +/-=Zoom Space=Pause Q=Quit",
                self.fps, status
            )),
            ResetColor
        )?;

        stdout.flush()
    }

    fn count_frame(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        let window = now - self.last_sample;
        if window.as_secs() >= 1 {
            self.fps = self.frame_count as f32 / window.as_secs_f32();
            tracing::trace!(fps = self.fps, "frame rate sample");
            self.frame_count = 0;
            self.last_sample = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ava3d_core::{CameraDefinition, LoopState, Surface, SurfaceSize};

    fn mounted_app() -> TerminalApp {
        let mut app = TerminalApp::new(SceneDefinition::default(), 30);
        app.render_loop.mount(BlockRenderer::new(20, 10)).unwrap();
        app
    }

    fn press(app: &mut TerminalApp, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, event::KeyModifiers::NONE)));
    }

    #[test]
    fn test_scheduler_deadline_and_cancel() {
        let mut scheduler = TickScheduler::new(50);
        assert!(scheduler.time_until_due(Instant::now()).is_none());

        let handle = scheduler.request_frame().unwrap();
        let wait = scheduler.time_until_due(Instant::now()).unwrap();
        assert!(wait <= Duration::from_millis(20));

        scheduler.cancel_frame(handle);
        assert!(scheduler.time_until_due(Instant::now()).is_none());
    }

    #[test]
    fn test_stale_cancel_keeps_newer_deadline() {
        let mut scheduler = TickScheduler::new(30);
        let old = scheduler.request_frame().unwrap();
        std::thread::sleep(Duration::from_millis(1));
        scheduler.request_frame().unwrap();
        scheduler.cancel_frame(old);
        assert!(scheduler.time_until_due(Instant::now()).is_some());
    }

    #[test]
    fn test_arrow_keys_orbit_camera() {
        let mut app = mounted_app();
        let before = app.render_loop.inputs().camera.position;
        press(&mut app, KeyCode::Right);
        let after = app.render_loop.inputs().camera.position;
        assert!((after - before).norm() > 1e-3);
        assert_eq!(
            app.render_loop.inputs().camera.target,
            CameraDefinition::default().target
        );
    }

    #[test]
    fn test_zoom_moves_camera_closer() {
        let mut app = mounted_app();
        let distance = |app: &TerminalApp| {
            let camera = &app.render_loop.inputs().camera;
            (camera.position - camera.target).norm()
        };
        let before = distance(&app);
        press(&mut app, KeyCode::Char('+'));
        assert!(distance(&app) < before);
    }

    #[test]
    fn test_space_toggles_pause() {
        let mut app = mounted_app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.render_loop.is_paused());
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.render_loop.is_paused());
    }

    #[test]
    fn test_quit_disposes_loop() {
        let mut app = mounted_app();
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.render_loop.state(), &LoopState::Idle);
        assert!(app.render_loop.scheduler().time_until_due(Instant::now()).is_none());
    }

    #[test]
    fn test_failed_session_leaves_loop_disposed() {
        let mut app = TerminalApp::new(SceneDefinition::default(), 30);
        let result = app.while_mounted(20, 10, |app| {
            assert!(app.render_loop.is_running());
            anyhow::bail!("terminal setup failed")
        });

        assert!(result.is_err());
        assert_eq!(app.render_loop.state(), &LoopState::Idle);
        assert!(app.render_loop.surface().is_none());
        assert!(app.render_loop.scheduler().time_until_due(Instant::now()).is_none());

        // The app can be mounted again afterwards
        assert!(app.while_mounted(20, 10, |_| Ok(())).is_ok());
    }

    #[test]
    fn test_resize_event_resizes_surface() {
        let mut app = mounted_app();
        app.handle_event(Event::Resize(40, 12));
        let size = app.render_loop.surface().unwrap().size();
        assert_eq!(size, SurfaceSize::new(40, 24));
        assert!(app.render_loop.is_running());
    }
}
