use crate::camera::{Camera, DEFAULT_MOVE_SPEED, DEFAULT_SENSITIVITY};
use crate::projection::Projection;
use glam::Mat4;
use meshview_common::{MoveDirection, Viewport};
use meshview_input::{FrameClock, InputEvent, MouseState};

/// The windowing collaborator as seen by the frame loop.
pub trait Platform {
    /// Seconds on a monotonic clock.
    fn now(&self) -> f64;

    fn is_key_pressed(&self, direction: MoveDirection) -> bool;

    /// Pump the platform's event queue and return what arrived since the
    /// last poll, in order.
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// Outcome of a single [`FrameRenderer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Drawn,
    /// The frame could not be drawn but rendering can continue (e.g. the
    /// surface was lost and has been reconfigured).
    Skipped,
}

/// Unrecoverable rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("GPU out of memory")]
    OutOfMemory,
    #[error("render backend failure: {0}")]
    Backend(String),
}

/// The three transform uniforms uploaded every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl FrameTransforms {
    /// Uniform names every shader program must expose.
    pub const UNIFORM_NAMES: [&'static str; 3] = ["model", "view", "projection"];

    /// Look up a matrix by its uniform name.
    pub fn by_name(&self, name: &str) -> Option<&Mat4> {
        match name {
            "model" => Some(&self.model),
            "view" => Some(&self.view),
            "projection" => Some(&self.projection),
            _ => None,
        }
    }
}

/// Draws the mesh for one frame.
pub trait FrameRenderer {
    /// Clear colour and depth, bind the program, upload `transforms`, and
    /// draw the full index range.
    fn render(&mut self, transforms: &FrameTransforms) -> Result<FrameStatus, RenderError>;

    /// Present the frame drawn by the last successful `render`.
    fn present(&mut self);

    /// Match the render target to a resized framebuffer.
    fn resize(&mut self, viewport: Viewport);
}

/// Tunables for camera control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    /// World units per second.
    pub move_speed: f32,
    /// Degrees per unit of cursor movement.
    pub mouse_sensitivity: f32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    ShuttingDown,
}

/// Totals reported when the loop exits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSummary {
    pub frames: u64,
    pub skipped: u64,
    pub elapsed: f64,
}

/// Per-frame driver: owns the camera, cursor tracker, frame clock and
/// projection, and feeds them from platform input.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    config: LoopConfig,
    camera: Camera,
    mouse: MouseState,
    clock: FrameClock,
    projection: Projection,
    model: Mat4,
    frames: u64,
    skipped: u64,
    started_at: f64,
}

impl RenderLoop {
    pub fn new(config: LoopConfig, viewport: Viewport) -> Self {
        Self {
            state: LoopState::Initializing,
            config,
            camera: Camera::default(),
            mouse: MouseState::new(viewport.center()),
            clock: FrameClock::default(),
            projection: Projection::new(viewport),
            model: Mat4::IDENTITY,
            frames: 0,
            skipped: 0,
            started_at: 0.0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Run frames until the platform reports a close request.
    ///
    /// A fatal render error also ends the loop; resources owned by the
    /// caller are released by their destructors either way.
    pub fn run<P: Platform, R: FrameRenderer>(
        &mut self,
        platform: &mut P,
        renderer: &mut R,
    ) -> Result<LoopSummary, RenderError> {
        self.started_at = platform.now();
        self.clock = FrameClock::new(self.started_at);
        self.state = LoopState::Running;
        tracing::info!("render loop running");

        while self.state == LoopState::Running {
            if let Err(e) = self.frame(platform, renderer) {
                self.state = LoopState::ShuttingDown;
                tracing::error!("render loop aborted: {e}");
                return Err(e);
            }
        }

        let summary = LoopSummary {
            frames: self.frames,
            skipped: self.skipped,
            elapsed: self.clock.last_frame() - self.started_at,
        };
        tracing::info!(
            frames = summary.frames,
            skipped = summary.skipped,
            elapsed = summary.elapsed,
            "render loop finished"
        );
        Ok(summary)
    }

    /// One iteration: advance the clock, apply held movement keys, draw,
    /// present, then dispatch pending events.
    pub fn frame<P: Platform, R: FrameRenderer>(
        &mut self,
        platform: &mut P,
        renderer: &mut R,
    ) -> Result<(), RenderError> {
        let _span = tracing::trace_span!("frame", n = self.frames).entered();

        let dt = self.clock.tick(platform.now());
        for direction in MoveDirection::ALL {
            if platform.is_key_pressed(direction) {
                self.camera
                    .translate(direction, self.config.move_speed, dt);
            }
        }

        match renderer.render(&self.transforms())? {
            FrameStatus::Drawn => {
                self.frames += 1;
                renderer.present();
            }
            FrameStatus::Skipped => {
                self.skipped += 1;
                tracing::debug!("frame skipped");
            }
        }

        for event in platform.poll_events() {
            self.handle_event(event, renderer);
        }
        Ok(())
    }

    pub fn handle_event<R: FrameRenderer>(&mut self, event: InputEvent, renderer: &mut R) {
        match event {
            InputEvent::MouseMoved { x, y } => {
                let (dx, dy) = self.mouse.offset(x, y);
                self.camera
                    .rotate(dx, dy, self.config.mouse_sensitivity);
            }
            InputEvent::WindowResized { width, height } => {
                let viewport = Viewport::new(width, height);
                renderer.resize(viewport);
                self.projection.resize(viewport);
                tracing::debug!(width, height, aspect = self.projection.aspect, "resized");
            }
            InputEvent::CloseRequested => {
                tracing::debug!("close requested");
                self.state = LoopState::ShuttingDown;
            }
        }
    }

    /// Model is fixed at identity; view follows the camera.
    pub fn transforms(&self) -> FrameTransforms {
        FrameTransforms {
            model: self.model,
            view: self.camera.view_matrix(),
            projection: self.projection.matrix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::cell::Cell;
    use std::collections::{HashSet, VecDeque};

    /// Replays a fixed script of clock samples, held keys and events. Once
    /// the event script runs out it requests close.
    struct ScriptedPlatform {
        times: Vec<f64>,
        cursor: Cell<usize>,
        keys: HashSet<MoveDirection>,
        events: VecDeque<Vec<InputEvent>>,
    }

    impl ScriptedPlatform {
        fn new(times: Vec<f64>, events: Vec<Vec<InputEvent>>) -> Self {
            Self {
                times,
                cursor: Cell::new(0),
                keys: HashSet::new(),
                events: events.into(),
            }
        }
    }

    impl Platform for ScriptedPlatform {
        fn now(&self) -> f64 {
            let i = self.cursor.get();
            self.cursor.set(i + 1);
            self.times[i.min(self.times.len() - 1)]
        }

        fn is_key_pressed(&self, direction: MoveDirection) -> bool {
            self.keys.contains(&direction)
        }

        fn poll_events(&mut self) -> Vec<InputEvent> {
            self.events
                .pop_front()
                .unwrap_or_else(|| vec![InputEvent::CloseRequested])
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        drawn: Vec<FrameTransforms>,
        presented: usize,
        resizes: Vec<Viewport>,
        skip_frames: HashSet<usize>,
        fail_on: Option<usize>,
        calls: usize,
    }

    impl FrameRenderer for RecordingRenderer {
        fn render(&mut self, transforms: &FrameTransforms) -> Result<FrameStatus, RenderError> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on == Some(call) {
                return Err(RenderError::OutOfMemory);
            }
            if self.skip_frames.contains(&call) {
                return Ok(FrameStatus::Skipped);
            }
            self.drawn.push(*transforms);
            Ok(FrameStatus::Drawn)
        }

        fn present(&mut self) {
            self.presented += 1;
        }

        fn resize(&mut self, viewport: Viewport) {
            self.resizes.push(viewport);
        }
    }

    fn new_loop() -> RenderLoop {
        RenderLoop::new(LoopConfig::default(), Viewport::new(800, 600))
    }

    #[test]
    fn starts_initializing() {
        assert_eq!(new_loop().state(), LoopState::Initializing);
    }

    #[test]
    fn runs_until_close_requested() {
        let mut platform = ScriptedPlatform::new(vec![0.0, 0.1, 0.2, 0.3], vec![vec![], vec![]]);
        let mut renderer = RecordingRenderer::default();
        let mut render_loop = new_loop();

        let summary = render_loop.run(&mut platform, &mut renderer).unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(renderer.drawn.len(), 3);
        assert_eq!(renderer.presented, 3);
        assert_eq!(render_loop.state(), LoopState::ShuttingDown);
        assert!((summary.elapsed - 0.3).abs() < 1e-9);
    }

    #[test]
    fn held_keys_move_by_delta_time() {
        let mut platform = ScriptedPlatform::new(vec![0.0, 0.5, 1.0], vec![vec![]]);
        platform.keys.insert(MoveDirection::Forward);
        let mut renderer = RecordingRenderer::default();
        let mut render_loop = new_loop();

        render_loop.run(&mut platform, &mut renderer).unwrap();

        // Two frames of 0.5s each at 2.5 units/s along -Z.
        assert!(render_loop
            .camera()
            .position()
            .abs_diff_eq(Vec3::new(0.0, 0.0, 2.5), 1e-5));
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut platform = ScriptedPlatform::new(vec![0.0, 0.25], vec![]);
        platform.keys.insert(MoveDirection::Left);
        platform.keys.insert(MoveDirection::Right);
        platform.keys.insert(MoveDirection::Up);
        let mut renderer = RecordingRenderer::default();
        let mut render_loop = new_loop();

        render_loop.run(&mut platform, &mut renderer).unwrap();

        let p = render_loop.camera().position();
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 0.625).abs() < 1e-5);
    }

    #[test]
    fn mouse_events_rotate_camera() {
        let events = vec![vec![
            InputEvent::MouseMoved { x: 123.0, y: 456.0 },
            InputEvent::MouseMoved { x: 223.0, y: 456.0 },
        ]];
        let mut platform = ScriptedPlatform::new(vec![0.0], events);
        let mut renderer = RecordingRenderer::default();
        let mut render_loop = new_loop();

        render_loop.run(&mut platform, &mut renderer).unwrap();

        assert!((render_loop.camera().yaw() - -80.0).abs() < 1e-5);
        assert_eq!(render_loop.camera().pitch(), 0.0);
        // The rotation lands in the second frame's view matrix.
        assert_ne!(renderer.drawn[0].view, renderer.drawn[1].view);
    }

    #[test]
    fn resize_recomputes_projection() {
        let events = vec![vec![InputEvent::WindowResized {
            width: 1600,
            height: 900,
        }]];
        let mut platform = ScriptedPlatform::new(vec![0.0], events);
        let mut renderer = RecordingRenderer::default();
        let mut render_loop = new_loop();

        render_loop.run(&mut platform, &mut renderer).unwrap();

        assert_eq!(renderer.resizes, vec![Viewport::new(1600, 900)]);
        assert!((render_loop.projection().aspect - 16.0 / 9.0).abs() < 1e-6);
        let expected = Projection::new(Viewport::new(1600, 900)).matrix();
        assert_eq!(renderer.drawn[1].projection, expected);
        assert_ne!(renderer.drawn[0].projection, expected);
    }

    #[test]
    fn model_is_identity() {
        let mut platform = ScriptedPlatform::new(vec![0.0], vec![]);
        let mut renderer = RecordingRenderer::default();
        new_loop().run(&mut platform, &mut renderer).unwrap();
        assert_eq!(renderer.drawn[0].model, Mat4::IDENTITY);
        assert_eq!(
            renderer.drawn[0].projection,
            Projection::new(Viewport::new(800, 600)).matrix()
        );
    }

    #[test]
    fn skipped_frames_are_not_presented() {
        let mut platform = ScriptedPlatform::new(vec![0.0], vec![vec![]]);
        let mut renderer = RecordingRenderer {
            skip_frames: HashSet::from([0]),
            ..Default::default()
        };
        let summary = new_loop().run(&mut platform, &mut renderer).unwrap();

        assert_eq!(summary.frames, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(renderer.presented, 1);
    }

    #[test]
    fn fatal_render_error_stops_loop() {
        let mut platform = ScriptedPlatform::new(vec![0.0], vec![vec![], vec![]]);
        let mut renderer = RecordingRenderer {
            fail_on: Some(1),
            ..Default::default()
        };
        let mut render_loop = new_loop();

        let err = render_loop.run(&mut platform, &mut renderer).unwrap_err();
        assert!(matches!(err, RenderError::OutOfMemory));
        assert_eq!(render_loop.state(), LoopState::ShuttingDown);
        assert_eq!(renderer.drawn.len(), 1);
    }

    #[test]
    fn transforms_resolve_by_uniform_name() {
        let t = new_loop().transforms();
        for name in FrameTransforms::UNIFORM_NAMES {
            assert!(t.by_name(name).is_some());
        }
        assert!(t.by_name("normal").is_none());
        assert_eq!(t.by_name("view"), Some(&t.view));
    }
}
