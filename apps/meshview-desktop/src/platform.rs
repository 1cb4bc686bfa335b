use crate::config::ViewerConfig;
use crate::error::StartupError;
use crate::keys::KeyBindings;
use meshview_common::MoveDirection;
use meshview_input::InputEvent;
use meshview_render::Platform;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

/// Pumps allowed for the platform to deliver `resumed` during startup.
const STARTUP_PUMPS: usize = 16;

/// Absolute cursor position synthesised from raw mouse motion, used while
/// the pointer is grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VirtualCursor {
    x: f64,
    y: f64,
}

impl VirtualCursor {
    fn moved_by(&mut self, dx: f64, dy: f64) -> InputEvent {
        self.x += dx;
        self.y += dy;
        InputEvent::MouseMoved {
            x: self.x,
            y: self.y,
        }
    }
}

/// Which winit event feeds mouse look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MotionSource {
    /// Raw `DeviceEvent::MouseMotion` deltas, accumulated into a
    /// [`VirtualCursor`]. Unbounded, so yaw can turn indefinitely.
    RawMotion,
    /// Absolute `WindowEvent::CursorMoved` positions, bounded by the window.
    CursorPosition,
}

/// Any grab, locked or confined, switches mouse look to raw motion: a
/// confined cursor stops at the window edge and a locked one never moves.
fn motion_source(grab: Option<CursorGrabMode>) -> MotionSource {
    match grab {
        Some(_) => MotionSource::RawMotion,
        None => MotionSource::CursorPosition,
    }
}

/// Window-side state driven by winit callbacks.
struct WindowState {
    attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    creation_error: Option<winit::error::OsError>,
    motion: MotionSource,
    cursor: VirtualCursor,
    held: HashSet<KeyCode>,
    events: Vec<InputEvent>,
}

impl WindowState {
    fn capture_cursor(&mut self, window: &Window) {
        let grab = [CursorGrabMode::Locked, CursorGrabMode::Confined]
            .into_iter()
            .find(|&mode| window.set_cursor_grab(mode).is_ok());
        window.set_cursor_visible(false);
        self.motion = motion_source(grab);
        match grab {
            Some(mode) => tracing::debug!(?mode, "cursor captured"),
            None => tracing::warn!("cursor grab unsupported, mouse look follows the window cursor"),
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                let window = Arc::new(window);
                self.capture_cursor(&window);
                self.window = Some(window);
            }
            Err(e) => {
                self.creation_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.events.push(InputEvent::CloseRequested),
            WindowEvent::Resized(size) => self.events.push(InputEvent::WindowResized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CursorMoved { position, .. } => {
                if self.motion == MotionSource::CursorPosition {
                    self.cursor = VirtualCursor {
                        x: position.x,
                        y: position.y,
                    };
                    self.events.push(InputEvent::MouseMoved {
                        x: position.x,
                        y: position.y,
                    });
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            self.held.insert(code);
                        }
                        ElementState::Released => {
                            self.held.remove(&code);
                        }
                    }
                }
            }
            // Release events are not delivered to an unfocused window.
            WindowEvent::Focused(false) => self.held.clear(),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.motion == MotionSource::RawMotion {
                let moved = self.cursor.moved_by(delta.0, delta.1);
                self.events.push(moved);
            }
        }
    }
}

/// winit-backed [`Platform`]: one window, polled without blocking.
pub struct WinitPlatform {
    state: WindowState,
    window: Arc<Window>,
    bindings: KeyBindings,
    epoch: Instant,
    event_loop: EventLoop<()>,
}

impl WinitPlatform {
    /// Create the event loop and the window, capturing and hiding the cursor.
    pub fn new(config: &ViewerConfig, bindings: KeyBindings) -> Result<Self, StartupError> {
        let mut event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let center = config.viewport.center();
        let mut state = WindowState {
            attributes: Window::default_attributes()
                .with_title(config.title.clone())
                .with_inner_size(PhysicalSize::new(
                    config.viewport.width,
                    config.viewport.height,
                )),
            window: None,
            creation_error: None,
            motion: MotionSource::CursorPosition,
            cursor: VirtualCursor {
                x: f64::from(center.x),
                y: f64::from(center.y),
            },
            held: HashSet::new(),
            events: Vec::new(),
        };

        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut state);
            if state.window.is_some() || state.creation_error.is_some() {
                break;
            }
            if let PumpStatus::Exit(_) = status {
                break;
            }
        }

        if let Some(e) = state.creation_error.take() {
            return Err(StartupError::Window(e));
        }
        let window = state.window.clone().ok_or(StartupError::NoWindow)?;
        tracing::info!(
            title = %config.title,
            width = config.viewport.width,
            height = config.viewport.height,
            "window created"
        );

        Ok(Self {
            state,
            window,
            bindings,
            epoch: Instant::now(),
            event_loop,
        })
    }

    pub fn window(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }
}

impl Platform for WinitPlatform {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn is_key_pressed(&self, direction: MoveDirection) -> bool {
        self.state.held.contains(&self.bindings.key_for(direction))
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state)
        {
            tracing::debug!(code, "event loop exited");
            self.state.events.push(InputEvent::CloseRequested);
        }
        std::mem::take(&mut self.state.events)
    }
}
