/// A window or input event produced by the platform during the poll step.
///
/// Events are dispatched synchronously by the render loop, in arrival order,
/// before the next frame is rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute window position.
    MouseMoved { x: f64, y: f64 },
    /// Framebuffer was resized.
    WindowResized { width: u32, height: u32 },
    /// The user asked to close the window.
    CloseRequested,
}

