use glam::Vec2;

/// Tracks the last observed cursor position and converts absolute cursor
/// samples into look offsets.
///
/// Screen-space y grows downward while pitch grows upward, so the returned
/// y offset is inverted: moving the cursor up yields a positive offset.
#[derive(Debug, Clone)]
pub struct MouseState {
    last: Vec2,
    first_sample: bool,
}

impl MouseState {
    /// Create a tracker seeded at `origin` (normally the window centre).
    pub fn new(origin: Vec2) -> Self {
        Self {
            last: origin,
            first_sample: true,
        }
    }

    /// Record a cursor sample and return `(xoffset, yoffset)` since the
    /// previous one. The first sample only seeds the position and returns
    /// a zero offset, suppressing the jump from the seed to the real cursor.
    pub fn offset(&mut self, x: f64, y: f64) -> (f32, f32) {
        let pos = Vec2::new(x as f32, y as f32);
        if self.first_sample {
            self.last = pos;
            self.first_sample = false;
            tracing::trace!(x, y, "first cursor sample");
        }

        let xoffset = pos.x - self.last.x;
        let yoffset = self.last.y - pos.y;
        self.last = pos;
        (xoffset, yoffset)
    }

}

impl Default for MouseState {
    fn default() -> Self {
        Self::new(Vec2::new(400.0, 300.0))
    }
}
