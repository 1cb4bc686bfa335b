/// Per-frame timer deriving delta-time from successive clock samples.
///
/// Times are seconds on a monotonic clock supplied by the platform.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: f64,
}

impl FrameClock {
    /// Create a clock whose previous-frame time is `start`, so the first
    /// tick yields the (near-zero) time elapsed since startup.
    pub fn new(start: f64) -> Self {
        Self {
            last_frame: start,
        }
    }

    /// Sample the clock at `now` and return the delta-time since the last
    /// frame. A sample earlier than the previous one yields zero.
    pub fn tick(&mut self, now: f64) -> f32 {
        let delta = (now - self.last_frame).max(0.0);
        self.last_frame = now.max(self.last_frame);
        delta as f32
    }

    pub fn last_frame(&self) -> f64 {
        self.last_frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_at_start_is_zero() {
        let mut clock = FrameClock::new(3.0);
        assert_eq!(clock.tick(3.0), 0.0);
    }

    #[test]
    fn ticks_measure_elapsed_time() {
        let mut clock = FrameClock::new(0.0);
        clock.tick(0.5);
        let dt = clock.tick(0.75);
        assert!((dt - 0.25).abs() < 1e-6);
        assert_eq!(clock.last_frame(), 0.75);
    }

    #[test]
    fn backwards_sample_never_goes_negative() {
        let mut clock = FrameClock::new(0.0);
        clock.tick(2.0);
        assert_eq!(clock.tick(1.0), 0.0);
        // The previous-frame time does not move backwards either.
        assert!((clock.tick(2.5) - 0.5).abs() < 1e-6);
    }
}
