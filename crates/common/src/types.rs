use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One of the six discrete camera movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl MoveDirection {
    /// All directions, in the order the render loop polls them.
    pub const ALL: [MoveDirection; 6] = [
        MoveDirection::Forward,
        MoveDirection::Backward,
        MoveDirection::Left,
        MoveDirection::Right,
        MoveDirection::Up,
        MoveDirection::Down,
    ];

    /// Sign applied to the axis this direction moves along.
    pub fn sign(self) -> f32 {
        match self {
            MoveDirection::Forward | MoveDirection::Right | MoveDirection::Up => 1.0,
            MoveDirection::Backward | MoveDirection::Left | MoveDirection::Down => -1.0,
        }
    }
}

/// Framebuffer dimensions in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` when the viewport is degenerate
    /// (e.g. a minimised window).
    pub fn aspect(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }

    /// Centre of the viewport, used to seed the first cursor sample.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
