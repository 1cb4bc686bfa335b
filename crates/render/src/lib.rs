//! Renderer-agnostic core of the viewer.
//!
//! # Invariants
//! - Camera front is unit length and pitch stays within [-89, 89] degrees.
//! - The frame loop owns all mutable camera and input state; nothing else
//!   writes it.
//! - GPU work goes through the [`ShaderBackend`] and [`FrameRenderer`]
//!   traits, so a backend can be swapped without touching the loop.

mod camera;
mod frame_loop;
mod projection;
mod shader;

pub use camera::{Camera, DEFAULT_MOVE_SPEED, DEFAULT_SENSITIVITY, PITCH_LIMIT};
pub use frame_loop::{
    FrameRenderer, FrameStatus, FrameTransforms, LoopConfig, LoopState, LoopSummary, Platform,
    RenderError, RenderLoop,
};
pub use projection::Projection;
pub use shader::{ShaderBackend, ShaderError, ShaderProgramBuilder, StageKind};
