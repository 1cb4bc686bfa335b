//! Input handling for the viewer: discrete window events, cursor delta
//! tracking and frame timing.
//!
//! # Invariants
//! - Platform callbacks are turned into [`InputEvent`] values; nothing here
//!   mutates camera state directly.
//! - The first cursor sample never produces a rotation.
//! - Frame delta-time is never negative.

pub mod clock;
pub mod event;
pub mod mouse;

pub use clock::FrameClock;
pub use event::InputEvent;
pub use mouse::MouseState;
