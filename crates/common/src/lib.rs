//! Shared plain types used across the meshview crates.

mod types;

pub use types::{MoveDirection, Viewport};
