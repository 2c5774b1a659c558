//! Numeric foundations shared by the geometry and camera code.

mod clamp;
mod common;

// Re-export
pub use clamp::*;
pub use common::*;
