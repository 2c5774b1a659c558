//! Core

#[macro_use]
extern crate log;

// Re-export.
pub mod camera;
pub mod error;
pub mod geometry;
pub mod paramset;
pub mod pbrt;
pub mod sampling;
