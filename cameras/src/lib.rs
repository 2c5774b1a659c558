//! Camera

#[macro_use]
extern crate log;

mod distortion;
mod handle;
mod lens;
mod params;
mod perspective_camera;
mod pose;
mod projection;
mod shutter;

// Re-export
pub use distortion::*;
pub use handle::*;
pub use lens::*;
pub use params::*;
pub use perspective_camera::*;
pub use pose::*;
pub use projection::*;
pub use shutter::*;
