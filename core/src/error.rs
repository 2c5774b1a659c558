//! Camera Errors

use thiserror::Error;

/// Errors raised while assembling a camera from its parameters. Ray
/// generation itself never fails once a camera has been built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    /// View direction is zero or parallel to the up vector.
    #[error("Degenerate camera basis: {0}")]
    DegenerateBasis(String),

    /// Malformed shutter curve.
    #[error("Invalid shutter curve: {0}")]
    InvalidCurve(String),

    /// Aperture parameters out of range.
    #[error("Invalid aperture: {0}")]
    InvalidAperture(String),

    /// Field of view, clipping planes or screen window out of range.
    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    /// Camera-to-world matrix is singular or mirrored.
    #[error("Invalid transform: {0}")]
    InvalidTransform(String),
}
