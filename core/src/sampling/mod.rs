//! Sampling

use super::geometry::*;
use super::pbrt::*;

mod common;
mod distribution_1d;

pub use common::*;
pub use distribution_1d::*;
