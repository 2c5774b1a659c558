//! Geometry
use super::pbrt::*;

// Define macros for property based testing.
#[cfg(test)]
#[macro_export]
macro_rules! prop_range {
    ($name: ident, $t: ty, $r: expr) => {
        prop_compose! {
            fn $name()(f in $r) -> $t {
                f
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_vector3 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> $crate::geometry::Vector3<$t> {
                $crate::geometry::Vector3 { x, y, z }
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_point2 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr) -> $crate::geometry::Point2<$t> {
                $crate::geometry::Point2 { x, y }
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_point3 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> $crate::geometry::Point3<$t> {
                $crate::geometry::Point3 { x, y, z }
            }
        }
    };
}

mod animated_transform;
mod bounds2;
mod common;
mod matrix4x4;
mod point2;
mod point3;
mod quaternion;
mod ray;
mod transform;
mod vector3;

// Re-export
pub use animated_transform::*;
pub use bounds2::*;
pub use common::*;
pub use matrix4x4::*;
pub use point2::*;
pub use point3::*;
pub use quaternion::*;
pub use ray::*;
pub use transform::*;
pub use vector3::*;
