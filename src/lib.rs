//! Math utilities and types for feeding transformation matrices to a 3D
//! rendering pipeline.
//!
//! This crate provides a row-major 4x4 matrix type with the transformation
//! helpers a vertex pipeline needs: scaling, translation, axis-angle
//! rotation, matrix multiplication, and perspective / orthographic /
//! frustum projections. All types are designed to be compatible with GPU
//! memory layouts, so a finished matrix can be uploaded to a shader uniform
//! byte-for-byte.
//!
//! # Module Organization
//!
//! - [`mat`] module contains the [`Mat4`] type and all matrix operations
//! - [`vec`] module contains the [`Vec3`] type and vector operations
//! - [`error`] module contains [`ProjectionError`], returned by the checked
//!   projection constructors
//! - Angle conversions are provided at root level; angles are degrees
//!   everywhere on the public surface
//!
//! # Example
//! ```
//! use mat4::{Mat4, Vec3};
//!
//! let model = Mat4::identity()
//!     .rotate(45.0, Vec3::new(0.0, 1.0, 0.0))
//!     .translate(0.0, 0.0, -5.0);
//! let mvp = Mat4::perspective(60.0, 16.0 / 9.0, 1.0, 100.0).multiply(&model);
//!
//! // 16 floats, row-major, ready for a uniform buffer.
//! assert_eq!(mvp.as_bytes().len(), 64);
//! ```

#![warn(missing_docs)]
pub mod error;
pub mod mat;
pub mod vec;

pub use error::ProjectionError;
pub use mat::Mat4;
pub use vec::Vec3;

/// Converts degrees to radians.
///
/// This handles angle wrapping by first normalizing the input to the range
/// (-360, 360).
///
/// # Example
/// ```
/// use mat4::deg_to_rad;
///
/// assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
/// assert!((deg_to_rad(540.0) - std::f32::consts::PI).abs() < 1e-6);
/// ```
pub fn deg_to_rad(degrees: f32) -> f32 {
    (degrees % 360.0) * (std::f32::consts::PI / 180.0)
}

/// Converts radians to degrees.
///
/// This handles angle wrapping by first normalizing the input to the range
/// (-2π, 2π).
///
/// # Example
/// ```
/// use mat4::rad_to_deg;
///
/// assert!((rad_to_deg(std::f32::consts::PI) - 180.0).abs() < 1e-4);
/// ```
pub fn rad_to_deg(radians: f32) -> f32 {
    (radians % (2.0 * std::f32::consts::PI)) * (180.0 / std::f32::consts::PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn degree_conversions_wrap_full_turns() {
        assert!((deg_to_rad(90.0) - PI / 2.0).abs() < 1e-6);
        assert!((deg_to_rad(360.0 + 90.0) - PI / 2.0).abs() < 1e-6);
        assert_eq!(deg_to_rad(0.0), 0.0);
    }

    #[test]
    fn radian_conversions_wrap_full_turns() {
        assert!((rad_to_deg(PI / 2.0) - 90.0).abs() < 1e-4);
        assert!((rad_to_deg(2.0 * PI + PI / 2.0) - 90.0).abs() < 1e-3);
    }
}
