//! The [`ProjectionError`] type returned by the checked projection
//! constructors.

use thiserror::Error;

/// Errors returned by the checked projection constructors
/// ([`Mat4::try_frustum`] and [`Mat4::try_perspective`]).
///
/// The unchecked constructors never fail; they document their preconditions
/// and leave degenerate numeric output as the symptom of violating them.
///
/// [`Mat4::try_frustum`]: crate::Mat4::try_frustum
/// [`Mat4::try_perspective`]: crate::Mat4::try_perspective
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    /// Clip distances that cannot form a perspective depth range.
    #[error("invalid depth range: near {near} and far {far} must be positive with far > near")]
    DepthRange {
        /// Near clip distance as passed by the caller.
        near: f32,
        /// Far clip distance as passed by the caller.
        far: f32,
    },

    /// Left/right or bottom/top clipping planes that coincide.
    #[error("clipping planes describe an empty volume ({left}..{right} x {bottom}..{top})")]
    DegeneratePlanes {
        /// Left vertical clipping plane.
        left: f32,
        /// Right vertical clipping plane.
        right: f32,
        /// Bottom horizontal clipping plane.
        bottom: f32,
        /// Top horizontal clipping plane.
        top: f32,
    },

    /// Vertical field of view outside the open interval (0, 180) degrees.
    #[error("field of view must be between 0 and 180 degrees, got {0}")]
    FieldOfView(f32),

    /// Aspect ratio that is zero or negative.
    #[error("aspect ratio must be positive, got {0}")]
    AspectRatio(f32),
}
