//! The [`Mat4`] transformation matrix and its operations.
//!
//! Matrices are row-major (`m[row][col]`) and use the row-vector convention:
//! translation lives in row 3, and composing a transform onto an existing
//! matrix means pre-multiplying it (`new = transform * current`). The flat
//! element order therefore matches what a GL-style shader uniform expects.

use crate::deg_to_rad;
use crate::error::ProjectionError;
use crate::vec::Vec3;
use std::ops::Mul;

/// A 4x4 transformation matrix in homogeneous coordinates.
///
/// Any 16 floats are a structurally valid value; semantic validity
/// (orthogonality, invertibility) is the caller's responsibility. The type
/// is plain `Copy` data and can be viewed as 64 contiguous bytes for
/// uploading to a shader uniform (see [`Mat4::as_bytes`]).
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Mat4 {
    /// The identity matrix.
    pub fn identity() -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A scale by (sx, sy, sz). Negative factors mirror an axis and zero
    /// collapses it; both are legal inputs.
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A translation by (tx, ty, tz).
    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, tz, 1.0],
        ])
    }

    /// A rotation by `angle_in_degrees` about `axis`.
    ///
    /// The axis does not need to be unit length; it is normalized here so a
    /// non-unit axis cannot skew the transform. A zero-length axis has no
    /// direction to rotate about and yields the identity matrix.
    pub fn rotation(angle_in_degrees: f32, axis: Vec3) -> Mat4 {
        let mag = axis.length();
        if mag == 0.0 {
            return Mat4::identity();
        }

        let radians = deg_to_rad(angle_in_degrees);
        let s = radians.sin();
        let c = radians.cos();
        let one_minus_cos = 1.0 - c;

        let x = axis.x() / mag;
        let y = axis.y() / mag;
        let z = axis.z() / mag;

        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, yz, zx) = (x * y, y * z, z * x);
        let (xs, ys, zs) = (x * s, y * s, z * s);

        Mat4([
            [
                one_minus_cos * xx + c,
                one_minus_cos * xy - zs,
                one_minus_cos * zx + ys,
                0.0,
            ],
            [
                one_minus_cos * xy + zs,
                one_minus_cos * yy + c,
                one_minus_cos * yz - xs,
                0.0,
            ],
            [
                one_minus_cos * zx - ys,
                one_minus_cos * yz + xs,
                one_minus_cos * zz + c,
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A rotation by `angle_in_degrees` about the x axis.
    pub fn rotation_x(angle_in_degrees: f32) -> Mat4 {
        let c = deg_to_rad(angle_in_degrees).cos();
        let s = deg_to_rad(angle_in_degrees).sin();
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A rotation by `angle_in_degrees` about the y axis.
    pub fn rotation_y(angle_in_degrees: f32) -> Mat4 {
        let c = deg_to_rad(angle_in_degrees).cos();
        let s = deg_to_rad(angle_in_degrees).sin();
        Mat4([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A rotation by `angle_in_degrees` about the z axis.
    pub fn rotation_z(angle_in_degrees: f32) -> Mat4 {
        let c = deg_to_rad(angle_in_degrees).cos();
        let s = deg_to_rad(angle_in_degrees).sin();
        Mat4([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A general (possibly asymmetric) perspective projection from six
    /// clipping-plane coordinates, mapping the frustum to the canonical
    /// -1..1 clip volume.
    ///
    /// `near` and `far` must both be positive and the plane pairs must not
    /// coincide; this is not checked here, and violating it produces a
    /// degenerate matrix (infinite or NaN entries). Use
    /// [`Mat4::try_frustum`] to have those preconditions validated.
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let delta_x = right - left;
        let delta_y = top - bottom;
        let delta_z = far - near;

        Mat4([
            [2.0 * near / delta_x, 0.0, 0.0, 0.0],
            [0.0, 2.0 * near / delta_y, 0.0, 0.0],
            [
                (right + left) / delta_x,
                (top + bottom) / delta_y,
                -(near + far) / delta_z,
                -1.0,
            ],
            [0.0, 0.0, -2.0 * near * far / delta_z, 0.0],
        ])
    }

    /// Checked variant of [`Mat4::frustum`].
    pub fn try_frustum(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Mat4, ProjectionError> {
        if near <= 0.0 || far <= near {
            return Err(ProjectionError::DepthRange { near, far });
        }
        if left == right || bottom == top {
            return Err(ProjectionError::DegeneratePlanes {
                left,
                right,
                bottom,
                top,
            });
        }

        Ok(Mat4::frustum(left, right, bottom, top, near, far))
    }

    /// A symmetric perspective projection from a vertical field of view (in
    /// degrees), an aspect ratio (width / height), and near/far clip
    /// distances.
    ///
    /// The frustum's half-height is `tan(fovy / 2) * near` and its
    /// half-width follows from `aspect`; construction then goes through
    /// [`Mat4::frustum`], along with its preconditions (`near > 0`,
    /// `far > near`, `aspect > 0`, fovy in (0, 180)). Use
    /// [`Mat4::try_perspective`] to have them validated.
    pub fn perspective(fovy_in_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let half_height = (deg_to_rad(fovy_in_degrees) * 0.5).tan() * near;
        let half_width = half_height * aspect;

        Mat4::frustum(-half_width, half_width, -half_height, half_height, near, far)
    }

    /// Checked variant of [`Mat4::perspective`].
    pub fn try_perspective(
        fovy_in_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Mat4, ProjectionError> {
        if fovy_in_degrees <= 0.0 || fovy_in_degrees >= 180.0 {
            return Err(ProjectionError::FieldOfView(fovy_in_degrees));
        }
        if aspect <= 0.0 {
            return Err(ProjectionError::AspectRatio(aspect));
        }
        if near <= 0.0 || far <= near {
            return Err(ProjectionError::DepthRange { near, far });
        }

        Ok(Mat4::perspective(fovy_in_degrees, aspect, near, far))
    }

    /// An orthographic (parallel) projection mapping the given box to the
    /// canonical -1..1 clip volume.
    ///
    /// Unlike [`Mat4::frustum`], `near` and `far` may be negative (planes
    /// behind the viewer are meaningful for a parallel projection), so
    /// there is no checked variant.
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let delta_x = right - left;
        let delta_y = top - bottom;
        let delta_z = far - near;

        Mat4([
            [2.0 / delta_x, 0.0, 0.0, 0.0],
            [0.0, 2.0 / delta_y, 0.0, 0.0],
            [0.0, 0.0, -2.0 / delta_z, 0.0],
            [
                -(right + left) / delta_x,
                -(top + bottom) / delta_y,
                -(near + far) / delta_z,
                1.0,
            ],
        ])
    }

    /// Standard row-by-column matrix product, `self * other`.
    ///
    /// The product is accumulated into a fresh temporary and returned as a
    /// new value, so the operands are never observed mid-write.
    pub fn multiply(&self, other: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[i][k] * other.0[k][j]).sum();
            }
        }
        Mat4(result)
    }

    /// Composes a scale onto this matrix, returning `scaling * self`.
    pub fn scale(&self, sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4::scaling(sx, sy, sz).multiply(self)
    }

    /// Composes a translation onto this matrix, returning
    /// `translation * self`.
    pub fn translate(&self, tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4::translation(tx, ty, tz).multiply(self)
    }

    /// Composes an axis-angle rotation onto this matrix, returning
    /// `rotation * self`. A zero-length axis leaves the matrix unchanged.
    pub fn rotate(&self, angle_in_degrees: f32, axis: Vec3) -> Mat4 {
        Mat4::rotation(angle_in_degrees, axis).multiply(self)
    }

    /// Inverts an affine transform (linear 3x3 part plus translation).
    ///
    /// Returns the identity matrix when the linear part is singular. Only
    /// the affine block is considered; projection rows are ignored.
    pub fn inverse(&self) -> Mat4 {
        let m = self.0;

        // Linear 3x3 part (A) and the translation row (t)
        let a = [
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ];
        let t = [m[3][0], m[3][1], m[3][2]];

        let det = a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
            - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
            + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0]);

        if det.abs() < f32::EPSILON {
            return Mat4::identity();
        }

        let inv_det = 1.0 / det;
        let mut a_inv = [[0.0; 3]; 3];

        // Adjugate of A over the determinant
        a_inv[0][0] = (a[1][1] * a[2][2] - a[1][2] * a[2][1]) * inv_det;
        a_inv[0][1] = -(a[0][1] * a[2][2] - a[0][2] * a[2][1]) * inv_det;
        a_inv[0][2] = (a[0][1] * a[1][2] - a[0][2] * a[1][1]) * inv_det;
        a_inv[1][0] = -(a[1][0] * a[2][2] - a[1][2] * a[2][0]) * inv_det;
        a_inv[1][1] = (a[0][0] * a[2][2] - a[0][2] * a[2][0]) * inv_det;
        a_inv[1][2] = -(a[0][0] * a[1][2] - a[0][2] * a[1][0]) * inv_det;
        a_inv[2][0] = (a[1][0] * a[2][1] - a[1][1] * a[2][0]) * inv_det;
        a_inv[2][1] = -(a[0][0] * a[2][1] - a[0][1] * a[2][0]) * inv_det;
        a_inv[2][2] = (a[0][0] * a[1][1] - a[0][1] * a[1][0]) * inv_det;

        // Translation row of the inverse is -t * A⁻¹
        let new_t = [
            -(t[0] * a_inv[0][0] + t[1] * a_inv[1][0] + t[2] * a_inv[2][0]),
            -(t[0] * a_inv[0][1] + t[1] * a_inv[1][1] + t[2] * a_inv[2][1]),
            -(t[0] * a_inv[0][2] + t[1] * a_inv[1][2] + t[2] * a_inv[2][2]),
        ];

        Mat4([
            [a_inv[0][0], a_inv[0][1], a_inv[0][2], 0.0],
            [a_inv[1][0], a_inv[1][1], a_inv[1][2], 0.0],
            [a_inv[2][0], a_inv[2][1], a_inv[2][2], 0.0],
            [new_t[0], new_t[1], new_t[2], 1.0],
        ])
    }

    /// The raw bytes of the matrix, for uploading to a shader uniform.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// The 16 elements in flat row-major order (translation at indices
    /// 12..=14).
    pub fn to_flat_array(&self) -> [f32; 16] {
        bytemuck::cast(self.0)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.multiply(&rhs)
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(matrix: [[f32; 4]; 4]) -> Self {
        Mat4(matrix)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(matrix: Mat4) -> Self {
        matrix.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn assert_mat_eq(a: &Mat4, b: &Mat4, tolerance: f32) {
        for i in 0..4 {
            for j in 0..4 {
                let (x, y) = (a.0[i][j], b.0[i][j]);
                assert!(
                    (x - y).abs() <= tolerance,
                    "mismatch at [{i}][{j}]: {x} vs {y}"
                );
            }
        }
    }

    fn random_mat(rng: &mut impl Rng) -> Mat4 {
        let mut m = [[0.0; 4]; 4];
        for row in m.iter_mut() {
            for cell in row.iter_mut() {
                *cell = rng.gen_range(-1.0..1.0);
            }
        }
        Mat4(m)
    }

    #[test]
    fn identity_is_multiplicative_unit() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let m = random_mat(&mut rng);
            assert_eq!(Mat4::identity().multiply(&m), m);
            assert_eq!(m.multiply(&Mat4::identity()), m);
            assert_eq!(Mat4::identity() * m, m);
        }
    }

    #[test]
    fn unit_transforms_are_noops() {
        let mut rng = rand::thread_rng();
        let m = random_mat(&mut rng);

        assert_eq!(m.scale(1.0, 1.0, 1.0), m);
        assert_eq!(m.translate(0.0, 0.0, 0.0), m);
        assert_eq!(m.rotate(0.0, Vec3::new(0.4, -1.2, 7.0)), m);
    }

    #[test]
    fn scale_composed_with_inverse_scale_is_identity() {
        let scaled = Mat4::scaling(2.0, 4.0, 5.0).multiply(&Mat4::scaling(0.5, 0.25, 0.2));
        assert_mat_eq(&scaled, &Mat4::identity(), 1e-6);
    }

    #[test]
    fn multiplication_is_associative() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let a = random_mat(&mut rng);
            let b = random_mat(&mut rng);
            let c = random_mat(&mut rng);
            assert_mat_eq(&(a * b * c), &(a * (b * c)), 1e-4);
        }
    }

    /// The transform requested last is pre-multiplied onto the current
    /// matrix: translate-then-scale yields `scaling * translation`.
    #[test]
    fn composition_premultiplies_the_new_transform() {
        let m = Mat4::identity().translate(1.0, 2.0, 3.0).scale(2.0, 2.0, 2.0);
        let expected = Mat4([
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 0.0],
            [1.0, 2.0, 3.0, 1.0],
        ]);
        assert_eq!(m, expected);
        assert_eq!(
            m,
            Mat4::scaling(2.0, 2.0, 2.0).multiply(&Mat4::translation(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn frustum_canonical_cube_values() {
        // dx = dy = 2, dz = 9 with the standard frustum formula
        let m = Mat4::frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0);
        let expected = Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, -11.0 / 9.0, -1.0],
            [0.0, 0.0, -20.0 / 9.0, 0.0],
        ]);
        assert_mat_eq(&m, &expected, 1e-6);
    }

    #[test]
    fn perspective_matches_equivalent_frustum() {
        // fovy 90 degrees at near = 1 puts the side planes at +-1
        let p = Mat4::perspective(90.0, 1.0, 1.0, 100.0);
        let f = Mat4::frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 100.0);
        assert_mat_eq(&p, &f, 1e-5);
    }

    #[test]
    fn ortho_accepts_negative_near_and_far() {
        let m = Mat4::ortho(-1.0, 1.0, -1.0, 1.0, -1.0, -10.0);
        for row in m.0 {
            for cell in row {
                assert!(cell.is_finite());
            }
        }
        // delta_z = -9
        assert!((m.0[0][0] - 1.0).abs() < 1e-6);
        assert!((m.0[1][1] - 1.0).abs() < 1e-6);
        assert!((m.0[2][2] - 2.0 / 9.0).abs() < 1e-6);
        assert!((m.0[3][2] - -11.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_normalizes_its_axis() {
        let from_unit = Mat4::rotation(37.0, Vec3::new(0.0, 0.0, 1.0));
        let from_scaled = Mat4::rotation(37.0, Vec3::new(0.0, 0.0, 10.0));
        assert_mat_eq(&from_unit, &from_scaled, 1e-6);
    }

    #[test]
    fn rotation_about_zero_axis_is_identity() {
        let zero = Vec3::new(0.0, 0.0, 0.0);
        assert_eq!(Mat4::rotation(45.0, zero), Mat4::identity());

        let m = Mat4::translation(3.0, 1.0, -2.0);
        assert_eq!(m.rotate(45.0, zero), m);
    }

    #[test]
    fn axis_aligned_rotations_match_the_general_form() {
        let angle = 63.0;
        assert_mat_eq(
            &Mat4::rotation_x(angle),
            &Mat4::rotation(angle, Vec3::new(1.0, 0.0, 0.0)),
            1e-6,
        );
        assert_mat_eq(
            &Mat4::rotation_y(angle),
            &Mat4::rotation(angle, Vec3::new(0.0, 1.0, 0.0)),
            1e-6,
        );
        assert_mat_eq(
            &Mat4::rotation_z(angle),
            &Mat4::rotation(angle, Vec3::new(0.0, 0.0, 1.0)),
            1e-6,
        );
    }

    #[test]
    fn rotation_composed_with_opposite_rotation_is_identity() {
        let axis = Vec3::new(1.0, -2.0, 0.5);
        let m = Mat4::rotation(30.0, axis).multiply(&Mat4::rotation(-30.0, axis));
        assert_mat_eq(&m, &Mat4::identity(), 1e-6);
    }

    #[test]
    fn inverse_undoes_an_affine_transform() {
        let m = Mat4::identity()
            .scale(2.0, 3.0, 4.0)
            .rotate(40.0, Vec3::new(0.0, 1.0, 0.0))
            .translate(1.0, -2.0, 3.0);
        assert_mat_eq(&m.multiply(&m.inverse()), &Mat4::identity(), 1e-5);
        assert_mat_eq(&m.inverse().multiply(&m), &Mat4::identity(), 1e-5);
    }

    #[test]
    fn inverse_of_singular_matrix_falls_back_to_identity() {
        assert_eq!(Mat4::scaling(0.0, 1.0, 1.0).inverse(), Mat4::identity());
    }

    #[test]
    fn try_frustum_rejects_documented_preconditions() {
        assert_eq!(
            Mat4::try_frustum(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0),
            Err(ProjectionError::DepthRange {
                near: 0.0,
                far: 10.0
            })
        );
        assert_eq!(
            Mat4::try_frustum(-1.0, 1.0, -1.0, 1.0, 5.0, 1.0),
            Err(ProjectionError::DepthRange { near: 5.0, far: 1.0 })
        );
        assert!(matches!(
            Mat4::try_frustum(1.0, 1.0, -1.0, 1.0, 1.0, 10.0),
            Err(ProjectionError::DegeneratePlanes { .. })
        ));

        let ok = Mat4::try_frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0).unwrap();
        assert_eq!(ok, Mat4::frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0));
    }

    #[test]
    fn try_perspective_rejects_documented_preconditions() {
        assert_eq!(
            Mat4::try_perspective(0.0, 1.0, 1.0, 10.0),
            Err(ProjectionError::FieldOfView(0.0))
        );
        assert_eq!(
            Mat4::try_perspective(180.0, 1.0, 1.0, 10.0),
            Err(ProjectionError::FieldOfView(180.0))
        );
        assert_eq!(
            Mat4::try_perspective(60.0, -1.5, 1.0, 10.0),
            Err(ProjectionError::AspectRatio(-1.5))
        );
        assert_eq!(
            Mat4::try_perspective(60.0, 1.0, -1.0, 10.0),
            Err(ProjectionError::DepthRange {
                near: -1.0,
                far: 10.0
            })
        );

        let ok = Mat4::try_perspective(60.0, 1.5, 0.1, 50.0).unwrap();
        assert_eq!(ok, Mat4::perspective(60.0, 1.5, 0.1, 50.0));
    }

    #[test]
    fn flat_layout_is_row_major_with_translation_at_12() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        let flat = m.to_flat_array();
        assert_eq!(&flat[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(m.as_bytes().len(), 64);

        let counting = Mat4::from([
            [0.0, 1.0, 2.0, 3.0],
            [4.0, 5.0, 6.0, 7.0],
            [8.0, 9.0, 10.0, 11.0],
            [12.0, 13.0, 14.0, 15.0],
        ]);
        let expected: [f32; 16] = std::array::from_fn(|i| i as f32);
        assert_eq!(counting.to_flat_array(), expected);
    }

    #[test]
    fn conversions_and_default() {
        let raw = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ];
        let m = Mat4::from(raw);
        let back: [[f32; 4]; 4] = m.into();
        assert_eq!(back, raw);
        assert_eq!(Mat4::default(), Mat4::identity());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_preserves_elements() {
        let m = Mat4::perspective(60.0, 1.5, 0.1, 50.0);
        let json = serde_json::to_string(&m).unwrap();
        let back: Mat4 = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
