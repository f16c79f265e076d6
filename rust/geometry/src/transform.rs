// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local-to-world evaluation of element placement transforms
//!
//! Transforms are column-major, so for a local point `p`:
//!
//! ```text
//! x' = T[0]*x + T[4]*y + T[8]*z  + T[12]
//! y' = T[1]*x + T[5]*y + T[9]*z  + T[13]
//! z' = T[2]*x + T[6]*y + T[10]*z + T[14]
//! ```
//!
//! The bottom row is ignored (no perspective divide).

use nalgebra::{Matrix4, Point3, Vector3};
use planview_core::Transform4x4;

/// Convert to an nalgebra matrix.
#[inline]
pub fn to_matrix(transform: &Transform4x4) -> Matrix4<f64> {
    Matrix4::from_column_slice(transform.as_slice())
}

/// Map a local-space point to world space.
#[inline]
pub fn transform_point(transform: &Transform4x4, local: &Point3<f64>) -> Point3<f64> {
    let matrix = to_matrix(transform);
    Point3::from(matrix.fixed_view::<3, 4>(0, 0) * local.to_homogeneous())
}

/// Map a local-space direction to world space (rotation block only).
#[inline]
pub fn transform_direction(transform: &Transform4x4, local: &Vector3<f64>) -> Vector3<f64> {
    to_matrix(transform).fixed_view::<3, 3>(0, 0) * local
}

/// World-space direction of the element's local x axis (column 0).
#[inline]
pub fn local_x_axis(transform: &Transform4x4) -> Vector3<f64> {
    transform_direction(transform, &Vector3::x())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_leaves_point_unchanged() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, -2.0, 3.25),
            Point3::new(-100.0, 0.001, 42.0),
        ];
        for p in points {
            let q = transform_point(&Transform4x4::IDENTITY, &p);
            assert_eq!(p, q);
        }
    }

    #[test]
    fn test_translation() {
        let t = Transform4x4::from_translation(1.0, 2.0, 3.0);
        let q = transform_point(&t, &Point3::new(0.5, 0.0, -0.5));
        assert_relative_eq!(q, Point3::new(1.5, 2.0, 2.5));
    }

    #[test]
    fn test_column_major_layout() {
        // Every entry distinct so a row/column mix-up shows.
        let values: [f64; 16] = std::array::from_fn(|i| i as f64 + 1.0);
        let t = Transform4x4::new(values);
        let q = transform_point(&t, &Point3::new(1.0, 10.0, 100.0));
        assert_relative_eq!(q.x, 1.0 + 5.0 * 10.0 + 9.0 * 100.0 + 13.0);
        assert_relative_eq!(q.y, 2.0 + 6.0 * 10.0 + 10.0 * 100.0 + 14.0);
        assert_relative_eq!(q.z, 3.0 + 7.0 * 10.0 + 11.0 * 100.0 + 15.0);
    }

    #[test]
    fn test_bottom_row_is_ignored() {
        let mut values = Transform4x4::IDENTITY.as_slice().to_vec();
        values[15] = 2.0;
        values[3] = 5.0;
        let t = Transform4x4::from_slice(&values).unwrap();
        let q = transform_point(&t, &Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(q, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_direction_ignores_translation() {
        let t = Transform4x4::from_yaw_translation(90.0, 5.0, 5.0, 5.0);
        let d = transform_direction(&t, &Vector3::x());
        assert_relative_eq!(d, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
        assert_relative_eq!(local_x_axis(&t), d, epsilon = 1e-12);
    }
}
