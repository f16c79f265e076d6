// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! World-to-plan projection
//!
//! The vertical (y) axis is discarded. World x maps to plan `u`, world z maps
//! to plan `v` negated, so moving towards -z moves up the plan:
//!
//! ```text
//! plan = (world.x, -world.z)
//! ```
//!
//! A [`PlanConvention`] may flip either plan axis for a mirrored display. One
//! convention is used for every element and every camera pose in a scene.

use nalgebra::{Point2, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// A point in the flattened plan frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPoint {
    pub u: f64,
    pub v: f64,
}

impl PlanPoint {
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.u, self.v)
    }

    /// Offset by a plan-frame vector.
    pub fn offset(&self, delta: &Vector2<f64>) -> Self {
        Self::new(self.u + delta.x, self.v + delta.y)
    }

    pub fn distance_to(&self, other: &PlanPoint) -> f64 {
        nalgebra::distance(&self.to_nalgebra(), &other.to_nalgebra())
    }

    /// Arithmetic mean of a set of points; origin for an empty set.
    pub fn centroid(points: &[PlanPoint]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let n = points.len() as f64;
        let (su, sv) = points
            .iter()
            .fold((0.0, 0.0), |(su, sv), p| (su + p.u, sv + p.v));
        Self::new(su / n, sv / n)
    }
}

/// Axis sign convention for the plan frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConvention {
    /// Negate plan `u` (mirror left/right).
    pub flip_u: bool,
    /// Negate plan `v` (mirror top/bottom).
    pub flip_v: bool,
}

impl PlanConvention {
    /// `plan = (x, -z)`
    pub const CANONICAL: PlanConvention = PlanConvention {
        flip_u: false,
        flip_v: false,
    };

    pub fn new(flip_u: bool, flip_v: bool) -> Self {
        Self { flip_u, flip_v }
    }

    #[inline]
    fn u_sign(&self) -> f64 {
        if self.flip_u {
            -1.0
        } else {
            1.0
        }
    }

    #[inline]
    fn v_sign(&self) -> f64 {
        if self.flip_v {
            1.0
        } else {
            -1.0
        }
    }

    /// Project a world-space point.
    #[inline]
    pub fn project(&self, world: &Point3<f64>) -> PlanPoint {
        PlanPoint::new(self.u_sign() * world.x, self.v_sign() * world.z)
    }

    /// Project a world-space direction. Unit vectors in the horizontal plane
    /// stay unit length.
    #[inline]
    pub fn project_direction(&self, world: &Vector3<f64>) -> Vector2<f64> {
        Vector2::new(self.u_sign() * world.x, self.v_sign() * world.z)
    }

    /// False when exactly one axis is flipped (the plan is a mirror image).
    #[inline]
    pub fn preserves_orientation(&self) -> bool {
        self.flip_u == self.flip_v
    }
}
