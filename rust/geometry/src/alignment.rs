// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Auto-alignment: rotate the plan so the dominant wall lies on an axis.
//!
//! The dominant wall is the one with the largest width. Ties go to the wall
//! met first when iterating rooms in order and walls in order within a room.
//! Its raw angle is `atan2(T[2], T[0])` in degrees, read from the world-space
//! direction of its local x axis.

use planview_core::{StructuralElement, Transform4x4};

use crate::projection::{PlanConvention, PlanPoint};
use crate::transform::local_x_axis;

/// Rigid rotation of the plan frame about its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRotation {
    degrees: f64,
    cos: f64,
    sin: f64,
}

impl PlanRotation {
    pub const IDENTITY: PlanRotation = PlanRotation {
        degrees: 0.0,
        cos: 1.0,
        sin: 0.0,
    };

    pub fn from_degrees(degrees: f64) -> Self {
        if degrees == 0.0 {
            return Self::IDENTITY;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { degrees, cos, sin }
    }

    #[inline]
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.degrees == 0.0
    }

    /// Rotation by the opposite angle.
    pub fn inverse(&self) -> Self {
        Self {
            degrees: -self.degrees,
            cos: self.cos,
            sin: -self.sin,
        }
    }

    /// `u' = u·cos θ − v·sin θ`, `v' = u·sin θ + v·cos θ`
    #[inline]
    pub fn apply(&self, p: PlanPoint) -> PlanPoint {
        if self.is_identity() {
            return p;
        }
        PlanPoint::new(
            p.u * self.cos - p.v * self.sin,
            p.u * self.sin + p.v * self.cos,
        )
    }
}

impl Default for PlanRotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Widest wall; the first one wins on ties.
///
/// Widths that are NaN never replace the current choice.
pub fn longest_wall<'a, I>(walls: I) -> Option<&'a StructuralElement>
where
    I: IntoIterator<Item = &'a StructuralElement>,
{
    walls.into_iter().fold(None, |best, wall| match best {
        Some(current) if !(wall.width() > current.width()) => Some(current),
        _ => Some(wall),
    })
}

/// Raw heading of a wall's local x axis, in degrees: `atan2(T[2], T[0])`.
pub fn wall_angle_degrees(transform: &Transform4x4) -> f64 {
    let axis = local_x_axis(transform);
    axis.z.atan2(axis.x).to_degrees()
}

/// Outcome of the alignment estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentEstimate {
    pub rotation: PlanRotation,
    /// Identifier of the wall the angle came from.
    pub reference_wall: Option<String>,
}

impl AlignmentEstimate {
    pub fn identity() -> Self {
        Self {
            rotation: PlanRotation::IDENTITY,
            reference_wall: None,
        }
    }
}

/// Estimate the scene rotation from the widest wall.
///
/// For orientation-preserving conventions the raw angle is used as is; a
/// mirrored convention reverses the sense of rotation, so the angle is
/// negated. Either way the reference wall ends up parallel to a plan axis.
/// No walls means no rotation.
pub fn estimate_alignment<'a, I>(walls: I, convention: &PlanConvention) -> AlignmentEstimate
where
    I: IntoIterator<Item = &'a StructuralElement>,
{
    let Some(wall) = longest_wall(walls) else {
        return AlignmentEstimate::identity();
    };

    let raw = wall_angle_degrees(&wall.transform);
    let degrees = if convention.preserves_orientation() {
        raw
    } else {
        -raw
    };

    AlignmentEstimate {
        rotation: PlanRotation::from_degrees(degrees),
        reference_wall: Some(wall.identifier.clone()),
    }
}
