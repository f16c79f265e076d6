// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan outlines for walls, doors and windows.
//!
//! An element is a rectangle in its own local frame, `width` long along the
//! local x axis. The thickness offset runs along the local z axis (the
//! element's normal), which is the horizontal axis that survives projection;
//! the local y axis is vertical and would collapse to nothing in the plan.
//!
//! Each local point goes through placement transform, projection and scene
//! rotation in that order.

use nalgebra::Point3;
use planview_core::{StructuralElement, Transform4x4};
use smallvec::SmallVec;

use crate::alignment::PlanRotation;
use crate::config::{ElementStyle, OutlineMode};
use crate::projection::{PlanConvention, PlanPoint};
use crate::transform::transform_point;

/// Outline points: 4 for a footprint, 2 for a centerline.
pub type OutlinePoints = SmallVec<[PlanPoint; 4]>;

/// Maps element-local geometry into the plan frame of one scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeBuilder {
    convention: PlanConvention,
    rotation: PlanRotation,
}

impl ShapeBuilder {
    pub fn new(convention: PlanConvention, rotation: PlanRotation) -> Self {
        Self {
            convention,
            rotation,
        }
    }

    /// Local point through transform, projection and rotation.
    #[inline]
    pub fn plan_point(&self, transform: &Transform4x4, local: &Point3<f64>) -> PlanPoint {
        let world = transform_point(transform, local);
        self.rotation.apply(self.convention.project(&world))
    }

    /// The element's local origin in the plan frame.
    pub fn center(&self, element: &StructuralElement) -> PlanPoint {
        self.plan_point(&element.transform, &Point3::origin())
    }

    /// Thin rectangle around the local x axis, counter-clockwise in the plan
    /// frame.
    ///
    /// Widths at or below zero give a zero-width rectangle.
    pub fn footprint(&self, element: &StructuralElement, thickness: f64) -> [PlanPoint; 4] {
        let hw = half_width(element);
        let ht = thickness.max(0.0) / 2.0;
        let corners = [
            Point3::new(-hw, 0.0, ht),
            Point3::new(hw, 0.0, ht),
            Point3::new(hw, 0.0, -ht),
            Point3::new(-hw, 0.0, -ht),
        ];

        let mut points = corners.map(|c| self.plan_point(&element.transform, &c));
        if signed_area(&points) < 0.0 {
            points.reverse();
        }
        points
    }

    /// Line along the local x axis from `-width/2` to `+width/2`.
    pub fn centerline(&self, element: &StructuralElement) -> [PlanPoint; 2] {
        let hw = half_width(element);
        [
            self.plan_point(&element.transform, &Point3::new(-hw, 0.0, 0.0)),
            self.plan_point(&element.transform, &Point3::new(hw, 0.0, 0.0)),
        ]
    }

    /// Outline chosen by the element style.
    pub fn outline(&self, element: &StructuralElement, style: &ElementStyle) -> OutlinePoints {
        match style.outline {
            OutlineMode::Footprint => {
                SmallVec::from_buf(self.footprint(element, style.thickness))
            }
            OutlineMode::Centerline => SmallVec::from_slice(&self.centerline(element)),
        }
    }
}

#[inline]
fn half_width(element: &StructuralElement) -> f64 {
    element.width().max(0.0) / 2.0
}

/// Shoelace signed area; positive for counter-clockwise rings.
pub fn signed_area(points: &[PlanPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].u * points[j].v;
        area -= points[j].u * points[i].v;
    }
    area / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use planview_core::ElementKind;

    fn wall(width: f64, transform: Transform4x4) -> StructuralElement {
        StructuralElement::new("w", ElementKind::Wall, width, transform)
    }

    #[test]
    fn test_identity_wall_footprint() {
        let builder = ShapeBuilder::default();
        let pts = builder.footprint(&wall(4.0, Transform4x4::IDENTITY), 0.1);

        let min_u = pts.iter().map(|p| p.u).fold(f64::INFINITY, f64::min);
        let max_u = pts.iter().map(|p| p.u).fold(f64::NEG_INFINITY, f64::max);
        let min_v = pts.iter().map(|p| p.v).fold(f64::INFINITY, f64::min);
        let max_v = pts.iter().map(|p| p.v).fold(f64::NEG_INFINITY, f64::max);

        assert_abs_diff_eq!(max_u - min_u, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(max_v - min_v, 0.1, epsilon = 1e-12);
        let c = PlanPoint::centroid(&pts);
        assert_abs_diff_eq!(c.u, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.v, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_area(&pts), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_centroid_matches_center() {
        let builder = ShapeBuilder::new(
            PlanConvention::new(true, false),
            PlanRotation::from_degrees(27.0),
        );
        let transforms = [
            Transform4x4::from_translation(2.0, 1.0, -3.0),
            Transform4x4::from_yaw_translation(71.0, -1.5, 0.0, 4.0),
            Transform4x4::from_yaw_translation(-160.0, 0.25, 2.0, 0.5),
        ];
        for t in transforms {
            let w = wall(3.3, t);
            let pts = builder.footprint(&w, 0.2);
            assert_eq!(pts.len(), 4);
            let c = PlanPoint::centroid(&pts);
            let center = builder.center(&w);
            assert_abs_diff_eq!(c.u, center.u, epsilon = 1e-9);
            assert_abs_diff_eq!(c.v, center.v, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_footprint_is_counter_clockwise_for_every_convention() {
        for convention in [
            PlanConvention::new(false, false),
            PlanConvention::new(true, false),
            PlanConvention::new(false, true),
            PlanConvention::new(true, true),
        ] {
            let builder = ShapeBuilder::new(convention, PlanRotation::from_degrees(-40.0));
            let w = wall(2.0, Transform4x4::from_yaw_translation(15.0, 1.0, 0.0, 1.0));
            let pts = builder.footprint(&w, 0.1);
            assert!(signed_area(&pts) > 0.0);
            assert_abs_diff_eq!(signed_area(&pts), 0.2, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_degenerate_width() {
        let builder = ShapeBuilder::default();
        for width in [0.0, -2.0] {
            let pts = builder.footprint(&wall(width, Transform4x4::IDENTITY), 0.1);
            assert_eq!(pts.len(), 4);
            assert!(pts.iter().all(|p| p.u.is_finite() && p.v.is_finite()));
            assert_abs_diff_eq!(signed_area(&pts), 0.0);
        }
    }

    #[test]
    fn test_centerline() {
        let builder = ShapeBuilder::default();
        let [a, b] = builder.centerline(&wall(2.0, Transform4x4::from_translation(1.0, 0.0, -1.0)));
        assert_abs_diff_eq!(a.u, 0.0);
        assert_abs_diff_eq!(b.u, 2.0);
        assert_abs_diff_eq!(a.v, 1.0);
        assert_abs_diff_eq!(b.v, 1.0);
        assert_abs_diff_eq!(a.distance_to(&b), 2.0);
    }

    #[test]
    fn test_outline_follows_style() {
        let builder = ShapeBuilder::default();
        let w = wall(1.0, Transform4x4::IDENTITY);
        assert_eq!(builder.outline(&w, &ElementStyle::footprint(0.1)).len(), 4);
        assert_eq!(builder.outline(&w, &ElementStyle::centerline(0.1)).len(), 2);
    }
}
