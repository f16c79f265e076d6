// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera pose markers.
//!
//! The camera looks down its local -z axis, so for a yaw of `h` its
//! world-space forward vector is `(-sin h, 0, -cos h)`. That vector goes
//! through the same projection as the geometry; in the canonical frame it
//! becomes `(-sin h, cos h)`, so yaw 0 faces plan-up and positive yaw turns
//! counter-clockwise.

use nalgebra::{Point3, Vector2, Vector3};
use planview_core::{CameraPose, CameraPoseRecord};
use serde::{Deserialize, Serialize};

use crate::alignment::PlanRotation;
use crate::error::Result;
use crate::projection::{PlanConvention, PlanPoint};

/// A camera position with its facing direction in the plan frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseMarker {
    pub photo_id: String,
    pub position: PlanPoint,
    /// `position` plus the unit facing direction scaled by the arrow length.
    pub facing_endpoint: PlanPoint,
}

impl PoseMarker {
    /// Unit facing direction, or zero when the arrow has no length.
    pub fn facing_direction(&self) -> Vector2<f64> {
        let d = Vector2::new(
            self.facing_endpoint.u - self.position.u,
            self.facing_endpoint.v - self.position.v,
        );
        d.try_normalize(f64::EPSILON).unwrap_or_else(Vector2::zeros)
    }
}

/// Resolves pose records into markers for one scene.
#[derive(Debug, Clone, Copy)]
pub struct PoseResolver {
    convention: PlanConvention,
    rotation: PlanRotation,
    arrow_length: f64,
}

impl PoseResolver {
    pub fn new(convention: PlanConvention, rotation: PlanRotation, arrow_length: f64) -> Self {
        Self {
            convention,
            rotation,
            arrow_length,
        }
    }

    /// Unit facing direction for a yaw, before scene rotation.
    pub fn facing_direction(&self, yaw_degrees: f64) -> Vector2<f64> {
        let (sin, cos) = yaw_degrees.to_radians().sin_cos();
        let forward = Vector3::new(-sin, 0.0, -cos);
        self.convention.project_direction(&forward)
    }

    /// Marker for an already parsed pose.
    pub fn marker(&self, photo_id: &str, pose: &CameraPose) -> PoseMarker {
        let [x, y, z] = pose.position;
        let position = self.convention.project(&Point3::new(x, y, z));
        let endpoint = position.offset(&(self.facing_direction(pose.heading.yaw) * self.arrow_length));

        PoseMarker {
            photo_id: photo_id.to_string(),
            position: self.rotation.apply(position),
            facing_endpoint: self.rotation.apply(endpoint),
        }
    }

    /// Parse and resolve one record.
    ///
    /// Text that does not match the pose grammar is an error here; scene
    /// assembly turns it into a skipped record.
    pub fn resolve(&self, record: &CameraPoseRecord) -> Result<PoseMarker> {
        let pose = record.parse().into_result()?;
        Ok(self.marker(&record.photo_id, &pose))
    }
}
