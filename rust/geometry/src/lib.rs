// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planview Geometry
//!
//! Turns room-capture elements and camera poses into a flat, optionally
//! auto-rotated floor-plan scene, using nalgebra for the transforms.
//!
//! Pipeline, per scene:
//!
//! 1. placement transform ([`transform`]) maps element-local points to world space
//! 2. [`PlanConvention`] drops the vertical axis
//! 3. [`estimate_alignment`] picks the rotation that puts the widest wall on an axis
//! 4. [`ShapeBuilder`] and [`PoseResolver`] produce outlines and pose markers
//! 5. [`SceneAssembler`] collects everything into [`RenderablePrimitive`]s
//!
//! ```rust,ignore
//! use planview_core::{PoseRecordSet, ScanResult};
//! use planview_geometry::{build_scene, PlanConfig};
//!
//! let scan = ScanResult::from_json_str(&room_json)?;
//! let poses = PoseRecordSet::from_json_str(&exif_json)?;
//! let build = build_scene(&scan, &poses, PlanConfig::default())?;
//! for primitive in &build.scene.primitives {
//!     // draw it
//! }
//! ```

pub mod alignment;
pub mod config;
pub mod error;
pub mod pose;
pub mod projection;
pub mod scene;
pub mod shape;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector2, Vector3};

pub use alignment::{estimate_alignment, longest_wall, wall_angle_degrees, AlignmentEstimate, PlanRotation};
pub use config::{ElementStyle, OutlineMode, PlanConfig};
pub use error::{Error, Result};
pub use pose::{PoseMarker, PoseResolver};
pub use projection::{PlanConvention, PlanPoint};
pub use scene::{
    build_scene, feet_label, DroppedElement, PlanBounds, PlanPolygon, PlanSegment,
    RenderablePrimitive, Scene, SceneAssembler, SceneBuild, SceneDiagnostics, SkippedPose,
};
pub use shape::{signed_area, OutlinePoints, ShapeBuilder};
pub use transform::transform_point;
