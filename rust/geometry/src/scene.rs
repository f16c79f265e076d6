// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene assembly: one flat list of plan primitives per scan.
//!
//! Per scene the alignment is estimated once, then every room's walls, doors
//! and windows become outlines and every pose record becomes a marker.
//! Broken elements and unreadable pose text are dropped and reported in
//! [`SceneDiagnostics`]; the build as a whole never fails.

use planview_core::{ElementKind, PoseParse, PoseRecordSet, ScanResult, StructuralElement};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::alignment::{estimate_alignment, AlignmentEstimate, PlanRotation};
use crate::config::{OutlineMode, PlanConfig};
use crate::error::Result;
use crate::pose::{PoseMarker, PoseResolver};
use crate::projection::PlanPoint;
use crate::shape::{OutlinePoints, ShapeBuilder};

pub const FEET_PER_METER: f64 = 3.28084;

/// Closed outline of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPolygon {
    pub identifier: String,
    pub style: ElementKind,
    pub points: OutlinePoints,
    /// Display text, e.g. wall length in feet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Open two-point outline of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSegment {
    pub identifier: String,
    pub style: ElementKind,
    pub start: PlanPoint,
    pub end: PlanPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Anything a 2D drawing surface needs to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderablePrimitive {
    Polygon(PlanPolygon),
    Segment(PlanSegment),
    PoseMarker(PoseMarker),
}

impl RenderablePrimitive {
    /// Every plan point the primitive touches.
    pub fn points(&self) -> OutlinePoints {
        match self {
            RenderablePrimitive::Polygon(p) => p.points.clone(),
            RenderablePrimitive::Segment(s) => OutlinePoints::from_slice(&[s.start, s.end]),
            RenderablePrimitive::PoseMarker(m) => {
                OutlinePoints::from_slice(&[m.position, m.facing_endpoint])
            }
        }
    }

    /// Element kind for outlines, `None` for pose markers.
    pub fn element_kind(&self) -> Option<ElementKind> {
        match self {
            RenderablePrimitive::Polygon(p) => Some(p.style),
            RenderablePrimitive::Segment(s) => Some(s.style),
            RenderablePrimitive::PoseMarker(_) => None,
        }
    }
}

/// Axis-aligned bounds in the plan frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanBounds {
    pub min_u: f64,
    pub min_v: f64,
    pub max_u: f64,
    pub max_v: f64,
}

impl PlanBounds {
    pub fn from_points<I: IntoIterator<Item = PlanPoint>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let init = Self {
            min_u: first.u,
            min_v: first.v,
            max_u: first.u,
            max_v: first.v,
        };
        Some(iter.fold(init, |b, p| Self {
            min_u: b.min_u.min(p.u),
            min_v: b.min_v.min(p.v),
            max_u: b.max_u.max(p.u),
            max_v: b.max_v.max(p.v),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_u - self.min_u
    }

    pub fn height(&self) -> f64 {
        self.max_v - self.min_v
    }

    /// Grow by `margin` on every side.
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min_u: self.min_u - margin,
            min_v: self.min_v - margin,
            max_u: self.max_u + margin,
            max_v: self.max_v + margin,
        }
    }
}

/// The projected scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Rotation applied to every point, in degrees (0 = none).
    pub alignment_degrees: f64,
    pub primitives: Vec<RenderablePrimitive>,
}

impl Scene {
    pub fn bounds(&self) -> Option<PlanBounds> {
        PlanBounds::from_points(self.primitives.iter().flat_map(|p| p.points()))
    }

    pub fn pose_markers(&self) -> impl Iterator<Item = &PoseMarker> {
        self.primitives.iter().filter_map(|p| match p {
            RenderablePrimitive::PoseMarker(m) => Some(m),
            _ => None,
        })
    }

    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.primitives
            .iter()
            .filter(|p| p.element_kind() == Some(kind))
            .count()
    }
}

/// Element left out of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedElement {
    pub room_index: usize,
    pub kind: ElementKind,
    /// Position within the room's list for this kind.
    pub index: usize,
    pub reason: String,
}

/// Pose record left out of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPose {
    pub photo_id: String,
    pub reason: String,
}

/// Everything the build dropped or noticed, for the caller to surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDiagnostics {
    /// Identifier of the wall the alignment came from.
    pub reference_wall: Option<String>,
    pub dropped_elements: Vec<DroppedElement>,
    pub skipped_poses: Vec<SkippedPose>,
    /// Identifiers seen on more than one element (each listed once).
    pub duplicate_identifiers: Vec<String>,
}

impl SceneDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.dropped_elements.is_empty()
            && self.skipped_poses.is_empty()
            && self.duplicate_identifiers.is_empty()
    }
}

/// Result of one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneBuild {
    pub scene: Scene,
    pub diagnostics: SceneDiagnostics,
}

/// Builds plan scenes under one configuration.
///
/// Holds no state between builds; the same inputs always give the same scene.
#[derive(Debug, Clone, Default)]
pub struct SceneAssembler {
    config: PlanConfig,
}

struct PlacedElement {
    room_index: usize,
    element: StructuralElement,
}

impl SceneAssembler {
    pub fn new(config: PlanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Rotation for a set of validated walls under this configuration.
    pub fn alignment<'a, I>(&self, walls: I) -> AlignmentEstimate
    where
        I: IntoIterator<Item = &'a StructuralElement>,
    {
        if let Some(degrees) = self.config.alignment_override_degrees {
            return AlignmentEstimate {
                rotation: PlanRotation::from_degrees(degrees),
                reference_wall: None,
            };
        }
        if !self.config.auto_align {
            return AlignmentEstimate::identity();
        }
        estimate_alignment(walls, &self.config.convention)
    }

    pub fn build(&self, scan: &ScanResult, poses: &PoseRecordSet) -> SceneBuild {
        let mut diagnostics = SceneDiagnostics::default();
        let elements = self.validate_elements(scan, &mut diagnostics);

        let estimate = self.alignment(
            elements
                .iter()
                .map(|placed| &placed.element)
                .filter(|e| e.kind == ElementKind::Wall),
        );
        let rotation = estimate.rotation;
        diagnostics.reference_wall = estimate.reference_wall;

        let shapes = ShapeBuilder::new(self.config.convention, rotation);
        let mut primitives = Vec::with_capacity(elements.len() + poses.len());

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut reported: FxHashSet<&str> = FxHashSet::default();
        for placed in &elements {
            let element = &placed.element;
            if !seen.insert(element.identifier.as_str())
                && reported.insert(element.identifier.as_str())
            {
                tracing::warn!(
                    identifier = %element.identifier,
                    room = placed.room_index,
                    "duplicate element identifier"
                );
                diagnostics
                    .duplicate_identifiers
                    .push(element.identifier.clone());
            }
            primitives.push(self.element_primitive(&shapes, element));
        }

        let resolver = PoseResolver::new(self.config.convention, rotation, self.config.arrow_length);
        for record in poses.records() {
            match record.parse() {
                PoseParse::Parsed(pose) => {
                    primitives.push(RenderablePrimitive::PoseMarker(
                        resolver.marker(&record.photo_id, &pose),
                    ));
                }
                PoseParse::Unparsed(fault) => {
                    tracing::debug!(photo_id = %record.photo_id, reason = %fault, "skipping pose record");
                    diagnostics.skipped_poses.push(SkippedPose {
                        photo_id: record.photo_id,
                        reason: fault.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            rooms = scan.rooms.len(),
            primitives = primitives.len(),
            dropped_elements = diagnostics.dropped_elements.len(),
            skipped_poses = diagnostics.skipped_poses.len(),
            alignment_degrees = rotation.degrees(),
            "built plan scene"
        );

        SceneBuild {
            scene: Scene {
                alignment_degrees: rotation.degrees(),
                primitives,
            },
            diagnostics,
        }
    }

    fn validate_elements(
        &self,
        scan: &ScanResult,
        diagnostics: &mut SceneDiagnostics,
    ) -> Vec<PlacedElement> {
        let mut elements = Vec::new();
        for (room_index, room) in scan.rooms.iter().enumerate() {
            for (kind, index, record) in room.elements() {
                match record.validate(kind, index) {
                    Ok(element) => elements.push(PlacedElement {
                        room_index,
                        element,
                    }),
                    Err(e) => {
                        tracing::debug!(room = room_index, %kind, index, error = %e, "dropping element");
                        diagnostics.dropped_elements.push(DroppedElement {
                            room_index,
                            kind,
                            index,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        elements
    }

    fn element_primitive(
        &self,
        shapes: &ShapeBuilder,
        element: &StructuralElement,
    ) -> RenderablePrimitive {
        let style = self.config.style(element.kind);
        let label = match element.kind {
            ElementKind::Wall => Some(feet_label(element.width())),
            _ => None,
        };

        match style.outline {
            OutlineMode::Footprint => RenderablePrimitive::Polygon(PlanPolygon {
                identifier: element.identifier.clone(),
                style: element.kind,
                points: shapes.outline(element, style),
                label,
            }),
            OutlineMode::Centerline => {
                let [start, end] = shapes.centerline(element);
                RenderablePrimitive::Segment(PlanSegment {
                    identifier: element.identifier.clone(),
                    style: element.kind,
                    start,
                    end,
                    label,
                })
            }
        }
    }
}

/// Build a scene with the given configuration.
pub fn build_scene(
    scan: &ScanResult,
    poses: &PoseRecordSet,
    config: PlanConfig,
) -> Result<SceneBuild> {
    Ok(SceneAssembler::new(config)?.build(scan, poses))
}

/// Length in feet with one decimal, e.g. `13.1ft`.
pub fn feet_label(meters: f64) -> String {
    format!("{:.1}ft", meters * FEET_PER_METER)
}
