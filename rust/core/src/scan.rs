// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room-capture data model
//!
//! Mirrors the `Room.json` document produced by a room scan:
//!
//! ```json
//! { "rooms": [ { "walls": [ { "identifier": "...",
//!                             "dimensions": [4.0, 2.5, 0.0],
//!                             "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1] } ],
//!                "doors": [], "windows": [] } ] }
//! ```
//!
//! Records are deserialized leniently ([`ElementRecord`]) and validated one
//! element at a time into [`StructuralElement`], so a single broken element
//! never rejects the whole document.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Which structural category an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Wall,
    Door,
    Window,
}

impl ElementKind {
    pub const ALL: [ElementKind; 3] = [ElementKind::Wall, ElementKind::Door, ElementKind::Window];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Wall => "wall",
            ElementKind::Door => "door",
            ElementKind::Window => "window",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column-major 4x4 affine placement transform.
///
/// Index layout: columns 0..3 hold the local x, y and z axes in world space,
/// `[12], [13], [14]` hold the translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Transform4x4([f64; 16]);

impl Transform4x4 {
    pub const IDENTITY: Transform4x4 = Transform4x4([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn new(values: [f64; 16]) -> Self {
        Self(values)
    }

    /// Build from a slice; `None` unless it has exactly 16 values.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let array: [f64; 16] = values.try_into().ok()?;
        Some(Self(array))
    }

    /// Translation-only transform.
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        let mut values = Self::IDENTITY.0;
        values[12] = x;
        values[13] = y;
        values[14] = z;
        Self(values)
    }

    /// Rotation about the world vertical (y) axis followed by a translation.
    ///
    /// Positive `degrees` turns the local x axis from +x towards -z, so the
    /// local x axis ends up at `(cos, 0, -sin)`.
    pub fn from_yaw_translation(degrees: f64, x: f64, y: f64, z: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self([
            cos, 0.0, -sin, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            sin, 0.0, cos, 0.0, //
            x, y, z, 1.0,
        ])
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl Default for Transform4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<Vec<f64>> for Transform4x4 {
    type Error = String;

    fn try_from(values: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        Self::from_slice(&values)
            .ok_or_else(|| format!("expected 16 transform values, got {}", values.len()))
    }
}

impl From<Transform4x4> for Vec<f64> {
    fn from(transform: Transform4x4) -> Self {
        transform.0.to_vec()
    }
}

/// Element as it appears in the input document, before validation.
///
/// Every field is optional here; [`ElementRecord::validate`] decides whether
/// the record is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub dimensions: Option<Vec<f64>>,
    #[serde(default)]
    pub transform: Option<Vec<f64>>,
}

impl ElementRecord {
    pub fn new(identifier: impl Into<String>, dimensions: Vec<f64>, transform: Transform4x4) -> Self {
        Self {
            identifier: Some(identifier.into()),
            dimensions: Some(dimensions),
            transform: Some(transform.as_slice().to_vec()),
        }
    }

    /// Check required fields and produce a [`StructuralElement`].
    ///
    /// `index` is the record's position in its list, used to name records
    /// that lack an identifier.
    pub fn validate(&self, kind: ElementKind, index: usize) -> Result<StructuralElement> {
        let identifier = match self.identifier.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(Error::MissingIdentifier { kind, index }),
        };

        let dimensions = match self.dimensions.as_deref() {
            Some(dims) if !dims.is_empty() => dims,
            _ => {
                return Err(Error::MissingDimensions { kind, identifier });
            }
        };

        let values = self.transform.as_deref().ok_or_else(|| Error::MissingTransform {
            kind,
            identifier: identifier.clone(),
        })?;
        let transform = Transform4x4::from_slice(values).ok_or_else(|| Error::InvalidTransform {
            kind,
            identifier: identifier.clone(),
            len: values.len(),
        })?;

        if !transform.is_finite() || !dimensions[0].is_finite() {
            return Err(Error::NonFiniteValue { kind, identifier });
        }

        Ok(StructuralElement {
            identifier,
            dimensions: SmallVec::from_slice(dimensions),
            transform,
            kind,
        })
    }
}

/// A validated wall, door or window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralElement {
    pub identifier: String,
    /// Index 0 is the width along the local x axis. Never empty.
    pub dimensions: SmallVec<[f64; 3]>,
    pub transform: Transform4x4,
    pub kind: ElementKind,
}

impl StructuralElement {
    pub fn new(
        identifier: impl Into<String>,
        kind: ElementKind,
        width: f64,
        transform: Transform4x4,
    ) -> Self {
        let mut dimensions = SmallVec::new();
        dimensions.push(width);
        Self {
            identifier: identifier.into(),
            dimensions,
            transform,
            kind,
        }
    }

    /// Width along the local x axis in meters.
    #[inline]
    pub fn width(&self) -> f64 {
        self.dimensions[0]
    }
}

/// One scanned room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub walls: Vec<ElementRecord>,
    #[serde(default)]
    pub doors: Vec<ElementRecord>,
    #[serde(default)]
    pub windows: Vec<ElementRecord>,
}

impl Room {
    pub fn records(&self, kind: ElementKind) -> &[ElementRecord] {
        match kind {
            ElementKind::Wall => &self.walls,
            ElementKind::Door => &self.doors,
            ElementKind::Window => &self.windows,
        }
    }

    /// All records in document order: walls, then doors, then windows.
    ///
    /// Yields `(kind, index within its list, record)`.
    pub fn elements(&self) -> impl Iterator<Item = (ElementKind, usize, &ElementRecord)> + '_ {
        ElementKind::ALL.into_iter().flat_map(move |kind| {
            self.records(kind)
                .iter()
                .enumerate()
                .map(move |(index, record)| (kind, index, record))
        })
    }

    pub fn element_count(&self) -> usize {
        self.walls.len() + self.doors.len() + self.windows.len()
    }
}

/// A complete scan: one or more rooms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl ScanResult {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Walls across every room that pass validation, in iteration order.
    pub fn valid_walls(&self) -> impl Iterator<Item = StructuralElement> + '_ {
        self.rooms.iter().flat_map(|room| {
            room.walls
                .iter()
                .enumerate()
                .filter_map(|(index, record)| record.validate(ElementKind::Wall, index).ok())
        })
    }
}
