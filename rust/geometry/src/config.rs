// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-building configuration.
//!
//! Every field has a default; a JSON document only needs the fields it
//! overrides:
//!
//! ```json
//! { "convention": { "flip_u": true }, "door": { "outline": "footprint" } }
//! ```

use planview_core::ElementKind;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::projection::PlanConvention;

/// How an element is drawn in the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlineMode {
    /// Thin rectangle around the element's local x axis.
    #[default]
    Footprint,
    /// Two-point line along the element's local x axis.
    Centerline,
}

/// Per-kind presentation constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStyle {
    /// Rectangle thickness in meters (ignored for centerlines).
    pub thickness: f64,
    pub outline: OutlineMode,
}

impl ElementStyle {
    pub fn footprint(thickness: f64) -> Self {
        Self {
            thickness,
            outline: OutlineMode::Footprint,
        }
    }

    pub fn centerline(thickness: f64) -> Self {
        Self {
            thickness,
            outline: OutlineMode::Centerline,
        }
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self::footprint(DEFAULT_WALL_THICKNESS)
    }
}

pub const DEFAULT_WALL_THICKNESS: f64 = 0.1;
pub const DEFAULT_OPENING_THICKNESS: f64 = 0.05;
pub const DEFAULT_ARROW_LENGTH: f64 = 0.15;

/// Configuration for building a plan scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Axis signs shared by every element and pose.
    pub convention: PlanConvention,
    /// Rotate the scene so the longest wall is axis-aligned.
    pub auto_align: bool,
    /// Fixed rotation in degrees; takes precedence over `auto_align`.
    pub alignment_override_degrees: Option<f64>,
    pub wall: ElementStyle,
    pub door: ElementStyle,
    pub window: ElementStyle,
    /// Length of the facing-direction line on pose markers, in meters.
    pub arrow_length: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            convention: PlanConvention::CANONICAL,
            auto_align: true,
            alignment_override_degrees: None,
            wall: ElementStyle::footprint(DEFAULT_WALL_THICKNESS),
            door: ElementStyle::centerline(DEFAULT_OPENING_THICKNESS),
            window: ElementStyle::footprint(DEFAULT_OPENING_THICKNESS),
            arrow_length: DEFAULT_ARROW_LENGTH,
        }
    }
}

impl PlanConfig {
    /// Load a (partial) JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn style(&self, kind: ElementKind) -> &ElementStyle {
        match kind {
            ElementKind::Wall => &self.wall,
            ElementKind::Door => &self.door,
            ElementKind::Window => &self.window,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for kind in ElementKind::ALL {
            let thickness = self.style(kind).thickness;
            if !thickness.is_finite() || thickness < 0.0 {
                return Err(Error::config(format!(
                    "{} thickness must be a non-negative number, got {}",
                    kind, thickness
                )));
            }
        }
        if !self.arrow_length.is_finite() || self.arrow_length < 0.0 {
            return Err(Error::config(format!(
                "arrow_length must be a non-negative number, got {}",
                self.arrow_length
            )));
        }
        if let Some(angle) = self.alignment_override_degrees {
            if !angle.is_finite() {
                return Err(Error::config("alignment_override_degrees must be finite"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlanConfig::default();
        assert_eq!(config.convention, PlanConvention::CANONICAL);
        assert!(config.auto_align);
        assert_eq!(config.wall.thickness, 0.1);
        assert_eq!(config.door.outline, OutlineMode::Centerline);
        assert_eq!(config.window.outline, OutlineMode::Footprint);
        assert!(config.wall.thickness > config.window.thickness);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PlanConfig::from_json_str(
            r#"{ "convention": { "flip_u": true }, "door": { "outline": "footprint" }, "arrow_length": 0.3 }"#,
        )
        .unwrap();
        assert!(config.convention.flip_u);
        assert!(!config.convention.flip_v);
        assert_eq!(config.door.outline, OutlineMode::Footprint);
        assert_eq!(config.arrow_length, 0.3);
        assert_eq!(config.window, PlanConfig::default().window);
    }

    #[test]
    fn test_invalid_thickness_rejected() {
        let err = PlanConfig::from_json_str(r#"{ "window": { "thickness": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = PlanConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::ConfigJson(_)));
    }

    #[test]
    fn test_style_lookup() {
        let config = PlanConfig::default();
        assert_eq!(config.style(ElementKind::Door), &config.door);
        assert_eq!(config.style(ElementKind::Wall), &config.wall);
    }
}
