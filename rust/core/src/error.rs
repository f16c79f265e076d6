// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for room-capture input.

use crate::scan::ElementKind;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading room-capture and camera-pose input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Pose text did not match the expected grammar.
    #[error("malformed pose text: {reason}")]
    MalformedPoseText { reason: String },

    /// Element has no identifier.
    #[error("{kind} #{index} has no identifier")]
    MissingIdentifier { kind: ElementKind, index: usize },

    /// Element carries no placement transform.
    #[error("{kind} '{identifier}' has no transform")]
    MissingTransform {
        kind: ElementKind,
        identifier: String,
    },

    /// Element carries no dimensions (or an empty list).
    #[error("{kind} '{identifier}' has no dimensions")]
    MissingDimensions {
        kind: ElementKind,
        identifier: String,
    },

    /// Transform is present but is not 16 values.
    #[error("{kind} '{identifier}' transform has {len} values, expected 16")]
    InvalidTransform {
        kind: ElementKind,
        identifier: String,
        len: usize,
    },

    /// Transform or width contains NaN or infinity.
    #[error("{kind} '{identifier}' contains a non-finite value")]
    NonFiniteValue {
        kind: ElementKind,
        identifier: String,
    },

    /// Input document is not JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed_pose(reason: impl Into<String>) -> Self {
        Error::MalformedPoseText {
            reason: reason.into(),
        }
    }

    /// True for the per-record text failure that callers skip silently.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::MalformedPoseText { .. })
    }
}
