// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a plan scene
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid plan configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration JSON error: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("Core input error: {0}")]
    CoreError(#[from] planview_core::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }
}
