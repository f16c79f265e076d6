// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Planview Core
//!
//! Input side of the floor-plan pipeline: the room-capture data model and the
//! camera-pose text grammar built with [nom](https://docs.rs/nom).
//!
//! ## Overview
//!
//! - **Room documents**: `Room.json` deserializes into [`ScanResult`]; each
//!   element is validated on its own with [`ElementRecord::validate`]
//! - **Pose records**: `exif.json` deserializes into [`PoseRecordSet`]; each
//!   text is read with [`parse_pose_text`] into a tagged [`PoseParse`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use planview_core::{parse_pose_text, ElementKind, ScanResult};
//!
//! let scan = ScanResult::from_json_str(&room_json)?;
//! for room in &scan.rooms {
//!     for (kind, index, record) in room.elements() {
//!         match record.validate(kind, index) {
//!             Ok(element) => println!("{} {} {:.2}m", kind, element.identifier, element.width()),
//!             Err(e) => eprintln!("skipping: {}", e),
//!         }
//!     }
//! }
//!
//! let pose = parse_pose_text("[1.0, 0.0, 2.0] rotation=(0° 90° 0°)");
//! assert!(pose.pose().is_some());
//! ```

pub mod error;
pub mod pose;
pub mod scan;

pub use error::{Error, Result};
pub use pose::{
    parse_pose_text, CameraPose, CameraPoseRecord, HeadingDegrees, PoseParse, PoseRecordSet,
    PoseTextFault,
};
pub use scan::{ElementKind, ElementRecord, Room, ScanResult, StructuralElement, Transform4x4};
