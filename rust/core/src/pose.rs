// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera-pose text grammar using nom
//!
//! Photo metadata carries the capture pose as free text. Two position forms
//! are recognised anywhere in the string:
//!
//! - labelled: `translation=(1.0 0.0 2.0)`
//! - bracketed: `[1.0, 0.0, 2.0]`
//!
//! and the orientation as `rotation=(0.0° 90.0° 0.0°)` (pitch, yaw, roll).
//! When both position forms are present the labelled one wins; among
//! several bracketed triples the last one wins.
//!
//! Text that does not contain a position and a rotation, or whose values are
//! not finite, is [`PoseParse::Unparsed`], never an error the caller has to
//! propagate.

use std::fmt;

use indexmap::IndexMap;

use memchr::{memmem, memrchr_iter};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, multispace0, multispace1, one_of},
    combinator::{map, map_res, opt, recognize},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const TRANSLATION_LABEL: &str = "translation=(";
const ROTATION_LABEL: &str = "rotation=(";

/// Orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadingDegrees {
    pub pitch: f64,
    /// Rotation about the vertical axis; drives the facing direction.
    pub yaw: f64,
    pub roll: f64,
}

/// Parsed camera pose: world-space position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// World-space `[x, y, z]` in meters.
    pub position: [f64; 3],
    pub heading: HeadingDegrees,
}

/// Why a pose string was not usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseTextFault {
    MissingPosition,
    /// No `rotation=(` label at all.
    MissingRotation,
    /// A `rotation=(` label whose contents are not three degree values.
    MalformedRotation,
    MissingBoth,
    /// Overflowing or otherwise non-finite position or rotation component.
    NonFinite,
}

impl fmt::Display for PoseTextFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PoseTextFault::MissingPosition => "no position triple",
            PoseTextFault::MissingRotation => "no rotation=(...) block",
            PoseTextFault::MalformedRotation => "rotation=(...) block is not three degree values",
            PoseTextFault::MissingBoth => "no position triple and no readable rotation=(...) block",
            PoseTextFault::NonFinite => "position or rotation is not a finite number",
        })
    }
}

/// Tagged outcome of reading one pose string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseParse {
    Parsed(CameraPose),
    Unparsed(PoseTextFault),
}

impl PoseParse {
    pub fn pose(self) -> Option<CameraPose> {
        match self {
            PoseParse::Parsed(pose) => Some(pose),
            PoseParse::Unparsed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<CameraPose> {
        match self {
            PoseParse::Parsed(pose) => Ok(pose),
            PoseParse::Unparsed(fault) => Err(Error::malformed_pose(fault.to_string())),
        }
    }
}

/// Read a pose string.
pub fn parse_pose_text(text: &str) -> PoseParse {
    let position = find_translation(text).or_else(|| find_bracketed(text));
    let rotation = find_rotation(text);

    match (position, rotation) {
        (Some(position), Some(rotation))
            if !position.iter().chain(rotation.iter()).all(|v| v.is_finite()) =>
        {
            PoseParse::Unparsed(PoseTextFault::NonFinite)
        }
        (Some(position), Some([pitch, yaw, roll])) => PoseParse::Parsed(CameraPose {
            position,
            heading: HeadingDegrees { pitch, yaw, roll },
        }),
        (None, Some(_)) => PoseParse::Unparsed(PoseTextFault::MissingPosition),
        (Some(_), None) if has_rotation_label(text) => {
            PoseParse::Unparsed(PoseTextFault::MalformedRotation)
        }
        (Some(_), None) => PoseParse::Unparsed(PoseTextFault::MissingRotation),
        (None, None) => PoseParse::Unparsed(PoseTextFault::MissingBoth),
    }
}

/// One raw pose record: photo identifier and its metadata text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraPoseRecord {
    pub photo_id: String,
    pub text: String,
}

impl CameraPoseRecord {
    pub fn new(photo_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            photo_id: photo_id.into(),
            text: text.into(),
        }
    }

    pub fn parse(&self) -> PoseParse {
        parse_pose_text(&self.text)
    }
}

/// The `exif.json` document: photo identifier to metadata text.
///
/// Iteration follows document order; re-inserting a photo keeps its place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseRecordSet(IndexMap<String, String>);

impl PoseRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, photo_id: impl Into<String>, text: impl Into<String>) {
        self.0.insert(photo_id.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = CameraPoseRecord> + '_ {
        self.0
            .iter()
            .map(|(photo_id, text)| CameraPoseRecord::new(photo_id.as_str(), text.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PoseRecordSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parse a real number: -1, 2., .5, 3.25, 1e-3
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| fast_float::parse::<f64, _>(s),
    )(input)
}

/// Parse a number followed by a degree sign: 90.0°
fn degrees(input: &str) -> IResult<&str, f64> {
    terminated(number, preceded(multispace0, char('°')))(input)
}

/// Parse `translation=(x y z)`
fn translation(input: &str) -> IResult<&str, [f64; 3]> {
    map(
        delimited(
            tag(TRANSLATION_LABEL),
            tuple((
                preceded(multispace0, number),
                preceded(multispace1, number),
                preceded(multispace1, number),
            )),
            preceded(multispace0, char(')')),
        ),
        |(x, y, z)| [x, y, z],
    )(input)
}

/// Parse a comma with optional surrounding whitespace
fn comma(input: &str) -> IResult<&str, char> {
    delimited(multispace0, char(','), multispace0)(input)
}

/// Parse `[x, y, z]`
fn bracketed(input: &str) -> IResult<&str, [f64; 3]> {
    map(
        delimited(
            pair(char('['), multispace0),
            tuple((number, preceded(comma, number), preceded(comma, number))),
            pair(multispace0, char(']')),
        ),
        |(x, y, z)| [x, y, z],
    )(input)
}

/// Parse `rotation=(x° y° z°)`
fn rotation(input: &str) -> IResult<&str, [f64; 3]> {
    map(
        delimited(
            tag(ROTATION_LABEL),
            tuple((
                preceded(multispace0, degrees),
                preceded(multispace0, degrees),
                preceded(multispace0, degrees),
            )),
            preceded(multispace0, char(')')),
        ),
        |(x, y, z)| [x, y, z],
    )(input)
}

/// First `translation=(...)` that parses.
fn find_translation(text: &str) -> Option<[f64; 3]> {
    memmem::find_iter(text.as_bytes(), TRANSLATION_LABEL.as_bytes())
        .find_map(|start| translation(&text[start..]).ok().map(|(_, v)| v))
}

/// Last `[x, y, z]` that parses.
fn find_bracketed(text: &str) -> Option<[f64; 3]> {
    memrchr_iter(b'[', text.as_bytes())
        .find_map(|start| bracketed(&text[start..]).ok().map(|(_, v)| v))
}

fn has_rotation_label(text: &str) -> bool {
    memmem::find(text.as_bytes(), ROTATION_LABEL.as_bytes()).is_some()
}

/// First `rotation=(...)` that parses.
fn find_rotation(text: &str) -> Option<[f64; 3]> {
    memmem::find_iter(text.as_bytes(), ROTATION_LABEL.as_bytes())
        .find_map(|start| rotation(&text[start..]).ok().map(|(_, v)| v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number() {
        assert_eq!(number("3.25"), Ok(("", 3.25)));
        assert_eq!(number("-1"), Ok(("", -1.0)));
        assert_eq!(number("2."), Ok(("", 2.0)));
        assert_eq!(number(".5"), Ok(("", 0.5)));
        assert_eq!(number("1e-3,"), Ok((",", 0.001)));
        assert!(number("abc").is_err());
    }

    #[test]
    fn test_bracketed() {
        assert_eq!(bracketed("[1.0, 0.0, 2.0]"), Ok(("", [1.0, 0.0, 2.0])));
        assert_eq!(bracketed("[ -1,2.5 ,3 ]"), Ok(("", [-1.0, 2.5, 3.0])));
        assert!(bracketed("[1.0, 2.0]").is_err());
    }

    #[test]
    fn test_translation() {
        assert_eq!(
            translation("translation=(0.5 -1.25 3)"),
            Ok(("", [0.5, -1.25, 3.0]))
        );
        assert!(translation("translation=(0.5, 1, 3)").is_err());
    }

    #[test]
    fn test_rotation() {
        assert_eq!(
            rotation("rotation=(0° 90° 0°)"),
            Ok(("", [0.0, 90.0, 0.0]))
        );
        assert_eq!(
            rotation("rotation=(-12.5° 181.0° 3°) tail"),
            Ok((" tail", [-12.5, 181.0, 3.0]))
        );
        assert!(rotation("rotation=(0 90 0)").is_err());
    }

    #[test]
    fn test_parse_bracketed_pose() {
        let parsed = parse_pose_text("camera at [1.0, 0.0, 2.0] rotation=(0° 90° 0°)");
        let pose = parsed.pose().unwrap();
        assert_eq!(pose.position, [1.0, 0.0, 2.0]);
        assert_eq!(pose.heading.yaw, 90.0);
        assert_eq!(pose.heading.pitch, 0.0);
        assert_eq!(pose.heading.roll, 0.0);
    }

    #[test]
    fn test_parse_translation_pose() {
        let text = "Transform(rotation=(1.5° -45.0° 0.2°), translation=(0.25 1.4 -2.0))";
        let pose = parse_pose_text(text).into_result().unwrap();
        assert_eq!(pose.position, [0.25, 1.4, -2.0]);
        assert_eq!(pose.heading.yaw, -45.0);
    }

    #[test]
    fn test_translation_preferred_over_bracket() {
        let text = "[9, 9, 9] translation=(1 2 3) rotation=(0° 0° 0°)";
        assert_eq!(parse_pose_text(text).pose().unwrap().position, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_last_bracket_wins() {
        let text = "rotation=(0° 0° 0°) [1, 1, 1] [2, 2, 2]";
        assert_eq!(parse_pose_text(text).pose().unwrap().position, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_missing_rotation_is_unparsed() {
        assert_eq!(
            parse_pose_text("[1.0, 0.0, 2.0]"),
            PoseParse::Unparsed(PoseTextFault::MissingRotation)
        );
        let err = parse_pose_text("[1.0, 0.0, 2.0]").into_result().unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_missing_position_is_unparsed() {
        assert_eq!(
            parse_pose_text("rotation=(0° 0° 0°)"),
            PoseParse::Unparsed(PoseTextFault::MissingPosition)
        );
        assert_eq!(
            parse_pose_text("IMG_0001 no metadata"),
            PoseParse::Unparsed(PoseTextFault::MissingBoth)
        );
    }

    #[test]
    fn test_malformed_rotation_is_distinguished() {
        assert_eq!(
            parse_pose_text("[1.0, 0.0, 2.0] rotation=(0 90 0)"),
            PoseParse::Unparsed(PoseTextFault::MalformedRotation)
        );
        assert_eq!(
            parse_pose_text("rotation=(0 90 0)"),
            PoseParse::Unparsed(PoseTextFault::MissingBoth)
        );
        // A later well-formed block still counts.
        let text = "[1, 2, 3] rotation=(bad) rotation=(0° 45° 0°)";
        assert_eq!(parse_pose_text(text).pose().unwrap().heading.yaw, 45.0);
    }

    #[test]
    fn test_non_finite_values_are_unparsed() {
        // 1e999 overflows to infinity.
        assert_eq!(number("1e999"), Ok(("", f64::INFINITY)));
        assert_eq!(
            parse_pose_text("[1e999, 0, 0] rotation=(0° 0° 0°)"),
            PoseParse::Unparsed(PoseTextFault::NonFinite)
        );
        assert_eq!(
            parse_pose_text("[0, 0, 0] rotation=(0° 1e999° 0°)"),
            PoseParse::Unparsed(PoseTextFault::NonFinite)
        );
        assert_eq!(
            parse_pose_text("translation=(0 -1e999 0) rotation=(0° 0° 0°)"),
            PoseParse::Unparsed(PoseTextFault::NonFinite)
        );
    }

    #[test]
    fn test_record_set_keeps_document_order() {
        let mut set = PoseRecordSet::from_json_str(
            r#"{ "b.jpg": "x", "a.jpg": "[1, 2, 3] rotation=(0° 0° 0°)", "c.jpg": "y" }"#,
        )
        .unwrap();
        let ids: Vec<_> = set.records().map(|r| r.photo_id).collect();
        assert_eq!(ids, vec!["b.jpg", "a.jpg", "c.jpg"]);
        assert_eq!(set.len(), 3);

        set.insert("b.jpg", "z");
        set.insert("d.jpg", "w");
        let ids: Vec<_> = set.records().map(|r| r.photo_id).collect();
        assert_eq!(ids, vec!["b.jpg", "a.jpg", "c.jpg", "d.jpg"]);
    }
}
