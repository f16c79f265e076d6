// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planview CLI - render a scanned room as a flat floor plan.
//!
//! Reads a room-capture document (`Room.json`) and, optionally, the photo
//! pose metadata (`exif.json`), builds the plan scene and writes it as JSON
//! or SVG.
//!
//! Usage:
//!   planview <Room.json> [--poses exif.json] [--config plan.json] [--format svg] [--output plan.svg]

mod svg;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use planview_core::{PoseRecordSet, ScanResult};
use planview_geometry::{PlanConfig, SceneAssembler, SceneBuild};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Scene primitives and diagnostics as JSON
    Json,
    /// Drawn floor plan
    Svg,
}

#[derive(Debug, Parser)]
#[command(name = "planview", version, about = "Render a scanned room as a flat floor plan")]
struct Args {
    /// Room-capture document (Room.json)
    room: PathBuf,

    /// Photo pose metadata: JSON object of photo id to metadata text
    #[arg(short, long)]
    poses: Option<PathBuf>,

    /// Plan configuration (JSON, partial overrides allowed)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable auto-alignment to the longest wall
    #[arg(long)]
    no_align: bool,

    /// Mirror the plan left/right
    #[arg(long)]
    flip_u: bool,

    /// Mirror the plan top/bottom
    #[arg(long)]
    flip_v: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let room_bytes = fs::read(&args.room)
        .with_context(|| format!("cannot read room document {}", args.room.display()))?;
    let scan = ScanResult::from_json_slice(&room_bytes)
        .with_context(|| format!("cannot parse room document {}", args.room.display()))?;

    let poses = match &args.poses {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read pose metadata {}", path.display()))?;
            PoseRecordSet::from_json_str(&text)
                .with_context(|| format!("cannot parse pose metadata {}", path.display()))?
        }
        None => PoseRecordSet::new(),
    };

    tracing::info!(
        room = %args.room.display(),
        rooms = scan.rooms.len(),
        poses = poses.len(),
        "loaded input"
    );

    let build = SceneAssembler::new(config)?.build(&scan, &poses);
    report(&build);

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&build)?,
        OutputFormat::Svg => svg::render_svg(&build.scene),
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Configuration file first, then command-line flags on top.
fn load_config(args: &Args) -> Result<PlanConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            PlanConfig::from_json_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => PlanConfig::default(),
    };

    if args.no_align {
        config.auto_align = false;
    }
    if args.flip_u {
        config.convention.flip_u = true;
    }
    if args.flip_v {
        config.convention.flip_v = true;
    }
    Ok(config)
}

fn report(build: &SceneBuild) {
    let diagnostics = &build.diagnostics;
    for dropped in &diagnostics.dropped_elements {
        tracing::warn!(
            room = dropped.room_index,
            kind = %dropped.kind,
            index = dropped.index,
            "{}",
            dropped.reason
        );
    }
    if !diagnostics.skipped_poses.is_empty() {
        tracing::warn!(
            count = diagnostics.skipped_poses.len(),
            "pose records without a readable position and rotation were skipped"
        );
    }
    tracing::info!(
        primitives = build.scene.primitives.len(),
        alignment_degrees = build.scene.alignment_degrees,
        reference_wall = diagnostics.reference_wall.as_deref().unwrap_or("-"),
        "scene ready"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "planview", "Room.json", "--poses", "exif.json", "--format", "svg", "--flip-u",
        ])
        .unwrap();
        assert_eq!(args.room, PathBuf::from("Room.json"));
        assert_eq!(args.poses, Some(PathBuf::from("exif.json")));
        assert_eq!(args.format, OutputFormat::Svg);
        assert!(args.flip_u);
        assert!(!args.flip_v);
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from(["planview", "Room.json", "--no-align", "--flip-v"]).unwrap();
        let config = load_config(&args).unwrap();
        assert!(!config.auto_align);
        assert!(config.convention.flip_v);
        assert!(!config.convention.flip_u);
    }

    #[test]
    fn test_clap_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
