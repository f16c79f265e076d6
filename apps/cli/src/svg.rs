// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SVG floor plan writer.
//!
//! SVG units are meters. Plan `v` points up while SVG y points down, so every
//! point is written as `(u, -v)`.

use planview_core::ElementKind;
use planview_geometry::{PlanBounds, PlanPoint, RenderablePrimitive, Scene};
use svg::node::element::{Circle, Definitions, Group, Line, Polygon, Rectangle, Style, Title};
use svg::Document;

/// Margin around the drawing, in meters.
const MARGIN: f64 = 0.5;
/// View used when the scene has nothing to frame.
const EMPTY_VIEW: PlanBounds = PlanBounds {
    min_u: -5.0,
    min_v: -5.0,
    max_u: 5.0,
    max_v: 5.0,
};
/// Output pixels per meter.
const SCALE: f64 = 100.0;
const MARKER_RADIUS: f64 = 0.06;

const STYLESHEET: &str = "
.wall { fill: #666; stroke: #666; stroke-width: 0.03; }
.door { fill: none; stroke: #000; stroke-width: 0.03; stroke-dasharray: 0.06; }
.window { fill: #cce6ff; stroke: #4d94ff; stroke-width: 0.03; }
.camera { fill: #ff4081; stroke: #ff4081; stroke-width: 0.02; }
";

/// Directory the photo identifiers are resolved against in marker titles.
pub const PHOTO_DIR: &str = "photos";

pub fn render_svg(scene: &Scene) -> String {
    let view = scene
        .bounds()
        .map(|b| b.padded(MARGIN))
        .unwrap_or(EMPTY_VIEW);

    let view_box = format!(
        "{} {} {} {}",
        fmt_num(view.min_u),
        fmt_num(-view.max_v),
        fmt_num(view.width()),
        fmt_num(view.height())
    );

    let mut doc = Document::new()
        .set("width", fmt_num(view.width() * SCALE))
        .set("height", fmt_num(view.height() * SCALE))
        .set("viewBox", view_box)
        .add(Definitions::new().add(Style::new(STYLESHEET)))
        .add(
            Rectangle::new()
                .set("x", fmt_num(view.min_u))
                .set("y", fmt_num(-view.max_v))
                .set("width", fmt_num(view.width()))
                .set("height", fmt_num(view.height()))
                .set("fill", "white"),
        );

    for primitive in &scene.primitives {
        doc = match primitive {
            RenderablePrimitive::Polygon(polygon) => doc.add(
                Polygon::new()
                    .set("class", class_for(polygon.style))
                    .set("points", points_attr(&polygon.points))
                    .add(Title::new(
                        polygon.label.as_deref().unwrap_or(&polygon.identifier),
                    )),
            ),
            RenderablePrimitive::Segment(segment) => doc.add(
                line(segment.start, segment.end)
                    .set("class", class_for(segment.style))
                    .add(Title::new(
                        segment.label.as_deref().unwrap_or(&segment.identifier),
                    )),
            ),
            RenderablePrimitive::PoseMarker(marker) => doc.add(
                Group::new()
                    .set("class", "camera")
                    .add(Title::new(format!("{}/{}", PHOTO_DIR, marker.photo_id)))
                    .add(
                        Circle::new()
                            .set("cx", fmt_num(marker.position.u))
                            .set("cy", fmt_num(-marker.position.v))
                            .set("r", MARKER_RADIUS),
                    )
                    .add(line(marker.position, marker.facing_endpoint)),
            ),
        };
    }

    doc.to_string()
}

fn class_for(kind: ElementKind) -> &'static str {
    kind.as_str()
}

fn line(start: PlanPoint, end: PlanPoint) -> Line {
    Line::new()
        .set("x1", fmt_num(start.u))
        .set("y1", fmt_num(-start.v))
        .set("x2", fmt_num(end.u))
        .set("y2", fmt_num(-end.v))
}

fn points_attr(points: &[PlanPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.u), fmt_num(-p.v)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Four decimals (0.1 mm), with `-0` normalised to `0`.
fn fmt_num(value: f64) -> String {
    let s = format!("{:.4}", value);
    if s.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        "0.0000".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planview_geometry::{PlanPolygon, PlanSegment, PoseMarker};

    fn sample_scene() -> Scene {
        Scene {
            alignment_degrees: 0.0,
            primitives: vec![
                RenderablePrimitive::Polygon(PlanPolygon {
                    identifier: "W1".into(),
                    style: ElementKind::Wall,
                    points: [
                        PlanPoint::new(-2.0, -0.05),
                        PlanPoint::new(2.0, -0.05),
                        PlanPoint::new(2.0, 0.05),
                        PlanPoint::new(-2.0, 0.05),
                    ]
                    .into_iter()
                    .collect(),
                    label: Some("13.1ft".into()),
                }),
                RenderablePrimitive::Segment(PlanSegment {
                    identifier: "D1".into(),
                    style: ElementKind::Door,
                    start: PlanPoint::new(0.0, 1.0),
                    end: PlanPoint::new(0.9, 1.0),
                    label: None,
                }),
                RenderablePrimitive::PoseMarker(PoseMarker {
                    photo_id: "IMG_1.jpg".into(),
                    position: PlanPoint::new(1.0, 1.0),
                    facing_endpoint: PlanPoint::new(1.0, 1.15),
                }),
            ],
        }
    }

    #[test]
    fn test_render_contains_every_primitive() {
        let svg = render_svg(&sample_scene());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"class="wall""#));
        assert!(svg.contains("13.1ft"));
        assert!(svg.contains(r#"class="door""#));
        assert!(svg.contains("D1"));
        assert!(svg.contains(r#"class="camera""#));
        assert!(svg.contains("photos/IMG_1.jpg"));
        assert!(svg.contains(".window {"));
    }

    #[test]
    fn test_plan_v_is_flipped_for_svg() {
        let svg = render_svg(&sample_scene());
        // Door at v = 1.0 is drawn at SVG y = -1.0.
        assert!(svg.contains(r#"y1="-1.0000""#));
        assert!(svg.contains("-2.0000,0.0500"));
    }

    #[test]
    fn test_view_box_pads_bounds() {
        let svg = render_svg(&sample_scene());
        // u spans -2..2, v spans -0.05..1.15, plus 0.5 margin.
        assert!(svg.contains(r#"viewBox="-2.5000 -1.6500 5.0000 2.2000""#));
        assert!(svg.contains(r#"width="500.0000""#));
    }

    #[test]
    fn test_empty_scene_uses_default_view() {
        let svg = render_svg(&Scene::default());
        assert!(svg.contains(r#"viewBox="-5.0000 -5.0000 10.0000 10.0000""#));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(-0.0), "0.0000");
        assert_eq!(fmt_num(-0.00001), "0.0000");
        assert_eq!(fmt_num(1.23456), "1.2346");
    }
}
