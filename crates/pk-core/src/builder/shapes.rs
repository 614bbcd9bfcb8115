//! Free-standing shapes and text boxes from the shape palette.
//!
//! Unlike metadata-driven elements these are not rebuilt on resize; they
//! carry only a `shapeKind` annotation.

use crate::arrow::{ArrowOptions, build_arrow};
use crate::model::{
    Color, Composite, FontSpec, Point, ShapeKind, Size, Stroke, TextAlign, hex, line, non_negative, polygon,
    styled_rect, text,
};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Ellipses are approximated by this many polygon vertices.
const ELLIPSE_SEGMENTS: usize = 48;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
    pub corner_radius: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Some(hex("#4C6EF5")),
            stroke: None,
            corner_radius: 12.0,
        }
    }
}

/// Default palette size for a shape kind.
pub fn default_size(kind: ShapeKind) -> Size {
    match kind {
        ShapeKind::Line => Size::new(160.0, 4.0),
        ShapeKind::Arrow => Size::new(160.0, 16.0),
        ShapeKind::Text => Size::new(200.0, 24.0),
        _ => Size::new(120.0, 120.0),
    }
}

pub fn build_shape(kind: ShapeKind, size: Size, style: &ShapeStyle) -> Composite {
    let size = size.sanitized();
    let (w, h) = (size.width, size.height);
    let full = Rect::new(0.0, 0.0, w, h);

    let mut c = match kind {
        ShapeKind::Arrow => {
            return build_arrow(&ArrowOptions {
                base_width: w,
                color: style.fill.unwrap_or(ArrowOptions::default().color),
                ..Default::default()
            });
        }
        ShapeKind::Text => {
            return build_text("Text", &FontSpec::default(), hex("#212529"), w);
        }
        _ => Composite::new(kind.label(), size),
    };

    match kind {
        ShapeKind::Rectangle => c.push(styled_rect(full, style.fill, style.stroke.clone(), 0.0)),
        ShapeKind::RoundedRectangle => {
            c.push(styled_rect(full, style.fill, style.stroke.clone(), style.corner_radius))
        }
        ShapeKind::Ellipse => {
            let (cx, cy) = (w / 2.0, h / 2.0);
            let points = (0..ELLIPSE_SEGMENTS)
                .map(|i| {
                    let t = TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
                    Point::new(cx + cx * t.cos(), cy + cy * t.sin())
                })
                .collect();
            c.push(polygon(points, style.fill, style.stroke.clone()));
        }
        ShapeKind::Triangle => c.push(polygon(
            vec![Point::new(w / 2.0, 0.0), Point::new(w, h), Point::new(0.0, h)],
            style.fill,
            style.stroke.clone(),
        )),
        ShapeKind::Diamond => c.push(polygon(
            vec![
                Point::new(w / 2.0, 0.0),
                Point::new(w, h / 2.0),
                Point::new(w / 2.0, h),
                Point::new(0.0, h / 2.0),
            ],
            style.fill,
            style.stroke.clone(),
        )),
        ShapeKind::Star => c.push(polygon(star_points(w, h, 5, 0.4), style.fill, style.stroke.clone())),
        ShapeKind::Line => {
            let stroke = style
                .stroke
                .clone()
                .unwrap_or_else(|| Stroke::solid(style.fill.unwrap_or(Color::BLACK), h.max(1.0)));
            c.push(line(0.0, h / 2.0, w, h / 2.0, stroke));
        }
        ShapeKind::Arrow | ShapeKind::Text => {}
    }

    c.annotation.shape_kind = Some(kind);
    c
}

/// `points`-pointed star inscribed in a `w × h` box, first point up.
fn star_points(w: f64, h: f64, points: usize, inner_ratio: f64) -> Vec<Point> {
    let (cx, cy) = (w / 2.0, h / 2.0);
    (0..points * 2)
        .map(|i| {
            let t = -FRAC_PI_2 + TAU * i as f64 / (points * 2) as f64;
            let k = if i % 2 == 0 { 1.0 } else { inner_ratio };
            Point::new(cx + cx * k * t.cos(), cy + cy * k * t.sin())
        })
        .collect()
}

/// A free text box. Height follows the line count.
pub fn build_text(content: &str, font: &FontSpec, color: Color, width: f64) -> Composite {
    let lines = content.lines().count().max(1);
    let height = lines as f64 * font.size * 1.3;
    let size = Size::new(non_negative(width), height);
    let mut c = Composite::new(ShapeKind::Text.label(), size);
    c.push(text(
        Rect::new(0.0, 0.0, size.width, height),
        content,
        font.clone(),
        color,
        TextAlign::Left,
    ));
    c.annotation.shape_kind = Some(ShapeKind::Text);
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Shape;

    #[test]
    fn closed_shapes_fill_their_box() {
        for kind in [
            ShapeKind::Rectangle,
            ShapeKind::RoundedRectangle,
            ShapeKind::Ellipse,
            ShapeKind::Triangle,
            ShapeKind::Diamond,
        ] {
            let c = build_shape(kind, Size::new(100.0, 60.0), &ShapeStyle::default());
            let b = c.content_bounds();
            assert!((b.width() - 100.0).abs() < 1e-6, "{kind:?}");
            assert!((b.height() - 60.0).abs() < 1e-6, "{kind:?}");
            assert_eq!(c.annotation.shape_kind, Some(kind));
        }
    }

    #[test]
    fn star_has_ten_vertices_within_box() {
        let c = build_shape(ShapeKind::Star, Size::new(100.0, 100.0), &ShapeStyle::default());
        let Some(Shape::Polygon(p)) = c.primitives().next().map(|p| &p.shape) else {
            panic!("expected polygon");
        };
        assert_eq!(p.points.len(), 10);
        let b = c.content_bounds();
        assert!(b.x0 >= -1e-9 && b.x1 <= 100.0 + 1e-9);
    }

    #[test]
    fn arrow_kind_builds_arrow_composite() {
        let c = build_shape(ShapeKind::Arrow, Size::new(240.0, 10.0), &ShapeStyle::default());
        assert_eq!(c.annotation.shape_kind, Some(ShapeKind::Arrow));
        assert_eq!(c.annotation.arrow_options.as_ref().map(|o| o.base_width), Some(240.0));
    }

    #[test]
    fn text_height_tracks_lines() {
        let font = FontSpec::new("Pretendard", 10.0, 400);
        let c = build_text("a\nb\nc", &font, Color::BLACK, 80.0);
        assert!((c.height - 39.0).abs() < 1e-9);
        assert_eq!(c.texts(), vec!["a\nb\nc"]);
    }
}
