//! Arrow geometry.
//!
//! An arrow is a composite of one line and zero to two triangular heads.
//! Its internal geometry is never edited directly: every option change goes
//! through [`derive_arrow_geometry`], which recomputes line endpoints and head
//! polygons from the small option set so the parts always agree.

use crate::model::{Color, Composite, Point, ShapeKind, Size, Stroke, line, non_negative, polygon};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Which ends of the arrow carry a head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowEnds {
    None,
    Start,
    #[default]
    End,
    Both,
}

impl ArrowEnds {
    pub fn has_start(self) -> bool {
        matches!(self, ArrowEnds::Start | ArrowEnds::Both)
    }

    pub fn has_end(self) -> bool {
        matches!(self, ArrowEnds::End | ArrowEnds::Both)
    }
}

/// Tag on each child of an arrow composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrowPart {
    Line,
    StartHead,
    EndHead,
}

/// The option set an arrow's geometry is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArrowOptions {
    /// Overall tip-to-tip length.
    pub base_width: f64,
    pub stroke_width: f64,
    pub arrow_head_length: f64,
    pub arrow_ends: ArrowEnds,
    pub color: Color,
}

impl Default for ArrowOptions {
    fn default() -> Self {
        Self {
            base_width: 160.0,
            stroke_width: 3.0,
            arrow_head_length: 14.0,
            arrow_ends: ArrowEnds::End,
            color: crate::model::hex("#343A40"),
        }
    }
}

impl ArrowOptions {
    /// Head base width perpendicular to the line.
    pub fn head_width(&self) -> f64 {
        let stroke = non_negative(self.stroke_width);
        (non_negative(self.arrow_head_length) * 0.9).max(stroke * 2.5)
    }

    /// Composite height: tall enough for the heads or the stroke.
    pub fn height(&self) -> f64 {
        let stroke = non_negative(self.stroke_width).max(1.0);
        if self.arrow_ends == ArrowEnds::None {
            stroke
        } else {
            self.head_width().max(stroke)
        }
    }
}

/// Result of [`derive_arrow_geometry`], in composite-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowGeometry {
    pub width: f64,
    pub height: f64,
    /// Line endpoints `(start, end)`, already shortened for heads.
    pub line: (Point, Point),
    pub start_head: Option<[Point; 3]>,
    pub end_head: Option<[Point; 3]>,
}

impl ArrowGeometry {
    pub fn heads(&self) -> SmallVec<[(ArrowPart, [Point; 3]); 2]> {
        let mut out = SmallVec::new();
        if let Some(h) = self.start_head {
            out.push((ArrowPart::StartHead, h));
        }
        if let Some(h) = self.end_head {
            out.push((ArrowPart::EndHead, h));
        }
        out
    }
}

/// Derive line and head placement from the option set.
///
/// The arrow runs horizontally through the vertical center of its box. Each
/// head's tip sits on the box edge and its base sits exactly where the
/// (shortened) line ends.
pub fn derive_arrow_geometry(options: &ArrowOptions) -> ArrowGeometry {
    let width = non_negative(options.base_width);
    let height = options.height();
    let cy = height / 2.0;

    let has_start = options.arrow_ends.has_start();
    let has_end = options.arrow_ends.has_end();
    let heads = usize::from(has_start) + usize::from(has_end);

    // Two heads can never overlap: each gets at most half the length.
    let head_len = if heads == 0 {
        0.0
    } else {
        non_negative(options.arrow_head_length).min(width / heads as f64)
    };
    let half = options.head_width() / 2.0;

    let start_x = if has_start { head_len } else { 0.0 };
    let end_x = if has_end { width - head_len } else { width };

    let head = |tip: f64, dir: f64| -> [Point; 3] {
        let tip = kurbo::Point::new(tip, cy);
        let base = tip - Vec2::new(dir * head_len, 0.0);
        [
            tip.into(),
            (base + Vec2::new(0.0, -half)).into(),
            (base + Vec2::new(0.0, half)).into(),
        ]
    };

    ArrowGeometry {
        width,
        height,
        line: (Point::new(start_x, cy), Point::new(end_x, cy)),
        start_head: has_start.then(|| head(0.0, -1.0)),
        end_head: has_end.then(|| head(width, 1.0)),
    }
}

/// Build an arrow composite from its options.
pub fn build_arrow(options: &ArrowOptions) -> Composite {
    let geo = derive_arrow_geometry(options);
    let mut composite = Composite::new(ShapeKind::Arrow.label(), Size::new(geo.width, geo.height));
    apply_geometry(&mut composite, options, &geo);
    composite.annotation.shape_kind = Some(ShapeKind::Arrow);
    composite.annotation.arrow_options = Some(options.clone());
    composite
}

/// Replace an arrow composite's parts with freshly derived ones.
pub fn apply_geometry(composite: &mut Composite, options: &ArrowOptions, geo: &ArrowGeometry) {
    composite.children.clear();
    composite.width = geo.width;
    composite.height = geo.height;
    let stroke = Stroke::solid(options.color, options.stroke_width);
    let (a, b) = geo.line;
    composite.push_tagged(line(a.x, a.y, b.x, b.y, stroke), ArrowPart::Line);
    for (part, pts) in geo.heads() {
        composite.push_tagged(polygon(pts.to_vec(), Some(options.color), None), part);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(ends: ArrowEnds) -> ArrowOptions {
        ArrowOptions {
            base_width: 200.0,
            stroke_width: 4.0,
            arrow_head_length: 20.0,
            arrow_ends: ends,
            ..Default::default()
        }
    }

    #[test]
    fn no_heads_keeps_full_line() {
        let g = derive_arrow_geometry(&opts(ArrowEnds::None));
        assert_eq!(g.line.0.x, 0.0);
        assert_eq!(g.line.1.x, 200.0);
        assert!(g.start_head.is_none() && g.end_head.is_none());
    }

    #[test]
    fn heads_sit_on_line_endpoints() {
        let g = derive_arrow_geometry(&opts(ArrowEnds::Both));
        let start = g.start_head.unwrap();
        let end = g.end_head.unwrap();
        assert_eq!(start[0].x, 0.0);
        assert_eq!(end[0].x, 200.0);
        // head bases coincide with the shortened line
        assert_eq!(start[1].x, g.line.0.x);
        assert_eq!(end[1].x, g.line.1.x);
        assert_eq!(g.line.0.x, 20.0);
        assert_eq!(g.line.1.x, 180.0);
    }

    #[test]
    fn short_arrow_splits_length_between_heads() {
        let mut o = opts(ArrowEnds::Both);
        o.base_width = 30.0;
        let g = derive_arrow_geometry(&o);
        assert_eq!(g.line.0.x, 15.0);
        assert_eq!(g.line.1.x, 15.0);
    }

    #[test]
    fn build_arrow_tags_parts() {
        let c = build_arrow(&opts(ArrowEnds::End));
        let parts: Vec<_> = c.primitives().filter_map(|p| p.part).collect();
        assert_eq!(parts, vec![ArrowPart::Line, ArrowPart::EndHead]);
        assert!(c.annotation.arrow_options.is_some());
    }
}
