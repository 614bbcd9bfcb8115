//! Planner note: header plus a ruled, grid, dotted, or blank writing area.

use super::header::{HeaderPalette, paint_header, resolve_header};
use super::{font, framed, inset};
use crate::metadata::{NotePattern, PlannerNoteMetadata};
use crate::model::{Composite, Stroke, line, non_negative, styled_rect};
use kurbo::Rect;

/// Patterns finer than this are skipped instead of flooding the composite.
const MIN_SPACING: f64 = 4.0;

pub fn build_planner_note(meta: &PlannerNoteMetadata) -> Composite {
    let size = meta.size.sanitized();
    let mut c = framed(
        "planner-note",
        size,
        meta.background_color,
        meta.border_color,
        meta.border_width,
        meta.corner_radius,
    );

    let header = resolve_header(
        meta.header_style,
        meta.header_height,
        size.height,
        HeaderPalette {
            accent: meta.accent_color,
            title: meta.title_color,
            header_text: meta.header_text_color,
            divider: meta.divider_color,
        },
    );
    paint_header(
        &mut c,
        &header,
        size.width,
        meta.padding,
        meta.corner_radius,
        &meta.title,
        font(&meta.font_family, meta.title_font_size, 600),
    );

    let inner = inset(size, meta.padding);
    let top = if header.height > 0.0 {
        (header.height + inner.y0 * 0.5).min(inner.y1)
    } else {
        inner.y0
    };
    let body = Rect::new(inner.x0, top, inner.x1, inner.y1);
    if body.height() > 0.0 {
        paint_pattern(&mut c, body, meta);
    }
    c
}

fn paint_pattern(c: &mut Composite, body: Rect, meta: &PlannerNoteMetadata) {
    let spacing = non_negative(meta.line_spacing);
    if spacing < MIN_SPACING {
        return;
    }
    let stroke = Stroke::solid(meta.pattern_color, meta.pattern_width);

    match meta.pattern {
        NotePattern::Blank => {}
        NotePattern::Ruled => {
            let mut y = body.y0 + spacing;
            while y <= body.y1 {
                c.push(line(body.x0, y, body.x1, y, stroke.clone()));
                y += spacing;
            }
        }
        NotePattern::Grid => {
            let mut y = body.y0;
            while y <= body.y1 {
                c.push(line(body.x0, y, body.x1, y, stroke.clone()));
                y += spacing;
            }
            let mut x = body.x0;
            while x <= body.x1 {
                c.push(line(x, body.y0, x, body.y1, stroke.clone()));
                x += spacing;
            }
        }
        NotePattern::Dot => {
            let r = non_negative(meta.dot_radius).min(spacing / 2.0);
            let mut y = body.y0 + r;
            while y + r <= body.y1 {
                let mut x = body.x0 + r;
                while x + r <= body.x1 {
                    c.push(styled_rect(
                        Rect::new(x - r, y - r, x + r, y + r),
                        Some(meta.pattern_color),
                        None,
                        r,
                    ));
                    x += spacing;
                }
                y += spacing;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::HeaderStyle;
    use crate::model::{Shape, Size};

    fn lines(c: &Composite) -> usize {
        c.primitives().filter(|p| matches!(p.shape, Shape::Line(_))).count()
    }

    #[test]
    fn ruled_lines_fill_body() {
        let m = PlannerNoteMetadata {
            size: Size::new(200.0, 200.0),
            header_style: HeaderStyle::None,
            padding: 0.0,
            line_spacing: 20.0,
            ..Default::default()
        };
        let c = build_planner_note(&m);
        // y = 20, 40, …, 200
        assert_eq!(lines(&c), 10);
    }

    #[test]
    fn blank_has_no_pattern() {
        let m = PlannerNoteMetadata {
            pattern: NotePattern::Blank,
            header_style: HeaderStyle::Filled,
            ..Default::default()
        };
        let c = build_planner_note(&m);
        assert_eq!(lines(&c), 0);
        assert_eq!(c.texts(), vec!["Notes"]);
    }

    #[test]
    fn dots_stay_inside() {
        let m = PlannerNoteMetadata {
            pattern: NotePattern::Dot,
            ..Default::default()
        };
        let c = build_planner_note(&m);
        let b = c.content_bounds();
        assert!(b.x1 <= m.size.width && b.y1 <= m.size.height);
        assert!(c.children.len() > 50);
    }

    #[test]
    fn degenerate_spacing_is_skipped() {
        let m = PlannerNoteMetadata {
            line_spacing: 0.0,
            pattern: NotePattern::Grid,
            ..Default::default()
        };
        assert_eq!(lines(&build_planner_note(&m)), 1); // header divider only
    }
}
