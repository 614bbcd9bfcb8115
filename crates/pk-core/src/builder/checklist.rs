//! Checklist: header plus `max(rowCount, items)` rows of checkbox and text.

use super::header::{HeaderPalette, paint_header, resolve_header};
use super::{clamp_rect, font, framed, inset};
use crate::metadata::{CheckboxStyle, ChecklistMetadata};
use crate::model::{Composite, Stroke, TextAlign, line, non_negative, styled_rect, text};
use kurbo::Rect;

pub fn build_checklist(meta: &ChecklistMetadata) -> Composite {
    let size = meta.size.sanitized();
    let mut c = framed(
        "checklist",
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

    let rows = meta.row_count.max(meta.items.len()).max(1);
    let row_h = body.height() / rows as f64;
    let box_size = (row_h * 0.55).min(18.0).min(body.width());
    let text_size = non_negative(meta.item_font_size).min(row_h);
    let box_stroke = Stroke::solid(meta.checkbox_color, 1.5);
    let divider = Stroke::solid(meta.divider_color, 1.0);

    for i in 0..rows {
        let y = body.y0 + i as f64 * row_h;
        let item = meta.items.get(i);

        if box_size > 0.0 {
            let by = y + (row_h - box_size) / 2.0;
            let bounds = Rect::new(body.x0, by, body.x0 + box_size, by + box_size);
            let radius = match meta.checkbox_style {
                CheckboxStyle::Square => box_size * 0.2,
                CheckboxStyle::Circle => box_size / 2.0,
            };
            let checked = item.is_some_and(|it| it.checked);
            let fill = checked.then_some(meta.check_color.with_alpha(0.12));
            c.push(styled_rect(bounds, fill, Some(box_stroke.clone()), radius));
            if checked {
                paint_check(&mut c, bounds, &Stroke::solid(meta.check_color, (box_size * 0.12).max(1.5)));
            }
        }

        if let Some(item) = item.filter(|it| !it.text.is_empty()) {
            let x0 = body.x0 + box_size + 8.0;
            let ty = y + (row_h - text_size * 1.3).max(0.0) / 2.0;
            c.push(text(
                clamp_rect(Rect::new(x0, ty, body.x1, ty + text_size * 1.3), body),
                item.text.as_str(),
                font(&meta.font_family, text_size, 400),
                if item.checked {
                    meta.checked_text_color
                } else {
                    meta.item_text_color
                },
                TextAlign::Left,
            ));
        }

        if meta.show_dividers && i + 1 < rows {
            let dy = y + row_h;
            c.push(line(body.x0, dy, body.x1, dy, divider.clone()));
        }
    }
    c
}

/// Two-stroke check mark inside `b`.
fn paint_check(c: &mut Composite, b: Rect, stroke: &Stroke) {
    let (w, h) = (b.width(), b.height());
    let p0 = (b.x0 + w * 0.22, b.y0 + h * 0.52);
    let p1 = (b.x0 + w * 0.42, b.y0 + h * 0.72);
    let p2 = (b.x0 + w * 0.78, b.y0 + h * 0.30);
    c.push(line(p0.0, p0.1, p1.0, p1.1, stroke.clone()));
    c.push(line(p1.0, p1.1, p2.0, p2.1, stroke.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ChecklistItem;
    use crate::model::Shape;
    use pretty_assertions::assert_eq;

    fn item(text: &str, checked: bool) -> ChecklistItem {
        ChecklistItem {
            text: text.into(),
            checked,
        }
    }

    fn boxes(c: &Composite) -> usize {
        c.primitives()
            .filter(|p| matches!(&p.shape, Shape::Rect(r) if r.stroke.as_ref().is_some_and(|s| s.width == 1.5)))
            .count()
    }

    #[test]
    fn rows_cover_row_count_when_items_are_fewer() {
        let m = ChecklistMetadata {
            items: vec![item("Buy milk", false)],
            ..Default::default()
        };
        let c = build_checklist(&m);
        assert_eq!(boxes(&c), 8);
        assert!(c.texts().contains(&"Buy milk"));
    }

    #[test]
    fn rows_grow_with_items() {
        let m = ChecklistMetadata {
            items: (0..12).map(|i| item(&format!("task {i}"), i % 2 == 0)).collect(),
            ..Default::default()
        };
        let c = build_checklist(&m);
        assert_eq!(boxes(&c), 12);
        let b = c.content_bounds();
        assert!(b.y1 <= 400.0 + 1e-9);
    }

    #[test]
    fn checked_items_get_a_mark_and_muted_text() {
        let m = ChecklistMetadata {
            items: vec![item("done", true)],
            show_dividers: false,
            ..Default::default()
        };
        let c = build_checklist(&m);
        let marks = c
            .primitives()
            .filter(|p| matches!(&p.shape, Shape::Line(l) if l.stroke.color == m.check_color))
            .count();
        assert_eq!(marks, 2);
        let color = c
            .primitives()
            .find_map(|p| match &p.shape {
                Shape::Text(t) if t.text == "done" => Some(t.color),
                _ => None,
            })
            .unwrap();
        assert_eq!(color, m.checked_text_color);
    }
}
