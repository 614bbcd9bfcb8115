//! Hourly schedule: a time column and one ruled slot per interval.

use super::header::{HeaderPalette, paint_header, resolve_header};
use super::{clamp_rect, font, framed, inset};
use crate::locale::time_label;
use crate::metadata::ScheduleMetadata;
use crate::model::{Composite, Stroke, TextAlign, line, non_negative, text};
use kurbo::Rect;

/// Number of labelled slots: `floor((end − start) × 60 / interval) + 1`.
///
/// A zero interval is treated as 60 minutes. Hours are clamped to a day and
/// an inverted range yields a single slot.
pub fn slot_count(start_hour: u32, end_hour: u32, interval_minutes: u32) -> usize {
    let interval = if interval_minutes == 0 { 60 } else { interval_minutes };
    let start = start_hour.min(24);
    let end = end_hour.min(24);
    let span = end.saturating_sub(start) * 60;
    (span / interval) as usize + 1
}

pub fn build_schedule(meta: &ScheduleMetadata) -> Composite {
    let size = meta.size.sanitized();
    let mut c = framed(
        "schedule",
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

    let interval = if meta.interval_minutes == 0 { 60 } else { meta.interval_minutes };
    let start = meta.start_hour.min(24);
    let slots = slot_count(meta.start_hour, meta.end_hour, meta.interval_minutes);
    let slot_h = body.height() / slots as f64;
    let time_w = non_negative(meta.time_column_width).min(body.width());
    let label_size = non_negative(meta.label_font_size).min(slot_h);
    let stroke = Stroke::solid(meta.line_color, meta.line_width);

    if time_w > 0.0 && body.height() > 0.0 {
        c.push(line(body.x0 + time_w, body.y0, body.x0 + time_w, body.y1, stroke.clone()));
    }

    for i in 0..slots {
        let y = body.y0 + i as f64 * slot_h;
        let minutes = start * 60 + i as u32 * interval;
        if time_w > 0.0 && label_size > 0.0 {
            c.push(text(
                clamp_rect(Rect::new(body.x0, y, body.x0 + time_w - 4.0, y + label_size * 1.3), body),
                time_label(meta.time_format, minutes),
                font(&meta.font_family, label_size, 500),
                meta.label_color,
                TextAlign::Left,
            ));
        }
        c.push(line(body.x0 + time_w, y, body.x1, y, stroke.clone()));
        if meta.show_half_lines {
            let half = y + slot_h / 2.0;
            c.push(line(
                body.x0 + time_w,
                half,
                body.x1,
                half,
                Stroke::dashed(meta.line_color, meta.line_width, vec![4.0, 4.0]),
            ));
        }
    }

    log::trace!("schedule {start}h–{}h every {interval}m: {slots} slots", meta.end_hour);
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Shape;
    use pretty_assertions::assert_eq;

    #[test]
    fn slot_formula() {
        assert_eq!(slot_count(8, 20, 60), 13);
        assert_eq!(slot_count(8, 20, 30), 25);
        assert_eq!(slot_count(9, 10, 45), 2);
        assert_eq!(slot_count(8, 20, 0), 13);
        assert_eq!(slot_count(20, 8, 60), 1);
    }

    #[test]
    fn labels_follow_time_format() {
        let c = build_schedule(&ScheduleMetadata::default());
        let texts = c.texts();
        assert!(texts.contains(&"08:00"));
        assert!(texts.contains(&"20:00"));
        assert_eq!(texts.iter().filter(|t| t.contains(':')).count(), 13);
    }

    #[test]
    fn half_lines_are_dashed() {
        let m = ScheduleMetadata {
            show_half_lines: true,
            ..Default::default()
        };
        let c = build_schedule(&m);
        let dashed = c
            .primitives()
            .filter(|p| matches!(&p.shape, Shape::Line(l) if l.stroke.dash.is_some()))
            .count();
        assert_eq!(dashed, 13);
    }

    #[test]
    fn stays_inside_frame() {
        let c = build_schedule(&ScheduleMetadata::default());
        let b = c.content_bounds();
        assert!(b.y1 <= 640.0 + 1e-9);
    }
}
