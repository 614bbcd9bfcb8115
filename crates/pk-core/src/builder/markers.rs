//! Day cell painting shared by the calendar grid and the week strip,
//! including the holiday marker treatments.

use super::clamp_rect;
use crate::holidays::DayHolidays;
use crate::metadata::HolidayMarkerStyle;
use crate::model::{
    Color, Composite, FontSpec, Point, Stroke, TextAlign, non_negative, polygon, styled_rect, text,
};
use kurbo::Rect;

/// One resolved day cell, ready to paint.
#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub bounds: Rect,
    /// Day number text. `None` leaves the cell unlabelled (blank templates).
    pub label: Option<String>,
    pub label_color: Color,
    pub background: Color,
    pub border: Option<Stroke>,
    pub corner_radius: f64,
    pub padding: f64,
    pub font: FontSpec,
    pub holiday: Option<&'a DayHolidays>,
    pub marker: HolidayMarkerStyle,
    pub holiday_color: Color,
    pub show_holiday_name: bool,
}

/// Label color for a day number after the `text` marker is considered.
///
/// Out-of-month days keep the muted color unless `overrides_muted` is set.
pub fn day_label_color(
    base: Color,
    muted: Option<Color>,
    holiday: bool,
    marker: HolidayMarkerStyle,
    holiday_color: Color,
    overrides_muted: bool,
) -> Color {
    let text_marker = holiday && marker == HolidayMarkerStyle::Text;
    match muted {
        Some(_) if text_marker && overrides_muted => holiday_color,
        Some(m) => m,
        None if text_marker => holiday_color,
        None => base,
    }
}

pub fn paint_day_cell(c: &mut Composite, cell: &DayCell<'_>) {
    let b = cell.bounds;
    if b.width() <= 0.0 || b.height() <= 0.0 {
        return;
    }
    let holiday = cell.holiday.filter(|h| !h.names.is_empty());

    let (background, border) = match (holiday, cell.marker) {
        (Some(_), HolidayMarkerStyle::Background) => (cell.holiday_color.with_alpha(0.12), cell.border.clone()),
        (Some(_), HolidayMarkerStyle::Border) => (
            cell.background,
            Some(Stroke::solid(
                cell.holiday_color,
                cell.border.as_ref().map_or(1.5, |s| s.width.max(1.5)),
            )),
        ),
        _ => (cell.background, cell.border.clone()),
    };
    c.push(styled_rect(b, Some(background), border, cell.corner_radius));

    let pad = non_negative(cell.padding).min(b.width() / 4.0).min(b.height() / 4.0);
    let inner = Rect::new(b.x0 + pad, b.y0 + pad, b.x1 - pad, b.y1 - pad);
    let font_size = cell.font.size.min(inner.height());
    let line_h = font_size * 1.3;

    if let Some(label) = &cell.label {
        let bounds = clamp_rect(Rect::new(inner.x0, inner.y0, inner.x1, inner.y0 + line_h), inner);
        c.push(text(
            bounds,
            label.as_str(),
            FontSpec {
                size: font_size,
                ..cell.font.clone()
            },
            cell.label_color,
            TextAlign::Left,
        ));
    }

    let Some(holiday) = holiday else {
        return;
    };

    let r = (font_size * 0.18).clamp(2.0, 4.0).min(inner.width() / 2.0).min(inner.height() / 2.0);
    let marker_center = Point::new(inner.x1 - r, inner.y0 + (font_size * 0.5).max(r).min(inner.height() - r));
    match cell.marker {
        HolidayMarkerStyle::Dot => c.push(styled_rect(
            Rect::new(marker_center.x - r, marker_center.y - r, marker_center.x + r, marker_center.y + r),
            Some(cell.holiday_color),
            None,
            r,
        )),
        HolidayMarkerStyle::Square => c.push(styled_rect(
            Rect::new(marker_center.x - r, marker_center.y - r, marker_center.x + r, marker_center.y + r),
            Some(cell.holiday_color),
            None,
            0.0,
        )),
        HolidayMarkerStyle::Triangle => {
            let s = (b.width().min(b.height()) * 0.22).min(14.0);
            c.push(polygon(
                vec![
                    Point::new(b.x1 - s, b.y0),
                    Point::new(b.x1, b.y0),
                    Point::new(b.x1, b.y0 + s),
                ],
                Some(cell.holiday_color),
                None,
            ));
        }
        HolidayMarkerStyle::Bar => {
            let h = 3.0_f64.min(inner.height());
            c.push(styled_rect(
                Rect::new(inner.x0, inner.y1 - h, inner.x1, inner.y1),
                Some(cell.holiday_color),
                None,
                h / 2.0,
            ));
        }
        HolidayMarkerStyle::Text | HolidayMarkerStyle::Border | HolidayMarkerStyle::Background => {}
    }

    if cell.show_holiday_name {
        let name_size = (font_size * 0.75).max(1.0);
        let top = inner.y0 + line_h;
        let bottom = top + name_size * 1.3;
        if bottom <= inner.y1 {
            c.push(text(
                Rect::new(inner.x0, top, inner.x1, bottom),
                holiday.label(),
                FontSpec {
                    size: name_size,
                    ..cell.font.clone()
                },
                cell.holiday_color,
                TextAlign::Left,
            ));
        }
    }
}
