//! Seven-day strip.
//!
//! Sizing runs in two phases. Phase one decides whether the holiday list is
//! shown and measures it from its entries; phase two fits the header,
//! weekday row, day columns and list into the available height, shrinking
//! the list first. Blank templates drop dates, holidays and the today
//! highlight and show a free-form title instead.

use super::markers::{DayCell, day_label_color, paint_day_cell};
use super::{BuildContext, clamp_rect, finite_or, fit_gap, font, framed, inset};
use crate::calendar::{clamp_start_day, week_of, weekday_index};
use crate::holidays::{DayHolidays, holidays_on, range_holidays};
use crate::locale::{Lang, short_date, week_title, weekday_label};
use crate::metadata::{TemplateMode, WeekStripMetadata};
use crate::model::{Composite, Stroke, TextAlign, line, non_negative, text};
use chrono::Datelike;
use kurbo::Rect;

/// Gap between the day columns and the holiday list.
const LIST_GAP: f64 = 4.0;

/// Phase-one list measurement: `min(configured, max(min, shown × row + padding))`.
fn measure_list(meta: &WeekStripMetadata, entries: usize) -> f64 {
    if entries == 0 {
        return 0.0;
    }
    let shown = entries.min(meta.holiday_list_max_items);
    let measured = shown as f64 * non_negative(meta.holiday_list_row_height) + LIST_GAP;
    non_negative(meta.holiday_list_height).min(measured.max(non_negative(meta.holiday_list_min_height)))
}

pub fn build_week_strip(meta: &WeekStripMetadata, ctx: &BuildContext<'_>) -> Composite {
    let start_day = clamp_start_day(meta.start_day);
    let lang = Lang::from_tag(&meta.language);
    let blank = meta.template_mode == TemplateMode::Blank;
    let size = meta.size.sanitized();
    let dates = week_of(meta.anchor_date, start_day);

    let mut c = framed(
        "week-strip",
        size,
        meta.background_color,
        meta.border_color,
        meta.border_width,
        meta.corner_radius,
    );
    let inner = inset(size, meta.padding);

    // Phase one: content-driven list height.
    let holidays: Vec<DayHolidays> = if !blank && (meta.show_holidays || meta.show_holiday_list) {
        range_holidays(ctx.holidays, dates[0], dates[6], &meta.country, &meta.language)
    } else {
        Vec::new()
    };
    let show_list = meta.show_holiday_list && !blank && !holidays.is_empty();
    let wanted_list = if show_list {
        measure_list(meta, holidays.len())
    } else {
        0.0
    };

    // Phase two: fit everything into the inner height.
    let mut remaining = inner.height();
    let header_h = if meta.show_header {
        non_negative(meta.header_height).min(remaining)
    } else {
        0.0
    };
    remaining -= header_h;
    let weekday_h = if meta.show_weekdays {
        non_negative(meta.weekday_height).min(remaining)
    } else {
        0.0
    };
    remaining -= weekday_h;
    let body_min = non_negative(meta.day_font_size) * 1.6;
    let mut list_h = wanted_list.min((remaining - body_min).max(0.0));
    if list_h < non_negative(meta.holiday_list_row_height) {
        list_h = 0.0;
    }
    let body_h = (remaining - list_h).max(0.0);

    // Header.
    let header = Rect::new(inner.x0, inner.y0, inner.x1, inner.y0 + header_h);
    if header_h > 0.0 {
        let title = if blank {
            meta.title.clone()
        } else {
            week_title(lang, dates[0], dates[6])
        };
        if !title.is_empty() {
            let size = non_negative(meta.header_font_size).min(header_h);
            let top = header.y0 + (header_h - size * 1.3).max(0.0) / 2.0;
            c.push(text(
                clamp_rect(Rect::new(header.x0, top, header.x1, top + size * 1.3), header),
                title,
                font(&meta.font_family, size, 700),
                meta.header_text_color,
                TextAlign::Left,
            ));
        }
    }

    let gap = fit_gap(meta.cell_gap, inner.width(), 7);
    let col_w = non_negative((inner.width() - gap * 6.0) / 7.0);
    let col_x = |col: usize| inner.x0 + col as f64 * (col_w + gap);

    // Weekday labels.
    let weekday_row = Rect::new(inner.x0, header.y1, inner.x1, header.y1 + weekday_h);
    if weekday_h > 0.0 {
        let size = non_negative(meta.weekday_font_size).min(weekday_h);
        let top = weekday_row.y0 + (weekday_h - size * 1.3).max(0.0) / 2.0;
        for (col, date) in dates.iter().enumerate() {
            let weekday = weekday_index(*date);
            let color = match weekday {
                0 => meta.sunday_color,
                6 => meta.saturday_color,
                _ => meta.weekday_text_color,
            };
            let x = col_x(col);
            c.push(text(
                clamp_rect(Rect::new(x, top, x + col_w, top + size * 1.3), weekday_row),
                weekday_label(lang, weekday),
                font(&meta.font_family, size, 600),
                color,
                TextAlign::Center,
            ));
        }
    }

    // Day columns.
    let body_top = weekday_row.y1;
    let border = (non_negative(meta.cell_border_width) > 0.0)
        .then(|| Stroke::solid(meta.cell_border_color, meta.cell_border_width));
    let day_font = font(&meta.font_family, non_negative(meta.day_font_size), 600);
    let line_stroke = Stroke::solid(meta.note_line_color, 1.0);

    for (col, date) in dates.iter().enumerate() {
        let x = col_x(col);
        let bounds = Rect::new(x, body_top, x + col_w, body_top + body_h);
        let weekday = weekday_index(*date);
        let holiday = if !blank && meta.show_holidays {
            holidays_on(&holidays, *date)
        } else {
            None
        };
        let is_today = !blank && meta.highlight_today && ctx.today == Some(*date);
        let weekday_color = match weekday {
            0 => meta.sunday_color,
            6 => meta.saturday_color,
            _ => meta.day_text_color,
        };

        paint_day_cell(
            &mut c,
            &DayCell {
                bounds,
                label: (!blank).then(|| date.day().to_string()),
                label_color: day_label_color(
                    weekday_color,
                    None,
                    holiday.is_some(),
                    meta.holiday_marker_style,
                    meta.holiday_color,
                    false,
                ),
                background: if is_today {
                    meta.today_background_color
                } else {
                    meta.cell_background_color
                },
                border: border.clone(),
                corner_radius: meta.cell_corner_radius,
                padding: meta.cell_padding,
                font: day_font.clone(),
                holiday,
                marker: meta.holiday_marker_style,
                holiday_color: meta.holiday_color,
                show_holiday_name: false,
            },
        );

        if meta.show_note_lines {
            paint_note_lines(&mut c, bounds, meta, &line_stroke, blank);
        }
    }

    // Holiday list.
    if list_h > 0.0 {
        let top = body_top + body_h;
        let area = clamp_rect(Rect::new(inner.x0, top + LIST_GAP.min(list_h), inner.x1, top + list_h), inner);
        let row_h = non_negative(meta.holiday_list_row_height);
        let font_size = finite_or(meta.holiday_list_font_size, 11.0).clamp(1.0, row_h.max(1.0));
        let mut y = area.y0;
        for day in holidays.iter().take(meta.holiday_list_max_items) {
            if row_h <= 0.0 || y + row_h > area.y1 + 1e-9 {
                break;
            }
            c.push(text(
                Rect::new(area.x0, y, area.x1, y + row_h),
                format!("{} {}", short_date(day.date), day.label()),
                font(&meta.font_family, font_size, 400),
                meta.holiday_color,
                TextAlign::Left,
            ));
            y += row_h;
        }
    }

    log::trace!(
        "week-strip {} ({}): {} holidays, list {list_h:.1}px",
        dates[0],
        if blank { "blank" } else { "dated" },
        holidays.len()
    );
    c
}

/// Ruled writing lines under the day number.
fn paint_note_lines(c: &mut Composite, cell: Rect, meta: &WeekStripMetadata, stroke: &Stroke, blank: bool) {
    let spacing = non_negative(meta.note_line_spacing);
    if spacing < 4.0 {
        return;
    }
    let pad = non_negative(meta.cell_padding).min(cell.width() / 4.0).min(cell.height() / 4.0);
    let first = if blank {
        cell.y0 + pad + spacing
    } else {
        cell.y0 + pad + non_negative(meta.day_font_size) * 1.3 + spacing
    };
    let mut y = first;
    while y <= cell.y1 - pad {
        c.push(line(cell.x0 + pad, y, cell.x1 - pad, y, stroke.clone()));
        y += spacing;
    }
}
