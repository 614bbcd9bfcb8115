//! Month calendar grid.
//!
//! Vertical layout, top to bottom: header, weekday row, week rows, holiday
//! list. The header and weekday row take their configured heights first;
//! the holiday list is sized from its entry count and then clipped so the
//! grid never overflows the element.

use super::markers::{DayCell, day_label_color, paint_day_cell};
use super::{BuildContext, clamp_rect, finite_or, fit_gap, font, framed, inset};
use crate::calendar::{clamp_month, clamp_start_day, clamp_year, is_weekend_index, month_grid, weekday_for_column};
use crate::holidays::{DayHolidays, holidays_on, range_holidays};
use crate::locale::{Lang, month_title, short_date, weekday_label};
use crate::metadata::CalendarGridMetadata;
use crate::model::{Composite, Stroke, TextAlign, non_negative, styled_rect, text};
use chrono::Datelike;
use kurbo::Rect;

/// Smallest row height the grid keeps when the holiday list competes for space.
const MIN_ROW_HEIGHT: f64 = 12.0;
/// Gap between the week rows and the holiday list.
const LIST_GAP: f64 = 6.0;

/// Height the holiday list asks for given `entries` shown entries.
///
/// `min(configured, max(min_height, title + min(entries, max_items) × row))`,
/// or zero when there are no entries.
pub fn holiday_list_height(meta: &CalendarGridMetadata, entries: usize) -> f64 {
    if entries == 0 {
        return 0.0;
    }
    let shown = entries.min(meta.holiday_list_max_items);
    let measured = non_negative(meta.holiday_list_title_height)
        + shown as f64 * non_negative(meta.holiday_list_row_height);
    non_negative(meta.holiday_list_height).min(measured.max(non_negative(meta.holiday_list_min_height)))
}

pub fn build_calendar_grid(meta: &CalendarGridMetadata, ctx: &BuildContext<'_>) -> Composite {
    let year = clamp_year(meta.year);
    let month = clamp_month(meta.month);
    let start_day = clamp_start_day(meta.start_day);
    let lang = Lang::from_tag(&meta.language);
    let size = meta.size.sanitized();

    let mut c = framed(
        "calendar-grid",
        size,
        meta.background_color,
        meta.border_color,
        meta.border_width,
        meta.corner_radius,
    );
    let inner = inset(size, meta.padding);
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

    let grid = month_grid(year, month, start_day, meta.fixed_six_weeks);
    let rows = grid.rows.max(1);
    let gap = non_negative(meta.cell_gap);

    // Markers cover every visible slot, the list only the month itself.
    let visible: Vec<DayHolidays> = match (grid.slots.first(), grid.slots.last()) {
        (Some(first), Some(last)) if meta.show_holidays || meta.show_holiday_list => {
            range_holidays(ctx.holidays, first.date, last.date, &meta.country, &meta.language)
        }
        _ => Vec::new(),
    };
    let holidays: Vec<DayHolidays> = visible
        .iter()
        .filter(|d| d.date.year() == year && d.date.month() == month)
        .cloned()
        .collect();

    // Holiday list: measured, then clipped against what the rows need.
    let mut list_h = if meta.show_holiday_list {
        holiday_list_height(meta, holidays.len())
    } else {
        0.0
    };
    if list_h > 0.0 {
        let rows_min = rows as f64 * MIN_ROW_HEIGHT + gap * (rows - 1) as f64;
        list_h = list_h.min((remaining - rows_min - LIST_GAP).max(0.0));
        let row_h = non_negative(meta.holiday_list_row_height);
        if list_h < non_negative(meta.holiday_list_title_height) + row_h {
            list_h = 0.0;
        }
    }
    let list_block = if list_h > 0.0 { list_h + LIST_GAP } else { 0.0 };
    let grid_h = (remaining - list_block).max(0.0);

    // Header.
    let header = Rect::new(inner.x0, inner.y0, inner.x1, inner.y0 + header_h);
    if header_h > 0.0 {
        if let Some(bg) = meta.header_background_color {
            c.push(styled_rect(header, Some(bg), None, meta.cell_corner_radius));
        }
        let size = non_negative(meta.header_font_size).min(header_h);
        let top = header.y0 + (header_h - size * 1.3).max(0.0) / 2.0;
        c.push(text(
            clamp_rect(Rect::new(header.x0, top, header.x1, top + size * 1.3), header),
            month_title(lang, year, month),
            font(&meta.font_family, size, 700),
            meta.header_text_color,
            meta.header_align,
        ));
    }

    // Column geometry.
    let gap_x = fit_gap(gap, inner.width(), 7);
    let cell_w = non_negative((inner.width() - gap_x * 6.0) / 7.0);
    let col_x = |col: usize| inner.x0 + col as f64 * (cell_w + gap_x);

    // Weekday labels.
    let weekday_row = Rect::new(inner.x0, header.y1, inner.x1, header.y1 + weekday_h);
    if weekday_h > 0.0 {
        let size = non_negative(meta.weekday_font_size).min(weekday_h);
        let top = weekday_row.y0 + (weekday_h - size * 1.3).max(0.0) / 2.0;
        for col in 0..7usize {
            let weekday = weekday_for_column(col, start_day);
            let color = match weekday {
                0 => meta.sunday_color,
                6 => meta.saturday_color,
                _ => meta.weekday_text_color,
            };
            let x = col_x(col);
            c.push(text(
                clamp_rect(Rect::new(x, top, x + cell_w, top + size * 1.3), weekday_row),
                weekday_label(lang, weekday),
                font(&meta.font_family, size, 600),
                color,
                TextAlign::Center,
            ));
        }
    }

    // Week rows.
    let grid_top = weekday_row.y1;
    let gap_y = fit_gap(gap, grid_h, rows);
    let cell_h = non_negative((grid_h - gap_y * (rows - 1) as f64) / rows as f64);
    let border = (non_negative(meta.cell_border_width) > 0.0)
        .then(|| Stroke::solid(meta.cell_border_color, meta.cell_border_width));
    let day_font = font(&meta.font_family, non_negative(meta.day_font_size), 500);

    for slot in &grid.slots {
        if !slot.in_month && !meta.show_adjacent_days {
            continue;
        }
        let x = col_x(slot.column);
        let y = grid_top + slot.row as f64 * (cell_h + gap_y);
        let bounds = Rect::new(x, y, x + cell_w, y + cell_h);

        let weekday = weekday_for_column(slot.column, start_day);
        let holiday = if meta.show_holidays {
            holidays_on(&visible, slot.date)
        } else {
            None
        };
        let is_today = meta.highlight_today && ctx.today == Some(slot.date) && slot.in_month;

        let background = if is_today {
            meta.today_background_color
        } else if is_weekend_index(weekday) {
            meta.weekend_background_color.unwrap_or(meta.cell_background_color)
        } else {
            meta.cell_background_color
        };

        let weekday_color = match weekday {
            0 => meta.sunday_color,
            6 => meta.saturday_color,
            _ => meta.day_text_color,
        };
        let label_color = day_label_color(
            weekday_color,
            (!slot.in_month).then_some(meta.muted_text_color),
            holiday.is_some(),
            meta.holiday_marker_style,
            meta.holiday_color,
            meta.holiday_text_overrides_muted,
        );

        paint_day_cell(
            &mut c,
            &DayCell {
                bounds,
                label: Some(slot.date.day().to_string()),
                label_color,
                background,
                border: border.clone(),
                corner_radius: meta.cell_corner_radius,
                padding: meta.cell_padding,
                font: day_font.clone(),
                holiday,
                marker: meta.holiday_marker_style,
                holiday_color: meta.holiday_color,
                show_holiday_name: meta.show_holiday_names,
            },
        );
    }

    // Holiday list.
    if list_h > 0.0 {
        let top = grid_top + grid_h + LIST_GAP;
        let list = clamp_rect(Rect::new(inner.x0, top, inner.x1, top + list_h), inner);
        paint_holiday_list(&mut c, meta, list, &holidays);
    }

    log::trace!(
        "calendar-grid {year}-{month:02}: {rows} rows, {} holidays, list {list_h:.1}px",
        holidays.len()
    );
    c
}

fn paint_holiday_list(c: &mut Composite, meta: &CalendarGridMetadata, area: Rect, holidays: &[DayHolidays]) {
    let title_h = non_negative(meta.holiday_list_title_height).min(area.height());
    let font_size = finite_or(meta.holiday_list_font_size, 11.0).max(1.0);
    if title_h > 0.0 {
        c.push(text(
            Rect::new(area.x0, area.y0, area.x1, area.y0 + title_h),
            meta.holiday_list_title.as_str(),
            font(&meta.font_family, font_size.min(title_h), 700),
            meta.header_text_color,
            TextAlign::Left,
        ));
    }

    let row_h = non_negative(meta.holiday_list_row_height);
    if row_h <= 0.0 {
        return;
    }
    let mut y = area.y0 + title_h;
    for day in holidays.iter().take(meta.holiday_list_max_items) {
        if y + row_h > area.y1 + 1e-9 {
            break;
        }
        c.push(text(
            Rect::new(area.x0, y, area.x1, y + row_h),
            format!("{} {}", short_date(day.date), day.label()),
            font(&meta.font_family, font_size.min(row_h), 400),
            meta.holiday_color,
            TextAlign::Left,
        ));
        y += row_h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::{Holiday, StaticHolidays};
    use crate::model::{Shape, Size};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn february() -> CalendarGridMetadata {
        CalendarGridMetadata {
            year: 2024,
            month: 2,
            ..Default::default()
        }
    }

    fn us() -> StaticHolidays {
        StaticHolidays::new().with("US", Holiday::new("2024-02-19", "Presidents' Day"))
    }

    fn list_entries(c: &Composite) -> Vec<String> {
        c.texts()
            .into_iter()
            .filter(|t| t.contains('/'))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn list_height_formula() {
        let m = february();
        assert_eq!(holiday_list_height(&m, 0), 0.0);
        assert_eq!(holiday_list_height(&m, 1), 34.0);
        // 18 + 4 × 16 = 82 ≤ 96
        assert_eq!(holiday_list_height(&m, 9), 82.0);
        let tight = CalendarGridMetadata {
            holiday_list_height: 40.0,
            ..february()
        };
        assert_eq!(holiday_list_height(&tight, 9), 40.0);
    }

    #[test]
    fn february_2024_with_one_holiday() {
        let provider = us();
        let ctx = BuildContext::new(&provider);
        let c = build_calendar_grid(&february(), &ctx);
        assert_eq!(list_entries(&c), vec!["2/19 Presidents' Day"]);
        assert!(c.texts().contains(&"February 2024"));
        let b = c.content_bounds();
        assert!(b.y1 <= 420.0 + 1e-9);
    }

    #[test]
    fn list_hidden_without_holidays() {
        let c = build_calendar_grid(&february(), &BuildContext::empty());
        assert!(!c.texts().contains(&"Holidays"));
        assert!(list_entries(&c).is_empty());
    }

    #[test]
    fn month_cells_only_when_adjacent_hidden() {
        let m = CalendarGridMetadata {
            show_adjacent_days: false,
            show_header: false,
            show_weekdays: false,
            ..february()
        };
        let c = build_calendar_grid(&m, &BuildContext::empty());
        let numbers = c.texts().iter().filter(|t| t.parse::<u32>().is_ok()).count();
        assert_eq!(numbers, 29);
    }

    #[test]
    fn today_is_highlighted() {
        let m = CalendarGridMetadata {
            show_adjacent_days: false,
            weekend_background_color: None,
            ..february()
        };
        let today = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let ctx = BuildContext::empty().with_today(Some(today));
        let c = build_calendar_grid(&m, &ctx);
        let highlighted = c
            .primitives()
            .filter(|p| matches!(&p.shape, Shape::Rect(r) if r.fill == Some(m.today_background_color)))
            .count();
        assert_eq!(highlighted, 1);
    }

    #[test]
    fn tiny_calendar_never_overflows() {
        let provider = us();
        let ctx = BuildContext::new(&provider);
        let m = CalendarGridMetadata {
            size: Size::new(120.0, 90.0),
            ..february()
        };
        let c = build_calendar_grid(&m, &ctx);
        let b = c.content_bounds();
        assert!(b.x1 <= 120.0 + 1e-9 && b.y1 <= 90.0 + 1e-9, "{b:?}");
    }

    #[test]
    fn holiday_text_marker_colors_day_number() {
        let provider = us();
        let ctx = BuildContext::new(&provider);
        let c = build_calendar_grid(&february(), &ctx);
        let nineteen = c
            .primitives()
            .find_map(|p| match &p.shape {
                Shape::Text(t) if t.text == "19" => Some(t.color),
                _ => None,
            })
            .unwrap();
        assert_eq!(nineteen, february().holiday_color);
    }
}
