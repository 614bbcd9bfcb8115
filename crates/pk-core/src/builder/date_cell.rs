//! Single-day tile: an accent band on top (month and weekday) and a large
//! day number in the body. The holiday name anchors to the top or bottom of
//! the body, or overlays the lower edge of the accent band.

use super::{BuildContext, clamp_rect, finite_or, font, framed, inset};
use crate::calendar::weekday_index;
use crate::holidays::{holidays_on, month_holidays};
use crate::locale::{Lang, month_short, weekday_label};
use crate::metadata::{DateCellMetadata, HolidayPosition};
use crate::model::{Composite, TextAlign, non_negative, styled_rect, text};
use chrono::Datelike;
use kurbo::Rect;

/// Clamp the accent ratio into `[0.05, 0.85]`; NaN falls back to the default.
pub fn accent_ratio(ratio: f64) -> f64 {
    finite_or(ratio, 0.28).clamp(0.05, 0.85)
}

pub fn build_date_cell(meta: &DateCellMetadata, ctx: &BuildContext<'_>) -> Composite {
    let size = meta.size.sanitized();
    let lang = Lang::from_tag(&meta.language);
    let date = meta.date;

    let mut c = framed(
        "date-cell",
        size,
        meta.background_color,
        meta.border_color,
        meta.border_width,
        meta.corner_radius,
    );
    let frame = Rect::new(0.0, 0.0, size.width, size.height);
    let pad = inset(size, meta.padding).x0;
    let accent_h = size.height * accent_ratio(meta.accent_ratio);

    // Accent band.
    let band = Rect::new(0.0, 0.0, size.width, accent_h);
    c.push(styled_rect(band, Some(meta.accent_color), None, meta.corner_radius));
    let radius = non_negative(meta.corner_radius).min(size.width.min(size.height) / 2.0);
    if radius > 0.0 && accent_h > radius {
        c.push(styled_rect(
            Rect::new(0.0, accent_h - radius, size.width, accent_h),
            Some(meta.accent_color),
            None,
            0.0,
        ));
    }
    let band_font = (accent_h * 0.4).min(16.0);
    let band_top = (accent_h - band_font * 1.3).max(0.0) / 2.0;
    let band_text = clamp_rect(
        Rect::new(pad, band_top, size.width - pad, band_top + band_font * 1.3),
        band,
    );
    if meta.show_month {
        c.push(text(
            band_text,
            month_short(lang, date.month()),
            font(&meta.font_family, band_font, 700),
            meta.accent_text_color,
            TextAlign::Left,
        ));
    }
    if meta.show_weekday {
        c.push(text(
            band_text,
            weekday_label(lang, weekday_index(date)),
            font(&meta.font_family, band_font, 500),
            meta.accent_text_color,
            TextAlign::Right,
        ));
    }

    // Holiday lookup.
    let holiday = if meta.show_holiday {
        let list = month_holidays(ctx.holidays, date.year(), date.month(), &meta.country, &meta.language);
        holidays_on(&list, date).map(|d| d.label())
    } else {
        None
    };

    // Body, minus the holiday line when it sits inside the body.
    let holiday_size = non_negative(meta.holiday_font_size);
    let holiday_h = holiday_size * 1.3;
    let mut body = Rect::new(pad, accent_h + pad, size.width - pad, size.height - pad);
    if body.y1 < body.y0 {
        body.y1 = body.y0;
    }
    let holiday_box = holiday.as_ref().map(|_| match meta.holiday_position {
        HolidayPosition::Top => {
            let r = Rect::new(body.x0, body.y0, body.x1, (body.y0 + holiday_h).min(body.y1));
            body.y0 = r.y1;
            r
        }
        HolidayPosition::Bottom => {
            let r = Rect::new(body.x0, (body.y1 - holiday_h).max(body.y0), body.x1, body.y1);
            body.y1 = r.y0;
            r
        }
        HolidayPosition::Overlay => {
            let bottom = (accent_h - pad * 0.5).max(0.0);
            Rect::new(pad, (bottom - holiday_h).max(0.0), size.width - pad, bottom)
        }
    });

    // Day number.
    let auto = (body.height() * 0.7).min(size.width * 0.5);
    let day_size = meta
        .day_font_size
        .map(non_negative)
        .unwrap_or(auto)
        .min(body.height() / 1.2);
    let day_h = day_size * 1.2;
    let top = body.y0 + (body.height() - day_h).max(0.0) / 2.0;
    let day_color = if holiday.is_some() {
        meta.holiday_color
    } else {
        meta.day_text_color
    };
    c.push(text(
        clamp_rect(Rect::new(body.x0, top, body.x1, top + day_h), frame),
        date.day().to_string(),
        font(&meta.font_family, day_size, 700),
        day_color,
        TextAlign::Center,
    ));

    if let (Some(label), Some(area)) = (holiday, holiday_box) {
        let color = match meta.holiday_position {
            HolidayPosition::Overlay => meta.accent_text_color,
            _ => meta.holiday_color,
        };
        c.push(text(
            clamp_rect(area, frame),
            label,
            font(&meta.font_family, holiday_size.min(area.height()), 500),
            color,
            TextAlign::Center,
        ));
    }

    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::{Holiday, StaticHolidays};
    use crate::model::{Shape, TextShape};
    use chrono::NaiveDate;

    fn meta(position: HolidayPosition) -> DateCellMetadata {
        DateCellMetadata {
            date: NaiveDate::from_ymd_opt(2024, 2, 19).unwrap(),
            holiday_position: position,
            ..Default::default()
        }
    }

    fn find<'a>(c: &'a Composite, content: &str) -> &'a TextShape {
        c.primitives()
            .find_map(|p| match &p.shape {
                Shape::Text(t) if t.text == content => Some(t),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(accent_ratio(0.0), 0.05);
        assert_eq!(accent_ratio(2.0), 0.85);
        assert_eq!(accent_ratio(f64::NAN), 0.28);
        assert_eq!(accent_ratio(0.5), 0.5);
    }

    #[test]
    fn labels_month_weekday_and_day() {
        let c = build_date_cell(&meta(HolidayPosition::Bottom), &BuildContext::empty());
        let texts = c.texts();
        assert!(texts.contains(&"Feb"));
        assert!(texts.contains(&"Mon"));
        assert!(texts.contains(&"19"));
    }

    #[test]
    fn holiday_positions_anchor_differently() {
        let p = StaticHolidays::new().with("US", Holiday::new("2024-02-19", "Presidents' Day"));
        let ctx = BuildContext::new(&p);
        let band = 180.0 * 0.28;

        let top = build_date_cell(&meta(HolidayPosition::Top), &ctx);
        let bottom = build_date_cell(&meta(HolidayPosition::Bottom), &ctx);
        let overlay = build_date_cell(&meta(HolidayPosition::Overlay), &ctx);

        let t = find(&top, "Presidents' Day");
        let b = find(&bottom, "Presidents' Day");
        let o = find(&overlay, "Presidents' Day");

        assert!(t.top >= band);
        assert!(b.top > t.top);
        assert!(b.top + b.height <= 180.0);
        assert!(o.top + o.height <= band);
        assert_eq!(o.color, DateCellMetadata::default().accent_text_color);
    }

    #[test]
    fn explicit_day_font_size_is_respected() {
        let m = DateCellMetadata {
            day_font_size: Some(40.0),
            ..meta(HolidayPosition::Bottom)
        };
        let c = build_date_cell(&m, &BuildContext::empty());
        assert_eq!(find(&c, "19").font.size, 40.0);
    }
}
