//! Header treatment shared by notes, schedules, and checklists.

use super::clamp_rect;
use crate::metadata::HeaderStyle;
use crate::model::{Color, Composite, FontSpec, Stroke, TextAlign, line, non_negative, styled_rect, text};
use kurbo::Rect;

/// Colors a header may draw from.
#[derive(Debug, Clone, Copy)]
pub struct HeaderPalette {
    pub accent: Color,
    pub title: Color,
    pub header_text: Color,
    pub divider: Color,
}

/// Resolved header geometry and colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderLayout {
    pub height: f64,
    pub background: Option<Color>,
    pub divider: Option<Color>,
    pub title_color: Color,
    pub show_title: bool,
}

/// Map a header style to its layout.
///
/// | style   | band        | divider | title color   |
/// |---------|-------------|---------|---------------|
/// | none    | -           | -       | hidden        |
/// | minimal | -           | yes     | title         |
/// | tint    | accent @14% | -       | accent        |
/// | filled  | accent      | -       | header text   |
///
/// The height never exceeds `available`.
pub fn resolve_header(
    style: HeaderStyle,
    height: f64,
    available: f64,
    palette: HeaderPalette,
) -> HeaderLayout {
    let height = non_negative(height).min(non_negative(available));
    match style {
        HeaderStyle::None => HeaderLayout {
            height: 0.0,
            background: None,
            divider: None,
            title_color: palette.title,
            show_title: false,
        },
        HeaderStyle::Minimal => HeaderLayout {
            height,
            background: None,
            divider: Some(palette.divider),
            title_color: palette.title,
            show_title: true,
        },
        HeaderStyle::Tint => HeaderLayout {
            height,
            background: Some(palette.accent.with_alpha(0.14)),
            divider: None,
            title_color: palette.accent,
            show_title: true,
        },
        HeaderStyle::Filled => HeaderLayout {
            height,
            background: Some(palette.accent),
            divider: None,
            title_color: palette.header_text,
            show_title: true,
        },
    }
}

/// Paint the header band across the top of a `width`-wide frame.
pub fn paint_header(
    c: &mut Composite,
    layout: &HeaderLayout,
    width: f64,
    padding: f64,
    corner_radius: f64,
    title: &str,
    title_font: FontSpec,
) {
    if layout.height <= 0.0 {
        return;
    }
    let band = Rect::new(0.0, 0.0, non_negative(width), layout.height);

    if let Some(bg) = layout.background {
        c.push(styled_rect(band, Some(bg), None, corner_radius));
        // Square off the lower corners so the band meets the body flush.
        let radius = non_negative(corner_radius);
        if radius > 0.0 && layout.height > radius {
            c.push(styled_rect(
                Rect::new(band.x0, band.y1 - radius, band.x1, band.y1),
                Some(bg),
                None,
                0.0,
            ));
        }
    }

    if let Some(divider) = layout.divider {
        let pad = non_negative(padding).min(band.width() / 2.0);
        c.push(line(pad, band.y1, band.x1 - pad, band.y1, Stroke::solid(divider, 1.0)));
    }

    if layout.show_title && !title.is_empty() {
        let pad = non_negative(padding);
        let size = title_font.size.min(layout.height);
        let top = (layout.height - size * 1.3).max(0.0) / 2.0;
        let bounds = clamp_rect(Rect::new(pad, top, band.x1 - pad, top + size * 1.3), band);
        c.push(text(
            bounds,
            title,
            FontSpec { size, ..title_font },
            layout.title_color,
            TextAlign::Left,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Shape, Size, hex};
    use pretty_assertions::assert_eq;

    fn palette() -> HeaderPalette {
        HeaderPalette {
            accent: hex("#4C6EF5"),
            title: hex("#212529"),
            header_text: Color::WHITE,
            divider: hex("#DEE2E6"),
        }
    }

    #[test]
    fn none_hides_everything() {
        let l = resolve_header(HeaderStyle::None, 48.0, 400.0, palette());
        assert_eq!(l.height, 0.0);
        assert!(!l.show_title);
    }

    #[test]
    fn filled_uses_accent_band_and_header_text() {
        let l = resolve_header(HeaderStyle::Filled, 48.0, 400.0, palette());
        assert_eq!(l.background, Some(hex("#4C6EF5")));
        assert_eq!(l.title_color, Color::WHITE);
        assert_eq!(l.divider, None);
    }

    #[test]
    fn tint_is_translucent_accent() {
        let l = resolve_header(HeaderStyle::Tint, 48.0, 400.0, palette());
        let bg = l.background.unwrap();
        assert!(bg.a < 0.2);
        assert_eq!(l.title_color, hex("#4C6EF5"));
    }

    #[test]
    fn minimal_has_divider_only() {
        let l = resolve_header(HeaderStyle::Minimal, 48.0, 400.0, palette());
        assert_eq!(l.background, None);
        assert_eq!(l.divider, Some(hex("#DEE2E6")));
    }

    #[test]
    fn height_is_clipped_to_available() {
        let l = resolve_header(HeaderStyle::Minimal, 48.0, 20.0, palette());
        assert_eq!(l.height, 20.0);
    }

    #[test]
    fn paint_filled_header_stays_in_band() {
        let mut c = Composite::new("n", Size::new(200.0, 100.0));
        let l = resolve_header(HeaderStyle::Filled, 40.0, 100.0, palette());
        paint_header(&mut c, &l, 200.0, 10.0, 12.0, "Title", FontSpec::new("Pretendard", 18.0, 600));
        let b = c.content_bounds();
        assert!(b.y1 <= 40.0);
        assert_eq!(c.texts(), vec!["Title"]);
        let rects = c
            .primitives()
            .filter(|p| matches!(p.shape, Shape::Rect(_)))
            .count();
        assert_eq!(rects, 2);
    }
}
