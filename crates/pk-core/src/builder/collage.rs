//! Photo collage.
//!
//! Each layout is a table of slot rectangles expressed as fractions of the
//! padded content area. The gap is applied by growing the area by half a
//! gap and insetting every slot by half a gap, so slots on the outer edge
//! line up with the padding. Slots show their image once the cache reports
//! it loaded, and a placeholder glyph while loading or after a failure.

use super::{BuildContext, clamp_rect, font, framed, inset};
use crate::images::ImageCache;
use crate::metadata::{CollageLayout, CollageMetadata, ImageFit};
use crate::model::{
    ClipRect, Color, Composite, CropRect, ImageShape, Point, Shape, TextAlign, hex, non_negative, polygon,
    styled_rect, text,
};
use kurbo::Rect;

/// `(x, y, width, height)` as fractions of the content area.
type Frac = (f64, f64, f64, f64);

const GRID_2X2: [Frac; 4] = [(0.0, 0.0, 0.5, 0.5), (0.5, 0.0, 0.5, 0.5), (0.0, 0.5, 0.5, 0.5), (0.5, 0.5, 0.5, 0.5)];

const GRID_3X3: [Frac; 9] = [
    (0.0, 0.0, 1.0 / 3.0, 1.0 / 3.0),
    (1.0 / 3.0, 0.0, 1.0 / 3.0, 1.0 / 3.0),
    (2.0 / 3.0, 0.0, 1.0 / 3.0, 1.0 / 3.0),
    (0.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
    (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
    (2.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
    (0.0, 2.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
    (1.0 / 3.0, 2.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
    (2.0 / 3.0, 2.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
];

const MASONRY: [Frac; 5] = [
    (0.0, 0.0, 0.5, 0.6),
    (0.0, 0.6, 0.5, 0.4),
    (0.5, 0.0, 0.5, 0.35),
    (0.5, 0.35, 0.5, 0.3),
    (0.5, 0.65, 0.5, 0.35),
];

const POLAROID: [Frac; 1] = [(0.06, 0.05, 0.88, 0.72)];
/// Caption strip under the polaroid photo.
const POLAROID_CAPTION: Frac = (0.06, 0.8, 0.88, 0.15);

const FILMSTRIP: [Frac; 4] = [
    (0.0, 0.15, 0.25, 0.7),
    (0.25, 0.15, 0.25, 0.7),
    (0.5, 0.15, 0.25, 0.7),
    (0.75, 0.15, 0.25, 0.7),
];
/// Height of each sprocket band as a fraction of the content area.
const FILM_BAND: f64 = 0.15;

const SCRAPBOOK: [Frac; 3] = [(0.0, 0.0, 0.6, 0.55), (0.6, 0.1, 0.4, 0.45), (0.15, 0.55, 0.7, 0.45)];

const MOOD_BOARD: [Frac; 6] = [
    (0.0, 0.0, 0.4, 0.5),
    (0.4, 0.0, 0.3, 0.5),
    (0.7, 0.0, 0.3, 0.5),
    (0.0, 0.5, 0.3, 0.5),
    (0.3, 0.5, 0.4, 0.5),
    (0.7, 0.5, 0.3, 0.5),
];

pub fn slot_fractions(layout: CollageLayout) -> &'static [Frac] {
    match layout {
        CollageLayout::Grid2x2 => &GRID_2X2,
        CollageLayout::Grid3x3 => &GRID_3X3,
        CollageLayout::Masonry => &MASONRY,
        CollageLayout::Polaroid => &POLAROID,
        CollageLayout::Filmstrip => &FILMSTRIP,
        CollageLayout::Scrapbook => &SCRAPBOOK,
        CollageLayout::MoodBoard => &MOOD_BOARD,
    }
}

/// Slot rectangles in composite coordinates.
pub fn slot_rects(meta: &CollageMetadata) -> Vec<Rect> {
    let inner = inset(meta.size, meta.padding);
    let half = non_negative(meta.gap) / 2.0;
    let area = Rect::new(inner.x0 - half, inner.y0 - half, inner.x1 + half, inner.y1 + half);
    slot_fractions(meta.layout)
        .iter()
        .map(|&f| {
            let r = fraction_rect(area, f);
            let x0 = r.x0 + half;
            let y0 = r.y0 + half;
            clamp_rect(Rect::new(x0, y0, (r.x1 - half).max(x0), (r.y1 - half).max(y0)), inner)
        })
        .collect()
}

/// URLs referenced by the slots, in slot order.
pub fn image_urls(meta: &CollageMetadata) -> Vec<&str> {
    meta.images
        .iter()
        .take(slot_fractions(meta.layout).len())
        .flatten()
        .map(|img| img.url.as_str())
        .filter(|url| !url.is_empty())
        .collect()
}

fn fraction_rect(area: Rect, (x, y, w, h): Frac) -> Rect {
    let x0 = area.x0 + area.width() * x;
    let y0 = area.y0 + area.height() * y;
    Rect::new(x0, y0, x0 + area.width() * w, y0 + area.height() * h)
}

/// Place an image of natural size `(iw, ih)` into `slot`.
///
/// `cover` fills the slot and crops the centered overflow in source space;
/// `contain` letterboxes the whole image inside the slot.
pub fn fit_image(slot: Rect, natural: (f64, f64), fit: ImageFit) -> (Rect, Option<CropRect>) {
    let (iw, ih) = natural;
    if iw <= 0.0 || ih <= 0.0 || slot.width() <= 0.0 || slot.height() <= 0.0 {
        return (slot, None);
    }
    match fit {
        ImageFit::Cover => {
            let scale = (slot.width() / iw).max(slot.height() / ih);
            let cw = slot.width() / scale;
            let ch = slot.height() / scale;
            (
                slot,
                Some(CropRect {
                    x: (iw - cw) / 2.0,
                    y: (ih - ch) / 2.0,
                    width: cw,
                    height: ch,
                }),
            )
        }
        ImageFit::Contain => {
            let scale = (slot.width() / iw).min(slot.height() / ih);
            let (dw, dh) = (iw * scale, ih * scale);
            let x0 = slot.x0 + (slot.width() - dw) / 2.0;
            let y0 = slot.y0 + (slot.height() - dh) / 2.0;
            (Rect::new(x0, y0, x0 + dw, y0 + dh), None)
        }
    }
}

pub fn build_collage(meta: &CollageMetadata, ctx: &BuildContext<'_>) -> Composite {
    let size = meta.size.sanitized();
    let film = meta.layout == CollageLayout::Filmstrip;
    let background = if film { hex("#212529") } else { meta.background_color };
    let mut c = framed(
        "collage",
        size,
        background,
        meta.border_color,
        meta.border_width,
        meta.corner_radius,
    );
    let inner = inset(size, meta.padding);

    if film {
        paint_sprockets(&mut c, inner);
    }

    let slots = slot_rects(meta);
    for (i, slot) in slots.iter().enumerate() {
        c.push(styled_rect(*slot, Some(meta.slot_color), None, meta.slot_corner_radius));
        let image = meta.images.get(i).and_then(Option::as_ref);
        let loaded = image.and_then(|img| {
            ctx.images
                .and_then(|cache: &ImageCache| cache.loaded_size(&img.url))
                .map(|natural| (img, natural))
        });
        match loaded {
            Some((img, natural)) => {
                let (bounds, crop) = fit_image(*slot, natural, img.fit.unwrap_or(meta.fit));
                let clip = meta.clip_images.then(|| ClipRect {
                    left: slot.x0,
                    top: slot.y0,
                    width: slot.width(),
                    height: slot.height(),
                    radius: non_negative(meta.slot_corner_radius).min(slot.width().min(slot.height()) / 2.0),
                });
                c.push(Shape::Image(ImageShape {
                    src: img.url.clone(),
                    left: bounds.x0,
                    top: bounds.y0,
                    width: bounds.width(),
                    height: bounds.height(),
                    crop,
                    clip,
                }));
            }
            None => paint_placeholder(&mut c, *slot, meta.placeholder_color),
        }
        if meta.layout == CollageLayout::Scrapbook {
            paint_tape(&mut c, *slot);
        }
    }

    if meta.layout == CollageLayout::Polaroid && !meta.caption.is_empty() {
        let area = clamp_rect(fraction_rect(inner, POLAROID_CAPTION), inner);
        c.push(text(
            area,
            meta.caption.as_str(),
            font(&meta.font_family, non_negative(meta.caption_font_size).min(area.height()), 500),
            meta.caption_color,
            TextAlign::Center,
        ));
    }
    c
}

/// Landscape glyph: two peaks and a sun, centered in `slot`.
fn paint_placeholder(c: &mut Composite, slot: Rect, color: Color) {
    let s = slot.width().min(slot.height()) * 0.3;
    if s < 4.0 {
        return;
    }
    let center = slot.center();
    let (cx, cy) = (center.x, center.y);
    c.push(polygon(
        vec![
            Point::new(cx - s / 2.0, cy + s / 2.0),
            Point::new(cx - s / 8.0, cy - s / 4.0),
            Point::new(cx + s / 4.0, cy + s / 2.0),
        ],
        Some(color),
        None,
    ));
    c.push(polygon(
        vec![
            Point::new(cx, cy + s / 2.0),
            Point::new(cx + s / 4.0, cy),
            Point::new(cx + s / 2.0, cy + s / 2.0),
        ],
        Some(color),
        None,
    ));
    let r = s * 0.12;
    let sun = Point::new(cx + s / 4.0, cy - s / 3.0);
    c.push(styled_rect(
        Rect::new(sun.x - r, sun.y - r, sun.x + r, sun.y + r),
        Some(color),
        None,
        r,
    ));
}

fn paint_sprockets(c: &mut Composite, inner: Rect) {
    let band = inner.height() * FILM_BAND;
    let hole_w = 10.0;
    let hole_h = band * 0.4;
    let pitch = 24.0;
    if hole_h < 2.0 || inner.width() < pitch {
        return;
    }
    let count = (inner.width() / pitch).floor() as usize;
    let start = inner.x0 + (inner.width() - count as f64 * pitch) / 2.0 + (pitch - hole_w) / 2.0;
    let fill = Color::WHITE.with_alpha(0.85);
    for band_top in [inner.y0, inner.y1 - band] {
        let y = band_top + (band - hole_h) / 2.0;
        for i in 0..count {
            let x = start + i as f64 * pitch;
            c.push(styled_rect(Rect::new(x, y, x + hole_w, y + hole_h), Some(fill), None, 2.0));
        }
    }
}

fn paint_tape(c: &mut Composite, slot: Rect) {
    let w = slot.width() * 0.3;
    let h = (slot.height() * 0.1).min(10.0);
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let x = slot.center().x - w / 2.0;
    c.push(styled_rect(
        Rect::new(x, slot.y0, x + w, slot.y0 + h),
        Some(hex("#FFE066").with_alpha(0.6)),
        None,
        0.0,
    ));
}
