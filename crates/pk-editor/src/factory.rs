//! Element factory: builder output → addressable canvas composites.
//!
//! Each function runs the matching builder, then gives the result an ID, a
//! display name and a position. The originating metadata or shape options
//! travel with the composite as its annotation.

use crate::identity::{WATERMARK_NAME, display_name, id_prefix};
use kurbo::Rect;
use pk_core::{
    ArrowOptions, BuildContext, Color, Composite, ElementMetadata, FontSpec, IdSource, Point, ShapeKind, ShapeStyle,
    Size, TextAlign, build_arrow, build_element, build_shape, build_text, text,
};

fn place(mut composite: Composite, at: Point, ids: &mut dyn IdSource) -> Composite {
    composite.id = Some(ids.next_id(id_prefix(&composite.annotation)));
    if let Some(name) = display_name(&composite.annotation) {
        composite.name = name.to_string();
    }
    composite.left = at.x;
    composite.top = at.y;
    composite
}

/// A metadata-driven element at `at`.
pub fn create_element(
    meta: &ElementMetadata,
    at: Point,
    ctx: &BuildContext<'_>,
    ids: &mut dyn IdSource,
) -> Composite {
    place(build_element(meta, ctx), at, ids)
}

pub fn create_shape(kind: ShapeKind, size: Size, style: &ShapeStyle, at: Point, ids: &mut dyn IdSource) -> Composite {
    place(build_shape(kind, size, style), at, ids)
}

pub fn create_text(
    content: &str,
    font: &FontSpec,
    color: Color,
    width: f64,
    at: Point,
    ids: &mut dyn IdSource,
) -> Composite {
    place(build_text(content, font, color, width), at, ids)
}

pub fn create_arrow(options: &ArrowOptions, at: Point, ids: &mut dyn IdSource) -> Composite {
    place(build_arrow(options), at, ids)
}

/// A centered, translucent label along the bottom of the page. Watermarks
/// live in history like any object but are stripped from persisted state.
pub fn create_watermark(label: &str, canvas: Size, ids: &mut dyn IdSource) -> Composite {
    let font = FontSpec::new("Pretendard", 12.0, 500);
    let height = font.size * 1.3;
    let width = canvas.width.max(0.0);
    let mut composite = Composite::new(WATERMARK_NAME, Size::new(width, height));
    composite.push(text(
        Rect::new(0.0, 0.0, width, height),
        label,
        font,
        Color::BLACK.with_alpha(0.35),
        TextAlign::Center,
    ));
    composite.annotation.watermark = true;
    let top = (canvas.height - height - 16.0).max(0.0);
    place(composite, Point::new(0.0, top), ids)
}

/// A copy of `source` with a fresh ID, shifted by `offset`.
pub fn duplicate(source: &Composite, offset: f64, ids: &mut dyn IdSource) -> Composite {
    let mut copy = source.clone();
    copy.id = Some(ids.next_id(id_prefix(&copy.annotation)));
    copy.left += offset;
    copy.top += offset;
    copy
}

/// Top-left position that centers `size` on the canvas.
pub fn centered(canvas: Size, size: Size) -> Point {
    Point::new(
        ((canvas.width - size.width) / 2.0).max(0.0),
        ((canvas.height - size.height) / 2.0).max(0.0),
    )
}
