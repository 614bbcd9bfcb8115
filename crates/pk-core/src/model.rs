//! Primitive descriptors and composites produced by the builders.
//!
//! A builder turns element metadata into a [`Composite`]: an ordered list of
//! positioned primitives (rectangles, text boxes, lines, polygons, images)
//! plus an [`Annotation`] bag that carries the originating metadata. All
//! child coordinates are relative to the composite's top-left corner.

use crate::arrow::{ArrowOptions, ArrowPart};
use crate::id::ElementId;
use crate::metadata::ElementMetadata;
use kurbo::Rect;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0], serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| (v * 17) as f32 / 255.0);
        let long = |i: usize| -> Option<f32> {
            Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Same color with a replaced alpha channel.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= f32::EPSILON
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Color::TRANSPARENT);
        }
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

/// Parse a hex literal known at compile time. Falls back to black.
pub fn hex(s: &str) -> Color {
    Color::from_hex(s).unwrap_or(Color::BLACK)
}

// ─── Size / geometry ─────────────────────────────────────────────────────

/// The single authoritative dimension of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp negative / NaN axes to zero.
    pub fn sanitized(self) -> Self {
        Self {
            width: non_negative(self.width),
            height: non_negative(self.height),
        }
    }
}

/// `max(0, v)` that also maps NaN and infinities to zero.
pub fn non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// A 2D point in composite-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x, p.y)
    }
}

// ─── Stroke / font ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<Vec<f64>>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width: non_negative(width),
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f64, dash: Vec<f64>) -> Self {
        Self {
            color,
            width: non_negative(width),
            dash: Some(dash),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: u16, // 100..900
    #[serde(default)]
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: &str, size: f64, weight: u16) -> Self {
        Self {
            family: family.to_string(),
            size: non_negative(size),
            weight,
            italic: false,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("Pretendard", 14.0, 400)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

// ─── Primitive descriptors ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectShape {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub font: FontSpec,
    pub color: Color,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineShape {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: Stroke,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonShape {
    pub points: Vec<Point>,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

/// Source-space crop window of an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rounded clip rectangle in composite-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageShape {
    pub src: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub crop: Option<CropRect>,
    pub clip: Option<ClipRect>,
}

/// The five primitive kinds the scene-graph library knows how to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    Rect(RectShape),
    #[serde(rename = "textbox")]
    Text(TextShape),
    Line(LineShape),
    Polygon(PolygonShape),
    Image(ImageShape),
}

impl Shape {
    /// Axis-aligned bounds in composite-local coordinates (stroke excluded).
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) => Rect::new(r.left, r.top, r.left + r.width, r.top + r.height),
            Shape::Text(t) => Rect::new(t.left, t.top, t.left + t.width, t.top + t.height),
            Shape::Line(l) => Rect::from_points((l.x1, l.y1), (l.x2, l.y2)),
            Shape::Polygon(p) => {
                let mut pts = p.points.iter();
                let Some(first) = pts.next() else {
                    return Rect::ZERO;
                };
                pts.fold(Rect::from_points(kurbo::Point::from(*first), kurbo::Point::from(*first)), |acc, pt| {
                    acc.union_pt(kurbo::Point::from(*pt))
                })
            }
            Shape::Image(i) => {
                let r = Rect::new(i.left, i.top, i.left + i.width, i.top + i.height);
                match i.clip {
                    Some(c) => r.intersect(Rect::new(c.left, c.top, c.left + c.width, c.top + c.height)),
                    None => r,
                }
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Rect(_) => "rect",
            Shape::Text(_) => "textbox",
            Shape::Line(_) => "line",
            Shape::Polygon(_) => "polygon",
            Shape::Image(_) => "image",
        }
    }
}

/// One positioned primitive inside a composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    #[serde(flatten)]
    pub shape: Shape,
    /// Decorative sub-parts are never independently selectable.
    pub selectable: bool,
    /// Arrow part tag (`line`, `startHead`, `endHead`). Untagged otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<ArrowPart>,
}

impl Primitive {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            selectable: false,
            part: None,
        }
    }

    pub fn tagged(shape: Shape, part: ArrowPart) -> Self {
        Self {
            shape,
            selectable: false,
            part: Some(part),
        }
    }
}

// ─── Annotations ─────────────────────────────────────────────────────────

/// Kind of a free-standing shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Triangle,
    Diamond,
    Star,
    Line,
    Arrow,
    Text,
}

impl ShapeKind {
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::RoundedRectangle => "Rounded Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Star => "Star",
            ShapeKind::Line => "Line",
            ShapeKind::Arrow => "Arrow",
            ShapeKind::Text => "Text",
        }
    }

    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Rectangle,
        ShapeKind::RoundedRectangle,
        ShapeKind::Ellipse,
        ShapeKind::Triangle,
        ShapeKind::Diamond,
        ShapeKind::Star,
        ShapeKind::Line,
        ShapeKind::Arrow,
        ShapeKind::Text,
    ];
}

/// The recoverable annotation bag attached to a composite (`data` in the
/// persisted document).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_metadata: Option<ElementMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_kind: Option<ShapeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_options: Option<ArrowOptions>,
    /// Arrow part tag for children of an arrow group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<ArrowPart>,
    /// Watermark objects are kept in history but stripped before persistence.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub watermark: bool,
}

impl Annotation {
    pub fn for_metadata(meta: ElementMetadata) -> Self {
        Self {
            element_metadata: Some(meta),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Annotation::default()
    }
}

// ─── Composite ───────────────────────────────────────────────────────────

/// A child of a composite: a primitive, or a nested composite (user groups).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Primitive(Primitive),
    Group(Composite),
}

impl Node {
    pub fn bounds(&self) -> Rect {
        match self {
            Node::Primitive(p) => p.shape.bounds(),
            Node::Group(c) => Rect::new(c.left, c.top, c.left + c.width, c.top + c.height),
        }
    }
}

/// The addressable canvas unit produced from metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub id: Option<ElementId>,
    pub name: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub children: Vec<Node>,
    pub annotation: Annotation,
}

impl Composite {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        let size = size.sanitized();
        Self {
            id: None,
            name: name.into(),
            left: 0.0,
            top: 0.0,
            width: size.width,
            height: size.height,
            children: Vec::new(),
            annotation: Annotation::default(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.children.push(Node::Primitive(Primitive::new(shape)));
    }

    pub fn push_tagged(&mut self, shape: Shape, part: ArrowPart) {
        self.children.push(Node::Primitive(Primitive::tagged(shape, part)));
    }

    /// Iterate direct primitive children.
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.children.iter().filter_map(|n| match n {
            Node::Primitive(p) => Some(p),
            Node::Group(_) => None,
        })
    }

    /// Text content of every direct text child, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.primitives()
            .filter_map(|p| match &p.shape {
                Shape::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Union of all children bounds in local coordinates.
    pub fn content_bounds(&self) -> Rect {
        let mut it = self.children.iter().map(Node::bounds);
        match it.next() {
            Some(first) => it.fold(first, |acc, r| acc.union(r)),
            None => Rect::ZERO,
        }
    }
}

// ─── Shape constructors ──────────────────────────────────────────────────

/// Filled rectangle without stroke.
pub fn rect(left: f64, top: f64, width: f64, height: f64, fill: Option<Color>) -> Shape {
    Shape::Rect(RectShape {
        left,
        top,
        width: non_negative(width),
        height: non_negative(height),
        fill,
        stroke: None,
        corner_radius: 0.0,
    })
}

/// Rectangle with every attribute spelled out.
pub fn styled_rect(
    bounds: Rect,
    fill: Option<Color>,
    stroke: Option<Stroke>,
    corner_radius: f64,
) -> Shape {
    let width = non_negative(bounds.width());
    let height = non_negative(bounds.height());
    Shape::Rect(RectShape {
        left: bounds.x0,
        top: bounds.y0,
        width,
        height,
        fill,
        stroke,
        corner_radius: non_negative(corner_radius).min(width.min(height) / 2.0),
    })
}

pub fn text(
    bounds: Rect,
    content: impl Into<String>,
    font: FontSpec,
    color: Color,
    align: TextAlign,
) -> Shape {
    Shape::Text(TextShape {
        left: bounds.x0,
        top: bounds.y0,
        width: non_negative(bounds.width()),
        height: non_negative(bounds.height()),
        text: content.into(),
        font,
        color,
        align,
    })
}

pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) -> Shape {
    Shape::Line(LineShape {
        x1,
        y1,
        x2,
        y2,
        stroke,
    })
}

pub fn polygon(points: Vec<Point>, fill: Option<Color>, stroke: Option<Stroke>) -> Shape {
    Shape::Polygon(PolygonShape {
        points,
        fill,
        stroke,
    })
}
