//! Layout/graphics builders: `metadata -> Composite`.
//!
//! One builder per element kind. Builders are pure: everything they depend
//! on beyond the metadata (holidays, "today", decoded image sizes) arrives
//! through [`BuildContext`]. They never fail; malformed numbers are clamped
//! at the point of use.

pub mod calendar_grid;
pub mod checklist;
pub mod collage;
pub mod date_cell;
pub mod header;
pub mod markers;
pub mod note;
pub mod schedule;
pub mod segments;
pub mod shapes;
pub mod table;
pub mod week_strip;

use crate::holidays::{HolidayProvider, NoHolidays};
use crate::images::ImageCache;
use crate::metadata::ElementMetadata;
use crate::model::{Annotation, Color, Composite, FontSpec, Size, Stroke, non_negative, styled_rect};
use chrono::NaiveDate;
use kurbo::Rect;

/// Everything a builder may consult besides its metadata.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub holidays: &'a dyn HolidayProvider,
    /// The date to highlight as "today". Passed in, never read from a clock.
    pub today: Option<NaiveDate>,
    pub images: Option<&'a ImageCache>,
}

impl BuildContext<'static> {
    /// No holidays, no today highlight, no decoded images.
    pub fn empty() -> Self {
        Self {
            holidays: &NoHolidays,
            today: None,
            images: None,
        }
    }
}

impl<'a> BuildContext<'a> {
    pub fn new(holidays: &'a dyn HolidayProvider) -> Self {
        Self {
            holidays,
            today: None,
            images: None,
        }
    }

    pub fn with_today(mut self, today: Option<NaiveDate>) -> Self {
        self.today = today;
        self
    }

    pub fn with_images(mut self, images: &'a ImageCache) -> Self {
        self.images = Some(images);
        self
    }
}

impl std::fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("today", &self.today)
            .field("images", &self.images.map(ImageCache::len))
            .finish_non_exhaustive()
    }
}

/// Build the composite for any metadata kind. The originating metadata is
/// attached as the composite's annotation.
pub fn build_element(meta: &ElementMetadata, ctx: &BuildContext<'_>) -> Composite {
    let mut composite = match meta {
        ElementMetadata::CalendarGrid(m) => calendar_grid::build_calendar_grid(m, ctx),
        ElementMetadata::WeekStrip(m) => week_strip::build_week_strip(m, ctx),
        ElementMetadata::DateCell(m) => date_cell::build_date_cell(m, ctx),
        ElementMetadata::PlannerNote(m) => note::build_planner_note(m),
        ElementMetadata::Schedule(m) => schedule::build_schedule(m),
        ElementMetadata::Checklist(m) => checklist::build_checklist(m),
        ElementMetadata::Table(m) => table::build_table(m),
        ElementMetadata::Collage(m) => collage::build_collage(m, ctx),
    };
    composite.annotation = Annotation::for_metadata(meta.clone());
    composite
}

// ─── Shared helpers ──────────────────────────────────────────────────────

/// Start a composite with its full-size frame rectangle, so the bounding
/// box always equals `size`.
pub(crate) fn framed(
    name: &str,
    size: Size,
    background: Color,
    border_color: Color,
    border_width: f64,
    corner_radius: f64,
) -> Composite {
    let size = size.sanitized();
    let mut composite = Composite::new(name, size);
    let border = (non_negative(border_width) > 0.0).then(|| Stroke::solid(border_color, border_width));
    composite.push(styled_rect(
        Rect::new(0.0, 0.0, size.width, size.height),
        Some(background),
        border,
        corner_radius,
    ));
    composite
}

/// Inner content rectangle after padding; padding never exceeds half an axis.
pub(crate) fn inset(size: Size, padding: f64) -> Rect {
    let size = size.sanitized();
    let pad = non_negative(padding)
        .min(size.width / 2.0)
        .min(size.height / 2.0);
    Rect::new(pad, pad, size.width - pad, size.height - pad)
}

pub(crate) fn font(family: &str, size: f64, weight: u16) -> FontSpec {
    FontSpec::new(family, size, weight)
}

/// Clamp a rectangle into `outer` so children never leave the frame.
pub(crate) fn clamp_rect(r: Rect, outer: Rect) -> Rect {
    let x0 = r.x0.clamp(outer.x0, outer.x1);
    let y0 = r.y0.clamp(outer.y0, outer.y1);
    let x1 = r.x1.clamp(x0, outer.x1);
    let y1 = r.y1.clamp(y0, outer.y1);
    Rect::new(x0, y0, x1, y1)
}

/// Gap between `count` tracks, shrunk so the gaps alone never exceed `total`.
pub(crate) fn fit_gap(gap: f64, total: f64, count: usize) -> f64 {
    if count < 2 {
        return 0.0;
    }
    non_negative(gap).min(non_negative(total) / (count - 1) as f64)
}

/// Replace a NaN/infinite value with a fallback.
pub(crate) fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}
