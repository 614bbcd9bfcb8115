pub mod arrow;
pub mod builder;
pub mod calendar;
pub mod holidays;
pub mod id;
pub mod images;
pub mod locale;
pub mod metadata;
pub mod model;

pub use arrow::{ArrowEnds, ArrowOptions, ArrowPart, build_arrow, derive_arrow_geometry};
pub use builder::shapes::{ShapeStyle, build_shape, build_text};
pub use builder::{BuildContext, build_element};
pub use holidays::{Holiday, HolidayProvider, NoHolidays, StaticHolidays};
pub use id::{ElementId, IdSource, ProcessIds, SequentialIds};
pub use images::{ImageCache, ImageState};
pub use metadata::{ElementKind, ElementMetadata};
pub use model::*;
