//! Element metadata: the declarative, serializable configuration of every
//! element kind.
//!
//! Metadata is plain data. Builders read it and never mutate it. Every field
//! has a deterministic default supplied by the variant's `Default` impl;
//! `with_overrides` layers a partial JSON object on top of that default.

use crate::model::{Color, Size, TextAlign, hex};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Element kinds ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    CalendarGrid,
    WeekStrip,
    DateCell,
    PlannerNote,
    Schedule,
    Checklist,
    Table,
    Collage,
}

impl ElementKind {
    pub const ALL: [ElementKind; 8] = [
        ElementKind::CalendarGrid,
        ElementKind::WeekStrip,
        ElementKind::DateCell,
        ElementKind::PlannerNote,
        ElementKind::Schedule,
        ElementKind::Checklist,
        ElementKind::Table,
        ElementKind::Collage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::CalendarGrid => "calendar-grid",
            ElementKind::WeekStrip => "week-strip",
            ElementKind::DateCell => "date-cell",
            ElementKind::PlannerNote => "planner-note",
            ElementKind::Schedule => "schedule",
            ElementKind::Checklist => "checklist",
            ElementKind::Table => "table",
            ElementKind::Collage => "collage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Human-readable base name used for auto-generated element names.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::CalendarGrid => "Calendar",
            ElementKind::WeekStrip => "Week",
            ElementKind::DateCell => "Date",
            ElementKind::PlannerNote => "Note",
            ElementKind::Schedule => "Schedule",
            ElementKind::Checklist => "Checklist",
            ElementKind::Table => "Table",
            ElementKind::Collage => "Collage",
        }
    }

    /// Prefix for generated element IDs.
    pub fn id_prefix(self) -> &'static str {
        match self {
            ElementKind::CalendarGrid => "calendar",
            ElementKind::WeekStrip => "week",
            ElementKind::DateCell => "date",
            ElementKind::PlannerNote => "note",
            ElementKind::Schedule => "schedule",
            ElementKind::Checklist => "checklist",
            ElementKind::Table => "table",
            ElementKind::Collage => "collage",
        }
    }

    /// Kinds whose internal layout depends on discrete size and therefore
    /// must have visual scaling baked back into metadata.
    pub fn bakes_scale(self) -> bool {
        matches!(
            self,
            ElementKind::CalendarGrid | ElementKind::WeekStrip | ElementKind::DateCell
        )
    }
}

// ─── Shared enums ────────────────────────────────────────────────────────

/// Mutually exclusive treatments for marking a holiday on a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HolidayMarkerStyle {
    #[default]
    Text,
    Dot,
    Square,
    Border,
    Triangle,
    Bar,
    Background,
}

/// Header treatment shared by notes, schedules, and checklists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderStyle {
    None,
    #[default]
    Minimal,
    Tint,
    Filled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotePattern {
    #[default]
    Ruled,
    Grid,
    Dot,
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "12h")]
    H12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateMode {
    #[default]
    Dated,
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HolidayPosition {
    Top,
    #[default]
    Bottom,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckboxStyle {
    #[default]
    Square,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollageLayout {
    #[default]
    #[serde(rename = "grid-2x2")]
    Grid2x2,
    #[serde(rename = "grid-3x3")]
    Grid3x3,
    #[serde(rename = "masonry")]
    Masonry,
    #[serde(rename = "polaroid")]
    Polaroid,
    #[serde(rename = "filmstrip")]
    Filmstrip,
    #[serde(rename = "scrapbook")]
    Scrapbook,
    #[serde(rename = "mood-board")]
    MoodBoard,
}

impl CollageLayout {
    pub const ALL: [CollageLayout; 7] = [
        CollageLayout::Grid2x2,
        CollageLayout::Grid3x3,
        CollageLayout::Masonry,
        CollageLayout::Polaroid,
        CollageLayout::Filmstrip,
        CollageLayout::Scrapbook,
        CollageLayout::MoodBoard,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
}

// ─── calendar-grid ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarGridMetadata {
    pub size: Size,
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    /// First column of the week, 0 = Sunday … 6 = Saturday.
    pub start_day: u32,
    pub country: String,
    pub language: String,
    pub font_family: String,

    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub corner_radius: f64,
    pub padding: f64,

    pub show_header: bool,
    pub header_height: f64,
    pub header_font_size: f64,
    pub header_text_color: Color,
    pub header_background_color: Option<Color>,
    pub header_align: TextAlign,

    pub show_weekdays: bool,
    pub weekday_height: f64,
    pub weekday_font_size: f64,
    pub weekday_text_color: Color,
    pub sunday_color: Color,
    pub saturday_color: Color,

    pub cell_gap: f64,
    pub cell_padding: f64,
    pub cell_corner_radius: f64,
    pub cell_background_color: Color,
    pub cell_border_color: Color,
    pub cell_border_width: f64,
    pub weekend_background_color: Option<Color>,
    pub highlight_today: bool,
    pub today_background_color: Color,

    pub day_font_size: f64,
    pub day_text_color: Color,
    pub muted_text_color: Color,
    pub show_adjacent_days: bool,
    /// Always lay out six week rows instead of only the weeks spanned.
    pub fixed_six_weeks: bool,

    pub show_holidays: bool,
    pub holiday_color: Color,
    pub holiday_marker_style: HolidayMarkerStyle,
    pub show_holiday_names: bool,
    /// Whether the `text` marker also recolors out-of-month day numbers.
    pub holiday_text_overrides_muted: bool,

    pub show_holiday_list: bool,
    pub holiday_list_height: f64,
    pub holiday_list_min_height: f64,
    pub holiday_list_max_items: usize,
    pub holiday_list_font_size: f64,
    pub holiday_list_title: String,
    pub holiday_list_title_height: f64,
    pub holiday_list_row_height: f64,
}

impl Default for CalendarGridMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(480.0, 420.0),
            year: 2024,
            month: 1,
            start_day: 0,
            country: "US".into(),
            language: "en".into(),
            font_family: "Pretendard".into(),

            background_color: Color::WHITE,
            border_color: hex("#DEE2E6"),
            border_width: 1.0,
            corner_radius: 12.0,
            padding: 12.0,

            show_header: true,
            header_height: 44.0,
            header_font_size: 20.0,
            header_text_color: hex("#212529"),
            header_background_color: None,
            header_align: TextAlign::Left,

            show_weekdays: true,
            weekday_height: 24.0,
            weekday_font_size: 11.0,
            weekday_text_color: hex("#868E96"),
            sunday_color: hex("#E03131"),
            saturday_color: hex("#1971C2"),

            cell_gap: 2.0,
            cell_padding: 4.0,
            cell_corner_radius: 4.0,
            cell_background_color: Color::WHITE,
            cell_border_color: hex("#F1F3F5"),
            cell_border_width: 1.0,
            weekend_background_color: Some(hex("#F8F9FA")),
            highlight_today: true,
            today_background_color: hex("#FFF3BF"),

            day_font_size: 12.0,
            day_text_color: hex("#343A40"),
            muted_text_color: hex("#CED4DA"),
            show_adjacent_days: true,
            fixed_six_weeks: false,

            show_holidays: true,
            holiday_color: hex("#E03131"),
            holiday_marker_style: HolidayMarkerStyle::Text,
            show_holiday_names: true,
            holiday_text_overrides_muted: false,

            show_holiday_list: true,
            holiday_list_height: 96.0,
            holiday_list_min_height: 28.0,
            holiday_list_max_items: 4,
            holiday_list_font_size: 11.0,
            holiday_list_title: "Holidays".into(),
            holiday_list_title_height: 18.0,
            holiday_list_row_height: 16.0,
        }
    }
}

// ─── week-strip ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeekStripMetadata {
    pub size: Size,
    /// Any date inside the week to show.
    pub anchor_date: NaiveDate,
    pub start_day: u32,
    pub country: String,
    pub language: String,
    pub font_family: String,
    pub template_mode: TemplateMode,
    /// Header text used in blank mode (dated mode derives the range title).
    pub title: String,

    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub corner_radius: f64,
    pub padding: f64,

    pub show_header: bool,
    pub header_height: f64,
    pub header_font_size: f64,
    pub header_text_color: Color,

    pub show_weekdays: bool,
    pub weekday_height: f64,
    pub weekday_font_size: f64,
    pub weekday_text_color: Color,
    pub sunday_color: Color,
    pub saturday_color: Color,

    pub cell_gap: f64,
    pub cell_padding: f64,
    pub cell_corner_radius: f64,
    pub cell_background_color: Color,
    pub cell_border_color: Color,
    pub cell_border_width: f64,
    pub highlight_today: bool,
    pub today_background_color: Color,
    pub day_font_size: f64,
    pub day_text_color: Color,
    pub show_note_lines: bool,
    pub note_line_spacing: f64,
    pub note_line_color: Color,

    pub show_holidays: bool,
    pub holiday_color: Color,
    pub holiday_marker_style: HolidayMarkerStyle,

    pub show_holiday_list: bool,
    pub holiday_list_height: f64,
    pub holiday_list_min_height: f64,
    pub holiday_list_max_items: usize,
    pub holiday_list_font_size: f64,
    pub holiday_list_row_height: f64,
}

impl Default for WeekStripMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(720.0, 200.0),
            anchor_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            start_day: 0,
            country: "US".into(),
            language: "en".into(),
            font_family: "Pretendard".into(),
            template_mode: TemplateMode::Dated,
            title: String::new(),

            background_color: Color::WHITE,
            border_color: hex("#DEE2E6"),
            border_width: 1.0,
            corner_radius: 12.0,
            padding: 12.0,

            show_header: true,
            header_height: 32.0,
            header_font_size: 16.0,
            header_text_color: hex("#212529"),

            show_weekdays: true,
            weekday_height: 22.0,
            weekday_font_size: 11.0,
            weekday_text_color: hex("#868E96"),
            sunday_color: hex("#E03131"),
            saturday_color: hex("#1971C2"),

            cell_gap: 4.0,
            cell_padding: 6.0,
            cell_corner_radius: 6.0,
            cell_background_color: hex("#F8F9FA"),
            cell_border_color: hex("#E9ECEF"),
            cell_border_width: 1.0,
            highlight_today: true,
            today_background_color: hex("#FFF3BF"),
            day_font_size: 14.0,
            day_text_color: hex("#343A40"),
            show_note_lines: true,
            note_line_spacing: 20.0,
            note_line_color: hex("#E9ECEF"),

            show_holidays: true,
            holiday_color: hex("#E03131"),
            holiday_marker_style: HolidayMarkerStyle::Text,

            show_holiday_list: true,
            holiday_list_height: 40.0,
            holiday_list_min_height: 18.0,
            holiday_list_max_items: 3,
            holiday_list_font_size: 11.0,
            holiday_list_row_height: 16.0,
        }
    }
}

// ─── date-cell ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateCellMetadata {
    pub size: Size,
    pub date: NaiveDate,
    pub country: String,
    pub language: String,
    pub font_family: String,

    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub corner_radius: f64,
    pub padding: f64,

    /// Accent band height as a fraction of the cell, clamped to [0.05, 0.85].
    pub accent_ratio: f64,
    pub accent_color: Color,
    pub accent_text_color: Color,
    pub show_month: bool,
    pub show_weekday: bool,
    /// `None` sizes the day number from the body height.
    pub day_font_size: Option<f64>,
    pub day_text_color: Color,

    pub show_holiday: bool,
    pub holiday_position: HolidayPosition,
    pub holiday_color: Color,
    pub holiday_font_size: f64,
}

impl Default for DateCellMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(180.0, 180.0),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            country: "US".into(),
            language: "en".into(),
            font_family: "Pretendard".into(),

            background_color: Color::WHITE,
            border_color: hex("#DEE2E6"),
            border_width: 1.0,
            corner_radius: 12.0,
            padding: 10.0,

            accent_ratio: 0.28,
            accent_color: hex("#4C6EF5"),
            accent_text_color: Color::WHITE,
            show_month: true,
            show_weekday: true,
            day_font_size: None,
            day_text_color: hex("#212529"),

            show_holiday: true,
            holiday_position: HolidayPosition::Bottom,
            holiday_color: hex("#E03131"),
            holiday_font_size: 11.0,
        }
    }
}

// ─── planner-note ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerNoteMetadata {
    pub size: Size,
    pub title: String,
    pub font_family: String,

    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub corner_radius: f64,
    pub padding: f64,

    pub header_style: HeaderStyle,
    pub header_height: f64,
    pub title_font_size: f64,
    pub title_color: Color,
    pub accent_color: Color,
    pub header_text_color: Color,
    pub divider_color: Color,

    pub pattern: NotePattern,
    pub line_spacing: f64,
    pub pattern_color: Color,
    pub pattern_width: f64,
    pub dot_radius: f64,
}

impl Default for PlannerNoteMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(360.0, 480.0),
            title: "Notes".into(),
            font_family: "Pretendard".into(),

            background_color: Color::WHITE,
            border_color: hex("#DEE2E6"),
            border_width: 1.0,
            corner_radius: 12.0,
            padding: 16.0,

            header_style: HeaderStyle::Minimal,
            header_height: 48.0,
            title_font_size: 18.0,
            title_color: hex("#212529"),
            accent_color: hex("#4C6EF5"),
            header_text_color: Color::WHITE,
            divider_color: hex("#DEE2E6"),

            pattern: NotePattern::Ruled,
            line_spacing: 28.0,
            pattern_color: hex("#E9ECEF"),
            pattern_width: 1.0,
            dot_radius: 1.5,
        }
    }
}

// ─── schedule ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleMetadata {
    pub size: Size,
    pub title: String,
    pub font_family: String,

    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub corner_radius: f64,
    pub padding: f64,

    pub header_style: HeaderStyle,
    pub header_height: f64,
    pub title_font_size: f64,
    pub title_color: Color,
    pub accent_color: Color,
    pub header_text_color: Color,
    pub divider_color: Color,

    pub start_hour: u32,
    pub end_hour: u32,
    pub interval_minutes: u32,
    pub time_format: TimeFormat,
    pub time_column_width: f64,
    pub label_font_size: f64,
    pub label_color: Color,
    pub line_color: Color,
    pub line_width: f64,
    pub show_half_lines: bool,
}

impl Default for ScheduleMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(320.0, 640.0),
            title: "Schedule".into(),
            font_family: "Pretendard".into(),

            background_color: Color::WHITE,
            border_color: hex("#DEE2E6"),
            border_width: 1.0,
            corner_radius: 12.0,
            padding: 14.0,

            header_style: HeaderStyle::Filled,
            header_height: 48.0,
            title_font_size: 18.0,
            title_color: hex("#212529"),
            accent_color: hex("#4C6EF5"),
            header_text_color: Color::WHITE,
            divider_color: hex("#DEE2E6"),

            start_hour: 8,
            end_hour: 20,
            interval_minutes: 60,
            time_format: TimeFormat::H24,
            time_column_width: 52.0,
            label_font_size: 11.0,
            label_color: hex("#868E96"),
            line_color: hex("#E9ECEF"),
            line_width: 1.0,
            show_half_lines: false,
        }
    }
}

// ─── checklist ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistItem {
    pub text: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistMetadata {
    pub size: Size,
    pub title: String,
    pub font_family: String,

    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub corner_radius: f64,
    pub padding: f64,

    pub header_style: HeaderStyle,
    pub header_height: f64,
    pub title_font_size: f64,
    pub title_color: Color,
    pub accent_color: Color,
    pub header_text_color: Color,
    pub divider_color: Color,

    pub items: Vec<ChecklistItem>,
    /// Minimum number of rows; empty rows are drawn for unused slots.
    pub row_count: usize,
    pub checkbox_style: CheckboxStyle,
    pub checkbox_color: Color,
    pub check_color: Color,
    pub item_font_size: f64,
    pub item_text_color: Color,
    pub checked_text_color: Color,
    pub show_dividers: bool,
}

impl Default for ChecklistMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(300.0, 400.0),
            title: "To Do".into(),
            font_family: "Pretendard".into(),

            background_color: Color::WHITE,
            border_color: hex("#DEE2E6"),
            border_width: 1.0,
            corner_radius: 12.0,
            padding: 14.0,

            header_style: HeaderStyle::Tint,
            header_height: 48.0,
            title_font_size: 18.0,
            title_color: hex("#212529"),
            accent_color: hex("#12B886"),
            header_text_color: Color::WHITE,
            divider_color: hex("#F1F3F5"),

            items: Vec::new(),
            row_count: 8,
            checkbox_style: CheckboxStyle::Square,
            checkbox_color: hex("#ADB5BD"),
            check_color: hex("#12B886"),
            item_font_size: 14.0,
            item_text_color: hex("#343A40"),
            checked_text_color: hex("#ADB5BD"),
            show_dividers: true,
        }
    }
}

// ─── table ───────────────────────────────────────────────────────────────

/// A merged cell region anchored at `(row, column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMerge {
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub col_span: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableMetadata {
    pub size: Size,
    pub rows: usize,
    pub columns: usize,
    pub column_widths: Option<Vec<f64>>,
    pub row_heights: Option<Vec<f64>>,
    pub merges: Vec<CellMerge>,
    pub cell_contents: Option<Vec<Vec<String>>>,
    pub font_family: String,

    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub corner_radius: f64,

    pub header_row: bool,
    pub header_fill: Color,
    pub header_text_color: Color,
    pub footer_row: bool,
    pub footer_fill: Color,
    pub footer_text_color: Color,
    pub cell_fill: Color,
    pub cell_text_color: Color,
    pub stripe_rows: bool,
    pub stripe_fill: Color,
    pub font_size: f64,
    pub cell_padding: f64,
    pub text_align: TextAlign,
}

impl Default for TableMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(360.0, 240.0),
            rows: 3,
            columns: 3,
            column_widths: None,
            row_heights: None,
            merges: Vec::new(),
            cell_contents: None,
            font_family: "Pretendard".into(),

            background_color: Color::WHITE,
            border_color: hex("#CED4DA"),
            border_width: 1.0,
            corner_radius: 0.0,

            header_row: true,
            header_fill: hex("#343A40"),
            header_text_color: Color::WHITE,
            footer_row: false,
            footer_fill: hex("#E9ECEF"),
            footer_text_color: hex("#212529"),
            cell_fill: Color::WHITE,
            cell_text_color: hex("#343A40"),
            stripe_rows: false,
            stripe_fill: hex("#F8F9FA"),
            font_size: 13.0,
            cell_padding: 6.0,
            text_align: TextAlign::Left,
        }
    }
}

// ─── collage ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollageImage {
    pub url: String,
    #[serde(default)]
    pub fit: Option<ImageFit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollageMetadata {
    pub size: Size,
    pub layout: CollageLayout,
    /// One entry per slot; `None` keeps the placeholder.
    pub images: Vec<Option<CollageImage>>,
    pub fit: ImageFit,
    pub clip_images: bool,
    pub font_family: String,

    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub corner_radius: f64,
    pub padding: f64,
    pub gap: f64,

    pub slot_corner_radius: f64,
    pub slot_color: Color,
    pub placeholder_color: Color,
    pub caption: String,
    pub caption_font_size: f64,
    pub caption_color: Color,
}

impl Default for CollageMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(400.0, 400.0),
            layout: CollageLayout::Grid2x2,
            images: Vec::new(),
            fit: ImageFit::Cover,
            clip_images: true,
            font_family: "Pretendard".into(),

            background_color: Color::WHITE,
            border_color: hex("#DEE2E6"),
            border_width: 1.0,
            corner_radius: 12.0,
            padding: 12.0,
            gap: 8.0,

            slot_corner_radius: 8.0,
            slot_color: hex("#F1F3F5"),
            placeholder_color: hex("#ADB5BD"),
            caption: String::new(),
            caption_font_size: 14.0,
            caption_color: hex("#495057"),
        }
    }
}

// ─── Tagged union ────────────────────────────────────────────────────────

/// Metadata for one canvas element, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ElementMetadata {
    CalendarGrid(CalendarGridMetadata),
    WeekStrip(WeekStripMetadata),
    DateCell(DateCellMetadata),
    PlannerNote(PlannerNoteMetadata),
    Schedule(ScheduleMetadata),
    Checklist(ChecklistMetadata),
    Table(TableMetadata),
    Collage(CollageMetadata),
}

impl ElementMetadata {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementMetadata::CalendarGrid(_) => ElementKind::CalendarGrid,
            ElementMetadata::WeekStrip(_) => ElementKind::WeekStrip,
            ElementMetadata::DateCell(_) => ElementKind::DateCell,
            ElementMetadata::PlannerNote(_) => ElementKind::PlannerNote,
            ElementMetadata::Schedule(_) => ElementKind::Schedule,
            ElementMetadata::Checklist(_) => ElementKind::Checklist,
            ElementMetadata::Table(_) => ElementKind::Table,
            ElementMetadata::Collage(_) => ElementKind::Collage,
        }
    }

    pub fn size(&self) -> Size {
        match self {
            ElementMetadata::CalendarGrid(m) => m.size,
            ElementMetadata::WeekStrip(m) => m.size,
            ElementMetadata::DateCell(m) => m.size,
            ElementMetadata::PlannerNote(m) => m.size,
            ElementMetadata::Schedule(m) => m.size,
            ElementMetadata::Checklist(m) => m.size,
            ElementMetadata::Table(m) => m.size,
            ElementMetadata::Collage(m) => m.size,
        }
    }

    /// Return a copy with a replaced size. Metadata itself stays immutable.
    pub fn with_size(&self, size: Size) -> Self {
        let mut next = self.clone();
        match &mut next {
            ElementMetadata::CalendarGrid(m) => m.size = size,
            ElementMetadata::WeekStrip(m) => m.size = size,
            ElementMetadata::DateCell(m) => m.size = size,
            ElementMetadata::PlannerNote(m) => m.size = size,
            ElementMetadata::Schedule(m) => m.size = size,
            ElementMetadata::Checklist(m) => m.size = size,
            ElementMetadata::Table(m) => m.size = size,
            ElementMetadata::Collage(m) => m.size = size,
        }
        next
    }

    /// Fully populated default metadata for `kind` with `overrides` applied.
    pub fn defaults_for(kind: ElementKind, overrides: &Value) -> Self {
        match kind {
            ElementKind::CalendarGrid => {
                ElementMetadata::CalendarGrid(with_overrides(CalendarGridMetadata::default(), overrides))
            }
            ElementKind::WeekStrip => {
                ElementMetadata::WeekStrip(with_overrides(WeekStripMetadata::default(), overrides))
            }
            ElementKind::DateCell => {
                ElementMetadata::DateCell(with_overrides(DateCellMetadata::default(), overrides))
            }
            ElementKind::PlannerNote => {
                ElementMetadata::PlannerNote(with_overrides(PlannerNoteMetadata::default(), overrides))
            }
            ElementKind::Schedule => {
                ElementMetadata::Schedule(with_overrides(ScheduleMetadata::default(), overrides))
            }
            ElementKind::Checklist => {
                ElementMetadata::Checklist(with_overrides(ChecklistMetadata::default(), overrides))
            }
            ElementKind::Table => ElementMetadata::Table(with_overrides(TableMetadata::default(), overrides)),
            ElementKind::Collage => {
                ElementMetadata::Collage(with_overrides(CollageMetadata::default(), overrides))
            }
        }
    }

    /// Apply a partial update on top of this metadata (property panel edits).
    pub fn updated(&self, overrides: &Value) -> Self {
        match self {
            ElementMetadata::CalendarGrid(m) => ElementMetadata::CalendarGrid(with_overrides(m.clone(), overrides)),
            ElementMetadata::WeekStrip(m) => ElementMetadata::WeekStrip(with_overrides(m.clone(), overrides)),
            ElementMetadata::DateCell(m) => ElementMetadata::DateCell(with_overrides(m.clone(), overrides)),
            ElementMetadata::PlannerNote(m) => ElementMetadata::PlannerNote(with_overrides(m.clone(), overrides)),
            ElementMetadata::Schedule(m) => ElementMetadata::Schedule(with_overrides(m.clone(), overrides)),
            ElementMetadata::Checklist(m) => ElementMetadata::Checklist(with_overrides(m.clone(), overrides)),
            ElementMetadata::Table(m) => ElementMetadata::Table(with_overrides(m.clone(), overrides)),
            ElementMetadata::Collage(m) => ElementMetadata::Collage(with_overrides(m.clone(), overrides)),
        }
    }
}

// ─── Override merging ────────────────────────────────────────────────────

/// Layer `overrides` (a partial JSON object) on top of `base`.
///
/// Keys are applied one at a time against the base's JSON form. `size` is
/// merged per axis, so `{"size": {"width": 10}}` keeps the default height.
/// A key whose value does not fit the field's type is skipped with a
/// warning; there is no other failure mode.
pub fn with_overrides<T>(base: T, overrides: &Value) -> T
where
    T: Serialize + DeserializeOwned,
{
    let over = match overrides {
        Value::Object(map) => map,
        Value::Null => return base,
        other => {
            log::warn!("metadata overrides must be an object, ignoring {other}");
            return base;
        }
    };
    let mut merged = match serde_json::to_value(&base) {
        Ok(Value::Object(map)) => map,
        _ => return base,
    };

    for (key, value) in over {
        if key == "kind" {
            continue;
        }
        let next = match (key.as_str(), merged.get(key), value) {
            ("size", Some(Value::Object(current)), Value::Object(partial)) => {
                let mut size: Map<String, Value> = current.clone();
                for (axis, v) in partial {
                    size.insert(axis.clone(), v.clone());
                }
                Value::Object(size)
            }
            _ => value.clone(),
        };

        let mut candidate = merged.clone();
        candidate.insert(key.clone(), next);
        match serde_json::from_value::<T>(Value::Object(candidate.clone())) {
            Ok(_) => merged = candidate,
            Err(err) => log::warn!("ignoring metadata override `{key}`: {err}"),
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_win_over_defaults() {
        let m = with_overrides(CalendarGridMetadata::default(), &json!({"year": 2030, "month": 7}));
        assert_eq!(m.year, 2030);
        assert_eq!(m.month, 7);
        assert_eq!(m.language, "en");
    }

    #[test]
    fn partial_size_keeps_other_axis() {
        let m = with_overrides(TableMetadata::default(), &json!({"size": {"width": 500}}));
        assert_eq!(m.size, Size::new(500.0, 240.0));
    }

    #[test]
    fn mistyped_override_is_ignored() {
        let m = with_overrides(
            ScheduleMetadata::default(),
            &json!({"startHour": "nine", "endHour": 18}),
        );
        assert_eq!(m.start_hour, 8);
        assert_eq!(m.end_hour, 18);
    }

    #[test]
    fn unchecked_ranges_are_accepted() {
        let m = with_overrides(TableMetadata::default(), &json!({"rows": 0}));
        assert_eq!(m.rows, 0);
    }

    #[test]
    fn metadata_json_roundtrip_is_lossless() {
        for kind in ElementKind::ALL {
            let meta = ElementMetadata::defaults_for(kind, &Value::Null);
            let json = serde_json::to_string(&meta).unwrap();
            let back: ElementMetadata = serde_json::from_str(&json).unwrap();
            assert_eq!(meta, back, "roundtrip failed for {}", kind.as_str());
            assert_eq!(back.kind(), kind);
        }
    }

    #[test]
    fn kind_tag_is_kebab_case() {
        let v = serde_json::to_value(ElementMetadata::defaults_for(ElementKind::CalendarGrid, &Value::Null))
            .unwrap();
        assert_eq!(v["kind"], "calendar-grid");
        assert_eq!(v["holidayMarkerStyle"], "text");
    }

    #[test]
    fn collage_layout_names() {
        let v = serde_json::to_value(CollageLayout::MoodBoard).unwrap();
        assert_eq!(v, "mood-board");
        let l: CollageLayout = serde_json::from_value(json!("grid-3x3")).unwrap();
        assert_eq!(l, CollageLayout::Grid3x3);
    }
}
