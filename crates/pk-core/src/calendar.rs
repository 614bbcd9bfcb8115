//! Calendar arithmetic for month grids and week strips.
//!
//! Weekday indices are 0 = Sunday … 6 = Saturday throughout, matching the
//! `startDay` field in metadata. Out-of-range inputs are clamped rather than
//! rejected.

use chrono::{Datelike, Days, NaiveDate};

/// First supported year; keeps chrono away from its representable limits.
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

pub fn clamp_month(month: u32) -> u32 {
    month.clamp(1, 12)
}

pub fn clamp_start_day(start_day: u32) -> u32 {
    start_day.min(6)
}

pub fn clamp_year(year: i32) -> i32 {
    year.clamp(MIN_YEAR, MAX_YEAR)
}

/// First day of a (clamped) month.
pub fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(clamp_year(year), clamp_month(month), 1).unwrap_or_default()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = first_of_month(year, month);
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(first);
    next.signed_duration_since(first).num_days().max(28) as u32
}

/// 0 = Sunday … 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Column of `date` in a week that starts on `start_day`.
pub fn column_of(date: NaiveDate, start_day: u32) -> usize {
    ((weekday_index(date) + 7 - clamp_start_day(start_day)) % 7) as usize
}

/// Weekday index shown in `column` for a week starting on `start_day`.
pub fn weekday_for_column(column: usize, start_day: u32) -> u32 {
    (clamp_start_day(start_day) + column as u32) % 7
}

pub fn is_weekend_index(weekday: u32) -> bool {
    weekday == 0 || weekday == 6
}

pub fn is_weekend(date: NaiveDate) -> bool {
    is_weekend_index(weekday_index(date))
}

/// One day slot of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySlot {
    pub date: NaiveDate,
    pub row: usize,
    pub column: usize,
    /// False for leading/trailing days borrowed from adjacent months.
    pub in_month: bool,
}

/// The week rows covering one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub rows: usize,
    /// `rows * 7` slots in reading order.
    pub slots: Vec<DaySlot>,
}

impl MonthGrid {
    pub fn days_in_month(&self) -> usize {
        self.slots.iter().filter(|s| s.in_month).count()
    }
}

/// Lay out a month as week rows.
///
/// The grid spans only the weeks the month touches (4 to 6 rows) unless
/// `fixed_six_weeks` forces six.
pub fn month_grid(year: i32, month: u32, start_day: u32, fixed_six_weeks: bool) -> MonthGrid {
    let first = first_of_month(year, month);
    let total = days_in_month(year, month) as usize;
    let lead = column_of(first, start_day);
    let spanned = (lead + total).div_ceil(7);
    let rows = if fixed_six_weeks { 6 } else { spanned };

    let grid_start = first.checked_sub_days(Days::new(lead as u64)).unwrap_or(first);
    let slots = (0..rows * 7)
        .map(|i| {
            let date = grid_start
                .checked_add_days(Days::new(i as u64))
                .unwrap_or(grid_start);
            DaySlot {
                date,
                row: i / 7,
                column: i % 7,
                in_month: date.month() == first.month() && date.year() == first.year(),
            }
        })
        .collect();

    MonthGrid {
        year: first.year(),
        month: first.month(),
        rows,
        slots,
    }
}

/// The seven dates of the week containing `date`, starting on `start_day`.
pub fn week_of(date: NaiveDate, start_day: u32) -> [NaiveDate; 7] {
    let start = date
        .checked_sub_days(Days::new(column_of(date, start_day) as u64))
        .unwrap_or(date);
    std::array::from_fn(|i| start.checked_add_days(Days::new(i as u64)).unwrap_or(start))
}
