//! Holiday data seam.
//!
//! The core never fetches holidays. A [`HolidayProvider`] is injected and
//! must be a deterministic function of `(year, country, language)`.
//! The helpers here filter, group, and order what it returns.

use crate::locale::Lang;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};

/// One holiday as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub name: String,
    #[serde(default)]
    pub local_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl Holiday {
    pub fn new(date: &str, name: &str) -> Self {
        Self {
            date: date.to_string(),
            name: name.to_string(),
            local_name: name.to_string(),
            is_public: None,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.get(..10).unwrap_or(&self.date), "%Y-%m-%d").ok()
    }

    /// Only an explicit `isPublic: false` excludes a holiday.
    pub fn counts_as_public(&self) -> bool {
        self.is_public != Some(false)
    }

    fn display_name(&self, lang: Lang) -> &str {
        if lang.is_english() || self.local_name.is_empty() {
            &self.name
        } else {
            &self.local_name
        }
    }
}

/// `(year, country, language) -> Holiday[]`.
pub trait HolidayProvider {
    fn holidays(&self, year: i32, country: &str, language: &str) -> Vec<Holiday>;
}

impl<F> HolidayProvider for F
where
    F: Fn(i32, &str, &str) -> Vec<Holiday>,
{
    fn holidays(&self, year: i32, country: &str, language: &str) -> Vec<Holiday> {
        self(year, country, language)
    }
}

/// Provider that knows no holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayProvider for NoHolidays {
    fn holidays(&self, _year: i32, _country: &str, _language: &str) -> Vec<Holiday> {
        Vec::new()
    }
}

/// Fixed holiday table keyed by country code (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct StaticHolidays {
    by_country: HashMap<String, Vec<Holiday>>,
}

impl StaticHolidays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: &str, holiday: Holiday) {
        self.by_country
            .entry(country.to_ascii_uppercase())
            .or_default()
            .push(holiday);
    }

    pub fn with(mut self, country: &str, holiday: Holiday) -> Self {
        self.insert(country, holiday);
        self
    }

    /// Load `{ "US": [ {date, name, localName, isPublic?}, ... ], ... }`.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let by_country: HashMap<String, Vec<Holiday>> =
            serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(Self {
            by_country: by_country
                .into_iter()
                .map(|(k, v)| (k.to_ascii_uppercase(), v))
                .collect(),
        })
    }
}

impl HolidayProvider for StaticHolidays {
    fn holidays(&self, year: i32, country: &str, _language: &str) -> Vec<Holiday> {
        self.by_country
            .get(&country.to_ascii_uppercase())
            .map(|list| {
                list.iter()
                    .filter(|h| h.parsed_date().is_some_and(|d| d.year() == year))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ─── Grouping ────────────────────────────────────────────────────────────

/// All public holidays falling on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHolidays {
    pub date: NaiveDate,
    pub names: SmallVec<[String; 2]>,
}

impl DayHolidays {
    /// Same-day names joined with `", "`.
    pub fn label(&self) -> String {
        self.names.join(", ")
    }
}

/// Public holidays of one month, grouped per day, ISO-date ascending.
pub fn month_holidays(
    provider: &dyn HolidayProvider,
    year: i32,
    month: u32,
    country: &str,
    language: &str,
) -> Vec<DayHolidays> {
    let lang = Lang::from_tag(language);
    let list = provider.holidays(year, country, language);
    group(
        list.iter().filter_map(|h| {
            let date = h.parsed_date()?;
            (date.year() == year && date.month() == month && h.counts_as_public())
                .then(|| (date, h.display_name(lang).to_string()))
        }),
    )
}

/// Public holidays within `[first, last]`, which may span a year boundary.
pub fn range_holidays(
    provider: &dyn HolidayProvider,
    first: NaiveDate,
    last: NaiveDate,
    country: &str,
    language: &str,
) -> Vec<DayHolidays> {
    let lang = Lang::from_tag(language);
    let mut all = Vec::new();
    for year in first.year()..=last.year() {
        all.extend(provider.holidays(year, country, language));
    }
    group(all.iter().filter_map(|h| {
        let date = h.parsed_date()?;
        (date >= first && date <= last && h.counts_as_public())
            .then(|| (date, h.display_name(lang).to_string()))
    }))
}

fn group(entries: impl Iterator<Item = (NaiveDate, String)>) -> Vec<DayHolidays> {
    let mut by_date: BTreeMap<NaiveDate, SmallVec<[String; 2]>> = BTreeMap::new();
    for (date, name) in entries {
        let names = by_date.entry(date).or_default();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    by_date
        .into_iter()
        .map(|(date, names)| DayHolidays { date, names })
        .collect()
}

/// Find the group for `date` in an ordered list.
pub fn holidays_on(list: &[DayHolidays], date: NaiveDate) -> Option<&DayHolidays> {
    list.binary_search_by(|d| d.date.cmp(&date))
        .ok()
        .map(|i| &list[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticHolidays {
        StaticHolidays::new()
            .with("US", Holiday::new("2024-02-19", "Presidents' Day"))
            .with("US", Holiday::new("2024-02-14", "Valentine's Day"))
            .with(
                "US",
                Holiday {
                    is_public: Some(false),
                    ..Holiday::new("2024-02-02", "Groundhog Day")
                },
            )
            .with("US", Holiday::new("2024-03-17", "St. Patrick's Day"))
            .with("US", Holiday::new("2024-02-14", "Lunar Test"))
    }

    #[test]
    fn month_filter_excludes_non_public_and_other_months() {
        let list = month_holidays(&provider(), 2024, 2, "us", "en");
        let dates: Vec<_> = list.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-02-14", "2024-02-19"]);
    }

    #[test]
    fn same_day_names_are_joined() {
        let list = month_holidays(&provider(), 2024, 2, "US", "en");
        assert_eq!(list[0].label(), "Valentine's Day, Lunar Test");
    }

    #[test]
    fn local_name_used_for_non_english() {
        let p = StaticHolidays::new().with(
            "KR",
            Holiday {
                local_name: "설날".into(),
                ..Holiday::new("2024-02-10", "Korean New Year")
            },
        );
        let list = month_holidays(&p, 2024, 2, "KR", "ko");
        assert_eq!(list[0].label(), "설날");
    }

    #[test]
    fn closures_are_providers() {
        let p = |year: i32, _: &str, _: &str| vec![Holiday::new(&format!("{year}-01-01"), "New Year")];
        let first = NaiveDate::from_ymd_opt(2024, 12, 29).unwrap();
        let last = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        let list = range_holidays(&p, first, last, "US", "en");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
