//! Locale tables for calendar labels.
//!
//! Only what the builders need: short weekday labels, month names, and the
//! title/range formats. Unknown languages fall back to English.

use crate::metadata::TimeFormat;
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Ko,
    Ja,
    Zh,
    Fr,
    De,
    Es,
}

impl Lang {
    /// Resolve a BCP-47-ish tag (`"ko"`, `"ko-KR"`, `"en_US"`).
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ko" => Lang::Ko,
            "ja" => Lang::Ja,
            "zh" => Lang::Zh,
            "fr" => Lang::Fr,
            "de" => Lang::De,
            "es" => Lang::Es,
            _ => Lang::En,
        }
    }

    pub fn is_english(self) -> bool {
        self == Lang::En
    }
}

const WEEKDAYS_EN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEKDAYS_KO: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];
const WEEKDAYS_JA: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];
const WEEKDAYS_ZH: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];
const WEEKDAYS_FR: [&str; 7] = ["dim", "lun", "mar", "mer", "jeu", "ven", "sam"];
const WEEKDAYS_DE: [&str; 7] = ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"];
const WEEKDAYS_ES: [&str; 7] = ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"];

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const MONTHS_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];
const MONTHS_DE: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];
const MONTHS_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];

/// Short label for weekday index (0 = Sunday).
pub fn weekday_label(lang: Lang, weekday: u32) -> &'static str {
    let table = match lang {
        Lang::En => &WEEKDAYS_EN,
        Lang::Ko => &WEEKDAYS_KO,
        Lang::Ja => &WEEKDAYS_JA,
        Lang::Zh => &WEEKDAYS_ZH,
        Lang::Fr => &WEEKDAYS_FR,
        Lang::De => &WEEKDAYS_DE,
        Lang::Es => &WEEKDAYS_ES,
    };
    table[(weekday % 7) as usize]
}

/// Month name for a 1-based month. CJK languages use the numeric form.
pub fn month_name(lang: Lang, month: u32) -> String {
    let idx = (month.clamp(1, 12) - 1) as usize;
    match lang {
        Lang::En => MONTHS_EN[idx].to_string(),
        Lang::Fr => MONTHS_FR[idx].to_string(),
        Lang::De => MONTHS_DE[idx].to_string(),
        Lang::Es => MONTHS_ES[idx].to_string(),
        Lang::Ko => format!("{}월", idx + 1),
        Lang::Ja | Lang::Zh => format!("{}月", idx + 1),
    }
}

/// Short month label for compact headers (`Feb`, `2월`).
pub fn month_short(lang: Lang, month: u32) -> String {
    match lang {
        Lang::Ko | Lang::Ja | Lang::Zh => month_name(lang, month),
        _ => month_name(lang, month).chars().take(3).collect(),
    }
}

/// Calendar grid title: `February 2024`, `2024년 2월`, `2024年2月`.
pub fn month_title(lang: Lang, year: i32, month: u32) -> String {
    match lang {
        Lang::Ko => format!("{year}년 {}", month_name(lang, month)),
        Lang::Ja | Lang::Zh => format!("{year}年{}", month_name(lang, month)),
        _ => format!("{} {year}", month_name(lang, month)),
    }
}

/// Week range title: `Feb 18 – 24, 2024`, `Jan 29 – Feb 4, 2024`.
pub fn week_title(lang: Lang, first: NaiveDate, last: NaiveDate) -> String {
    match lang {
        Lang::Ko => format!(
            "{}년 {}월 {}일 – {}월 {}일",
            first.year(),
            first.month(),
            first.day(),
            last.month(),
            last.day()
        ),
        Lang::Ja | Lang::Zh => format!(
            "{}年{}月{}日 – {}月{}日",
            first.year(),
            first.month(),
            first.day(),
            last.month(),
            last.day()
        ),
        _ if first.month() == last.month() => format!(
            "{} {} – {}, {}",
            month_short(lang, first.month()),
            first.day(),
            last.day(),
            last.year()
        ),
        _ => format!(
            "{} {} – {} {}, {}",
            month_short(lang, first.month()),
            first.day(),
            month_short(lang, last.month()),
            last.day(),
            last.year()
        ),
    }
}

/// Short `M/D` label used in holiday lists.
pub fn short_date(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// Hour/minute label for a schedule slot.
pub fn time_label(format: TimeFormat, minutes_since_midnight: u32) -> String {
    let h = (minutes_since_midnight / 60) % 24;
    let m = minutes_since_midnight % 60;
    match format {
        TimeFormat::H24 => format!("{h:02}:{m:02}"),
        TimeFormat::H12 => {
            let suffix = if h < 12 { "AM" } else { "PM" };
            let h12 = match h % 12 {
                0 => 12,
                other => other,
            };
            if m == 0 {
                format!("{h12} {suffix}")
            } else {
                format!("{h12}:{m:02} {suffix}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_resolution() {
        assert_eq!(Lang::from_tag("ko-KR"), Lang::Ko);
        assert_eq!(Lang::from_tag("en_US"), Lang::En);
        assert_eq!(Lang::from_tag("xx"), Lang::En);
        assert_eq!(Lang::from_tag(""), Lang::En);
    }

    #[test]
    fn titles_per_language() {
        assert_eq!(month_title(Lang::En, 2024, 2), "February 2024");
        assert_eq!(month_title(Lang::Ko, 2024, 2), "2024년 2월");
        assert_eq!(month_title(Lang::Ja, 2024, 2), "2024年2月");
        assert_eq!(month_title(Lang::De, 2024, 3), "März 2024");
    }

    #[test]
    fn week_titles() {
        let a = NaiveDate::from_ymd_opt(2024, 2, 18).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 24).unwrap();
        assert_eq!(week_title(Lang::En, a, b), "Feb 18 – 24, 2024");
        let c = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(week_title(Lang::En, a, c), "Feb 18 – Mar 2, 2024");
    }

    #[test]
    fn time_labels() {
        assert_eq!(time_label(TimeFormat::H24, 8 * 60), "08:00");
        assert_eq!(time_label(TimeFormat::H12, 0), "12 AM");
        assert_eq!(time_label(TimeFormat::H12, 13 * 60 + 30), "1:30 PM");
    }

    #[test]
    fn weekday_labels_wrap() {
        assert_eq!(weekday_label(Lang::Ko, 0), "일");
        assert_eq!(weekday_label(Lang::En, 7), "Sun");
    }
}
