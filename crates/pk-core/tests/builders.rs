//! Integration tests: metadata → builder → composite.
//!
//! Exercises the full `pk-core` pipeline with fixture holiday data and
//! fixture metadata: defaults + overrides → build → inspect primitives.

use pk_core::builder::calendar_grid::build_calendar_grid;
use pk_core::builder::segments::normalize_segments;
use pk_core::builder::table::build_table;
use pk_core::calendar::month_grid;
use pk_core::metadata::{CalendarGridMetadata, HolidayMarkerStyle, TableMetadata, with_overrides};
use pk_core::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn us_holidays() -> StaticHolidays {
    StaticHolidays::from_json(include_str!("fixtures/holidays_us.json")).expect("fixture parses")
}

fn texts(c: &Composite) -> Vec<String> {
    c.texts().into_iter().map(str::to_string).collect()
}

// ─── Bounding box ────────────────────────────────────────────────────────

#[test]
fn every_kind_fills_exactly_its_size() {
    let provider = us_holidays();
    let ctx = BuildContext::new(&provider);
    let sizes = [(480.0, 420.0), (100.0, 80.0), (37.5, 999.0), (1.0, 1.0), (0.0, 0.0)];

    for kind in ElementKind::ALL {
        for (w, h) in sizes {
            let meta = ElementMetadata::defaults_for(kind, &json!({"size": {"width": w, "height": h}}));
            let c = build_element(&meta, &ctx);
            let b = c.content_bounds();
            assert_eq!((c.width, c.height), (w, h), "{} at {w}×{h}", kind.as_str());
            assert!(
                b.x0 >= -1e-6 && b.y0 >= -1e-6 && b.x1 <= w + 1e-6 && b.y1 <= h + 1e-6,
                "{} at {w}×{h} overflows: {b:?}",
                kind.as_str()
            );
            assert_eq!((b.width(), b.height()), (w, h), "{} frame missing", kind.as_str());
        }
    }
}

#[test]
fn negative_and_nan_sizes_are_clamped() {
    let meta = ElementMetadata::defaults_for(
        ElementKind::Table,
        &json!({"size": {"width": -50.0, "height": 120.0}}),
    );
    let c = build_element(&meta, &BuildContext::empty());
    assert_eq!((c.width, c.height), (0.0, 120.0));
}

// ─── Calendar scenario ───────────────────────────────────────────────────

#[test]
fn february_2024_grid_with_presidents_day() {
    let provider = us_holidays();
    let ctx = BuildContext::new(&provider);
    let meta: CalendarGridMetadata = with_overrides(
        CalendarGridMetadata::default(),
        &json!({"year": 2024, "month": 2, "startDay": 0, "country": "US"}),
    );

    let grid = month_grid(2024, 2, 0, false);
    assert_eq!(grid.rows, 5);
    assert_eq!(grid.slots.iter().filter(|s| s.in_month).count(), 29);

    let c = build_calendar_grid(&meta, &ctx);
    let entries: Vec<String> = texts(&c).into_iter().filter(|t| t.starts_with("2/")).collect();
    // Valentine's Day is flagged non-public in the fixture.
    assert_eq!(entries, vec!["2/19 Presidents' Day"]);
}

#[test]
fn six_week_layout_is_opt_in() {
    let grid = month_grid(2024, 2, 0, true);
    assert_eq!(grid.rows, 6);
    assert_eq!(grid.slots.len(), 42);
}

#[test]
fn local_names_follow_language() {
    let provider = us_holidays();
    let ctx = BuildContext::new(&provider);
    let meta = ElementMetadata::defaults_for(
        ElementKind::CalendarGrid,
        &json!({"year": 2024, "month": 2, "country": "KR", "language": "ko", "holidayListMaxItems": 2}),
    );
    let c = build_element(&meta, &ctx);
    let t = texts(&c);
    assert!(t.contains(&"2024년 2월".to_string()));
    let list: Vec<&String> = t.iter().filter(|s| s.starts_with("2/")).collect();
    assert_eq!(list, vec!["2/9 설날", "2/10 설날"]);
}

#[test]
fn every_marker_style_builds() {
    let provider = us_holidays();
    let ctx = BuildContext::new(&provider);
    for style in ["text", "dot", "square", "border", "triangle", "bar", "background"] {
        let meta = ElementMetadata::defaults_for(
            ElementKind::CalendarGrid,
            &json!({"year": 2024, "month": 2, "holidayMarkerStyle": style}),
        );
        let ElementMetadata::CalendarGrid(m) = &meta else {
            unreachable!()
        };
        let expected: HolidayMarkerStyle = serde_json::from_value(json!(style)).unwrap();
        assert_eq!(m.holiday_marker_style, expected);
        let c = build_element(&meta, &ctx);
        assert!(c.content_bounds().y1 <= 420.0 + 1e-6, "{style}");
    }
}

#[test]
fn week_strip_across_new_year() {
    let provider = us_holidays();
    let ctx = BuildContext::new(&provider);
    let meta = ElementMetadata::defaults_for(ElementKind::WeekStrip, &json!({"anchorDate": "2024-12-31"}));
    let c = build_element(&meta, &ctx);
    let t = texts(&c);
    assert!(t.contains(&"Dec 29 – Jan 4, 2025".to_string()));
    assert!(!t.contains(&"12/25 Christmas Day".to_string()));
    assert!(t.contains(&"1/1 New Year's Day".to_string()));
}

// ─── Table scenario ──────────────────────────────────────────────────────

#[test]
fn table_fixture_merges() {
    let overrides: Value = serde_json::from_str(include_str!("fixtures/table_merged.json")).unwrap();
    let meta: TableMetadata = with_overrides(TableMetadata::default(), &overrides);
    let c = build_table(&meta);

    let cells: Vec<(f64, f64, f64, f64)> = c
        .primitives()
        .skip(1)
        .filter_map(|p| match &p.shape {
            Shape::Rect(r) => Some((r.left, r.top, r.width, r.height)),
            _ => None,
        })
        .collect();
    assert_eq!(cells[0], (0.0, 0.0, 200.0, 200.0));
    // 9 cells − 3 covered by the only valid merge
    assert_eq!(cells.len(), 6);
    assert_eq!(texts(&c), vec!["Merged", "Q1", "Q2", "A", "B", "C"]);
}

// ─── Segments ────────────────────────────────────────────────────────────

#[test]
fn segments_always_sum_to_total() {
    let inputs: [&[f64]; 5] = [
        &[f64::NAN, 2.0, 3.0],
        &[-1.0, -2.0, -3.0],
        &[0.0, 0.0, 0.0],
        &[1e300, 1e300, 1e300],
        &[0.1, 0.2],
    ];
    for total in [0.0, 1.0, 333.33, 1e6] {
        for seg in inputs {
            let out = normalize_segments(total, 3, Some(seg));
            assert_eq!(out.len(), 3);
            assert!(out.iter().all(|v| v.is_finite() && *v >= 0.0));
            let sum: f64 = out.iter().sum();
            assert!((sum - total).abs() < 1e-6 * total.max(1.0), "{seg:?} @ {total}: {sum}");
        }
    }
}
