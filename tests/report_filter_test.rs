// Tests for the filtered view and summary aggregates.

use chrono::NaiveDate;
use climate_report_service::report::{
    date_bounds, filter_records, station_names, summarize, ClimateRecord, DateRangeSelection,
};

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn record(date: &str, station: &str, avg_temp: f64, rainfall: f64, wind: f64) -> ClimateRecord {
    ClimateRecord {
        date: d(date),
        station: station.to_string(),
        avg_temp,
        max_temp: avg_temp + 4.0,
        min_temp: avg_temp - 4.0,
        rainfall,
        wind_speed: wind,
        wind_direction: "NO".to_string(),
    }
}

fn sample_table() -> Vec<ClimateRecord> {
    vec![
        record("2025-01-01", "Paramaribo", 27.0, 2.0, 10.0),
        record("2025-01-02", "Paramaribo", 28.0, 0.0, 12.0),
        record("2025-01-03", "Paramaribo", 26.5, 7.5, 9.0),
        record("2025-01-02", "Zanderij", 25.0, 1.0, 8.0),
        record("2025-02-01", "Paramaribo", 29.0, 0.0, 14.0),
    ]
}

#[test]
fn test_filter_matches_station_and_inclusive_range() {
    let table = sample_table();
    let range = DateRangeSelection::Range {
        from: d("2025-01-01"),
        to: d("2025-01-03"),
    };

    let view = filter_records(&table, "Paramaribo", &range);

    assert_eq!(view.len(), 3);
    assert!(view.iter().all(|r| r.station == "Paramaribo"));
    assert!(view
        .iter()
        .all(|r| d("2025-01-01") <= r.date && r.date <= d("2025-01-03")));
}

#[test]
fn test_filter_unknown_station_yields_empty_view() {
    let table = sample_table();
    let range = DateRangeSelection::Range {
        from: d("2025-01-01"),
        to: d("2025-12-31"),
    };
    assert!(filter_records(&table, "Nickerie", &range).is_empty());
}

#[test]
fn test_incomplete_selection_yields_empty_view() {
    let table = sample_table();
    let selection = DateRangeSelection::from_endpoints(Some(d("2025-01-01")), None);
    assert_eq!(selection, DateRangeSelection::Incomplete);
    assert!(filter_records(&table, "Paramaribo", &selection).is_empty());

    let selection = DateRangeSelection::from_endpoints(None, None);
    assert_eq!(selection, DateRangeSelection::Incomplete);
}

#[test]
fn test_inverted_range_yields_empty_view() {
    let table = sample_table();
    let range = DateRangeSelection::Range {
        from: d("2025-01-03"),
        to: d("2025-01-01"),
    };
    assert!(filter_records(&table, "Paramaribo", &range).is_empty());
}

#[test]
fn test_summary_mean_temperature() {
    let view = vec![
        record("2025-01-01", "Paramaribo", 20.0, 0.0, 10.0),
        record("2025-01-02", "Paramaribo", 22.0, 5.0, 10.0),
        record("2025-01-03", "Paramaribo", 24.0, 3.0, 10.0),
    ];

    let summary = summarize(&view).unwrap();
    assert!((summary.mean_temp - 22.0).abs() < 1e-9);
    assert!((summary.total_rainfall - 8.0).abs() < 1e-9);
    assert!((summary.mean_wind_speed - 10.0).abs() < 1e-9);
}

#[test]
fn test_summary_of_empty_view_is_none() {
    assert!(summarize(&[]).is_none());
}

#[test]
fn test_station_names_and_date_bounds() {
    let table = sample_table();
    assert_eq!(station_names(&table), vec!["Paramaribo", "Zanderij"]);
    assert_eq!(
        date_bounds(&table),
        Some((d("2025-01-01"), d("2025-02-01")))
    );
}

#[test]
fn test_filtered_view_is_subset_of_table() {
    let table = sample_table();
    let range = DateRangeSelection::Range {
        from: d("2025-01-02"),
        to: d("2025-02-01"),
    };

    let view = filter_records(&table, "Paramaribo", &range);
    for filtered in &view {
        assert!(table
            .iter()
            .any(|r| r.date == filtered.date && r.station == filtered.station));
    }
}
