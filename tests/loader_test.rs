// Tests for climate workbook loading: column validation, date parsing at
// load time, and bad-row skipping.

mod common;

use chrono::NaiveDate;
use climate_report_service::report::{load_climate_workbook, LoadError};
use common::{climate_row, write_workbook, Cell, CLIMATE_HEADERS};
use tempfile::TempDir;

#[test]
fn test_missing_workbook_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = load_climate_workbook(&dir.path().join("nonexistent.xlsx"));
    assert!(matches!(result, Err(LoadError::MissingFile(_))));
}

#[test]
fn test_missing_columns_are_fatal_and_named() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("klimaat.xlsx");

    write_workbook(
        &path,
        &[(
            "Sheet1",
            &["Date", "Name", "AVG_Temp", "Min_Temp", "Rainfall"],
            vec![],
        )],
    );

    match load_climate_workbook(&path) {
        Err(LoadError::MissingColumns(missing)) => {
            assert_eq!(missing, vec!["Max_TemP", "Wind_Snelheid", "Wind_Richting"]);
        }
        other => panic!("Expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn test_loads_records_with_parsed_dates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("klimaat.xlsx");

    write_workbook(
        &path,
        &[(
            "Sheet1",
            &CLIMATE_HEADERS,
            vec![
                climate_row("2025-01-05", "Paramaribo", 27.5, 31.0, 23.5, 4.2, 11.0, "NO"),
                climate_row("2025-01-06", "Zanderij", 26.0, 30.0, 22.0, 0.0, 9.5, "O"),
            ],
        )],
    );

    let records = load_climate_workbook(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].station, "Paramaribo");
    assert_eq!(
        records[0].date,
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    );
    assert_eq!(records[0].avg_temp, 27.5);
    assert_eq!(records[1].wind_direction, "O");
}

#[test]
fn test_rows_with_bad_date_or_missing_measurements_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("klimaat.xlsx");

    write_workbook(
        &path,
        &[(
            "Sheet1",
            &CLIMATE_HEADERS,
            vec![
                climate_row("2025-01-05", "Paramaribo", 27.5, 31.0, 23.5, 4.2, 11.0, "NO"),
                // unparseable date
                vec![
                    Cell::Text("geen datum"),
                    Cell::Text("Paramaribo"),
                    Cell::Num(27.0),
                    Cell::Num(30.0),
                    Cell::Num(23.0),
                    Cell::Num(1.0),
                    Cell::Num(10.0),
                    Cell::Text("NO"),
                ],
                // missing wind speed
                vec![
                    Cell::Text("2025-01-07"),
                    Cell::Text("Paramaribo"),
                    Cell::Num(27.0),
                    Cell::Num(30.0),
                    Cell::Num(23.0),
                    Cell::Num(1.0),
                    Cell::Empty,
                    Cell::Text("NO"),
                ],
            ],
        )],
    );

    let records = load_climate_workbook(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].date,
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    );
}

#[test]
fn test_blank_wind_direction_defaults_to_empty_string() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("klimaat.xlsx");

    write_workbook(
        &path,
        &[(
            "Sheet1",
            &CLIMATE_HEADERS,
            vec![vec![
                Cell::Text("2025-01-05"),
                Cell::Text("Paramaribo"),
                Cell::Num(27.5),
                Cell::Num(31.0),
                Cell::Num(23.5),
                Cell::Num(4.2),
                Cell::Num(11.0),
                Cell::Empty,
            ]],
        )],
    );

    let records = load_climate_workbook(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].wind_direction, "");
}
