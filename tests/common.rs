// Shared fixture builders for the integration tests.
//
// Fixtures are real .xlsx workbooks generated with rust_xlsxwriter so the
// production calamine code paths are exercised end to end.
#![allow(dead_code)]

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};

/// A fixture cell. Dates are written as ISO strings.
#[derive(Clone, Copy)]
pub enum Cell {
    Text(&'static str),
    Num(f64),
    Empty,
}

pub fn write_sheet(sheet: &mut Worksheet, headers: &[&str], rows: &[Vec<Cell>]) {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            let (row_no, col_no) = ((i + 1) as u32, col as u16);
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(row_no, col_no, *s).unwrap();
                }
                Cell::Num(n) => {
                    sheet.write_number(row_no, col_no, *n).unwrap();
                }
                Cell::Empty => {}
            }
        }
    }
}

/// Write a workbook with the given `(sheet name, headers, rows)` triples.
pub fn write_workbook(path: &Path, sheets: &[(&str, &[&str], Vec<Vec<Cell>>)]) {
    let mut workbook = Workbook::new();
    for (name, headers, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        write_sheet(sheet, headers, rows);
    }
    workbook.save(path).unwrap();
}

/// Header row of a valid rainfall sheet.
pub const RAINFALL_HEADERS: [&str; 4] = ["Date", "StationID", "Rainfall (mm)", "Rainfall Category"];

/// One valid rainfall row.
pub fn rain_row(
    date: &'static str,
    station: &'static str,
    mm: f64,
    category: &'static str,
) -> Vec<Cell> {
    vec![
        Cell::Text(date),
        Cell::Text(station),
        Cell::Num(mm),
        Cell::Text(category),
    ]
}

/// Header row of the climate workbook.
pub const CLIMATE_HEADERS: [&str; 8] = [
    "Date",
    "Name",
    "AVG_Temp",
    "Max_TemP",
    "Min_Temp",
    "Rainfall",
    "Wind_Snelheid",
    "Wind_Richting",
];

/// One valid climate row.
#[allow(clippy::too_many_arguments)]
pub fn climate_row(
    date: &'static str,
    station: &'static str,
    avg: f64,
    max: f64,
    min: f64,
    rain: f64,
    wind: f64,
    direction: &'static str,
) -> Vec<Cell> {
    vec![
        Cell::Text(date),
        Cell::Text(station),
        Cell::Num(avg),
        Cell::Num(max),
        Cell::Num(min),
        Cell::Num(rain),
        Cell::Num(wind),
        Cell::Text(direction),
    ]
}
