use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::utils::{cell_to_date, cell_to_f64, cell_to_text};

/// Columns the climate workbook must carry. The serde renames on
/// [`ClimateRecord`] keep exported files on these exact names.
pub const CLIMATE_COLUMNS: [&str; 8] = [
    "Date",
    "Name",
    "AVG_Temp",
    "Max_TemP",
    "Min_Temp",
    "Rainfall",
    "Wind_Snelheid",
    "Wind_Richting",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Workbook not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Workbook has no sheets")]
    NoSheets,

    #[error("Failed to read sheet '{sheet}': {msg}")]
    SheetRead { sheet: String, msg: String },

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// One daily observation for a station.
#[derive(Debug, Clone, Serialize)]
pub struct ClimateRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Name")]
    pub station: String,
    #[serde(rename = "AVG_Temp")]
    pub avg_temp: f64,
    #[serde(rename = "Max_TemP")]
    pub max_temp: f64,
    #[serde(rename = "Min_Temp")]
    pub min_temp: f64,
    #[serde(rename = "Rainfall")]
    pub rainfall: f64,
    #[serde(rename = "Wind_Snelheid")]
    pub wind_speed: f64,
    #[serde(rename = "Wind_Richting")]
    pub wind_direction: String,
}

/// Load the first sheet of the climate workbook into memory.
///
/// Dates are parsed once here; rows with an unparseable date, a blank
/// station name, or incomplete measurements are skipped so the filter,
/// charts, and aggregates only ever see complete records.
pub fn load_climate_workbook(path: &Path) -> Result<Vec<ClimateRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingFile(path.to_path_buf()));
    }

    let mut workbook: Xlsx<BufReader<File>> =
        open_workbook(path).map_err(|e: calamine::XlsxError| LoadError::WorkbookOpen(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::NoSheets)?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::SheetRead {
            sheet: sheet.clone(),
            msg: format!("{e:?}"),
        })?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| LoadError::MissingColumns(all_columns()))?;

    let mut indices = [0usize; 8];
    let mut missing = Vec::new();
    for (i, name) in CLIMATE_COLUMNS.iter().enumerate() {
        match header
            .iter()
            .position(|cell| matches!(cell, calamine::Data::String(s) if s.trim() == *name))
        {
            Some(idx) => indices[i] = idx,
            None => missing.push((*name).to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for (row_no, row) in rows.enumerate() {
        let Some(date) = row.get(indices[0]).and_then(cell_to_date) else {
            debug!("Row {}: unparseable date, skipping", row_no + 2);
            continue;
        };
        let Some(station) = row.get(indices[1]).and_then(cell_to_text) else {
            debug!("Row {}: blank station name, skipping", row_no + 2);
            continue;
        };
        let measurements = (
            row.get(indices[2]).and_then(cell_to_f64),
            row.get(indices[3]).and_then(cell_to_f64),
            row.get(indices[4]).and_then(cell_to_f64),
            row.get(indices[5]).and_then(cell_to_f64),
            row.get(indices[6]).and_then(cell_to_f64),
        );
        let (Some(avg_temp), Some(max_temp), Some(min_temp), Some(rainfall), Some(wind_speed)) =
            measurements
        else {
            debug!("Row {}: incomplete measurements, skipping", row_no + 2);
            continue;
        };
        let wind_direction = row
            .get(indices[7])
            .and_then(cell_to_text)
            .unwrap_or_default();

        records.push(ClimateRecord {
            date,
            station,
            avg_temp,
            max_temp,
            min_temp,
            rainfall,
            wind_speed,
            wind_direction,
        });
    }

    info!(
        "Loaded {} climate records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

fn all_columns() -> Vec<String> {
    CLIMATE_COLUMNS.iter().map(|c| c.to_string()).collect()
}
