use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::utils::{cell_to_date, cell_to_text};

/// Visible placeholder for cells with no usable value, distinct from an
/// empty string or a zero reading.
pub const MISSING_MARKER: &str = "⛔ geen data";

/// Columns a sheet must carry to be included in the extraction output.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Date", "StationID", "Rainfall (mm)", "Rainfall Category"];

const OUTPUT_HEADER: [&str; 5] = [
    "Date",
    "StationID",
    "Rainfall (mm)",
    "Rainfall Category",
    "Sheet",
];

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Workbook not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Failed to read sheet '{sheet}': {msg}")]
    SheetRead { sheet: String, msg: String },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write output CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Result of parsing a date cell: the tag survives into the row so the
/// recency filter acts on the parse outcome, not on a thrown error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCell {
    Valid(NaiveDate),
    Missing,
}

/// One surviving observation, tagged with its source sheet.
#[derive(Debug, Clone)]
pub struct ObservationRow {
    pub date: DateCell,
    pub station_id: Option<String>,
    pub rainfall_mm: Option<String>,
    pub rainfall_category: Option<String>,
    pub sheet: String,
}

/// A sheet excluded from the run, with exactly the columns it lacked.
#[derive(Debug, Clone)]
pub struct SkippedSheet {
    pub name: String,
    pub missing_columns: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ExtractOutcome {
    pub rows_written: usize,
    pub sheets_included: usize,
    pub skipped_sheets: Vec<SkippedSheet>,
    pub output_written: bool,
}

enum SheetResult {
    Rows(Vec<ObservationRow>),
    MissingColumns(Vec<String>),
}

/// Flattens a multi-sheet rainfall workbook into a single recent-window CSV.
pub struct RainfallExtractor {
    workbook_path: PathBuf,
    output_path: PathBuf,
    window_days: i64,
}

impl RainfallExtractor {
    pub fn new(
        workbook_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        window_days: i64,
    ) -> Self {
        Self {
            workbook_path: workbook_path.into(),
            output_path: output_path.into(),
            window_days,
        }
    }

    /// Run the extraction with the cutoff taken from the local clock.
    ///
    /// The cutoff is computed once here and applied uniformly to every
    /// sheet, so one run is internally consistent.
    pub fn run(&self) -> Result<ExtractOutcome, ExtractError> {
        let cutoff = Local::now().date_naive() - chrono::Duration::days(self.window_days);
        self.run_with_cutoff(cutoff)
    }

    /// Run the extraction against an explicit recency cutoff.
    pub fn run_with_cutoff(&self, cutoff: NaiveDate) -> Result<ExtractOutcome, ExtractError> {
        if !self.workbook_path.exists() {
            return Err(ExtractError::MissingFile(self.workbook_path.clone()));
        }

        let mut workbook: Xlsx<BufReader<File>> = open_workbook(&self.workbook_path)
            .map_err(|e: calamine::XlsxError| ExtractError::WorkbookOpen(e.to_string()))?;

        info!(
            "Extracting observations on or after {} from {}",
            cutoff,
            self.workbook_path.display()
        );

        let mut outcome = ExtractOutcome::default();
        let mut rows: Vec<ObservationRow> = Vec::new();

        for sheet_name in workbook.sheet_names() {
            let range =
                workbook
                    .worksheet_range(&sheet_name)
                    .map_err(|e| ExtractError::SheetRead {
                        sheet: sheet_name.clone(),
                        msg: format!("{e:?}"),
                    })?;

            match extract_sheet(&sheet_name, &range, cutoff) {
                SheetResult::Rows(mut sheet_rows) => {
                    debug!(
                        "Sheet '{}' contributed {} rows within the window",
                        sheet_name,
                        sheet_rows.len()
                    );
                    outcome.sheets_included += 1;
                    rows.append(&mut sheet_rows);
                }
                SheetResult::MissingColumns(missing) => {
                    warn!(
                        "Sheet '{}' skipped, missing columns: {:?}",
                        sheet_name, missing
                    );
                    outcome.skipped_sheets.push(SkippedSheet {
                        name: sheet_name.clone(),
                        missing_columns: missing,
                    });
                }
            }
        }

        if rows.is_empty() {
            warn!(
                "No observations within the last {} days; no output written",
                self.window_days
            );
            return Ok(outcome);
        }

        self.write_output(&rows)?;
        outcome.rows_written = rows.len();
        outcome.output_written = true;
        info!(
            "Wrote {} rows to {}",
            rows.len(),
            self.output_path.display()
        );

        Ok(outcome)
    }

    fn write_output(&self, rows: &[ObservationRow]) -> Result<(), ExtractError> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.output_path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(OUTPUT_HEADER)?;

        for row in rows {
            let date = match row.date {
                DateCell::Valid(d) => d.format("%Y-%m-%d").to_string(),
                DateCell::Missing => MISSING_MARKER.to_string(),
            };
            writer.write_record([
                date.as_str(),
                row.station_id.as_deref().unwrap_or(MISSING_MARKER),
                row.rainfall_mm.as_deref().unwrap_or(MISSING_MARKER),
                row.rainfall_category.as_deref().unwrap_or(MISSING_MARKER),
                row.sheet.as_str(),
            ])?;
        }

        writer.flush().map_err(ExtractError::Io)?;
        Ok(())
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

fn extract_sheet(sheet: &str, range: &Range<Data>, cutoff: NaiveDate) -> SheetResult {
    let mut rows_iter = range.rows();

    let Some(header) = rows_iter.next() else {
        // An empty sheet carries none of the required columns
        return SheetResult::MissingColumns(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        );
    };

    let mut indices = [0usize; 4];
    let mut missing = Vec::new();
    for (i, name) in REQUIRED_COLUMNS.iter().enumerate() {
        match header
            .iter()
            .position(|cell| matches!(cell, Data::String(s) if s.trim() == *name))
        {
            Some(idx) => indices[i] = idx,
            None => missing.push((*name).to_string()),
        }
    }
    if !missing.is_empty() {
        return SheetResult::MissingColumns(missing);
    }
    let [date_idx, station_idx, rainfall_idx, category_idx] = indices;

    let mut out = Vec::new();
    for row in rows_iter {
        let date = match row.get(date_idx).and_then(cell_to_date) {
            Some(d) => DateCell::Valid(d),
            None => DateCell::Missing,
        };

        // A missing date can never satisfy the cutoff
        let DateCell::Valid(d) = date else { continue };
        if d < cutoff {
            continue;
        }

        out.push(ObservationRow {
            date,
            station_id: row.get(station_idx).and_then(cell_to_text),
            rainfall_mm: row.get(rainfall_idx).and_then(cell_to_text),
            rainfall_category: row.get(category_idx).and_then(cell_to_text),
            sheet: sheet.to_string(),
        });
    }

    SheetResult::Rows(out)
}
