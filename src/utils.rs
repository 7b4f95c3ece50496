use calamine::Data;
use chrono::NaiveDate;

/// Convert a spreadsheet cell to a calendar date, if it holds one.
///
/// Accepts ISO-formatted strings (`YYYY-MM-DD`), native Excel datetimes,
/// and raw Excel serial numbers. Anything else yields `None`.
pub fn cell_to_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        Data::DateTime(excel_date) => excel_date.as_datetime().map(|dt| dt.date()),
        Data::Float(f) => excel_serial_to_date(*f as i64),
        Data::Int(i) => excel_serial_to_date(*i),
        _ => None,
    }
}

// Excel serial dates count from 1899-12-30 (accounting for the 1900 leap bug)
fn excel_serial_to_date(days: i64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(chrono::Duration::days(days))
}

/// Render a cell as trimmed text; blank or empty cells yield `None`.
pub fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(excel_date) => excel_date
            .as_datetime()
            .map(|dt| dt.date().format("%Y-%m-%d").to_string()),
        _ => None,
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}

/// Extract a numeric measurement from a cell.
pub fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
