use chrono::NaiveDate;

use super::loader::ClimateRecord;

/// The user's date-range selection. Anything short of two endpoints is
/// `Incomplete` and yields an empty view rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeSelection {
    Range { from: NaiveDate, to: NaiveDate },
    Incomplete,
}

impl DateRangeSelection {
    pub fn from_endpoints(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        match (from, to) {
            (Some(from), Some(to)) => Self::Range { from, to },
            _ => Self::Incomplete,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Self::Range { from, to } => *from <= date && date <= *to,
            Self::Incomplete => false,
        }
    }
}

/// Select the rows matching the station and the inclusive date range.
///
/// Pure function over the loaded table: the view is recomputed from
/// scratch on every call and is always a subset of `records`.
pub fn filter_records(
    records: &[ClimateRecord],
    station: &str,
    range: &DateRangeSelection,
) -> Vec<ClimateRecord> {
    records
        .iter()
        .filter(|r| r.station == station && range.contains(r.date))
        .cloned()
        .collect()
}

/// Distinct station names in first-seen order.
pub fn station_names(records: &[ClimateRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        if !names.iter().any(|n| n == &record.station) {
            names.push(record.station.clone());
        }
    }
    names
}

/// Earliest and latest observation dates in the table.
pub fn date_bounds(records: &[ClimateRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let min = records.iter().map(|r| r.date).min()?;
    let max = records.iter().map(|r| r.date).max()?;
    Some((min, max))
}

/// Summary aggregates over a filtered view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSummary {
    pub mean_temp: f64,
    pub total_rainfall: f64,
    pub mean_wind_speed: f64,
}

/// Compute the summary aggregates; `None` for an empty view.
pub fn summarize(records: &[ClimateRecord]) -> Option<ClimateSummary> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    Some(ClimateSummary {
        mean_temp: records.iter().map(|r| r.avg_temp).sum::<f64>() / n,
        total_rainfall: records.iter().map(|r| r.rainfall).sum(),
        mean_wind_speed: records.iter().map(|r| r.wind_speed).sum::<f64>() / n,
    })
}
