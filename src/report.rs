pub mod charts;
pub mod exports;
pub mod filter;
pub mod loader;

pub use charts::{rainfall_chart, temperature_chart, wind_chart, ChartError, ChartImage};
pub use exports::{csv_export, pdf_report, xlsx_export, ExportError, ReportContext};
pub use filter::{
    date_bounds, filter_records, station_names, summarize, ClimateSummary, DateRangeSelection,
};
pub use loader::{load_climate_workbook, ClimateRecord, LoadError, CLIMATE_COLUMNS};
