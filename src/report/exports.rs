use chrono::NaiveDate;
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument, PdfLayerReference};
use thiserror::Error;

use super::charts::ChartImage;
use super::filter::ClimateSummary;
use super::loader::{ClimateRecord, CLIMATE_COLUMNS};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV buffer: {0}")]
    CsvBuffer(String),

    #[error("Failed to build spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to assemble PDF report: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("Failed to decode chart image: {0}")]
    ChartImage(String),
}

/// Serialize the filtered view as UTF-8 CSV with the workbook's column names.
pub fn csv_export(records: &[ClimateRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::CsvBuffer(e.to_string()))
}

/// Write the filtered view to a single-sheet spreadsheet named `Klimaat`.
pub fn xlsx_export(records: &[ClimateRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Klimaat")?;

    for (col, header) in CLIMATE_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, record.date.format("%Y-%m-%d").to_string())?;
        sheet.write_string(row, 1, &record.station)?;
        sheet.write_number(row, 2, record.avg_temp)?;
        sheet.write_number(row, 3, record.max_temp)?;
        sheet.write_number(row, 4, record.min_temp)?;
        sheet.write_number(row, 5, record.rainfall)?;
        sheet.write_number(row, 6, record.wind_speed)?;
        sheet.write_string(row, 7, &record.wind_direction)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Everything the one-page report needs besides the charts themselves.
pub struct ReportContext<'a> {
    pub station: &'a str,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub summary: &'a ClimateSummary,
}

/// Assemble the single-page A4 report: title, period, summary metrics,
/// and the three charts stacked vertically.
pub fn pdf_report(
    ctx: &ReportContext<'_>,
    temperature: &ChartImage,
    rainfall: &ChartImage,
    wind: &ChartImage,
) -> Result<Vec<u8>, ExportError> {
    let title = format!("Klimaatrapport - {}", ctx.station);
    let (doc, page, layer) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "rapport");
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    layer.use_text(title, 14.0, Mm(20.0), Mm(280.0), &font);
    layer.use_text(
        format!("Periode: {} tot {}", ctx.from, ctx.to),
        11.0,
        Mm(20.0),
        Mm(273.0),
        &font,
    );
    layer.use_text(
        format!("Gemiddelde temperatuur: {:.1} °C", ctx.summary.mean_temp),
        11.0,
        Mm(20.0),
        Mm(266.0),
        &font,
    );
    layer.use_text(
        format!("Totale neerslag: {:.1} mm", ctx.summary.total_rainfall),
        11.0,
        Mm(20.0),
        Mm(260.0),
        &font,
    );
    layer.use_text(
        format!(
            "Gemiddelde windsnelheid: {:.1} km/h",
            ctx.summary.mean_wind_speed
        ),
        11.0,
        Mm(20.0),
        Mm(253.0),
        &font,
    );

    place_chart(&layer, temperature, Mm(170.0))?;
    place_chart(&layer, rainfall, Mm(85.0))?;
    place_chart(&layer, wind, Mm(5.0))?;

    Ok(doc.save_to_bytes()?)
}

// Charts are placed at a fixed 160 x 80 mm footprint, left-aligned with
// the text block.
fn place_chart(
    layer: &PdfLayerReference,
    chart: &ChartImage,
    bottom: Mm,
) -> Result<(), ExportError> {
    const DPI: f64 = 300.0;
    const TARGET_WIDTH_MM: f64 = 160.0;
    const TARGET_HEIGHT_MM: f64 = 80.0;

    let dynamic = printpdf::image_crate::load_from_memory(&chart.png)
        .map_err(|e| ExportError::ChartImage(e.to_string()))?;
    let image = Image::from_dynamic_image(&dynamic);

    let native_width_mm = f64::from(chart.width) * 25.4 / DPI;
    let native_height_mm = f64::from(chart.height) * 25.4 / DPI;
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(20.0)),
            translate_y: Some(bottom),
            scale_x: Some((TARGET_WIDTH_MM / native_width_mm) as f32),
            scale_y: Some((TARGET_HEIGHT_MM / native_height_mm) as f32),
            dpi: Some(DPI as f32),
            ..Default::default()
        },
    );
    Ok(())
}
