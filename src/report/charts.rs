use chrono::{Duration, NaiveDate};
use image::ImageEncoder;
use plotters::prelude::*;
use thiserror::Error;

use super::loader::ClimateRecord;

pub const CHART_WIDTH: u32 = 960;
pub const CHART_HEIGHT: u32 = 480;

const ORANGE: RGBColor = RGBColor(255, 140, 0);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const GRAY: RGBColor = RGBColor(105, 105, 105);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No rows to chart")]
    Empty,

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Failed to encode chart image: {0}")]
    Encode(String),
}

/// A rendered chart held entirely in memory.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Line chart of average, maximum, and minimum temperature per day.
pub fn temperature_chart(records: &[ClimateRecord]) -> Result<ChartImage, ChartError> {
    let mut points: Vec<(NaiveDate, f64, f64, f64)> = records
        .iter()
        .map(|r| (r.date, r.avg_temp, r.max_temp, r.min_temp))
        .collect();
    points.sort_by_key(|p| p.0);

    let x_range = date_axis(&points.iter().map(|p| p.0).collect::<Vec<_>>())?;
    let y_min = points.iter().map(|p| p.3).fold(f64::INFINITY, f64::min);
    let y_max = points.iter().map(|p| p.2).fold(f64::NEG_INFINITY, f64::max);
    let pad = ((y_max - y_min) * 0.1).max(1.0);

    let mut buffer = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Temperatuur per dag", ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, (y_min - pad)..(y_max + pad))
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .y_desc("°C")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.0, p.1)),
                ORANGE.stroke_width(2),
            ))
            .map_err(render_err)?
            .label("Gemiddeld")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ORANGE.stroke_width(2)));
        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.0, p.2)),
                RED.stroke_width(2),
            ))
            .map_err(render_err)?
            .label("Maximum")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.0, p.3)),
                BLUE.stroke_width(2),
            ))
            .map_err(render_err)?
            .label("Minimum")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;
        root.present().map_err(render_err)?;
    }

    encode_png(&buffer)
}

/// Bar chart of daily rainfall.
pub fn rainfall_chart(records: &[ClimateRecord]) -> Result<ChartImage, ChartError> {
    let mut points: Vec<(NaiveDate, f64)> =
        records.iter().map(|r| (r.date, r.rainfall)).collect();
    points.sort_by_key(|p| p.0);

    let x_range = date_axis(&points.iter().map(|p| p.0).collect::<Vec<_>>())?;
    let y_max = points
        .iter()
        .map(|p| p.1)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);

    let mut buffer = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Neerslag per dag", ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0.0..(y_max * 1.1))
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .y_desc("mm")
            .draw()
            .map_err(render_err)?;

        // One bar per day, spanning the day on the date axis
        chart
            .draw_series(points.iter().map(|&(date, value)| {
                Rectangle::new(
                    [(date, 0.0), (date + Duration::days(1), value)],
                    SKY_BLUE.filled(),
                )
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    encode_png(&buffer)
}

/// Line chart of daily wind speed.
pub fn wind_chart(records: &[ClimateRecord]) -> Result<ChartImage, ChartError> {
    let mut points: Vec<(NaiveDate, f64)> =
        records.iter().map(|r| (r.date, r.wind_speed)).collect();
    points.sort_by_key(|p| p.0);

    let x_range = date_axis(&points.iter().map(|p| p.0).collect::<Vec<_>>())?;
    let y_max = points
        .iter()
        .map(|p| p.1)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);

    let mut buffer = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Windsnelheid per dag", ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0.0..(y_max * 1.1))
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .y_desc("km/h")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                GRAY.stroke_width(2),
            ))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    encode_png(&buffer)
}

// A degenerate single-day span still needs a non-empty axis range.
fn date_axis(dates: &[NaiveDate]) -> Result<std::ops::Range<NaiveDate>, ChartError> {
    let min = dates.iter().min().copied().ok_or(ChartError::Empty)?;
    let max = dates.iter().max().copied().ok_or(ChartError::Empty)?;
    Ok(min..max + Duration::days(1))
}

fn render_err(e: impl std::fmt::Display) -> ChartError {
    ChartError::Render(e.to_string())
}

fn encode_png(rgb: &[u8]) -> Result<ChartImage, ChartError> {
    let mut png = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png);
    encoder
        .write_image(
            rgb,
            CHART_WIDTH,
            CHART_HEIGHT,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ChartError::Encode(e.to_string()))?;
    Ok(ChartImage {
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        png,
    })
}
