use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use climate_report_service::report::{
    csv_export, date_bounds, filter_records, load_climate_workbook, pdf_report, rainfall_chart,
    station_names, summarize, temperature_chart, wind_chart, xlsx_export, ClimateRecord,
    ClimateSummary, DateRangeSelection, ReportContext,
};

#[derive(Parser)]
#[command(name = "climate-report")]
#[command(
    about = "Filter a climate workbook by station and date range, then export charts and reports",
    long_about = "Filter a climate workbook by station and date range, then export charts and \
                  reports. With no export flag, every artifact (CSV, XLSX, PDF) is produced."
)]
struct Cli {
    /// Path to the single-sheet climate workbook
    #[arg(
        long,
        env = "CLIMATE_WORKBOOK",
        default_value = "data/Klimaatdata_Jan_Sep_2025.xlsx"
    )]
    workbook: PathBuf,

    /// Station name; prompts interactively when omitted
    #[arg(long)]
    station: Option<String>,

    /// Start of the date range (YYYY-MM-DD); defaults to the earliest date on file
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the date range (YYYY-MM-DD); defaults to the latest date on file
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Directory for export artifacts
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Export the filtered rows as CSV
    #[arg(long)]
    csv: bool,

    /// Export the filtered rows as a spreadsheet
    #[arg(long)]
    xlsx: bool,

    /// Export the one-page PDF report with embedded charts
    #[arg(long)]
    pdf: bool,

    /// Also write the three chart images as PNG files
    #[arg(long)]
    charts: bool,

    /// List the stations present in the workbook and exit
    #[arg(long)]
    list_stations: bool,
}

fn main() {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Report generation failed: {e}");
        eprintln!("❌ Report generation failed: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let records = load_climate_workbook(&cli.workbook)?;
    if records.is_empty() {
        println!("⚠️  The workbook contains no usable records.");
        return Ok(());
    }

    let stations = station_names(&records);
    if cli.list_stations {
        println!("Stations in {}:", cli.workbook.display());
        for station in &stations {
            println!("  {station}");
        }
        return Ok(());
    }

    let station = match &cli.station {
        Some(station) => station.clone(),
        None => prompt_station(&stations)?,
    };

    let selection = match (cli.from, cli.to) {
        (None, None) => {
            // date_bounds is Some here: records is non-empty
            let (from, to) = date_bounds(&records).ok_or("empty table")?;
            DateRangeSelection::Range { from, to }
        }
        (Some(from), Some(to)) => DateRangeSelection::Range { from, to },
        _ => {
            warn!("Date range selection has only one endpoint");
            println!("⚠️  Select a valid date range with two dates.");
            DateRangeSelection::Incomplete
        }
    };

    let view = filter_records(&records, &station, &selection);
    let Some(summary) = summarize(&view) else {
        println!("⚠️  No data available for this selection.");
        return Ok(());
    };
    let DateRangeSelection::Range { from, to } = selection else {
        // An incomplete selection always produced an empty view above
        unreachable!();
    };

    print_summary(&station, from, to, &view, &summary);

    let export_all = !(cli.csv || cli.xlsx || cli.pdf || cli.charts);
    fs::create_dir_all(&cli.out_dir)?;

    if cli.csv || export_all {
        let path = cli.out_dir.join(format!("{station}_klimaatdata.csv"));
        fs::write(&path, csv_export(&view)?)?;
        println!("📥 {}", path.display());
    }
    if cli.xlsx || export_all {
        let path = cli.out_dir.join(format!("{station}_klimaatdata.xlsx"));
        fs::write(&path, xlsx_export(&view)?)?;
        println!("📥 {}", path.display());
    }
    if cli.charts || cli.pdf || export_all {
        info!("Rendering charts for station {station}");
        let temperature = temperature_chart(&view)?;
        let rainfall = rainfall_chart(&view)?;
        let wind = wind_chart(&view)?;

        if cli.charts {
            for (suffix, chart) in [
                ("temp", &temperature),
                ("rain", &rainfall),
                ("wind", &wind),
            ] {
                let path = cli.out_dir.join(format!("{station}_{suffix}.png"));
                fs::write(&path, &chart.png)?;
                println!("📤 {}", path.display());
            }
        }
        if cli.pdf || export_all {
            let context = ReportContext {
                station: &station,
                from,
                to,
                summary: &summary,
            };
            let path = cli.out_dir.join(format!("{station}_klimaatrapport.pdf"));
            fs::write(&path, pdf_report(&context, &temperature, &rainfall, &wind)?)?;
            println!("📄 {}", path.display());
        }
    }

    Ok(())
}

fn prompt_station(stations: &[String]) -> Result<String, Box<dyn Error>> {
    println!("Available stations:");
    for (i, station) in stations.iter().enumerate() {
        println!("  {}: {}", i + 1, station);
    }
    println!("Select a station [1-{}]: ", stations.len());

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let choice: usize = input
        .trim()
        .parse()
        .map_err(|_| format!("Invalid selection: '{}'", input.trim()))?;

    choice
        .checked_sub(1)
        .and_then(|i| stations.get(i))
        .cloned()
        .ok_or_else(|| format!("Selection out of range: {choice}").into())
}

fn print_summary(
    station: &str,
    from: NaiveDate,
    to: NaiveDate,
    view: &[ClimateRecord],
    summary: &ClimateSummary,
) {
    println!("\n{}", "=".repeat(60));
    println!("Klimaat per station");
    println!("{}", "=".repeat(60));
    println!("Station:            {station}");
    println!("Periode:            {from} tot {to}");
    println!("Rijen:              {}", view.len());
    println!("{}", "-".repeat(60));
    println!("Gem. temperatuur:   {:.1} °C", summary.mean_temp);
    println!("Totale neerslag:    {:.1} mm", summary.total_rainfall);
    println!("Gem. windsnelheid:  {:.1} km/h", summary.mean_wind_speed);
    println!("{}", "=".repeat(60));
    println!();
}
