use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;
use tracing_subscriber::EnvFilter;

use climate_report_service::extractor::{ExtractError, ExtractOutcome, RainfallExtractor};

#[derive(Parser)]
#[command(name = "extract-rainfall")]
#[command(about = "Flatten a multi-sheet rainfall workbook into a recent-window CSV", long_about = None)]
struct Cli {
    /// Path to the multi-sheet rainfall workbook
    #[arg(
        long,
        env = "RAINFALL_WORKBOOK",
        default_value = "data/Rainfall_Data_Suriname_2025.xlsx"
    )]
    workbook: PathBuf,

    /// Destination path for the flattened CSV
    #[arg(
        long,
        env = "RAINFALL_OUTPUT",
        default_value = "data/tijdreeks-neerslag-data.csv"
    )]
    output: PathBuf,

    /// Keep only observations from the trailing window of this many days
    #[arg(long, env = "RECENCY_WINDOW_DAYS", default_value = "10")]
    window_days: i64,
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
        error!("Extraction failed: {e}");
        eprintln!("❌ Extraction failed: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), ExtractError> {
    let start = Instant::now();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Extracting {}...", cli.workbook.display()));

    let extractor = RainfallExtractor::new(&cli.workbook, &cli.output, cli.window_days);
    let outcome = extractor.run()?;

    if outcome.output_written {
        pb.finish_with_message(format!("✓ Extracted {} rows", outcome.rows_written));
        println!(
            "✅ CSV written to:\n{}",
            extractor.output_path().display()
        );
    } else {
        pb.finish_with_message("⚠️  No data found");
        println!(
            "⚠️  No observations within the last {} days; no output written.",
            cli.window_days
        );
    }

    print_summary(&outcome, start.elapsed());
    Ok(())
}

fn print_summary(outcome: &ExtractOutcome, elapsed: std::time::Duration) {
    println!("\n{}", "=".repeat(60));
    println!("Extraction Summary");
    println!("{}", "=".repeat(60));
    println!("Sheets Included:    {}", outcome.sheets_included);
    println!("Sheets Skipped:     {}", outcome.skipped_sheets.len());
    println!("Rows Written:       {}", outcome.rows_written);
    println!("Output Written:     {}", if outcome.output_written { "yes" } else { "no" });
    println!("{}", "-".repeat(60));
    println!("Total Time:         {:.2}s", elapsed.as_secs_f64());
    println!("{}", "=".repeat(60));

    if !outcome.skipped_sheets.is_empty() {
        println!("\nSkipped Sheets:");
        for skipped in &outcome.skipped_sheets {
            println!(
                "  {}: missing {}",
                skipped.name,
                skipped.missing_columns.join(", ")
            );
        }
    }

    println!();
}
