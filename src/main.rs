//! CLI entry point for the flight delay statistics tool.
//!
//! Loads and cleans a flight CSV once per invocation, optionally narrows it by
//! airline and airport, then runs the requested aggregation or export.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flight_delay_stats::{
    analyzers::DelayCategory,
    filter::FilterCriteria,
    output::{print_json, print_pretty, write_pivot_csv, write_summary_csv},
    pipeline::{
        Pipeline, run_aggregate, run_distribution, run_export, run_histogram, run_pivot,
        run_summary,
    },
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "flight_delay_stats")]
#[command(about = "Clean a flight-delay dataset and compute delay statistics", long_about = None)]
struct Cli {
    /// Flight CSV to load (defaults to $FLIGHT_DATA_PATH, then flights.csv)
    #[arg(short, long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Only keep flights operated by this airline
    #[arg(long, global = true)]
    airline: Option<String>,

    /// Only keep flights departing from or arriving at this airport
    #[arg(long, global = true)]
    airport: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an overview of the dataset
    Summary,
    /// Average delay per airline, highest first
    Averages,
    /// Mean, median, standard deviation and count per airline
    Trend,
    /// Export per-airline statistics to CSV
    Export {
        /// CSV file to write
        #[arg(short, long, default_value = "delay_summary.csv")]
        output: PathBuf,
    },
    /// List the first records that match the filters
    Filter {
        /// Number of records to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Mean delay by origin airport and airline
    Pivot {
        /// Optional CSV file to write the matrix to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delay histogram and delay bands
    Distribution {
        /// Number of equal-width bins
        #[arg(short, long, default_value_t = 50)]
        bins: usize,
    },
    /// Show what cleaning removed
    CleanReport {
        /// Print the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/flight_delay_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("flight_delay_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let data_path = cli.data.clone().unwrap_or_else(|| {
        std::env::var("FLIGHT_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("flights.csv"))
    });

    let pipeline = Pipeline::load(&data_path)
        .with_context(|| format!("loading {}", data_path.display()))?;
    for report in pipeline.stage_reports() {
        report.log();
    }

    let criteria = FilterCriteria::new(cli.airline, cli.airport);
    let records = if criteria.is_empty() {
        pipeline.records().to_vec()
    } else {
        pipeline.view(&criteria).logged()
    };

    match cli.command {
        Commands::Summary => {
            let Some(s) = run_summary(&records).logged() else {
                warn!("No records to summarize");
                return Ok(());
            };

            info!(
                total_records = s.total_records,
                airlines = %s.airlines.join(", "),
                airports = %s.airports.join(", "),
                "Dataset summary"
            );
            info!(
                average = %format!("{:.2}", s.mean_delay),
                median = %format!("{:.2}", s.median_delay),
                max = %format!("{:.2}", s.max_delay),
                on_time = s.on_time,
                on_time_pct = %format!("{:.1}", s.on_time_pct),
                delayed = s.delayed,
                delayed_pct = %format!("{:.1}", s.delayed_pct),
                cancelled = s.cancelled,
                "Delay statistics"
            );
        }
        Commands::Averages => {
            for row in run_aggregate(&records).logged() {
                info!(
                    airline = %row.airline,
                    avg_delay = %format!("{:.2}", row.mean),
                    "Average delay"
                );
            }
        }
        Commands::Trend => {
            for row in run_aggregate(&records).logged() {
                info!(
                    airline = %row.airline,
                    mean = %format!("{:.2}", row.mean),
                    median = %format!("{:.2}", row.median),
                    std = %row.std_dev.map(|s| format!("{s:.2}")).unwrap_or_default(),
                    count = row.count,
                    "Delay trend"
                );
            }
        }
        Commands::Export { output } => {
            let rows = run_aggregate(&records).logged();
            let table = run_export(&rows).logged();

            write_summary_csv(&output, &table)?;
            info!(path = %output.display(), rows = table.len(), "Statistics exported");
            print_json(&table)?;
        }
        Commands::Filter { limit } => {
            info!(matched = records.len(), "Filtered records");
            for r in records.iter().take(limit) {
                info!(
                    flight_id = %r.flight_id,
                    airline = %r.airline,
                    origin = r.origin.as_deref().unwrap_or("-"),
                    destination = r.destination.as_deref().unwrap_or("-"),
                    delay_minutes = r.delay_minutes,
                    category = DelayCategory::of(r.delay_minutes).label(),
                    "Flight"
                );
            }
        }
        Commands::Pivot { output } => {
            let matrix = run_pivot(&records).logged();

            for (origin, row) in matrix.origins.iter().zip(&matrix.mean_delay) {
                let cells: Vec<String> = matrix
                    .airlines
                    .iter()
                    .zip(row)
                    .map(|(airline, v)| format!("{airline}={v:.1}"))
                    .collect();
                info!(origin = %origin, delays = %cells.join(" "), "Mean delay by airline");
            }

            if let Some(path) = output {
                write_pivot_csv(&path, &matrix)?;
                info!(path = %path.display(), "Pivot exported");
            }
        }
        Commands::Distribution { bins } => {
            for bin in run_histogram(&records, bins).logged() {
                info!(
                    lower = %format!("{:.1}", bin.lower),
                    upper = %format!("{:.1}", bin.upper),
                    count = bin.count,
                    "Delay bin"
                );
            }

            for (airline, airline_bins) in run_distribution(&records, bins).logged() {
                for bin in airline_bins.iter().filter(|b| b.count > 0) {
                    info!(
                        airline = %airline,
                        lower = %format!("{:.1}", bin.lower),
                        upper = %format!("{:.1}", bin.upper),
                        count = bin.count,
                        "Airline delay bin"
                    );
                }
            }

            for row in run_aggregate(&records).logged() {
                info!(
                    airline = %row.airline,
                    on_time = row.categories.on_time,
                    moderate = row.categories.moderate,
                    high = row.categories.high,
                    "Delay bands"
                );
            }
        }
        Commands::CleanReport { json } => {
            let report = pipeline.cleaning_report();
            info!(
                input_rows = report.input_rows,
                duplicates = report.duplicates,
                missing_fields = report.missing_fields,
                non_numeric_delay = report.non_numeric_delay,
                negative_delay = report.negative_delay,
                same_endpoints = report.same_endpoints,
                output_rows = report.output_rows,
                "Cleaning report"
            );

            if json {
                print_json(report)?;
            } else {
                print_pretty(report);
            }
        }
    }

    Ok(())
}
