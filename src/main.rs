//! CLI entry point for the driver scorecard.
//!
//! Provides subcommands for searching couriers, printing a courier's
//! scorecard report, and exporting per-segment benchmarks.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use driver_scorecard::{
    cache::{Snapshot, SnapshotCache},
    config::Settings,
    output::{benchmark_rows, print_pretty, render_report, to_json, write_benchmarks_csv},
    records::PerformanceRecord,
    report::DriverReport,
    search::{picklist_label, resolve_selection, search},
    segment::Segment,
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
#[command(name = "driver_scorecard")]
#[command(about = "Courier benchmarks, eligibility tiers and insights", long_about = None)]
struct Cli {
    /// Directory with one `<segment>.csv` export per segment
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL serving the same files, used when the directory is missing
    #[arg(long, global = true)]
    data_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find couriers by name or driver_id
    Search {
        /// Surname, full name or driver_id
        query: String,
    },
    /// Show one courier's scorecard
    Report {
        query: String,

        /// 1-based position in the match list when several couriers match
        #[arg(short, long)]
        pick: Option<usize>,

        /// Selection key `driver_id|segment` from an earlier run
        #[arg(short, long)]
        key: Option<String>,

        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print P25/P50/P75 per segment
    Benchmarks {
        /// Restrict to one segment (sheet name, e.g. "HD Praha")
        #[arg(short, long)]
        segment: Option<Segment>,

        /// CSV file to write the benchmarks to
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    if let Some(url) = cli.data_url {
        settings.data_url = Some(url);
    }

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&settings.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&settings.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("driver_scorecard.log"));

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

    let source = settings.table_source()?;
    info!(source = %source.describe(), freshness_secs = settings.freshness.num_seconds(), "Data source configured");

    let cache = SnapshotCache::new(source, settings.freshness);
    let snapshot = cache.get_or_refresh(Utc::now()).await;

    if snapshot.store.is_empty() {
        warn!("No courier data loaded");
        println!(
            "Data nenalezena. Umístěte exporty segmentů (např. \"HD Praha.csv\") do {} \
             nebo nastavte SCORECARD_DATA_URL na adresu, kde jsou soubory dostupné.",
            settings.data_dir.display()
        );
        return Ok(());
    }

    match cli.command {
        Commands::Search { query } => {
            let matches = search(&snapshot.store, &query);
            info!(query = %query, matches = matches.len(), "Search finished");
            if matches.is_empty() {
                println!("Žádný kurýr nevyhovuje hledání.");
            }
            for (i, record) in matches.iter().enumerate() {
                println!("{:>3}. {}", i + 1, picklist_label(record));
            }
        }
        Commands::Report {
            query,
            pick,
            key,
            json,
        } => {
            let matches = search(&snapshot.store, &query);
            info!(query = %query, matches = matches.len(), "Search finished");

            let selected = match pick {
                Some(n) => n.checked_sub(1).and_then(|i| matches.get(i).copied()),
                None => resolve_selection(&matches, key.as_deref()),
            };

            match selected {
                Some(record) => print_report(&snapshot, record, json)?,
                None if matches.is_empty() => println!("Žádný kurýr nevyhovuje hledání."),
                None => {
                    println!("Vyberte kurýra (--pick N nebo --key):");
                    for (i, record) in matches.iter().enumerate() {
                        println!(
                            "{:>3}. {}  [{}]",
                            i + 1,
                            picklist_label(record),
                            record.selection_key()
                        );
                    }
                }
            }
        }
        Commands::Benchmarks { segment, output } => {
            let rows = benchmark_rows(&snapshot.benchmarks, segment);
            for row in &rows {
                println!(
                    "{:<12} {:<24} P25 {:>10.2}  P50 {:>10.2}  P75 {:>10.2}",
                    row.segment.name(),
                    row.column,
                    row.p25,
                    row.p50,
                    row.p75
                );
            }
            if let Some(path) = output {
                write_benchmarks_csv(&path, &rows)?;
            }
        }
    }

    Ok(())
}

fn print_report(snapshot: &Snapshot, record: &PerformanceRecord, json: bool) -> Result<()> {
    let report = DriverReport::build(snapshot, record);
    print_pretty(&report);

    if json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}
