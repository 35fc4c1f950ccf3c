//! Output formatting and persistence for reports and benchmarks.
//!
//! Supports plain-text rendering, JSON serialization, and CSV export.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::{BenchmarkSnapshot, Insight};
use crate::report::{Comparison, DriverReport};
use crate::segment::Segment;

/// Scales fraction-stored values to percent. Returns the value and its suffix.
pub fn display_value(value: f64, percent: bool) -> (f64, &'static str) {
    if percent {
        (value * 100.0, " %")
    } else {
        (value, "")
    }
}

fn fmt_value(value: f64, percent: bool, decimals: usize) -> String {
    let (v, suffix) = display_value(value, percent);
    format!("{v:.decimals$}{suffix}")
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &DriverReport) {
    debug!("{:#?}", report);
}

/// Serializes any output type as pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Plain-text rendering of a courier report.
pub fn render_report(report: &DriverReport) -> String {
    let mut out = String::new();
    let rank = report
        .rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "—".to_string());
    let score = report
        .drivers_score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "—".to_string());

    let _ = writeln!(out, "{} | ID: {} | {}", report.full_name, report.driver_id, report.segment);
    let _ = writeln!(
        out,
        "Pořadí: {rank} / {} | Celkové hodnocení kurýra: {score} | {}",
        report.segment_size, report.eligibility.label
    );
    let _ = writeln!(
        out,
        "Lepší než {} % kurýrů v segmentu",
        report.eligibility.better_than_pct
    );
    let _ = writeln!(out, "{}", report.summary);

    let _ = writeln!(out, "\nMetriky: hodnota kurýra vs medián (P25, medián, P75)");
    if let Some(overall) = &report.overall {
        render_comparison(&mut out, "Celkové hodnocení kurýra", overall);
    }
    for comparison in &report.metrics {
        render_comparison(&mut out, comparison.column.name(), comparison);
    }

    let _ = writeln!(out, "\nSilné stránky");
    if report.insights.strengths.is_empty() {
        let _ = writeln!(out, "  Žádné výrazné silné stránky proti mediánu.");
    }
    for insight in &report.insights.strengths {
        render_insight(&mut out, insight, false);
    }

    let _ = writeln!(out, "\nDoporučení (na co se zaměřit)");
    if report.insights.focus.is_empty() {
        let _ = writeln!(out, "  Všechny metriky na úrovni nebo nad mediánem.");
    }
    for insight in &report.insights.focus {
        render_insight(&mut out, insight, true);
    }

    out
}

fn render_comparison(out: &mut String, name: &str, c: &Comparison) {
    let status = if c.above_median {
        "Nad mediánem"
    } else {
        "Pod mediánem"
    };
    let _ = writeln!(
        out,
        "  {name}: {} (P25 {} · medián {} · P75 {}) {status}",
        fmt_value(c.value, c.percent, 1),
        fmt_value(c.benchmark.p25, c.percent, 1),
        fmt_value(c.benchmark.p50, c.percent, 1),
        fmt_value(c.benchmark.p75, c.percent, 1),
    );
}

fn render_insight(out: &mut String, insight: &Insight, focus: bool) {
    let percent = insight.metric.stored_as_fraction();
    let _ = writeln!(out, "  {}", insight.metric);
    if focus {
        let _ = writeln!(
            out,
            "    Kurýr: {} · medián: {} · lepší kvartil: {}",
            fmt_value(insight.value, percent, 2),
            fmt_value(insight.benchmark.p50, percent, 2),
            fmt_value(insight.benchmark.p75, percent, 2),
        );
    } else {
        let _ = writeln!(
            out,
            "    Kurýr: {} · medián: {}",
            fmt_value(insight.value, percent, 2),
            fmt_value(insight.benchmark.p50, percent, 2),
        );
    }
    let _ = writeln!(out, "    {}", insight.recommendation);
    if focus {
        let _ = writeln!(out, "    {}", insight.why_it_matters);
    }
}

/// One flattened benchmark entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRow {
    pub segment: Segment,
    pub column: &'static str,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Flattens the snapshot, optionally restricted to one segment.
pub fn benchmark_rows(benchmarks: &BenchmarkSnapshot, only: Option<Segment>) -> Vec<BenchmarkRow> {
    benchmarks
        .iter()
        .filter(|(segment, _)| only.is_none_or(|s| s == *segment))
        .flat_map(|(segment, columns)| {
            columns.iter().map(move |(column, q)| BenchmarkRow {
                segment,
                column: column.name(),
                p25: q.p25,
                p50: q.p50,
                p75: q.p75,
            })
        })
        .collect()
}

/// Writes benchmark rows to a CSV file, replacing any existing file.
pub fn write_benchmarks_csv(path: &str, rows: &[BenchmarkRow]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing benchmark CSV");

    let file = File::create(Path::new(path)).with_context(|| format!("creating {path}"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path, rows = rows.len(), "Benchmark CSV written");
    Ok(())
}
