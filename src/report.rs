//! Everything shown for one selected courier, assembled from a snapshot.

use serde::Serialize;

use crate::analyzers::eligibility::{EligibilityTier, UNKNOWN_LABEL, better_than_pct, classify};
use crate::analyzers::insights::rank_insights;
use crate::analyzers::types::{InsightLists, Quartiles};
use crate::cache::Snapshot;
use crate::metrics::{BenchmarkColumn, Metric};
use crate::records::PerformanceRecord;
use crate::segment::Segment;

/// One column of the courier compared with the segment quartiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub column: BenchmarkColumn,
    /// Absent values are reported as 0 with `present = false`.
    pub value: f64,
    pub present: bool,
    pub benchmark: Quartiles,
    pub above_median: bool,
    /// Stored as a 0–1 fraction; render as a percentage.
    pub percent: bool,
}

impl Comparison {
    fn new(column: BenchmarkColumn, value: Option<f64>, benchmark: Quartiles) -> Self {
        let percent = match column {
            BenchmarkColumn::Metric(m) => m.stored_as_fraction(),
            BenchmarkColumn::DriversScore => false,
        };
        let v = value.unwrap_or(0.0);
        Self {
            column,
            value: v,
            present: value.is_some(),
            benchmark,
            above_median: v >= benchmark.p50,
            percent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Eligibility {
    pub tier: EligibilityTier,
    pub label: &'static str,
    pub badge: &'static str,
    pub better_than_pct: u8,
}

impl Eligibility {
    /// A record without a usable rank cannot be placed and is BOTTOM.
    pub fn for_rank(rank: Option<u32>, segment_size: usize) -> Self {
        let size = segment_size as i64;
        match rank {
            Some(rank) => {
                let (tier, label) = classify(rank as i64, size);
                Self {
                    tier,
                    label,
                    badge: tier.badge(),
                    better_than_pct: better_than_pct(rank as i64, size),
                }
            }
            None => Self {
                tier: EligibilityTier::Bottom,
                label: UNKNOWN_LABEL,
                badge: EligibilityTier::Bottom.badge(),
                better_than_pct: 0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverReport {
    pub driver_id: String,
    pub full_name: String,
    pub segment: Segment,
    pub working_city: Option<String>,
    pub rank: Option<u32>,
    pub segment_size: usize,
    pub drivers_score: Option<f64>,
    pub eligibility: Eligibility,
    /// Missing when the segment has no score benchmark.
    pub overall: Option<Comparison>,
    pub metrics: Vec<Comparison>,
    pub insights: InsightLists,
    pub summary: String,
}

impl DriverReport {
    pub fn build(snapshot: &Snapshot, record: &PerformanceRecord) -> Self {
        let segment = record.segment;
        let segment_size = snapshot.store.segment_size(segment);
        let benchmarks = snapshot.benchmarks.segment(segment);
        let metric_columns = snapshot.metric_columns();

        let eligibility = Eligibility::for_rank(record.rank, segment_size);
        let insights = rank_insights(record, benchmarks, &metric_columns);

        let overall = benchmarks
            .and_then(|b| b.get(&BenchmarkColumn::DriversScore))
            .map(|q| Comparison::new(BenchmarkColumn::DriversScore, record.drivers_score, *q));

        let metrics = metric_columns
            .iter()
            .map(|&m| {
                let column = BenchmarkColumn::Metric(m);
                let benchmark = benchmarks
                    .and_then(|b| b.get(&column))
                    .copied()
                    .unwrap_or_default();
                Comparison::new(column, record.metric(m), benchmark)
            })
            .collect();

        let summary = summary_line(
            eligibility.label,
            insights.strengths.first().map(|i| i.metric),
            insights.focus.first().map(|i| i.metric),
        );

        Self {
            driver_id: record.driver_id.clone(),
            full_name: record.full_name.clone(),
            segment,
            working_city: record.working_city.clone(),
            rank: record.rank,
            segment_size,
            drivers_score: record.drivers_score,
            eligibility,
            overall,
            metrics,
            insights,
            summary,
        }
    }
}

/// `"<label>. Nejsilnější v <metric>. Zlepšit: <metric>."`, skipping empty parts.
pub fn summary_line(label: &str, strongest: Option<Metric>, weakest: Option<Metric>) -> String {
    let mut parts = vec![format!("{label}.")];
    if let Some(m) = strongest {
        parts.push(format!("Nejsilnější v {m}."));
    }
    if let Some(m) = weakest {
        parts.push(format!("Zlepšit: {m}."));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordStore;
    use chrono::Utc;

    fn record(id: &str, rank: u32, score: f64, metrics: &[(Metric, f64)]) -> PerformanceRecord {
        PerformanceRecord {
            driver_id: id.to_string(),
            full_name: format!("Driver {id}"),
            segment: Segment::HdOstrava,
            working_city: Some("Ostrava".to_string()),
            rank: Some(rank),
            drivers_score: Some(score),
            metrics: metrics.iter().copied().collect(),
        }
    }

    fn snapshot() -> Snapshot {
        let store = RecordStore::from_records(vec![
            record("1", 1, 95.0, &[(Metric::RideEfficiency, 12.0), (Metric::DeliveryQuality, 0.98)]),
            record("2", 2, 80.0, &[(Metric::RideEfficiency, 10.0), (Metric::DeliveryQuality, 0.90)]),
            record("3", 3, 70.0, &[(Metric::RideEfficiency, 8.0)]),
            record("4", 4, 60.0, &[(Metric::RideEfficiency, 6.0), (Metric::DeliveryQuality, 0.70)]),
            record("5", 5, 50.0, &[(Metric::RideEfficiency, 4.0), (Metric::DeliveryQuality, 0.60)]),
        ]);
        Snapshot::build(store, Utc::now())
    }

    #[test]
    fn test_report_for_top_driver() {
        let snapshot = snapshot();
        let rec = &snapshot.store.records()[0];

        let report = DriverReport::build(&snapshot, rec);

        assert_eq!(report.segment_size, 5);
        assert_eq!(report.eligibility.tier, EligibilityTier::Top20);
        assert_eq!(report.eligibility.better_than_pct, 80);
        assert_eq!(report.overall.as_ref().unwrap().benchmark.p50, 70.0);
        assert!(report.overall.as_ref().unwrap().above_median);
        assert_eq!(report.metrics.len(), 2);
        assert_eq!(report.insights.strengths[0].metric, Metric::RideEfficiency);
        assert_eq!(
            report.summary,
            "Top 20 %: priority + rezervace. Nejsilnější v Efektivita jízdy. Zlepšit: Delivery Quality."
        );
    }

    #[test]
    fn test_absent_metric_reported_as_zero() {
        let snapshot = snapshot();
        let rec = &snapshot.store.records()[2];

        let report = DriverReport::build(&snapshot, rec);
        let dq = report
            .metrics
            .iter()
            .find(|c| c.column == BenchmarkColumn::Metric(Metric::DeliveryQuality))
            .unwrap();

        assert!(!dq.present);
        assert_eq!(dq.value, 0.0);
        assert!(dq.percent);
        assert!(!dq.above_median);
        // excluded from insights
        assert!(report.insights.strengths.iter().all(|i| i.metric != Metric::DeliveryQuality));
        assert_eq!(report.eligibility.tier, EligibilityTier::Bottom);
    }

    #[test]
    fn test_missing_rank_is_bottom_placeholder() {
        let e = Eligibility::for_rank(None, 10);
        assert_eq!(e.tier, EligibilityTier::Bottom);
        assert_eq!(e.label, UNKNOWN_LABEL);
        assert_eq!(e.better_than_pct, 0);
    }

    #[test]
    fn test_summary_line_parts() {
        assert_eq!(summary_line("Top 50 %: rezervace", None, None), "Top 50 %: rezervace.");
        assert_eq!(
            summary_line("—", None, Some(Metric::ArrivalDelay)),
            "—. Zlepšit: Zpoždění na příjezdu."
        );
    }
}
