use crate::advice::{recommendation, why_it_matters};
use crate::analyzers::types::{Insight, InsightLists, SegmentBenchmarks};
use crate::metrics::{BenchmarkColumn, Metric};
use crate::records::PerformanceRecord;

const STRENGTH_COUNT: usize = 2;
const FOCUS_COUNT: usize = 3;

/// Ranks a courier's metrics by distance from the segment median.
///
/// Metrics absent on the record are skipped. A metric without a benchmark
/// entry is compared against a median of 0. Ties keep the order of
/// `metrics`, so the result is stable for identical inputs.
pub fn rank_insights(
    record: &PerformanceRecord,
    benchmarks: Option<&SegmentBenchmarks>,
    metrics: &[Metric],
) -> InsightLists {
    let mut ranked: Vec<Insight> = metrics
        .iter()
        .filter_map(|&metric| {
            let value = record.metric(metric)?;
            let benchmark = benchmarks
                .and_then(|b| b.get(&BenchmarkColumn::Metric(metric)))
                .copied()
                .unwrap_or_default();
            Some(Insight {
                metric,
                value,
                benchmark,
                delta_to_median: value - benchmark.p50,
                recommendation: recommendation(metric),
                why_it_matters: why_it_matters(metric),
            })
        })
        .collect();

    // stable: equal deltas stay in caller order
    ranked.sort_by(|a, b| b.delta_to_median.total_cmp(&a.delta_to_median));

    let strengths = ranked.iter().take(STRENGTH_COUNT).cloned().collect();
    let focus = ranked.iter().rev().take(FOCUS_COUNT).cloned().collect();

    InsightLists { strengths, focus }
}
