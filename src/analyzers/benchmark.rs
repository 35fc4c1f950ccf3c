use std::collections::BTreeMap;
use tracing::debug;

use crate::analyzers::types::{BenchmarkSnapshot, Quartiles, SegmentBenchmarks};
use crate::analyzers::utility::{quantile_sorted, sorted};
use crate::metrics::BenchmarkColumn;
use crate::records::{PerformanceRecord, RecordStore};

/// Summarizes a set of values into P25/P50/P75. No values gives all zeros.
pub fn quartiles(values: &[f64]) -> Quartiles {
    let values = sorted(values);
    Quartiles {
        p25: quantile_sorted(&values, 0.25),
        p50: quantile_sorted(&values, 0.50),
        p75: quantile_sorted(&values, 0.75),
    }
}

/// Computes quartiles per segment for `drivers_score` and every metric
/// column the store saw.
///
/// A column with no usable values in a segment still gets a zero entry so
/// lookups downstream never miss.
pub fn compute(store: &RecordStore) -> BenchmarkSnapshot {
    let columns: Vec<BenchmarkColumn> = std::iter::once(BenchmarkColumn::DriversScore)
        .chain(store.metric_columns().into_iter().map(BenchmarkColumn::Metric))
        .collect();

    let mut segments = BTreeMap::new();

    for segment in store.segments() {
        let records: Vec<&PerformanceRecord> = store.in_segment(segment).collect();
        let mut benchmarks = SegmentBenchmarks::new();

        for &column in &columns {
            let values: Vec<f64> = records
                .iter()
                .filter_map(|r| column_value(r, column))
                .collect();
            benchmarks.insert(column, quartiles(&values));
        }

        debug!(
            segment = %segment,
            records = records.len(),
            columns = benchmarks.len(),
            "Segment benchmarks computed"
        );
        segments.insert(segment, benchmarks);
    }

    BenchmarkSnapshot { segments }
}

fn column_value(record: &PerformanceRecord, column: BenchmarkColumn) -> Option<f64> {
    match column {
        BenchmarkColumn::DriversScore => record.drivers_score,
        BenchmarkColumn::Metric(metric) => record.metric(metric),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metric;
    use crate::segment::Segment;
    use approx::assert_relative_eq;

    fn record(id: &str, segment: Segment, score: Option<f64>, metrics: &[(Metric, f64)]) -> PerformanceRecord {
        PerformanceRecord {
            driver_id: id.to_string(),
            full_name: format!("Driver {id}"),
            segment,
            working_city: None,
            rank: None,
            drivers_score: score,
            metrics: metrics.iter().copied().collect(),
        }
    }

    #[test]
    fn test_empty_store_gives_empty_snapshot() {
        let snapshot = compute(&RecordStore::default());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_quartiles_per_segment() {
        let store = RecordStore::from_records(vec![
            record("1", Segment::Ooh, Some(10.0), &[(Metric::RideEfficiency, 1.0)]),
            record("2", Segment::Ooh, Some(20.0), &[(Metric::RideEfficiency, 2.0)]),
            record("3", Segment::Ooh, Some(30.0), &[(Metric::RideEfficiency, 3.0)]),
            record("4", Segment::Ooh, Some(40.0), &[(Metric::RideEfficiency, 4.0)]),
            record("5", Segment::HdBrno, Some(99.0), &[]),
        ]);

        let snapshot = compute(&store);

        let score = snapshot.get(Segment::Ooh, BenchmarkColumn::DriversScore).unwrap();
        assert_relative_eq!(score.p25, 17.5);
        assert_relative_eq!(score.p50, 25.0);
        assert_relative_eq!(score.p75, 32.5);

        let brno = snapshot.get(Segment::HdBrno, BenchmarkColumn::DriversScore).unwrap();
        assert_eq!(brno, Quartiles { p25: 99.0, p50: 99.0, p75: 99.0 });
    }

    #[test]
    fn test_metric_without_values_gets_zero_benchmark() {
        let store = RecordStore::from_records(vec![
            record("1", Segment::Ooh, Some(50.0), &[(Metric::ArrivalDelay, 5.0)]),
            record("2", Segment::HdHk, Some(60.0), &[]),
        ]);

        let snapshot = compute(&store);

        assert_eq!(
            snapshot.get(Segment::HdHk, BenchmarkColumn::Metric(Metric::ArrivalDelay)),
            Some(Quartiles::default())
        );
        // columns never seen anywhere are not benchmarked
        assert_eq!(
            snapshot.get(Segment::HdHk, BenchmarkColumn::Metric(Metric::DoubledRides)),
            None
        );
    }

    #[test]
    fn test_absent_values_are_skipped() {
        let store = RecordStore::from_records(vec![
            record("1", Segment::Ooh, None, &[]),
            record("2", Segment::Ooh, Some(8.0), &[]),
        ]);

        let score = compute(&store)
            .get(Segment::Ooh, BenchmarkColumn::DriversScore)
            .unwrap();
        assert_eq!(score.p50, 8.0);
    }

    #[test]
    fn test_quartiles_are_monotonic() {
        let samples: [&[f64]; 4] = [
            &[5.0],
            &[3.0, -1.0],
            &[9.0, 1.0, 4.0, 4.0, 7.5, 0.2],
            &[100.0, 0.0, 50.0, 25.0, 75.0, 12.5, 87.5, 62.5, 37.5],
        ];
        for values in samples {
            let q = quartiles(values);
            assert!(q.p25 <= q.p50 && q.p50 <= q.p75, "{values:?} -> {q:?}");
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let store = RecordStore::from_records(vec![
            record("1", Segment::Ooh, Some(1.1), &[(Metric::DeliveryQuality, 0.91)]),
            record("2", Segment::Ooh, Some(2.3), &[(Metric::DeliveryQuality, 0.87)]),
            record("3", Segment::Ooh, Some(0.7), &[(Metric::DeliveryQuality, 0.99)]),
        ]);

        assert_eq!(compute(&store), compute(&store));
    }
}
