//! Data types produced by the scoring pipeline.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::metrics::{BenchmarkColumn, Metric};
use crate::segment::Segment;

/// Empirical quartiles of one column within one segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Quartiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Quartiles for every benchmarked column of one segment.
pub type SegmentBenchmarks = BTreeMap<BenchmarkColumn, Quartiles>;

/// Read-only benchmark snapshot: `segment -> column -> quartiles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchmarkSnapshot {
    pub(crate) segments: BTreeMap<Segment, SegmentBenchmarks>,
}

impl BenchmarkSnapshot {
    pub fn segment(&self, segment: Segment) -> Option<&SegmentBenchmarks> {
        self.segments.get(&segment)
    }

    pub fn get(&self, segment: Segment, column: BenchmarkColumn) -> Option<Quartiles> {
        self.segments.get(&segment)?.get(&column).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Segment, &SegmentBenchmarks)> {
        self.segments.iter().map(|(s, b)| (*s, b))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// One metric compared against its segment median.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub metric: Metric,
    pub value: f64,
    pub benchmark: Quartiles,
    pub delta_to_median: f64,
    pub recommendation: &'static str,
    pub why_it_matters: &'static str,
}

/// Ranked insight lists for one courier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightLists {
    /// Highest delta first.
    pub strengths: Vec<Insight>,
    /// Most negative delta first.
    pub focus: Vec<Insight>,
}
