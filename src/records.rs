//! In-memory store of normalized courier performance records.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::metrics::Metric;
use crate::parser::SegmentTable;
use crate::segment::Segment;

/// Raw tables keyed by segment, as supplied by a [`crate::source::TableSource`].
pub type SegmentTables = BTreeMap<Segment, SegmentTable>;

/// One courier's metrics within one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub driver_id: String,
    pub full_name: String,
    pub segment: Segment,
    pub working_city: Option<String>,
    pub rank: Option<u32>,
    pub drivers_score: Option<f64>,
    /// Only metrics with a usable value are present.
    pub metrics: BTreeMap<Metric, f64>,
}

impl PerformanceRecord {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    /// `driver_id|segment`, unique across the store.
    pub fn selection_key(&self) -> String {
        format!("{}|{}", self.driver_id, self.segment)
    }
}

/// Every record of the current data snapshot, across all segments.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<PerformanceRecord>,
    metric_columns: BTreeSet<Metric>,
}

impl RecordStore {
    /// Builds the store from whatever segment tables are available.
    ///
    /// Rows are tagged with their segment and concatenated in segment order.
    /// Numeric cells that fail to parse become absent; the row is kept.
    /// No tables yields an empty store.
    pub fn load(tables: &SegmentTables) -> Self {
        let mut store = RecordStore::default();

        for (&segment, table) in tables {
            let columns = TableColumns::locate(table);
            store
                .metric_columns
                .extend(columns.metrics.iter().map(|(m, _)| *m));

            let mut absent_cells = 0usize;
            for row in 0..table.rows.len() {
                let (record, absent) = columns.read_row(table, row, segment);
                absent_cells += absent;
                store.records.push(record);
            }

            debug!(
                segment = %segment,
                rows = table.rows.len(),
                metric_columns = columns.metrics.len(),
                "Segment table loaded"
            );
            if absent_cells > 0 {
                warn!(segment = %segment, absent_cells, "Unparseable numeric cells marked absent");
            }
        }

        store
    }

    pub fn from_records(records: Vec<PerformanceRecord>) -> Self {
        let metric_columns = records
            .iter()
            .flat_map(|r| r.metrics.keys().copied())
            .collect();
        Self {
            records,
            metric_columns,
        }
    }

    pub fn records(&self) -> &[PerformanceRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Metric columns that appeared in any ingested table, in display order.
    pub fn metric_columns(&self) -> Vec<Metric> {
        self.metric_columns.iter().copied().collect()
    }

    /// Segments with at least one record, in segment order.
    pub fn segments(&self) -> Vec<Segment> {
        let present: BTreeSet<Segment> = self.records.iter().map(|r| r.segment).collect();
        present.into_iter().collect()
    }

    pub fn in_segment(&self, segment: Segment) -> impl Iterator<Item = &PerformanceRecord> {
        self.records.iter().filter(move |r| r.segment == segment)
    }

    /// Number of rows in the segment, including rows with an absent rank.
    pub fn segment_size(&self, segment: Segment) -> usize {
        self.in_segment(segment).count()
    }

    pub fn find_by_key(&self, key: &str) -> Option<&PerformanceRecord> {
        self.records.iter().find(|r| r.selection_key() == key)
    }
}

/// Column positions resolved once per table.
struct TableColumns {
    driver_id: Option<usize>,
    full_name: Option<usize>,
    working_city: Option<usize>,
    rank: Option<usize>,
    drivers_score: Option<usize>,
    metrics: Vec<(Metric, usize)>,
}

impl TableColumns {
    fn locate(table: &SegmentTable) -> Self {
        let metrics = table
            .headers
            .iter()
            .enumerate()
            .filter_map(|(idx, header)| Metric::from_column(header).map(|m| (m, idx)))
            .collect();

        Self {
            driver_id: table.column_index("driver_id"),
            full_name: table.column_index("full_name"),
            working_city: table.column_index("working_city"),
            rank: table.column_index("rank"),
            drivers_score: table.column_index("drivers_score"),
            metrics,
        }
    }

    /// Returns the record and how many non-empty numeric cells failed to parse.
    fn read_row(&self, table: &SegmentTable, row: usize, segment: Segment) -> (PerformanceRecord, usize) {
        let text = |col: Option<usize>| col.and_then(|idx| table.cell(row, idx)).unwrap_or("");
        let mut absent = 0usize;
        let mut number = |col: Option<usize>| {
            let raw = text(col);
            let value = coerce_number(raw);
            if value.is_none() && !raw.trim().is_empty() {
                absent += 1;
            }
            value
        };

        let rank = number(self.rank).and_then(coerce_rank);
        let drivers_score = number(self.drivers_score);

        let mut metrics = BTreeMap::new();
        for &(metric, idx) in &self.metrics {
            if let Some(value) = number(Some(idx)) {
                metrics.insert(metric, value);
            }
        }

        let working_city = Some(text(self.working_city).trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let record = PerformanceRecord {
            driver_id: normalize_identifier(text(self.driver_id)),
            full_name: text(self.full_name).trim().to_string(),
            segment,
            working_city,
            rank,
            drivers_score,
            metrics,
        };

        (record, absent)
    }
}

/// Parses a numeric cell. Empty, unparseable and non-finite values are absent.
pub fn coerce_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Ranks start at 1; fractional spreadsheet values are truncated.
fn coerce_rank(value: f64) -> Option<u32> {
    if value >= 1.0 && value <= u32::MAX as f64 {
        Some(value.trunc() as u32)
    } else {
        None
    }
}

/// Trims the identifier and drops a `.0` suffix left by spreadsheet exports.
pub fn normalize_identifier(raw: &str) -> String {
    let id = raw.trim();
    match id.strip_suffix(".0") {
        Some(int) if !int.is_empty() && int.chars().all(|c| c.is_ascii_digit()) => int.to_string(),
        _ => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;

    fn tables(entries: &[(Segment, &str)]) -> SegmentTables {
        entries
            .iter()
            .map(|(seg, csv)| (*seg, parse_table(csv.as_bytes()).unwrap()))
            .collect()
    }

    #[test]
    fn test_load_no_tables_is_empty() {
        let store = RecordStore::load(&SegmentTables::new());
        assert!(store.is_empty());
        assert!(store.segments().is_empty());
        assert!(store.metric_columns().is_empty());
    }

    #[test]
    fn test_load_tags_rows_with_segment() {
        let store = RecordStore::load(&tables(&[
            (Segment::HdBrno, "driver_id,full_name,rank,drivers_score\n1,A,1,90\n2,B,2,80\n"),
            (Segment::Ooh, "driver_id,full_name,rank,drivers_score\n3,C,1,70\n"),
        ]));

        assert_eq!(store.len(), 3);
        // segment order, not insertion order
        assert_eq!(store.records()[0].segment, Segment::Ooh);
        assert_eq!(store.segment_size(Segment::HdBrno), 2);
        assert_eq!(store.segment_size(Segment::HdPraha), 0);
        assert_eq!(store.segments(), vec![Segment::Ooh, Segment::HdBrno]);
    }

    #[test]
    fn test_unparseable_cells_become_absent_not_dropped() {
        let store = RecordStore::load(&tables(&[(
            Segment::Ooh,
            "driver_id,full_name,rank,drivers_score,Efektivita jízdy,Delivery Quality\n\
             1,A,x,n/a,12.5,\n",
        )]));

        let record = &store.records()[0];
        assert_eq!(record.rank, None);
        assert_eq!(record.drivers_score, None);
        assert_eq!(record.metric(Metric::RideEfficiency), Some(12.5));
        assert_eq!(record.metric(Metric::DeliveryQuality), None);
        assert_eq!(
            store.metric_columns(),
            vec![Metric::RideEfficiency, Metric::DeliveryQuality]
        );
    }

    #[test]
    fn test_rank_coercion() {
        assert_eq!(coerce_number(" 3.0 ").and_then(coerce_rank), Some(3));
        assert_eq!(coerce_rank(0.0), None);
        assert_eq!(coerce_rank(-2.0), None);
        assert_eq!(coerce_number("nan"), None);
        assert_eq!(coerce_number("inf"), None);
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier(" 12345.0 "), "12345");
        assert_eq!(normalize_identifier("12345"), "12345");
        assert_eq!(normalize_identifier("AB.0"), "AB.0");
        assert_eq!(normalize_identifier(".0"), ".0");
    }

    #[test]
    fn test_working_city_and_selection_key() {
        let store = RecordStore::load(&tables(&[(
            Segment::HdPraha,
            "driver_id,full_name,working_city,rank\n42,Jan Novák,Praha,1\n43,Eva,,2\n",
        )]));

        assert_eq!(store.records()[0].working_city.as_deref(), Some("Praha"));
        assert_eq!(store.records()[1].working_city, None);
        assert_eq!(store.records()[0].selection_key(), "42|HD Praha");
        assert!(store.find_by_key("43|HD Praha").is_some());
        assert!(store.find_by_key("43|OOH").is_none());
    }
}
