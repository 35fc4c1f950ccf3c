//! Metric columns tracked per courier.

use serde::{Serialize, Serializer};
use std::fmt;

/// Column holding the overall courier rating.
pub const DRIVERS_SCORE: &str = "drivers_score";

/// One named performance metric, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Metric {
    #[serde(rename = "Kvalita doručení")]
    DeliveryStandards,
    #[serde(rename = "Efektivita jízdy")]
    RideEfficiency,
    #[serde(rename = "Zdvojené/otočky")]
    DoubledRides,
    #[serde(rename = "Jízdy Po, Út, Pá")]
    PeakDayRides,
    #[serde(rename = "Zpoždění v jízdě")]
    InRideDelay,
    #[serde(rename = "Zpoždění na příjezdu")]
    ArrivalDelay,
    #[serde(rename = "Delivery Quality")]
    DeliveryQuality,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::DeliveryStandards,
        Metric::RideEfficiency,
        Metric::DoubledRides,
        Metric::PeakDayRides,
        Metric::InRideDelay,
        Metric::ArrivalDelay,
        Metric::DeliveryQuality,
    ];

    /// Column header in the source tables.
    pub fn column(self) -> &'static str {
        match self {
            Metric::DeliveryStandards => "Kvalita doručení",
            Metric::RideEfficiency => "Efektivita jízdy",
            Metric::DoubledRides => "Zdvojené/otočky",
            Metric::PeakDayRides => "Jízdy Po, Út, Pá",
            Metric::InRideDelay => "Zpoždění v jízdě",
            Metric::ArrivalDelay => "Zpoždění na příjezdu",
            Metric::DeliveryQuality => "Delivery Quality",
        }
    }

    /// Whether values are stored as 0–1 fractions and shown as percentages.
    pub fn stored_as_fraction(self) -> bool {
        matches!(self, Metric::DeliveryQuality)
    }

    pub fn from_column(header: &str) -> Option<Metric> {
        let header = header.trim();
        Metric::ALL.into_iter().find(|m| m.column() == header)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A benchmarked column: the overall score or one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BenchmarkColumn {
    DriversScore,
    Metric(Metric),
}

impl BenchmarkColumn {
    pub fn name(self) -> &'static str {
        match self {
            BenchmarkColumn::DriversScore => DRIVERS_SCORE,
            BenchmarkColumn::Metric(m) => m.column(),
        }
    }
}

impl fmt::Display for BenchmarkColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Serialized by column name so benchmark maps render as JSON objects.
impl Serialize for BenchmarkColumn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
