//! The fixed set of courier segments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named partition of couriers. Ranking and benchmarking never cross
/// segment boundaries.
///
/// Variants are declared in source-sheet order, which is also the order
/// records are concatenated in when the store is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "OOH")]
    Ooh,
    #[serde(rename = "HD Praha")]
    HdPraha,
    #[serde(rename = "HD Brno")]
    HdBrno,
    #[serde(rename = "HD Ostrava")]
    HdOstrava,
    #[serde(rename = "HD Olomouc")]
    HdOlomouc,
    #[serde(rename = "HD HK")]
    HdHk,
    #[serde(rename = "HD Plzen")]
    HdPlzen,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::Ooh,
        Segment::HdPraha,
        Segment::HdBrno,
        Segment::HdOstrava,
        Segment::HdOlomouc,
        Segment::HdHk,
        Segment::HdPlzen,
    ];

    /// Sheet name as it appears in the source workbook.
    pub fn name(self) -> &'static str {
        match self {
            Segment::Ooh => "OOH",
            Segment::HdPraha => "HD Praha",
            Segment::HdBrno => "HD Brno",
            Segment::HdOstrava => "HD Ostrava",
            Segment::HdOlomouc => "HD Olomouc",
            Segment::HdHk => "HD HK",
            Segment::HdPlzen => "HD Plzen",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Segment {
    type Err = anyhow::Error;

    /// Accepts the sheet name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Segment::ALL
            .into_iter()
            .find(|seg| seg.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("unknown segment '{}'", s))
    }
}
