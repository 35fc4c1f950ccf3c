use serde::Serialize;

/// Reward-program tier derived from a courier's standing in their segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityTier {
    #[serde(rename = "TOP_20")]
    Top20,
    #[serde(rename = "TOP_50")]
    Top50,
    Bottom,
}

/// Label shown when the segment has no population to rank against.
pub const UNKNOWN_LABEL: &str = "—";

impl EligibilityTier {
    pub fn label(self) -> &'static str {
        match self {
            EligibilityTier::Top20 => "Top 20 %: priority + rezervace",
            EligibilityTier::Top50 => "Top 50 %: rezervace",
            EligibilityTier::Bottom => "Zatím bez rezervací/priorit",
        }
    }

    /// Short slug for badge styling.
    pub fn badge(self) -> &'static str {
        match self {
            EligibilityTier::Top20 => "top20",
            EligibilityTier::Top50 => "top50",
            EligibilityTier::Bottom => "bottom",
        }
    }
}

/// Maps a rank (1 = best) and segment size to a tier and its label.
///
/// | rank / size     | Tier   |
/// |-----------------|--------|
/// | <= 0.20         | TOP_20 |
/// | <= 0.50         | TOP_50 |
/// | > 0.50          | BOTTOM |
///
/// A segment size of zero or less classifies as BOTTOM with the
/// placeholder label.
pub fn classify(rank: i64, segment_size: i64) -> (EligibilityTier, &'static str) {
    if segment_size <= 0 {
        return (EligibilityTier::Bottom, UNKNOWN_LABEL);
    }

    let tier = match rank as f64 / segment_size as f64 {
        p if p <= 0.20 => EligibilityTier::Top20,
        p if p <= 0.50 => EligibilityTier::Top50,
        _ => EligibilityTier::Bottom,
    };
    (tier, tier.label())
}

/// Share of the segment this courier outranks, in whole percent.
pub fn better_than_pct(rank: i64, segment_size: i64) -> u8 {
    if segment_size <= 0 {
        return 0;
    }
    let pct = (segment_size as f64 - rank as f64) / segment_size as f64 * 100.0;
    pct.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(1, 100).0, EligibilityTier::Top20);
        assert_eq!(classify(20, 100).0, EligibilityTier::Top20);
        assert_eq!(classify(21, 100).0, EligibilityTier::Top50);
        assert_eq!(classify(50, 100).0, EligibilityTier::Top50);
        assert_eq!(classify(51, 100).0, EligibilityTier::Bottom);
        assert_eq!(classify(100, 100).0, EligibilityTier::Bottom);
    }

    #[test]
    fn test_classify_degenerate_segment() {
        assert_eq!(classify(5, 0), (EligibilityTier::Bottom, UNKNOWN_LABEL));
        assert_eq!(classify(1, -3), (EligibilityTier::Bottom, UNKNOWN_LABEL));
    }

    #[test]
    fn test_rank_beyond_segment_is_bottom() {
        assert_eq!(classify(150, 100).0, EligibilityTier::Bottom);
    }

    #[test]
    fn test_labels() {
        assert_eq!(classify(1, 10).1, "Top 20 %: priority + rezervace");
        assert_eq!(classify(5, 10).1, "Top 50 %: rezervace");
        assert_eq!(classify(6, 10).1, "Zatím bez rezervací/priorit");
    }

    #[test]
    fn test_better_than_pct() {
        assert_eq!(better_than_pct(1, 100), 99);
        assert_eq!(better_than_pct(100, 100), 0);
        assert_eq!(better_than_pct(2, 3), 33);
        assert_eq!(better_than_pct(5, 0), 0);
        assert_eq!(better_than_pct(150, 100), 0);
    }

    #[test]
    fn test_better_than_pct_extreme_ranks() {
        assert_eq!(better_than_pct(i64::MIN, 100), 100);
        assert_eq!(better_than_pct(i64::MAX, 100), 0);
        assert_eq!(better_than_pct(-5, i64::MAX), 100);
        assert_eq!(classify(i64::MIN, 10).0, EligibilityTier::Top20);
    }

    #[test]
    fn test_tier_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&EligibilityTier::Top20).unwrap(), "\"TOP_20\"");
        assert_eq!(serde_json::to_string(&EligibilityTier::Bottom).unwrap(), "\"BOTTOM\"");
    }
}
