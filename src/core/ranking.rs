//! Single-horse category ranking (単勝 / 複勝)
//!
//! Entries are ordered by ascending odds. Equal odds fall back to ascending
//! horse number so the output never depends on map iteration order.

use serde::{Deserialize, Serialize};

use crate::models::OddsMap;

/// Ranked rows for one category, as parallel sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedCategory {
    /// Odds formatted with two decimals, e.g. "1.40"
    pub odds: Vec<String>,
    /// Horse numbers zero-padded to two digits, e.g. "02"
    pub selections: Vec<String>,
    /// Keys that could not be read as horse numbers
    #[serde(skip)]
    pub skipped: usize,
}

impl RankedCategory {
    pub fn len(&self) -> usize {
        self.odds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.odds.is_empty()
    }
}

/// Format odds the way every grid row shows them
pub fn format_odds(odds: f64) -> String {
    format!("{:.2}", odds)
}

/// Format a horse number zero-padded to two digits
pub fn format_horse(horse: u32) -> String {
    format!("{:02}", horse)
}

/// Rank a single-horse odds map
///
/// `None` and empty maps both yield an empty result.
pub fn rank_category(odds: Option<&OddsMap>) -> RankedCategory {
    let Some(odds) = odds else {
        return RankedCategory::default();
    };

    let mut skipped = 0;
    let mut entries: Vec<(u32, f64)> = Vec::with_capacity(odds.len());
    for (key, &value) in odds {
        match key.trim().parse::<u32>() {
            Ok(horse) => entries.push((horse, value)),
            Err(_) => {
                tracing::warn!("Skipping malformed horse number {:?}", key);
                skipped += 1;
            }
        }
    }

    entries.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    tracing::debug!("Ranked {} entries ({} skipped)", entries.len(), skipped);

    RankedCategory {
        odds: entries.iter().map(|&(_, o)| format_odds(o)).collect(),
        selections: entries.iter().map(|&(h, _)| format_horse(h)).collect(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds_map(entries: &[(&str, f64)]) -> OddsMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_rank_ascending_with_tie_break() {
        let odds = odds_map(&[("5", 3.1), ("2", 1.4), ("9", 1.4)]);
        let ranked = rank_category(Some(&odds));
        assert_eq!(ranked.selections, vec!["02", "09", "05"]);
        assert_eq!(ranked.odds, vec!["1.40", "1.40", "3.10"]);
        assert_eq!(ranked.skipped, 0);
    }

    #[test]
    fn test_tie_break_is_numeric_not_lexicographic() {
        let odds = odds_map(&[("10", 5.0), ("9", 5.0), ("1", 5.0)]);
        let ranked = rank_category(Some(&odds));
        assert_eq!(ranked.selections, vec!["01", "09", "10"]);
    }

    #[test]
    fn test_zero_padded_keys_are_normalized() {
        let odds = odds_map(&[("07", 4.0), ("12", 2.25)]);
        let ranked = rank_category(Some(&odds));
        assert_eq!(ranked.selections, vec!["12", "07"]);
        assert_eq!(ranked.odds, vec!["2.25", "4.00"]);
    }

    #[test]
    fn test_absent_and_empty_maps() {
        assert!(rank_category(None).is_empty());
        let empty = OddsMap::new();
        let ranked = rank_category(Some(&empty));
        assert!(ranked.odds.is_empty());
        assert!(ranked.selections.is_empty());
    }

    #[test]
    fn test_malformed_keys_are_skipped() {
        let odds = odds_map(&[("1", 2.0), ("x", 1.0)]);
        let ranked = rank_category(Some(&odds));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked.selections, vec!["01"]);
        assert_eq!(ranked.skipped, 1);
    }

    #[test]
    fn test_format_odds_rounding() {
        assert_eq!(format_odds(1.0), "1.00");
        assert_eq!(format_odds(123.4), "123.40");
        assert_eq!(format_horse(3), "03");
        assert_eq!(format_horse(18), "18");
    }
}
