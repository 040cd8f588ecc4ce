//! Quinella (馬連) axis selection
//!
//! The two lowest-odds combinations form the top pair. The horse they share
//! becomes the axis (軸); every other combination containing the axis is then
//! ranked behind the top pair.
//!
//! Ordering is by ascending odds, ties broken by canonical form ("min-max")
//! compared as a string.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::ranking::format_odds;
use crate::models::OddsMap;

/// Canonical "min-max" form of a horse pair
///
/// ```
/// use keiba::core::quinella::canonical_form;
/// assert_eq!(canonical_form(7, 3), "3-7");
/// assert_eq!(canonical_form(3, 7), "3-7");
/// ```
pub fn canonical_form(horse1: u32, horse2: u32) -> String {
    format!("{}-{}", horse1.min(horse2), horse1.max(horse2))
}

/// Unordered horse pair with its odds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    /// Smaller horse number
    pub low: u32,
    /// Larger horse number
    pub high: u32,
    pub odds: f64,
}

impl Combination {
    pub fn new(horse1: u32, horse2: u32, odds: f64) -> Self {
        Self {
            low: horse1.min(horse2),
            high: horse1.max(horse2),
            odds,
        }
    }

    /// Parse a quinella key such as "01,05" (or "1-5")
    ///
    /// Returns `None` unless the key names two distinct positive horse numbers.
    pub fn parse(key: &str, odds: f64) -> Option<Self> {
        let mut parts = key.split([',', '-']);
        let first: u32 = parts.next()?.trim().parse().ok()?;
        let second: u32 = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() || first == 0 || second == 0 || first == second {
            return None;
        }
        Some(Self::new(first, second, odds))
    }

    pub fn canonical(&self) -> String {
        canonical_form(self.low, self.high)
    }

    pub fn contains(&self, horse: u32) -> bool {
        self.low == horse || self.high == horse
    }

    /// Horse numbers present in both combinations, ascending
    pub fn shared_horses(&self, other: &Combination) -> Vec<u32> {
        let mut shared: Vec<u32> = [self.low, self.high]
            .into_iter()
            .filter(|&h| other.contains(h))
            .collect();
        shared.sort_unstable();
        shared.dedup();
        shared
    }
}

fn by_odds_then_canonical(a: &Combination, b: &Combination) -> Ordering {
    a.odds
        .total_cmp(&b.odds)
        .then_with(|| a.canonical().cmp(&b.canonical()))
}

/// Result of the axis selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuinellaSelection {
    /// Two lowest-odds combinations, or empty
    pub top_pair: Vec<Combination>,
    /// Other combinations containing the axis, ascending odds
    pub remainder: Vec<Combination>,
    /// Axis horse, when a top pair exists
    pub axis: Option<u32>,
    /// Keys that could not be parsed into a combination
    #[serde(skip)]
    pub skipped: usize,
}

impl QuinellaSelection {
    /// Top pair followed by the remainder
    pub fn ranked(&self) -> impl Iterator<Item = &Combination> {
        self.top_pair.iter().chain(self.remainder.iter())
    }

    /// Odds row: formatted odds of the ranked combinations
    pub fn odds_row(&self) -> Vec<String> {
        self.ranked().map(|c| format_odds(c.odds)).collect()
    }

    /// Selection row: canonical forms of the ranked combinations
    pub fn selection_row(&self) -> Vec<String> {
        self.ranked().map(Combination::canonical).collect()
    }
}

/// Parse every key, skipping malformed ones, sorted by odds then canonical form
pub fn sorted_combinations(odds: &OddsMap) -> (Vec<Combination>, usize) {
    let mut skipped = 0;
    let mut combinations: Vec<Combination> = Vec::with_capacity(odds.len());

    for (key, &value) in odds {
        match Combination::parse(key, value) {
            Some(combination) => combinations.push(combination),
            None => {
                tracing::warn!("Skipping malformed quinella key {:?}", key);
                skipped += 1;
            }
        }
    }

    combinations.sort_by(by_odds_then_canonical);
    (combinations, skipped)
}

/// Select the top pair, axis horse and axis-bearing remainder
pub fn select_quinella(odds: Option<&OddsMap>) -> QuinellaSelection {
    let Some(odds) = odds else {
        return QuinellaSelection::default();
    };

    let (combinations, skipped) = sorted_combinations(odds);
    if skipped > 0 {
        tracing::warn!("{} quinella keys skipped", skipped);
    }

    if combinations.len() < 2 {
        return QuinellaSelection {
            skipped,
            ..Default::default()
        };
    }

    let top_pair: Vec<Combination> = combinations[..2].to_vec();
    let axis = top_pair[0]
        .shared_horses(&top_pair[1])
        .first()
        .copied()
        .unwrap_or(top_pair[0].low);

    let top_keys: Vec<String> = top_pair.iter().map(Combination::canonical).collect();
    let remainder: Vec<Combination> = combinations[2..]
        .iter()
        .filter(|c| c.contains(axis) && !top_keys.contains(&c.canonical()))
        .cloned()
        .collect();

    tracing::debug!(
        "Quinella axis {} with {} remaining combinations",
        axis,
        remainder.len()
    );

    QuinellaSelection {
        top_pair,
        remainder,
        axis: Some(axis),
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
    fn test_canonical_form_order_independent() {
        assert_eq!(canonical_form(7, 3), "3-7");
        assert_eq!(canonical_form(3, 7), "3-7");
        assert_eq!(canonical_form(1, 15), "1-15");
    }

    #[test]
    fn test_parse_combination_keys() {
        let c = Combination::parse("05,01", 3.0).unwrap();
        assert_eq!((c.low, c.high), (1, 5));
        assert_eq!(c.canonical(), "1-5");
        assert!(Combination::parse("1-12", 3.0).is_some());
        assert!(Combination::parse(" 3 , 4 ", 3.0).is_some());
    }

    #[test]
    fn test_parse_malformed_keys() {
        assert!(Combination::parse("1", 1.0).is_none());
        assert!(Combination::parse("1,2,3", 1.0).is_none());
        assert!(Combination::parse("a,b", 1.0).is_none());
        assert!(Combination::parse("0,2", 1.0).is_none());
        assert!(Combination::parse("4,4", 1.0).is_none());
    }

    #[test]
    fn test_select_top_pair_and_axis() {
        let odds = odds_map(&[("1,2", 1.5), ("1,3", 2.0), ("2,3", 3.0)]);
        let selection = select_quinella(Some(&odds));
        assert_eq!(
            selection.top_pair,
            vec![Combination::new(1, 2, 1.5), Combination::new(1, 3, 2.0)]
        );
        assert_eq!(selection.axis, Some(1));
        assert!(selection.remainder.is_empty());
    }

    #[test]
    fn test_axis_fallback_without_shared_horse() {
        let odds = odds_map(&[
            ("06,10", 3.2),
            ("06,09", 4.1),
            ("06,01", 12.0),
            ("06,03", 8.5),
            ("09,10", 7.0),
            ("01,03", 2.0),
        ]);
        let selection = select_quinella(Some(&odds));
        // 1-3 and 6-10 share nothing: axis falls back to the first pair's smaller horse
        assert_eq!(selection.axis, Some(1));
        assert_eq!(selection.selection_row(), vec!["1-3", "6-10", "1-6"]);
        assert_eq!(selection.odds_row(), vec!["2.00", "3.20", "12.00"]);
    }

    #[test]
    fn test_remainder_with_shared_axis() {
        let odds = odds_map(&[
            ("06,10", 3.2),
            ("06,09", 4.1),
            ("06,01", 12.0),
            ("06,03", 8.5),
            ("09,10", 7.0),
        ]);
        let selection = select_quinella(Some(&odds));
        assert_eq!(selection.axis, Some(6));
        assert_eq!(
            selection.selection_row(),
            vec!["6-10", "6-9", "3-6", "1-6"]
        );
        assert_eq!(selection.odds_row(), vec!["3.20", "4.10", "8.50", "12.00"]);
    }

    #[test]
    fn test_axis_is_shared_horse() {
        let odds = odds_map(&[("02,07", 1.8), ("07,04", 2.2), ("02,04", 2.5)]);
        let selection = select_quinella(Some(&odds));
        assert_eq!(selection.axis, Some(7));
        assert!(selection.remainder.is_empty());
    }

    #[test]
    fn test_equal_odds_use_canonical_order() {
        let odds = odds_map(&[("2,3", 5.0), ("10,11", 5.0), ("1,2", 5.0)]);
        let (sorted, skipped) = sorted_combinations(&odds);
        let keys: Vec<String> = sorted.iter().map(Combination::canonical).collect();
        assert_eq!(keys, vec!["1-2", "10-11", "2-3"]);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_fewer_than_two_combinations() {
        let single = odds_map(&[("1,2", 1.5)]);
        let selection = select_quinella(Some(&single));
        assert!(selection.top_pair.is_empty());
        assert!(selection.remainder.is_empty());
        assert_eq!(selection.axis, None);

        assert_eq!(select_quinella(None), QuinellaSelection::default());
        assert_eq!(select_quinella(Some(&OddsMap::new())).axis, None);
    }

    #[test]
    fn test_malformed_keys_counted_not_sorted() {
        let odds = odds_map(&[("1,2", 1.5), ("bad", 0.5), ("1,3", 2.0)]);
        let selection = select_quinella(Some(&odds));
        assert_eq!(selection.skipped, 1);
        assert_eq!(selection.selection_row(), vec!["1-2", "1-3"]);
    }
}
