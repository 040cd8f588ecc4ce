//! Race identifier extraction
//!
//! Accepts either a netkeiba URL carrying `race_id=<digits>` or the bare
//! digits themselves, e.g.
//! - `https://race.netkeiba.com/race/shutuba.html?race_id=202505041007`
//! - `https://race.netkeiba.com/race/result.html?race_id=202508031009&rf=race_list`
//! - `202505041007`

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier extraction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("race_idを抽出できませんでした: {0:?}")]
    InvalidIdentifier(String),
}

/// Canonical race identifier (digits only)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaceId(String);

/// Decomposed 12-digit JRA race identifier
///
/// Layout: `YYYY` `PP` (venue) `KK` (meeting) `DD` (day) `RR` (race)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceKey {
    pub year: u16,
    pub venue_code: u8,
    pub meeting: u8,
    pub day: u8,
    pub race_no: u8,
}

impl RaceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a 12-digit identifier into its parts
    pub fn key(&self) -> Option<RaceKey> {
        let s = self.0.as_str();
        if s.len() != 12 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(RaceKey {
            year: s[0..4].parse().ok()?,
            venue_code: s[4..6].parse().ok()?,
            meeting: s[6..8].parse().ok()?,
            day: s[8..10].parse().ok()?,
            race_no: s[10..12].parse().ok()?,
        })
    }

    /// Venue name, when the identifier carries a known venue code
    pub fn venue(&self) -> Option<&'static str> {
        self.key().and_then(|k| venue_name(k.venue_code))
    }

    /// Human readable label such as `2025 東京 2回4日 7R`
    pub fn describe(&self) -> Option<String> {
        let key = self.key()?;
        let venue = venue_name(key.venue_code)?;
        Some(format!(
            "{} {} {}回{}日 {}R",
            key.year, venue, key.meeting, key.day, key.race_no
        ))
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// JRA venue codes and names
pub fn venue_name(code: u8) -> Option<&'static str> {
    match code {
        1 => Some("札幌"),
        2 => Some("函館"),
        3 => Some("福島"),
        4 => Some("新潟"),
        5 => Some("東京"),
        6 => Some("中山"),
        7 => Some("中京"),
        8 => Some("京都"),
        9 => Some("阪神"),
        10 => Some("小倉"),
        _ => None,
    }
}

/// Extracts race identifiers from user input
pub struct IdentifierExtractor {
    query_pattern: Regex,
}

impl Default for IdentifierExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierExtractor {
    pub fn new() -> Self {
        Self {
            // ASCII digits only; `\d` would also match fullwidth digits
            query_pattern: Regex::new(r"race_id=([0-9]+)").unwrap(),
        }
    }

    /// Extract a race identifier from a URL or bare digits
    pub fn extract(&self, input: &str) -> Result<RaceId, IdentifierError> {
        if let Some(caps) = self.query_pattern.captures(input) {
            return Ok(RaceId(caps[1].to_string()));
        }

        let trimmed = input.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Ok(RaceId(trimmed.to_string()));
        }

        Err(IdentifierError::InvalidIdentifier(input.to_string()))
    }
}

/// Convenience wrapper around [`IdentifierExtractor::extract`]
pub fn extract_race_id(input: &str) -> Result<RaceId, IdentifierError> {
    IdentifierExtractor::new().extract(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_query_parameter() {
        let id = extract_race_id("https://example.com/?race_id=123").unwrap();
        assert_eq!(id.as_str(), "123");
    }

    #[test]
    fn test_extract_from_netkeiba_urls() {
        let extractor = IdentifierExtractor::new();
        let id = extractor
            .extract("https://race.netkeiba.com/race/shutuba.html?race_id=202505041007")
            .unwrap();
        assert_eq!(id.as_str(), "202505041007");

        let id = extractor
            .extract("https://race.netkeiba.com/race/result.html?race_id=202508031009&rf=race_list")
            .unwrap();
        assert_eq!(id.as_str(), "202508031009");
    }

    #[test]
    fn test_extract_bare_digits() {
        assert_eq!(extract_race_id("456").unwrap().as_str(), "456");
        assert_eq!(extract_race_id("  456 \n").unwrap().as_str(), "456");
    }

    #[test]
    fn test_extract_invalid() {
        assert_eq!(
            extract_race_id("abc"),
            Err(IdentifierError::InvalidIdentifier("abc".to_string()))
        );
        assert!(extract_race_id("").is_err());
        assert!(extract_race_id("   ").is_err());
        assert!(extract_race_id("12a4").is_err());
        assert!(extract_race_id("race_id=").is_err());
    }

    #[test]
    fn test_race_key_decomposition() {
        let id = extract_race_id("202505041007").unwrap();
        let key = id.key().unwrap();
        assert_eq!(key.year, 2025);
        assert_eq!(key.venue_code, 5);
        assert_eq!(key.meeting, 4);
        assert_eq!(key.day, 10);
        assert_eq!(key.race_no, 7);
        assert_eq!(id.venue(), Some("東京"));
        assert_eq!(id.describe().unwrap(), "2025 東京 4回10日 7R");
    }

    #[test]
    fn test_race_key_short_identifier() {
        let id = extract_race_id("456").unwrap();
        assert!(id.key().is_none());
        assert!(id.venue().is_none());
        assert!(id.describe().is_none());
    }

    #[test]
    fn test_extract_rejects_fullwidth_digits() {
        assert!(extract_race_id("https://race.netkeiba.com/?race_id=１２３").is_err());
        assert!(extract_race_id("race_id=１２３４").is_err());
        assert!(extract_race_id("１２３").is_err());
        // ASCII prefix before a fullwidth digit is kept, the rest dropped
        assert_eq!(extract_race_id("race_id=12３").unwrap().as_str(), "12");
    }

    #[test]
    fn test_race_key_requires_ascii_digits() {
        // 4 fullwidth digits are 12 bytes
        let id: RaceId = serde_json::from_str("\"１２３４\"").unwrap();
        assert_eq!(id.as_str().len(), 12);
        assert!(id.key().is_none());
        assert!(id.describe().is_none());
    }

    #[test]
    fn test_venue_names() {
        assert_eq!(venue_name(1), Some("札幌"));
        assert_eq!(venue_name(10), Some("小倉"));
        assert_eq!(venue_name(11), None);
    }
}
