//! JRA odds page parsers and odds API client
//!
//! Parses saved win/place (単勝・複勝) and quinella (馬連) odds pages into
//! odds maps, and fetches ready-made snapshots from the odds API.
//!
//! # Example
//!
//! ```no_run
//! use keiba::core::extract_race_id;
//! use keiba::scraper::{ClientConfig, OddsClient};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OddsClient::new(ClientConfig::default())?;
//!     let race_id = extract_race_id("202505041007")?;
//!
//!     let snapshot = client.fetch_snapshot(&race_id).await?;
//!     println!("Found {} quinella combinations", snapshot.umaren.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod tanpuku;
mod umaren;

pub use client::{unwrap_envelope, ClientConfig, OddsClient, ScraperError};
pub use tanpuku::{parse_fukusho_odds, parse_tansho_odds};
pub use umaren::parse_umaren_odds;

use crate::models::OddsSnapshot;

/// Build a snapshot from saved pages
///
/// `tanpuku_html` is the win/place page, `umaren_html` the quinella page.
/// A missing page leaves its categories empty.
pub fn parse_snapshot(
    tanpuku_html: Option<&str>,
    umaren_html: Option<&str>,
) -> Result<OddsSnapshot, ScraperError> {
    let mut snapshot = OddsSnapshot::default();

    if let Some(html) = tanpuku_html {
        snapshot.tansho = parse_tansho_odds(html)?;
        snapshot.fukusho = parse_fukusho_odds(html)?;
    }
    if let Some(html) = umaren_html {
        snapshot.umaren = parse_umaren_odds(html)?;
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot_without_pages() {
        let snapshot = parse_snapshot(None, None).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_parse_snapshot_quinella_only() {
        let html = r#"<ul class="umaren_list"><li><table><caption>3</caption>
            <tbody><tr><th>5</th><td>9.9</td></tr></tbody></table></li></ul>"#;
        let snapshot = parse_snapshot(None, Some(html)).unwrap();
        assert!(snapshot.tansho.is_empty());
        assert_eq!(snapshot.umaren["03,05"], 9.9);
    }

    #[test]
    fn test_parse_snapshot_propagates_errors() {
        let result = parse_snapshot(Some("<p>nothing</p>"), None);
        assert!(matches!(result, Err(ScraperError::ParseError(_))));
    }
}
