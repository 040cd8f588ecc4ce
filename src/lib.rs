//! Keiba odds - JRA race odds viewer
//!
//! This library provides:
//! - Race identifier extraction from netkeiba URLs
//! - Win (単勝) / place (複勝) ranking and quinella (馬連) axis selection
//! - A fixed-label display grid with tab-separated export
//! - Odds snapshot storage, page parsers and an API client
//!
//! # Example
//!
//! ```
//! use keiba::core::{extract_race_id, prepare_display};
//! use keiba::models::OddsSnapshot;
//!
//! let race_id = extract_race_id("https://race.netkeiba.com/race/shutuba.html?race_id=202505041007").unwrap();
//! assert_eq!(race_id.as_str(), "202505041007");
//!
//! let mut snapshot = OddsSnapshot::default();
//! snapshot.tansho.insert("1".to_string(), 2.5);
//! snapshot.tansho.insert("2".to_string(), 1.1);
//!
//! let report = prepare_display(&snapshot);
//! assert_eq!(report.max_cols(), 2);
//! println!("{}", report.to_tsv());
//! ```

pub mod core;
pub mod data;
pub mod models;

#[cfg(feature = "scraper")]
pub mod scraper;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    extract_race_id, prepare_display, DisplayGrid, DisplayReport, RaceId, RowLabel,
    TopPairSummary,
};
pub use data::{list_snapshots, load_snapshot, save_snapshot};
pub use models::{Envelope, OddsMap, OddsSnapshot};
