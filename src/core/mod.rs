//! Odds shaping pipeline: identifier extraction, ranking, quinella axis
//! selection, grid assembly and TSV export

pub mod grid;
pub mod identifier;
pub mod pipeline;
pub mod quinella;
pub mod ranking;
pub mod tsv;

// Re-export commonly used types
pub use grid::{assemble_grid, DisplayGrid, GridRow, RowLabel};
pub use identifier::{extract_race_id, venue_name, IdentifierError, IdentifierExtractor, RaceId};
pub use pipeline::{prepare_display, DisplayReport, PairSummary, TopPairSummary};
pub use quinella::{canonical_form, select_quinella, Combination, QuinellaSelection};
pub use ranking::{rank_category, RankedCategory};
pub use tsv::{parse_tsv, to_tsv};
