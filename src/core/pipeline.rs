//! Snapshot -> display grid pipeline
//!
//! Runs the rankers over one odds snapshot and returns everything a renderer
//! or exporter needs as a single value.

use serde::{Deserialize, Serialize};

use super::grid::{assemble_grid, DisplayGrid};
use super::quinella::{select_quinella, QuinellaSelection};
use super::ranking::rank_category;
use super::tsv::to_tsv;
use crate::models::OddsSnapshot;

/// One top-pair combination for the summary line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSummary {
    pub combination: String,
    pub odds: f64,
}

/// Top two quinella combinations and the axis horse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPairSummary {
    pub first: PairSummary,
    pub second: PairSummary,
    pub axis: u32,
}

impl TopPairSummary {
    pub fn from_selection(selection: &QuinellaSelection) -> Option<Self> {
        let axis = selection.axis?;
        let [first, second] = selection.top_pair.as_slice() else {
            return None;
        };
        Some(Self {
            first: PairSummary {
                combination: first.canonical(),
                odds: first.odds,
            },
            second: PairSummary {
                combination: second.canonical(),
                odds: second.odds,
            },
            axis,
        })
    }

    /// `馬連上位2つ: 1-2（1.20）、1-3（4.00） | 軸: 01番`
    pub fn annotation(&self) -> String {
        format!(
            "馬連上位2つ: {}（{:.2}）、{}（{:.2}） | 軸: {:02}番",
            self.first.combination,
            self.first.odds,
            self.second.combination,
            self.second.odds,
            self.axis
        )
    }
}

/// Pipeline output for one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayReport {
    pub grid: DisplayGrid,
    pub quinella: QuinellaSelection,
    pub summary: Option<TopPairSummary>,
    /// Keys skipped across all categories
    pub skipped: usize,
}

impl DisplayReport {
    pub fn max_cols(&self) -> usize {
        self.grid.max_cols()
    }

    /// TSV export of the grid
    pub fn to_tsv(&self) -> String {
        to_tsv(&self.grid)
    }
}

/// Rank all categories of a snapshot and assemble the grid
pub fn prepare_display(snapshot: &OddsSnapshot) -> DisplayReport {
    let win = rank_category(Some(&snapshot.tansho));
    let place = rank_category(Some(&snapshot.fukusho));
    let quinella = select_quinella(Some(&snapshot.umaren));

    let skipped = win.skipped + place.skipped + quinella.skipped;
    if skipped > 0 {
        tracing::warn!("{} malformed odds keys skipped", skipped);
    }

    let summary = TopPairSummary::from_selection(&quinella);
    let grid = assemble_grid(win, place, &quinella);

    tracing::debug!("Assembled grid with {} columns", grid.max_cols());

    DisplayReport {
        grid,
        quinella,
        summary,
        skipped,
    }
}
