//! Display grid assembly
//!
//! Six rows under fixed labels, right-padded with empty cells to the length
//! of the longest row. Label order comes from [`RowLabel::ALL`], never from
//! map iteration.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::quinella::QuinellaSelection;
use super::ranking::RankedCategory;

/// Fixed grid row labels, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowLabel {
    #[serde(rename = "単勝_オッズ")]
    WinOdds,
    #[serde(rename = "単勝_馬番")]
    WinHorses,
    #[serde(rename = "複勝_オッズ")]
    PlaceOdds,
    #[serde(rename = "複勝_馬番")]
    PlaceHorses,
    #[serde(rename = "馬連_オッズ")]
    QuinellaOdds,
    #[serde(rename = "馬連_馬番")]
    QuinellaHorses,
}

impl RowLabel {
    pub const ALL: [RowLabel; 6] = [
        RowLabel::WinOdds,
        RowLabel::WinHorses,
        RowLabel::PlaceOdds,
        RowLabel::PlaceHorses,
        RowLabel::QuinellaOdds,
        RowLabel::QuinellaHorses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RowLabel::WinOdds => "単勝_オッズ",
            RowLabel::WinHorses => "単勝_馬番",
            RowLabel::PlaceOdds => "複勝_オッズ",
            RowLabel::PlaceHorses => "複勝_馬番",
            RowLabel::QuinellaOdds => "馬連_オッズ",
            RowLabel::QuinellaHorses => "馬連_馬番",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == label)
    }

    /// Odds rows as opposed to selection rows
    pub fn is_odds(&self) -> bool {
        matches!(
            self,
            RowLabel::WinOdds | RowLabel::PlaceOdds | RowLabel::QuinellaOdds
        )
    }
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labelled grid row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub label: RowLabel,
    pub cells: Vec<String>,
}

/// Rectangular label-keyed grid
///
/// Deserialization goes through [`DisplayGrid::from_rows`], so a ragged or
/// reordered payload comes back padded and `max_cols` is recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GridPayload")]
pub struct DisplayGrid {
    rows: Vec<GridRow>,
    max_cols: usize,
}

/// Wire form of a grid; any `max_cols` it carries is ignored
#[derive(Deserialize)]
struct GridPayload {
    rows: Vec<GridRow>,
}

impl From<GridPayload> for DisplayGrid {
    fn from(payload: GridPayload) -> Self {
        DisplayGrid::from_rows(
            payload
                .rows
                .into_iter()
                .map(|row| (row.label, row.cells))
                .collect(),
        )
    }
}

impl DisplayGrid {
    /// Build a grid from natural rows, padding each to the longest
    ///
    /// Rows are placed in [`RowLabel::ALL`] order; a label missing from
    /// `rows` gets an all-empty row.
    pub fn from_rows(mut rows: Vec<(RowLabel, Vec<String>)>) -> Self {
        let max_cols = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);

        let rows = RowLabel::ALL
            .iter()
            .map(|&label| {
                let mut cells = rows
                    .iter_mut()
                    .find(|(l, _)| *l == label)
                    .map(|(_, cells)| std::mem::take(cells))
                    .unwrap_or_default();
                cells.resize(max_cols, String::new());
                GridRow { label, cells }
            })
            .collect();

        Self { rows, max_cols }
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn max_cols(&self) -> usize {
        self.max_cols
    }

    pub fn row(&self, label: RowLabel) -> &[String] {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.cells.as_slice())
            .unwrap_or(&[])
    }

    /// True when every cell is empty padding
    pub fn is_empty(&self) -> bool {
        self.max_cols == 0
    }

    /// Column headers "01", "02", ... for renderers
    pub fn column_headers(&self) -> Vec<String> {
        (1..=self.max_cols).map(|i| format!("{:02}", i)).collect()
    }
}

/// Merge ranked rows from all three categories into one grid
pub fn assemble_grid(
    win: RankedCategory,
    place: RankedCategory,
    quinella: &QuinellaSelection,
) -> DisplayGrid {
    DisplayGrid::from_rows(vec![
        (RowLabel::WinOdds, win.odds),
        (RowLabel::WinHorses, win.selections),
        (RowLabel::PlaceOdds, place.odds),
        (RowLabel::PlaceHorses, place.selections),
        (RowLabel::QuinellaOdds, quinella.odds_row()),
        (RowLabel::QuinellaHorses, quinella.selection_row()),
    ])
}
