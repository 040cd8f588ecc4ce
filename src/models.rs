use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::grid::DisplayGrid;
use crate::core::pipeline::TopPairSummary;

/// Odds keyed by selection (horse number, or horse pair for quinella)
pub type OddsMap = HashMap<String, f64>;

/// Odds snapshot for a single race
///
/// Absent categories deserialize as empty maps so partial data still renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OddsSnapshot {
    /// 単勝: horse number -> odds
    #[serde(default, alias = "win")]
    pub tansho: OddsMap,
    /// 複勝: horse number -> lower bound of the place odds range
    #[serde(default, alias = "place")]
    pub fukusho: OddsMap,
    /// 馬連: "01,05" -> odds
    #[serde(default, alias = "quinella")]
    pub umaren: OddsMap,
}

impl OddsSnapshot {
    /// True when no category has any odds
    pub fn is_empty(&self) -> bool {
        self.tansho.is_empty() && self.fukusho.is_empty() && self.umaren.is_empty()
    }

    /// Total number of odds entries across categories
    pub fn len(&self) -> usize {
        self.tansho.len() + self.fukusho.len() + self.umaren.len()
    }
}

/// Response envelope used by the odds API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Grid payload returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridResponse {
    pub race_id: String,
    pub grid: DisplayGrid,
    pub max_cols: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TopPairSummary>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub snapshots: usize,
}
