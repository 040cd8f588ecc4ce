//! Odds snapshot JSON files
//!
//! One file per race: `{odds_dir}/{race_id}.json` holding the
//! `{tansho, fukusho, umaren}` maps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identifier::RaceId;
use crate::models::OddsSnapshot;

/// Snapshot file errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No odds snapshot for race {0}")]
    NotFound(String),

    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Snapshot file with fetch metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub race_id: RaceId,
    pub saved_at: String,
    #[serde(flatten)]
    pub odds: OddsSnapshot,
}

/// Stored snapshot summary for listings
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub race_id: String,
    pub path: PathBuf,
}

/// Path of the snapshot file for a race
pub fn snapshot_path<P: AsRef<Path>>(odds_dir: P, race_id: &RaceId) -> PathBuf {
    odds_dir.as_ref().join(format!("{}.json", race_id))
}

/// Check if a snapshot file exists
pub fn snapshot_exists<P: AsRef<Path>>(odds_dir: P, race_id: &RaceId) -> bool {
    snapshot_path(odds_dir, race_id).exists()
}

/// Load the odds snapshot for a race
///
/// Accepts both files written by [`save_snapshot`] and bare
/// `{tansho, fukusho, umaren}` objects.
pub fn load_snapshot<P: AsRef<Path>>(
    odds_dir: P,
    race_id: &RaceId,
) -> Result<OddsSnapshot, StoreError> {
    let path = snapshot_path(odds_dir, race_id);
    if !path.exists() {
        return Err(StoreError::NotFound(race_id.to_string()));
    }

    let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;
    let snapshot: OddsSnapshot =
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

    tracing::debug!("Loaded {} odds from {:?}", snapshot.len(), path);
    Ok(snapshot)
}

/// Save an odds snapshot, creating the directory if needed
pub fn save_snapshot<P: AsRef<Path>>(
    odds_dir: P,
    race_id: &RaceId,
    odds: &OddsSnapshot,
) -> Result<PathBuf, StoreError> {
    let dir = odds_dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = snapshot_path(dir, race_id);
    let file = SnapshotFile {
        race_id: race_id.clone(),
        saved_at: Utc::now().to_rfc3339(),
        odds: odds.clone(),
    };
    let json = serde_json::to_string_pretty(&file).map_err(|source| StoreError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!("Saved {} odds to {:?}", odds.len(), path);
    Ok(path)
}

/// When a snapshot file was written, if it records it
pub fn snapshot_saved_at<P: AsRef<Path>>(odds_dir: P, race_id: &RaceId) -> Option<DateTime<Utc>> {
    let content = fs::read_to_string(snapshot_path(odds_dir, race_id)).ok()?;
    let file: SnapshotFile = serde_json::from_str(&content).ok()?;
    DateTime::parse_from_rfc3339(&file.saved_at)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// List all snapshot files in directory, sorted by race id
pub fn list_snapshots<P: AsRef<Path>>(odds_dir: P) -> Vec<SnapshotEntry> {
    let mut results = Vec::new();

    if let Ok(entries) = fs::read_dir(odds_dir) {
        for entry in entries.flatten() {
            if let Some(filename) = entry.file_name().to_str() {
                if let Some(base) = filename.strip_suffix(".json") {
                    if !base.is_empty() && base.chars().all(|c| c.is_ascii_digit()) {
                        results.push(SnapshotEntry {
                            race_id: base.to_string(),
                            path: entry.path(),
                        });
                    }
                }
            }
        }
    }

    results.sort_by(|a, b| a.race_id.cmp(&b.race_id));
    results
}
