//! Odds snapshot storage

pub mod odds_loader;

// Re-export commonly used types
pub use odds_loader::{
    list_snapshots, load_snapshot, save_snapshot, snapshot_exists, snapshot_path,
    snapshot_saved_at, SnapshotEntry, SnapshotFile, StoreError,
};
