//! Snapshot persistence port.

use async_trait::async_trait;

use crate::domain::models::ArenaSnapshot;

/// Error types for snapshot persistence
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot (de)serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Port trait for durable snapshot storage.
///
/// `save` must be atomic: a concurrent reader never observes a partial
/// snapshot, and a failed save leaves the previous snapshot intact.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the persisted snapshot, or `None` when none exists yet.
    async fn load(&self) -> Result<Option<ArenaSnapshot>, SnapshotError>;

    /// Durably replace the canonical snapshot.
    async fn save(&self, snapshot: &ArenaSnapshot) -> Result<(), SnapshotError>;
}
