//! JSON snapshot storage with atomic replace.
//!
//! Writes land in a sibling temp file first and are renamed over the
//! canonical path, so a concurrent reader (the dashboard tails this file)
//! never observes a partial snapshot and a failed save leaves the previous
//! one intact.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::domain::models::ArenaSnapshot;
use crate::domain::ports::{SnapshotError, SnapshotStore};

/// File-backed [`SnapshotStore`] serializing to pretty-printed JSON.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store around the canonical snapshot path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self) -> Result<Option<ArenaSnapshot>, SnapshotError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let snapshot: ArenaSnapshot = serde_json::from_slice(&raw)?;
        debug!(path = %self.path.display(), "snapshot loaded");
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &ArenaSnapshot) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &body).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), bytes = body.len(), "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Soul;

    fn snapshot() -> ArenaSnapshot {
        let mut snapshot = ArenaSnapshot::seeded(vec![
            Soul::new("A [001]".into(), "A – alpha".into(), 1, String::new()),
            Soul::new("B [002]".into(), "B – beta".into(), 1, String::new()),
        ]);
        snapshot.collective.record_battle();
        snapshot
            .collective
            .record_absorption("A absorbed B".into(), 40, 101);
        snapshot
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("missing.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("arena.json"));

        let original = snapshot();
        store.save(&original).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("deeply/nested/arena.json"));

        store.save(&snapshot()).await.unwrap();
        assert!(store.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arena.json");
        let store = JsonSnapshotStore::new(path.clone());

        store.save(&snapshot()).await.unwrap();
        assert!(path.exists());
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("arena.json"));

        let mut first = snapshot();
        store.save(&first).await.unwrap();

        first.collective.record_absorption("second entry".into(), 40, 101);
        store.save(&first).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.collective.souls_absorbed, 2);
    }

    #[tokio::test]
    async fn test_load_tolerates_minimal_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arena.json");
        tokio::fs::write(&path, "{}").await.unwrap();

        let store = JsonSnapshotStore::new(path);
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, ArenaSnapshot::default());
    }
}
