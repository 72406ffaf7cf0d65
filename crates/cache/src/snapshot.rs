//! Snapshot persistence.

use crate::error::{ErrorKind, Result};
use crate::Document;
use exn::ResultExt;
use racedocs_storage::BackendHandle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Every document known at a point in time.
///
/// ```json
/// { "timestamp": "2025-06-01T19:22:00Z", "data": [ ... ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub data: Vec<Document>,
}
impl Snapshot {
    /// A snapshot of `data` stamped with the current UTC time.
    pub fn now(data: Vec<Document>) -> Self {
        Self { timestamp: OffsetDateTime::now_utc(), data }
    }
}

/// Reads and writes the [`Snapshot`] at a fixed path of a storage backend.
#[derive(Clone)]
pub struct CacheStore {
    backend: BackendHandle,
    path: PathBuf,
}
impl CacheStore {
    pub fn new(backend: BackendHandle, path: impl Into<PathBuf>) -> Self {
        Self { backend, path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temporary_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Load the current snapshot.
    ///
    /// A missing snapshot is `None`. So is one that can't be read or parsed:
    /// it gets logged and is replaced by the next regeneration.
    #[tracing::instrument(skip(self), fields(path = %self.path.display(), documents))]
    pub async fn load(&self) -> Result<Option<Snapshot>> {
        let bytes = match self.backend.read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) if matches!(&*e, racedocs_storage::error::ErrorKind::InvalidPath(_)) => {
                return Err(e).or_raise(|| ErrorKind::Storage(self.path.clone()));
            },
            Err(e) => {
                tracing::warn!(error = ?e, "Could not read cache snapshot");
                return Ok(None);
            },
        };
        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) => {
                tracing::Span::current().record("documents", snapshot.data.len());
                Ok(Some(snapshot))
            },
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring corrupt cache snapshot");
                Ok(None)
            },
        }
    }

    /// Stamp `documents` with the current time and persist them.
    ///
    /// The snapshot is written beside its final path and renamed into place,
    /// so readers only ever observe complete files.
    #[tracing::instrument(skip(self, documents), fields(path = %self.path.display(), documents = documents.len()))]
    pub async fn save(&self, documents: &[Document]) -> Result<Snapshot> {
        let snapshot = Snapshot::now(documents.to_vec());
        self.write(&snapshot).await?;
        Ok(snapshot)
    }

    /// Persist an already-built snapshot.
    pub async fn write(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(snapshot).or_raise(|| ErrorKind::InvalidData)?;
        let temporary = self.temporary_path();
        self.backend.write(&temporary, &json).await.or_raise(|| ErrorKind::Storage(temporary.clone()))?;
        if let Err(e) = self.backend.rename(&temporary, &self.path).await {
            // Don't leave a stale copy behind for the next write to trip over.
            if let Err(cleanup) = self.backend.delete(&temporary).await {
                tracing::warn!(error = ?cleanup, path = %temporary.display(), "Could not remove temporary snapshot");
            }
            return Err(e).or_raise(|| ErrorKind::Storage(self.path.clone()));
        }
        tracing::debug!(backend = self.backend.name(), "Cache snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racedocs_storage::StorageBackend;
    use racedocs_storage::backend::MockBackend;
    use std::sync::Arc;
    use time::macros::datetime;

    fn document(title: &str) -> Document {
        let mut document = Document::new(2286, format!("https://www.fia.com/{title}.pdf"), title, "14.03.25 10:00");
        document.event_name = Some("Australian Grand Prix".to_string());
        document
    }

    fn store(backend: &Arc<MockBackend>) -> CacheStore {
        CacheStore::new(backend.clone(), "cache.json")
    }

    #[tokio::test]
    async fn test_load_missing() {
        let backend = Arc::new(MockBackend::default());
        assert_eq!(store(&backend).load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_corrupt() {
        let backend = Arc::new(MockBackend::with_files([("cache.json", "{\"timestamp\": 12")]));
        assert_eq!(store(&backend).load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_existing() {
        let json = r#"{
            "timestamp": "2025-03-14T10:30:00Z",
            "data": [{
                "eventId": 2286,
                "href": "https://www.fia.com/a.pdf",
                "title": "a",
                "published": "14.03.25 10:00",
                "eventName": "Australian Grand Prix"
            }]
        }"#;
        let backend = Arc::new(MockBackend::with_files([("cache.json", json)]));
        let snapshot = store(&backend).load().await.unwrap().unwrap();
        assert_eq!(snapshot.timestamp, datetime!(2025-03-14 10:30:00 UTC));
        assert_eq!(snapshot.data, vec![document("a")]);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let backend = Arc::new(MockBackend::default());
        let store = store(&backend);
        let saved = store.save(&[document("a"), document("b")]).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(saved));
        // Only the final file is left behind.
        assert_eq!(backend.paths().await, vec![PathBuf::from("cache.json")]);
    }

    #[tokio::test]
    async fn test_save_empty() {
        let backend = Arc::new(MockBackend::default());
        let snapshot = store(&backend).save(&[]).await.unwrap();
        assert!(snapshot.data.is_empty());
        let written = backend.read(Path::new("cache.json")).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(value["data"], serde_json::json!([]));
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_invalid_path_is_an_error() {
        let backend = Arc::new(MockBackend::default());
        let store = CacheStore::new(backend, "../cache.json");
        assert!(store.load().await.is_err());
        assert!(store.save(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temporary_snapshot() {
        let root = tempfile::tempdir().unwrap();
        let backend = Arc::new(racedocs_storage::backend::LocalBackend::new("data", root.path()).unwrap());
        // A non-empty directory can't be replaced by a file.
        std::fs::create_dir_all(root.path().join("cache.json/occupied")).unwrap();
        let store = CacheStore::new(backend.clone(), "cache.json");

        assert!(store.save(&[document("Summons")]).await.is_err());
        assert!(!backend.exists(Path::new("cache.json.tmp")).await.unwrap());
    }
}
