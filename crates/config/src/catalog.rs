//! The event catalog: which events to scrape and what they're called.
//!
//! ```json
//! {
//!   "baseUrl": "https://www.fia.com",
//!   "eventIds": [2286, 2287],
//!   "eventMappings": { "2286": "Australian Grand Prix" }
//! }
//! ```

use crate::error::{ErrorKind, Result};
use crate::settings::validate_url;
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCatalog {
    pub base_url: String,
    /// Events to scrape, in scrape order.
    #[serde(default)]
    pub event_ids: Vec<u64>,
    #[serde(default)]
    pub event_mappings: BTreeMap<u64, String>,
}

impl EventCatalog {
    #[tracing::instrument(fields(events))]
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).or_raise(|| ErrorKind::CatalogIo(path.to_path_buf()))?;
        let catalog: Self = serde_json::from_slice(&data).or_raise(|| ErrorKind::CatalogFormat(path.to_path_buf()))?;
        validate_url("baseUrl", &catalog.base_url).or_raise(|| ErrorKind::CatalogFormat(path.to_path_buf()))?;
        tracing::Span::current().record("events", catalog.event_ids.len());
        Ok(catalog)
    }

    /// Write the catalog back as pretty-printed JSON.
    #[tracing::instrument(skip(self), fields(events = self.event_ids.len()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json =
            serde_json::to_string_pretty(self).or_raise(|| ErrorKind::CatalogFormat(path.to_path_buf()))?;
        json.push('\n');
        std::fs::write(path, json).or_raise(|| ErrorKind::CatalogIo(path.to_path_buf()))
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn event_name(&self, id: u64) -> Option<&str> {
        self.event_mappings.get(&id).map(String::as_str)
    }

    /// Merge discovered events into the catalog.
    ///
    /// IDs not yet listed are appended in discovery order; every name is
    /// added or overwritten. Returns the newly appended IDs.
    pub fn merge_events(&mut self, events: impl IntoIterator<Item = (u64, String)>) -> Vec<u64> {
        let mut added = Vec::new();
        for (id, name) in events {
            if !self.event_ids.contains(&id) {
                self.event_ids.push(id);
                added.push(id);
            }
            self.event_mappings.insert(id, name);
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "baseUrl": "https://www.fia.com/",
        "eventIds": [2286, 2287],
        "eventMappings": { "2286": "Australian Grand Prix" }
    }"#;

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, CATALOG).unwrap();
        let catalog = EventCatalog::load(&path).unwrap();
        assert_eq!(catalog.base(), "https://www.fia.com");
        assert_eq!(catalog.event_ids, vec![2286, 2287]);
        assert_eq!(catalog.event_name(2286), Some("Australian Grand Prix"));
        assert_eq!(catalog.event_name(2287), None);
    }

    #[test]
    fn test_load_without_mappings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"baseUrl": "https://www.fia.com", "eventIds": [1]}"#).unwrap();
        let catalog = EventCatalog::load(&path).unwrap();
        assert!(catalog.event_mappings.is_empty());
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = EventCatalog::load(&dir.path().join("config.json")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::CatalogIo(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"eventIds": "nope"}"#).unwrap();
        let err = EventCatalog::load(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::CatalogFormat(_)));
        std::fs::write(&path, r#"{"baseUrl": "not a url"}"#).unwrap();
        let err = EventCatalog::load(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::CatalogFormat(_)));
    }

    #[test]
    fn test_merge_events() {
        let mut catalog: EventCatalog = serde_json::from_str(CATALOG).unwrap();
        let added = catalog.merge_events([
            (2287, "Chinese Grand Prix".to_string()),
            (2300, "Japanese Grand Prix".to_string()),
            (2286, "Australian GP".to_string()),
        ]);
        assert_eq!(added, vec![2300]);
        assert_eq!(catalog.event_ids, vec![2286, 2287, 2300]);
        assert_eq!(catalog.event_name(2286), Some("Australian GP"));
        assert_eq!(catalog.event_name(2287), Some("Chinese Grand Prix"));
    }

    #[test]
    fn test_save_round_trips_string_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let catalog: EventCatalog = serde_json::from_str(CATALOG).unwrap();
        catalog.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#""2286": "Australian Grand Prix""#));
        assert!(written.ends_with('\n'));
        assert_eq!(EventCatalog::load(&path).unwrap(), catalog);
    }
}
