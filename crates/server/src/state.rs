//! State shared by every handler.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use racedocs_cache::{CacheStore, Snapshot};
use racedocs_config::EventCatalog;
use racedocs_extract::models::Document;
use racedocs_library::Regenerator;
use racedocs_render::Pages;
use racedocs_storage::BackendHandle;
use racedocs_storage::backend::ExtensionBackend;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone)]
pub struct AppState {
    regenerator: Arc<Regenerator>,
    pages: Arc<Pages>,
    files: Option<BackendHandle>,
    cache_token: Option<Arc<str>>,
    background: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(regenerator: Arc<Regenerator>, pages: Pages) -> Self {
        Self {
            regenerator,
            pages: Arc::new(pages),
            files: None,
            cache_token: None,
            background: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Serve downloaded documents from `backend`. Only PDFs are reachable.
    pub fn with_files(mut self, backend: BackendHandle) -> Self {
        self.files = Some(Arc::new(ExtensionBackend::new(backend, "pdf")));
        self
    }

    /// Token required by the admin endpoint. Without one, the endpoint
    /// refuses every request.
    pub fn with_cache_token(mut self, token: Option<String>) -> Self {
        self.cache_token = token.filter(|t| !t.is_empty()).map(Arc::from);
        self
    }

    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    pub fn cache(&self) -> &CacheStore {
        self.regenerator.cache()
    }

    pub(crate) fn files(&self) -> Option<&BackendHandle> {
        self.files.as_ref()
    }

    pub(crate) fn authorized(&self, presented: Option<&str>) -> bool {
        match (self.cache_token.as_deref(), presented) {
            (Some(expected), Some(presented)) => expected == presented,
            _ => false,
        }
    }

    pub(crate) async fn snapshot(&self) -> Result<Option<Snapshot>> {
        self.cache().load().await.or_raise(|| ErrorKind::Cache)
    }

    pub(crate) fn catalog(&self) -> Result<EventCatalog> {
        EventCatalog::load(self.regenerator.catalog_path()).or_raise(|| ErrorKind::Catalog)
    }

    /// Event names for display; empty if the catalog can't be read.
    pub(crate) fn event_names(&self) -> BTreeMap<u64, String> {
        match self.catalog() {
            Ok(catalog) => catalog.event_mappings,
            Err(e) => {
                tracing::warn!(error = ?e, "Event names unavailable");
                BTreeMap::new()
            },
        }
    }

    /// Regenerate the cache and wait for the result.
    ///
    /// The regeneration runs on its own task: a client hanging up must not
    /// abandon it half way through.
    pub async fn regenerate(&self) -> Result<Vec<Document>> {
        let regenerator = self.regenerator.clone();
        tokio::spawn(async move { regenerator.run().await })
            .await
            .or_raise(|| ErrorKind::Regeneration)
    }

    /// Start a regeneration unless one started this way is still running.
    ///
    /// Returns `false` if one was already in progress.
    pub(crate) fn regenerate_in_background(&self) -> bool {
        if self.background.swap(true, Ordering::AcqRel) {
            return false;
        }
        let state = self.clone();
        tokio::spawn(async move {
            let count = state.regenerator.run().await.len();
            state.background.store(false, Ordering::Release);
            tracing::info!(count, "Background regeneration finished");
        });
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use racedocs_config::FetchSettings;
    use racedocs_library::HttpClient;
    use racedocs_storage::backend::MockBackend;
    use rstest::rstest;
    use std::path::PathBuf;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Upstream site, catalog and storage for handler tests.
    pub(crate) struct Fixture {
        _dir: tempfile::TempDir,
        pub catalog: PathBuf,
        pub data: Arc<MockBackend>,
        pub files: Arc<MockBackend>,
        pub server: MockServer,
    }

    impl Fixture {
        pub async fn new() -> Self {
            let server = MockServer::start().await;
            let dir = tempfile::tempdir().unwrap();
            let catalog = dir.path().join("config.json");
            let json = serde_json::json!({
                "baseUrl": server.uri(),
                "eventIds": [1],
                "eventMappings": { "1": "Bahrain Grand Prix" },
            });
            std::fs::write(&catalog, json.to_string()).unwrap();
            Self {
                _dir: dir,
                catalog,
                data: Arc::new(MockBackend::default()),
                files: Arc::new(MockBackend::default()),
                server,
            }
        }

        /// Serve one document for event 1.
        pub async fn mount_upstream(&self) {
            let fragment = r#"<div class="document-type-wrapper"><ul><li class="document-row"><a href="/sites/summons.pdf">
                <div class="title">Summons</div>
                <div class="published"><span class="date-display-single">01.03.25 10:00</span></div>
            </a></li></ul></div>"#;
            let payload = serde_json::json!([{ "command": "insert", "method": "replaceWith", "data": fragment }]);
            Mock::given(method("GET"))
                .and(path("/decision-document-list/ajax/1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(payload))
                .mount(&self.server)
                .await;
        }

        pub fn store(&self) -> CacheStore {
            CacheStore::new(self.data.clone(), "cache.json")
        }

        pub fn state(&self) -> AppState {
            let client = HttpClient::new(&FetchSettings::default()).unwrap();
            let regenerator = Regenerator::new(client, &self.catalog, self.store());
            AppState::new(Arc::new(regenerator), Pages::new().unwrap())
                .with_files(self.files.clone())
                .with_cache_token(Some("secret".to_string()))
        }
    }

    #[rstest]
    #[case::matching(Some("secret"), Some("secret"), true)]
    #[case::wrong(Some("secret"), Some("wrong"), false)]
    #[case::missing(Some("secret"), None, false)]
    #[case::unconfigured(None, Some(""), false)]
    #[case::blank_configured(Some(""), Some(""), false)]
    #[tokio::test]
    async fn test_authorized(#[case] configured: Option<&str>, #[case] presented: Option<&str>, #[case] expected: bool) {
        let fixture = Fixture::new().await;
        let state = fixture.state().with_cache_token(configured.map(str::to_string));
        assert_eq!(state.authorized(presented), expected);
    }

    #[tokio::test]
    async fn test_event_names_without_catalog() {
        let fixture = Fixture::new().await;
        std::fs::remove_file(&fixture.catalog).unwrap();
        assert!(fixture.state().event_names().is_empty());
    }

    #[tokio::test]
    async fn test_regenerate() {
        let fixture = Fixture::new().await;
        fixture.mount_upstream().await;
        let data = fixture.state().regenerate().await.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].event_name.as_deref(), Some("Bahrain Grand Prix"));
        assert!(fixture.store().load().await.unwrap().is_some());
    }
}
