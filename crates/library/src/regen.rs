//! Full cache regeneration.

use crate::client::HttpClient;
use crate::download::Downloader;
use crate::error::{ErrorKind, Result};
use crate::fetch::fetch_docs_for;
use exn::ResultExt;
use racedocs_cache::CacheStore;
use racedocs_config::EventCatalog;
use racedocs_extract::models::{Document, UNKNOWN_EVENT};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::instrument;

/// Scrapes every catalogued event and replaces the cache snapshot.
///
/// Events are processed one after another, pausing between them, so the
/// upstream site only ever sees a single request at a time.
pub struct Regenerator {
    client: HttpClient,
    catalog: PathBuf,
    cache: CacheStore,
    downloader: Option<Downloader>,
    event_delay: Duration,
    running: Mutex<()>,
}

impl Regenerator {
    pub fn new(client: HttpClient, catalog: impl Into<PathBuf>, cache: CacheStore) -> Self {
        Self {
            client,
            catalog: catalog.into(),
            cache,
            downloader: None,
            event_delay: Duration::ZERO,
            running: Mutex::new(()),
        }
    }

    /// Download every document and serve it locally.
    pub fn with_downloader(mut self, downloader: Downloader) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Pause after each event.
    pub fn with_event_delay(mut self, delay: Duration) -> Self {
        self.event_delay = delay;
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn catalog_path(&self) -> &std::path::Path {
        &self.catalog
    }

    /// Regenerate the cache and return the documents it now holds.
    ///
    /// Concurrent callers queue up behind the regeneration in progress. If the
    /// catalog can't be loaded or the final snapshot can't be written, the
    /// documents of the existing snapshot (if any) are returned instead.
    #[instrument(skip(self), fields(count))]
    pub async fn run(&self) -> Vec<Document> {
        let _running = self.running.lock().await;
        let data = match self.regenerate().await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = ?e, "Error regenerating cache");
                self.existing().await
            },
        };
        tracing::Span::current().record("count", data.len());
        data
    }

    async fn existing(&self) -> Vec<Document> {
        match self.cache.load().await {
            Ok(snapshot) => snapshot.map(|snapshot| snapshot.data).unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = ?e, "Fallback cache unavailable");
                Vec::new()
            },
        }
    }

    async fn regenerate(&self) -> Result<Vec<Document>> {
        let catalog = EventCatalog::load(&self.catalog).or_raise(|| ErrorKind::Catalog)?;
        tracing::info!("Starting cache regeneration for {} events", catalog.event_ids.len());

        let mut data = Vec::new();
        for &event_id in &catalog.event_ids {
            let documents = self.process_event(&catalog, event_id).await;
            data.extend(documents);
            if !data.is_empty() {
                match self.cache.save(&data).await {
                    Ok(_) => tracing::debug!("Intermediate cache saved with {} documents", data.len()),
                    Err(e) => tracing::warn!(error = ?e, "Could not save intermediate cache"),
                }
            }
            tokio::time::sleep(self.event_delay).await;
        }

        if data.is_empty() {
            tracing::warn!("No documents found during cache regeneration");
        } else {
            tracing::info!("Successfully fetched {} documents total", data.len());
        }
        let snapshot = self.cache.save(&data).await.or_raise(|| ErrorKind::Cache)?;
        tracing::info!(timestamp = %snapshot.timestamp, "Cache saved");
        Ok(snapshot.data)
    }

    #[instrument(skip(self, catalog))]
    async fn process_event(&self, catalog: &EventCatalog, event_id: u64) -> Vec<Document> {
        let event_name = catalog.event_name(event_id).unwrap_or(UNKNOWN_EVENT);
        let mut documents = fetch_docs_for(&self.client, catalog.base(), event_id).await;
        for document in &mut documents {
            document.absolutize(catalog.base());
            document.event_name = Some(event_name.to_string());
            if let Some(downloader) = &self.downloader {
                downloader.localize(document).await;
            }
        }
        documents
    }
}
