//! Local copies of document PDFs.

use crate::client::HttpClient;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use racedocs_extract::models::Document;
use racedocs_storage::BackendHandle;
use std::path::Path;
use std::time::Duration;

/// Route prefix under which downloaded files are served.
pub const FILES_ROUTE: &str = "/files";

/// Stable local file name for a remote document URL.
///
/// The first 16 hex characters of the BLAKE3 hash of the URL, plus `.pdf`.
///
/// ```
/// let name = racedocs_library::local_name("https://www.fia.com/sites/default/files/decision.pdf");
/// assert_eq!(name.len(), 20);
/// assert!(name.ends_with(".pdf"));
/// ```
pub fn local_name(url: &str) -> String {
    let hash = blake3::hash(url.as_bytes()).to_hex();
    format!("{}.pdf", &hash[..16])
}

/// Downloads documents into a storage backend rooted at the download
/// directory.
#[derive(Clone)]
pub struct Downloader {
    client: HttpClient,
    backend: BackendHandle,
    delay: Duration,
}

impl Downloader {
    pub fn new(client: HttpClient, backend: BackendHandle) -> Self {
        Self { client, backend, delay: Duration::ZERO }
    }

    /// Pause after every network download.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make sure a local copy of `document` exists and point it there.
    ///
    /// A failed download is logged and leaves the document pointing upstream.
    #[tracing::instrument(skip_all, fields(event_id = document.event_id, title = %document.title))]
    pub async fn localize(&self, document: &mut Document) {
        let remote = document.original_href.clone().unwrap_or_else(|| document.href.clone());
        let name = local_name(&remote);
        match self.ensure(&remote, &name).await {
            Ok(()) => document.relocate(format!("{FILES_ROUTE}/{name}")),
            Err(e) => tracing::warn!(error = ?e, url = %remote, "Could not download document"),
        }
    }

    async fn ensure(&self, url: &str, name: &str) -> Result<()> {
        let path = Path::new(name);
        if self.backend.exists(path).await.or_raise(|| ErrorKind::Storage(name.to_string()))? {
            tracing::debug!(name, "Document already downloaded");
            return Ok(());
        }
        let fetched = self.client.get_bytes(url).await;
        tokio::time::sleep(self.delay).await;
        let bytes = fetched?;
        self.backend.write(path, &bytes).await.or_raise(|| ErrorKind::Storage(name.to_string()))?;
        tracing::info!(name, bytes = bytes.len(), "Downloaded document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racedocs_config::FetchSettings;
    use racedocs_storage::StorageBackend;
    use racedocs_storage::backend::MockBackend;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn downloader(backend: &Arc<MockBackend>) -> Downloader {
        Downloader::new(HttpClient::new(&FetchSettings::default()).unwrap(), backend.clone())
    }

    #[test]
    fn test_local_name_is_stable() {
        let name = local_name("https://www.fia.com/a.pdf");
        assert_eq!(name, local_name("https://www.fia.com/a.pdf"));
        assert_ne!(name, local_name("https://www.fia.com/b.pdf"));
        assert_eq!(name.len(), 20);
        assert!(name[..16].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_localize_downloads_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        let backend = Arc::new(MockBackend::default());
        let downloader = downloader(&backend);
        let remote = format!("{}/a.pdf", server.uri());
        let name = local_name(&remote);

        let mut document = Document::new(1, &remote, "A", "14.03.25 10:00");
        downloader.localize(&mut document).await;
        assert_eq!(document.href, format!("/files/{name}"));
        assert_eq!(document.original_href.as_deref(), Some(remote.as_str()));
        assert_eq!(backend.read(Path::new(&name)).await.unwrap(), b"%PDF-1.7");

        // Already on disk: relocated without another request.
        let mut again = Document::new(1, &remote, "A", "14.03.25 10:00");
        downloader.localize(&mut again).await;
        assert_eq!(again.href, document.href);
    }

    #[tokio::test]
    async fn test_delay_follows_network_downloads_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .mount(&server)
            .await;
        let backend = Arc::new(MockBackend::default());
        let delay = Duration::from_millis(300);
        let downloader = downloader(&backend).with_delay(delay);
        let remote = format!("{}/a.pdf", server.uri());

        let started = tokio::time::Instant::now();
        downloader.localize(&mut Document::new(1, &remote, "A", "14.03.25 10:00")).await;
        assert!(started.elapsed() >= delay);

        let started = tokio::time::Instant::now();
        downloader.localize(&mut Document::new(1, &remote, "A", "14.03.25 10:00")).await;
        assert!(started.elapsed() < delay);
    }

    #[tokio::test]
    async fn test_relocated_document_hashes_original_url() {
        let backend = Arc::new(MockBackend::default());
        let remote = "https://www.fia.com/a.pdf";
        backend.write(Path::new(&local_name(remote)), b"%PDF").await.unwrap();
        let mut document = Document::new(1, remote, "A", "14.03.25 10:00");
        document.relocate("/files/stale.pdf");
        downloader(&backend).localize(&mut document).await;
        assert_eq!(document.href, format!("/files/{}", local_name(remote)));
        assert_eq!(document.original_href.as_deref(), Some(remote));
    }

    #[tokio::test]
    async fn test_failed_download_keeps_remote_href() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(404)).mount(&server).await;
        let backend = Arc::new(MockBackend::default());
        let remote = format!("{}/missing.pdf", server.uri());
        let mut document = Document::new(1, &remote, "A", "14.03.25 10:00");
        downloader(&backend).localize(&mut document).await;
        assert_eq!(document.href, remote);
        assert_eq!(document.original_href, None);
        assert!(backend.paths().await.is_empty());
    }
}
