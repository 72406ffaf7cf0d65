//! Per-event document list fetching.

use crate::client::HttpClient;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use racedocs_extract::documents_from_payload;
use racedocs_extract::models::Document;
use tracing::instrument;

/// Path of the AJAX endpoint listing an event's documents, relative to the
/// site's base URL.
pub fn document_list_url(base_url: &str, event_id: u64) -> String {
    format!("{}/decision-document-list/ajax/{event_id}", base_url.trim_end_matches('/'))
}

/// Fetch the documents published for `event_id`.
///
/// Never fails: a timeout, an error status, an unparseable payload are all
/// logged and treated as "no documents", so a single bad event can't abort a
/// regeneration. Hrefs are returned as found upstream.
#[instrument(skip(client, base_url), fields(count))]
pub async fn fetch_docs_for(client: &HttpClient, base_url: &str, event_id: u64) -> Vec<Document> {
    match try_fetch_docs_for(client, base_url, event_id).await {
        Ok(documents) => {
            tracing::Span::current().record("count", documents.len());
            tracing::info!("Retrieved {} documents for event {event_id}", documents.len());
            documents
        },
        Err(e) => {
            tracing::error!(error = ?e, "Error fetching documents for event {event_id}");
            Vec::new()
        },
    }
}

async fn try_fetch_docs_for(client: &HttpClient, base_url: &str, event_id: u64) -> Result<Vec<Document>> {
    let payload = client.get_bytes(&document_list_url(base_url, event_id)).await?;
    documents_from_payload(event_id, payload).or_raise(|| ErrorKind::Extract)
}
