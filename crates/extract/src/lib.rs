mod consts;
pub mod error;
mod extract;
pub mod models;
mod payload;

use tracing::instrument;

use crate::error::Result;
pub use crate::extract::{DocumentList, SeasonPage};
use crate::models::{Document, EventInfo};
pub use crate::payload::document_list_fragment;

/// Easy, top-level entrypoint for the extraction of [`Document`]s from the
/// raw bytes of an AJAX document list response.
///
/// - A payload without a document list yields no documents, and
/// - a payload that isn't a JSON command array is an error.
///
/// Hrefs are returned exactly as found; see [`Document::absolutize`].
#[instrument(skip(payload), fields(payload_size = payload.as_ref().len()))]
pub fn documents_from_payload(event_id: u64, payload: impl AsRef<[u8]>) -> Result<Vec<Document>> {
    Ok(match document_list_fragment(payload.as_ref())? {
        Some(fragment) => DocumentList::from_html(event_id, &fragment).documents(),
        None => Vec::new(),
    })
}

/// Discovers the events listed on a season overview page.
pub fn events_from_page(html: &str, origin: &str) -> Vec<EventInfo> {
    SeasonPage::from_html(html).events(origin)
}
