use scraper::{ElementRef, Html};
use tracing::instrument;

use super::trimmed_text;
use crate::consts;
use crate::models::Document;

/// The document list fragment of a single event.
#[derive(Debug)]
pub struct DocumentList {
    event_id: u64,
    fragment: Html,
}
impl DocumentList {
    pub fn from_html(event_id: u64, html: &str) -> Self {
        Self { event_id, fragment: Html::parse_fragment(html) }
    }

    /// Extracts every well-formed document row, in page order.
    ///
    /// A row needs an anchor with an `href`, a `.title` and a
    /// `.published .date-display-single` inside that anchor. Rows missing any
    /// of these are skipped, never reported as errors: the upstream markup
    /// sometimes contains placeholder rows.
    #[instrument(skip(self), fields(event_id = self.event_id, count))]
    pub fn documents(&self) -> Vec<Document> {
        let documents: Vec<Document> =
            self.fragment.select(&consts::DOCUMENT_ROW_SELECTOR).filter_map(|row| self.row(row)).collect();
        tracing::Span::current().record("count", documents.len());
        documents
    }

    fn row(&self, row: ElementRef<'_>) -> Option<Document> {
        let anchor = row.select(&consts::ANCHOR_SELECTOR).next()?;
        let href = anchor.value().attr("href")?;
        let title = anchor.select(&consts::TITLE_SELECTOR).next()?;
        let published = anchor.select(&consts::PUBLISHED_SELECTOR).next()?;
        Some(Document::new(self.event_id, href, trimmed_text(&title), trimmed_text(&published)))
    }
}
