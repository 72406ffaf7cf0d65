//! Filtering and ordering of cached documents for display.

use crate::Document;
use serde::Deserialize;
use std::cmp::Reverse;

/// Optional filters; the `?event=&search=` query string of `GET /documents`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Query {
    pub event: Option<u64>,
    pub search: Option<String>,
}
impl Query {
    /// `true` if neither filter is set. A blank search counts as unset.
    pub fn is_empty(&self) -> bool {
        self.event.is_none() && self.search.as_deref().is_none_or(|s| s.trim().is_empty())
    }

    /// Documents that can be displayed and match every filter, newest first.
    ///
    /// Documents without a title, href or event name are never displayable.
    /// Documents with an unreadable publish date keep their relative order
    /// after all dated ones.
    pub fn apply(&self, documents: &[Document]) -> Vec<Document> {
        let needle = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase);
        let mut matches: Vec<Document> = documents
            .iter()
            .filter(|doc| !doc.title.is_empty() && !doc.href.is_empty())
            .filter(|doc| doc.event_name.as_deref().is_some_and(|name| !name.is_empty()))
            .filter(|doc| self.event.is_none_or(|event| doc.event_id == event))
            .filter(|doc| match &needle {
                Some(needle) => {
                    doc.title.to_lowercase().contains(needle)
                        || doc.event_name.as_deref().is_some_and(|name| name.to_lowercase().contains(needle))
                },
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by_key(|doc| Reverse(doc.published_at()));
        matches
    }
}
