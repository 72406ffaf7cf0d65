use serde::{Deserialize, Serialize};

use super::Published;

/// Placeholder name for events missing from the catalog mappings.
pub const UNKNOWN_EVENT: &str = "Unknown Event";

/// A regulatory document published for a single event.
///
/// Serialized in the same camelCase shape the cache file and the HTTP API
/// have always used, so existing cache snapshots keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub event_id: u64,
    /// Where the document can be fetched from: the upstream URL, or a local
    /// `/files/...` path once the PDF has been downloaded.
    pub href: String,
    /// Upstream URL, kept once `href` points at a local copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_href: Option<String>,
    pub title: String,
    /// Publish timestamp exactly as displayed upstream (`DD.MM.YY HH:MM`).
    pub published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}
impl Document {
    pub fn new(
        event_id: u64,
        href: impl Into<String>,
        title: impl Into<String>,
        published: impl Into<String>,
    ) -> Self {
        Self {
            event_id,
            href: href.into(),
            original_href: None,
            title: title.into(),
            published: published.into(),
            event_name: None,
        }
    }

    /// Rewrites a site-relative `href` into an absolute URL under `base_url`.
    pub fn absolutize(&mut self, base_url: &str) {
        self.href = absolute_href(base_url, &self.href);
    }

    /// Parsed publish timestamp, if the upstream text is well-formed.
    pub fn published_at(&self) -> Option<Published> {
        self.published.parse().ok()
    }

    /// Points the document at a local copy, remembering where it came from.
    pub fn relocate(&mut self, local_href: impl Into<String>) {
        let original = std::mem::replace(&mut self.href, local_href.into());
        self.original_href.get_or_insert(original);
    }
}

/// Joins a site-relative `href` onto `base_url`.
///
/// Hrefs starting with `/` are appended directly; anything else gets a `/`
/// separator. Upstream only ever serves site-relative paths here, so hrefs
/// that are already absolute are treated the same way.
pub fn absolute_href(base_url: &str, href: &str) -> String {
    match href.starts_with('/') {
        true => format!("{base_url}{href}"),
        false => format!("{base_url}/{href}"),
    }
}
