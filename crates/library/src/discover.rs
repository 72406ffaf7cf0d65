//! Event discovery from the season overview page.

use crate::client::HttpClient;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use racedocs_config::EventCatalog;
use racedocs_extract::events_from_page;
use racedocs_extract::models::EventInfo;
use std::path::Path;
use tracing::instrument;
use url::Url;

/// Where to read the season overview page from.
#[derive(Debug, Clone, Copy)]
pub enum SeasonSource<'a> {
    Remote,
    /// A saved copy of the page, for testing selectors offline.
    File(&'a Path),
}

/// Find every event listed on the season page at `season_url`.
///
/// Relative event links are resolved against the origin of `season_url`,
/// even when the page itself is read from a file.
#[instrument(skip(client), fields(season_url = %season_url, count))]
pub async fn discover_events(client: &HttpClient, season_url: &Url, source: SeasonSource<'_>) -> Result<Vec<EventInfo>> {
    let html = match source {
        SeasonSource::Remote => client.get_text(season_url.as_str()).await?,
        SeasonSource::File(path) => {
            tracing::info!(path = %path.display(), "Using saved season page");
            tokio::fs::read_to_string(path).await.or_raise(|| ErrorKind::SeasonPage)?
        },
    };
    let origin = season_url.origin().ascii_serialization();
    let events = events_from_page(&html, &origin);
    tracing::Span::current().record("count", events.len());
    Ok(events)
}

/// Outcome of merging discovered events into the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogUpdate {
    /// Event IDs that weren't catalogued before, in discovery order.
    pub added: Vec<u64>,
    /// Event IDs in the catalog after the merge.
    pub total: usize,
    /// Whether the catalog file was rewritten.
    pub saved: bool,
}

/// Merge `events` into the catalog at `path`.
///
/// The catalog is only rewritten when new event IDs were found, or when
/// `force` is set (names of known events are refreshed either way, but only
/// persisted alongside a save). Finding no events at all leaves the catalog
/// untouched.
#[instrument(skip(events), fields(events = events.len()))]
pub fn update_catalog(path: &Path, events: &[EventInfo], force: bool) -> Result<CatalogUpdate> {
    let mut catalog = EventCatalog::load(path).or_raise(|| ErrorKind::Catalog)?;
    if events.is_empty() {
        tracing::info!("No events found on the page. Catalog will not be updated.");
        return Ok(CatalogUpdate { total: catalog.event_ids.len(), ..CatalogUpdate::default() });
    }
    let added = catalog.merge_events(events.iter().map(|event| (event.id, event.name.clone())));
    for id in &added {
        tracing::info!(event_id = id, name = catalog.event_name(*id), "New event");
    }
    let saved = !added.is_empty() || force;
    if saved {
        catalog.save(path).or_raise(|| ErrorKind::Catalog)?;
    } else {
        tracing::info!("No new events to add. Catalog unchanged.");
    }
    Ok(CatalogUpdate { added, total: catalog.event_ids.len(), saved })
}
