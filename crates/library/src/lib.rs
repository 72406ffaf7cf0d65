//! The regeneration pipeline.
//!
//! Fetch each catalogued event's document list from the upstream site,
//! extract the documents, optionally download the PDFs, and write the result
//! to the cache snapshot. Also home to event discovery, which keeps the
//! catalog itself up to date.

mod client;
mod discover;
mod download;
pub mod error;
mod fetch;
mod regen;

pub use crate::client::HttpClient;
pub use crate::discover::{CatalogUpdate, SeasonSource, discover_events, update_catalog};
pub use crate::download::{Downloader, FILES_ROUTE, local_name};
pub use crate::fetch::{document_list_url, fetch_docs_for};
pub use crate::regen::Regenerator;
