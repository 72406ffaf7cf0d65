//! JSON snapshot cache of every scraped document.
//!
//! The cache is a single file holding the documents of the last regeneration
//! and when it finished. It is not the source of truth - the upstream site
//! is. If the file is deleted, the next regeneration rebuilds it.

pub mod error;
mod query;
mod snapshot;

pub use crate::query::Query;
pub use crate::snapshot::{CacheStore, Snapshot};
pub(crate) use racedocs_extract::models::Document;
