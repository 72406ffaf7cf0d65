//! Where the cache snapshot and downloaded documents live.
//!
//! Everything above this crate talks to a [`BackendHandle`], so the binary
//! decides whether that is the local disk, a read-only view of it for dry
//! runs, or an in-memory map in tests.

pub mod backend;
pub mod error;
mod path;

pub use crate::backend::StorageBackend;
pub use crate::path::validate as validate_path;
use std::sync::Arc;

/// Shared, type-erased backend.
pub type BackendHandle = Arc<dyn StorageBackend + Send + Sync>;
