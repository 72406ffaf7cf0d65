//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, a unified interface over
//! where the cache snapshot and downloaded documents live. The local
//! filesystem is the only real backend; the others decorate it.

mod filter;
mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::filter::ExtensionBackend;
pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Unified interface for storage backends.
///
/// # Path Handling
/// All paths are relative to the storage root and must be validated using
/// [`validate_path`](crate::validate_path) before use. Implementations should
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use racedocs_storage::{backend::StorageBackend, error::Result};
///
/// async fn snapshot_size(backend: &dyn StorageBackend) -> Result<u64> {
///     let path = Path::new("cache.json");
///     if backend.exists(path).await? {
///         let data = backend.read(path).await?;
///         Ok(data.len() as u64)
///     } else {
///         Ok(0)
///     }
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// Check if a file exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Read file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write file contents.
    ///
    /// Creates a new file or overwrites an existing file with the provided data.
    ///
    /// # Notes
    /// - Implementations should create parent directories as needed.
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Delete a file.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn delete(&self, path: &Path) -> Result<()>;

    /// Rename/move a file within the same backend.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the source
    /// file does not exist.
    ///
    /// # Notes
    /// - Implementations should create parent directories as needed
    /// - If the destination already exists, it will be overwritten
    ///
    /// # Examples
    ///
    /// Writers that must never expose a half-written file write to a
    /// temporary name first:
    ///
    /// ```no_run
    /// use std::path::Path;
    /// # use racedocs_storage::{backend::StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    /// backend.write(Path::new("cache.json.tmp"), b"{}").await?;
    /// backend.rename(Path::new("cache.json.tmp"), Path::new("cache.json")).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}
