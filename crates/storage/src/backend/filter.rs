//! Extension-filtered storage backend decorator.
//!
//! Wraps another backend and restricts all operations to files with a single
//! permitted extension. The document file route serves downloads through this
//! so that nothing but PDFs can ever be read from the download directory.

use crate::error::ErrorKind;
use crate::{BackendHandle, StorageBackend, error::Result};
use async_trait::async_trait;
use std::path::Path;

/// Extension-filtered storage backend.
///
/// Paths whose extension does not match (case-insensitively) return
/// [`FilteredPath`](ErrorKind::FilteredPath).
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use racedocs_storage::backend::{ExtensionBackend, LocalBackend};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let local = LocalBackend::new("documents", "/var/lib/racedocs/documents")?;
/// let pdfs = ExtensionBackend::new(Arc::new(local), "pdf");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ExtensionBackend {
    inner: BackendHandle,
    extension: &'static str,
}
impl ExtensionBackend {
    pub fn new(inner: BackendHandle, extension: &'static str) -> Self {
        Self { inner, extension }
    }

    fn permits(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension))
    }

    fn check(&self, path: &Path) -> Result<()> {
        if !self.permits(path) {
            exn::bail!(ErrorKind::FilteredPath(path.to_path_buf()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for ExtensionBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        self.check(path)?;
        self.inner.exists(path).await
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.check(path)?;
        self.inner.read(path).await
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.check(path)?;
        self.inner.write(path, data).await
    }

    async fn delete(&self, path: &Path) -> Result<()> {
        self.check(path)?;
        self.inner.delete(path).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        self.inner.rename(from, to).await
    }
}
