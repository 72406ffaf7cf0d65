//! Path validation.
//!
//! Every path handed to a backend is relative to the backend root. Paths
//! reaching the storage layer may originate from HTTP requests (`/files/...`),
//! so they are validated before they ever touch the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a storage path and returns its normalized form.
///
/// Ensures that paths don't escape the storage root: `..` may only cancel out
/// a preceding segment. Empty paths, null bytes and platform prefixes are
/// rejected with [`InvalidPath`](crate::error::ErrorKind::InvalidPath).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use racedocs_storage::validate_path;
/// // Valid paths
/// assert!(validate_path("cache.json").is_ok());
/// assert!(validate_path("documents/0123abcd.pdf").is_ok());
/// assert!(validate_path("documents/../cache.json").is_ok()); // (never leaves the root)
/// // Invalid paths
/// assert!(validate_path("../etc/passwd").is_err());
/// assert!(validate_path("documents/../../secret").is_err());
/// assert!(validate_path("a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(
///     validate_path("documents/./x/../file.pdf/").unwrap(),
///     Path::new("documents/file.pdf")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert_eq!(validate("cache.json").unwrap(), Path::new("cache.json"));
        assert_eq!(validate("documents/abc.pdf").unwrap(), Path::new("documents/abc.pdf"));
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(validate("a//b//c").unwrap(), Path::new("a/b/c"));
        assert_eq!(validate("a/./b/./c").unwrap(), Path::new("a/b/c"));
        assert_eq!(validate("documents/").unwrap(), Path::new("documents"));
        // Leading slashes are treated as relative to the root.
        assert_eq!(validate("/cache.json").unwrap(), Path::new("cache.json"));
    }

    #[test]
    fn test_traversal_attempts() {
        assert!(validate("../etc/passwd").is_err());
        assert!(validate("a/../../b").is_err());
        assert!(validate("..").is_err());
        assert!(validate("../..").is_err());
        assert_eq!(validate("a/b/..").unwrap(), Path::new("a"));
    }

    #[test]
    fn test_invalid_paths() {
        assert!(validate("a\0b").is_err());
        assert!(validate("").is_err());
        assert!(validate(".").is_err());
        assert!(validate("./.").is_err());
        assert!(validate("//").is_err());
    }
}
