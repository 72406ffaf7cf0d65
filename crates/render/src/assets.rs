//! Embedded assets.
//!
//! Page templates and static files are embedded into the binary at compile
//! time using [`rust-embed`](rust_embed).

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use rust_embed::Embed;
use std::borrow::Cow;

#[derive(Embed)]
#[folder = "../../assets/templates/"]
pub(crate) struct Templates;
impl Templates {
    pub(crate) fn source(name: &'static str) -> Result<String> {
        let file = Self::get(name).ok_or_raise(|| ErrorKind::AssetNotFound(name.to_string()))?;
        String::from_utf8(file.data.into_owned()).ok().ok_or_raise(|| ErrorKind::Template(name))
    }
}

/// Static files served under `/assets/`.
#[derive(Embed)]
#[folder = "../../assets/static/"]
pub struct StaticAssets;

/// An embedded static file.
pub struct Asset {
    pub data: Cow<'static, [u8]>,
    pub mime: String,
}

impl StaticAssets {
    /// Load a static file by its path relative to `/assets/`.
    pub fn load(path: impl AsRef<str>) -> Option<Asset> {
        let path = path.as_ref().trim_start_matches('/');
        Self::get(path).map(|file| Asset {
            mime: file.metadata.mimetype().to_string(),
            data: file.data,
        })
    }
}
