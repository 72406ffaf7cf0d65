mod assets;
pub mod error;
mod manifest;
mod pages;

pub use crate::assets::{Asset, StaticAssets};
pub use crate::manifest::manifest;
pub use crate::pages::{IndexPage, LOADING_REFRESH_SECS, Pages, TITLE};
