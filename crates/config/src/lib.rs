mod catalog;
pub mod error;
mod settings;

pub use crate::catalog::EventCatalog;
pub use crate::settings::{
    DEFAULT_SEASON_URL, DEFAULT_USER_AGENT, FetchSettings, ListenSettings, Settings, validate_url,
};
