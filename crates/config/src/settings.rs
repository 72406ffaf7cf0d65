//! Layered runtime settings.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults,
//! 2. `racedocs.{toml,yaml,json}` in the platform config directory,
//! 3. `racedocs.{toml,yaml,json}` in the working directory,
//! 4. an explicit settings file (`--config`),
//! 5. the legacy `PORT` and `CACHE_TOKEN` variables,
//! 6. `RACEDOCS_*` environment variables, nested keys split on `__`
//!    (`RACEDOCS_FETCH__TIMEOUT_SECS=30`).

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APPLICATION: &str = "racedocs";
const ENV_PREFIX: &str = "RACEDOCS_";

pub const DEFAULT_SEASON_URL: &str =
    "https://www.fia.com/documents/championships/fia-formula-one-world-championship-14/season/season-2025-2071";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the local storage holding the cache file and downloads.
    pub data_dir: PathBuf,
    /// Event catalog (`baseUrl`, `eventIds`, `eventMappings`).
    pub catalog: PathBuf,
    /// Cache snapshot, relative to `data_dir`.
    pub cache_file: PathBuf,
    /// Shared secret for `POST /admin/regen`. Unset means the endpoint always
    /// refuses.
    pub cache_token: Option<String>,
    pub api: ListenSettings,
    pub pwa: ListenSettings,
    pub fetch: FetchSettings,
    /// Regenerate periodically while the API is running.
    pub schedule_secs: Option<u64>,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("data")),
            catalog: PathBuf::from("config.json"),
            cache_file: PathBuf::from("cache.json"),
            cache_token: None,
            api: ListenSettings::with_port(3000),
            pwa: ListenSettings::with_port(3001),
            fetch: FetchSettings::default(),
            schedule_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound for a single request, including synchronous regenerations.
    pub request_timeout_secs: u64,
}
impl ListenSettings {
    fn with_port(port: u16) -> Self {
        Self { host: "0.0.0.0".to_string(), port, request_timeout_secs: 300 }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `host:port`, suitable for binding a listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    /// Pause between two events during a regeneration.
    pub event_delay_ms: u64,
    pub user_agent: String,
    /// Season overview page used for event discovery.
    pub season_url: String,
    /// Download every PDF and serve it locally.
    pub download: bool,
    /// Download directory, relative to `data_dir`.
    pub download_dir: PathBuf,
    /// Pause after each downloaded PDF.
    pub download_delay_ms: u64,
}
impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            event_delay_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            season_url: DEFAULT_SEASON_URL.to_string(),
            download: false,
            download_dir: PathBuf::from("documents"),
            download_delay_ms: 500,
        }
    }
}
impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn event_delay(&self) -> Duration {
        Duration::from_millis(self.event_delay_ms)
    }

    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }
}

impl Settings {
    /// Load and validate settings from every source.
    ///
    /// An explicit `path` must exist; the implicit files are optional.
    #[tracing::instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings: Self = Self::figment(path)?.extract().or_raise(|| ErrorKind::Load)?;
        settings.validate()?;
        Ok(settings)
    }

    /// The merged provider chain, before extraction.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(dirs) = project_dirs() {
            figment = merge_files(figment, &dirs.config_dir().join(APPLICATION));
        }
        figment = merge_files(figment, Path::new(APPLICATION));
        if let Some(path) = path {
            if !path.is_file() {
                exn::bail!(ErrorKind::SettingsNotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "Using explicit settings file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
                Some("json") => figment.merge(Json::file_exact(path)),
                _ => figment.merge(Toml::file_exact(path)),
            };
        }
        Ok(figment
            .merge(Env::raw().only(&["PORT"]).map(|_| "api.port".into()))
            .merge(Env::raw().only(&["CACHE_TOKEN"]).map(|_| "cache_token".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.api.port == 0 {
            exn::bail!(invalid("api.port", "must be non-zero"));
        }
        if self.pwa.port == 0 {
            exn::bail!(invalid("pwa.port", "must be non-zero"));
        }
        if self.api.request_timeout_secs == 0 || self.pwa.request_timeout_secs == 0 {
            exn::bail!(invalid("request_timeout_secs", "must be greater than zero"));
        }
        if self.fetch.timeout_secs == 0 {
            exn::bail!(invalid("fetch.timeout_secs", "must be greater than zero"));
        }
        if self.schedule_secs == Some(0) {
            exn::bail!(invalid("schedule_secs", "must be greater than zero"));
        }
        if self.cache_file.as_os_str().is_empty() {
            exn::bail!(invalid("cache_file", "must not be empty"));
        }
        validate_url("fetch.season_url", &self.fetch.season_url)?;
        Ok(())
    }

    /// `data_dir` as an absolute path, resolved against the working directory.
    pub fn data_root(&self) -> Result<PathBuf> {
        std::path::absolute(&self.data_dir).or_raise(|| invalid("data_dir", "cannot be made absolute"))
    }
}

fn merge_files(figment: Figment, stem: &Path) -> Figment {
    figment
        .merge(Toml::file(stem.with_extension("toml")))
        .merge(Yaml::file(stem.with_extension("yaml")))
        .merge(Json::file(stem.with_extension("json")))
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ErrorKind {
    ErrorKind::Invalid { field, reason: reason.into() }
}

/// Accepts only absolute `http` and `https` URLs.
pub fn validate_url(field: &'static str, value: &str) -> Result<Url> {
    let url = Url::parse(value).or_raise(|| invalid(field, format!("`{value}` is not a URL")))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => exn::bail!(invalid(field, format!("`{value}` is not an http(s) URL"))),
    }
}
