//! HTML pages and the service worker, rendered from [upon] templates.
//!
//! Every template value is HTML-escaped (upon's own default doesn't escape,
//! so the engine is switched to `escape_html`). Data embedded
//! in `<script>` elements goes through the `script` formatter instead, which
//! keeps JSON intact but can't close the element early.

use crate::assets::Templates;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use racedocs_extract::models::Document;
use std::collections::BTreeMap;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::instrument;
use upon::{Engine, Value, fmt as upon_fmt};

const INDEX: &str = "index.html";
const LOADING: &str = "loading.html";
const API_INDEX: &str = "api.html";
const SERVICE_WORKER: &str = "service-worker.js";

pub const TITLE: &str = "Race Documents";
/// Seconds before the loading page reloads itself.
pub const LOADING_REFRESH_SECS: u64 = 5;

const UPDATED_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

/// Data shown by the document browser.
pub struct IndexPage<'a> {
    /// Documents in display order.
    pub documents: &'a [Document],
    /// Event ID to name, offered as filter options.
    pub events: &'a BTreeMap<u64, String>,
    /// When the snapshot was taken.
    pub updated: OffsetDateTime,
}

/// Compiled page templates.
pub struct Pages {
    engine: Engine<'static>,
}

impl Pages {
    /// Compile every embedded template.
    pub fn new() -> Result<Self> {
        let mut engine = Engine::new();
        engine.set_default_formatter(&upon_fmt::escape_html);
        engine.add_formatter("script", script_formatter);
        for name in [INDEX, LOADING, API_INDEX, SERVICE_WORKER] {
            // Compile early so a broken template fails at startup rather than per request.
            engine.add_template(name, Templates::source(name)?).or_raise(|| ErrorKind::Template(name))?;
        }
        Ok(Self { engine })
    }

    fn render(&self, name: &'static str, context: Value) -> Result<String> {
        self.engine
            .get_template(name)
            .ok_or_raise(|| ErrorKind::Template(name))?
            .render(context)
            .to_string()
            .or_raise(|| ErrorKind::Template(name))
    }

    /// The document browser.
    #[instrument(skip_all, fields(documents = page.documents.len()))]
    pub fn index(&self, page: &IndexPage<'_>) -> Result<String> {
        let documents = serde_json::to_string(page.documents).or_raise(|| ErrorKind::Serialize)?;
        let events: Vec<Value> = page
            .events
            .iter()
            .map(|(id, name)| upon::value! { id: *id, name: name.as_str() })
            .collect();
        let updated = page
            .updated
            .to_offset(UtcOffset::UTC)
            .format(UPDATED_FORMAT)
            .or_raise(|| ErrorKind::Serialize)?;
        self.render(
            INDEX,
            upon::value! {
                title: TITLE,
                updated: updated,
                count: page.documents.len() as u64,
                events: events,
                documents: documents,
            },
        )
    }

    /// Placeholder shown while the first snapshot is being built.
    pub fn loading(&self) -> Result<String> {
        self.render(LOADING, upon::value! { title: TITLE, refresh: LOADING_REFRESH_SECS })
    }

    /// Landing page of the JSON API.
    pub fn api_index(&self) -> Result<String> {
        self.render(API_INDEX, upon::value! { title: TITLE })
    }

    /// The service worker script, its cache name tied to the package version.
    pub fn service_worker(&self) -> Result<String> {
        self.render(SERVICE_WORKER, upon::value! { version: env!("CARGO_PKG_VERSION") })
    }
}

/// Formats strings for inclusion inside a `<script>` element.
///
/// Script contents aren't entity-decoded, so HTML escaping would corrupt
/// them. Instead, the characters that could end the element or open a
/// comment are replaced by their JSON/JS unicode escapes.
fn script_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
    use std::fmt::Write;
    match value {
        Value::String(s) => {
            for c in s.chars() {
                match c {
                    '<' => f.write_str("\\u003c")?,
                    '>' => f.write_str("\\u003e")?,
                    '&' => f.write_str("\\u0026")?,
                    c => f.write_char(c)?,
                }
            }
        },
        v => upon_fmt::default(f, v)?,
    };
    Ok(())
}
