//! The AJAX document list endpoint answers with a JSON array of commands for
//! the site's front-end. Only one of them matters: the `insert` command whose
//! `data` is the HTML fragment containing the document list.

use exn::ResultExt;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};

#[derive(Debug, Deserialize)]
struct Command {
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    data: Value,
}
impl Command {
    fn document_list(self) -> Option<String> {
        if self.command.as_deref() != Some(consts::INSERT_COMMAND) {
            return None;
        }
        match self.data {
            Value::String(html) if html.contains(consts::DOCUMENT_LIST_MARKER) => Some(html),
            _ => None,
        }
    }
}

/// Finds the HTML fragment holding the document list in a command payload.
///
/// Returns `Ok(None)` when the payload is well-formed but carries no document
/// list (events without any published documents look like this).
#[instrument(skip(payload), fields(payload_size = payload.len()))]
pub fn document_list_fragment(payload: &[u8]) -> Result<Option<String>> {
    // Entries that aren't objects (or have unexpected shapes) are ignored
    // rather than failing the whole payload.
    let commands: Vec<Value> = serde_json::from_slice(payload).or_raise(|| ErrorKind::MalformedPayload)?;
    Ok(commands
        .into_iter()
        .filter_map(|value| serde_json::from_value::<Command>(value).ok())
        .find_map(Command::document_list))
}
