//! CSS-selector extraction over upstream HTML.

mod documents;
mod events;

pub use self::documents::DocumentList;
pub use self::events::SeasonPage;

use scraper::ElementRef;

/// Whitespace-trimmed text content of an element.
fn trimmed_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
