use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Marker that identifies the `insert` command carrying the document list.
pub(crate) const DOCUMENT_LIST_MARKER: &str = "document-type-wrapper";
pub(crate) const INSERT_COMMAND: &str = "insert";

// Document list fragment.
selector!(DOCUMENT_ROW_SELECTOR, "li.document-row");
selector!(ANCHOR_SELECTOR, "a");
selector!(TITLE_SELECTOR, ".title");
selector!(PUBLISHED_SELECTOR, ".published .date-display-single");

// Publish timestamps look like "01.06.25 19:22" (day.month.year hour:minute).
regex!(PUBLISHED_REGEX, r"^(\d{1,2})\.(\d{1,2})\.(\d{2})\s+(\d{1,2}):(\d{2})$");

// Season page event discovery, tried in order.
pub(crate) static EVENT_LINK_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"a[href*="/event/"]"#,
        r#"a[href*="/documents/"]"#,
        ".event-link",
        ".race-link",
        ".grand-prix",
        ".event-item",
        ".championship-event",
        r#"a[href*="event-"]"#,
        r#"a[href*="race-"]"#,
        r#"a[href*="/session/"]"#,
        r#"a[href*="/weekend/"]"#,
    ]
    .into_iter()
    .map(|css| Selector::parse(css).unwrap())
    .collect()
});
selector!(SCRIPT_SELECTOR, "script");
selector!(DATA_EVENT_SELECTOR, "[data-event-id], [data-event], [data-race-id]");
pub(crate) const DATA_EVENT_ATTRIBUTES: [&str; 3] = ["data-event-id", "data-event", "data-race-id"];
regex!(HREF_ID_REGEX, r"/(\d+)(?:/|$)");
regex!(
    SCRIPT_EVENT_OBJECT_REGEX,
    r#"(?i)\{\s*(?:event_?id|eventId|id)\s*:\s*(\d+)\s*,\s*(?:name|title)\s*:\s*["']([^"']+)["']"#
);
regex!(SCRIPT_EVENT_ID_REGEX, r#"(?i)["']?(?:event_?id|eventId|id)["']?\s*:\s*(\d+)"#);
regex!(SCRIPT_EVENT_NAME_REGEX, r#"(?i)["']([^"']*(?:grand\s*prix|test|practice)[^"']*)["']"#);
/// Bytes either side of a bare event ID searched for a plausible event name.
pub(crate) const SCRIPT_NAME_WINDOW: usize = 200;
