use scraper::Html;
use tracing::instrument;

use super::trimmed_text;
use crate::consts;
use crate::models::{EventInfo, absolute_href};

/// The championship season overview page, listing the season's events.
///
/// The page layout is not stable between seasons, so discovery casts a wide
/// net: event links, event literals in inline scripts, then `data-*`
/// attributes. The first sighting of an event ID wins.
#[derive(Debug)]
pub struct SeasonPage {
    document: Html,
}
impl SeasonPage {
    pub fn from_html(html: &str) -> Self {
        Self { document: Html::parse_document(html) }
    }

    /// Discovers events, resolving relative links against `origin`
    /// (e.g. `https://www.example.org`).
    #[instrument(skip(self), fields(count))]
    pub fn events(&self, origin: &str) -> Vec<EventInfo> {
        let mut events = Events::default();
        self.links(origin, &mut events);
        self.scripts(origin, &mut events);
        self.data_attributes(origin, &mut events);
        tracing::Span::current().record("count", events.0.len());
        events.0
    }

    fn links(&self, origin: &str, events: &mut Events) {
        for selector in consts::EVENT_LINK_SELECTORS.iter() {
            for element in self.document.select(selector) {
                let Some(href) = element.value().attr("href").filter(|href| !href.is_empty()) else {
                    continue;
                };
                let name = trimmed_text(&element);
                if name.is_empty() {
                    continue;
                }
                let Some(id) = consts::HREF_ID_REGEX
                    .captures(href)
                    .and_then(|captures| captures.get(1))
                    .and_then(|id| id.as_str().parse::<u64>().ok())
                else {
                    continue;
                };
                let url = match href.starts_with('/') {
                    true => absolute_href(origin, href),
                    false => href.to_string(),
                };
                events.push(EventInfo::new(id, name, url));
            }
        }
    }

    fn scripts(&self, origin: &str, events: &mut Events) {
        for script in self.document.select(&consts::SCRIPT_SELECTOR) {
            let content = script.text().collect::<String>();
            if !(content.contains("event") || content.contains("race")) {
                continue;
            }
            for captures in consts::SCRIPT_EVENT_OBJECT_REGEX.captures_iter(&content) {
                let (Some(id), Some(name)) = (captures.get(1), captures.get(2)) else {
                    continue;
                };
                if let Ok(id) = id.as_str().parse::<u64>() {
                    events.push(EventInfo::new(id, name.as_str(), event_url(origin, id)));
                }
            }
            for captures in consts::SCRIPT_EVENT_ID_REGEX.captures_iter(&content) {
                let Some(id_match) = captures.get(1) else {
                    continue;
                };
                let Ok(id) = id_match.as_str().parse::<u64>() else {
                    continue;
                };
                if events.contains(id) {
                    continue;
                }
                let name = nearby_event_name(&content, id_match.start()).unwrap_or_else(|| format!("Event {id}"));
                events.push(EventInfo::new(id, name, event_url(origin, id)));
            }
        }
    }

    fn data_attributes(&self, origin: &str, events: &mut Events) {
        for element in self.document.select(&consts::DATA_EVENT_SELECTOR) {
            let Some(id) = consts::DATA_EVENT_ATTRIBUTES
                .iter()
                .filter_map(|attr| element.value().attr(attr))
                .find(|value| !value.trim().is_empty())
                .and_then(|value| value.trim().parse::<u64>().ok())
            else {
                continue;
            };
            let name = trimmed_text(&element);
            if !name.is_empty() {
                events.push(EventInfo::new(id, name, event_url(origin, id)));
            }
        }
    }
}

/// Insertion-ordered, ID-deduplicated list of discovered events.
#[derive(Default)]
struct Events(Vec<EventInfo>);
impl Events {
    fn contains(&self, id: u64) -> bool {
        self.0.iter().any(|event| event.id == id)
    }

    fn push(&mut self, event: EventInfo) {
        // Zero is never a real event ID, it's what broken markup parses to.
        if event.id != 0 && !self.contains(event.id) {
            tracing::debug!(event_id = event.id, name = %event.name, "Discovered event");
            self.0.push(event);
        }
    }
}

fn event_url(origin: &str, id: u64) -> String {
    format!("{origin}/event/{id}")
}

/// Looks for a quoted event-ish name (grand prix, test, practice) within a
/// window of bytes around `position`.
fn nearby_event_name(content: &str, position: usize) -> Option<String> {
    let mut start = position.saturating_sub(consts::SCRIPT_NAME_WINDOW);
    while !content.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (position + consts::SCRIPT_NAME_WINDOW).min(content.len());
    while !content.is_char_boundary(end) {
        end += 1;
    }
    consts::SCRIPT_EVENT_NAME_REGEX
        .captures(&content[start..end])
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
}
