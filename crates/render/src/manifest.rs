//! Web app manifest.

use crate::pages::TITLE;
use serde_json::{Value, json};

/// The `/manifest.json` document making the browser installable.
pub fn manifest() -> Value {
    json!({
        "name": TITLE,
        "short_name": "Race Docs",
        "description": "Regulatory documents per racing event",
        "start_url": "/",
        "display": "standalone",
        "background_color": "#15151E",
        "theme_color": "#E10600",
        "icons": [
            { "src": "/assets/icon.svg", "sizes": "any", "type": "image/svg+xml" },
            { "src": "/assets/icon.svg", "sizes": "any", "type": "image/svg+xml", "purpose": "maskable" },
        ],
    })
}
