mod document;
mod event;
mod published;

pub use self::document::{Document, UNKNOWN_EVENT, absolute_href};
pub use self::event::EventInfo;
pub use self::published::Published;
