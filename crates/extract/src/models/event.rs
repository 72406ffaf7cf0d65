use std::fmt::{Display, Formatter, Result as FmtResult};

/// A racing event found on the season overview page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventInfo {
    pub id: u64,
    pub name: String,
    pub url: String,
}
impl EventInfo {
    pub fn new(id: u64, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { id, name: name.into(), url: url.into() }
    }
}

impl Display for EventInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.id, self.name)
    }
}
