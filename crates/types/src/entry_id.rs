use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an entry in an ordered list (a lab result or a treatment).
///
/// Identity is by id, position is by list order: removing an entry never renumbers or reuses
/// the ids of the entries that remain. Generated ids are hyphenated UUID v4 strings; ids
/// supplied by clients are accepted verbatim so drafts round-trip through JSON unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generates a fresh, locally unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
