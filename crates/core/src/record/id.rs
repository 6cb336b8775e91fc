//! Record identifiers.
//!
//! Identifiers are UUIDv7: time-ordered, generated in-process at creation and
//! never reissued, so a deleted record's id can not come back.
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn generate() -> Self {
        RecordId(Uuid::now_v7())
    }

    /// Parse a caller-supplied id. Returns `None` for anything that is not a
    /// well-formed identifier; callers report that as "not found".
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(RecordId)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        RecordId(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct_and_ordered() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn parse_accepts_display_form() {
        let id = RecordId::generate();
        assert_eq!(RecordId::parse(&id.to_string()), Some(id));
        assert_eq!(RecordId::parse(&format!(" {id} ")), Some(id));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(RecordId::parse("missing-id"), None);
        assert_eq!(RecordId::parse(""), None);
    }
}
