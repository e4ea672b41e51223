//! User-created sighting log entries.
//!
//! Log entries are never produced by the bulk loader; they are written
//! later through the router like any other resource.

use crate::model::wildlife::WildlifeId;
use crate::router::Record;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a log entry row.
pub type LogEntryId = i64;

/// One recorded sighting of a wildlife species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Option<LogEntryId>,
    pub wildlife_id: WildlifeId,
    /// Sighting time in Unix epoch milliseconds.
    pub logged_at: i64,
    pub notes: String,
}

impl LogEntry {
    pub fn new(wildlife_id: WildlifeId, logged_at: i64, notes: impl Into<String>) -> Self {
        Self {
            id: None,
            wildlife_id,
            logged_at,
            notes: notes.into(),
        }
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("wildlife_id", Value::Integer(self.wildlife_id))
            .with("logged_at", Value::Integer(self.logged_at))
            .with("notes", Value::Text(self.notes.clone()))
    }
}
