use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A person's standup note for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    #[serde(default)]
    pub today: String,
}

/// The daily logs document: `YYYY-MM-DD` → person → entry.
pub type DailyLogs = BTreeMap<String, BTreeMap<String, DailyEntry>>;

/// What the standup board shows for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBox {
    pub person: String,
    pub date: String,
    /// Yesterday's note, read-only on the board.
    pub yesterday: String,
    pub today: String,
}

/// Input for writing today's note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyUpdateInput {
    pub today: String,
}
