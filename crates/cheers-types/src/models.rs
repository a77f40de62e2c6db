use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub sprint_code: String,
    pub sprint_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub message: String,
}

/// A congratulatory message before the store has assigned it an id.
///
/// `sprint_title` is copied from the sprint at composition time so later
/// sprint edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub username: String,
    pub sprint_code: String,
    pub congratulatory_message: String,
    pub sprint_title: String,
    pub gif_url: String,
    pub timestamp: DateTime<Utc>,
}

impl NewMessage {
    pub fn with_id(self, id: i64) -> CongratulatoryMessage {
        CongratulatoryMessage {
            id,
            username: self.username,
            sprint_code: self.sprint_code,
            congratulatory_message: self.congratulatory_message,
            sprint_title: self.sprint_title,
            gif_url: self.gif_url,
            timestamp: self.timestamp,
        }
    }
}

/// A persisted celebration. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CongratulatoryMessage {
    pub id: i64,
    pub username: String,
    pub sprint_code: String,
    pub congratulatory_message: String,
    pub sprint_title: String,
    pub gif_url: String,
    pub timestamp: DateTime<Utc>,
}
