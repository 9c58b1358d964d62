#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use uuid::Uuid;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, EnumIter, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single entry in the chat log. Messages are never edited after creation,
/// the session only ever appends them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message::new_at(role, content, Utc::now());
    }

    pub fn new_at(role: Role, content: &str, timestamp: DateTime<Utc>) -> Message {
        return Message {
            id: Message::create_id(),
            role,
            content: content.to_string(),
            timestamp,
        };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4().to_string();
    }

    /// Messages that belong to the conversation with the model. System
    /// messages are local notices and are never replayed to a backend.
    pub fn is_conversation(&self) -> bool {
        return self.role != Role::System;
    }
}

/// The `{role, content}` pair handed to a backend as prior conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> HistoryEntry {
        return HistoryEntry {
            role: message.role,
            content: message.content.to_string(),
        };
    }
}
