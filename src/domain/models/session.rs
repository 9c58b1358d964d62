use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::ContextDescriptor;
use super::Message;

/// The durable subset of a session, written under a single storage key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub messages: Vec<Message>,
    pub context: ContextDescriptor,
}

/// Everything a presentation layer needs to render the chat panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub is_open: bool,
    pub messages: Vec<Message>,
    pub context: ContextDescriptor,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn restored(persisted: PersistedSession) -> SessionState {
        return SessionState {
            messages: persisted.messages,
            context: persisted.context,
            ..SessionState::default()
        };
    }
}
