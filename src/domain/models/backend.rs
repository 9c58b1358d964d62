#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::HistoryEntry;
use super::Role;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendName {
    Ollama,
    OpenAI,
}

impl BackendName {
    pub fn parse(text: String) -> Option<BackendName> {
        return BackendName::iter().find(|e| return e.to_string() == text);
    }
}

/// Everything a backend needs for one completion: the context derived system
/// prompt, the prior conversation, and the new user text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendPrompt {
    pub system_prompt: String,
    pub history: Vec<HistoryEntry>,
    pub text: String,
}

impl BackendPrompt {
    pub fn new(system_prompt: String, history: Vec<HistoryEntry>, text: String) -> BackendPrompt {
        return BackendPrompt {
            system_prompt,
            history,
            text,
        };
    }

    /// Flattens the prompt into the role/content list chat completion APIs
    /// expect: system prompt first, then history, then the new user turn.
    pub fn as_chat_messages(&self) -> Vec<HistoryEntry> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(HistoryEntry {
            role: Role::System,
            content: self.system_prompt.to_string(),
        });
        messages.extend(self.history.iter().cloned());
        messages.push(HistoryEntry {
            role: Role::User,
            content: self.text.to_string(),
        });

        return messages;
    }
}

/// A model request handed out by the session store. `ticket` identifies the
/// request so a late answer for a cancelled or cleared request can be dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: u64,
    pub prompt: BackendPrompt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendResponse {
    pub ticket: u64,
    /// The assistant text, or a short human readable failure.
    pub result: Result<String, String>,
}

#[async_trait]
pub trait Backend {
    fn name(&self) -> BackendName;

    /// Used at startup to verify all configurations are available to work with
    /// the backend.
    async fn health_check(&self) -> Result<()>;

    /// Requests a single, complete assistant reply for the prompt.
    async fn send(&self, prompt: &BackendPrompt) -> Result<String>;
}

pub type BackendBox = Arc<dyn Backend + Send + Sync>;
