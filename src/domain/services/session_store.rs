#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;

use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use serde_derive::Serialize;

use super::ObserverBox;
use super::PersistenceError;
use super::PromptDeriver;
use super::TracingObserver;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendResponse;
use crate::domain::models::ContextDescriptor;
use crate::domain::models::ContextUpdate;
use crate::domain::models::HistoryEntry;
use crate::domain::models::Message;
use crate::domain::models::PendingRequest;
use crate::domain::models::PersistedSession;
use crate::domain::models::QuickSuggestion;
use crate::domain::models::Role;
use crate::domain::models::SessionState;
use crate::domain::models::StorageBox;

pub const DEFAULT_STORAGE_KEY: &str = "triage-chat-session";

#[derive(Serialize)]
struct PersistedSessionRef<'a> {
    messages: &'a [Message],
    context: &'a ContextDescriptor,
}

fn restore(storage: &StorageBox, key: &str) -> Result<Option<PersistedSession>, PersistenceError> {
    let payload = match storage.read(key).map_err(PersistenceError::Read)? {
        Some(payload) => payload,
        None => return Ok(None),
    };

    let persisted: PersistedSession =
        serde_json::from_str(&payload).map_err(PersistenceError::Decode)?;

    return Ok(Some(persisted));
}

/// Owns one chat session: the panel flag, the message log, the current page
/// context, and the request lifecycle. Messages and context are written to
/// storage after every change; storage failures are reported to the observer
/// and never returned.
///
/// A store is meant to be driven from one task at a time. Two stores sharing
/// a storage key (for example two processes) are last-writer-wins.
pub struct SessionStore {
    state: SessionState,
    storage: StorageBox,
    storage_key: String,
    observer: ObserverBox,
    ticket: u64,
    pending_ticket: Option<u64>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl SessionStore {
    pub fn new(storage: StorageBox) -> SessionStore {
        return SessionStore::with_observer(storage, Arc::<TracingObserver>::default());
    }

    pub fn with_observer(storage: StorageBox, observer: ObserverBox) -> SessionStore {
        return SessionStore::with_key(storage, observer, DEFAULT_STORAGE_KEY);
    }

    /// Restores the persisted session under `storage_key`. Missing, unreadable
    /// or malformed data all start an empty session.
    pub fn with_key(storage: StorageBox, observer: ObserverBox, storage_key: &str) -> SessionStore {
        let state = match restore(&storage, storage_key) {
            Ok(Some(persisted)) => {
                tracing::debug!(
                    messages = persisted.messages.len(),
                    page = %persisted.context.page,
                    "Restored session"
                );
                SessionState::restored(persisted)
            }
            Ok(None) => SessionState::default(),
            Err(err) => {
                observer.on_error(&err);
                SessionState::default()
            }
        };

        let last_timestamp = state.messages.iter().map(|e| return e.timestamp).max();

        return SessionStore {
            state,
            storage,
            storage_key: storage_key.to_string(),
            observer,
            ticket: 0,
            pending_ticket: None,
            last_timestamp,
        };
    }

    pub fn state(&self) -> &SessionState {
        return &self.state;
    }

    pub fn is_open(&self) -> bool {
        return self.state.is_open;
    }

    pub fn messages(&self) -> &[Message] {
        return &self.state.messages;
    }

    pub fn context(&self) -> &ContextDescriptor {
        return &self.state.context;
    }

    pub fn is_loading(&self) -> bool {
        return self.state.is_loading;
    }

    pub fn error(&self) -> Option<&str> {
        return self.state.error.as_deref();
    }

    pub fn open(&mut self) {
        self.state.is_open = true;
        self.state.error = None;
    }

    pub fn close(&mut self) {
        self.state.is_open = false;
        self.state.error = None;
    }

    pub fn toggle(&mut self) {
        self.state.is_open = !self.state.is_open;
        self.state.error = None;
    }

    pub fn merge_context(&mut self, update: ContextUpdate) {
        self.state.error = None;
        if update.is_empty() {
            return;
        }

        self.state.context.merge(update);
        tracing::debug!(
            page = %self.state.context.page,
            step = ?self.state.context.step,
            has_patient = self.state.context.has_patient(),
            "Context updated"
        );

        self.persist();
    }

    /// Whitespace-only text is ignored and `None` is returned.
    pub fn append_user_message(&mut self, text: &str) -> Option<&Message> {
        if text.trim().is_empty() {
            return None;
        }

        return Some(self.append(Role::User, text));
    }

    pub fn append_assistant_message(&mut self, text: &str) -> &Message {
        return self.append(Role::Assistant, text);
    }

    pub fn append_system_message(&mut self, text: &str) -> &Message {
        return self.append(Role::System, text);
    }

    /// Empties the log. Any request still in flight is invalidated so its
    /// answer never lands in the cleared conversation.
    pub fn clear_messages(&mut self) {
        self.state.messages.clear();
        self.invalidate_request();
        self.state.error = None;
        self.persist();
    }

    /// Only flips the flag. A finished request is never re-armed.
    pub fn set_loading(&mut self, is_loading: bool) {
        self.state.is_loading = is_loading;
        self.state.error = None;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.state.error = error;
    }

    /// Starts a model request for `text`. Returns `None` when the text is
    /// blank or another request is still outstanding.
    pub fn begin_request(&mut self, text: &str) -> Option<PendingRequest> {
        if self.state.is_loading || self.pending_ticket.is_some() {
            tracing::debug!(ticket = self.ticket, "Rejected request while loading");
            return None;
        }
        if text.trim().is_empty() {
            return None;
        }

        let history = self
            .state
            .messages
            .iter()
            .filter(|e| return e.is_conversation())
            .map(HistoryEntry::from)
            .collect::<Vec<HistoryEntry>>();
        let system_prompt = self.system_prompt();

        self.append(Role::User, text);

        self.ticket += 1;
        self.pending_ticket = Some(self.ticket);
        self.state.is_loading = true;

        tracing::debug!(ticket = self.ticket, history = history.len(), "Request started");

        return Some(PendingRequest {
            ticket: self.ticket,
            prompt: BackendPrompt::new(system_prompt, history, text.to_string()),
        });
    }

    /// Applies a backend answer. Answers for anything other than the current
    /// outstanding request are dropped and `false` is returned. Each request
    /// accepts at most one answer.
    pub fn complete_request(&mut self, response: BackendResponse) -> bool {
        if self.pending_ticket != Some(response.ticket) {
            tracing::debug!(
                ticket = response.ticket,
                current = self.ticket,
                "Discarded stale response"
            );
            return false;
        }

        self.pending_ticket = None;
        self.state.is_loading = false;
        match response.result {
            Ok(text) => {
                self.append(Role::Assistant, &text);
            }
            Err(err) => {
                tracing::debug!(ticket = response.ticket, error = %err, "Request failed");
                self.state.error = Some(err);
            }
        }

        return true;
    }

    /// Abandons the outstanding request, if any. Returns whether there was
    /// one.
    pub fn cancel_request(&mut self) -> bool {
        if !self.state.is_loading && self.pending_ticket.is_none() {
            return false;
        }

        self.invalidate_request();
        self.state.error = None;
        tracing::debug!(ticket = self.ticket, "Request cancelled");

        return true;
    }

    pub fn system_prompt(&self) -> String {
        return PromptDeriver::build_system_prompt(&self.state.context);
    }

    pub fn quick_suggestions(&self) -> &'static [QuickSuggestion] {
        let context = &self.state.context;
        return PromptDeriver::quick_suggestions(
            context.page,
            context.active_step(),
            context.has_patient(),
        );
    }

    fn invalidate_request(&mut self) {
        self.ticket += 1;
        self.pending_ticket = None;
        self.state.is_loading = false;
    }

    /// Timestamps never go backwards within a session, even if the wall
    /// clock does.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now < last {
                now = last;
            }
        }
        self.last_timestamp = Some(now);

        return now;
    }

    fn append(&mut self, role: Role, text: &str) -> &Message {
        let timestamp = self.next_timestamp();
        self.state
            .messages
            .push(Message::new_at(role, text, timestamp));
        self.state.error = None;
        self.persist();

        return &self.state.messages[self.state.messages.len() - 1];
    }

    fn persist(&self) {
        let record = PersistedSessionRef {
            messages: &self.state.messages,
            context: &self.state.context,
        };

        let res = serde_json::to_string(&record)
            .map_err(PersistenceError::Encode)
            .and_then(|payload| {
                return self
                    .storage
                    .write(&self.storage_key, &payload)
                    .map_err(PersistenceError::Write);
            });

        if let Err(err) = res {
            self.observer.on_error(&err);
        }
    }
}
