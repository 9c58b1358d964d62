use std::sync::Arc;

/// Failures while loading or saving the persisted session. None of these ever
/// reach the caller of a session operation; they are handed to a
/// [`PersistenceObserver`] instead.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read persisted session: {0}")]
    Read(anyhow::Error),
    #[error("persisted session is malformed: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write persisted session: {0}")]
    Write(anyhow::Error),
}

impl PersistenceError {
    pub fn kind(&self) -> &'static str {
        match self {
            PersistenceError::Read(_) => return "read",
            PersistenceError::Decode(_) => return "decode",
            PersistenceError::Encode(_) => return "encode",
            PersistenceError::Write(_) => return "write",
        }
    }
}

pub trait PersistenceObserver {
    fn on_error(&self, err: &PersistenceError);
}

pub type ObserverBox = Arc<dyn PersistenceObserver + Send + Sync>;

/// Default observer, reports failures to the debug log.
#[derive(Default)]
pub struct TracingObserver {}

impl PersistenceObserver for TracingObserver {
    fn on_error(&self, err: &PersistenceError) {
        tracing::warn!(error = %err, kind = err.kind(), "Session persistence failed");
    }
}
