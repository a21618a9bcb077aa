//! Context - immutable request-scope values consumed by every data operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::DocumentError;

/// Shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Request-scope values: the active database, an optional fixed clock, an
/// optional forced error and an optional cancellation token.
///
/// ```ignore
/// let ctx = Context::new()
///     .with_database("test-dogs")
///     .with_now("2024-03-27T19:55:38.782Z");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    database: Option<String>,
    now: Option<String>,
    forced_error: Option<String>,
    cancel: Option<CancelToken>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Fix the clock to an RFC 3339 timestamp.
    pub fn with_now(mut self, now: impl Into<String>) -> Self {
        self.now = Some(now.into());
        self
    }

    /// Make every data operation fail with `message` before reaching the store.
    pub fn with_forced_error(mut self, message: impl Into<String>) -> Self {
        self.forced_error = Some(message.into());
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The active logical database name.
    pub fn database_name(&self) -> Result<&str, DocumentError> {
        self.database
            .as_deref()
            .ok_or(DocumentError::MissingContext("database name"))
    }

    /// The raw clock override, if any.
    pub fn now_override(&self) -> Option<&str> {
        self.now.as_deref()
    }

    /// The forced error carried by this context, if any.
    pub fn injected_error(&self) -> Option<DocumentError> {
        self.forced_error
            .as_ref()
            .map(|message| DocumentError::Injected(message.clone()))
    }

    /// Fails with `Cancelled` once the attached token has been cancelled.
    pub fn ensure_active(&self) -> Result<(), DocumentError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(DocumentError::Cancelled),
            _ => Ok(()),
        }
    }
}
