use std::fmt;

/// Error type for every engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A required request-scope value was absent (e.g. no active database).
    MissingContext(&'static str),
    /// The collection binding has no name.
    EmptyName,
    /// The store endpoint is unreachable or its URI is malformed.
    Connection(String),
    /// A single-document query matched nothing.
    NotFound { collection: String },
    /// The operation's preconditions were not met (e.g. delete without an id).
    Precondition(String),
    /// A caller-supplied filter could not be parsed.
    InvalidFilter(String),
    /// Any other store-level failure (write, cursor, decode).
    Store(String),
    /// Serialization/deserialization between models and raw documents.
    Serde(String),
    /// Error forced through the request context for fault injection.
    Injected(String),
    /// The request context was cancelled before the store call.
    Cancelled,
    /// `clear` attempted against a database whose name does not start with `test`.
    ClearRefused { database: String },
    /// A shared lock was poisoned by a panicking thread.
    LockPoisoned(&'static str),
}

impl DocumentError {
    /// True when this is the "absent" outcome of a single-document query.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentError::NotFound { .. })
    }

    /// Prefix a store failure with the action that hit it; other variants
    /// pass through so callers can still branch on them.
    pub(crate) fn wrap(self, action: &str) -> Self {
        match self {
            DocumentError::Store(msg) => DocumentError::Store(format!("{}: {}", action, msg)),
            other => other,
        }
    }
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::MissingContext(key) => write!(f, "{} not found in context", key),
            DocumentError::EmptyName => write!(f, "collection name is required"),
            DocumentError::Connection(msg) => write!(f, "error connecting to store: {}", msg),
            DocumentError::NotFound { collection } => {
                write!(f, "document not found in {}", collection)
            }
            DocumentError::Precondition(msg) => write!(f, "precondition failed: {}", msg),
            DocumentError::InvalidFilter(msg) => write!(f, "invalid filter: {}", msg),
            DocumentError::Store(msg) => write!(f, "store error: {}", msg),
            DocumentError::Serde(msg) => write!(f, "document serialization error: {}", msg),
            DocumentError::Injected(msg) => write!(f, "{}", msg),
            DocumentError::Cancelled => write!(f, "operation cancelled"),
            DocumentError::ClearRefused { database } => write!(
                f,
                "to prevent accidents, clear can only be used on databases whose names start with 'test' (got '{}')",
                database
            ),
            DocumentError::LockPoisoned(operation) => {
                write!(f, "lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Serde(err.to_string())
    }
}
