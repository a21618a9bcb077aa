//! Store driver - the narrow capability the engine consumes.
//!
//! A driver connects to a logical database and hands out collection handles
//! that run queries, counts, upserts and deletes over raw JSON documents.
//! [`InMemoryDriver`] is a complete in-process implementation; adapters for
//! real document stores implement the same three traits.

mod filter;
mod memory;
mod options;
mod outcome;
mod update;

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::DocumentError;

/// A document in the store's native representation.
pub type RawDocument = Map<String, Value>;

/// Establishes database handles.
pub trait StoreDriver: Send + Sync {
    /// Connect to `database` at `uri`. Fails with `Connection` when the
    /// endpoint is unreachable or the URI is malformed.
    fn connect(&self, uri: &str, database: &str) -> Result<Arc<dyn DatabaseHandle>, DocumentError>;
}

/// A connected logical database.
pub trait DatabaseHandle: Send + Sync {
    fn name(&self) -> &str;

    fn collection(&self, name: &str) -> Arc<dyn CollectionHandle>;
}

/// Query and mutation operations on one collection.
pub trait CollectionHandle: Send + Sync {
    fn name(&self) -> &str;

    /// All documents matching `filter`, shaped by `options`.
    fn find(&self, filter: &Filter, options: &FindOptions)
        -> Result<Vec<RawDocument>, DocumentError>;

    /// The first matching document, or `None`.
    fn find_one(&self, filter: &Filter) -> Result<Option<RawDocument>, DocumentError>;

    fn count_documents(&self, filter: &Filter) -> Result<u64, DocumentError>;

    /// Apply `update` to the first matching document. With `upsert`, a new
    /// document is created when nothing matches.
    fn update_one(
        &self,
        filter: &Filter,
        update: &UpdateSpec,
        upsert: bool,
    ) -> Result<UpdateOutcome, DocumentError>;

    fn delete_one(&self, filter: &Filter) -> Result<DeleteOutcome, DocumentError>;

    fn delete_many(&self, filter: &Filter) -> Result<DeleteOutcome, DocumentError>;
}

pub use filter::{Condition, Filter};
pub use memory::InMemoryDriver;
pub use options::{FindOptions, SortOrder};
pub use outcome::{DeleteOutcome, UpdateOutcome};
pub use update::UpdateSpec;
