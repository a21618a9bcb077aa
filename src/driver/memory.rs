//! InMemoryDriver - HashMap-backed store driver for testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use super::{
    CollectionHandle, DatabaseHandle, DeleteOutcome, Filter, FindOptions, RawDocument,
    StoreDriver, UpdateOutcome, UpdateSpec,
};
use crate::DocumentError;

/// URI scheme accepted by [`InMemoryDriver`].
pub const MEMORY_SCHEME: &str = "memory";

/// database -> collection -> documents in insertion order
type Storage = HashMap<String, HashMap<String, Vec<RawDocument>>>;

#[derive(Default)]
struct Shared {
    storage: RwLock<Storage>,
    connects: AtomicUsize,
    failing: AtomicBool,
}

/// In-memory store driver.
///
/// Accepts `memory://...` URIs. Every handle issued by one driver (and its
/// clones) sees the same data. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryDriver {
    shared: Arc<Shared>,
}

impl InMemoryDriver {
    /// Create a new empty driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `connect` calls so far.
    pub fn connect_count(&self) -> usize {
        self.shared.connects.load(Ordering::SeqCst)
    }

    /// Make every collection operation fail with a store error until turned off.
    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::SeqCst);
    }
}

impl StoreDriver for InMemoryDriver {
    fn connect(&self, uri: &str, database: &str) -> Result<Arc<dyn DatabaseHandle>, DocumentError> {
        let (scheme, _) = uri
            .split_once("://")
            .ok_or_else(|| DocumentError::Connection(format!("malformed uri '{}'", uri)))?;
        if scheme != MEMORY_SCHEME {
            return Err(DocumentError::Connection(format!(
                "unsupported scheme '{}' in uri '{}'",
                scheme, uri
            )));
        }

        self.shared.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(InMemoryDatabase {
            name: database.to_string(),
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct InMemoryDatabase {
    name: String,
    shared: Arc<Shared>,
}

impl DatabaseHandle for InMemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection(&self, name: &str) -> Arc<dyn CollectionHandle> {
        Arc::new(InMemoryCollection {
            database: self.name.clone(),
            name: name.to_string(),
            shared: Arc::clone(&self.shared),
        })
    }
}

struct InMemoryCollection {
    database: String,
    name: String,
    shared: Arc<Shared>,
}

impl InMemoryCollection {
    fn check_available(&self) -> Result<(), DocumentError> {
        if self.shared.failing.load(Ordering::SeqCst) {
            return Err(DocumentError::Store("store unavailable".into()));
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&[RawDocument]) -> T) -> Result<T, DocumentError> {
        self.check_available()?;
        let storage = self
            .shared
            .storage
            .read()
            .map_err(|_| DocumentError::LockPoisoned("store read"))?;
        let docs = storage
            .get(&self.database)
            .and_then(|collections| collections.get(&self.name))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Ok(f(docs))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Vec<RawDocument>) -> T) -> Result<T, DocumentError> {
        self.check_available()?;
        let mut storage = self
            .shared
            .storage
            .write()
            .map_err(|_| DocumentError::LockPoisoned("store write"))?;
        let docs = storage
            .entry(self.database.clone())
            .or_default()
            .entry(self.name.clone())
            .or_default();
        Ok(f(docs))
    }
}

impl CollectionHandle for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn find(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<RawDocument>, DocumentError> {
        let matching = self.read(|docs| {
            docs.iter()
                .filter(|doc| filter.matches(doc))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        Ok(options.apply(matching))
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<RawDocument>, DocumentError> {
        self.read(|docs| docs.iter().find(|doc| filter.matches(doc)).cloned())
    }

    fn count_documents(&self, filter: &Filter) -> Result<u64, DocumentError> {
        self.read(|docs| docs.iter().filter(|doc| filter.matches(doc)).count() as u64)
    }

    fn update_one(
        &self,
        filter: &Filter,
        update: &UpdateSpec,
        upsert: bool,
    ) -> Result<UpdateOutcome, DocumentError> {
        self.write(|docs| -> Result<UpdateOutcome, DocumentError> {
            if let Some(existing) = docs.iter_mut().find(|doc| filter.matches(doc)) {
                let before = existing.clone();
                update.apply(existing, false)?;
                return Ok(UpdateOutcome {
                    matched: 1,
                    modified: u64::from(*existing != before),
                    ..UpdateOutcome::default()
                });
            }

            if !upsert {
                return Ok(UpdateOutcome::default());
            }

            let mut created = RawDocument::new();
            for (field, value) in filter.equality_fields() {
                created.insert(field.to_string(), value.clone());
            }
            update.apply(&mut created, true)?;
            let upserted_id = created
                .get("id")
                .and_then(|id| id.as_str())
                .map(str::to_string);
            docs.push(created);

            Ok(UpdateOutcome {
                upserted: 1,
                upserted_id,
                ..UpdateOutcome::default()
            })
        })
        .and_then(|outcome| outcome)
    }

    fn delete_one(&self, filter: &Filter) -> Result<DeleteOutcome, DocumentError> {
        self.write(|docs| match docs.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                docs.remove(index);
                DeleteOutcome { deleted: 1 }
            }
            None => DeleteOutcome { deleted: 0 },
        })
    }

    fn delete_many(&self, filter: &Filter) -> Result<DeleteOutcome, DocumentError> {
        self.write(|docs| {
            let before = docs.len();
            docs.retain(|doc| !filter.matches(doc));
            DeleteOutcome {
                deleted: (before - docs.len()) as u64,
            }
        })
    }
}
