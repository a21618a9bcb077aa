//! Models - typed records with identity, version and timestamps.
//!
//! Any serde struct becomes a model by embedding a [`Meta`] (flattened, so
//! its fields sit beside the domain fields in the stored document) and
//! implementing [`Model`], usually through `#[derive(Model)]`.
//!
//! ## Example
//!
//! ```ignore
//! use bark_rust::{Context, Engine, InMemoryDriver, EngineConfig, Meta, Model};
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize, Model)]
//! #[model(collection = "dogs")]
//! struct Dog {
//!     #[serde(flatten)]
//!     meta: Meta,
//!     name: String,
//! }
//!
//! let engine = Engine::new(InMemoryDriver::new(), EngineConfig::new("memory://local"));
//! let ctx = Context::new().with_database("test-dogs");
//! let dogs = engine.models::<Dog>();
//!
//! let mut dog = dogs.new_model();
//! dog.name = "Fido".into();
//! dogs.save(&mut dog, &ctx)?;
//! let loaded = dogs.get(dog.id(), &ctx)?;
//! ```

mod lifecycle;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::DocumentError;

pub(crate) use lifecycle::{delete, save};

/// Reserved attributes carried by every model.
///
/// `collection_name` is transient: it is never stored, and is populated
/// whenever a model is built by or loaded through a collection so later
/// saves and deletes can route themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    id: String,
    #[serde(default)]
    created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_on: Option<DateTime<Utc>>,
    #[serde(default)]
    version: u64,
    #[serde(skip)]
    collection_name: String,
}

impl Meta {
    /// Metadata for a new record in `collection`; the id is assigned on save.
    pub fn new(collection: impl Into<String>) -> Self {
        Meta {
            collection_name: collection.into(),
            ..Self::default()
        }
    }

    /// Metadata for a record with a caller-chosen id.
    pub fn with_id(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Meta {
            id: id.into(),
            ..Self::new(collection)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Assign the id of a record that has none yet.
    ///
    /// Ids are immutable once set; reassigning the same id is accepted.
    pub fn assign_id(&mut self, id: impl Into<String>) -> Result<(), DocumentError> {
        let id = id.into();
        if !self.id.is_empty() && self.id != id {
            return Err(DocumentError::Precondition(format!(
                "id already assigned ({})",
                self.id
            )));
        }
        self.id = id;
        Ok(())
    }

    pub fn created_on(&self) -> Option<DateTime<Utc>> {
        self.created_on
    }

    pub fn updated_on(&self) -> Option<DateTime<Utc>> {
        self.updated_on
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn set_collection_name(&mut self, name: impl Into<String>) {
        self.collection_name = name.into();
    }
}

/// Trait for types that can be persisted as documents.
pub trait Model: Serialize + DeserializeOwned + Send + Sync {
    /// Default collection for this model type, used by `Engine::models`.
    const COLLECTION: &'static str;

    fn meta(&self) -> &Meta;

    fn meta_mut(&mut self) -> &mut Meta;

    fn id(&self) -> &str {
        self.meta().id()
    }

    fn version(&self) -> u64 {
        self.meta().version()
    }

    fn collection_name(&self) -> &str {
        self.meta().collection_name()
    }
}
