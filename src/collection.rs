//! Collection - typed binding between a logical collection name and its store handle.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::driver::{CollectionHandle, Filter, FindOptions, RawDocument};
use crate::model::{self, Model};
use crate::{Context, DocumentError, Engine, WriteResult};

/// Typed query and mutation operations over one logical collection.
///
/// Creating a binding is cheap; the store handle is resolved on first use
/// and reused for the binding's lifetime.
pub struct Collection<M> {
    name: String,
    engine: Engine,
    handle: Mutex<Option<Arc<dyn CollectionHandle>>>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Model> Collection<M> {
    pub fn new(engine: Engine, name: impl Into<String>) -> Self {
        Collection {
            name: name.into(),
            engine,
            handle: Mutex::new(None),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The store handle for this collection.
    ///
    /// A forced error in `ctx` always wins, even over a cached handle.
    pub fn resolve_handle(&self, ctx: &Context) -> Result<Arc<dyn CollectionHandle>, DocumentError> {
        if let Some(err) = ctx.injected_error() {
            return Err(err);
        }

        let mut cached = self
            .handle
            .lock()
            .map_err(|_| DocumentError::LockPoisoned("collection handle"))?;
        if let Some(handle) = cached.as_ref() {
            return Ok(Arc::clone(handle));
        }
        if self.name.is_empty() {
            return Err(DocumentError::EmptyName);
        }

        let database = self.engine.registry().database(ctx)?;
        let handle = database.collection(&self.name);
        *cached = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// A fresh model routed to this collection.
    pub fn new_model(&self) -> M
    where
        M: Default,
    {
        let mut model = M::default();
        model.meta_mut().set_collection_name(self.name.clone());
        model
    }

    /// All documents matching `filter`. Matching nothing is an empty `Vec`.
    pub fn find(
        &self,
        filter: &Filter,
        options: &FindOptions,
        ctx: &Context,
    ) -> Result<Vec<M>, DocumentError> {
        let handle = self.resolve_handle(ctx)?;
        ctx.ensure_active()?;
        let docs = handle
            .find(filter, options)
            .map_err(|err| err.wrap("error fetching documents"))?;
        docs.into_iter().map(|doc| self.decode(doc)).collect()
    }

    pub fn all(&self, ctx: &Context) -> Result<Vec<M>, DocumentError> {
        self.find(&Filter::all(), &FindOptions::default(), ctx)
    }

    /// The first document matching `filter`, or `NotFound`.
    pub fn find_one(&self, filter: &Filter, ctx: &Context) -> Result<M, DocumentError> {
        let handle = self.resolve_handle(ctx)?;
        ctx.ensure_active()?;
        match handle
            .find_one(filter)
            .map_err(|err| err.wrap("error fetching documents"))?
        {
            Some(doc) => self.decode(doc),
            None => Err(DocumentError::NotFound {
                collection: self.name.clone(),
            }),
        }
    }

    pub fn get(&self, id: &str, ctx: &Context) -> Result<M, DocumentError> {
        self.find_one(&Filter::by_id(id), ctx)
    }

    pub fn count(&self, filter: &Filter, ctx: &Context) -> Result<u64, DocumentError> {
        let handle = self.resolve_handle(ctx)?;
        ctx.ensure_active()?;
        handle
            .count_documents(filter)
            .map_err(|err| err.wrap("error counting documents"))
    }

    /// `find` and `count` against the same filter.
    ///
    /// The two reads are separate store calls, so a concurrent writer can make
    /// the count disagree with the number of returned documents.
    pub fn find_and_count(
        &self,
        filter: &Filter,
        options: &FindOptions,
        ctx: &Context,
    ) -> Result<(Vec<M>, u64), DocumentError> {
        let found = self.find(filter, options, ctx)?;
        let count = self.count(filter, ctx)?;
        Ok((found, count))
    }

    pub fn delete_one(&self, filter: &Filter, ctx: &Context) -> Result<WriteResult, DocumentError> {
        let handle = self.resolve_handle(ctx)?;
        ctx.ensure_active()?;
        let outcome = handle
            .delete_one(filter)
            .map_err(|err| err.wrap("error deleting documents"))?;
        Ok(WriteResult::from_delete(&outcome))
    }

    pub fn delete_many(&self, filter: &Filter, ctx: &Context) -> Result<WriteResult, DocumentError> {
        let handle = self.resolve_handle(ctx)?;
        ctx.ensure_active()?;
        let outcome = handle
            .delete_many(filter)
            .map_err(|err| err.wrap("error deleting documents"))?;
        Ok(WriteResult::from_delete(&outcome))
    }

    /// Delete every document. Only allowed on databases named `test*`.
    ///
    /// The handle is resolved for the context's database on every call; the
    /// binding's cached handle may belong to another database.
    pub fn clear(&self, ctx: &Context) -> Result<WriteResult, DocumentError> {
        if let Some(err) = ctx.injected_error() {
            return Err(err);
        }
        if self.name.is_empty() {
            return Err(DocumentError::EmptyName);
        }
        let name = ctx.database_name()?;
        if !name.starts_with("test") {
            return Err(DocumentError::ClearRefused {
                database: name.to_string(),
            });
        }

        let database = self.engine.registry().database(ctx)?;
        if !database.name().starts_with("test") {
            return Err(DocumentError::ClearRefused {
                database: database.name().to_string(),
            });
        }
        ctx.ensure_active()?;
        let outcome = database
            .collection(&self.name)
            .delete_many(&Filter::all())
            .map_err(|err| err.wrap("error clearing collection"))?;
        Ok(WriteResult::from_delete(&outcome))
    }

    /// Upsert `model` through this binding. A model without a collection
    /// name is adopted by this collection.
    pub fn save(&self, model: &mut M, ctx: &Context) -> Result<WriteResult, DocumentError> {
        if model.collection_name().is_empty() {
            model.meta_mut().set_collection_name(self.name.clone());
        }
        model::save(self, model, ctx)
    }

    pub fn delete(&self, model: &M, ctx: &Context) -> Result<WriteResult, DocumentError> {
        model::delete(self, model, ctx)
    }

    fn decode(&self, doc: RawDocument) -> Result<M, DocumentError> {
        let mut model: M = serde_json::from_value(Value::Object(doc))
            .map_err(|err| DocumentError::Serde(format!("error decoding documents: {}", err)))?;
        model.meta_mut().set_collection_name(self.name.clone());
        Ok(model)
    }
}
