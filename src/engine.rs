//! Engine - composition root owning the handle registry and identity strategy.

use std::sync::Arc;

use crate::driver::{DatabaseHandle, StoreDriver};
use crate::{
    Collection, Context, DocumentError, EngineConfig, HandleRegistry, IdentityGenerator, Model,
    RandomIdentity, SequentialIdentity, WriteResult,
};

struct EngineInner {
    config: EngineConfig,
    registry: HandleRegistry,
    identity: Arc<dyn IdentityGenerator>,
}

/// Entry point for persistence. Clone-friendly via Arc; clones share the
/// handle cache and the identity generator.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Build an engine over `driver`. Test mode uses sequential identities,
    /// production mode random ones.
    pub fn new<D: StoreDriver + 'static>(driver: D, config: EngineConfig) -> Self {
        let identity: Arc<dyn IdentityGenerator> = if config.mode.is_test() {
            Arc::new(SequentialIdentity::new())
        } else {
            Arc::new(RandomIdentity::new())
        };
        Self::with_identity(driver, config, identity)
    }

    /// Build an engine with an explicit identity strategy.
    pub fn with_identity<D: StoreDriver + 'static>(
        driver: D,
        config: EngineConfig,
        identity: Arc<dyn IdentityGenerator>,
    ) -> Self {
        let registry = HandleRegistry::new(Arc::new(driver), &config);
        Engine {
            inner: Arc::new(EngineInner {
                config,
                registry,
                identity,
            }),
        }
    }

    /// Build an engine configured from `STORE_URI`, `STORE_DB` and `ENV`.
    pub fn from_env<D: StoreDriver + 'static>(driver: D) -> Self {
        Self::new(driver, EngineConfig::from_env())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.inner.registry
    }

    pub fn identity(&self) -> &dyn IdentityGenerator {
        self.inner.identity.as_ref()
    }

    pub fn new_identity(&self) -> String {
        self.inner.identity.generate()
    }

    /// Restart sequential identities; a no-op for random ones.
    pub fn reset_identity(&self) {
        self.inner.identity.reset();
    }

    /// Connect the configured default database.
    pub fn connect_default(&self) -> Result<Arc<dyn DatabaseHandle>, DocumentError> {
        self.registry().connect(&self.inner.config.default_database)
    }

    /// A binding for the named collection.
    pub fn collection<M: Model>(&self, name: impl Into<String>) -> Collection<M> {
        Collection::new(self.clone(), name)
    }

    /// A binding for the model type's default collection.
    pub fn models<M: Model>(&self) -> Collection<M> {
        self.collection(M::COLLECTION)
    }

    /// Upsert `model` into the collection named by its own metadata.
    pub fn save<M: Model>(&self, model: &mut M, ctx: &Context) -> Result<WriteResult, DocumentError> {
        let collection = self.collection::<M>(model.collection_name());
        collection.save(model, ctx)
    }

    /// Delete `model` from the collection named by its own metadata.
    pub fn delete<M: Model>(&self, model: &M, ctx: &Context) -> Result<WriteResult, DocumentError> {
        self.collection::<M>(model.collection_name()).delete(model, ctx)
    }
}
