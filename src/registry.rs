//! HandleRegistry - one cached database handle per logical database name.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::driver::{DatabaseHandle, StoreDriver};
use crate::{Context, DocumentError, EngineConfig};

/// Lazily connects database handles and reuses them for the registry's
/// lifetime. Entries are never evicted.
///
/// The map lock is held across the driver's `connect`, so concurrent first
/// accesses to one name produce exactly one handle.
pub struct HandleRegistry {
    driver: Arc<dyn StoreDriver>,
    uri: String,
    quiet: bool,
    handles: Mutex<HashMap<String, Arc<dyn DatabaseHandle>>>,
}

impl HandleRegistry {
    pub fn new(driver: Arc<dyn StoreDriver>, config: &EngineConfig) -> Self {
        HandleRegistry {
            driver,
            uri: config.uri.clone(),
            quiet: config.mode.is_test(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// The cached handle for `database`, connecting on first use.
    pub fn connect(&self, database: &str) -> Result<Arc<dyn DatabaseHandle>, DocumentError> {
        let mut handles = self
            .handles
            .lock()
            .map_err(|_| DocumentError::LockPoisoned("handle registry"))?;

        if let Some(handle) = handles.get(database) {
            return Ok(Arc::clone(handle));
        }

        if self.quiet {
            log::debug!("connecting to database {}", database);
        } else {
            log::info!("connecting to db: {}:{}", self.uri, database);
        }
        let handle = self.driver.connect(&self.uri, database)?;
        handles.insert(database.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    /// The handle for the context's active database.
    ///
    /// Fails with `MissingContext` when no database is set and with the
    /// context's forced error when one is present.
    pub fn database(&self, ctx: &Context) -> Result<Arc<dyn DatabaseHandle>, DocumentError> {
        let name = ctx.database_name()?;
        if let Some(err) = ctx.injected_error() {
            return Err(err);
        }
        self.connect(name)
    }

    pub fn contains(&self, database: &str) -> bool {
        self.handles
            .lock()
            .map(|handles| handles.contains_key(database))
            .unwrap_or(false)
    }

    /// Number of cached handles.
    pub fn len(&self) -> usize {
        self.handles.lock().map(|handles| handles.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
