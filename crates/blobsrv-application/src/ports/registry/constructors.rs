//! Constructor Registry
//!
//! Maps a type name to the function that builds it. Two tables are kept,
//! one per capability, behind a single mutex. The mutex only guards table
//! reads and writes; constructors always run with it released because
//! they call back into the loader, which may need the registry again.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use blobsrv_domain::constants::STORAGE_TYPE_PREFIX;
use blobsrv_domain::error::{Error, Result};
use blobsrv_domain::ports::{Handler, Storage};
use blobsrv_domain::value_objects::{ConfigObj, ConstructorKind, HandlerInstance};
use once_cell::sync::Lazy;
use tracing::debug;

use super::handler::HANDLER_CONSTRUCTORS;
use super::storage::STORAGE_CONSTRUCTORS;
use crate::ports::loader::Loader;

/// Shared storage constructor
pub type StorageConstructor =
    Arc<dyn Fn(&dyn Loader, &ConfigObj) -> Result<Arc<dyn Storage>> + Send + Sync>;

/// Shared HTTP handler constructor
pub type HandlerConstructor =
    Arc<dyn Fn(&dyn Loader, &ConfigObj) -> Result<Arc<dyn Handler>> + Send + Sync>;

struct Registered<C> {
    description: String,
    constructor: C,
}

#[derive(Default)]
struct Tables {
    storage: HashMap<String, Registered<StorageConstructor>>,
    handler: HashMap<String, Registered<HandlerConstructor>>,
}

static GLOBAL: Lazy<Arc<ConstructorRegistry>> =
    Lazy::new(|| Arc::new(ConstructorRegistry::with_linked_constructors()));

/// Type name to constructor tables for storage engines and HTTP handlers
#[derive(Default)]
pub struct ConstructorRegistry {
    tables: Mutex<Tables>,
}

impl ConstructorRegistry {
    /// An empty registry, independent of the process-wide one
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded from every `linkme` slice entry linked into the binary
    ///
    /// # Panics
    ///
    /// If two linked entries share a type name within one table.
    pub fn with_linked_constructors() -> Self {
        let registry = Self::new();
        for entry in STORAGE_CONSTRUCTORS {
            registry.insert_storage(entry.name, entry.description, Arc::new(entry.constructor));
        }
        for entry in HANDLER_CONSTRUCTORS {
            registry.insert_handler(entry.name, entry.description, Arc::new(entry.constructor));
        }
        registry
    }

    /// The process-wide registry
    pub fn global() -> Arc<ConstructorRegistry> {
        Arc::clone(&GLOBAL)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Tables are only mutated by whole-entry inserts, so a poisoned
        // lock still guards consistent data.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a storage constructor under `type_name`
    ///
    /// # Panics
    ///
    /// If `type_name` is already registered as a storage type.
    pub fn register_storage_constructor<F>(&self, type_name: &str, constructor: F)
    where
        F: Fn(&dyn Loader, &ConfigObj) -> Result<Arc<dyn Storage>> + Send + Sync + 'static,
    {
        self.insert_storage(type_name, "", Arc::new(constructor));
    }

    /// Register an HTTP handler constructor under `type_name`
    ///
    /// # Panics
    ///
    /// If `type_name` is already registered as a handler type.
    pub fn register_handler_constructor<F>(&self, type_name: &str, constructor: F)
    where
        F: Fn(&dyn Loader, &ConfigObj) -> Result<Arc<dyn Handler>> + Send + Sync + 'static,
    {
        self.insert_handler(type_name, "", Arc::new(constructor));
    }

    fn insert_storage(&self, type_name: &str, description: &str, constructor: StorageConstructor) {
        let inserted = {
            let mut tables = self.lock();
            insert_once(&mut tables.storage, type_name, description, constructor)
        };
        if !inserted {
            duplicate(ConstructorKind::Storage, type_name);
        }
        debug!(type_name, "registered storage constructor");
    }

    fn insert_handler(&self, type_name: &str, description: &str, constructor: HandlerConstructor) {
        let inserted = {
            let mut tables = self.lock();
            insert_once(&mut tables.handler, type_name, description, constructor)
        };
        if !inserted {
            duplicate(ConstructorKind::Handler, type_name);
        }
        debug!(type_name, "registered handler constructor");
    }

    /// Build a storage engine of type `type_name`
    pub fn create_storage(
        &self,
        type_name: &str,
        loader: &dyn Loader,
        config: &ConfigObj,
    ) -> Result<Arc<dyn Storage>> {
        let constructor = self
            .lock()
            .storage
            .get(type_name)
            .map(|registered| Arc::clone(&registered.constructor));
        let constructor =
            constructor.ok_or_else(|| Error::unknown_type(ConstructorKind::Storage, type_name))?;
        constructor(loader, config)
    }

    /// Build an HTTP handler of type `type_name`
    pub fn create_handler(
        &self,
        type_name: &str,
        loader: &dyn Loader,
        config: &ConfigObj,
    ) -> Result<Arc<dyn Handler>> {
        let constructor = self
            .lock()
            .handler
            .get(type_name)
            .map(|registered| Arc::clone(&registered.constructor));
        let constructor =
            constructor.ok_or_else(|| Error::unknown_type(ConstructorKind::Handler, type_name))?;
        constructor(loader, config)
    }

    /// Decide which table a declared type resolves against.
    ///
    /// `storage-<name>` always means the storage table. Any other name is
    /// looked up in the storage table first, then the handler table.
    pub fn resolve_type<'t>(&self, declared_type: &'t str) -> Result<(ConstructorKind, &'t str)> {
        if let Some(name) = declared_type.strip_prefix(STORAGE_TYPE_PREFIX) {
            return Ok((ConstructorKind::Storage, name));
        }
        let tables = self.lock();
        if tables.storage.contains_key(declared_type) {
            Ok((ConstructorKind::Storage, declared_type))
        } else if tables.handler.contains_key(declared_type) {
            Ok((ConstructorKind::Handler, declared_type))
        } else {
            Err(Error::unregistered_type(declared_type))
        }
    }

    /// Build whichever capability `declared_type` resolves to
    pub fn create_instance(
        &self,
        declared_type: &str,
        loader: &dyn Loader,
        config: &ConfigObj,
    ) -> Result<HandlerInstance> {
        match self.resolve_type(declared_type)? {
            (ConstructorKind::Storage, name) => self
                .create_storage(name, loader, config)
                .map(HandlerInstance::Storage),
            (ConstructorKind::Handler, name) => self
                .create_handler(name, loader, config)
                .map(HandlerInstance::Handler),
        }
    }

    /// Whether a storage constructor is registered under `type_name`
    pub fn has_storage_type(&self, type_name: &str) -> bool {
        self.lock().storage.contains_key(type_name)
    }

    /// Whether a handler constructor is registered under `type_name`
    pub fn has_handler_type(&self, type_name: &str) -> bool {
        self.lock().handler.contains_key(type_name)
    }

    /// Registered storage types as sorted (name, description) pairs
    pub fn list_storage_constructors(&self) -> Vec<(String, String)> {
        sorted_listing(&self.lock().storage)
    }

    /// Registered handler types as sorted (name, description) pairs
    pub fn list_handler_constructors(&self) -> Vec<(String, String)> {
        sorted_listing(&self.lock().handler)
    }
}

fn insert_once<C>(
    table: &mut HashMap<String, Registered<C>>,
    type_name: &str,
    description: &str,
    constructor: C,
) -> bool {
    match table.entry(type_name.to_string()) {
        Entry::Occupied(_) => false,
        Entry::Vacant(slot) => {
            slot.insert(Registered {
                description: description.to_string(),
                constructor,
            });
            true
        }
    }
}

fn duplicate(kind: ConstructorKind, type_name: &str) -> ! {
    panic!("{kind} constructor already registered for type: {type_name}");
}

fn sorted_listing<C>(table: &HashMap<String, Registered<C>>) -> Vec<(String, String)> {
    let mut listing: Vec<(String, String)> = table
        .iter()
        .map(|(name, registered)| (name.clone(), registered.description.clone()))
        .collect();
    listing.sort();
    listing
}

/// Register a storage constructor in the process-wide registry
///
/// # Panics
///
/// If `type_name` is already registered as a storage type.
pub fn register_storage_constructor<F>(type_name: &str, constructor: F)
where
    F: Fn(&dyn Loader, &ConfigObj) -> Result<Arc<dyn Storage>> + Send + Sync + 'static,
{
    GLOBAL.register_storage_constructor(type_name, constructor);
}

/// Register an HTTP handler constructor in the process-wide registry
///
/// # Panics
///
/// If `type_name` is already registered as a handler type.
pub fn register_handler_constructor<F>(type_name: &str, constructor: F)
where
    F: Fn(&dyn Loader, &ConfigObj) -> Result<Arc<dyn Handler>> + Send + Sync + 'static,
{
    GLOBAL.register_handler_constructor(type_name, constructor);
}

/// Build a storage engine from the process-wide registry
pub fn create_storage(
    type_name: &str,
    loader: &dyn Loader,
    config: &ConfigObj,
) -> Result<Arc<dyn Storage>> {
    GLOBAL.create_storage(type_name, loader, config)
}

/// Build an HTTP handler from the process-wide registry
pub fn create_handler(
    type_name: &str,
    loader: &dyn Loader,
    config: &ConfigObj,
) -> Result<Arc<dyn Handler>> {
    GLOBAL.create_handler(type_name, loader, config)
}
