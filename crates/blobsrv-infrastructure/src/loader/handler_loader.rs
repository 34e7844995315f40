//! Handler Loader
//!
//! Turns the declared `(prefix, type, arguments)` triples of one
//! configuration into live instances, each constructed at most once.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use blobsrv_application::ports::registry::ConstructorRegistry;
use blobsrv_application::ports::{FindHandlerByType, FoundHandler, Loader};
use blobsrv_domain::error::{Error, Result};
use blobsrv_domain::value_objects::{ConfigObj, HandlerInstance, RequestContext};
use tracing::{debug, error, info, warn};

use super::loaded::LoadedHandlers;
use super::scope::ConstructionScope;
use super::state::{Begin, InstanceStatus, StateTable};
use crate::config::{AppConfig, PrefixConfig};

/// Resolves the handler graph of one configuration load
pub struct HandlerLoader {
    registry: Arc<ConstructorRegistry>,
    state: Mutex<StateTable>,
    // Signalled whenever a construction finishes
    changed: Condvar,
    request: Option<RequestContext>,
}

impl HandlerLoader {
    /// Declare `prefixes` against `registry`. Nothing is constructed yet.
    pub fn new<I>(registry: Arc<ConstructorRegistry>, prefixes: I) -> Self
    where
        I: IntoIterator<Item = (String, PrefixConfig)>,
    {
        let mut state = StateTable::default();
        for (prefix, config) in prefixes {
            if let Err(err) = state.declare(prefix, config.handler, config.handler_args) {
                warn!(error = %err, "ignoring repeated prefix declaration");
            }
        }
        Self {
            registry,
            state: Mutex::new(state),
            changed: Condvar::new(),
            request: None,
        }
    }

    /// Declare every prefix of `config` against the process-wide registry
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(ConstructorRegistry::global(), config.prefixes.clone())
    }

    /// Declare one more prefix.
    ///
    /// Fails if `prefix` is already declared; an existing entry is never
    /// replaced, whatever its status.
    pub fn declare(
        &self,
        prefix: impl Into<String>,
        handler_type: impl Into<String>,
        handler_args: ConfigObj,
    ) -> Result<()> {
        self.lock_state()
            .declare(prefix.into(), handler_type.into(), handler_args)
    }

    /// Attach the inbound request this load is serving
    pub fn with_request_context(mut self, request: RequestContext) -> Self {
        self.request = Some(request);
        self
    }

    /// Current status of `prefix`, `None` if it was never declared
    pub fn status(&self, prefix: &str) -> Option<InstanceStatus> {
        self.lock_state().entries.get(prefix).map(|state| state.status)
    }

    /// Every declared prefix, in order
    pub fn prefixes(&self) -> Vec<String> {
        self.lock_state().entries.keys().cloned().collect()
    }

    /// Construct every declared prefix, failing on the first error.
    ///
    /// Only a complete graph is returned.
    pub fn load_all(&self) -> Result<LoadedHandlers> {
        let prefixes = self.prefixes();
        info!(count = prefixes.len(), "loading configured handlers");
        for prefix in &prefixes {
            self.get_handler(prefix)?;
        }

        let state = self.lock_state();
        let mut entries = Vec::with_capacity(state.entries.len());
        for (prefix, entry) in &state.entries {
            let instance = entry.instance.clone().ok_or_else(|| {
                Error::internal(format!("prefix \"{prefix}\" left {} after load", entry.status))
            })?;
            entries.push((prefix.clone(), entry.declared_type.clone(), instance));
        }
        info!(count = entries.len(), "all handlers loaded");
        Ok(LoadedHandlers::from_entries(entries))
    }

    fn lock_state(&self) -> MutexGuard<'_, StateTable> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn constructed(&self, prefix: &str) -> Option<HandlerInstance> {
        let state = self.lock_state();
        let entry = state.entries.get(prefix)?;
        match entry.status {
            InstanceStatus::Constructed => entry.instance.clone(),
            _ => None,
        }
    }

    /// Construct `prefix` on behalf of the constructors on `path`.
    ///
    /// `path` lists the prefixes whose constructors are nested on the
    /// calling stack, outermost first; it is empty for a top-level request.
    /// A prefix being built by some other path is waited for.
    pub(crate) fn resolve(&self, prefix: &str, path: &[String]) -> Result<HandlerInstance> {
        let _request = path
            .last()
            .map(|parent| OpenRequest::new(self, parent, prefix));

        let (declared_type, config) = {
            let mut state = self.lock_state();
            loop {
                let begin = state.begin(prefix, path);
                match begin {
                    Ok(Begin::Ready(instance)) => return Ok(instance),
                    Ok(Begin::Start {
                        declared_type,
                        config,
                    }) => break (declared_type, config),
                    Ok(Begin::Wait) => {
                        debug!(prefix, "waiting for concurrent construction");
                        state = self
                            .changed
                            .wait(state)
                            .unwrap_or_else(PoisonError::into_inner);
                    }
                    Err(err @ Error::Cycle { .. }) => {
                        error!(prefix, error = %err, "handler construction cycle");
                        return Err(err);
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        debug!(prefix, handler_type = %declared_type, "constructing handler");
        let mut pending = PendingConstruction {
            loader: self,
            prefix,
            finished: false,
        };
        let mut nested = path.to_vec();
        nested.push(prefix.to_string());
        let scope = ConstructionScope::new(self, nested);
        let result = self
            .registry
            .create_instance(&declared_type, &scope, &config);
        match &result {
            Ok(instance) => {
                info!(prefix, handler_type = %declared_type, kind = %instance.kind(), "handler constructed");
                pending.finish(Ok(instance.clone()));
            }
            Err(err) => {
                warn!(prefix, handler_type = %declared_type, error = %err, "handler construction failed");
                pending.finish(Err(err.to_string()));
            }
        }
        result
    }

    fn finish(&self, prefix: &str, outcome: std::result::Result<HandlerInstance, String>) {
        self.lock_state().finish(prefix, outcome);
        self.changed.notify_all();
    }
}

/// Marks a claimed prefix as failed if its constructor unwinds
struct PendingConstruction<'a> {
    loader: &'a HandlerLoader,
    prefix: &'a str,
    finished: bool,
}

impl PendingConstruction<'_> {
    fn finish(&mut self, outcome: std::result::Result<HandlerInstance, String>) {
        self.finished = true;
        self.loader.finish(self.prefix, outcome);
    }
}

impl Drop for PendingConstruction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.loader
                .finish(self.prefix, Err("constructor panicked".to_string()));
        }
    }
}

/// Records that a constructor is requesting another prefix, for as long as
/// the request is in flight
struct OpenRequest<'a> {
    loader: &'a HandlerLoader,
    parent: &'a str,
    prefix: &'a str,
}

impl<'a> OpenRequest<'a> {
    fn new(loader: &'a HandlerLoader, parent: &'a str, prefix: &'a str) -> Self {
        loader.lock_state().open_request(parent, prefix);
        Self {
            loader,
            parent,
            prefix,
        }
    }
}

impl Drop for OpenRequest<'_> {
    fn drop(&mut self) {
        self.loader
            .lock_state()
            .close_request(self.parent, self.prefix);
    }
}

impl FindHandlerByType for HandlerLoader {
    fn find_handler_by_type(&self, handler_type: &str) -> Result<FoundHandler> {
        let state = self.lock_state();
        let found = state
            .entries
            .iter()
            .find(|(_, entry)| entry.declared_type == handler_type);
        match found {
            Some((prefix, entry)) => Ok(FoundHandler {
                prefix: prefix.clone(),
                instance: entry.instance.clone(),
            }),
            None => Err(Error::HandlerTypeNotFound {
                handler_type: handler_type.to_string(),
            }),
        }
    }
}

impl Loader for HandlerLoader {
    fn my_prefix(&self) -> &str {
        ""
    }

    fn get_handler_type(&self, prefix: &str) -> Option<String> {
        self.lock_state()
            .entries
            .get(prefix)
            .map(|state| state.declared_type.clone())
    }

    fn get_handler(&self, prefix: &str) -> Result<HandlerInstance> {
        if let Some(instance) = self.constructed(prefix) {
            return Ok(instance);
        }
        self.resolve(prefix, &[])
    }

    fn request_context(&self) -> Option<&RequestContext> {
        self.request.as_ref()
    }
}
