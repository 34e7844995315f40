//! The frozen result of a complete configuration load

use std::collections::BTreeMap;
use std::sync::Arc;

use blobsrv_domain::error::{Error, Result};
use blobsrv_domain::ports::{Handler, Storage};
use blobsrv_domain::value_objects::HandlerInstance;

#[derive(Debug)]
struct LoadedEntry {
    declared_type: String,
    instance: HandlerInstance,
}

/// Every configured prefix, fully constructed. Read-only and cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct LoadedHandlers {
    entries: Arc<BTreeMap<String, LoadedEntry>>,
}

impl LoadedHandlers {
    pub(crate) fn from_entries(entries: impl IntoIterator<Item = (String, String, HandlerInstance)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(prefix, declared_type, instance)| {
                (
                    prefix,
                    LoadedEntry {
                        declared_type,
                        instance,
                    },
                )
            })
            .collect();
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Instance for `prefix`
    pub fn get(&self, prefix: &str) -> Option<&HandlerInstance> {
        self.entries.get(prefix).map(|entry| &entry.instance)
    }

    /// Declared type for `prefix`
    pub fn handler_type(&self, prefix: &str) -> Option<&str> {
        self.entries
            .get(prefix)
            .map(|entry| entry.declared_type.as_str())
    }

    /// Storage instance for `prefix`
    pub fn get_storage(&self, prefix: &str) -> Result<Arc<dyn Storage>> {
        self.get(prefix)
            .cloned()
            .ok_or_else(|| Error::unknown_prefix(prefix))?
            .into_storage(prefix)
    }

    /// HTTP handler instance for `prefix`
    pub fn get_http_handler(&self, prefix: &str) -> Result<Arc<dyn Handler>> {
        self.get(prefix)
            .cloned()
            .ok_or_else(|| Error::unknown_prefix(prefix))?
            .into_handler(prefix)
    }

    /// First prefix (in prefix order) declaring `handler_type`, with its instance
    pub fn find_by_type(&self, handler_type: &str) -> Option<(&str, &HandlerInstance)> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.declared_type == handler_type)
            .map(|(prefix, entry)| (prefix.as_str(), &entry.instance))
    }

    /// Iterate `(prefix, declared type, instance)` in prefix order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &HandlerInstance)> {
        self.entries.iter().map(|(prefix, entry)| {
            (
                prefix.as_str(),
                entry.declared_type.as_str(),
                &entry.instance,
            )
        })
    }

    /// Number of loaded prefixes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was configured
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
