//! Opaque per-handler configuration
//!
//! [`ConfigObj`] is the type-specific payload handed verbatim to a
//! constructor. The loader never looks inside it. Constructors read it
//! through a [`ConfigReader`], which remembers the keys consumed so that
//! [`ConfigReader::validate`] can reject typos and unsupported options.
//!
//! ```
//! use blobsrv_domain::value_objects::ConfigObj;
//!
//! let config = ConfigObj::from_value(serde_json::json!({"path": "/tmp/blobs"})).unwrap();
//! let mut args = config.reader();
//! let path = args.required_string("path").unwrap();
//! args.validate().unwrap();
//! assert_eq!(path, "/tmp/blobs");
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Type-specific configuration document for one handler instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigObj(Map<String, Value>);

impl ConfigObj {
    /// An empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(Error::config(format!(
                "handler arguments must be an object, got {other}"
            ))),
        }
    }

    /// Add a key, for programmatic construction
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Start reading this document
    pub fn reader(&self) -> ConfigReader<'_> {
        ConfigReader {
            obj: self,
            seen: BTreeSet::new(),
        }
    }

    /// Borrow the underlying JSON map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ConfigObj {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Typed, key-tracking accessor over a [`ConfigObj`]
pub struct ConfigReader<'a> {
    obj: &'a ConfigObj,
    seen: BTreeSet<String>,
}

impl<'a> ConfigReader<'a> {
    fn take(&mut self, key: &str) -> Option<&'a Value> {
        self.seen.insert(key.to_string());
        self.obj.0.get(key)
    }

    /// A string that must be present
    pub fn required_string(&mut self, key: &str) -> Result<String> {
        match self.take(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(wrong_type(key, "a string", other)),
            None => Err(missing(key)),
        }
    }

    /// A string, or `None` when absent
    pub fn optional_string(&mut self, key: &str) -> Result<Option<String>> {
        match self.take(key) {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(wrong_type(key, "a string", other)),
        }
    }

    /// A boolean, or `default` when absent
    pub fn optional_bool(&mut self, key: &str, default: bool) -> Result<bool> {
        match self.take(key) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Null) | None => Ok(default),
            Some(other) => Err(wrong_type(key, "a boolean", other)),
        }
    }

    /// An integer, or `default` when absent
    pub fn optional_int(&mut self, key: &str, default: i64) -> Result<i64> {
        match self.take(key) {
            Some(value @ Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| wrong_type(key, "an integer", value)),
            Some(Value::Null) | None => Ok(default),
            Some(other) => Err(wrong_type(key, "an integer", other)),
        }
    }

    /// A list of strings that must be present
    pub fn required_string_list(&mut self, key: &str) -> Result<Vec<String>> {
        match self.take(key) {
            Some(value) => string_list(key, value),
            None => Err(missing(key)),
        }
    }

    /// A list of strings, or empty when absent
    pub fn optional_string_list(&mut self, key: &str) -> Result<Vec<String>> {
        match self.take(key) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(value) => string_list(key, value),
        }
    }

    /// A nested object, or empty when absent
    pub fn optional_object(&mut self, key: &str) -> Result<ConfigObj> {
        match self.take(key) {
            Some(Value::Object(map)) => Ok(ConfigObj(map.clone())),
            Some(Value::Null) | None => Ok(ConfigObj::default()),
            Some(other) => Err(wrong_type(key, "an object", other)),
        }
    }

    /// Fail if the document contains keys nobody asked for
    pub fn validate(&self) -> Result<()> {
        let unknown: Vec<&str> = self
            .obj
            .keys()
            .filter(|key| !self.seen.contains(*key))
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(Error::config(format!(
                "unknown handler argument(s): {}",
                unknown.join(", ")
            )))
        }
    }
}

fn string_list(key: &str, value: &Value) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(wrong_type(key, "a list of strings", value));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(wrong_type(key, "a list of strings", other)),
        })
        .collect()
}

fn missing(key: &str) -> Error {
    Error::config(format!("missing required handler argument \"{key}\""))
}

fn wrong_type(key: &str, expected: &str, found: &Value) -> Error {
    Error::config(format!(
        "handler argument \"{key}\" must be {expected}, got {found}"
    ))
}
