//! Request and response value objects exchanged with HTTP handlers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An inbound HTTP request, reduced to what handlers and loaders inspect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// HTTP method, upper case
    pub method: String,
    /// Request path, including the handler prefix
    pub path: String,
    /// Host header value, if any
    pub host: Option<String>,
    /// Remote peer address, if known
    pub remote_addr: Option<String>,
    /// Header map keyed by lower-case header name
    pub headers: BTreeMap<String, String>,
}

impl RequestContext {
    /// Create a request context for a method and path
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the remote address
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Add a header; names are stored lower case
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Look up a header by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Path remaining after stripping `prefix`, if the request falls under it
    pub fn path_suffix<'a>(&'a self, prefix: &str) -> Option<&'a str> {
        self.path.strip_prefix(prefix)
    }
}

/// Response produced by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    /// HTTP status code
    pub status: u16,
    /// Content type of `body`
    pub content_type: String,
    /// Response payload
    pub body: Vec<u8>,
}

impl HandlerResponse {
    /// A JSON response with status 200
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            status: 200,
            content_type: "application/json".to_string(),
            body: serde_json::to_vec_pretty(value)?,
        })
    }

    /// A plain-text response with the given status
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: body.into().into_bytes(),
        }
    }

    /// Override the status code
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Decode the body as JSON
    pub fn body_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
