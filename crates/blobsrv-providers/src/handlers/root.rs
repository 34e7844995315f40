//! Root discovery handler
//!
//! Serves a JSON document telling clients where things live: the root
//! prefix itself, the blob root and the synchronisation handler. None of
//! these siblings is constructed on the root's behalf; their prefixes and
//! types are enough.

use std::sync::Arc;

use blobsrv_application::ports::Loader;
use blobsrv_domain::error::{Error, Result};
use blobsrv_domain::ports::Handler;
use blobsrv_domain::value_objects::{ConfigObj, HandlerResponse, RequestContext};
use serde::Serialize;

use crate::constants::SYNC_HANDLER_TYPE;
use crate::utils::method_not_allowed;

/// Discovery document served on `GET`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    /// Prefix the root handler is mounted at
    pub root: String,
    /// Prefix of the blob root, if configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_root: Option<String>,
    /// Declared type of the blob root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_root_type: Option<String>,
    /// Prefix of the sync handler, if one is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_handler: Option<String>,
    /// Host the configuration was loaded for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// Root discovery handler
pub struct RootHandler {
    discovery: Discovery,
    stealth: bool,
}

impl RootHandler {
    /// Build from handler arguments.
    ///
    /// Optional arguments: `blob_root` (a declared prefix) and `stealth`
    /// (answer every request with 404).
    pub fn from_loader(loader: &dyn Loader, config: &ConfigObj) -> Result<Self> {
        let mut args = config.reader();
        let blob_root = args.optional_string("blob_root")?;
        let stealth = args.optional_bool("stealth", false)?;
        args.validate()?;

        let blob_root_type = match &blob_root {
            Some(prefix) => Some(
                loader
                    .get_handler_type(prefix)
                    .ok_or_else(|| Error::unknown_prefix(prefix.as_str()))?,
            ),
            None => None,
        };
        let sync_handler = match loader.find_handler_by_type(SYNC_HANDLER_TYPE) {
            Ok(found) => Some(found.prefix),
            Err(Error::HandlerTypeNotFound { .. }) => None,
            Err(err) => return Err(err),
        };
        let host = loader
            .request_context()
            .and_then(|request| request.host.clone());

        Ok(Self {
            discovery: Discovery {
                root: loader.my_prefix().to_string(),
                blob_root,
                blob_root_type,
                sync_handler,
                host,
            },
            stealth,
        })
    }

    /// The document this handler serves
    pub fn discovery(&self) -> &Discovery {
        &self.discovery
    }
}

impl Handler for RootHandler {
    fn handler_type(&self) -> &str {
        "root"
    }

    fn serve(&self, request: &RequestContext) -> Result<HandlerResponse> {
        if self.stealth {
            return Ok(HandlerResponse::text(404, "not found"));
        }
        match request.method.as_str() {
            "GET" | "HEAD" => HandlerResponse::json(&self.discovery),
            _ => Ok(method_not_allowed(request, &["GET", "HEAD"])),
        }
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use blobsrv_application::ports::registry::{HANDLER_CONSTRUCTORS, HandlerConstructorEntry};

#[linkme::distributed_slice(HANDLER_CONSTRUCTORS)]
static ROOT_HANDLER: HandlerConstructorEntry = HandlerConstructorEntry {
    name: "root",
    description: "Discovery document naming the blob root and sync handler",
    constructor: |loader: &dyn Loader, config: &ConfigObj| {
        Ok(Arc::new(RootHandler::from_loader(loader, config)?))
    },
};
