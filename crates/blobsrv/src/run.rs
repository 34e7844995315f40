//! Startup sequence shared by the binary and tests

use std::path::Path;

use blobsrv_application::ConstructorRegistry;
use blobsrv_domain::error::Result;
use blobsrv_infrastructure::logging::init_logging;
use blobsrv_infrastructure::{AppConfig, ConfigLoader, HandlerLoader, LoadedHandlers};
use tracing::info;

/// Load configuration and construct every declared prefix
pub fn load(config_path: Option<&Path>) -> Result<(AppConfig, LoadedHandlers)> {
    let config = config_loader(config_path).load()?;
    let loaded = HandlerLoader::from_config(&config).load_all()?;
    Ok((config, loaded))
}

/// One `prefix -> type (storage|handler)` line per loaded prefix
pub fn describe_loaded(loaded: &LoadedHandlers) -> Vec<String> {
    loaded
        .iter()
        .map(|(prefix, declared_type, instance)| {
            format!(
                "{prefix} -> {declared_type} ({})",
                instance.kind().to_string().to_lowercase()
            )
        })
        .collect()
}

/// One line per registered constructor, storage engines first
pub fn describe_types(registry: &ConstructorRegistry) -> Vec<String> {
    let storage = registry
        .list_storage_constructors()
        .into_iter()
        .map(|(name, description)| format!("storage  {name:<12} {description}"));
    let handlers = registry
        .list_handler_constructors()
        .into_iter()
        .map(|(name, description)| format!("handler  {name:<12} {description}"));
    storage.chain(handlers).collect()
}

/// Run the binary: list the registered types, or load the configured
/// prefixes and print what was built.
pub fn run(config_path: Option<&Path>, list_types: bool) -> Result<()> {
    if list_types {
        for line in describe_types(&ConstructorRegistry::global()) {
            println!("{line}");
        }
        return Ok(());
    }

    let config = config_loader(config_path).load()?;
    init_logging(config.logging.clone())?;
    info!(listen = %config.server.listen, prefixes = config.prefixes.len(), "configuration loaded");

    let loaded = HandlerLoader::from_config(&config).load_all()?;
    for line in describe_loaded(&loaded) {
        println!("{line}");
    }
    Ok(())
}

fn config_loader(config_path: Option<&Path>) -> ConfigLoader {
    match config_path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    }
}
