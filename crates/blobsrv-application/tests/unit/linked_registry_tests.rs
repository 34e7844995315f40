//! Tests for linkme self-registration
//!
//! Uses `extern crate blobsrv_providers` to force the real engines and
//! handlers into the binary.

extern crate blobsrv_providers;

use blobsrv_application::ports::registry::{
    ConstructorRegistry, HANDLER_CONSTRUCTORS, STORAGE_CONSTRUCTORS, create_storage,
};
use blobsrv_domain::value_objects::ConfigObj;

use crate::support::EmptyLoader;

#[test]
fn test_linked_slices_contain_providers() {
    let storage: Vec<&str> = STORAGE_CONSTRUCTORS.iter().map(|e| e.name).collect();
    assert!(storage.contains(&"memory"), "linked storage: {storage:?}");
    assert!(storage.contains(&"filesystem"));
    assert!(storage.contains(&"replica"));

    let handlers: Vec<&str> = HANDLER_CONSTRUCTORS.iter().map(|e| e.name).collect();
    assert!(handlers.contains(&"root"), "linked handlers: {handlers:?}");
    assert!(handlers.contains(&"sync"));
}

#[test]
fn test_global_registry_is_seeded_from_slices() {
    let registry = ConstructorRegistry::global();
    assert!(registry.has_storage_type("memory"));
    assert!(registry.has_handler_type("sync"));

    for (name, description) in registry.list_storage_constructors() {
        assert!(!name.is_empty());
        assert!(!description.is_empty(), "{name} should describe itself");
    }
}

#[test]
fn test_global_create_storage_memory() {
    let storage = create_storage("memory", &EmptyLoader, &ConfigObj::new())
        .expect("memory storage needs no arguments");
    storage.receive("sha224-abc", b"hello").unwrap();
    assert_eq!(storage.fetch("sha224-abc").unwrap(), Some(b"hello".to_vec()));
}

#[test]
fn test_global_registry_is_shared() {
    let a = ConstructorRegistry::global();
    let b = ConstructorRegistry::global();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}
