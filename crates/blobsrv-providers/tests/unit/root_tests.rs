//! Root discovery handler tests

use blobsrv_application::ports::Loader;
use blobsrv_domain::error::Error;
use blobsrv_domain::value_objects::RequestContext;
use blobsrv_infrastructure::InstanceStatus;
use serde_json::json;

use crate::support::loader;

#[test]
fn test_discovery_names_siblings_without_building_them() {
    let loader = loader(&[
        ("/", "root", json!({ "blob_root": "/bs/" })),
        ("/bs/", "storage-memory", json!({})),
        ("/dst/", "storage-memory", json!({})),
        ("/sync/", "sync", json!({ "from": "/bs/", "to": "/dst/" })),
    ]);

    let root = loader.get_http_handler("/").expect("root loads");
    assert_eq!(loader.status("/bs/"), Some(InstanceStatus::Declared));
    assert_eq!(loader.status("/sync/"), Some(InstanceStatus::Declared));

    let response = root.serve(&RequestContext::new("GET", "/")).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(
        response.body_json().unwrap(),
        json!({
            "root": "/",
            "blobRoot": "/bs/",
            "blobRootType": "storage-memory",
            "syncHandler": "/sync/",
        })
    );
}

#[test]
fn test_discovery_without_optional_siblings() {
    let loader = loader(&[("/", "root", json!({}))]);

    let root = loader.get_http_handler("/").unwrap();
    let body = root.serve(&RequestContext::new("GET", "/")).unwrap().body_json().unwrap();
    assert_eq!(body, json!({ "root": "/" }));
}

#[test]
fn test_discovery_records_request_host() {
    let loader = loader(&[("/", "root", json!({}))])
        .with_request_context(RequestContext::new("GET", "/").with_host("blobs.example:3179"));

    let root = loader.get_http_handler("/").unwrap();
    let body = root.serve(&RequestContext::new("GET", "/")).unwrap().body_json().unwrap();
    assert_eq!(body["host"], "blobs.example:3179");
}

#[test]
fn test_unknown_blob_root() {
    let loader = loader(&[("/", "root", json!({ "blob_root": "/nope/" }))]);

    let err = loader.get_handler("/").unwrap_err();
    assert!(matches!(err, Error::UnknownPrefix { .. }));
}

#[test]
fn test_methods_and_stealth() {
    let loader = loader(&[
        ("/", "root", json!({})),
        ("/hidden/", "root", json!({ "stealth": true })),
    ]);

    let root = loader.get_http_handler("/").unwrap();
    assert_eq!(root.serve(&RequestContext::new("POST", "/")).unwrap().status, 405);

    let hidden = loader.get_http_handler("/hidden/").unwrap();
    assert_eq!(hidden.serve(&RequestContext::new("GET", "/hidden/")).unwrap().status, 404);
}
