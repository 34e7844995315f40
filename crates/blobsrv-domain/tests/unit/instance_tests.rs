//! HandlerInstance capability narrowing

use std::sync::Arc;

use blobsrv_domain::error::{Error, Result};
use blobsrv_domain::ports::{Handler, Storage};
use blobsrv_domain::value_objects::{
    ConstructorKind, HandlerInstance, HandlerResponse, RequestContext,
};

struct NullStorage;

impl Storage for NullStorage {
    fn storage_type(&self) -> &str {
        "null"
    }

    fn receive(&self, _blob_ref: &str, _data: &[u8]) -> Result<()> {
        Ok(())
    }

    fn fetch(&self, _blob_ref: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn enumerate(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

struct EchoHandler;

impl Handler for EchoHandler {
    fn handler_type(&self) -> &str {
        "echo"
    }

    fn serve(&self, request: &RequestContext) -> Result<HandlerResponse> {
        Ok(HandlerResponse::text(200, request.path.clone()))
    }
}

fn storage() -> HandlerInstance {
    HandlerInstance::from(Arc::new(NullStorage) as Arc<dyn Storage>)
}

fn handler() -> HandlerInstance {
    HandlerInstance::from(Arc::new(EchoHandler) as Arc<dyn Handler>)
}

#[test]
fn test_kind_and_type_name() {
    assert_eq!(storage().kind(), ConstructorKind::Storage);
    assert_eq!(storage().type_name(), "null");
    assert_eq!(handler().kind(), ConstructorKind::Handler);
    assert_eq!(handler().type_name(), "echo");
}

#[test]
fn test_into_storage_on_handler_is_capability_mismatch() {
    let err = handler().into_storage("/ui/").err().expect("mismatch");
    match err {
        Error::CapabilityMismatch {
            prefix,
            expected,
            actual,
        } => {
            assert_eq!(prefix, "/ui/");
            assert_eq!(expected, ConstructorKind::Storage);
            assert_eq!(actual, ConstructorKind::Handler);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_narrowing_to_matching_capability() {
    let s = storage().into_storage("/bs/").expect("storage");
    assert!(!s.contains("sha1-0").unwrap());

    let h = handler().into_handler("/echo/").expect("handler");
    let response = h.serve(&RequestContext::new("get", "/echo/x")).unwrap();
    assert_eq!(response.body, b"/echo/x");
    assert!(storage().into_handler("/bs/").is_err());
}

#[test]
fn test_ptr_eq_tracks_identity() {
    let a = storage();
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&storage()));
    assert!(!a.ptr_eq(&handler()));
}
