//! HandlerLoader tests
//!
//! Construct-once semantics, dependency resolution, sibling discovery and
//! failure handling, each against an isolated registry.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use blobsrv_application::ports::registry::ConstructorRegistry;
use blobsrv_application::ports::{FindHandlerByType, Loader};
use blobsrv_domain::error::Error;
use blobsrv_domain::value_objects::{ConfigObj, ConstructorKind, RequestContext};
use blobsrv_infrastructure::InstanceStatus;

use crate::support::{
    Counter, args, handler_for, loader, register_ref_handler, shared_slot, storage_for,
};

fn counting_storage(registry: &ConstructorRegistry, type_name: &str, counter: &Counter) {
    let counter = counter.clone();
    registry.register_storage_constructor(type_name, move |loader, _config| {
        counter.bump();
        Ok(storage_for(loader))
    });
}

fn counting_handler(registry: &ConstructorRegistry, type_name: &str, counter: &Counter) {
    let counter = counter.clone();
    registry.register_handler_constructor(type_name, move |loader, _config| {
        counter.bump();
        Ok(handler_for(loader))
    });
}

#[test]
fn test_nothing_constructed_until_requested() {
    let registry = Arc::new(ConstructorRegistry::new());
    let built = Counter::default();
    counting_storage(&registry, "memory", &built);

    let loader = loader(&registry, &[("/bs/", "memory", ConfigObj::new())]);

    assert_eq!(loader.status("/bs/"), Some(InstanceStatus::Declared));
    assert_eq!(loader.get_handler_type("/bs/").as_deref(), Some("memory"));
    assert_eq!(built.get(), 0);
}

#[test]
fn test_get_handler_type_unknown_prefix() {
    let registry = Arc::new(ConstructorRegistry::new());
    let loader = loader(&registry, &[]);

    assert!(loader.get_handler_type("/nope/").is_none());
    assert!(loader.status("/nope/").is_none());
}

#[test]
fn test_get_handler_constructs_once() {
    let registry = Arc::new(ConstructorRegistry::new());
    let built = Counter::default();
    counting_storage(&registry, "memory", &built);

    let loader = loader(&registry, &[("/bs/", "memory", ConfigObj::new())]);

    let first = loader.get_handler("/bs/").expect("first load");
    let second = loader.get_handler("/bs/").expect("second load");

    assert!(first.ptr_eq(&second));
    assert_eq!(first.kind(), ConstructorKind::Storage);
    assert_eq!(built.get(), 1);
    assert_eq!(loader.status("/bs/"), Some(InstanceStatus::Constructed));
}

#[test]
fn test_dependency_built_by_dependent_is_reused() {
    let registry = Arc::new(ConstructorRegistry::new());
    let leaf_built = Counter::default();
    counting_storage(&registry, "leaf", &leaf_built);
    register_ref_handler(&registry, "dependent");

    let loader = loader(
        &registry,
        &[
            ("/a/", "dependent", args("ref", "/b/")),
            ("/b/", "leaf", ConfigObj::new()),
        ],
    );

    loader.get_handler("/a/").expect("dependent loads");
    assert_eq!(loader.status("/b/"), Some(InstanceStatus::Constructed));
    assert_eq!(leaf_built.get(), 1);

    let b1 = loader.get_handler("/b/").expect("dependency cached");
    let b2 = loader.get_handler("/b/").expect("dependency cached");
    assert!(b1.ptr_eq(&b2));
    assert_eq!(leaf_built.get(), 1);
}

#[test]
fn test_index_over_disk_storage() {
    let registry = Arc::new(ConstructorRegistry::new());
    let disk_built = Counter::default();
    counting_storage(&registry, "diskstorage", &disk_built);

    let observed = shared_slot::<String>();
    let slot = Arc::clone(&observed);
    registry.register_handler_constructor("index", move |loader, config| {
        let mut args = config.reader();
        let backing = args.required_string("dependsOnStorage")?;
        args.validate()?;
        let storage = loader.get_storage(&backing)?;
        *slot.lock().unwrap() = Some(storage.storage_type().to_string());
        Ok(handler_for(loader))
    });

    let loader = loader(
        &registry,
        &[
            ("/idx/", "index", args("dependsOnStorage", "/blobs/")),
            ("/blobs/", "diskstorage", args("path", "/tmp/blobs")),
        ],
    );

    let idx = loader.get_handler("/idx/").expect("index loads");
    assert_eq!(idx.kind(), ConstructorKind::Handler);
    assert_eq!(observed.lock().unwrap().as_deref(), Some("test"));
    assert_eq!(loader.status("/blobs/"), Some(InstanceStatus::Constructed));

    loader.get_handler("/blobs/").expect("storage cached");
    assert_eq!(disk_built.get(), 1);
}

#[test]
fn test_my_prefix_tracks_nested_construction() {
    let registry = Arc::new(ConstructorRegistry::new());
    let seen = shared_slot::<Vec<String>>();

    let slot = Arc::clone(&seen);
    registry.register_handler_constructor("outer", move |loader, config| {
        let before = loader.my_prefix().to_string();
        let target = config.reader().required_string("ref")?;
        loader.get_handler(&target)?;
        let after = loader.my_prefix().to_string();
        slot.lock().unwrap().get_or_insert_with(Vec::new).extend([before, after]);
        Ok(handler_for(loader))
    });
    let slot = Arc::clone(&seen);
    registry.register_storage_constructor("inner", move |loader, _config| {
        slot.lock()
            .unwrap()
            .get_or_insert_with(Vec::new)
            .push(loader.my_prefix().to_string());
        Ok(storage_for(loader))
    });

    let loader = loader(
        &registry,
        &[
            ("/a/", "outer", args("ref", "/b/")),
            ("/b/", "inner", ConfigObj::new()),
        ],
    );
    assert_eq!(loader.my_prefix(), "");
    loader.get_handler("/a/").expect("outer loads");

    assert_eq!(
        seen.lock().unwrap().clone().unwrap_or_default(),
        vec!["/b/", "/a/", "/a/"]
    );
}

#[test]
fn test_find_handler_by_type_does_not_force_construction() {
    let registry = Arc::new(ConstructorRegistry::new());
    let ui_built = Counter::default();
    counting_handler(&registry, "ui", &ui_built);

    let observed = shared_slot::<(String, bool)>();
    let slot = Arc::clone(&observed);
    registry.register_handler_constructor("finder", move |loader, _config| {
        let found = loader.find_handler_by_type("ui")?;
        *slot.lock().unwrap() = Some((found.prefix, found.instance.is_some()));
        Ok(handler_for(loader))
    });

    let loader = loader(
        &registry,
        &[
            ("/finder/", "finder", ConfigObj::new()),
            ("/ui/", "ui", ConfigObj::new()),
        ],
    );
    loader.get_handler("/finder/").expect("finder loads");

    assert_eq!(
        observed.lock().unwrap().clone(),
        Some(("/ui/".to_string(), false))
    );
    assert_eq!(ui_built.get(), 0);
    assert_eq!(loader.status("/ui/"), Some(InstanceStatus::Declared));
}

#[test]
fn test_find_handler_by_type_after_load_all() {
    let registry = Arc::new(ConstructorRegistry::new());
    counting_handler(&registry, "ui", &Counter::default());
    counting_storage(&registry, "memory", &Counter::default());

    let loader = loader(
        &registry,
        &[
            ("/bs/", "memory", ConfigObj::new()),
            ("/ui/", "ui", ConfigObj::new()),
        ],
    );
    let loaded = loader.load_all().expect("graph loads");

    let found = loader.find_handler_by_type("ui").expect("ui declared");
    assert_eq!(found.prefix, "/ui/");
    let instance = found.instance.expect("constructed after load_all");
    assert!(instance.ptr_eq(loaded.get("/ui/").expect("ui loaded")));

    let (prefix, _) = loaded.find_by_type("memory").expect("memory loaded");
    assert_eq!(prefix, "/bs/");
}

#[test]
fn test_find_handler_by_type_smallest_prefix_wins() {
    let registry = Arc::new(ConstructorRegistry::new());
    counting_storage(&registry, "memory", &Counter::default());

    let loader = loader(
        &registry,
        &[
            ("/zz/", "memory", ConfigObj::new()),
            ("/aa/", "memory", ConfigObj::new()),
            ("/mm/", "memory", ConfigObj::new()),
        ],
    );

    let found = loader.find_handler_by_type("memory").expect("declared");
    assert_eq!(found.prefix, "/aa/");
}

#[test]
fn test_find_handler_by_type_unknown() {
    let registry = Arc::new(ConstructorRegistry::new());
    let loader = loader(&registry, &[]);

    let err = loader.find_handler_by_type("sync").unwrap_err();
    assert!(matches!(err, Error::HandlerTypeNotFound { .. }));
    assert_eq!(err.to_string(), "requested handler type \"sync\" not loaded");
}

#[test]
fn test_request_context_visible_to_constructors() {
    let registry = Arc::new(ConstructorRegistry::new());
    let observed = shared_slot::<Option<String>>();
    let slot = Arc::clone(&observed);
    registry.register_handler_constructor("root", move |loader, _config| {
        let host = loader
            .request_context()
            .and_then(|request| request.host.clone());
        *slot.lock().unwrap() = Some(host);
        Ok(handler_for(loader))
    });

    let with_request = loader(&registry, &[("/", "root", ConfigObj::new())])
        .with_request_context(RequestContext::new("get", "/").with_host("blobs.example"));
    with_request.get_handler("/").expect("root loads");
    assert_eq!(
        observed.lock().unwrap().clone(),
        Some(Some("blobs.example".to_string()))
    );

    let without_request = loader(&registry, &[("/", "root", ConfigObj::new())]);
    assert!(without_request.request_context().is_none());
    without_request.get_handler("/").expect("root loads");
    assert_eq!(observed.lock().unwrap().clone(), Some(None));
}

#[test]
fn test_unknown_prefix_is_reported() {
    let registry = Arc::new(ConstructorRegistry::new());
    register_ref_handler(&registry, "dependent");

    let loader = loader(&registry, &[("/a/", "dependent", args("ref", "/missing/"))]);

    let err = loader.get_handler("/a/").unwrap_err();
    assert!(matches!(err, Error::UnknownPrefix { ref prefix } if prefix == "/missing/"));
    assert!(err.is_configuration_error());
    assert_eq!(loader.status("/a/"), Some(InstanceStatus::Failed));
    assert!(loader.status("/missing/").is_none());
}

#[test]
fn test_unknown_type_fails_prefix() {
    let registry = Arc::new(ConstructorRegistry::new());
    let loader = loader(&registry, &[("/x/", "nosuchtype", ConfigObj::new())]);

    let err = loader.get_handler("/x/").unwrap_err();
    assert!(matches!(err, Error::UnregisteredType { .. }));
    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("nosuchtype"));
    assert_eq!(loader.status("/x/"), Some(InstanceStatus::Failed));
}

#[test]
fn test_storage_prefixed_type_uses_storage_table() {
    let registry = Arc::new(ConstructorRegistry::new());
    counting_storage(&registry, "memory", &Counter::default());

    let loader = loader(&registry, &[("/bs/", "storage-memory", ConfigObj::new())]);

    let storage = loader.get_storage("/bs/").expect("storage loads");
    assert_eq!(storage.storage_type(), "test");
    assert_eq!(loader.get_handler_type("/bs/").as_deref(), Some("storage-memory"));
}

#[test]
fn test_capability_mismatch() {
    let registry = Arc::new(ConstructorRegistry::new());
    counting_handler(&registry, "ui", &Counter::default());
    counting_storage(&registry, "memory", &Counter::default());

    let loader = loader(
        &registry,
        &[
            ("/bs/", "memory", ConfigObj::new()),
            ("/ui/", "ui", ConfigObj::new()),
        ],
    );

    let Err(err) = loader.get_storage("/ui/") else {
        panic!("a handler must not narrow to storage");
    };
    assert!(matches!(err, Error::CapabilityMismatch { .. }));
    assert!(loader.get_http_handler("/bs/").is_err());

    // A mismatch is about the caller, the instance itself stays usable
    assert!(loader.get_http_handler("/ui/").is_ok());
    assert!(loader.get_storage("/bs/").is_ok());
}

#[test]
fn test_failed_constructor_is_not_retried() {
    let registry = Arc::new(ConstructorRegistry::new());
    let attempts = Counter::default();
    let counter = attempts.clone();
    registry.register_storage_constructor("flaky", move |_loader, _config| {
        counter.bump();
        Err(Error::config("backing directory missing"))
    });

    let loader = loader(&registry, &[("/bs/", "flaky", ConfigObj::new())]);

    let first = loader.get_handler("/bs/").unwrap_err();
    assert_eq!(first.to_string(), "Configuration error: backing directory missing");

    let second = loader.get_handler("/bs/").unwrap_err();
    match second {
        Error::PreviouslyFailed { prefix, message } => {
            assert_eq!(prefix, "/bs/");
            assert!(message.contains("backing directory missing"));
        }
        other => panic!("expected previous failure, got {other}"),
    }
    assert_eq!(attempts.get(), 1);
}

#[test]
fn test_panicking_constructor_marks_failed() {
    let registry = Arc::new(ConstructorRegistry::new());
    registry.register_storage_constructor("explosive", |_loader, _config| {
        panic!("boom");
    });

    let loader = loader(&registry, &[("/bs/", "explosive", ConfigObj::new())]);

    let unwound = panic::catch_unwind(AssertUnwindSafe(|| loader.get_handler("/bs/")));
    assert!(unwound.is_err());
    assert_eq!(loader.status("/bs/"), Some(InstanceStatus::Failed));

    let err = loader.get_handler("/bs/").unwrap_err();
    assert!(err.to_string().contains("constructor panicked"));
}

#[test]
fn test_concurrent_requests_construct_once() {
    let registry = Arc::new(ConstructorRegistry::new());
    let built = Counter::default();
    let counter = built.clone();
    registry.register_storage_constructor("slow", move |loader, _config| {
        counter.bump();
        thread::sleep(std::time::Duration::from_millis(20));
        Ok(storage_for(loader))
    });

    let loader = Arc::new(loader(&registry, &[("/bs/", "slow", ConfigObj::new())]));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let loader = Arc::clone(&loader);
            thread::spawn(move || loader.get_handler("/bs/").expect("load"))
        })
        .collect();
    let instances: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread"))
        .collect();

    assert_eq!(built.get(), 1);
    assert!(instances.windows(2).all(|pair| pair[0].ptr_eq(&pair[1])));
}

#[test]
fn test_sibling_threads_share_one_dependency() {
    let registry = Arc::new(ConstructorRegistry::new());
    let built = Counter::default();
    let counter = built.clone();
    registry.register_storage_constructor("slow", move |loader, _config| {
        counter.bump();
        thread::sleep(std::time::Duration::from_millis(50));
        Ok(storage_for(loader))
    });
    registry.register_handler_constructor("fan", |loader, _config| {
        let (left, right) = thread::scope(|scope| {
            let left = scope.spawn(|| loader.get_storage("/bs/"));
            let right = scope.spawn(|| loader.get_storage("/bs/"));
            (left.join(), right.join())
        });
        let left = left.expect("left thread")?;
        let right = right.expect("right thread")?;
        assert!(Arc::ptr_eq(&left, &right));
        Ok(handler_for(loader))
    });

    let loader = loader(
        &registry,
        &[
            ("/fan/", "fan", ConfigObj::new()),
            ("/bs/", "slow", ConfigObj::new()),
        ],
    );

    assert!(loader.get_handler("/fan/").is_ok());
    assert_eq!(built.get(), 1);
    assert_eq!(loader.status("/bs/"), Some(InstanceStatus::Constructed));
}

#[test]
fn test_redeclaring_prefix_is_rejected() {
    let registry = Arc::new(ConstructorRegistry::new());
    let built = Counter::default();
    counting_storage(&registry, "memory", &built);
    counting_storage(&registry, "other", &built);

    let loader = loader(&registry, &[("/bs/", "memory", ConfigObj::new())]);
    let first = loader.get_handler("/bs/").expect("first load");

    let err = loader
        .declare("/bs/", "other", ConfigObj::new())
        .unwrap_err();
    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("already declared"));

    assert_eq!(loader.status("/bs/"), Some(InstanceStatus::Constructed));
    assert_eq!(loader.get_handler_type("/bs/").as_deref(), Some("memory"));
    let again = loader.get_handler("/bs/").expect("cached");
    assert!(first.ptr_eq(&again));
    assert_eq!(built.get(), 1);
}

#[test]
fn test_load_all_returns_complete_graph() {
    let registry = Arc::new(ConstructorRegistry::new());
    counting_storage(&registry, "memory", &Counter::default());
    register_ref_handler(&registry, "dependent");

    let loader = loader(
        &registry,
        &[
            ("/a/", "dependent", args("ref", "/bs/")),
            ("/bs/", "memory", ConfigObj::new()),
        ],
    );
    let loaded = loader.load_all().expect("graph loads");

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.handler_type("/a/"), Some("dependent"));
    assert!(loaded.get_storage("/bs/").is_ok());
    assert!(loaded.get_http_handler("/a/").is_ok());
    let prefixes: Vec<_> = loaded.iter().map(|(prefix, _, _)| prefix).collect();
    assert_eq!(prefixes, vec!["/a/", "/bs/"]);
}

#[test]
fn test_load_all_fails_fast() {
    let registry = Arc::new(ConstructorRegistry::new());
    let built = Counter::default();
    counting_storage(&registry, "memory", &built);

    let loader = loader(
        &registry,
        &[
            ("/a/", "nosuchtype", ConfigObj::new()),
            ("/b/", "memory", ConfigObj::new()),
        ],
    );

    assert!(loader.load_all().is_err());
    assert_eq!(built.get(), 0);
    assert_eq!(loader.status("/b/"), Some(InstanceStatus::Declared));
}

#[test]
fn test_late_declaration() {
    let registry = Arc::new(ConstructorRegistry::new());
    counting_storage(&registry, "memory", &Counter::default());

    let loader = loader(&registry, &[]);
    loader
        .declare("/late/", "memory", ConfigObj::new())
        .expect("fresh prefix");

    assert_eq!(loader.prefixes(), vec!["/late/".to_string()]);
    assert!(loader.get_storage("/late/").is_ok());
}
