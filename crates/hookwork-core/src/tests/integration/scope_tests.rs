#![cfg(test)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::graph::Lookup;
use crate::kernel::error::Error;
use crate::kernel::{App, AppOption};
use crate::logging::Logger;
use crate::runtime::Context;
use crate::scope::ScopeId;
use crate::signal::SignalHub;
use crate::tests::integration::common::{Recorder, entries, isolated_app, journal, memory_logger};

struct Port(u16);
struct Listener(u16);

#[tokio::test]
async fn test_hooks_follow_depth_first_scope_order() {
    let log = journal();
    let logger = memory_logger();
    let mut app = isolated_app(
        &logger,
        vec![
            AppOption::module(
                "a",
                vec![
                    AppOption::hook(Recorder::new("a", &log).arc()),
                    AppOption::module("a1", vec![AppOption::hook(Recorder::new("a1", &log).arc())]),
                ],
            ),
            AppOption::hook(Recorder::new("root", &log).arc()),
            AppOption::module("b", vec![AppOption::hook(Recorder::new("b", &log).arc())]),
        ],
    );

    app.start(&Context::background()).await.expect("start");
    assert_eq!(
        entries(&log),
        vec!["start:root", "start:a", "start:a1", "start:b"]
    );

    let scopes = app.scopes();
    assert_eq!(scopes.len(), 4);
    let names: Vec<String> = scopes.depth_first().into_iter().map(|id| scopes.path(id)).collect();
    assert_eq!(names, vec!["root", "root/a", "root/a/a1", "root/b"]);
}

#[tokio::test]
async fn test_module_settings_apply_to_the_root() {
    let logger = memory_logger();
    let app = isolated_app(
        &logger,
        vec![AppOption::module(
            "slow",
            vec![
                AppOption::StartTimeout(Duration::from_millis(250)),
                AppOption::module("slower", vec![AppOption::StopTimeout(Duration::from_millis(500))]),
            ],
        )],
    );

    assert_eq!(app.start_timeout(), Duration::from_millis(250));
    assert_eq!(app.stop_timeout(), Duration::from_millis(500));
    let root = app.scopes().get(ScopeId::ROOT).expect("root");
    assert_eq!(root.children().len(), 1);
}

#[tokio::test]
async fn test_module_constructor_sees_root_types() {
    let logger = memory_logger();
    let app = isolated_app(
        &logger,
        vec![
            AppOption::supply(Port(9090)),
            AppOption::module(
                "http",
                vec![AppOption::provide_fn("new_listener", |graph: &dyn Lookup| {
                    Ok(Listener(graph.get::<Port>()?.0))
                })],
            ),
        ],
    );
    assert!(app.err().is_none(), "unexpected error: {:?}", app.err());
}

#[tokio::test]
async fn test_module_types_are_private_to_the_module() {
    let logger = memory_logger();
    let app = isolated_app(
        &logger,
        vec![
            AppOption::module("http", vec![AppOption::supply(Listener(80))]),
            AppOption::invoke("use_listener", |graph: &dyn Lookup| {
                let listener = graph.get::<Listener>()?;
                assert_eq!(listener.0, 80);
                Ok(())
            }),
        ],
    );

    match app.err() {
        Some(Error::Invoke { name, source }) => {
            assert_eq!(name, "use_listener");
            assert!(source.to_string().contains("missing type"));
        }
        other => panic!("Expected Invoke error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invocation_declared_in_module_runs_once() {
    let logger = memory_logger();
    let app = isolated_app(
        &logger,
        vec![AppOption::module(
            "jobs",
            vec![AppOption::invoke("schedule", |_graph: &dyn Lookup| Ok(()))],
        )],
    );
    assert!(app.err().is_none());
    let invokes = logger
        .lines()
        .into_iter()
        .filter(|line| line.starts_with("INVOKE") && line.ends_with("schedule"))
        .count();
    assert_eq!(invokes, 1);
}

#[tokio::test]
async fn test_module_invocation_keeps_registration_order() {
    let logger = memory_logger();
    let order = Arc::new(Mutex::new(Vec::new()));
    let record = |name: &'static str| {
        let order = Arc::clone(&order);
        AppOption::invoke(name, move |_graph: &dyn Lookup| {
            order.lock().unwrap().push(name);
            Ok(())
        })
    };

    let app = isolated_app(
        &logger,
        vec![
            record("root_first"),
            AppOption::module("child", vec![record("child"), AppOption::module("grandchild", vec![record("grandchild")])]),
            record("root_last"),
        ],
    );

    assert!(app.err().is_none());
    assert_eq!(*order.lock().unwrap(), vec!["root_first", "child", "grandchild", "root_last"]);
}

#[tokio::test]
async fn test_error_hook_declared_in_module_sees_root_invocation_failure() {
    let logger = memory_logger();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(None));
    let (counter, slot) = (Arc::clone(&calls), Arc::clone(&seen));

    let app = isolated_app(
        &logger,
        vec![
            AppOption::module(
                "child",
                vec![AppOption::error_hook(move |err: &Error| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    *slot.lock().unwrap() = Some(err.clone());
                })],
            ),
            AppOption::invoke("explode", |_graph: &dyn Lookup| Err("boom".into())),
        ],
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    match seen.lock().unwrap().as_ref() {
        Some(Error::Invoke { name, .. }) => assert_eq!(name, "explode"),
        other => panic!("Expected Invoke error, got {:?}", other),
    }
    assert!(matches!(app.err(), Some(Error::Invoke { .. })));
}

#[tokio::test]
async fn test_logger_declared_in_module_receives_root_messages() {
    let logger = memory_logger();
    let app = App::new(vec![
        AppOption::SignalHub(Arc::new(SignalHub::new())),
        AppOption::module(
            "child",
            vec![AppOption::Logger(Arc::clone(&logger) as Arc<dyn Logger>)],
        ),
        AppOption::invoke("main", |_graph: &dyn Lookup| Ok(())),
    ]);

    assert!(app.err().is_none());
    assert!(logger.contains("INVOKE\t\tmain"));
}

#[tokio::test]
async fn test_root_decorator_is_seen_by_invocations() {
    let logger = memory_logger();
    let seen = Arc::new(AtomicUsize::new(0));
    let port = Arc::clone(&seen);
    let app = isolated_app(
        &logger,
        vec![
            AppOption::invoke("read_port", move |graph: &dyn Lookup| {
                port.store(graph.get::<Port>()?.0 as usize, Ordering::SeqCst);
                Ok(())
            }),
            AppOption::decorate("bump_port", |port: Arc<Port>, _graph: &dyn Lookup| {
                Ok(Port(port.0 + 1))
            }),
            AppOption::supply(Port(8080)),
        ],
    );

    assert!(app.err().is_none(), "unexpected error: {:?}", app.err());
    assert_eq!(seen.load(Ordering::SeqCst), 8081);
    assert!(logger.contains("DECORATE\t"));
    assert!(logger.contains("bump_port (root)"));
}

#[tokio::test]
async fn test_module_decorator_sees_types_provided_after_it() {
    let logger = memory_logger();
    let seen = Arc::new(AtomicUsize::new(0));
    let port = Arc::clone(&seen);
    let app = isolated_app(
        &logger,
        vec![
            AppOption::module(
                "tls",
                vec![AppOption::decorate("tls_port", |_port: Arc<Port>, _graph: &dyn Lookup| {
                    Ok(Port(443))
                })],
            ),
            AppOption::supply(Port(80)),
            AppOption::invoke("read_port", move |graph: &dyn Lookup| {
                port.store(graph.get::<Port>()?.0 as usize, Ordering::SeqCst);
                Ok(())
            }),
        ],
    );

    assert!(app.err().is_none(), "unexpected error: {:?}", app.err());
    assert_eq!(seen.load(Ordering::SeqCst), 80, "root keeps the undecorated port");
    assert!(logger.contains("tls_port (root/tls)"));
}

#[tokio::test]
async fn test_decorating_an_unprovided_type_is_a_construction_error() {
    let log = journal();
    let logger = memory_logger();
    let mut app = isolated_app(
        &logger,
        vec![
            AppOption::hook(Recorder::new("db", &log).arc()),
            AppOption::decorate("bump_port", |port: Arc<Port>, _graph: &dyn Lookup| {
                Ok(Port(port.0 + 1))
            }),
            AppOption::invoke("never", |_graph: &dyn Lookup| Err("should not run".into())),
        ],
    );

    assert!(matches!(app.err(), Some(Error::Decorate { .. })));
    assert!(!logger.contains("INVOKE"));
    let err = app.start(&Context::background()).await.expect_err("construction error");
    assert_eq!(err.as_label(), "decorate");
    assert!(entries(&log).is_empty());
}
