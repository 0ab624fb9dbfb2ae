#![cfg(test)]

use std::sync::Arc;

use crate::graph::Lookup;
use crate::kernel::error::Error;
use crate::kernel::{AppOption, AppState};
use crate::lifecycle::Lifecycle;
use crate::runtime::Context;
use crate::tests::integration::common::{Journal, Recorder, entries, isolated_app, journal, memory_logger};

struct Database {
    journal: Journal,
}

struct HttpServer;

fn database(log: &Journal) -> AppOption {
    let log = Arc::clone(log);
    AppOption::provide_fn("new_database", move |graph: &dyn Lookup| {
        graph.get::<Lifecycle>()?.append(Recorder::new("database", &log).arc())?;
        Ok(Database { journal: log })
    })
}

fn http_server() -> AppOption {
    AppOption::provide_fn("new_http_server", |graph: &dyn Lookup| {
        let db = graph.get::<Database>()?;
        graph.get::<Lifecycle>()?.append(Recorder::new("http", &db.journal).arc())?;
        Ok(HttpServer)
    })
}

#[tokio::test]
async fn test_constructor_hooks_precede_declared_hooks() {
    let log = journal();
    let logger = memory_logger();
    let mut app = isolated_app(
        &logger,
        vec![
            AppOption::hook(Recorder::new("declared", &log).arc()),
            database(&log),
            http_server(),
            AppOption::invoke("touch_server", |graph: &dyn Lookup| {
                graph.get::<HttpServer>()?;
                Ok(())
            }),
        ],
    );
    assert!(app.err().is_none(), "unexpected error: {:?}", app.err());
    assert!(logger.contains("PROVIDE"));

    let ctx = Context::background();
    app.start(&ctx).await.expect("start");
    app.stop(&ctx).await.expect("stop");

    assert_eq!(
        entries(&log),
        vec![
            "start:database",
            "start:http",
            "start:declared",
            "stop:declared",
            "stop:http",
            "stop:database",
        ]
    );
}

#[tokio::test]
async fn test_second_start_picks_up_new_hooks_only() {
    let log = journal();
    let logger = memory_logger();
    let mut app = isolated_app(&logger, vec![AppOption::hook(Recorder::new("first", &log).arc())]);
    let ctx = Context::background();

    app.start(&ctx).await.expect("first start");
    app.lifecycle()
        .append(Recorder::new("second", &log).arc())
        .expect("append between passes");
    app.start(&ctx).await.expect("second start");
    assert_eq!(app.state(), AppState::Started);
    app.stop(&ctx).await.expect("stop");

    assert_eq!(
        entries(&log),
        vec!["start:first", "start:second", "stop:second", "stop:first"]
    );
}

#[tokio::test]
async fn test_partial_start_then_explicit_stop_is_clean() {
    let log = journal();
    let logger = memory_logger();
    let mut app = isolated_app(
        &logger,
        vec![AppOption::Hook(vec![
            Recorder::new("ok", &log).arc(),
            Recorder::new("bad", &log).failing_start().arc(),
        ])],
    );
    let ctx = Context::background();

    assert!(app.start(&ctx).await.is_err());
    // Rollback already stopped "ok"; a later stop has nothing left to do.
    app.stop(&ctx).await.expect("stop after rollback");
    assert_eq!(entries(&log), vec!["start:ok", "start:bad", "stop:ok"]);
}

#[tokio::test]
async fn test_missing_dependency_reports_scope() {
    let logger = memory_logger();
    let app = isolated_app(&logger, vec![http_server()]);

    match app.err() {
        Some(Error::Provide { name, source, .. }) => {
            assert_eq!(name, "new_http_server");
            assert!(source.to_string().contains("Database"));
        }
        other => panic!("Expected Provide error, got {:?}", other),
    }
}
