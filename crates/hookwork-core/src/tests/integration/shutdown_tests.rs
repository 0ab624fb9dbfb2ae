#![cfg(test)]

use std::time::Duration;

use futures::future::join_all;

use crate::kernel::error::Error;
use crate::signal::Signal;
use crate::tests::integration::common::{isolated_app, memory_logger};

#[tokio::test]
async fn test_every_done_subscription_wakes() {
    let logger = memory_logger();
    let app = isolated_app(&logger, vec![]);
    let mut subs: Vec<_> = (0..4).map(|_| app.done()).collect();

    app.shutdowner().shutdown().expect("all buffers are free");

    let received = tokio::time::timeout(
        Duration::from_secs(1),
        join_all(subs.iter_mut().map(|sub| sub.recv())),
    )
    .await
    .expect("every waiter wakes");
    assert!(received.iter().all(|s| *s == Some(Signal::Shutdown)));
}

#[tokio::test]
async fn test_shutdown_before_drain_is_undelivered() {
    let logger = memory_logger();
    let app = isolated_app(&logger, vec![]);
    let mut first = app.done();
    let shutdowner = app.shutdowner();

    shutdowner.shutdown().expect("first shutdown");
    let err = shutdowner.shutdown().expect_err("buffer still holds the first signal");
    assert!(matches!(err, Error::ShutdownUndelivered { missed: 1, total: 1 }));

    assert_eq!(first.recv().await, Some(Signal::Shutdown));
    let _late = app.done();
    shutdowner.shutdown().expect("drained and new subscribers have room");
}
