use std::sync::Arc;
use std::time::Duration;

use hookwork_core::graph::Lookup;
use hookwork_core::kernel::AppOption;
use hookwork_core::kernel::error::BoxError;
use hookwork_core::lifecycle::{HookFn, Lifecycle};
use hookwork_core::signal::Shutdowner;
use log::{error, info};

/// A module with one service that only logs its transitions.
pub fn module() -> AppOption {
    AppOption::module(
        "demo",
        vec![AppOption::hook(
            HookFn::new("demo-service")
                .with_start(|_ctx| async move {
                    info!("demo service started");
                    Ok(())
                })
                .with_stop(|_ctx| async move {
                    info!("demo service stopped");
                    Ok(())
                })
                .arc(),
        )],
    )
}

/// Schedules a programmatic shutdown `delay` after the start pass reaches it.
pub fn shutdown_after(delay: Duration) -> AppOption {
    AppOption::invoke("schedule_shutdown", move |graph: &dyn Lookup| -> Result<(), BoxError> {
        let shutdowner = graph.get::<Shutdowner>()?;
        let hook = HookFn::new("shutdown-timer").with_start(move |_ctx| {
            let shutdowner = Arc::clone(&shutdowner);
            async move {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Err(e) = shutdowner.shutdown() {
                        error!("scheduled shutdown failed: {}", e);
                    }
                });
                Ok(())
            }
        });
        graph.get::<Lifecycle>()?.append(hook.arc())?;
        Ok(())
    })
}
