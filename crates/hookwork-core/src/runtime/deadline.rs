use std::any::Any;
use std::future::Future;

use crate::kernel::error::{Error, Result};
use crate::runtime::Context;

/// Races `operation` against `ctx`.
///
/// The operation is spawned onto the runtime immediately. If `ctx` is done
/// first, the context error is returned at once and the spawned task is left
/// to run to completion in the background; whatever it returns later is
/// dropped. If the operation finishes first, its result is returned.
pub async fn run_with_deadline<F, T>(ctx: &Context, operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    // Dropping the JoinHandle detaches the task instead of aborting it.
    let handle = tokio::spawn(fut);

    tokio::select! {
        biased;
        joined = handle => match joined {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => Err(Error::Panicked {
                operation,
                message: panic_message(join_err.into_panic()),
            }),
            Err(join_err) => Err(Error::Panicked {
                operation,
                message: join_err.to_string(),
            }),
        },
        reason = ctx.done() => {
            log::warn!("{} abandoned: {}; it keeps running in the background", operation, reason);
            Err(Error::Deadline(reason))
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
