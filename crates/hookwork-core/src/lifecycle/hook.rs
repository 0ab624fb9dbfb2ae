use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::error::BoxError;
use crate::runtime::Context;

/// Owned future returned by closure-based hooks.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'static>>;

type HookCallback = Arc<dyn Fn(Context) -> HookFuture + Send + Sync>;

/// A start/stop operation pair tied to the application's lifecycle.
///
/// Both operations default to a no-op that succeeds. Hooks are immutable once
/// appended; the sequence identifies them by position.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Name used in log lines and error messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn on_start(&self, _ctx: Context) -> Result<(), BoxError> {
        Ok(())
    }

    async fn on_stop(&self, _ctx: Context) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Closure-backed [`Hook`].
///
/// ```
/// use hookwork_core::lifecycle::HookFn;
///
/// let hook = HookFn::new("listener")
///     .with_start(|_ctx| async move { Ok(()) })
///     .with_stop(|_ctx| async move { Ok(()) });
/// # let _ = hook;
/// ```
#[derive(Clone)]
pub struct HookFn {
    name: String,
    start: Option<HookCallback>,
    stop: Option<HookCallback>,
}

impl HookFn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            stop: None,
        }
    }

    pub fn with_start<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.start = Some(Arc::new(move |ctx| Box::pin(f(ctx))));
        self
    }

    pub fn with_stop<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.stop = Some(Arc::new(move |ctx| Box::pin(f(ctx))));
        self
    }

    /// Wraps the hook in an `Arc` ready to be appended.
    pub fn arc(self) -> Arc<dyn Hook> {
        Arc::new(self)
    }
}

impl fmt::Debug for HookFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookFn")
            .field("name", &self.name)
            .field("on_start", &self.start.is_some())
            .field("on_stop", &self.stop.is_some())
            .finish()
    }
}

#[async_trait]
impl Hook for HookFn {
    fn name(&self) -> &str {
        &self.name
    }

    async fn on_start(&self, ctx: Context) -> Result<(), BoxError> {
        match &self.start {
            Some(f) => f(ctx).await,
            None => Ok(()),
        }
    }

    async fn on_stop(&self, ctx: Context) -> Result<(), BoxError> {
        match &self.stop {
            Some(f) => f(ctx).await,
            None => Ok(()),
        }
    }
}
