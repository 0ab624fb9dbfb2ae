use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::graph::{Graph, Resolver};
use crate::kernel::error::{Error, Result};
use crate::kernel::option::{self, AppOption, RootSettings};
use crate::lifecycle::Lifecycle;
use crate::logging::Logger;
use crate::runtime::{Context, run_with_deadline};
use crate::scope::{ScopeId, ScopeTree};
use crate::signal::{Shutdowner, SignalHub, Subscription};

/// Where an [`App`] is in its one-way lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Options are being applied.
    Configuring,
    /// Invocations were executed (successfully or not).
    Invoked,
    /// The last start pass succeeded.
    Started,
    /// A stop pass ran; the app cannot be started again.
    Stopped,
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppState::Configuring => "configuring",
            AppState::Invoked => "invoked",
            AppState::Started => "started",
            AppState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Application host: runs invocations once, then starts and stops hooks
/// under time budgets.
///
/// Construction applies every option, registers constructors and hooks
/// scope by scope, applies decorators, then executes invocations in
/// registration order. A failure at any of these steps becomes the construction error: from then on
/// [`start`](Self::start) and [`stop`](Self::stop) return it without touching
/// any hook.
pub struct App {
    state: AppState,
    err: Option<Error>,
    lifecycle: Lifecycle,
    logger: Arc<dyn Logger>,
    hub: Arc<SignalHub>,
    start_timeout: Duration,
    stop_timeout: Duration,
    scopes: ScopeTree,
}

impl App {
    /// Builds an application on the bundled [`Graph`] resolver.
    pub fn new(options: Vec<AppOption>) -> Self {
        Self::with_resolver(Graph::new(), options)
    }

    /// Builds an application on a custom resolver.
    pub fn with_resolver<R: Resolver>(mut resolver: R, options: Vec<AppOption>) -> Self {
        let mut scopes = ScopeTree::new();
        let mut root = RootSettings::default();

        for opt in options {
            option::apply(opt, ScopeId::ROOT, &mut scopes, &mut root);
        }

        let RootSettings {
            invokes,
            error_hooks,
            start_timeout,
            stop_timeout,
            logger,
            hub,
            err,
        } = root;
        let hub = hub.unwrap_or_else(SignalHub::global);
        let lifecycle = Lifecycle::new(Arc::clone(&logger));

        let mut app = App {
            state: AppState::Configuring,
            err,
            lifecycle,
            logger,
            hub,
            start_timeout,
            stop_timeout,
            scopes,
        };

        app.provide_builtins(&mut resolver);
        app.provide_all(&mut resolver);
        app.decorate_all(&mut resolver);

        if let Some(err) = &app.err {
            app.logger
                .error(&format!("error after options were applied: {}", err));
            app.state = AppState::Invoked;
            return app;
        }

        if let Err(err) = app.execute_invokes(&mut resolver, invokes) {
            for handler in &error_hooks {
                handler.handle_error(&err);
            }
            app.err = Some(err);
        }
        app.state = AppState::Invoked;
        app
    }

    fn provide_builtins<R: Resolver>(&mut self, resolver: &mut R) {
        let builtins = [
            crate::graph::Constructor::value(self.lifecycle.clone()),
            crate::graph::Constructor::value(Shutdowner::new(Arc::clone(&self.hub))),
        ];
        for constructor in builtins {
            if let Err(err) = resolver.provide(ScopeId::ROOT, constructor) {
                self.record_error(err);
            }
        }
    }

    /// Registers constructors, then hooks, for every scope in depth-first
    /// order. Skips everything once an error is recorded.
    fn provide_all<R: Resolver>(&mut self, resolver: &mut R) {
        for id in self.scopes.depth_first() {
            if self.err.is_some() {
                return;
            }
            let path = self.scopes.path(id);
            let Some(record) = self.scopes.get_mut(id) else {
                continue;
            };
            if let Some(parent) = record.parent() {
                resolver.add_scope(id, parent, record.name());
            }
            let constructors = std::mem::take(&mut record.constructors);
            let hooks = std::mem::take(&mut record.hooks);

            for constructor in constructors {
                self.logger.info(&format!(
                    "PROVIDE\t{} <= {} ({})",
                    constructor.type_name(),
                    constructor.name(),
                    path
                ));
                if let Err(err) = resolver.provide(id, constructor) {
                    self.record_error(err);
                    return;
                }
            }
            for hook in hooks {
                if let Err(err) = self.lifecycle.append(hook) {
                    self.record_error(err);
                    return;
                }
            }
        }
    }

    /// Applies every scope's decorators, depth-first, once all constructors
    /// are in the graph.
    fn decorate_all<R: Resolver>(&mut self, resolver: &mut R) {
        for id in self.scopes.depth_first() {
            if self.err.is_some() {
                return;
            }
            let path = self.scopes.path(id);
            let Some(record) = self.scopes.get_mut(id) else {
                continue;
            };
            let decorators = std::mem::take(&mut record.decorators);

            for decorator in decorators {
                self.logger.info(&format!(
                    "DECORATE\t{} <= {} ({})",
                    decorator.type_name(),
                    decorator.name(),
                    path
                ));
                if let Err(err) = resolver.decorate(id, decorator) {
                    self.record_error(err);
                    return;
                }
            }
        }
    }

    /// Runs invocations in order and returns the first error.
    fn execute_invokes<R: Resolver>(
        &self,
        resolver: &mut R,
        invokes: Vec<crate::graph::Invocation>,
    ) -> Result<()> {
        for invocation in invokes {
            let name = invocation.name().to_string();
            self.logger.info(&format!("INVOKE\t\t{}", name));
            if let Err(err) = resolver.invoke(invocation) {
                self.logger
                    .error(&format!("error during {:?} invoke: {}", name, err));
                return Err(err);
            }
        }
        Ok(())
    }

    fn record_error(&mut self, err: Error) {
        self.err = Some(match self.err.take() {
            Some(prev) => prev.append(err),
            None => err,
        });
    }

    /// The construction error, if any.
    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn start_timeout(&self) -> Duration {
        self.start_timeout
    }

    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn shutdowner(&self) -> Shutdowner {
        Shutdowner::new(Arc::clone(&self.hub))
    }

    /// A fresh subscription to this application's signal hub.
    ///
    /// Call it before [`start`](Self::start) so that no signal sent during
    /// startup is missed.
    pub fn done(&self) -> Subscription {
        self.hub.subscribe()
    }

    /// Runs every pending `on_start` hook within the start budget.
    ///
    /// On failure, the hooks that did start are stopped again within the
    /// stop budget. The returned error is the start error, combined with the
    /// rollback error if the rollback failed too.
    pub async fn start(&mut self, ctx: &Context) -> Result<()> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        if self.state == AppState::Stopped {
            return Err(Error::InvalidState {
                operation: "start",
                state: self.state,
            });
        }

        let start_ctx = ctx.with_timeout(self.start_timeout);
        let lifecycle = self.lifecycle.clone();
        let hook_ctx = start_ctx.clone();
        let started =
            run_with_deadline(&start_ctx, "start", async move { lifecycle.start(&hook_ctx).await })
                .await;

        if let Err(err) = started {
            self.logger
                .error(&format!("start failed, rolling back: {}", err));
            let rollback = Self::stop_sequence(self.lifecycle.clone(), ctx, self.stop_timeout);
            if let Err(stop_err) = rollback.await {
                self.logger
                    .error(&format!("couldn't roll back cleanly: {}", stop_err));
                return Err(err.append(stop_err));
            }
            return Err(err);
        }

        self.state = AppState::Started;
        self.logger.info("RUNNING");
        Ok(())
    }

    /// Runs `on_stop` for every started hook, in reverse, within the stop
    /// budget. Works on an app that never started, in which case no hook is
    /// called.
    pub async fn stop(&mut self, ctx: &Context) -> Result<()> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        let result = Self::stop_sequence(self.lifecycle.clone(), ctx, self.stop_timeout).await;
        self.state = AppState::Stopped;
        result
    }

    async fn stop_sequence(lifecycle: Lifecycle, ctx: &Context, timeout: Duration) -> Result<()> {
        let stop_ctx = ctx.with_timeout(timeout);
        let hook_ctx = stop_ctx.clone();
        run_with_deadline(&stop_ctx, "stop", async move { lifecycle.stop(&hook_ctx).await }).await
    }

    /// Starts, waits for one signal, then stops.
    ///
    /// Any start or stop failure is logged and terminates the process through
    /// [`Logger::fatal`].
    pub async fn run(mut self) {
        let mut done = self.done();
        let ctx = Context::background();

        if let Err(err) = self.start(&ctx).await {
            self.logger.fatal(&format!("failed to start: {}", err));
        }

        match done.recv().await {
            Some(signal) => self.logger.info(&signal.to_string().to_uppercase()),
            None => self.logger.info("signal hub closed"),
        }

        if let Err(err) = self.stop(&ctx).await {
            self.logger.fatal(&format!("failed to stop cleanly: {}", err));
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("err", &self.err)
            .field("start_timeout", &self.start_timeout)
            .field("stop_timeout", &self.stop_timeout)
            .field("scopes", &self.scopes.len())
            .finish_non_exhaustive()
    }
}
