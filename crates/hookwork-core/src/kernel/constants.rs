use std::time::Duration;

/// Application name
pub const APP_NAME: &str = "hookwork";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default budget for the start pass and for the stop pass.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Capacity of every subscriber channel handed out by a signal hub.
pub const SUBSCRIBER_CAPACITY: usize = 1;
