use std::path::PathBuf;

use clap::Parser;
use hookwork_core::config::LifecycleConfig;
use hookwork_core::kernel::error::Result;

/// Hookwork: start ordered hooks, wait for a signal, stop them in reverse
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Lifecycle configuration file (.json, .yaml, .yml or .toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Budget for running every start hook, in milliseconds
    #[arg(long, value_name = "MS")]
    pub start_timeout_ms: Option<u64>,

    /// Budget for running every stop hook, in milliseconds
    #[arg(long, value_name = "MS")]
    pub stop_timeout_ms: Option<u64>,

    /// Request a shutdown this many milliseconds after startup
    #[arg(long, value_name = "MS")]
    pub shutdown_after_ms: Option<u64>,
}

impl CliArgs {
    /// Loads the config file, if any, then applies flag overrides.
    ///
    /// The result is not validated here; the application rejects bad budgets
    /// when the config option is applied.
    pub fn lifecycle_config(&self) -> Result<LifecycleConfig> {
        let mut config = match &self.config {
            Some(path) => LifecycleConfig::load(path)?,
            None => LifecycleConfig::default(),
        };
        if let Some(ms) = self.start_timeout_ms {
            config.start_timeout_ms = ms;
        }
        if let Some(ms) = self.stop_timeout_ms {
            config.stop_timeout_ms = ms;
        }
        Ok(config)
    }
}
