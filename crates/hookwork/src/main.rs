mod cli; // Declare the cli module
mod demo;

use std::time::Duration;

use clap::Parser;
use hookwork_core::kernel::constants::{APP_NAME, APP_VERSION};
use hookwork_core::kernel::{App, AppOption};
use log::info;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("{} v{}", APP_NAME, APP_VERSION);

    let mut options = vec![demo::module()];
    match args.lifecycle_config() {
        Ok(config) => options.push(AppOption::Config(config)),
        Err(e) => options.push(AppOption::Error(vec![e])),
    }
    if let Some(ms) = args.shutdown_after_ms {
        options.push(demo::shutdown_after(Duration::from_millis(ms)));
    }

    let app = App::new(options);
    info!(
        "start budget {:?}, stop budget {:?}",
        app.start_timeout(),
        app.stop_timeout()
    );

    // Exits the process itself if start or stop fails.
    app.run().await;
    println!("Shutdown complete.");
}
