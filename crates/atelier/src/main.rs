#![forbid(unsafe_code)]

//! Binary entry point: config resolution, logging, runtime, app loop.
//!
//! Precedence for settings is config file, then environment, then CLI
//! flags. Logs go to a file because stdout belongs to the terminal UI.

mod app;
mod cli;
mod config;
mod forms;
mod pages;
mod painter;

use std::fs;
use std::sync::Arc;

use atelier_client::{ApiClient, AuthStore};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::Cli;
use config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    cli.apply(&mut config);

    init_logging(&config)?;
    info!(api_url = %config.api_url, "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let api = Arc::new(ApiClient::new(config.api_url.clone())?);
    let auth = AuthStore::open_default()?;

    let mut app = App::new(&config, api, auth, runtime.handle().clone());
    app.bootstrap();
    app.run()
}

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let path = config.log_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}
