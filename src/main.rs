// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use readability_service::{cli::Cli, start_server, version, ServiceConfig};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    info!("Starting {}", version::get_version_string());

    let mut config = ServiceConfig::from_env();
    cli.apply(&mut config);
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!(
        "Config: max_concurrency={}, extraction_timeout={}s, include_tables={}, fallback={}",
        config.max_concurrency,
        config.extraction_timeout_secs,
        config.include_tables,
        config.enable_fallback
    );

    start_server(config).await
}
