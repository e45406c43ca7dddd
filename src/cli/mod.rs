// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;

use crate::config::ServiceConfig;

/// Readability extraction service
#[derive(Parser, Debug, Default)]
#[command(name = "readability-service")]
#[command(version)]
#[command(about = "HTTP service extracting readable content from HTML", long_about = None)]
pub struct Cli {
    /// Bind host (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides PORT)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Maximum concurrent extractions (overrides MAX_CONCURRENCY)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Cli {
    /// Apply command line overrides on top of the environment config
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(max_concurrency) = self.max_concurrency {
            config.max_concurrency = max_concurrency;
        }
    }
}
