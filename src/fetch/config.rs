// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for outbound page fetching

use crate::config::parse_or;

/// Ports commonly used by internal services (SSH, MySQL, Postgres, Redis,
/// Elasticsearch, MongoDB)
pub const DEFAULT_BLOCKED_PORTS: &[u16] = &[22, 3306, 5432, 6379, 9200, 27017];

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; ReadabilityService/1.0)";

/// Configuration for fetching pages by URL
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
    /// Maximum redirects followed (default: 5)
    pub max_redirects: usize,
    /// Maximum response body size in bytes (shared with MAX_HTML_BYTES)
    pub max_body_bytes: usize,
    /// Destination ports that are always rejected
    pub blocked_ports: Vec<u16>,
    /// Allow hosts whose DNS lookup fails (default: true)
    pub allow_dns_failure: bool,
    pub user_agent: String,
}

impl FetchConfig {
    /// Read fetch settings through a variable lookup
    pub fn from_lookup<F>(lookup: &F, max_body_bytes: usize) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            timeout_ms: parse_or(lookup, "FETCH_TIMEOUT_MS", defaults.timeout_ms),
            max_redirects: parse_or(lookup, "MAX_REDIRECTS", defaults.max_redirects),
            max_body_bytes,
            blocked_ports: lookup("BLOCKED_PORTS")
                .map(|v| parse_ports(&v))
                .unwrap_or(defaults.blocked_ports),
            allow_dns_failure: lookup("ALLOW_DNS_FAILURE")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.allow_dns_failure),
            user_agent: lookup("FETCH_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("FETCH_TIMEOUT_MS must be at least 1".to_string());
        }
        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be at least 1".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("FETCH_USER_AGENT must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_redirects: 5,
            max_body_bytes: 10 * 1024 * 1024,
            blocked_ports: DEFAULT_BLOCKED_PORTS.to_vec(),
            allow_dns_failure: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Comma separated port list; unparseable entries are skipped
fn parse_ports(value: &str) -> Vec<u16> {
    value
        .split(',')
        .filter_map(|p| p.trim().parse().ok())
        .collect()
}
