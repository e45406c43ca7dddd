// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! URL validation and SSRF protection
//!
//! Two layers: [`check_literal`] inspects the host as written (used for
//! every redirect hop), [`SsrfGuard::check`] additionally resolves the host
//! and rejects names pointing at private addresses.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use tokio::net::lookup_host;
use tracing::{debug, warn};
use url::{Host, Url};

use super::error::FetchError;

const LOCAL_HOSTNAMES: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "localhost6",
    "localhost6.localdomain6",
];

/// Parse a user supplied URL and apply scheme and port rules
pub fn validate_url(input: &str, blocked_ports: &[u16]) -> Result<Url, FetchError> {
    let url = Url::parse(input.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(format!(
            "Invalid protocol: {}:. Only HTTP and HTTPS are allowed",
            url.scheme()
        )));
    }

    if url.host().is_none() {
        return Err(FetchError::InvalidUrl("URL has no host".to_string()));
    }

    if let Some(port) = url.port_or_known_default() {
        if blocked_ports.contains(&port) {
            return Err(FetchError::BlockedPort(port));
        }
    }

    Ok(url)
}

/// Loopback, private, link-local, unique-local or unspecified
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => is_private_v6(v6),
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.octets()[0] == 0
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_private_v4(v4);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00 // fc00::/7
        || (first & 0xffc0) == 0xfe80 // fe80::/10
}

pub fn is_local_hostname(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_lowercase();
    LOCAL_HOSTNAMES.contains(&host.as_str())
}

/// Reject URLs whose host is a private IP literal or a localhost name
pub fn check_literal(url: &Url) -> Result<(), FetchError> {
    match url.host() {
        Some(Host::Ipv4(ip)) if is_private_v4(ip) => Err(FetchError::Forbidden(format!(
            "Private IP access denied: {}",
            ip
        ))),
        Some(Host::Ipv6(ip)) if is_private_v6(ip) => Err(FetchError::Forbidden(format!(
            "Private IP access denied: {}",
            ip
        ))),
        Some(Host::Domain(name)) if is_local_hostname(name) => Err(FetchError::Forbidden(
            format!("Localhost access denied: {}", name),
        )),
        Some(_) => Ok(()),
        None => Err(FetchError::InvalidUrl("URL has no host".to_string())),
    }
}

/// Literal checks plus DNS resolution
#[derive(Debug, Clone)]
pub struct SsrfGuard {
    allow_dns_failure: bool,
}

impl SsrfGuard {
    pub fn new(allow_dns_failure: bool) -> Self {
        Self { allow_dns_failure }
    }

    pub async fn check(&self, url: &Url) -> Result<(), FetchError> {
        check_literal(url)?;

        let domain = match url.host() {
            Some(Host::Domain(name)) => name.to_string(),
            // IP literals were fully handled above
            _ => return Ok(()),
        };
        let port = url.port_or_known_default().unwrap_or(80);

        let addresses: Vec<IpAddr> = match lookup_host((domain.as_str(), port)).await {
            Ok(addrs) => addrs.map(|a| a.ip()).collect(),
            Err(e) => {
                debug!("DNS lookup failed for {}: {}", domain, e);
                Vec::new()
            }
        };

        if addresses.is_empty() {
            if self.allow_dns_failure {
                return Ok(());
            }
            return Err(FetchError::Forbidden(format!(
                "DNS resolution failed for hostname: {}",
                domain
            )));
        }

        if let Some(ip) = addresses.into_iter().find(|ip| is_private_ip(*ip)) {
            warn!("Blocked {}: resolves to private address {}", domain, ip);
            return Err(FetchError::Forbidden(format!(
                "DNS resolves to private IP: {} -> {}",
                domain, ip
            )));
        }

        Ok(())
    }
}

impl Default for SsrfGuard {
    fn default() -> Self {
        Self::new(true)
    }
}
