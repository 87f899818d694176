//! Reading the traditional `/etc/resolv.conf` format.
//!
//! Only the directives that map onto [`ResolverConfig`] are honoured:
//! `nameserver`, `domain`, `search` and `options` with `ndots:`,
//! `timeout:` and `attempts:`. Everything else is skipped.

use super::resolver::ResolverConfig;
use crate::hostname::normalize_suffix;
use std::net::{IpAddr, Ipv6Addr, SocketAddr, SocketAddrV6};
use tracing::warn;

const DNS_PORT: u16 = 53;

// Same caps glibc applies.
const MAX_NDOTS: usize = 15;
const MAX_TIMEOUT_SECS: u64 = 30;
const MAX_ATTEMPTS: u32 = 5;

impl ResolverConfig {
    /// Parses resolv.conf contents the way glibc does: a line or option it
    /// cannot use is skipped with a warning and never fails the whole file.
    pub fn from_resolv_conf(contents: &str) -> Self {
        let mut config = ResolverConfig::default();

        for (index, raw) in contents.lines().enumerate() {
            let lineno = index + 1;
            let line = raw.split(['#', ';']).next().unwrap_or("").trim();
            let mut words = line.split_whitespace();
            let Some(keyword) = words.next() else {
                continue;
            };

            match keyword {
                "nameserver" => match words.next().and_then(parse_nameserver) {
                    Some(server) => config.servers.push(server),
                    None => warn!(line = lineno, entry = line, "Skipping unusable nameserver"),
                },
                "domain" => match words.next() {
                    Some(domain) => config.search = usable_suffixes([domain], lineno),
                    None => warn!(line = lineno, "Skipping 'domain' without an argument"),
                },
                "search" => config.search = usable_suffixes(words, lineno),
                "options" => {
                    for option in words {
                        apply_option(&mut config, option, lineno);
                    }
                }
                _ => {}
            }
        }

        config.max_timeout_ms = config.max_timeout_ms.max(config.timeout_ms);
        config
    }
}

/// `addr`, `addr:port`, `[v6]:port` or a link-local `v6%scope` with a
/// numeric scope. Interface names cannot be resolved here.
fn parse_nameserver(addr: &str) -> Option<SocketAddr> {
    if let Ok(socket) = addr.parse::<SocketAddr>() {
        return Some(socket);
    }
    if let Ok(ip) = addr.parse::<IpAddr>() {
        return Some(SocketAddr::new(ip, DNS_PORT));
    }

    let (ip, scope) = addr.split_once('%')?;
    let ip = ip.parse::<Ipv6Addr>().ok()?;
    let scope_id = scope.parse::<u32>().ok()?;
    Some(SocketAddr::V6(SocketAddrV6::new(ip, DNS_PORT, 0, scope_id)))
}

fn usable_suffixes<'a>(entries: impl IntoIterator<Item = &'a str>, lineno: usize) -> Vec<String> {
    entries
        .into_iter()
        .filter(|entry| {
            let usable = normalize_suffix(entry).is_some();
            if !usable {
                warn!(line = lineno, suffix = entry, "Skipping invalid search suffix");
            }
            usable
        })
        .map(str::to_string)
        .collect()
}

fn apply_option(config: &mut ResolverConfig, option: &str, lineno: usize) {
    let Some((name, value)) = option.split_once(':') else {
        return;
    };
    if !matches!(name, "ndots" | "timeout" | "attempts") {
        return;
    }
    let Ok(number) = value.parse::<u64>() else {
        warn!(line = lineno, option, "Skipping option with a non-numeric value");
        return;
    };

    match name {
        "ndots" => config.ndots = (number.min(MAX_NDOTS as u64)) as usize,
        "timeout" => config.timeout_ms = number.clamp(1, MAX_TIMEOUT_SECS) * 1000,
        _ => {
            let attempts = number.clamp(1, MAX_ATTEMPTS as u64) as u32;
            config.retries_per_server = attempts - 1;
        }
    }
}
