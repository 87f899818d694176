use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use super::errors::ConfigError;
use crate::hostname::normalize_suffix;

/// Resolver settings shared, read-only, by every transaction of a session.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Name servers, in preference order.
    #[serde(default)]
    pub servers: Vec<SocketAddr>,

    /// Timeout of the first attempt on a server, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Upper bound for a single attempt after backoff, in milliseconds.
    #[serde(default = "default_max_timeout_ms")]
    pub max_timeout_ms: u64,

    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: u32,

    /// Retransmissions to the same server after the initial attempt.
    #[serde(default = "default_retries_per_server")]
    pub retries_per_server: u32,

    /// How many servers to try per candidate name; all of them when unset.
    #[serde(default)]
    pub max_servers_per_candidate: Option<usize>,

    #[serde(default)]
    pub search: Vec<String>,

    #[serde(default = "default_ndots")]
    pub ndots: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            servers: vec![],
            timeout_ms: default_timeout_ms(),
            max_timeout_ms: default_max_timeout_ms(),
            backoff_factor: default_backoff_factor(),
            retries_per_server: default_retries_per_server(),
            max_servers_per_candidate: None,
            search: vec![],
            ndots: default_ndots(),
        }
    }
}

impl ResolverConfig {
    pub fn with_servers(servers: Vec<SocketAddr>) -> Self {
        Self {
            servers,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Timeout for the `retry`-th retransmission on one server:
    /// `timeout * backoff^retry`, capped at `max_timeout_ms`.
    pub fn attempt_timeout(&self, retry: u32) -> Duration {
        let factor = u64::from(self.backoff_factor).saturating_pow(retry);
        let millis = self
            .timeout_ms
            .saturating_mul(factor)
            .min(self.max_timeout_ms.max(self.timeout_ms));
        Duration::from_millis(millis)
    }

    /// Number of distinct servers a transaction walks through for one
    /// candidate name.
    pub fn servers_per_candidate(&self) -> usize {
        match self.max_servers_per_candidate {
            Some(limit) => limit.min(self.servers.len()),
            None => self.servers.len(),
        }
    }

    /// Attempts made against one server for one candidate name.
    pub fn attempts_per_server(&self) -> u32 {
        self.retries_per_server.saturating_add(1)
    }

    /// Search suffixes with surrounding dots stripped, lower-cased, and
    /// empty or duplicate entries removed.
    pub fn normalized_search(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.search.len());
        for suffix in self.search.iter().filter_map(|s| normalize_suffix(s)) {
            if !out.contains(&suffix) {
                out.push(suffix);
            }
        }
        out
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Validation("timeout_ms cannot be 0".to_string()));
        }
        if self.max_timeout_ms < self.timeout_ms {
            return Err(ConfigError::Validation(format!(
                "max_timeout_ms ({}) is below timeout_ms ({})",
                self.max_timeout_ms, self.timeout_ms
            )));
        }
        if self.backoff_factor == 0 {
            return Err(ConfigError::Validation(
                "backoff_factor cannot be 0".to_string(),
            ));
        }
        if self.max_servers_per_candidate == Some(0) {
            return Err(ConfigError::Validation(
                "max_servers_per_candidate cannot be 0".to_string(),
            ));
        }
        for suffix in &self.search {
            if normalize_suffix(suffix).is_none() {
                return Err(ConfigError::Validation(format!(
                    "Invalid search suffix '{}'",
                    suffix
                )));
            }
        }
        Ok(())
    }
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_max_timeout_ms() -> u64 {
    5000
}

fn default_backoff_factor() -> u32 {
    2
}

fn default_retries_per_server() -> u32 {
    1
}

fn default_ndots() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_timeout_backs_off_and_caps() {
        let config = ResolverConfig {
            timeout_ms: 1000,
            max_timeout_ms: 5000,
            backoff_factor: 2,
            ..ResolverConfig::default()
        };
        assert_eq!(config.attempt_timeout(0), Duration::from_millis(1000));
        assert_eq!(config.attempt_timeout(1), Duration::from_millis(2000));
        assert_eq!(config.attempt_timeout(2), Duration::from_millis(4000));
        assert_eq!(config.attempt_timeout(3), Duration::from_millis(5000));
        assert_eq!(config.attempt_timeout(60), Duration::from_millis(5000));
    }

    #[test]
    fn test_servers_per_candidate_is_bounded_by_server_count() {
        let mut config = ResolverConfig::with_servers(vec![
            "10.0.0.1:53".parse().unwrap(),
            "10.0.0.2:53".parse().unwrap(),
        ]);
        assert_eq!(config.servers_per_candidate(), 2);
        config.max_servers_per_candidate = Some(1);
        assert_eq!(config.servers_per_candidate(), 1);
        config.max_servers_per_candidate = Some(5);
        assert_eq!(config.servers_per_candidate(), 2);
    }

    #[test]
    fn test_normalized_search_drops_duplicates() {
        let config = ResolverConfig {
            search: vec![
                "corp.example.".into(),
                ".Corp.Example".into(),
                "lab.example".into(),
            ],
            ..ResolverConfig::default()
        };
        assert_eq!(config.normalized_search(), vec!["corp.example", "lab.example"]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let ok = ResolverConfig::default();
        assert!(ok.validate().is_ok());

        let zero_timeout = ResolverConfig {
            timeout_ms: 0,
            ..ResolverConfig::default()
        };
        assert!(zero_timeout.validate().is_err());

        let zero_servers = ResolverConfig {
            max_servers_per_candidate: Some(0),
            ..ResolverConfig::default()
        };
        assert!(zero_servers.validate().is_err());

        let bad_suffix = ResolverConfig {
            search: vec!["not valid".into()],
            ..ResolverConfig::default()
        };
        assert!(bad_suffix.validate().is_err());
    }
}
