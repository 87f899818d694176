use ferrous_stub_domain::{DomainError, ResolverConfig};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Configuration plus the round-robin cursor shared by every transaction
/// created from it.
///
/// The cursor is the only mutable state. A single `fetch_add` both reads
/// and advances it, so no caller can observe a half-updated value, even
/// if the session is later shared across threads.
#[derive(Debug)]
pub struct DnsSession {
    config: ResolverConfig,
    cursor: AtomicUsize,
}

impl DnsSession {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Picks the next server in rotation and advances the cursor.
    ///
    /// Returns the server's index in the configured list alongside its
    /// address.
    pub fn next_server(&self) -> Result<(usize, SocketAddr), DomainError> {
        let servers = &self.config.servers;
        if servers.is_empty() {
            return Err(DomainError::NoServersConfigured);
        }
        let turn = self.cursor.fetch_add(1, Ordering::Relaxed);
        let index = turn % servers.len();
        debug!(index, server = %servers[index], turn, "Selected name server");
        Ok((index, servers[index]))
    }

    /// Number of selections made so far. Wraps at `usize::MAX` but never
    /// goes back otherwise.
    pub fn rotations(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}
