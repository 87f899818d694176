#![allow(dead_code)]
#![allow(unused_imports)]

mod dns_server_mock;

pub use dns_server_mock::{MockBehavior, MockDnsServer};

use ferrous_stub_domain::ResolverConfig;
use std::future::Future;
use std::net::SocketAddr;

/// Runs `future` on a fresh `LocalSet`, the dispatch thread the UDP
/// transport and timer expect.
pub async fn run_local<F: Future>(future: F) -> F::Output {
    tokio::task::LocalSet::new().run_until(future).await
}

/// Short timeouts so exhaustion tests stay fast.
pub fn fast_config(servers: Vec<SocketAddr>) -> ResolverConfig {
    ResolverConfig {
        timeout_ms: 150,
        max_timeout_ms: 300,
        retries_per_server: 1,
        ..ResolverConfig::with_servers(servers)
    }
}
