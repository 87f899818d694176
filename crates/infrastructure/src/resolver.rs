//! Async facade over the callback-driven transactions.

use crate::dns::{HickoryCodec, SystemRandomIdSource, TokioTimer, UdpTransport};
use ferrous_stub_application::{
    DnsSession, DnsTransaction, ResolverPorts, StubTransactionFactory, TransactionInfo,
};
use ferrous_stub_domain::{Config, DnsResponse, DomainError, RecordType, ResolverConfig};
use std::net::IpAddr;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Stub resolver for use on a tokio [`LocalSet`](tokio::task::LocalSet).
///
/// Every call to [`resolve`](Self::resolve) runs one transaction. Calls
/// share the session, so concurrent lookups are spread over the
/// configured servers.
#[derive(Clone)]
pub struct StubResolver {
    factory: StubTransactionFactory,
}

impl StubResolver {
    pub fn new(config: ResolverConfig) -> Self {
        let ports = ResolverPorts {
            codec: Rc::new(HickoryCodec),
            transport: Rc::new(UdpTransport::new()),
            timer: Rc::new(TokioTimer::new()),
            ids: Rc::new(SystemRandomIdSource::new()),
        };
        Self::with_ports(config, ports)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.resolver.clone())
    }

    pub fn with_ports(config: ResolverConfig, ports: ResolverPorts) -> Self {
        info!(
            servers = config.servers.len(),
            search = config.search.len(),
            ndots = config.ndots,
            timeout_ms = config.timeout_ms,
            "Stub resolver initialized"
        );
        let session = Arc::new(DnsSession::new(config));
        Self {
            factory: StubTransactionFactory::new(session, ports),
        }
    }

    pub fn factory(&self) -> &StubTransactionFactory {
        &self.factory
    }

    pub fn session(&self) -> &Arc<DnsSession> {
        self.factory.session()
    }

    /// Resolves `hostname` for `qtype`, class IN.
    ///
    /// Dropping the returned future cancels the lookup; wrap it in
    /// `tokio::time::timeout` for an overall deadline.
    pub async fn resolve(&self, hostname: &str, qtype: u16) -> Result<DnsResponse, DomainError> {
        let (tx, rx) = oneshot::channel();
        let mut transaction = self.factory.create(
            hostname,
            qtype,
            Box::new(move |_: &TransactionInfo, result: Result<DnsResponse, DomainError>| {
                let _ = tx.send(result);
            }),
        )?;
        transaction.start()?;

        // The transaction has to outlive the wait; dropping it cancels.
        let outcome = rx.await;
        let attempts = transaction.attempts_issued();
        drop(transaction);

        outcome.unwrap_or_else(|_| {
            debug!(hostname, "Transaction ended without a result");
            Err(DomainError::NameResolutionTimedOut {
                hostname: hostname.to_string(),
                attempts,
            })
        })
    }

    /// A and AAAA addresses for `hostname`. A failure of one family is
    /// ignored when the other produced addresses.
    pub async fn lookup_ip(&self, hostname: &str) -> Result<Vec<IpAddr>, DomainError> {
        let v4 = self.resolve(hostname, RecordType::A.to_u16()).await;
        let v6 = self.resolve(hostname, RecordType::AAAA.to_u16()).await;

        match (v4, v6) {
            (Err(e), Err(_)) => Err(e),
            (v4, v6) => {
                let mut addresses = Vec::new();
                for response in [v4, v6].into_iter().flatten() {
                    addresses.extend(response.addresses());
                }
                Ok(addresses)
            }
        }
    }
}
