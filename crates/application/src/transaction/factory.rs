use super::{
    validate_request, DnsTransaction, DnsTransactionFactory, StubTransaction, TransactionCallback,
    TransactionInfo,
};
use crate::ports::ResolverPorts;
use crate::services::DnsSession;
use ferrous_stub_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, warn};

/// Produces [`StubTransaction`]s that share one [`DnsSession`], and with
/// it the round-robin position over the configured servers.
#[derive(Clone)]
pub struct StubTransactionFactory {
    session: Arc<DnsSession>,
    ports: ResolverPorts,
}

impl StubTransactionFactory {
    pub fn new(session: Arc<DnsSession>, ports: ResolverPorts) -> Self {
        Self { session, ports }
    }

    pub fn session(&self) -> &Arc<DnsSession> {
        &self.session
    }

    /// Like [`DnsTransactionFactory::create_transaction`] but keeps the
    /// concrete type, which exposes state for inspection.
    pub fn create(
        &self,
        hostname: &str,
        qtype: u16,
        callback: TransactionCallback,
    ) -> Result<StubTransaction, DomainError> {
        if self.session.config().servers.is_empty() {
            warn!(hostname, "Refusing transaction: no name servers configured");
            return Err(DomainError::NoServersConfigured);
        }

        let record_type = validate_request(hostname, qtype).inspect_err(|e| {
            debug!(hostname, qtype, error = %e, "Refusing transaction");
        })?;

        debug!(hostname, qtype = %record_type, "Creating transaction");

        Ok(StubTransaction::new(
            TransactionInfo::new(hostname, record_type),
            Arc::clone(&self.session),
            self.ports.clone(),
            callback,
        ))
    }
}

impl DnsTransactionFactory for StubTransactionFactory {
    fn create_transaction(
        &self,
        hostname: &str,
        qtype: u16,
        callback: TransactionCallback,
    ) -> Result<Box<dyn DnsTransaction>, DomainError> {
        Ok(Box::new(self.create(hostname, qtype, callback)?))
    }
}
