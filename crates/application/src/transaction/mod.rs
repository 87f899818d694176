//! Per-query resolution lifecycle.
//!
//! A [`DnsTransactionFactory`] hands out [`DnsTransaction`]s that the
//! caller owns exclusively. Dropping a transaction cancels it: every timer
//! and socket registration is revoked before `drop` returns and the
//! callback is never invoked afterwards.

mod factory;
mod manual;
mod stub;

pub use factory::StubTransactionFactory;
pub use manual::{ManualTransaction, ManualTransactionFactory};
pub use stub::StubTransaction;

use ferrous_stub_domain::hostname::validate_hostname;
use ferrous_stub_domain::{DnsResponse, DomainError, RecordType};

/// Completion callback. Receives the definitive response (which may carry
/// a DNS error rcode such as NXDOMAIN) or the reason resolution failed.
/// Runs at most once, and never after the transaction was dropped.
pub type TransactionCallback = Box<dyn FnOnce(&TransactionInfo, Result<DnsResponse, DomainError>)>;

/// Identity of a transaction as the caller asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInfo {
    hostname: String,
    record_type: RecordType,
}

impl TransactionInfo {
    pub fn new(hostname: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            hostname: hostname.into(),
            record_type,
        }
    }

    /// The hostname exactly as given, before any suffix search.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Created,
    Attempting,
    Succeeded,
    AttemptsExhausted,
    ConfigError,
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::AttemptsExhausted | Self::ConfigError
        )
    }
}

pub trait DnsTransaction {
    fn hostname(&self) -> &str;

    fn record_type(&self) -> RecordType;

    /// Starts resolving. `Ok(())` means the result is pending and will be
    /// delivered through the callback; an `Err` is a synchronous
    /// configuration failure and the callback will not run.
    fn start(&mut self) -> Result<(), DomainError>;
}

pub trait DnsTransactionFactory {
    /// Creates a transaction for `hostname` and `qtype` (class IN).
    ///
    /// A trailing dot marks `hostname` as fully qualified, exempting it
    /// from suffix search. IP literals and malformed names or types are
    /// refused synchronously.
    fn create_transaction(
        &self,
        hostname: &str,
        qtype: u16,
        callback: TransactionCallback,
    ) -> Result<Box<dyn DnsTransaction>, DomainError>;
}

pub(crate) fn validate_request(hostname: &str, qtype: u16) -> Result<RecordType, DomainError> {
    validate_hostname(hostname)?;
    RecordType::try_from(qtype)
}
