use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No name servers configured")]
    NoServersConfigured,

    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    #[error("Hostname is an IP literal: {0}")]
    IpLiteralHostname(String),

    #[error("Invalid record type: {0}")]
    InvalidRecordType(u16),

    #[error("No usable candidate names for {0}")]
    NoUsableCandidates(String),

    #[error("Transaction already started")]
    TransactionAlreadyStarted,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transport error talking to {server}: {message}")]
    Transport { server: String, message: String },

    #[error("Secure random source unavailable: {0}")]
    RandomSource(String),

    #[error("Failed to encode DNS query: {0}")]
    QueryEncoding(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Resolution of {hostname} timed out after {attempts} attempts")]
    NameResolutionTimedOut { hostname: String, attempts: u32 },
}

impl DomainError {
    /// Errors surfaced synchronously that no amount of retrying can fix.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::NoServersConfigured
                | Self::InvalidHostname(_)
                | Self::IpLiteralHostname(_)
                | Self::InvalidRecordType(_)
                | Self::NoUsableCandidates(_)
                | Self::TransactionAlreadyStarted
                | Self::ConfigError(_)
        )
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::RandomSource(_))
    }

    pub fn transport(server: impl ToString, message: impl ToString) -> Self {
        Self::Transport {
            server: server.to_string(),
            message: message.to_string(),
        }
    }
}
