//! Ferrous Stub Domain Layer
pub mod candidate;
pub mod config;
pub mod dns_record;
pub mod dns_response;
pub mod errors;
pub mod hostname;

pub use candidate::CandidateName;
pub use config::{Config, ConfigError, LoggingConfig, ResolverConfig};
pub use dns_record::{AnswerRecord, RecordData, RecordType};
pub use dns_response::{DnsResponse, Question, ResponseCode};
pub use errors::DomainError;
