//! Ferrous Stub Application Layer
//!
//! The stub resolution engine: suffix search, server rotation, response
//! matching and the per-query transaction state machine. Everything that
//! touches the network or the clock goes through [`ports`].
pub mod ports;
pub mod services;
pub mod transaction;

pub use ports::ResolverPorts;
pub use services::{DnsSession, SearchPlanner};
pub use transaction::{
    DnsTransaction, DnsTransactionFactory, ManualTransaction, ManualTransactionFactory, StubTransaction,
    StubTransactionFactory, TransactionCallback, TransactionInfo, TransactionState,
};
