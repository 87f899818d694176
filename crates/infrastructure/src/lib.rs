//! Ferrous Stub Infrastructure Layer
//!
//! Adapters for the resolver ports: a `hickory-proto` wire codec, UDP
//! sockets and timers on a tokio `LocalSet`, and a CSPRNG id source.
pub mod dns;
pub mod logging;
pub mod resolver;

pub use resolver::StubResolver;
