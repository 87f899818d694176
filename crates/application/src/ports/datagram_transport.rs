use super::registration::Registration;
use ferrous_stub_domain::DomainError;
use std::net::SocketAddr;

#[derive(Debug)]
pub enum DatagramEvent {
    Received {
        source: SocketAddr,
        payload: Vec<u8>,
    },
    /// The socket reported an error (e.g. ICMP port unreachable).
    Failed(DomainError),
}

pub type DatagramListener = Box<dyn FnMut(DatagramEvent)>;

/// Non-blocking datagram I/O.
///
/// `send` transmits `payload` to `server` and keeps delivering whatever
/// arrives on the sending socket to `listener` until the returned
/// registration is cancelled. Implementations must report the true source
/// address of every datagram, and must never call `listener` from inside
/// `send` itself.
pub trait DatagramTransport {
    fn send(
        &self,
        server: SocketAddr,
        payload: &[u8],
        listener: DatagramListener,
    ) -> Result<Registration, DomainError>;
}
