//! UDP transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is, one ephemeral socket per attempt. Truncated
//! responses are handed up like any other; there is no TCP fallback.

use super::socket::{create_socket, register};
use ferrous_stub_application::ports::{
    DatagramEvent, DatagramListener, DatagramTransport, Registration,
};
use ferrous_stub_domain::DomainError;
use socket2::SockAddr;
use std::net::SocketAddr;
use tracing::{debug, trace, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP on the local tokio task set.
///
/// Must be used from inside a [`tokio::task::LocalSet`]: the receive loop
/// of every attempt is spawned with `spawn_local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl DatagramTransport for UdpTransport {
    fn send(
        &self,
        server: SocketAddr,
        payload: &[u8],
        mut listener: DatagramListener,
    ) -> Result<Registration, DomainError> {
        let socket = create_socket(server).map_err(|e| {
            DomainError::transport(server, format!("Failed to create UDP socket: {}", e))
        })?;

        // Non-blocking send on an empty buffer completes immediately.
        let bytes_sent = socket.send_to(payload, &SockAddr::from(server)).map_err(|e| {
            DomainError::transport(server, format!("Failed to send UDP query: {}", e))
        })?;

        debug!(server = %server, bytes_sent, "UDP query sent");

        let socket = register(socket).map_err(|e| {
            DomainError::transport(server, format!("Failed to register UDP socket: {}", e))
        })?;

        let receiver = tokio::task::spawn_local(async move {
            let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
            loop {
                match socket.recv_from(&mut recv_buf).await {
                    Ok((len, source)) => {
                        trace!(server = %server, source = %source, bytes = len, "UDP datagram received");
                        listener(DatagramEvent::Received {
                            source,
                            payload: recv_buf[..len].to_vec(),
                        });
                    }
                    Err(e) => {
                        warn!(server = %server, error = %e, "UDP receive failed");
                        listener(DatagramEvent::Failed(DomainError::transport(server, e)));
                        break;
                    }
                }
            }
        });

        Ok(Registration::new(move || receiver.abort()))
    }
}
