use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;

const RECV_BUFFER_SIZE: usize = 64 * 1024;
const SEND_BUFFER_SIZE: usize = 32 * 1024;

/// Opens a non-blocking UDP socket on an ephemeral port of the same family
/// as `server`. Not yet registered with the reactor, see [`register`].
///
/// A fresh socket per attempt keeps the source port unpredictable too.
pub(crate) fn create_socket(server: SocketAddr) -> Result<Socket, std::io::Error> {
    let (domain, bind_addr) = if server.is_ipv4() {
        (
            Domain::IPV4,
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        )
    } else {
        (
            Domain::IPV6,
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        )
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_recv_buffer_size(RECV_BUFFER_SIZE)?;
    socket.set_send_buffer_size(SEND_BUFFER_SIZE)?;

    socket.bind(&bind_addr.into())?;
    socket.set_nonblocking(true)?;

    Ok(socket)
}

/// Hands the socket to the current tokio reactor for receiving.
///
/// A fresh registration has no cached readiness, so tokio's `try_send_to`
/// would report `WouldBlock`; send on the raw socket before this.
pub(crate) fn register(socket: Socket) -> Result<UdpSocket, std::io::Error> {
    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}
