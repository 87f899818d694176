#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// NOERROR with one A record.
    Answer([u8; 4]),
    NxDomain,
    /// Answer with the TC bit set.
    Truncated([u8; 4]),
    /// First a reply with a corrupted id, then the genuine answer.
    ForgedThenAnswer([u8; 4]),
    /// Never reply.
    Silent,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            for response in Self::build_responses(&buf[..len], behavior) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries_received(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn build_responses(query: &[u8], behavior: MockBehavior) -> Vec<Vec<u8>> {
        if query.len() < 12 {
            return vec![];
        }
        match behavior {
            MockBehavior::Answer(ip) => vec![Self::build_response(query, 0x80, Some(ip))],
            MockBehavior::NxDomain => vec![Self::build_response(query, 0x83, None)],
            MockBehavior::Truncated(ip) => {
                let mut response = Self::build_response(query, 0x80, Some(ip));
                response[2] |= 0x02;
                vec![response]
            }
            MockBehavior::ForgedThenAnswer(ip) => {
                let mut forged = Self::build_response(query, 0x80, Some([203, 0, 113, 66]));
                forged[0] ^= 0xff;
                vec![forged, Self::build_response(query, 0x80, Some(ip))]
            }
            MockBehavior::Silent => vec![],
        }
    }

    /// Echoes the query's id and question; `flags_lo` carries RA and RCODE.
    fn build_response(query: &[u8], flags_lo: u8, answer: Option<[u8; 4]>) -> Vec<u8> {
        let mut response = Vec::with_capacity(512);

        response.extend_from_slice(&query[0..2]);

        // QR + RD
        response.push(0x81);
        response.push(flags_lo);

        response.extend_from_slice(&query[4..6]);

        let ancount = if answer.is_some() { 1u8 } else { 0 };
        response.extend_from_slice(&[0x00, ancount]);

        response.extend_from_slice(&[0x00, 0x00]);

        response.extend_from_slice(&[0x00, 0x00]);

        response.extend_from_slice(&query[12..]);

        if let Some(ip) = answer {
            response.extend_from_slice(&[
                0xc0, 0x0c,
                0x00, 0x01,
                0x00, 0x01,
                0x00, 0x00, 0x00, 0x3c,
                0x00, 0x04,
            ]);
            response.extend_from_slice(&ip);
        }

        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
