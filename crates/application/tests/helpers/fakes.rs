use ferrous_stub_application::ports::{
    DatagramEvent, DatagramListener, DatagramTransport, QueryIdSource, Registration, Timer,
    TimerCallback, WireCodec,
};
use ferrous_stub_domain::{DnsResponse, DomainError, RecordType};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::Duration;

// ── codec ──────────────────────────────────────────────────────────────────

/// Query as the JSON codec puts it on the "wire".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonQuery {
    pub id: u16,
    pub name: String,
    pub record_type: RecordType,
}

/// Readable stand-in for the DNS wire format: queries are [`JsonQuery`],
/// responses are serialized [`DnsResponse`]s.
pub struct JsonCodec;

impl JsonCodec {
    pub fn response_bytes(response: &DnsResponse) -> Vec<u8> {
        serde_json::to_vec(response).unwrap()
    }
}

impl WireCodec for JsonCodec {
    fn encode_query(
        &self,
        name: &str,
        record_type: RecordType,
        id: u16,
    ) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(&JsonQuery {
            id,
            name: name.to_string(),
            record_type,
        })
        .map_err(|e| DomainError::QueryEncoding(e.to_string()))
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::InvalidDnsResponse(e.to_string()))
    }
}

// ── ids ────────────────────────────────────────────────────────────────────

pub struct SequentialIds {
    next: Cell<u16>,
}

impl SequentialIds {
    pub fn starting_at(first: u16) -> Self {
        Self {
            next: Cell::new(first),
        }
    }
}

impl QueryIdSource for SequentialIds {
    fn next_id(&self) -> Result<u16, DomainError> {
        let id = self.next.get();
        self.next.set(id.wrapping_add(1));
        Ok(id)
    }
}

// ── timer ──────────────────────────────────────────────────────────────────

struct TimerEntry {
    after: Duration,
    callback: Option<TimerCallback>,
    cancelled: bool,
}

/// Timer driven by the test: nothing fires until `fire_next` is called.
#[derive(Clone, Default)]
pub struct ManualTimer {
    entries: Rc<RefCell<Vec<TimerEntry>>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers still armed.
    pub fn pending(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.callback.is_some())
            .count()
    }

    /// Durations of every timer ever scheduled, in order.
    pub fn scheduled(&self) -> Vec<Duration> {
        self.entries.borrow().iter().map(|e| e.after).collect()
    }

    pub fn cancelled(&self) -> usize {
        self.entries.borrow().iter().filter(|e| e.cancelled).count()
    }

    /// Fires the oldest armed timer. Returns false if none was armed.
    pub fn fire_next(&self) -> bool {
        let callback = {
            let mut entries = self.entries.borrow_mut();
            entries.iter_mut().find_map(|e| e.callback.take())
        };
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Fires timers until none is left, with a safety cap.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while fired < 1_000 && self.fire_next() {
            fired += 1;
        }
        fired
    }
}

impl Timer for ManualTimer {
    fn schedule_once(&self, after: Duration, callback: TimerCallback) -> Registration {
        let index = {
            let mut entries = self.entries.borrow_mut();
            entries.push(TimerEntry {
                after,
                callback: Some(callback),
                cancelled: false,
            });
            entries.len() - 1
        };
        let entries = Rc::clone(&self.entries);
        Registration::new(move || {
            let callback = entries.borrow_mut()[index].callback.take();
            if callback.is_some() {
                entries.borrow_mut()[index].cancelled = true;
            }
            drop(callback);
        })
    }
}

// ── transport ──────────────────────────────────────────────────────────────

struct Channel {
    server: SocketAddr,
    payload: Vec<u8>,
    listener: Option<DatagramListener>,
    open: bool,
}

/// Records every send and lets the test inject datagrams or socket
/// errors into the channel opened by a given send.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    channels: Rc<RefCell<Vec<Channel>>>,
    unreachable: Rc<RefCell<HashSet<SocketAddr>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to `server` fail synchronously from now on.
    pub fn make_unreachable(&self, server: SocketAddr) {
        self.unreachable.borrow_mut().insert(server);
    }

    pub fn sent_count(&self) -> usize {
        self.channels.borrow().len()
    }

    pub fn sent(&self) -> Vec<(SocketAddr, JsonQuery)> {
        self.channels
            .borrow()
            .iter()
            .map(|c| (c.server, serde_json::from_slice(&c.payload).unwrap()))
            .collect()
    }

    pub fn last_sent(&self) -> (SocketAddr, JsonQuery) {
        self.sent().pop().expect("nothing was sent")
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.channels.borrow()[index].open
    }

    pub fn open_channels(&self) -> usize {
        self.channels.borrow().iter().filter(|c| c.open).count()
    }

    /// Injects a datagram from `source` into channel `index`. Returns
    /// false if the channel was already torn down.
    pub fn deliver(&self, index: usize, source: SocketAddr, payload: Vec<u8>) -> bool {
        self.dispatch(index, DatagramEvent::Received { source, payload })
    }

    /// Replies on the latest channel as its own server would.
    pub fn reply(&self, response: &DnsResponse) -> bool {
        let index = self.sent_count() - 1;
        let server = self.channels.borrow()[index].server;
        self.deliver(index, server, JsonCodec::response_bytes(response))
    }

    pub fn fail(&self, index: usize, error: DomainError) -> bool {
        self.dispatch(index, DatagramEvent::Failed(error))
    }

    fn dispatch(&self, index: usize, event: DatagramEvent) -> bool {
        let listener = {
            let mut channels = self.channels.borrow_mut();
            let channel = &mut channels[index];
            if !channel.open {
                return false;
            }
            channel.listener.take()
        };
        let Some(mut listener) = listener else {
            return false;
        };
        listener(event);

        let mut channels = self.channels.borrow_mut();
        if channels[index].open {
            channels[index].listener = Some(listener);
        }
        true
    }
}

impl DatagramTransport for ScriptedTransport {
    fn send(
        &self,
        server: SocketAddr,
        payload: &[u8],
        listener: DatagramListener,
    ) -> Result<Registration, DomainError> {
        if self.unreachable.borrow().contains(&server) {
            return Err(DomainError::transport(server, "network unreachable"));
        }
        let index = {
            let mut channels = self.channels.borrow_mut();
            channels.push(Channel {
                server,
                payload: payload.to_vec(),
                listener: Some(listener),
                open: true,
            });
            channels.len() - 1
        };
        let channels = Rc::clone(&self.channels);
        Ok(Registration::new(move || {
            let listener = {
                let mut channels = channels.borrow_mut();
                channels[index].open = false;
                channels[index].listener.take()
            };
            drop(listener);
        }))
    }
}
