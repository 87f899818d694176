mod datagram_transport;
mod query_id_source;
mod registration;
mod timer;
mod wire_codec;

pub use datagram_transport::{DatagramEvent, DatagramListener, DatagramTransport};
pub use query_id_source::QueryIdSource;
pub use registration::Registration;
pub use timer::{Timer, TimerCallback};
pub use wire_codec::WireCodec;

use std::rc::Rc;

/// The collaborators a transaction needs to reach the outside world.
///
/// All of them are driven from one dispatch thread, hence `Rc`.
#[derive(Clone)]
pub struct ResolverPorts {
    pub codec: Rc<dyn WireCodec>,
    pub transport: Rc<dyn DatagramTransport>,
    pub timer: Rc<dyn Timer>,
    pub ids: Rc<dyn QueryIdSource>,
}
