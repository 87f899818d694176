pub mod codec;
pub mod query_id;
pub mod timer;
pub mod transport;

pub use codec::HickoryCodec;
pub use query_id::SystemRandomIdSource;
pub use timer::TokioTimer;
pub use transport::UdpTransport;
