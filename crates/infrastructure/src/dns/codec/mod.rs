//! Wire codec backed by `hickory-proto`.

pub mod message_builder;
pub mod record_type_map;
pub mod response_parser;

pub use message_builder::MessageBuilder;
pub use record_type_map::RecordTypeMapper;
pub use response_parser::ResponseParser;

use ferrous_stub_application::ports::WireCodec;
use ferrous_stub_domain::{DnsResponse, DomainError, RecordType};

#[derive(Debug, Clone, Copy, Default)]
pub struct HickoryCodec;

impl WireCodec for HickoryCodec {
    fn encode_query(
        &self,
        name: &str,
        record_type: RecordType,
        id: u16,
    ) -> Result<Vec<u8>, DomainError> {
        MessageBuilder::build_query(name, &record_type, id)
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        ResponseParser::parse(bytes)
    }
}
