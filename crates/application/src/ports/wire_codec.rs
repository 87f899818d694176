use ferrous_stub_domain::{DnsResponse, DomainError, RecordType};

/// Encoding and decoding of DNS messages.
pub trait WireCodec {
    /// Builds a recursive query for `name` (dotted, no root dot), class IN.
    fn encode_query(
        &self,
        name: &str,
        record_type: RecordType,
        id: u16,
    ) -> Result<Vec<u8>, DomainError>;

    fn decode_response(&self, bytes: &[u8]) -> Result<DnsResponse, DomainError>;
}
