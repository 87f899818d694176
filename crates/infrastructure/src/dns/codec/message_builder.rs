//! DNS Message Builder
//!
//! Constructs DNS query messages in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use ferrous_stub_domain::{DomainError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query (RD set) with a single `IN` question and the
    /// caller-supplied id, serialized to wire format.
    ///
    /// `domain` is taken as fully qualified whether or not it carries the
    /// root dot.
    pub fn build_query(
        domain: &str,
        record_type: &RecordType,
        id: u16,
    ) -> Result<Vec<u8>, DomainError> {
        let mut name = Name::from_str(domain).map_err(|e| {
            DomainError::QueryEncoding(format!("Invalid domain '{}': {}", domain, e))
        })?;
        name.set_fqdn(true);

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        Self::serialize_message(&message)
    }

    /// Serialize a Message to wire format bytes
    pub(crate) fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::QueryEncoding(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_a_query() {
        let bytes = MessageBuilder::build_query("example.com", &RecordType::A, 0x1234).unwrap();

        // DNS header is always 12 bytes, plus question section
        assert!(bytes.len() > 12, "DNS message too short: {} bytes", bytes.len());
        assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), 0x1234);

        // Byte 2: QR(1) + Opcode(4) + AA(1) + TC(1) + RD(1)
        assert_eq!(bytes[2] & 0x80, 0, "QR must be clear on a query");
        assert_eq!(bytes[2] & 0x01, 0x01, "RD flag should be set");

        // QDCOUNT
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 1);
    }

    #[test]
    fn test_trailing_dot_is_equivalent() {
        let bare = MessageBuilder::build_query("example.com", &RecordType::MX, 7).unwrap();
        let fqdn = MessageBuilder::build_query("example.com.", &RecordType::MX, 7).unwrap();
        assert_eq!(bare, fqdn);
    }

    #[test]
    fn test_oversized_label_is_rejected() {
        let label = "a".repeat(64);
        let result = MessageBuilder::build_query(&format!("{}.com", label), &RecordType::A, 1);
        assert!(matches!(result, Err(DomainError::QueryEncoding(_))));
    }
}
