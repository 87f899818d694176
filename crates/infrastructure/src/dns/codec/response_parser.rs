use super::record_type_map::RecordTypeMapper;
use ferrous_stub_domain::{
    AnswerRecord, DnsResponse, DomainError, Question, RecordData, ResponseCode,
};
use hickory_proto::op::{Message, MessageType, Query};
use hickory_proto::rr::{Name, RData, Record};
use std::net::IpAddr;
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes a wire-format message into the domain response.
    ///
    /// No matching is done here: a query, or a response to some other
    /// question, decodes just as well.
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let questions = message.queries().iter().map(Self::question).collect();
        let answers = message.answers().iter().map(Self::answer).collect();

        let response = DnsResponse {
            id: message.id(),
            is_response: message.message_type() == MessageType::Response,
            questions,
            rcode: ResponseCode::from_u16(u16::from(message.response_code())),
            truncated: message.truncated(),
            answers,
            answered_by: None,
        };

        debug!(
            id = response.id,
            rcode = %response.rcode,
            answers = response.answers.len(),
            truncated = response.truncated,
            "DNS response parsed"
        );

        Ok(response)
    }

    fn question(query: &Query) -> Question {
        Question {
            name: presentation_name(query.name()),
            record_type: RecordTypeMapper::from_hickory(query.query_type()),
            class: u16::from(query.query_class()),
        }
    }

    fn answer(record: &Record) -> AnswerRecord {
        let record_type = RecordTypeMapper::from_hickory(record.record_type());

        let data = match record.data() {
            RData::A(a) => RecordData::Address(IpAddr::V4(a.0)),
            RData::AAAA(aaaa) => RecordData::Address(IpAddr::V6(aaaa.0)),
            RData::CNAME(canonical) => RecordData::Name(presentation_name(canonical)),
            RData::NS(ns) => RecordData::Name(presentation_name(ns)),
            RData::PTR(ptr) => RecordData::Name(presentation_name(ptr)),
            other => RecordData::Other(other.to_string()),
        };

        AnswerRecord::new(
            presentation_name(record.name()),
            record_type,
            record.ttl(),
            data,
        )
    }
}

/// ASCII form without the root dot, the way names are compared elsewhere.
fn presentation_name(name: &Name) -> String {
    let ascii = name.to_ascii();
    match ascii.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => ascii,
    }
}
