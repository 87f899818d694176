//! Decides whether an inbound datagram answers the query in flight.
//!
//! Anything that fails a check is reported as a [`Mismatch`] for the
//! caller to log and discard; nothing here ever aborts a transaction.

use crate::ports::WireCodec;
use ferrous_stub_domain::{DnsResponse, Question, RecordType};
use std::fmt;
use std::net::SocketAddr;

/// What the outstanding attempt sent, and to whom.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedResponse<'a> {
    pub server: SocketAddr,
    pub query_id: u16,
    pub qname: &'a str,
    pub record_type: RecordType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    UnexpectedSource { expected: SocketAddr, actual: SocketAddr },
    Undecodable(String),
    NotAResponse,
    IdMismatch { expected: u16, actual: u16 },
    QuestionCount(usize),
    QuestionMismatch { name: String, record_type: RecordType },
    WrongClass(u16),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedSource { expected, actual } => {
                write!(f, "source {} is not the queried server {}", actual, expected)
            }
            Self::Undecodable(e) => write!(f, "undecodable datagram: {}", e),
            Self::NotAResponse => write!(f, "QR bit not set"),
            Self::IdMismatch { expected, actual } => {
                write!(f, "id {:#06x} does not match {:#06x}", actual, expected)
            }
            Self::QuestionCount(n) => write!(f, "expected one question, got {}", n),
            Self::QuestionMismatch { name, record_type } => {
                write!(f, "question {} {} does not match", name, record_type)
            }
            Self::WrongClass(class) => write!(f, "question class {} is not IN", class),
        }
    }
}

/// Runs every anti-spoofing check and returns the decoded response if the
/// datagram is a genuine answer to `expected`.
///
/// The source address is checked before the payload is even parsed.
pub fn match_response(
    expected: &ExpectedResponse<'_>,
    source: SocketAddr,
    payload: &[u8],
    codec: &dyn WireCodec,
) -> Result<DnsResponse, Mismatch> {
    if source != expected.server {
        return Err(Mismatch::UnexpectedSource {
            expected: expected.server,
            actual: source,
        });
    }

    let response = codec
        .decode_response(payload)
        .map_err(|e| Mismatch::Undecodable(e.to_string()))?;

    if !response.is_response {
        return Err(Mismatch::NotAResponse);
    }
    if response.id != expected.query_id {
        return Err(Mismatch::IdMismatch {
            expected: expected.query_id,
            actual: response.id,
        });
    }

    let question = match response.questions.as_slice() {
        [question] => question,
        other => return Err(Mismatch::QuestionCount(other.len())),
    };
    if question.class != Question::CLASS_IN {
        return Err(Mismatch::WrongClass(question.class));
    }
    if !question.matches(expected.qname, expected.record_type) {
        return Err(Mismatch::QuestionMismatch {
            name: question.name.clone(),
            record_type: question.record_type,
        });
    }

    Ok(response)
}
