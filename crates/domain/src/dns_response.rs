use crate::dns_record::{AnswerRecord, RecordData, RecordType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    Other(u16),
}

impl ResponseCode {
    pub fn from_u16(code: u16) -> Self {
        match code {
            0 => Self::NoError,
            1 => Self::FormErr,
            2 => Self::ServFail,
            3 => Self::NXDomain,
            4 => Self::NotImp,
            5 => Self::Refused,
            other => Self::Other(other),
        }
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            Self::NoError => 0,
            Self::FormErr => 1,
            Self::ServFail => 2,
            Self::NXDomain => 3,
            Self::NotImp => 4,
            Self::Refused => 5,
            Self::Other(code) => *code,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoError => "NOERROR",
            Self::FormErr => "FORMERR",
            Self::ServFail => "SERVFAIL",
            Self::NXDomain => "NXDOMAIN",
            Self::NotImp => "NOTIMP",
            Self::Refused => "REFUSED",
            Self::Other(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Dotted name without the trailing root dot.
    pub name: String,

    pub record_type: RecordType,

    /// QCLASS as found on the wire; 1 is IN.
    pub class: u16,
}

impl Question {
    pub const CLASS_IN: u16 = 1;

    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
            class: Self::CLASS_IN,
        }
    }

    /// Case-insensitive comparison against the name and type of a query.
    pub fn matches(&self, name: &str, record_type: RecordType) -> bool {
        self.record_type == record_type
            && trim_root(&self.name).eq_ignore_ascii_case(trim_root(name))
    }
}

fn trim_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// A decoded DNS response message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsResponse {
    pub id: u16,

    /// QR bit.
    pub is_response: bool,

    pub questions: Vec<Question>,

    pub rcode: ResponseCode,

    pub truncated: bool,

    pub answers: Vec<AnswerRecord>,

    /// Name server that produced this response, once matched to a query.
    #[serde(default)]
    pub answered_by: Option<SocketAddr>,
}

impl DnsResponse {
    pub fn new(id: u16, question: Question, rcode: ResponseCode) -> Self {
        Self {
            id,
            is_response: true,
            questions: vec![question],
            rcode,
            truncated: false,
            answers: Vec::new(),
            answered_by: None,
        }
    }

    pub fn with_answer(mut self, answer: AnswerRecord) -> Self {
        self.answers.push(answer);
        self
    }

    /// The name actually answered, which differs from the caller's
    /// hostname when a search suffix was applied.
    pub fn qname(&self) -> Option<&str> {
        self.questions.first().map(|q| q.name.as_str())
    }

    pub fn addresses(&self) -> Vec<IpAddr> {
        self.answers.iter().filter_map(AnswerRecord::address).collect()
    }

    pub fn cname(&self) -> Option<&str> {
        self.answers.iter().find_map(|r| match (&r.record_type, &r.data) {
            (RecordType::CNAME, RecordData::Name(target)) => Some(target.as_str()),
            _ => None,
        })
    }

    pub fn min_ttl(&self) -> Option<u32> {
        self.answers.iter().map(|r| r.ttl).min()
    }

    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }

    pub fn is_nodata(&self) -> bool {
        self.rcode == ResponseCode::NoError && self.answers.is_empty()
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self.rcode,
            ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::NotImp
        )
    }
}
