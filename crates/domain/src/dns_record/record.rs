use super::RecordType;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordData {
    /// A or AAAA
    Address(IpAddr),

    /// CNAME, NS or PTR target
    Name(String),

    /// Anything else, in presentation format.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub name: String,

    pub record_type: RecordType,

    pub ttl: u32,

    pub data: RecordData,
}

impl AnswerRecord {
    pub fn new(name: impl Into<String>, record_type: RecordType, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl,
            data,
        }
    }

    pub fn address(&self) -> Option<IpAddr> {
        match self.data {
            RecordData::Address(ip) => Some(ip),
            _ => None,
        }
    }
}
