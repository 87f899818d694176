#![allow(dead_code)]

use ferrous_stub_domain::{
    AnswerRecord, DnsResponse, Question, RecordData, RecordType, ResponseCode,
};

pub struct DnsResponseBuilder {
    id: u16,
    question: Question,
    rcode: ResponseCode,
    answers: Vec<AnswerRecord>,
    truncated: bool,
}

impl DnsResponseBuilder {
    pub fn new(name: &str, record_type: RecordType) -> Self {
        Self {
            id: 0x1234,
            question: Question::new(name, record_type),
            rcode: ResponseCode::NoError,
            answers: vec![],
            truncated: false,
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.rcode = rcode;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    pub fn a(mut self, ip: &str, ttl: u32) -> Self {
        let name = self.question.name.clone();
        self.answers.push(AnswerRecord::new(
            name,
            RecordType::A,
            ttl,
            RecordData::Address(ip.parse().unwrap()),
        ));
        self
    }

    pub fn cname(mut self, target: &str, ttl: u32) -> Self {
        let name = self.question.name.clone();
        self.answers.push(AnswerRecord::new(
            name,
            RecordType::CNAME,
            ttl,
            RecordData::Name(target.to_string()),
        ));
        self
    }

    pub fn build(self) -> DnsResponse {
        let mut response = DnsResponse::new(self.id, self.question, self.rcode);
        response.answers = self.answers;
        response.truncated = self.truncated;
        response
    }
}
