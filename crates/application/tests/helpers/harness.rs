use super::fakes::{JsonCodec, JsonQuery, ManualTimer, ScriptedTransport, SequentialIds};
use ferrous_stub_application::{
    DnsSession, ResolverPorts, StubTransaction, StubTransactionFactory, TransactionCallback,
    TransactionInfo,
};
use ferrous_stub_domain::{
    AnswerRecord, DnsResponse, DomainError, Question, RecordData, ResolverConfig, ResponseCode,
};
use std::cell::RefCell;
use std::net::SocketAddr;
use std::rc::Rc;
use std::sync::Arc;

pub const FIRST_ID: u16 = 0x1000;

/// `n` documentation-range servers on port 53.
pub fn servers(n: u8) -> Vec<SocketAddr> {
    (1..=n)
        .map(|i| SocketAddr::from(([192, 0, 2, i], 53)))
        .collect()
}

/// A NOERROR response to `query` carrying one A record.
pub fn answer_for(query: &JsonQuery, ip: &str) -> DnsResponse {
    DnsResponse::new(
        query.id,
        Question::new(query.name.clone(), query.record_type),
        ResponseCode::NoError,
    )
    .with_answer(AnswerRecord::new(
        query.name.clone(),
        query.record_type,
        300,
        RecordData::Address(ip.parse().unwrap()),
    ))
}

type Outcome = (String, Result<DnsResponse, DomainError>);

/// A factory wired to fakes, plus a log of every callback invocation.
pub struct Harness {
    pub timer: ManualTimer,
    pub transport: ScriptedTransport,
    pub factory: StubTransactionFactory,
    outcomes: Rc<RefCell<Vec<Outcome>>>,
}

impl Harness {
    pub fn new(config: ResolverConfig) -> Self {
        let timer = ManualTimer::new();
        let transport = ScriptedTransport::new();
        let ports = ResolverPorts {
            codec: Rc::new(JsonCodec),
            transport: Rc::new(transport.clone()),
            timer: Rc::new(timer.clone()),
            ids: Rc::new(SequentialIds::starting_at(FIRST_ID)),
        };
        let session = Arc::new(DnsSession::new(config));
        Self {
            timer,
            transport,
            factory: StubTransactionFactory::new(session, ports),
            outcomes: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_servers(n: u8) -> Self {
        Self::new(ResolverConfig::with_servers(servers(n)))
    }

    pub fn callback(&self) -> TransactionCallback {
        let outcomes = Rc::clone(&self.outcomes);
        Box::new(move |info: &TransactionInfo, result| {
            outcomes
                .borrow_mut()
                .push((info.hostname().to_string(), result))
        })
    }

    /// Creates and starts a transaction for an A lookup.
    pub fn start(&self, hostname: &str) -> StubTransaction {
        use ferrous_stub_application::DnsTransaction;

        let mut tx = self.factory.create(hostname, 1, self.callback()).unwrap();
        tx.start().unwrap();
        tx
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.borrow().clone()
    }

    pub fn callback_count(&self) -> usize {
        self.outcomes.borrow().len()
    }
}
