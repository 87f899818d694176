use super::{DnsTransaction, TransactionCallback, TransactionInfo, TransactionState};
use crate::ports::{DatagramEvent, Registration, ResolverPorts};
use crate::services::{match_response, DnsSession, ExpectedResponse, SearchPlanner};
use ferrous_stub_domain::{CandidateName, DnsResponse, DomainError, RecordType};
use std::cell::RefCell;
use std::net::SocketAddr;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
struct AttemptPlan {
    server_index: usize,
    server: SocketAddr,
    /// Retransmissions already made to this server for this candidate.
    retry: u32,
}

/// The single exchange in flight. Dropping it revokes both registrations.
struct Attempt {
    plan: AttemptPlan,
    generation: u64,
    query_id: u16,
    qname: String,
    issued_at: Instant,
    _socket: Registration,
    _timer: Registration,
}

struct Completion {
    callback: TransactionCallback,
    info: Rc<TransactionInfo>,
    result: Result<DnsResponse, DomainError>,
}

impl Completion {
    fn deliver(self) {
        (self.callback)(&self.info, self.result)
    }
}

struct Inner {
    info: Rc<TransactionInfo>,
    session: Arc<DnsSession>,
    ports: ResolverPorts,
    state: TransactionState,
    candidates: Vec<CandidateName>,
    candidate_index: usize,
    /// Distinct server selections made for the current candidate.
    servers_tried: usize,
    attempt: Option<Attempt>,
    attempts_issued: u32,
    /// Bumped per attempt so late events from a replaced attempt are
    /// recognised and ignored.
    generation: u64,
    callback: Option<TransactionCallback>,
    deferred: Option<Completion>,
    deferred_timer: Option<Registration>,
    this: Weak<RefCell<Inner>>,
}

/// The real stub-resolver transaction.
///
/// One attempt at a time: a query goes to one server and waits for either
/// a matching response or its timeout. Timeouts and socket errors retry
/// the same server with a fresh id (backing off), then move to the next
/// server in the session's rotation, then to the next search candidate.
pub struct StubTransaction {
    info: Rc<TransactionInfo>,
    inner: Rc<RefCell<Inner>>,
}

impl StubTransaction {
    pub(crate) fn new(
        info: TransactionInfo,
        session: Arc<DnsSession>,
        ports: ResolverPorts,
        callback: TransactionCallback,
    ) -> Self {
        let info = Rc::new(info);
        let inner = Rc::new_cyclic(|this| {
            RefCell::new(Inner {
                info: Rc::clone(&info),
                session,
                ports,
                state: TransactionState::Created,
                candidates: Vec::new(),
                candidate_index: 0,
                servers_tried: 0,
                attempt: None,
                attempts_issued: 0,
                generation: 0,
                callback: Some(callback),
                deferred: None,
                deferred_timer: None,
                this: this.clone(),
            })
        });
        Self { info, inner }
    }

    pub fn info(&self) -> &TransactionInfo {
        &self.info
    }

    pub fn state(&self) -> TransactionState {
        self.inner.borrow().state
    }

    /// Queries sent so far, including ones whose send failed.
    pub fn attempts_issued(&self) -> u32 {
        self.inner.borrow().attempts_issued
    }

    /// The search plan; empty until started.
    pub fn candidates(&self) -> Vec<CandidateName> {
        self.inner.borrow().candidates.clone()
    }

    pub fn current_candidate(&self) -> Option<String> {
        let inner = self.inner.borrow();
        inner
            .attempt
            .as_ref()
            .map(|attempt| attempt.qname.clone())
    }

    pub fn current_server(&self) -> Option<(usize, SocketAddr)> {
        let inner = self.inner.borrow();
        inner
            .attempt
            .as_ref()
            .map(|attempt| (attempt.plan.server_index, attempt.plan.server))
    }
}

impl DnsTransaction for StubTransaction {
    fn hostname(&self) -> &str {
        self.info.hostname()
    }

    fn record_type(&self) -> RecordType {
        self.info.record_type()
    }

    fn start(&mut self) -> Result<(), DomainError> {
        self.inner.borrow_mut().start()
    }
}

impl Drop for StubTransaction {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.cancel();
        }
    }
}

impl Inner {
    fn start(&mut self) -> Result<(), DomainError> {
        if self.state != TransactionState::Created {
            return Err(DomainError::TransactionAlreadyStarted);
        }

        let first = match self.prepare() {
            Ok(plan) => plan,
            Err(err) => {
                warn!(hostname = %self.info.hostname(), error = %err, "Transaction failed to start");
                self.state = TransactionState::ConfigError;
                self.callback = None;
                return Err(err);
            }
        };

        self.state = TransactionState::Attempting;
        debug!(
            hostname = %self.info.hostname(),
            qtype = %self.info.record_type(),
            candidates = self.candidates.len(),
            "Transaction started"
        );

        // Completion must stay asynchronous even if every send failed
        // right here.
        if let Some(completion) = self.advance(Some(first)) {
            self.defer(completion);
        }
        Ok(())
    }

    fn prepare(&mut self) -> Result<AttemptPlan, DomainError> {
        if self.session.config().servers.is_empty() {
            return Err(DomainError::NoServersConfigured);
        }
        let candidates = SearchPlanner::plan(self.info.hostname(), self.session.config());
        if candidates.is_empty() {
            return Err(DomainError::NoUsableCandidates(
                self.info.hostname().to_string(),
            ));
        }
        self.candidates = candidates;
        self.candidate_index = 0;
        self.next_server_plan()
    }

    fn next_server_plan(&mut self) -> Result<AttemptPlan, DomainError> {
        let (server_index, server) = self.session.next_server()?;
        self.servers_tried += 1;
        Ok(AttemptPlan {
            server_index,
            server,
            retry: 0,
        })
    }

    /// Retry policy: same server while retries remain, then the next
    /// server in rotation, then the next candidate with a fresh server
    /// budget. `None` once everything is spent.
    fn plan_next(&mut self, current: AttemptPlan) -> Option<AttemptPlan> {
        let attempts_per_server = self.session.config().attempts_per_server();
        let servers_per_candidate = self.session.config().servers_per_candidate();

        if current.retry + 1 < attempts_per_server {
            return Some(AttemptPlan {
                retry: current.retry + 1,
                ..current
            });
        }
        if self.servers_tried < servers_per_candidate {
            return self.next_server_plan().ok();
        }
        if self.candidate_index + 1 < self.candidates.len() {
            self.candidate_index += 1;
            self.servers_tried = 0;
            debug!(
                hostname = %self.info.hostname(),
                candidate = %self.candidates[self.candidate_index].name,
                "Moving to next search candidate"
            );
            return self.next_server_plan().ok();
        }
        None
    }

    /// Sends attempts until one is in flight; returns the exhaustion
    /// completion when the budget runs out first.
    fn advance(&mut self, mut next: Option<AttemptPlan>) -> Option<Completion> {
        while let Some(plan) = next {
            match self.try_send(plan) {
                Ok(()) => return None,
                Err(err) => {
                    warn!(server = %plan.server, retry = plan.retry, error = %err, "Failed to send query");
                    next = self.plan_next(plan);
                }
            }
        }

        self.state = TransactionState::AttemptsExhausted;
        warn!(
            hostname = %self.info.hostname(),
            attempts = self.attempts_issued,
            "Resolution exhausted all candidates and servers"
        );
        self.complete(Err(DomainError::NameResolutionTimedOut {
            hostname: self.info.hostname().to_string(),
            attempts: self.attempts_issued,
        }))
    }

    fn try_send(&mut self, plan: AttemptPlan) -> Result<(), DomainError> {
        let qname = self.candidates[self.candidate_index].name.clone();
        let record_type = self.info.record_type();
        self.generation += 1;
        let generation = self.generation;
        self.attempts_issued += 1;

        let query_id = self.ports.ids.next_id()?;

        let payload = self.ports.codec.encode_query(&qname, record_type, query_id)?;

        let this = self.this.clone();
        let socket = self.ports.transport.send(
            plan.server,
            &payload,
            Box::new(move |event| on_datagram(&this, generation, event)),
        )?;

        let timeout = self.session.config().attempt_timeout(plan.retry);
        let this = self.this.clone();
        let timer = self
            .ports
            .timer
            .schedule_once(timeout, Box::new(move || on_timeout(&this, generation)));

        debug!(
            qname = %qname,
            qtype = %record_type,
            server = %plan.server,
            query_id,
            retry = plan.retry,
            attempt = self.attempts_issued,
            timeout_ms = timeout.as_millis() as u64,
            "Query sent"
        );

        self.attempt = Some(Attempt {
            plan,
            generation,
            query_id,
            qname,
            issued_at: Instant::now(),
            _socket: socket,
            _timer: timer,
        });
        Ok(())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state == TransactionState::Attempting
            && self
                .attempt
                .as_ref()
                .is_some_and(|attempt| attempt.generation == generation)
    }

    fn handle_timeout(&mut self, generation: u64) -> Option<Completion> {
        if !self.is_current(generation) {
            return None;
        }
        let attempt = self.attempt.take()?;
        debug!(
            qname = %attempt.qname,
            server = %attempt.plan.server,
            query_id = attempt.query_id,
            retry = attempt.plan.retry,
            elapsed_ms = attempt.issued_at.elapsed().as_millis() as u64,
            "Attempt timed out"
        );
        let plan = attempt.plan;
        drop(attempt);

        let next = self.plan_next(plan);
        self.advance(next)
    }

    fn handle_datagram(&mut self, generation: u64, event: DatagramEvent) -> Option<Completion> {
        if !self.is_current(generation) {
            debug!(generation, "Ignoring datagram for a finished attempt");
            return None;
        }

        match event {
            DatagramEvent::Failed(err) => {
                let attempt = self.attempt.take()?;
                warn!(server = %attempt.plan.server, error = %err, "Socket error, treating as failed attempt");
                let plan = attempt.plan;
                drop(attempt);

                let next = self.plan_next(plan);
                self.advance(next)
            }
            DatagramEvent::Received { source, payload } => {
                let attempt = self.attempt.as_ref()?;
                let expected = ExpectedResponse {
                    server: attempt.plan.server,
                    query_id: attempt.query_id,
                    qname: &attempt.qname,
                    record_type: self.info.record_type(),
                };

                match match_response(&expected, source, &payload, self.ports.codec.as_ref()) {
                    Err(mismatch) => {
                        debug!(source = %source, reason = %mismatch, "Discarding datagram");
                        None
                    }
                    Ok(mut response) => {
                        response.answered_by = Some(attempt.plan.server);
                        debug!(
                            qname = %attempt.qname,
                            server = %attempt.plan.server,
                            rcode = %response.rcode,
                            latency_ms = attempt.issued_at.elapsed().as_millis() as u64,
                            "Matched response"
                        );
                        self.state = TransactionState::Succeeded;
                        self.complete(Ok(response))
                    }
                }
            }
        }
    }

    fn complete(&mut self, result: Result<DnsResponse, DomainError>) -> Option<Completion> {
        self.attempt = None;
        let callback = self.callback.take()?;
        Some(Completion {
            callback,
            info: Rc::clone(&self.info),
            result,
        })
    }

    fn defer(&mut self, completion: Completion) {
        let this = self.this.clone();
        self.deferred = Some(completion);
        self.deferred_timer = Some(self.ports.timer.schedule_once(
            Duration::ZERO,
            Box::new(move || {
                let Some(inner) = this.upgrade() else {
                    return;
                };
                let completion = inner.borrow_mut().deferred.take();
                if let Some(completion) = completion {
                    completion.deliver();
                }
            }),
        ));
    }

    fn cancel(&mut self) {
        if self.state == TransactionState::Attempting || self.deferred.is_some() {
            debug!(hostname = %self.info.hostname(), "Transaction cancelled");
        }
        self.callback = None;
        self.deferred = None;
        self.attempt = None;
        self.deferred_timer = None;
    }
}

fn on_timeout(this: &Weak<RefCell<Inner>>, generation: u64) {
    let Some(inner) = this.upgrade() else {
        return;
    };
    let completion = inner.borrow_mut().handle_timeout(generation);
    if let Some(completion) = completion {
        completion.deliver();
    }
}

fn on_datagram(this: &Weak<RefCell<Inner>>, generation: u64, event: DatagramEvent) {
    let Some(inner) = this.upgrade() else {
        return;
    };
    let completion = inner.borrow_mut().handle_datagram(generation, event);
    if let Some(completion) = completion {
        completion.deliver();
    }
}
