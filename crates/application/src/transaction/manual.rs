use super::{
    validate_request, DnsTransaction, DnsTransactionFactory, TransactionCallback, TransactionInfo,
};
use ferrous_stub_domain::{DnsResponse, DomainError, RecordType};
use std::cell::RefCell;
use std::rc::Rc;

struct Slot {
    info: Rc<TransactionInfo>,
    started: bool,
    alive: bool,
    callback: Option<TransactionCallback>,
}

type Slots = Rc<RefCell<Vec<Slot>>>;

/// A factory whose transactions never touch the network. Tests that sit
/// above the resolver create transactions through it and complete them
/// by hand with [`complete`](Self::complete).
#[derive(Clone, Default)]
pub struct ManualTransactionFactory {
    slots: Slots,
}

impl ManualTransactionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transactions created so far, dropped ones included.
    pub fn created(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn request(&self, index: usize) -> Option<TransactionInfo> {
        self.slots
            .borrow()
            .get(index)
            .map(|slot| TransactionInfo::clone(&slot.info))
    }

    pub fn is_started(&self, index: usize) -> bool {
        self.slots.borrow().get(index).is_some_and(|s| s.started)
    }

    /// False once the caller dropped the transaction.
    pub fn is_alive(&self, index: usize) -> bool {
        self.slots.borrow().get(index).is_some_and(|s| s.alive)
    }

    /// Delivers `result` to transaction `index`. Returns false, without
    /// invoking anything, if the transaction was never started, has been
    /// dropped or was already completed.
    pub fn complete(&self, index: usize, result: Result<DnsResponse, DomainError>) -> bool {
        let pending = {
            let mut slots = self.slots.borrow_mut();
            match slots.get_mut(index) {
                Some(slot) if slot.alive && slot.started => slot
                    .callback
                    .take()
                    .map(|callback| (callback, Rc::clone(&slot.info))),
                _ => None,
            }
        };
        match pending {
            Some((callback, info)) => {
                callback(&info, result);
                true
            }
            None => false,
        }
    }

    pub fn create(
        &self,
        hostname: &str,
        qtype: u16,
        callback: TransactionCallback,
    ) -> Result<ManualTransaction, DomainError> {
        let record_type = validate_request(hostname, qtype)?;
        let info = Rc::new(TransactionInfo::new(hostname, record_type));
        let mut slots = self.slots.borrow_mut();
        slots.push(Slot {
            info: Rc::clone(&info),
            started: false,
            alive: true,
            callback: Some(callback),
        });
        Ok(ManualTransaction {
            index: slots.len() - 1,
            info,
            slots: Rc::clone(&self.slots),
        })
    }
}

impl DnsTransactionFactory for ManualTransactionFactory {
    fn create_transaction(
        &self,
        hostname: &str,
        qtype: u16,
        callback: TransactionCallback,
    ) -> Result<Box<dyn DnsTransaction>, DomainError> {
        Ok(Box::new(self.create(hostname, qtype, callback)?))
    }
}

pub struct ManualTransaction {
    index: usize,
    info: Rc<TransactionInfo>,
    slots: Slots,
}

impl ManualTransaction {
    /// Position in the owning factory, for use with
    /// [`ManualTransactionFactory::complete`].
    pub fn index(&self) -> usize {
        self.index
    }
}

impl DnsTransaction for ManualTransaction {
    fn hostname(&self) -> &str {
        self.info.hostname()
    }

    fn record_type(&self) -> RecordType {
        self.info.record_type()
    }

    fn start(&mut self) -> Result<(), DomainError> {
        let mut slots = self.slots.borrow_mut();
        match slots.get_mut(self.index) {
            Some(slot) if !slot.started => {
                slot.started = true;
                Ok(())
            }
            _ => Err(DomainError::TransactionAlreadyStarted),
        }
    }
}

impl Drop for ManualTransaction {
    fn drop(&mut self) {
        let callback = match self.slots.try_borrow_mut() {
            Ok(mut slots) => slots.get_mut(self.index).and_then(|slot| {
                slot.alive = false;
                slot.callback.take()
            }),
            Err(_) => None,
        };
        drop(callback);
    }
}
