use super::registration::Registration;
use std::time::Duration;

pub type TimerCallback = Box<dyn FnOnce()>;

/// One-shot timers on the dispatch loop. The callback must never run
/// from inside `schedule_once`, even for a zero duration.
pub trait Timer {
    fn schedule_once(&self, after: Duration, callback: TimerCallback) -> Registration;
}
