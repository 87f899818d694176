use ferrous_stub_application::ports::{Registration, Timer, TimerCallback};
use std::time::Duration;

/// One-shot timers as `spawn_local`ed sleeps; requires a
/// [`tokio::task::LocalSet`]. Cancelling aborts the sleeping task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl TokioTimer {
    pub fn new() -> Self {
        Self
    }
}

impl Timer for TokioTimer {
    fn schedule_once(&self, after: Duration, callback: TimerCallback) -> Registration {
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(after).await;
            callback();
        });
        Registration::new(move || task.abort())
    }
}
