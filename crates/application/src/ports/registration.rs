/// Handle to a pending timer or socket registration.
///
/// Cancelling, or simply dropping, the handle tears the registration down
/// synchronously: once this returns, the associated callback will not run.
#[must_use = "dropping a Registration cancels it"]
pub struct Registration {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Registration {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A registration with nothing to tear down.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}
