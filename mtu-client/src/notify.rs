use std::{cell::RefCell, rc::Rc};

/// Where blocking user-facing alerts go
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Notifier for headless use: alerts only end up in the logs
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        tracing::warn!(message, "user-facing alert");
    }
}

/// Notifier keeping every alert, for UIs that render them later and for tests
#[derive(Clone, Debug, Default)]
pub struct AlertLog(Rc<RefCell<Vec<String>>>);

impl AlertLog {
    pub fn new() -> AlertLog {
        AlertLog::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl Notifier for AlertLog {
    fn alert(&self, message: &str) {
        tracing::debug!(message, "recording alert");
        self.0.borrow_mut().push(String::from(message));
    }
}
