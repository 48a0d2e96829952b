/// Guard against duplicate submission of a mutation, standing in for a
/// button that disables itself while its request is outstanding.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum PendingMutation {
    #[default]
    Idle,
    Pending,
    Failed(String),
}

impl PendingMutation {
    /// Marks the mutation as in flight. Returns `false`, changing nothing,
    /// if one already is.
    #[must_use]
    pub fn begin(&mut self) -> bool {
        match self {
            PendingMutation::Pending => false,
            _ => {
                *self = PendingMutation::Pending;
                true
            }
        }
    }

    pub fn succeed(&mut self) {
        if !self.is_pending() {
            tracing::warn!("completing a mutation that was not started");
        }
        *self = PendingMutation::Idle;
    }

    pub fn fail(&mut self, message: String) {
        if !self.is_pending() {
            tracing::warn!(%message, "failing a mutation that was not started");
        }
        *self = PendingMutation::Failed(message);
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PendingMutation::Pending)
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            PendingMutation::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
