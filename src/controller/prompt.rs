//! Operator prompts raised by controller actions.

use std::sync::{Mutex, PoisonError};

/// Where the controller sends alerts and asks for confirmation.
pub trait Prompter: Send + Sync {
    /// Show a message to the operator.
    fn alert(&self, message: &str);

    /// Ask a yes/no question. `false` aborts the action.
    fn confirm(&self, question: &str) -> bool;
}

/// Prompter for one console form submission.
///
/// Confirmation comes from the submitted form: when it is absent the
/// question is kept so the caller can render a confirmation page.
#[derive(Debug, Default)]
pub struct FormPrompter {
    confirmed: bool,
    alerts: Mutex<Vec<String>>,
    pending: Mutex<Option<String>>,
}

impl FormPrompter {
    pub fn new(confirmed: bool) -> Self {
        Self {
            confirmed,
            ..Default::default()
        }
    }

    /// Alerts raised so far, in order.
    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut *self.alerts.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// The question that went unanswered, if confirmation was required.
    pub fn take_pending(&self) -> Option<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Prompter for FormPrompter {
    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }

    fn confirm(&self, question: &str) -> bool {
        if !self.confirmed {
            *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(question.to_string());
        }
        self.confirmed
    }
}
