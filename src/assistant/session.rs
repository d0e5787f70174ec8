//! Per-user session record

use super::config::ApiKey;
use super::conversation::Conversation;
use crate::calculator::{reconcile, CalculatorState, CalculatorUpdate, Reconciliation};

/// One-shot notice that the assistant changed the calculator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotice {
    /// Newline-separated diff lines
    pub text: String,
}

/// Everything held for one user: calculator, chat history and credential
///
/// Updates are merged synchronously; there is no deferred buffer.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: CalculatorState,
    pub conversation: Conversation,
    credential: Option<ApiKey>,
    notice: Option<UpdateNotice>,
}

impl Session {
    pub fn new(state: CalculatorState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Session whose profile is pre-seeded with defaults
    pub fn seeded() -> Self {
        Self::new(CalculatorState::seeded())
    }

    /// Session where the member must supply the mandatory fields
    pub fn blank() -> Self {
        Self::new(CalculatorState::blank())
    }

    pub fn set_credential(&mut self, credential: Option<ApiKey>) {
        self.credential = credential;
    }

    pub fn credential(&self) -> Option<&ApiKey> {
        self.credential.as_ref()
    }

    /// Merge an update into the calculator
    ///
    /// When anything changed, the merged state replaces the current one and
    /// a notice is stored for one-time display.
    pub fn apply(&mut self, update: &CalculatorUpdate) -> Reconciliation {
        let reconciliation = reconcile(&self.state, update);

        if reconciliation.has_changes() {
            log::info!("Calculator updated: {} field(s)", reconciliation.changes.len());
            self.state = reconciliation.state.clone();
            self.notice = Some(UpdateNotice {
                text: reconciliation.diff_text(),
            });
        }

        reconciliation
    }

    /// Whether an update notice is waiting to be shown
    pub fn was_just_updated(&self) -> bool {
        self.notice.is_some()
    }

    /// Take the pending notice; later calls return `None` until the next update
    pub fn take_notice(&mut self) -> Option<UpdateNotice> {
        self.notice.take()
    }

    /// Drop the whole conversation
    pub fn clear_chat(&mut self) {
        self.conversation.clear();
    }
}
