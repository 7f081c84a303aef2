//! # Request Context
//!
//! Authenticated account and deadline of one request.

use crate::domain::errors::{PendingError, PendingResult};
use da_02_signatures::IdentityConfig;
use shared_types::Deadline;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct RequestContext {
    request_id: Uuid,
    account: Option<Arc<IdentityConfig>>,
    deadline: Deadline,
}

impl RequestContext {
    /// Context for `account` without a deadline.
    pub fn new(account: Arc<IdentityConfig>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            account: Some(account),
            deadline: Deadline::none(),
        }
    }

    /// Context with no authenticated account.
    pub fn anonymous() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            account: None,
            deadline: Deadline::none(),
        }
    }

    /// Correlation id recorded on the request's log spans.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Deadline::after(timeout))
    }

    /// The authenticated account, or `ContextMissing`.
    pub fn account(&self) -> PendingResult<&Arc<IdentityConfig>> {
        self.account.as_ref().ok_or(PendingError::ContextMissing)
    }

    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }
}
