//! # Transaction Submitter
//!
//! Submits a ledger call and retries it while the ledger reports that
//! another transaction from the same account raced it (replacement
//! underpriced, nonce too low). Any other error is returned at once.
//!
//! Attempts for one ledger account are serialized by an async mutex per
//! account; different accounts submit concurrently.

use crate::domain::errors::SubmitError;
use crate::domain::ledger::{LedgerError, TxHandle};
use parking_lot::Mutex;
use shared_types::Deadline;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Retry budget for conflicting submissions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitterConfig {
    /// Total attempts, including the first
    pub max_retries: u32,
    /// Sleep between attempts
    pub retry_interval: Duration,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_interval: Duration::from_secs(2),
        }
    }
}

pub struct TransactionSubmitter {
    config: SubmitterConfig,
    accounts: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TransactionSubmitter {
    pub fn new(config: SubmitterConfig) -> Self {
        Self {
            config,
            accounts: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SubmitterConfig {
        &self.config
    }

    fn account_lock(&self, account: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.accounts
            .lock()
            .entry(account.to_string())
            .or_default()
            .clone()
    }

    /// Run `call` until it succeeds, fails with a non-conflict error, runs
    /// out of attempts or `deadline` passes.
    pub async fn submit<F, Fut>(
        &self,
        deadline: &Deadline,
        account: &str,
        mut call: F,
    ) -> Result<TxHandle, SubmitError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<TxHandle, LedgerError>>,
    {
        let lock = self.account_lock(account);
        let _guard = deadline
            .run(lock.lock_owned())
            .await
            .map_err(|_| SubmitError::Cancelled { attempts: 0 })?;

        let max_tries = self.config.max_retries.max(1);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let result = deadline
                .run(call())
                .await
                .map_err(|_| SubmitError::Cancelled { attempts })?;

            match result {
                Ok(handle) => {
                    debug!(account, attempts, tx = %hex::encode(handle.tx_hash), "transaction submitted");
                    return Ok(handle);
                }
                Err(err) if err.is_conflict() => {
                    if attempts >= max_tries {
                        error!(account, attempts, "max concurrent transaction tries reached");
                        return Err(SubmitError::RetriesExhausted { attempts, last: err });
                    }
                    warn!(
                        account,
                        attempt = attempts,
                        max = max_tries,
                        "concurrent transaction identified, trying again"
                    );
                    deadline
                        .sleep(self.config.retry_interval)
                        .await
                        .map_err(|_| SubmitError::Cancelled { attempts })?;
                }
                Err(err) => return Err(SubmitError::Ledger(err)),
            }
        }
    }
}
