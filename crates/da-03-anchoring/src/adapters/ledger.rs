//! Scriptable in-memory ledger.

use crate::domain::ledger::{AnchorCommit, LedgerAnchor, LedgerError, TxHandle};
use crate::ports::outbound::LedgerClient;
use async_trait::async_trait;
use da_01_document_model::DocumentIdentifier;
use parking_lot::{Mutex, RwLock};
use shared_crypto::sha256_many;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

/// Ledger that records anchors and replays queued failures first.
pub struct MockLedgerClient {
    chain_id: u64,
    offline: AtomicBool,
    failures: Mutex<VecDeque<LedgerError>>,
    anchors: RwLock<Vec<LedgerAnchor>>,
    attempts: AtomicU32,
    latency: Mutex<Duration>,
}

impl MockLedgerClient {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            offline: AtomicBool::new(false),
            failures: Mutex::new(VecDeque::new()),
            anchors: RwLock::new(Vec::new()),
            attempts: AtomicU32::new(0),
            latency: Mutex::new(Duration::ZERO),
        }
    }

    /// Delay every `commit_anchor` call by `latency` before it is recorded.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    /// Fail every call with a connection error while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Queue errors returned by the next `commit_anchor` calls.
    pub fn fail_next(&self, errors: impl IntoIterator<Item = LedgerError>) {
        self.failures.lock().extend(errors);
    }

    /// Anchors recorded so far.
    pub fn anchors(&self) -> Vec<AnchorCommit> {
        self.anchors.read().iter().map(|a| a.commit.clone()).collect()
    }

    /// `commit_anchor` calls so far, failed ones included.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> Result<(), LedgerError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(LedgerError::Connection("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn chain_id(&self) -> Result<u64, LedgerError> {
        self.ensure_online()?;
        Ok(self.chain_id)
    }

    async fn commit_anchor(&self, account: &str, commit: &AnchorCommit) -> Result<TxHandle, LedgerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.ensure_online()?;
        if let Some(err) = self.failures.lock().pop_front() {
            return Err(err);
        }

        let mut anchors = self.anchors.write();
        let nonce = (anchors.len() as u64).to_be_bytes();
        let tx_hash = sha256_many(&[
            account.as_bytes(),
            commit.anchor_id.as_bytes(),
            &commit.document_root,
            &nonce,
        ]);
        let tx = TxHandle {
            tx_hash,
            account: account.to_string(),
        };
        anchors.push(LedgerAnchor {
            commit: commit.clone(),
            tx: tx.clone(),
        });
        Ok(tx)
    }

    async fn find_anchor(&self, anchor_id: &DocumentIdentifier) -> Result<Option<LedgerAnchor>, LedgerError> {
        self.ensure_online()?;
        Ok(self
            .anchors
            .read()
            .iter()
            .find(|a| a.commit.anchor_id == *anchor_id)
            .cloned())
    }
}
