//! # Caller Deadlines
//!
//! A [`Deadline`] travels with every request. Blocking collaborator calls
//! (repositories, transport, ledger) are run through [`Deadline::run`] so a
//! caller can always bound how long an operation may take.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// The caller's deadline passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline exceeded")]
pub struct DeadlineExceeded;

/// Optional point in time after which a request is abandoned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// No deadline; calls run to completion.
    pub fn none() -> Self {
        Self(None)
    }

    /// Deadline at an absolute instant.
    pub fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self(Some(Instant::now() + timeout))
    }

    /// The instant, if any.
    pub fn instant(&self) -> Option<Instant> {
        self.0
    }

    /// True once the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }

    /// Fail fast if the deadline has already passed.
    pub fn check(&self) -> Result<(), DeadlineExceeded> {
        if self.is_expired() {
            return Err(DeadlineExceeded);
        }
        Ok(())
    }

    /// Run `fut`, abandoning it when the deadline passes.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        match self.0 {
            Some(at) => tokio::time::timeout_at(at, fut)
                .await
                .map_err(|_| DeadlineExceeded),
            None => Ok(fut.await),
        }
    }

    /// Sleep for `duration`, or until the deadline if that comes first.
    ///
    /// Returns `Err` when the deadline cut the sleep short.
    pub async fn sleep(&self, duration: Duration) -> Result<(), DeadlineExceeded> {
        let wake = Instant::now() + duration;
        match self.0 {
            Some(at) if at <= wake => {
                tokio::time::sleep_until(at).await;
                Err(DeadlineExceeded)
            }
            _ => {
                tokio::time::sleep_until(wake).await;
                Ok(())
            }
        }
    }
}
