//! # Node Configuration
//!
//! Plain structs with development defaults, overridden from `DA_*`
//! environment variables.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `DA_LEDGER_URL` | `ledger.node_url` |
//! | `DA_LEDGER_ACCOUNT` | `ledger.account` |
//! | `DA_LEDGER_TIMEOUT_SECS` | `ledger.timeout` |
//! | `DA_LEDGER_MAX_RETRIES` | `submitter.max_retries` |
//! | `DA_LEDGER_RETRY_INTERVAL_MS` | `submitter.retry_interval` |
//! | `DA_IDENTITY` | `identity.identity` (20 bytes hex) |
//! | `DA_IDENTITY_SEED` | `identity.seed` (32 bytes hex) |
//! | `DA_TRANSPORT_ADDRESS` | `identity.transport_address` |
//! | `DA_COLLECT_SIGNATURES` | `pipeline.collect_signatures` |
//! | `DA_PROPAGATE` | `pipeline.propagate` |
//! | `DA_REQUEST_TIMEOUT_SECS` | `requests.timeout` |
//!
//! ## Security Requirements
//!
//! - Without `DA_IDENTITY_SEED` the node signs with a throwaway key
//! - The seed is never logged or echoed in errors

use da_03_anchoring::{LedgerConfig, PipelineConfig, SubmitterConfig};
use shared_types::Identity;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub identity: IdentitySettings,
    pub ledger: LedgerConfig,
    pub submitter: SubmitterConfig,
    pub pipeline: PipelineConfig,
    pub requests: RequestSettings,
}

/// Node signing identity.
#[derive(Clone, Default)]
pub struct IdentitySettings {
    /// Explicit identity; derived from the public key when unset
    pub identity: Option<Identity>,
    /// Ed25519 seed; a random key is generated when unset
    pub seed: Option<[u8; 32]>,
    /// Address peers reach this node at
    pub transport_address: String,
}

impl fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySettings")
            .field("identity", &self.identity)
            .field("seed", &self.seed.map(|_| "<redacted>"))
            .field("transport_address", &self.transport_address)
            .finish()
    }
}

/// Per-request limits.
#[derive(Debug, Clone)]
pub struct RequestSettings {
    /// Deadline applied to each request
    pub timeout: Duration,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: invalid value {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Ledger URL is empty")]
    EmptyLedgerUrl,

    #[error("Ledger retry budget must allow at least one attempt")]
    ZeroRetries,

    #[error("{0} must be non-zero")]
    ZeroDuration(&'static str),
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e| invalid(key, value, e))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected a boolean")),
    }
}

fn parse_hex<const N: usize>(key: &'static str, value: &str, secret: bool) -> Result<[u8; N], ConfigError> {
    let shown = if secret { "<redacted>" } else { value };
    let bytes = hex::decode(value.trim().trim_start_matches("0x")).map_err(|e| invalid(key, shown, e))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| invalid(key, shown, format!("expected {N} bytes, got {len}")))
}

impl NodeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("DA_LEDGER_URL") {
            config.ledger.node_url = v;
        }
        if let Some(v) = lookup("DA_LEDGER_ACCOUNT") {
            config.ledger.account = v;
        }
        if let Some(v) = lookup("DA_LEDGER_TIMEOUT_SECS") {
            config.ledger.timeout = Duration::from_secs(parse("DA_LEDGER_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("DA_LEDGER_MAX_RETRIES") {
            config.submitter.max_retries = parse("DA_LEDGER_MAX_RETRIES", &v)?;
        }
        if let Some(v) = lookup("DA_LEDGER_RETRY_INTERVAL_MS") {
            config.submitter.retry_interval =
                Duration::from_millis(parse("DA_LEDGER_RETRY_INTERVAL_MS", &v)?);
        }
        if let Some(v) = lookup("DA_IDENTITY") {
            config.identity.identity = Some(Identity(parse_hex("DA_IDENTITY", &v, false)?));
        }
        if let Some(v) = lookup("DA_IDENTITY_SEED") {
            config.identity.seed = Some(parse_hex("DA_IDENTITY_SEED", &v, true)?);
        }
        if let Some(v) = lookup("DA_TRANSPORT_ADDRESS") {
            config.identity.transport_address = v;
        }
        if let Some(v) = lookup("DA_COLLECT_SIGNATURES") {
            config.pipeline.collect_signatures = parse_bool("DA_COLLECT_SIGNATURES", &v)?;
        }
        if let Some(v) = lookup("DA_PROPAGATE") {
            config.pipeline.propagate = parse_bool("DA_PROPAGATE", &v)?;
        }
        if let Some(v) = lookup("DA_REQUEST_TIMEOUT_SECS") {
            config.requests.timeout = Duration::from_secs(parse("DA_REQUEST_TIMEOUT_SECS", &v)?);
        }

        Ok(config)
    }

    /// Reject settings the node cannot run with. URL syntax is checked when
    /// connecting to the ledger.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.node_url.trim().is_empty() {
            return Err(ConfigError::EmptyLedgerUrl);
        }
        if self.submitter.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.ledger.timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("ledger timeout"));
        }
        if self.requests.timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("request timeout"));
        }
        Ok(())
    }
}
