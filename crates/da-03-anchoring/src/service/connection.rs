//! # Ledger Connection
//!
//! Explicit handle to the ledger node. Built once by the composition root
//! and shared by `Arc`; a failed connection stops start-up.

use crate::domain::errors::ConnectionError;
use crate::ports::outbound::LedgerClient;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Where the ledger node lives and which account submits anchors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    pub node_url: String,
    pub account: String,
    /// Bound on the connection probe
    pub timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            node_url: "http://localhost:8545".to_string(),
            account: "main".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct LedgerConnection {
    url: Url,
    account: String,
    chain_id: u64,
    client: Arc<dyn LedgerClient>,
}

impl LedgerConnection {
    /// Validate the endpoint and probe the node through `client`.
    pub async fn connect(
        config: &LedgerConfig,
        client: Arc<dyn LedgerClient>,
    ) -> Result<Self, ConnectionError> {
        let url = Url::parse(&config.node_url).map_err(|e| ConnectionError::InvalidUrl {
            url: config.node_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https" | "ws" | "wss" | "ipc") {
            return Err(ConnectionError::UnsupportedScheme(url.scheme().to_string()));
        }
        if config.account.trim().is_empty() {
            return Err(ConnectionError::MissingAccount);
        }

        let chain_id = tokio::time::timeout(config.timeout, client.chain_id())
            .await
            .map_err(|_| ConnectionError::Unreachable(format!("timed out after {:?}", config.timeout)))?
            .map_err(|e| ConnectionError::Unreachable(e.to_string()))?;

        info!(url = %url, account = %config.account, chain_id, "connected to ledger node");
        Ok(Self {
            url,
            account: config.account.clone(),
            chain_id,
            client,
        })
    }

    pub fn client(&self) -> &Arc<dyn LedgerClient> {
        &self.client
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl fmt::Debug for LedgerConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerConnection")
            .field("url", &self.url.as_str())
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}
