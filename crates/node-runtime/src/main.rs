//! # DocAnchor Node Runtime
//!
//! Entry point of the DocAnchor node.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from `DA_*` environment variables
//! 3. Connect to the ledger node (fatal on failure)
//! 4. Wire the subsystems and signal ready
//! 5. Run until Ctrl+C

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use da_03_anchoring::MockLedgerClient;
use node_runtime::{NodeConfig, NodeContainer};

/// Chain id reported by the in-process development ledger.
const DEV_CHAIN_ID: u64 = 1337;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = NodeConfig::from_env().context("failed to load configuration")?;
    info!(?config, "configuration loaded");

    warn!(
        chain_id = DEV_CHAIN_ID,
        "no ledger bindings compiled in, anchoring to the in-process development ledger"
    );
    let client = Arc::new(MockLedgerClient::new(DEV_CHAIN_ID));

    let container = NodeContainer::build(config, client)
        .await
        .context("failed to start node")?;

    info!(
        identity = %container.node_identity.identity,
        ledger = %container.connection.url(),
        account = container.connection.account(),
        "DocAnchor node ready. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown complete");
    Ok(())
}
