//! # Node Container
//!
//! Builds the subsystems in dependency order and holds them behind their
//! ports.
//!
//! ```text
//! identity resolver ─┐
//! transport ─────────┼─→ anchoring pipeline ─→ document service ─→ pending service
//! ledger connection ─┤
//! submitter ─────────┘
//! ```

use crate::container::config::{ConfigError, NodeConfig};
use da_02_signatures::{IdentityConfig, InMemoryIdentityResolver};
use da_03_anchoring::{
    AnchoringPipeline, ConnectionError, DocumentService, InMemoryDocumentStore, InMemoryTransport,
    LedgerClient, LedgerConnection, TransactionSubmitter,
};
use da_04_pending::{InMemoryPendingRepository, PendingService, RequestContext};
use shared_types::{Identity, IDENTITY_LENGTH};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Container build errors.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Ledger connection failed: {0}")]
    Connection(#[from] ConnectionError),
}

/// All subsystems of a running node.
pub struct NodeContainer {
    pub config: NodeConfig,
    pub node_identity: Arc<IdentityConfig>,
    pub resolver: Arc<InMemoryIdentityResolver>,
    pub transport: Arc<InMemoryTransport>,
    pub connection: Arc<LedgerConnection>,
    pub committed: Arc<InMemoryDocumentStore>,
    pub documents: Arc<DocumentService>,
    pub pending: Arc<PendingService>,
}

impl NodeContainer {
    /// Validate `config`, connect to the ledger through `client` and wire
    /// the subsystems. A failed connection is fatal.
    pub async fn build(config: NodeConfig, client: Arc<dyn LedgerClient>) -> Result<Self, ContainerError> {
        config.validate()?;

        let node_identity = Arc::new(node_identity(&config));
        info!(identity = %node_identity.identity, "node identity loaded");

        let resolver = Arc::new(InMemoryIdentityResolver::new());
        let transport = Arc::new(InMemoryTransport::new());
        let address = config.identity.transport_address.as_str();
        resolver.register(node_identity.identity, address, node_identity.public_key());
        transport.register_peer(address, node_identity.clone());

        let connection = Arc::new(LedgerConnection::connect(&config.ledger, client).await?);
        let submitter = Arc::new(TransactionSubmitter::new(config.submitter.clone()));
        let committed = Arc::new(InMemoryDocumentStore::new());

        let pipeline = AnchoringPipeline::new(
            config.pipeline.clone(),
            resolver.clone(),
            committed.clone(),
            transport.clone(),
            connection.clone(),
            submitter,
        );
        let documents = Arc::new(DocumentService::new(committed.clone(), pipeline));
        let pending = Arc::new(PendingService::new(
            Arc::new(InMemoryPendingRepository::new()),
            documents.clone(),
        ));

        info!(chain_id = connection.chain_id(), "subsystems initialized");
        Ok(Self {
            config,
            node_identity,
            resolver,
            transport,
            connection,
            committed,
            documents,
            pending,
        })
    }

    /// Context for a request made by the node's own account, bounded by the
    /// configured request timeout.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(self.node_identity.clone()).with_timeout(self.config.requests.timeout)
    }
}

fn node_identity(config: &NodeConfig) -> IdentityConfig {
    let settings = &config.identity;
    let placeholder = settings.identity.unwrap_or(Identity([0; IDENTITY_LENGTH]));
    let keys = match settings.seed {
        Some(seed) => IdentityConfig::from_seed(placeholder, seed),
        None => {
            warn!("DA_IDENTITY_SEED not set, signing with an ephemeral key");
            IdentityConfig::generate(placeholder)
        }
    };
    if settings.identity.is_some() {
        return keys;
    }

    let digest = shared_crypto::sha256(&keys.public_key());
    let mut derived = [0u8; IDENTITY_LENGTH];
    derived.copy_from_slice(&digest[..IDENTITY_LENGTH]);
    keys.with_identity(Identity(derived))
}
