//! Test node plus accounts registered on its in-memory network.

use da_02_signatures::IdentityConfig;
use da_03_anchoring::MockLedgerClient;
use da_04_pending::RequestContext;
use node_runtime::{NodeConfig, NodeContainer};
use shared_types::Identity;
use std::sync::Arc;
use std::time::Duration;

pub struct TestNetwork {
    pub node: NodeContainer,
    pub ledger: Arc<MockLedgerClient>,
}

impl TestNetwork {
    pub async fn start() -> Self {
        let mut config = NodeConfig::default();
        config.identity.seed = Some([42; 32]);
        config.identity.transport_address = "node".into();
        config.submitter.retry_interval = Duration::from_millis(1);

        let ledger = Arc::new(MockLedgerClient::new(1337));
        let node = match NodeContainer::build(config, ledger.clone()).await {
            Ok(node) => node,
            Err(err) => panic!("test node failed to start: {err}"),
        };
        Self { node, ledger }
    }

    /// Register an account reachable at `address`.
    pub fn join(&self, id: u8, address: &str) -> Arc<IdentityConfig> {
        let account = Arc::new(IdentityConfig::generate(Identity([id; 20])));
        self.node
            .resolver
            .register(account.identity, address, account.public_key());
        self.node.transport.register_peer(address, account.clone());
        account
    }

    pub fn ctx(&self, account: &Arc<IdentityConfig>) -> RequestContext {
        RequestContext::new(account.clone()).with_timeout(Duration::from_secs(5))
    }
}
