// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::{ChainConfigCheck, Node, NodeInfo, OnboardingConfig, OnboardingContext};
use don_api_exports::test_exports::{SimulatedNode, SimulatedRegistrar};
use don_api_exports::{
    MockNodeAdminApi, MockNodeOperationalApi, MockRegistrarService, NodeClient, RegistrarService,
};
use don_models::chain::ChainDescriptor;
use don_models::ids::{LinkId, NodeId};
use don_models::role::NodeRole;
use std::sync::Arc;
use std::time::Duration;

pub const ADMIN_ADDRESS: &str = "0xadmin";

/// Default settings with a 1ms backoff base
pub fn fast_config() -> OnboardingConfig {
    OnboardingConfig {
        verify_backoff_base: Duration::from_millis(1),
        registrar_wsrpc_uri: "ws://registrar:8080".to_string(),
        ..Default::default()
    }
}

pub fn context(registrar: Arc<dyn RegistrarService>, config: OnboardingConfig) -> OnboardingContext {
    OnboardingContext::new(registrar, config)
}

pub fn simulated_context(registrar: &SimulatedRegistrar) -> OnboardingContext {
    context(Arc::new(registrar.clone()), fast_config())
}

pub fn mock_context(registrar: MockRegistrarService) -> OnboardingContext {
    context(Arc::new(registrar), fast_config())
}

/// EVM chains `1..=count`
pub fn evm_chains(count: u64) -> Vec<ChainDescriptor> {
    (1..=count).map(ChainDescriptor::evm).collect()
}

pub fn plugin_info(node: &Arc<SimulatedNode>, name: &str) -> NodeInfo {
    NodeInfo {
        name: Some(name.to_string()),
        role: NodeRole::plugin(ADMIN_ADDRESS),
        client: node.client(),
    }
}

pub fn bootstrap_info(node: &Arc<SimulatedNode>, name: &str) -> NodeInfo {
    NodeInfo {
        name: Some(name.to_string()),
        role: NodeRole::bootstrap(format!("{}.don", name), 6690),
        client: node.client(),
    }
}

/// Plugin node registered and linked at the simulated registrar
pub async fn linked_plugin(
    registrar: &SimulatedRegistrar,
    ctx: &OnboardingContext,
    name: &str,
) -> (Arc<SimulatedNode>, Node) {
    let sim = registrar.spawn_node(name);
    let mut node = Node::new(0, plugin_info(&sim, name)).unwrap();
    node.set_up_and_link_registrar(ctx).await.unwrap();
    (sim, node)
}

/// Node over mocks, with ids as if it was registered and linked
pub fn mocked_linked_node(admin: MockNodeAdminApi) -> Node {
    let client = NodeClient::new(Arc::new(admin), Arc::new(MockNodeOperationalApi::new()));
    let mut node = Node::new(
        0,
        NodeInfo {
            name: Some("mocked".to_string()),
            role: NodeRole::plugin(ADMIN_ADDRESS),
            client,
        },
    )
    .unwrap();
    node.id = Some(NodeId::from("node-id-1"));
    node.link_id = Some(LinkId::from("link-1"));
    node
}

/// Admin API reporting an account, a peer id and a key bundle
pub fn admin_with_keys() -> MockNodeAdminApi {
    let mut admin = MockNodeAdminApi::new();
    admin
        .expect_fetch_account_address()
        .returning(|chain_id| Ok(Some(format!("0xacc-{}", chain_id))));
    admin
        .expect_fetch_p2p_peer_id()
        .returning(|| Ok(Some("p2p_mocked".to_string())));
    admin
        .expect_fetch_ocr2_key_bundle_id()
        .returning(|_| Ok(Some("kb-mocked".to_string())));
    admin
}

pub fn with_check(mut ctx: OnboardingContext, check: ChainConfigCheck) -> OnboardingContext {
    ctx.config.chain_config_check = check;
    ctx
}
