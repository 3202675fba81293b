// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::ApiResult;
use async_trait::async_trait;
use don_models::chain_config::{ChainConfig, ChainConfigFilter};
use don_models::registrar::{RegisterNodeRequest, RegisteredNode};

/// The registrar (job distribution) service, system of record for node
/// identities and their chain configs.
///
/// Writes reach it through the nodes; it is known to acknowledge chain
/// config writes it then never applies, so callers read back through
/// `list_node_chain_configs` before trusting them.
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
#[async_trait]
pub trait RegistrarService: Send + Sync {
    /// register a node, returns the node with its issued id
    async fn register_node(&self, request: RegisterNodeRequest) -> ApiResult<RegisteredNode>;

    /// CSA public key of the registrar itself
    async fn get_csa_public_key(&self) -> ApiResult<String>;

    /// persisted chain configs matching `filter`
    async fn list_node_chain_configs(
        &self,
        filter: ChainConfigFilter,
    ) -> ApiResult<Vec<ChainConfig>>;
}
