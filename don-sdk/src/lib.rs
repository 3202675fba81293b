// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! JSON-RPC clients of the node and registrar APIs

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

use async_trait::async_trait;
use don_api_exports::{
    ApiError, ApiResult, NodeAdminApi, NodeClient, NodeOperationalApi, RegistrarService,
};
use don_models::chain::{ChainId, ChainType};
use don_models::chain_config::{ChainConfig, ChainConfigFilter, ChainConfigInput};
use don_models::ids::{ChainConfigId, LinkId, ProposalId};
use don_models::job_proposal::{JobProposalSpec, RegistrarLinkView};
use don_models::keys::ExportedKey;
use don_models::registrar::{RegisterNodeRequest, RegisteredNode, RegistrarLinkInput};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// HTTP settings shared by every client
#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// timeout of a single request, in milliseconds
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub request_timeout: Duration,
    /// maximum request body size, in bytes
    pub max_request_body_size: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            request_timeout: Duration::from_secs(60),
            max_request_body_size: 10 * 1024 * 1024,
        }
    }
}

/// JSON-RPC over HTTP transport
#[derive(Clone)]
pub struct RpcClient {
    url: String,
    client: HttpClient,
}

impl RpcClient {
    /// Build a client for `url`. Nothing is sent until the first request.
    pub fn from_url(url: &str, http_config: &HttpConfig) -> ApiResult<RpcClient> {
        let client = HttpClientBuilder::default()
            .request_timeout(http_config.request_timeout)
            .max_request_size(http_config.max_request_body_size)
            .build(url)
            .map_err(|e| ApiError::BuildError(format!("{}: {}", url, e)))?;
        Ok(RpcClient {
            url: url.to_string(),
            client,
        })
    }

    /// endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: ArrayParams,
    ) -> ApiResult<R> {
        debug!("rpc call {} on {}", method, self.url);
        self.client
            .request(method, params)
            .await
            .map_err(|e| ApiError::ClientError {
                method: method.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Administrative API of a node
#[derive(Clone)]
pub struct RpcNodeAdminClient(pub RpcClient);

#[async_trait]
impl NodeAdminApi for RpcNodeAdminClient {
    async fn fetch_csa_public_key(&self) -> ApiResult<Option<String>> {
        self.0.call("fetch_csa_public_key", rpc_params![]).await
    }

    async fn fetch_account_address(&self, chain_id: ChainId) -> ApiResult<Option<String>> {
        self.0
            .call("fetch_account_address", rpc_params![chain_id.to_string()])
            .await
    }

    async fn fetch_p2p_peer_id(&self) -> ApiResult<Option<String>> {
        self.0.call("fetch_p2p_peer_id", rpc_params![]).await
    }

    async fn fetch_ocr2_key_bundle_id(&self, chain_type: ChainType) -> ApiResult<Option<String>> {
        let id: Option<String> = self
            .0
            .call("fetch_ocr2_key_bundle_id", rpc_params![chain_type])
            .await?;
        // the node answers with an empty string when it has no bundle
        Ok(id.filter(|id| !id.is_empty()))
    }

    async fn create_registrar_link(&self, input: RegistrarLinkInput) -> ApiResult<LinkId> {
        self.0.call("create_registrar_link", rpc_params![input]).await
    }

    async fn create_chain_config(&self, input: ChainConfigInput) -> ApiResult<ChainConfigId> {
        self.0.call("create_chain_config", rpc_params![input]).await
    }

    async fn delete_chain_config(&self, id: ChainConfigId) -> ApiResult<()> {
        self.0.call("delete_chain_config", rpc_params![id]).await
    }

    async fn get_registrar_link(&self, id: LinkId) -> ApiResult<RegistrarLinkView> {
        self.0.call("get_registrar_link", rpc_params![id]).await
    }

    async fn approve_job_proposal_spec(
        &self,
        id: ProposalId,
        force: bool,
    ) -> ApiResult<Option<JobProposalSpec>> {
        self.0
            .call("approve_job_proposal_spec", rpc_params![id, force])
            .await
    }
}

/// Operational API of a node
#[derive(Clone)]
pub struct RpcNodeOperationalClient(pub RpcClient);

#[async_trait]
impl NodeOperationalApi for RpcNodeOperationalClient {
    async fn replay_from_block(&self, chain_id: ChainId, block: u64) -> ApiResult<String> {
        self.0
            .call("replay_from_block", rpc_params![chain_id, block])
            .await
    }

    async fn export_keys_for_chain(&self, chain_id: ChainId) -> ApiResult<Vec<ExportedKey>> {
        self.0
            .call("export_keys_for_chain", rpc_params![chain_id.to_string()])
            .await
    }
}

/// Registrar service
#[derive(Clone)]
pub struct RpcRegistrarClient(pub RpcClient);

impl RpcRegistrarClient {
    /// registrar reachable at `url`
    pub fn new(url: &str, http_config: &HttpConfig) -> ApiResult<Self> {
        Ok(RpcRegistrarClient(RpcClient::from_url(url, http_config)?))
    }
}

#[async_trait]
impl RegistrarService for RpcRegistrarClient {
    async fn register_node(&self, request: RegisterNodeRequest) -> ApiResult<RegisteredNode> {
        self.0.call("register_node", rpc_params![request]).await
    }

    async fn get_csa_public_key(&self) -> ApiResult<String> {
        self.0.call("get_csa_public_key", rpc_params![]).await
    }

    async fn list_node_chain_configs(
        &self,
        filter: ChainConfigFilter,
    ) -> ApiResult<Vec<ChainConfig>> {
        self.0
            .call("list_node_chain_configs", rpc_params![filter])
            .await
    }
}

/// Clients of both APIs of a node
pub fn rpc_node_client(
    admin_url: &str,
    operational_url: &str,
    http_config: &HttpConfig,
) -> ApiResult<NodeClient> {
    let admin = RpcNodeAdminClient(RpcClient::from_url(admin_url, http_config)?);
    let operational = RpcNodeOperationalClient(RpcClient::from_url(operational_url, http_config)?);
    Ok(NodeClient::new(Arc::new(admin), Arc::new(operational)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_reported() {
        let res = RpcRegistrarClient::new("not a url", &HttpConfig::default());
        assert!(matches!(res, Err(ApiError::BuildError(_))));
    }

    #[tokio::test]
    async fn test_node_client_builds_without_connecting() {
        let client = rpc_node_client(
            "http://127.0.0.1:6688",
            "http://127.0.0.1:6689",
            &HttpConfig::default(),
        );
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_node_maps_to_client_error() {
        let client = RpcNodeAdminClient(
            RpcClient::from_url(
                "http://127.0.0.1:1",
                &HttpConfig {
                    request_timeout: Duration::from_millis(500),
                    ..Default::default()
                },
            )
            .unwrap(),
        );
        match client.fetch_p2p_peer_id().await {
            Err(ApiError::ClientError { method, .. }) => assert_eq!(method, "fetch_p2p_peer_id"),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
