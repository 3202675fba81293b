// Copyright (c) 2022 MASSA LABS <info@massa.net>

use don_api_exports::{ApiResult, NodeClient};
use don_models::chain::ChainDescriptor;
use don_models::role::NodeRole;
use don_onboarding::{NodeInfo, OnboardingConfig};
use don_sdk::{rpc_node_client, HttpConfig};
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LoggingSettings {
    pub level: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistrarSettings {
    /// JSON-RPC endpoint the tool talks to
    pub rpc_url: String,
    /// endpoint given to nodes for their registrar link
    pub wsrpc_uri: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NodeSettings {
    pub name: Option<String>,
    pub admin_url: String,
    pub operational_url: String,
    pub role: NodeRole,
}

impl NodeSettings {
    pub fn node_info(&self, http_config: &HttpConfig) -> ApiResult<NodeInfo> {
        let client: NodeClient = rpc_node_client(&self.admin_url, &self.operational_url, http_config)?;
        Ok(NodeInfo {
            name: self.name.clone(),
            role: self.role.clone(),
            client,
        })
    }
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    #[serde(default)]
    pub http: HttpConfig,
    pub registrar: RegistrarSettings,
    #[serde(default)]
    pub onboarding: OnboardingConfig,
    pub chains: Vec<ChainDescriptor>,
    pub nodes: Vec<NodeSettings>,
    /// bound of the whole run, in milliseconds
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default)]
    pub deadline: Option<Duration>,
}

impl Settings {
    /// onboarding settings, with the registrar endpoint nodes must link to
    pub fn onboarding_config(&self) -> OnboardingConfig {
        OnboardingConfig {
            registrar_wsrpc_uri: self.registrar.wsrpc_uri.clone(),
            ..self.onboarding.clone()
        }
    }
}
