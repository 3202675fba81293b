// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! The two remote surfaces of a worker node.

use crate::ApiResult;
use async_trait::async_trait;
use don_models::chain::{ChainId, ChainType};
use don_models::chain_config::ChainConfigInput;
use don_models::ids::{ChainConfigId, LinkId, ProposalId};
use don_models::job_proposal::{JobProposalSpec, RegistrarLinkView};
use don_models::keys::ExportedKey;
use don_models::registrar::RegistrarLinkInput;
use std::sync::Arc;

/// Administrative (control-plane) API of a node: key material, account
/// addresses, registrar link, chain configs and job proposals.
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
#[async_trait]
pub trait NodeAdminApi: Send + Sync {
    /// CSA public key of the node, `csa_` prefixed
    async fn fetch_csa_public_key(&self) -> ApiResult<Option<String>>;

    /// account address of the node on a chain
    async fn fetch_account_address(&self, chain_id: ChainId) -> ApiResult<Option<String>>;

    /// p2p peer id of the node
    async fn fetch_p2p_peer_id(&self) -> ApiResult<Option<String>>;

    /// OCR2 key bundle id for a chain family
    async fn fetch_ocr2_key_bundle_id(&self, chain_type: ChainType) -> ApiResult<Option<String>>;

    /// create the registrar link on the node, returns its id
    async fn create_registrar_link(&self, input: RegistrarLinkInput) -> ApiResult<LinkId>;

    /// submit a chain config, forwarded to the registrar by the node
    async fn create_chain_config(&self, input: ChainConfigInput) -> ApiResult<ChainConfigId>;

    /// delete a chain config
    async fn delete_chain_config(&self, id: ChainConfigId) -> ApiResult<()>;

    /// registrar link with the job proposals it received
    async fn get_registrar_link(&self, id: LinkId) -> ApiResult<RegistrarLinkView>;

    /// approve a job proposal, returns the approved spec if any
    async fn approve_job_proposal_spec(
        &self,
        id: ProposalId,
        force: bool,
    ) -> ApiResult<Option<JobProposalSpec>>;
}

/// Operational (data-plane) API of a node.
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
#[async_trait]
pub trait NodeOperationalApi: Send + Sync {
    /// restart log polling of a chain from `block`, returns the status message
    async fn replay_from_block(&self, chain_id: ChainId, block: u64) -> ApiResult<String>;

    /// export the node account keys of a chain
    async fn export_keys_for_chain(&self, chain_id: ChainId) -> ApiResult<Vec<ExportedKey>>;
}

/// Handles on both APIs of one node.
#[derive(Clone)]
pub struct NodeClient {
    /// control plane
    pub admin: Arc<dyn NodeAdminApi>,
    /// data plane
    pub operational: Arc<dyn NodeOperationalApi>,
}

impl NodeClient {
    /// bundle two API handles
    pub fn new(admin: Arc<dyn NodeAdminApi>, operational: Arc<dyn NodeOperationalApi>) -> Self {
        NodeClient { admin, operational }
    }
}
