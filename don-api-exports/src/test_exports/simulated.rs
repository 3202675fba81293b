// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! In-memory registrar and nodes sharing one store.
//!
//! Chain config writes go through a `SimulatedNode` and land in the store
//! read by `SimulatedRegistrar`, unless the registrar was told to silently
//! drop them, which is how the real service misbehaves.

use crate::{ApiError, ApiResult, NodeAdminApi, NodeClient, NodeOperationalApi, RegistrarService};
use async_trait::async_trait;
use don_models::chain::{ChainId, ChainType};
use don_models::chain_config::{ChainConfig, ChainConfigFilter, ChainConfigInput};
use don_models::ids::{ChainConfigId, LinkId, NodeId, ProposalId};
use don_models::job_proposal::{JobProposal, JobProposalSpec, ProposalStatus, RegistrarLinkView};
use don_models::keys::{ExportedKey, REPLAY_STARTED_ACK};
use don_models::registrar::{RegisterNodeRequest, RegisteredNode, RegistrarLinkInput};
use don_models::role::Label;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Counters of the calls the simulation served
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// successful registrations
    pub registrations: usize,
    /// chain config submissions, dropped ones included
    pub creates: usize,
    /// chain config submissions silently dropped
    pub dropped: usize,
    /// chain config deletions
    pub deletes: usize,
    /// chain config listings
    pub lists: usize,
    /// proposal approvals
    pub approvals: usize,
}

/// A node as the registrar recorded it
#[derive(Clone, Debug)]
pub struct RegisteredRecord {
    /// issued id
    pub id: NodeId,
    /// CSA key the node registered with
    pub public_key: String,
    /// labels sent on registration
    pub labels: Vec<Label>,
    /// node name
    pub name: String,
}

#[derive(Default)]
struct SimulationState {
    nodes: Vec<RegisteredRecord>,
    links: HashMap<String, (LinkId, RegistrarLinkInput)>,
    configs: Vec<ChainConfig>,
    drops: HashMap<String, usize>,
    proposals: HashMap<String, Vec<JobProposal>>,
    replays: Vec<(String, ChainId, u64)>,
    issue_empty_ids: bool,
    next_id: u64,
    stats: SimulationStats,
}

impl SimulationState {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn node_id_of(&self, public_key: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.public_key == public_key)
            .map(|n| n.id.clone())
    }
}

/// Registrar backed by the shared in-memory store.
#[derive(Clone, Default)]
pub struct SimulatedRegistrar {
    state: Arc<Mutex<SimulationState>>,
}

impl SimulatedRegistrar {
    /// empty registrar
    pub fn new() -> Self {
        Self::default()
    }

    /// CSA key the registrar hands out to nodes creating their link
    pub const CSA_PUBLIC_KEY: &'static str = "registrar-csa-key";

    /// A node whose writes land in this registrar. `name` seeds its keys.
    pub fn spawn_node(&self, name: &str) -> Arc<SimulatedNode> {
        Arc::new(SimulatedNode {
            state: self.state.clone(),
            public_key: format!("{}-csa", name),
            profile: Mutex::new(NodeProfile {
                peer_id: Some(format!("p2p_{}", name)),
                key_bundle_id: Some(format!("kb-{}", name)),
                account_address: Some(format!("0x{}", name)),
                replay_ack: REPLAY_STARTED_ACK.to_string(),
            }),
        })
    }

    /// Silently drop the next `count` chain config writes of a node
    pub fn drop_next_writes(&self, node: &SimulatedNode, count: usize) {
        self.state
            .lock()
            .drops
            .insert(node.public_key.clone(), count);
    }

    /// Registration answers with an empty node id from now on
    pub fn issue_empty_ids(&self) {
        self.state.lock().issue_empty_ids = true;
    }

    /// Call counters
    pub fn stats(&self) -> SimulationStats {
        self.state.lock().stats.clone()
    }

    /// Nodes registered so far
    pub fn registered_nodes(&self) -> Vec<RegisteredRecord> {
        self.state.lock().nodes.clone()
    }

    /// Persisted configs of a node
    pub fn configs_of(&self, node_id: &NodeId) -> Vec<ChainConfig> {
        self.state
            .lock()
            .configs
            .iter()
            .filter(|c| &c.node_id == node_id)
            .cloned()
            .collect()
    }

    /// Replays served, as (node key, chain, block)
    pub fn replays(&self) -> Vec<(String, ChainId, u64)> {
        self.state.lock().replays.clone()
    }

    /// Push a pending job proposal to a node, returns its id
    pub fn propose_job(&self, node: &SimulatedNode, definition: &str) -> ProposalId {
        let mut state = self.state.lock();
        let id = ProposalId(state.next("proposal"));
        let spec_id = state.next("spec");
        state
            .proposals
            .entry(node.public_key.clone())
            .or_default()
            .push(JobProposal {
                id: id.clone(),
                status: ProposalStatus::Pending,
                latest_spec: JobProposalSpec {
                    id: spec_id,
                    definition: definition.to_string(),
                    version: 1,
                },
            });
        id
    }

    /// Status of a proposal
    pub fn proposal_status(&self, id: &ProposalId) -> Option<ProposalStatus> {
        self.state
            .lock()
            .proposals
            .values()
            .flatten()
            .find(|p| &p.id == id)
            .map(|p| p.status)
    }
}

#[async_trait]
impl RegistrarService for SimulatedRegistrar {
    async fn register_node(&self, request: RegisterNodeRequest) -> ApiResult<RegisteredNode> {
        let mut state = self.state.lock();
        if state.node_id_of(&request.public_key).is_some() {
            return Err(ApiError::ClientError {
                method: "register_node".to_string(),
                reason: format!("public key {} already registered", request.public_key),
            });
        }
        if state.issue_empty_ids {
            return Ok(RegisteredNode::default());
        }
        let id = NodeId(state.next("node-id"));
        state.nodes.push(RegisteredRecord {
            id: id.clone(),
            public_key: request.public_key,
            labels: request.labels,
            name: request.name,
        });
        state.stats.registrations += 1;
        Ok(RegisteredNode { id })
    }

    async fn get_csa_public_key(&self) -> ApiResult<String> {
        Ok(Self::CSA_PUBLIC_KEY.to_string())
    }

    async fn list_node_chain_configs(
        &self,
        filter: ChainConfigFilter,
    ) -> ApiResult<Vec<ChainConfig>> {
        let mut state = self.state.lock();
        state.stats.lists += 1;
        Ok(state
            .configs
            .iter()
            .filter(|c| filter.node_ids.is_empty() || filter.node_ids.contains(&c.node_id))
            .cloned()
            .collect())
    }
}

/// What a node reports about itself
struct NodeProfile {
    peer_id: Option<String>,
    key_bundle_id: Option<String>,
    account_address: Option<String>,
    replay_ack: String,
}

/// Worker node whose chain config writes go to a `SimulatedRegistrar`.
///
/// The profile overrides below also apply to clients handed out earlier.
pub struct SimulatedNode {
    state: Arc<Mutex<SimulationState>>,
    public_key: String,
    profile: Mutex<NodeProfile>,
}

impl SimulatedNode {
    /// The node reports no p2p peer id
    pub fn without_peer_id(self: Arc<Self>) -> Arc<Self> {
        self.profile.lock().peer_id = None;
        self
    }

    /// The node reports no OCR2 key bundle
    pub fn without_key_bundle(self: Arc<Self>) -> Arc<Self> {
        self.profile.lock().key_bundle_id = None;
        self
    }

    /// The node reports no account address
    pub fn without_account(self: Arc<Self>) -> Arc<Self> {
        self.profile.lock().account_address = None;
        self
    }

    /// The node answers replays with `ack`
    pub fn with_replay_ack(self: Arc<Self>, ack: &str) -> Arc<Self> {
        self.profile.lock().replay_ack = ack.to_string();
        self
    }

    /// CSA key without prefix
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Both APIs of this node
    pub fn client(self: &Arc<Self>) -> NodeClient {
        NodeClient::new(self.clone(), self.clone())
    }
}

#[async_trait]
impl NodeAdminApi for SimulatedNode {
    async fn fetch_csa_public_key(&self) -> ApiResult<Option<String>> {
        Ok(Some(format!("csa_{}", self.public_key)))
    }

    async fn fetch_account_address(&self, chain_id: ChainId) -> ApiResult<Option<String>> {
        Ok(self
            .profile
            .lock()
            .account_address
            .as_ref()
            .map(|a| format!("{}-{}", a, chain_id)))
    }

    async fn fetch_p2p_peer_id(&self) -> ApiResult<Option<String>> {
        Ok(self.profile.lock().peer_id.clone())
    }

    async fn fetch_ocr2_key_bundle_id(&self, chain_type: ChainType) -> ApiResult<Option<String>> {
        Ok(self
            .profile
            .lock()
            .key_bundle_id
            .as_ref()
            .map(|k| format!("{}-{}", k, chain_type.as_str().to_lowercase())))
    }

    async fn create_registrar_link(&self, input: RegistrarLinkInput) -> ApiResult<LinkId> {
        let mut state = self.state.lock();
        let id = LinkId(state.next("link"));
        state
            .links
            .insert(self.public_key.clone(), (id.clone(), input));
        Ok(id)
    }

    async fn create_chain_config(&self, input: ChainConfigInput) -> ApiResult<ChainConfigId> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.links.get(&self.public_key) {
            Some((link_id, _)) if *link_id == input.link_id => {}
            _ => return Err(ApiError::NotFound(format!("registrar link {}", input.link_id))),
        }
        let node_id = state
            .node_id_of(&self.public_key)
            .ok_or_else(|| ApiError::NotFound(format!("node {}", self.public_key)))?;
        let id = ChainConfigId(state.next("chain-config"));
        state.stats.creates += 1;
        if let Some(remaining) = state.drops.get_mut(&self.public_key) {
            if *remaining > 0 {
                *remaining -= 1;
                state.stats.dropped += 1;
                return Ok(id);
            }
        }
        state.configs.push(ChainConfig {
            id: id.clone(),
            node_id,
            chain: input.chain,
            account_address: input.account_address,
            admin_address: input.admin_address,
            ocr2: input.ocr2,
        });
        Ok(id)
    }

    async fn delete_chain_config(&self, id: ChainConfigId) -> ApiResult<()> {
        let mut state = self.state.lock();
        state.stats.deletes += 1;
        state.configs.retain(|c| c.id != id);
        Ok(())
    }

    async fn get_registrar_link(&self, id: LinkId) -> ApiResult<RegistrarLinkView> {
        let state = self.state.lock();
        match state.links.get(&self.public_key) {
            Some((link_id, input)) if *link_id == id => Ok(RegistrarLinkView {
                id,
                name: input.name.clone(),
                job_proposals: state.proposals.get(&self.public_key).cloned(),
            }),
            _ => Err(ApiError::NotFound(format!("registrar link {}", id))),
        }
    }

    async fn approve_job_proposal_spec(
        &self,
        id: ProposalId,
        _force: bool,
    ) -> ApiResult<Option<JobProposalSpec>> {
        let mut state = self.state.lock();
        state.stats.approvals += 1;
        let proposal = state
            .proposals
            .get_mut(&self.public_key)
            .and_then(|proposals| proposals.iter_mut().find(|p| p.id == id));
        Ok(proposal.map(|p| {
            p.status = ProposalStatus::Approved;
            p.latest_spec.clone()
        }))
    }
}

#[async_trait]
impl NodeOperationalApi for SimulatedNode {
    async fn replay_from_block(&self, chain_id: ChainId, block: u64) -> ApiResult<String> {
        self.state
            .lock()
            .replays
            .push((self.public_key.clone(), chain_id, block));
        Ok(self.profile.lock().replay_ack.clone())
    }

    async fn export_keys_for_chain(&self, chain_id: ChainId) -> ApiResult<Vec<ExportedKey>> {
        Ok(self
            .profile
            .lock()
            .account_address
            .iter()
            .map(|a| ExportedKey {
                address: format!("{}-{}", a, chain_id),
                crypto: Default::default(),
            })
            .collect())
    }
}
