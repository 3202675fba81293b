// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::context::OnboardingContext;
use crate::error::{OnboardingError, OnboardingResult};
use don_api_exports::NodeClient;
use don_logging::don_trace;
use don_models::chain::ChainId;
use don_models::ids::{ChainConfigId, LinkId, NodeId};
use don_models::job_proposal::JobProposalSpec;
use don_models::keys::{ExportedKey, REPLAY_STARTED_ACK};
use don_models::registrar::{RegisterNodeRequest, RegistrarLinkInput};
use don_models::role::{Label, NodeRole};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What is needed to bring a node into the DON
#[derive(Clone)]
pub struct NodeInfo {
    /// name used in logs and at the registrar, positional if absent
    pub name: Option<String>,
    /// role of the node
    pub role: NodeRole,
    /// handles on the node APIs
    pub client: NodeClient,
}

impl NodeInfo {
    /// name of the node at position `index` in the DON
    pub fn name_at(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("node-{}", index),
        }
    }
}

/// A member of the DON.
///
/// `id` is issued by the registrar on registration and `link_id` by the
/// node when it creates its registrar link; both are written once.
pub struct Node {
    pub(crate) name: String,
    pub(crate) role: NodeRole,
    pub(crate) id: Option<NodeId>,
    pub(crate) link_id: Option<LinkId>,
    pub(crate) account_addresses: BTreeMap<ChainId, String>,
    pub(crate) configured_chains: BTreeMap<ChainId, ChainConfigId>,
    pub(crate) client: NodeClient,
}

impl Node {
    /// Node at position `index`, not yet registered
    pub fn new(index: usize, info: NodeInfo) -> OnboardingResult<Node> {
        let name = info.name_at(index);
        let invalid = |reason: &str| OnboardingError::InvalidRole {
            node: name.clone(),
            reason: reason.to_string(),
        };
        match &info.role {
            NodeRole::Bootstrap { multi_address } if multi_address.is_empty() => {
                return Err(invalid("bootstrap node without multi-address"))
            }
            NodeRole::Plugin { admin_address } if admin_address.is_empty() => {
                return Err(invalid("plugin node without admin address"))
            }
            _ => {}
        }
        Ok(Node {
            name,
            role: info.role,
            id: None,
            link_id: None,
            account_addresses: BTreeMap::new(),
            configured_chains: BTreeMap::new(),
            client: info.client,
        })
    }

    /// node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// node role
    pub fn role(&self) -> &NodeRole {
        &self.role
    }

    /// registrar-issued id, once registered
    pub fn id(&self) -> Option<&NodeId> {
        self.id.as_ref()
    }

    /// node-issued registrar link id, once linked
    pub fn link_id(&self) -> Option<&LinkId> {
        self.link_id.as_ref()
    }

    /// labels the node registers with
    pub fn labels(&self) -> Vec<Label> {
        vec![self.role.label()]
    }

    /// account address on a chain, once that chain was onboarded
    pub fn account_address(&self, chain_id: ChainId) -> Option<&str> {
        self.account_addresses.get(&chain_id).map(String::as_str)
    }

    /// account addresses of every chain onboarded so far
    pub fn account_addresses(&self) -> &BTreeMap<ChainId, String> {
        &self.account_addresses
    }

    /// chain configs verified at the registrar, by chain
    pub fn configured_chains(&self) -> &BTreeMap<ChainId, ChainConfigId> {
        &self.configured_chains
    }

    /// APIs of the node
    pub fn client(&self) -> &NodeClient {
        &self.client
    }

    /// Register the node CSA key with the registrar and keep the issued id
    pub async fn register_node_to_registrar(
        &mut self,
        ctx: &OnboardingContext,
    ) -> OnboardingResult<()> {
        don_trace!("onboarding.node.register", { "node": self.name });
        if let Some(id) = &self.id {
            return Err(OnboardingError::AlreadyRegistered(
                self.name.clone(),
                id.clone(),
            ));
        }
        let csa_key = self
            .client
            .admin
            .fetch_csa_public_key()
            .await
            .map_err(OnboardingError::node_api(&self.name, "fetching csa key"))?
            .ok_or_else(|| OnboardingError::MissingCsaKey(self.name.clone()))?;

        let request = RegisterNodeRequest::new(&csa_key, self.labels(), self.name.clone());
        let registered = ctx
            .registrar
            .register_node(request)
            .await
            .map_err(OnboardingError::registrar(&self.name, "registering node"))?;
        if registered.id.is_empty() {
            return Err(OnboardingError::MissingNodeId(self.name.clone()));
        }
        info!("node {} registered with id {}", self.name, registered.id);
        self.id = Some(registered.id);
        Ok(())
    }

    /// Create on the node the link to the registrar and keep its id
    pub async fn create_registrar_link_on_node(
        &mut self,
        ctx: &OnboardingContext,
    ) -> OnboardingResult<LinkId> {
        don_trace!("onboarding.node.link", { "node": self.name });
        if self.link_id.is_some() {
            return Err(OnboardingError::AlreadyLinked(self.name.clone()));
        }
        let public_key = ctx
            .registrar
            .get_csa_public_key()
            .await
            .map_err(OnboardingError::registrar(&self.name, "fetching registrar csa key"))?;
        let link_id = self
            .client
            .admin
            .create_registrar_link(RegistrarLinkInput {
                name: ctx.config.link_name.clone(),
                uri: ctx.config.registrar_wsrpc_uri.clone(),
                public_key,
            })
            .await
            .map_err(OnboardingError::node_api(&self.name, "creating registrar link"))?;
        if link_id.is_empty() {
            return Err(OnboardingError::MissingLinkId(self.name.clone()));
        }
        info!("node {} linked to registrar with link {}", self.name, link_id);
        self.link_id = Some(link_id.clone());
        Ok(link_id)
    }

    /// Register the node, then link it to the registrar. A link failure is
    /// not compensated: the registration stays.
    pub async fn set_up_and_link_registrar(
        &mut self,
        ctx: &OnboardingContext,
    ) -> OnboardingResult<()> {
        self.register_node_to_registrar(ctx).await?;
        self.create_registrar_link_on_node(ctx).await?;
        Ok(())
    }

    /// Approve the pending job proposal whose latest spec is exactly `spec`
    pub async fn accept_job_proposal(&self, spec: &str) -> OnboardingResult<JobProposalSpec> {
        let link_id = self
            .link_id
            .clone()
            .ok_or_else(|| OnboardingError::NotLinked(self.name.clone()))?;
        let link = self
            .client
            .admin
            .get_registrar_link(link_id)
            .await
            .map_err(OnboardingError::node_api(&self.name, "fetching registrar link"))?;
        if link.job_proposals.as_ref().map_or(true, Vec::is_empty) {
            return Err(OnboardingError::NoJobProposals(self.name.clone()));
        }
        let proposal_id = link
            .pending_proposal_for(spec)
            .map(|jp| jp.id.clone())
            .ok_or_else(|| OnboardingError::JobProposalNotFound {
                node: self.name.clone(),
                spec: spec.to_string(),
            })?;
        debug!("node {}: approving job proposal {}", self.name, proposal_id);
        let approved = self
            .client
            .admin
            .approve_job_proposal_spec(proposal_id.clone(), false)
            .await
            .map_err(OnboardingError::node_api(&self.name, "approving job proposal"))?
            .ok_or_else(|| OnboardingError::ProposalNotApproved {
                node: self.name.clone(),
                proposal: proposal_id.clone(),
            })?;
        info!(
            "node {}: job proposal {} approved (spec {})",
            self.name, proposal_id, approved.id
        );
        Ok(approved)
    }

    /// Replay logs of every chain from the given block, stopping at the
    /// first failure
    pub async fn replay_logs(&self, block_by_chain: &BTreeMap<ChainId, u64>) -> OnboardingResult<()> {
        for (chain_id, block) in block_by_chain {
            let message = self
                .client
                .operational
                .replay_from_block(*chain_id, *block)
                .await
                .map_err(OnboardingError::node_api(&self.name, "replaying logs"))?;
            if message != REPLAY_STARTED_ACK {
                return Err(OnboardingError::UnexpectedReplayAck {
                    node: self.name.clone(),
                    chain: *chain_id,
                    message,
                });
            }
            debug!(
                "node {}: log replay of chain {} started from block {}",
                self.name, chain_id, block
            );
        }
        Ok(())
    }

    /// Account keys of the node for a chain
    pub async fn export_keys_for_chain(&self, chain_id: ChainId) -> OnboardingResult<Vec<ExportedKey>> {
        self.client
            .operational
            .export_keys_for_chain(chain_id)
            .await
            .map_err(OnboardingError::node_api(&self.name, "exporting keys"))
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("id", &self.id)
            .field("link_id", &self.link_id)
            .field("configured_chains", &self.configured_chains)
            .finish()
    }
}
