// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::context::OnboardingContext;
use crate::error::{NodeErrors, OnboardingError, OnboardingResult};
use crate::node::{Node, NodeInfo};
use don_models::chain::{ChainDescriptor, ChainId};
use don_models::ids::NodeId;
use don_models::job_proposal::JobProposalSpec;
use futures::StreamExt;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A decentralized oracle network: an ordered set of nodes registered with
/// the same registrar.
pub struct Don {
    nodes: Vec<Node>,
    ctx: OnboardingContext,
}

impl Don {
    /// Register and link every node, in order.
    ///
    /// Stops at the first node that fails; nodes set up before it stay
    /// registered at the registrar.
    pub async fn new_registered(
        infos: Vec<NodeInfo>,
        ctx: OnboardingContext,
    ) -> OnboardingResult<Don> {
        ctx.config.validate()?;
        let mut nodes = Vec::with_capacity(infos.len());
        for (index, info) in infos.into_iter().enumerate() {
            let name = info.name_at(index);
            let setup = |source| OnboardingError::NodeSetup {
                index,
                node: name.clone(),
                source: Box::new(source),
            };
            if ctx.stop.is_cancelled() {
                return Err(setup(OnboardingError::Cancelled(name.clone())));
            }
            let mut node = Node::new(index, info).map_err(setup)?;
            node.set_up_and_link_registrar(&ctx).await.map_err(setup)?;
            nodes.push(node);
        }
        info!("DON of {} node(s) registered", nodes.len());
        Ok(Don { nodes, ctx })
    }

    /// Configure every node for every chain.
    ///
    /// A failing node does not stop the others: errors are collected in node
    /// order into `OnboardingError::Aggregate`. Up to `max_concurrent_nodes`
    /// nodes run at once, the chains of a node always run in order.
    pub async fn create_supported_chains(
        &mut self,
        chains: &[ChainDescriptor],
    ) -> OnboardingResult<()> {
        let Don { nodes, ctx } = self;
        let ctx: &OnboardingContext = ctx;
        let concurrency = ctx.config.max_concurrent_nodes.max(1);

        let mut outcomes: Vec<(usize, OnboardingResult<()>)> =
            futures::stream::iter(nodes.iter_mut().enumerate())
                .map(move |(index, node)| async move {
                    (index, node.create_supported_chains(ctx, chains).await)
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let errors: Vec<OnboardingError> = outcomes
            .into_iter()
            .filter_map(|(_, outcome)| outcome.err())
            .collect();
        if errors.is_empty() {
            info!(
                "{} node(s) configured for {} chain(s)",
                self.nodes.len(),
                chains.len()
            );
            return Ok(());
        }
        warn!(
            "chain onboarding failed on {} of {} node(s)",
            errors.len(),
            self.nodes.len()
        );
        Err(OnboardingError::Aggregate(NodeErrors(errors)))
    }

    /// Replay logs on every node from the given block of each chain, in node
    /// order. The first failure aborts the replay.
    pub async fn replay_all_logs(
        &self,
        block_by_chain: &BTreeMap<ChainId, u64>,
    ) -> OnboardingResult<()> {
        for node in &self.nodes {
            if self.ctx.stop.is_cancelled() {
                return Err(OnboardingError::Cancelled(node.name().to_string()));
            }
            node.replay_logs(block_by_chain).await?;
        }
        info!(
            "log replay started on {} node(s) for {} chain(s)",
            self.nodes.len(),
            block_by_chain.len()
        );
        Ok(())
    }

    /// Approve the pending job proposal matching `spec` on the named node
    pub async fn accept_job_proposal(
        &self,
        node_name: &str,
        spec: &str,
    ) -> OnboardingResult<JobProposalSpec> {
        self.node_by_name(node_name)
            .ok_or_else(|| OnboardingError::UnknownNode(node_name.to_string()))?
            .accept_job_proposal(spec)
            .await
    }

    /// nodes, in registration order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// node with the given name
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    /// nodes running OCR plugins
    pub fn plugin_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.role().is_bootstrap())
    }

    /// bootstrap nodes
    pub fn bootstrap_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.role().is_bootstrap())
    }

    /// registrar ids of the nodes, in node order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().filter_map(|n| n.id().cloned()).collect()
    }

    /// context the DON operates with
    pub fn context(&self) -> &OnboardingContext {
        &self.ctx
    }
}
