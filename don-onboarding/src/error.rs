// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use don_api_exports::ApiError;
use don_models::chain::{ChainId, ChainType};
use don_models::ids::{NodeId, ProposalId};
use thiserror::Error;

/// Result of onboarding operations
pub type OnboardingResult<T, E = OnboardingError> = core::result::Result<T, E>;

/// onboarding error
#[non_exhaustive]
#[derive(Display, Error, Debug)]
pub enum OnboardingError {
    /// node {node}: {action} failed: {source}
    NodeApi {
        /// node name
        node: String,
        /// what the node was asked
        action: &'static str,
        /// remote error
        source: ApiError,
    },
    /// registrar: {action} for node {node} failed: {source}
    Registrar {
        /// node name
        node: String,
        /// what the registrar was asked
        action: &'static str,
        /// remote error
        source: ApiError,
    },
    /// invalid role for node {node}: {reason}
    InvalidRole {
        /// node name
        node: String,
        /// what is wrong
        reason: String,
    },
    /// no csa key found for node {0}
    MissingCsaKey(String),
    /// no node id returned from registrar for node {0}
    MissingNodeId(String),
    /// no registrar link id returned by node {0}
    MissingLinkId(String),
    /// node {0} is already registered with id {1}
    AlreadyRegistered(String, NodeId),
    /// node {0} already has a registrar link
    AlreadyLinked(String),
    /// node {0} is not registered with the registrar
    NotRegistered(String),
    /// node {0} has no registrar link
    NotLinked(String),
    /// no account address found for node {node} on chain {chain}
    MissingAccountAddress {
        /// node name
        node: String,
        /// chain
        chain: ChainId,
    },
    /// no peer id found for node {0}
    MissingPeerId(String),
    /// no OCR2 key bundle id found for node {node} for {chain_type} chains
    MissingKeyBundleId {
        /// node name
        node: String,
        /// chain family
        chain_type: ChainType,
    },
    /// chain config of node {node} for chain {chain} not applied by the registrar after {attempts} attempts
    ChainConfigNotApplied {
        /// node name
        node: String,
        /// chain
        chain: ChainId,
        /// attempts made
        attempts: u32,
    },
    /// no job proposals found for node {0}
    NoJobProposals(String),
    /// no pending job proposal on node {node} for job spec {spec}
    JobProposalNotFound {
        /// node name
        node: String,
        /// job spec text
        spec: String,
    },
    /// no job proposal spec returned by node {node} when approving proposal {proposal}
    ProposalNotApproved {
        /// node name
        node: String,
        /// proposal approved
        proposal: ProposalId,
    },
    /// unexpected response message from node {node} to log replay of chain {chain}: {message}
    UnexpectedReplayAck {
        /// node name
        node: String,
        /// chain
        chain: ChainId,
        /// acknowledgment received
        message: String,
    },
    /// unknown node {0}
    UnknownNode(String),
    /// onboarding of node {0} cancelled
    Cancelled(String),
    /// invalid onboarding configuration: {0}
    InvalidConfig(String),
    /// failed to set up node {index} ({node}): {source}
    NodeSetup {
        /// position in the node list
        index: usize,
        /// node name
        node: String,
        /// cause
        source: Box<OnboardingError>,
    },
    /// chain onboarding failed on {0}
    Aggregate(NodeErrors),
}

impl OnboardingError {
    pub(crate) fn node_api(node: &str, action: &'static str) -> impl FnOnce(ApiError) -> Self {
        let node = node.to_string();
        move |source| OnboardingError::NodeApi {
            node,
            action,
            source,
        }
    }

    pub(crate) fn registrar(node: &str, action: &'static str) -> impl FnOnce(ApiError) -> Self {
        let node = node.to_string();
        move |source| OnboardingError::Registrar {
            node,
            action,
            source,
        }
    }
}

/// Errors of several nodes, in node order
#[derive(Debug)]
pub struct NodeErrors(pub Vec<OnboardingError>);

impl std::fmt::Display for NodeErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} node(s)", self.0.len())?;
        for (i, e) in self.0.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { ": " } else { "; " }, e)?;
        }
        Ok(())
    }
}
