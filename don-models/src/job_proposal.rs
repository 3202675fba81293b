// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::ids::{LinkId, ProposalId};
use serde::{Deserialize, Serialize};

/// Status of a job proposal on a node
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProposalStatus {
    /// waiting for approval
    Pending,
    /// approved
    Approved,
    /// rejected
    Rejected,
    /// cancelled by the registrar
    Cancelled,
}

/// A version of a job proposal specification.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JobProposalSpec {
    /// spec identifier
    pub id: String,
    /// job definition text
    pub definition: String,
    /// spec version
    pub version: u32,
}

/// A job proposal received by a node from the registrar.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JobProposal {
    /// proposal identifier
    pub id: ProposalId,
    /// proposal status
    pub status: ProposalStatus,
    /// most recent specification
    pub latest_spec: JobProposalSpec,
}

/// The registrar link as seen from the node.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RegistrarLinkView {
    /// link identifier
    pub id: LinkId,
    /// link name
    pub name: String,
    /// proposals received on this link
    #[serde(default)]
    pub job_proposals: Option<Vec<JobProposal>>,
}

impl RegistrarLinkView {
    /// First pending proposal whose latest definition is exactly `definition`
    pub fn pending_proposal_for(&self, definition: &str) -> Option<&JobProposal> {
        self.job_proposals.as_ref()?.iter().find(|jp| {
            jp.status == ProposalStatus::Pending && jp.latest_spec.definition == definition
        })
    }
}
