// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::ids::NodeId;
use crate::role::Label;
use serde::{Deserialize, Serialize};

/// Prefix nodes put in front of their CSA public key
pub const CSA_KEY_PREFIX: &str = "csa_";

/// Default name of the registrar link created on nodes
pub const REGISTRAR_LINK_NAME: &str = "Job Distributor";

/// Registration of a node with the registrar.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RegisterNodeRequest {
    /// node CSA public key, without prefix
    pub public_key: String,
    /// labels, including the role label
    pub labels: Vec<Label>,
    /// node name
    pub name: String,
}

impl RegisterNodeRequest {
    /// Build a request from the key reported by the node, stripping the `csa_` prefix
    pub fn new(reported_key: &str, labels: Vec<Label>, name: impl Into<String>) -> Self {
        RegisterNodeRequest {
            public_key: reported_key
                .strip_prefix(CSA_KEY_PREFIX)
                .unwrap_or(reported_key)
                .to_string(),
            labels,
            name: name.into(),
        }
    }
}

/// Node as returned by the registrar on registration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RegisteredNode {
    /// issued identifier, empty if the registrar did not issue one
    #[serde(default)]
    pub id: NodeId,
}

/// Registrar link to create on a node.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RegistrarLinkInput {
    /// link name
    pub name: String,
    /// registrar websocket RPC endpoint
    pub uri: String,
    /// registrar CSA public key
    pub public_key: String,
}
