// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::error::ModelsError;
use serde::{Deserialize, Serialize};

/// Label key carrying the node role at the registrar
pub const NODE_LABEL_KEY_TYPE: &str = "type";
/// Label value of bootstrap nodes
pub const NODE_LABEL_VALUE_BOOTSTRAP: &str = "bootstrap";
/// Label value of plugin nodes
pub const NODE_LABEL_VALUE_PLUGIN: &str = "plugin";

/// Key/value label attached to a node when it registers.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Label {
    /// label key
    pub key: String,
    /// label value, the registrar allows valueless labels
    pub value: Option<String>,
}

/// Role of a node in the DON, with the address only that role carries.
///
/// Bootstrap nodes are used for peer discovery and publish a `host:port`
/// multi-address; plugin nodes take part in OCR rounds and get paid on
/// their admin address.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeRole {
    /// peer discovery node
    Bootstrap {
        /// `host:port` used by the other nodes to reach this one
        multi_address: String,
    },
    /// OCR participant
    Plugin {
        /// payment address
        admin_address: String,
    },
}

impl NodeRole {
    /// Bootstrap role reachable on `host:p2p_port`
    pub fn bootstrap(host: impl std::fmt::Display, p2p_port: u16) -> Self {
        NodeRole::Bootstrap {
            multi_address: format!("{}:{}", host, p2p_port),
        }
    }

    /// Plugin role paid on `admin_address`
    pub fn plugin(admin_address: impl Into<String>) -> Self {
        NodeRole::Plugin {
            admin_address: admin_address.into(),
        }
    }

    /// true for bootstrap nodes
    pub fn is_bootstrap(&self) -> bool {
        matches!(self, NodeRole::Bootstrap { .. })
    }

    /// admin address, empty for bootstrap nodes
    pub fn admin_address(&self) -> &str {
        match self {
            NodeRole::Bootstrap { .. } => "",
            NodeRole::Plugin { admin_address } => admin_address,
        }
    }

    /// multi-address, empty for plugin nodes
    pub fn multi_address(&self) -> &str {
        match self {
            NodeRole::Bootstrap { multi_address } => multi_address,
            NodeRole::Plugin { .. } => "",
        }
    }

    /// label value of this role
    pub fn label_value(&self) -> &'static str {
        match self {
            NodeRole::Bootstrap { .. } => NODE_LABEL_VALUE_BOOTSTRAP,
            NodeRole::Plugin { .. } => NODE_LABEL_VALUE_PLUGIN,
        }
    }

    /// The single label a node registers with
    pub fn label(&self) -> Label {
        Label {
            key: NODE_LABEL_KEY_TYPE.to_string(),
            value: Some(self.label_value().to_string()),
        }
    }

    /// Find the role label among registrar labels.
    ///
    /// Returns `Ok(None)` when no `type` label is present and an error when
    /// several are present or the value is unknown.
    pub fn label_value_from(labels: &[Label]) -> Result<Option<&'static str>, ModelsError> {
        let mut found = None;
        for label in labels.iter().filter(|l| l.key == NODE_LABEL_KEY_TYPE) {
            if found.is_some() {
                return Err(ModelsError::InvalidRoleLabel(
                    "more than one type label".to_string(),
                ));
            }
            found = Some(match label.value.as_deref() {
                Some(NODE_LABEL_VALUE_BOOTSTRAP) => NODE_LABEL_VALUE_BOOTSTRAP,
                Some(NODE_LABEL_VALUE_PLUGIN) => NODE_LABEL_VALUE_PLUGIN,
                other => return Err(ModelsError::InvalidRoleLabel(format!("{:?}", other))),
            });
        }
        Ok(found)
    }
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label_value())
    }
}
