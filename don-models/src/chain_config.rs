// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::chain::ChainDescriptor;
use crate::ids::{ChainConfigId, LinkId, NodeId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// OCR plugins enabled on a chain.
///
/// Travels as a JSON document embedded in a string field, e.g.
/// `{"commit":true,"execute":true,"median":false,"mercury":false}`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ocr2Plugins {
    /// commit plugin
    pub commit: bool,
    /// execute plugin
    pub execute: bool,
    /// median plugin
    pub median: bool,
    /// mercury plugin
    pub mercury: bool,
}

impl Default for Ocr2Plugins {
    /// commit and execute, as used for cross-chain lanes
    fn default() -> Self {
        Ocr2Plugins {
            commit: true,
            execute: true,
            median: false,
            mercury: false,
        }
    }
}

fn plugins_as_text<S: Serializer>(plugins: &Ocr2Plugins, serializer: S) -> Result<S::Ok, S::Error> {
    let text = serde_json::to_string(plugins).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

fn plugins_from_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Ocr2Plugins, D::Error> {
    let text = String::deserialize(deserializer)?;
    serde_json::from_str(&text).map_err(serde::de::Error::custom)
}

/// OCR2 part of a chain configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ocr2Config {
    /// OCR2 enabled on this chain
    pub enabled: bool,
    /// the node acts as bootstrap for this chain
    pub is_bootstrap: bool,
    /// bootstrap multi-address, empty for plugin nodes
    pub multi_address: String,
    /// node p2p peer id
    pub p2p_peer_id: String,
    /// OCR2 key bundle used for the chain family
    pub key_bundle_id: String,
    /// plugins enabled
    #[serde(
        serialize_with = "plugins_as_text",
        deserialize_with = "plugins_from_text"
    )]
    pub plugins: Ocr2Plugins,
}

/// A chain configuration submitted to a node, which forwards it to the
/// registrar through its registrar link. Built fresh on every attempt.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChainConfigInput {
    /// registrar link the config belongs to
    pub link_id: LinkId,
    /// target chain
    pub chain: ChainDescriptor,
    /// node account on the chain
    pub account_address: String,
    /// payment address, empty for bootstrap nodes
    pub admin_address: String,
    /// OCR2 settings
    pub ocr2: Ocr2Config,
}

/// A chain configuration as the registrar exposes it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChainConfig {
    /// config identifier
    pub id: ChainConfigId,
    /// owning node
    pub node_id: NodeId,
    /// target chain
    pub chain: ChainDescriptor,
    /// node account on the chain
    pub account_address: String,
    /// payment address
    pub admin_address: String,
    /// OCR2 settings
    pub ocr2: Ocr2Config,
}

impl ChainConfig {
    /// true if this record carries what `input` asked for
    pub fn matches(&self, input: &ChainConfigInput) -> bool {
        self.chain == input.chain
            && self.account_address == input.account_address
            && self.admin_address == input.admin_address
            && self.ocr2.is_bootstrap == input.ocr2.is_bootstrap
            && self.ocr2.key_bundle_id == input.ocr2.key_bundle_id
    }
}

/// Filter of a chain configuration listing.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChainConfigFilter {
    /// keep configs of these nodes only
    pub node_ids: Vec<NodeId>,
}

impl ChainConfigFilter {
    /// configs of a single node
    pub fn node(node_id: NodeId) -> Self {
        ChainConfigFilter {
            node_ids: vec![node_id],
        }
    }
}
