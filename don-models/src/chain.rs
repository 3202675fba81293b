// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::error::ModelsError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Numeric chain identifier (e.g. 1 for Ethereum mainnet).
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ChainId)
            .map_err(|e| ModelsError::ChainIdParseError(format!("{}: {}", s, e)))
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        ChainId(value)
    }
}

/// Family of a chain, which selects the OCR key bundle a node uses for it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChainType {
    /// Ethereum virtual machine chains
    Evm,
    /// Solana
    Solana,
    /// Starknet
    Starknet,
    /// Aptos
    Aptos,
}

impl ChainType {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainType::Evm => "EVM",
            ChainType::Solana => "SOLANA",
            ChainType::Starknet => "STARKNET",
            ChainType::Aptos => "APTOS",
        }
    }
}

impl std::fmt::Display for ChainType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChainType {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EVM" => Ok(ChainType::Evm),
            "SOLANA" => Ok(ChainType::Solana),
            "STARKNET" => Ok(ChainType::Starknet),
            "APTOS" => Ok(ChainType::Aptos),
            _ => Err(ModelsError::UnknownChainType(s.to_string())),
        }
    }
}

/// A chain a node has to be configured for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ChainDescriptor {
    /// chain identifier
    pub chain_id: ChainId,
    /// chain family
    pub chain_type: ChainType,
}

impl ChainDescriptor {
    /// EVM chain with the given id
    pub fn evm(chain_id: u64) -> Self {
        ChainDescriptor {
            chain_id: ChainId(chain_id),
            chain_type: ChainType::Evm,
        }
    }
}

impl std::fmt::Display for ChainDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.chain_type, self.chain_id)
    }
}
