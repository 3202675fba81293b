// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::error::{OnboardingError, OnboardingResult};
use don_models::chain_config::Ocr2Plugins;
use don_models::config::{
    CHAIN_CONFIG_MAX_ATTEMPTS, CHAIN_CONFIG_VERIFY_BACKOFF_BASE, CHAIN_CONFIG_VERIFY_MAX_RETRIES,
    MAX_CONCURRENT_NODES,
};
use don_models::registrar::REGISTRAR_LINK_NAME;
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// How a submitted chain config is recognised in the registrar listing
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChainConfigCheck {
    /// the node owns exactly `index + 1` configs, `index` being the position
    /// of the chain in the onboarding order. Requires chains of a node to be
    /// onboarded in order and by a single writer.
    PositionalCount,
    /// the config id returned by the submission is listed and carries the
    /// submitted chain, account, admin address, bootstrap flag and key
    /// bundle. Once confirmed, other configs of the node for the same chain
    /// are deleted.
    MatchingRecord,
}

/// Onboarding configuration
#[serde_as]
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OnboardingConfig {
    /// bound of the attempt counter, which starts at 1 and must stay below it.
    /// At least 2.
    pub max_attempts: u32,
    /// visibility checks retried after the first one, per attempt
    pub verify_max_retries: u32,
    /// first delay of the Fibonacci backoff between visibility checks
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub verify_backoff_base: Duration,
    /// visibility predicate
    pub chain_config_check: ChainConfigCheck,
    /// nodes onboarded concurrently, chains of one node are always sequential
    pub max_concurrent_nodes: usize,
    /// name of the registrar link created on nodes
    pub link_name: String,
    /// registrar websocket RPC endpoint given to nodes
    pub registrar_wsrpc_uri: String,
    /// OCR plugins enabled in every chain config
    pub ocr2_plugins: Ocr2Plugins,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        OnboardingConfig {
            max_attempts: CHAIN_CONFIG_MAX_ATTEMPTS,
            verify_max_retries: CHAIN_CONFIG_VERIFY_MAX_RETRIES,
            verify_backoff_base: CHAIN_CONFIG_VERIFY_BACKOFF_BASE,
            chain_config_check: ChainConfigCheck::PositionalCount,
            max_concurrent_nodes: MAX_CONCURRENT_NODES,
            link_name: REGISTRAR_LINK_NAME.to_string(),
            registrar_wsrpc_uri: String::new(),
            ocr2_plugins: Ocr2Plugins::default(),
        }
    }
}

impl OnboardingConfig {
    /// Reject settings under which no chain config could ever be submitted
    pub fn validate(&self) -> OnboardingResult<()> {
        if self.max_attempts < 2 {
            return Err(OnboardingError::InvalidConfig(format!(
                "max_attempts is {}, at least 2 is needed for one attempt",
                self.max_attempts
            )));
        }
        Ok(())
    }
}
