// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Chain configuration reconciliation.
//!
//! The registrar acknowledges chain config writes it may never persist. Each
//! write is therefore followed by a bounded visibility check against the
//! registrar listing, and an unconfirmed write is deleted before the next
//! attempt so that a late materialisation cannot leave a duplicate behind.

use crate::backoff::{retry_with_backoff, RetryError};
use crate::config::ChainConfigCheck;
use crate::context::OnboardingContext;
use crate::error::{OnboardingError, OnboardingResult};
use crate::node::Node;
use don_api_exports::{ApiError, RegistrarService};
use don_logging::don_trace;
use don_models::chain::ChainDescriptor;
use don_models::chain_config::{ChainConfigFilter, ChainConfigInput, Ocr2Config, Ocr2Plugins};
use don_models::ids::{ChainConfigId, LinkId, NodeId};
use tracing::{debug, info, warn};

/// Why a visibility check failed
#[derive(Debug)]
enum Visibility {
    /// listing answered but does not show the config
    NotYet { listed: usize },
    /// listing itself failed
    ListFailed(ApiError),
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Visibility::NotYet { listed } => {
                write!(f, "chain config not listed yet ({} listed)", listed)
            }
            Visibility::ListFailed(err) => write!(f, "listing failed: {}", err),
        }
    }
}

/// One visibility check of the config `config_id` submitted for the chain at
/// `index`.
///
/// With `MatchingRecord`, the listing must show `config_id` itself carrying
/// what was submitted; other records of the node for the same chain are
/// returned so they can be removed.
async fn check_visible(
    registrar: &dyn RegistrarService,
    node_id: &NodeId,
    check: ChainConfigCheck,
    index: usize,
    config_id: &ChainConfigId,
    input: &ChainConfigInput,
) -> Result<Vec<ChainConfigId>, Visibility> {
    let configs = registrar
        .list_node_chain_configs(ChainConfigFilter::node(node_id.clone()))
        .await
        .map_err(Visibility::ListFailed)?;
    let not_yet = || Visibility::NotYet {
        listed: configs.len(),
    };
    match check {
        ChainConfigCheck::PositionalCount if configs.len() == index + 1 => Ok(Vec::new()),
        ChainConfigCheck::PositionalCount => Err(not_yet()),
        ChainConfigCheck::MatchingRecord => {
            if !configs
                .iter()
                .any(|c| c.id == *config_id && c.matches(input))
            {
                return Err(not_yet());
            }
            Ok(configs
                .iter()
                .filter(|c| c.id != *config_id && c.chain == input.chain)
                .map(|c| c.id.clone())
                .collect())
        }
    }
}

impl Node {
    /// Configure the node for every chain, in order, stopping at the first
    /// failure. Chains already configured stay recorded.
    pub async fn create_supported_chains(
        &mut self,
        ctx: &OnboardingContext,
        chains: &[ChainDescriptor],
    ) -> OnboardingResult<()> {
        for (index, chain) in chains.iter().enumerate() {
            self.reconcile_chain_config(ctx, index, chain).await?;
        }
        info!(
            "node {} configured for {} chain(s)",
            self.name,
            self.configured_chains.len()
        );
        Ok(())
    }

    /// Submit the chain config of `chain`, `index` being its position in the
    /// onboarding order, until the registrar lists it.
    ///
    /// Every attempt creates the config, then checks its visibility with a
    /// Fibonacci backoff. An attempt whose config stays invisible is
    /// compensated by deleting the config before the next attempt. Failures
    /// to create or delete are not retried.
    pub async fn reconcile_chain_config(
        &mut self,
        ctx: &OnboardingContext,
        index: usize,
        chain: &ChainDescriptor,
    ) -> OnboardingResult<ChainConfigId> {
        ctx.config.validate()?;
        let node_id = self
            .id
            .clone()
            .ok_or_else(|| OnboardingError::NotRegistered(self.name.clone()))?;
        let link_id = self
            .link_id
            .clone()
            .ok_or_else(|| OnboardingError::NotLinked(self.name.clone()))?;

        let cfg = &ctx.config;
        let input = self
            .chain_config_input(link_id, chain, cfg.ocr2_plugins)
            .await?;
        let registrar = ctx.registrar.as_ref();

        let mut attempt: u32 = 1;
        while attempt < cfg.max_attempts {
            if ctx.stop.is_cancelled() {
                return Err(OnboardingError::Cancelled(self.name.clone()));
            }
            don_trace!("onboarding.chain_config.attempt", {
                "node": self.name,
                "chain": chain.to_string(),
                "attempt": attempt
            });
            let config_id = self
                .client
                .admin
                .create_chain_config(input.clone())
                .await
                .map_err(OnboardingError::node_api(&self.name, "creating chain config"))?;
            debug!(
                "node {}: chain config {} submitted for {} (attempt {})",
                self.name, config_id, chain, attempt
            );

            let node_id = &node_id;
            let input = &input;
            let submitted = &config_id;
            let visible = retry_with_backoff(
                cfg.verify_backoff_base,
                cfg.verify_max_retries,
                &ctx.stop,
                move || {
                    check_visible(
                        registrar,
                        node_id,
                        cfg.chain_config_check,
                        index,
                        submitted,
                        input,
                    )
                },
            )
            .await;

            match visible {
                Ok(stale) => {
                    for stale_id in stale {
                        warn!(
                            "node {}: deleting stale chain config {} for {}",
                            self.name, stale_id, chain
                        );
                        self.delete_chain_config(stale_id).await?;
                    }
                    info!(
                        "node {}: chain config {} for {} applied at attempt {}",
                        self.name, config_id, chain, attempt
                    );
                    self.configured_chains.insert(chain.chain_id, config_id.clone());
                    return Ok(config_id);
                }
                Err(RetryError::Exhausted(reason)) => {
                    warn!(
                        "node {}: chain config {} for {} not applied at attempt {} ({}), deleting it",
                        self.name, config_id, chain, attempt, reason
                    );
                    self.delete_chain_config(config_id).await?;
                    attempt += 1;
                }
                Err(RetryError::Cancelled) => {
                    self.delete_chain_config(config_id).await?;
                    return Err(OnboardingError::Cancelled(self.name.clone()));
                }
            }
        }
        Err(OnboardingError::ChainConfigNotApplied {
            node: self.name.clone(),
            chain: chain.chain_id,
            attempts: attempt - 1,
        })
    }

    async fn delete_chain_config(&self, config_id: ChainConfigId) -> OnboardingResult<()> {
        self.client
            .admin
            .delete_chain_config(config_id)
            .await
            .map_err(OnboardingError::node_api(&self.name, "deleting chain config"))
    }

    /// Gather what the node reports for `chain` into a chain config input.
    /// The account address is recorded as soon as it is known.
    async fn chain_config_input(
        &mut self,
        link_id: LinkId,
        chain: &ChainDescriptor,
        plugins: Ocr2Plugins,
    ) -> OnboardingResult<ChainConfigInput> {
        let admin = self.client.admin.clone();
        let account_address = admin
            .fetch_account_address(chain.chain_id)
            .await
            .map_err(OnboardingError::node_api(&self.name, "fetching account address"))?
            .filter(|a| !a.is_empty())
            .ok_or_else(|| OnboardingError::MissingAccountAddress {
                node: self.name.clone(),
                chain: chain.chain_id,
            })?;
        self.account_addresses
            .insert(chain.chain_id, account_address.clone());

        let p2p_peer_id = admin
            .fetch_p2p_peer_id()
            .await
            .map_err(OnboardingError::node_api(&self.name, "fetching p2p peer id"))?
            .filter(|p| !p.is_empty())
            .ok_or_else(|| OnboardingError::MissingPeerId(self.name.clone()))?;
        let key_bundle_id = admin
            .fetch_ocr2_key_bundle_id(chain.chain_type)
            .await
            .map_err(OnboardingError::node_api(&self.name, "fetching OCR2 key bundle"))?
            .filter(|k| !k.is_empty())
            .ok_or_else(|| OnboardingError::MissingKeyBundleId {
                node: self.name.clone(),
                chain_type: chain.chain_type,
            })?;

        Ok(ChainConfigInput {
            link_id,
            chain: *chain,
            account_address,
            admin_address: self.role.admin_address().to_string(),
            ocr2: Ocr2Config {
                enabled: true,
                is_bootstrap: self.role.is_bootstrap(),
                multi_address: self.role.multi_address().to_string(),
                p2p_peer_id,
                key_bundle_id,
                plugins,
            },
        })
    }
}
