// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Registers the nodes of a DON with a registrar, configures them for every
//! supported chain, then optionally replays logs and approves a job.
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

use crate::settings::Settings;
use anyhow::{Context, Result};
use clap::Parser;
use don_models::chain::ChainId;
use don_models::config::build_don_settings;
use don_models::ids::{ChainConfigId, LinkId, NodeId};
use don_onboarding::{Don, Node, OnboardingContext};
use don_sdk::RpcRegistrarClient;
use humantime::format_duration;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::filter::{filter_fn, LevelFilter};
use tracing_subscriber::prelude::*;

mod settings;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Replay logs of a chain from a block on every node, as CHAIN_ID:BLOCK
    #[arg(long = "replay", value_name = "CHAIN_ID:BLOCK", value_parser = parse_replay)]
    replays: Vec<(ChainId, u64)>,
    /// Job spec file whose pending proposal is approved on every plugin node
    #[arg(long, value_name = "FILE")]
    accept_job: Option<PathBuf>,
    /// Print the summary as JSON
    #[arg(short, long)]
    json: bool,
}

fn parse_replay(arg: &str) -> Result<(ChainId, u64), String> {
    let (chain, block) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected CHAIN_ID:BLOCK, got {}", arg))?;
    let chain = chain.parse::<ChainId>().map_err(|e| e.to_string())?;
    let block = block
        .parse::<u64>()
        .map_err(|e| format!("invalid block {}: {}", block, e))?;
    Ok((chain, block))
}

#[derive(Serialize)]
struct NodeSummary {
    name: String,
    role: &'static str,
    node_id: Option<NodeId>,
    link_id: Option<LinkId>,
    chain_configs: BTreeMap<ChainId, ChainConfigId>,
    account_addresses: BTreeMap<ChainId, String>,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        NodeSummary {
            name: node.name().to_string(),
            role: node.role().label_value(),
            node_id: node.id().cloned(),
            link_id: node.link_id().cloned(),
            chain_configs: node.configured_chains().clone(),
            account_addresses: node.account_addresses().clone(),
        }
    }
}

fn setup_logging(level: usize) {
    let level = match level {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let tracing_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(level)
        .with_filter(filter_fn(|metadata| metadata.target().starts_with("don")));
    tracing_subscriber::registry().with(tracing_layer).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings: Settings = build_don_settings("don-onboarder", "DON_ONBOARDER")?;
    setup_logging(settings.logging.level);

    let tokio_rt = tokio::runtime::Builder::new_multi_thread()
        .thread_name_fn(|| {
            static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
            let id = ATOMIC_ID.fetch_add(1, Ordering::SeqCst);
            format!("tokio-onboarder-{}", id)
        })
        .enable_all()
        .build()?;

    tokio_rt.block_on(run(args, settings))
}

async fn deadline_reached(deadline: Option<Duration>) {
    match deadline {
        Some(deadline) => tokio::time::sleep(deadline).await,
        None => std::future::pending().await,
    }
}

async fn run(args: Args, settings: Settings) -> Result<()> {
    let job_spec = match &args.accept_job {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("could not read job spec {}", path.display()))?,
        ),
        None => None,
    };
    let onboarding_config = settings.onboarding_config();
    onboarding_config.validate()?;
    let registrar = RpcRegistrarClient::new(&settings.registrar.rpc_url, &settings.http)?;
    let infos = settings
        .nodes
        .iter()
        .map(|node| node.node_info(&settings.http))
        .collect::<Result<Vec<_>, _>>()?;
    let ctx = OnboardingContext::new(Arc::new(registrar), onboarding_config);

    // Ctrl-C and the deadline stop the onboarding between two remote calls
    let stop = ctx.stop.clone();
    let deadline = settings.deadline;
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => warn!("interrupted, stopping onboarding"),
            _ = deadline_reached(deadline) => warn!(
                "deadline of {} reached, stopping onboarding",
                format_duration(deadline.unwrap_or_default())
            ),
        }
        stop.cancel();
    });

    let mut don = Don::new_registered(infos, ctx).await?;
    let onboarded = don.create_supported_chains(&settings.chains).await;
    match &onboarded {
        Ok(()) => {
            if !args.replays.is_empty() {
                let blocks: BTreeMap<ChainId, u64> = args.replays.iter().copied().collect();
                don.replay_all_logs(&blocks).await?;
            }
            if let Some(spec) = &job_spec {
                for node in don.plugin_nodes() {
                    let approved = node.accept_job_proposal(spec).await?;
                    info!("job spec {} approved on {}", approved.id, node.name());
                }
            }
        }
        Err(e) => error!("{}", e),
    }

    let summary: Vec<NodeSummary> = don.nodes().iter().map(NodeSummary::from).collect();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for node in &summary {
            println!(
                "{} ({}): node id {}, link {}",
                node.name,
                node.role,
                node.node_id.as_ref().map_or("-", |id| id.as_str()),
                node.link_id.as_ref().map_or("-", |id| id.as_str()),
            );
            for (chain, config) in &node.chain_configs {
                let account = node
                    .account_addresses
                    .get(chain)
                    .map_or("-", String::as_str);
                println!("    chain {}: config {}, account {}", chain, config, account);
            }
        }
    }

    onboarded?;
    Ok(())
}
