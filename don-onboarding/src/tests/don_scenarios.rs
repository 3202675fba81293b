// Copyright (c) 2022 MASSA LABS <info@massa.net>

use super::tools::*;
use crate::{Don, NodeInfo, OnboardingError};
use don_api_exports::test_exports::SimulatedRegistrar;
use don_models::chain::ChainId;
use don_models::role::{NodeRole, NODE_LABEL_VALUE_BOOTSTRAP, NODE_LABEL_VALUE_PLUGIN};
use std::collections::{BTreeMap, HashSet};

#[tokio::test]
async fn test_fleet_registration() {
    let registrar = SimulatedRegistrar::new();
    let ctx = simulated_context(&registrar);
    let sims: Vec<_> = (0..4)
        .map(|i| registrar.spawn_node(&format!("n{}", i)))
        .collect();
    let infos = sims
        .iter()
        .enumerate()
        .map(|(i, sim)| {
            if i == 0 {
                bootstrap_info(sim, "boot")
            } else {
                plugin_info(sim, &format!("plugin-{}", i))
            }
        })
        .collect();

    let don = Don::new_registered(infos, ctx).await.unwrap();

    let ids: HashSet<_> = don.node_ids().into_iter().collect();
    assert_eq!(ids.len(), 4);
    let links: HashSet<_> = don.nodes().iter().filter_map(|n| n.link_id()).collect();
    assert_eq!(links.len(), 4);
    for record in registrar.registered_nodes() {
        assert_eq!(record.labels.len(), 1);
        let expected = if record.name == "boot" {
            NODE_LABEL_VALUE_BOOTSTRAP
        } else {
            NODE_LABEL_VALUE_PLUGIN
        };
        assert_eq!(record.labels[0].value.as_deref(), Some(expected));
    }
    assert_eq!(don.bootstrap_nodes().count(), 1);
    assert_eq!(don.plugin_nodes().count(), 3);
    assert!(don.node_by_name("plugin-2").is_some());
}

#[tokio::test]
async fn test_default_node_names() {
    let registrar = SimulatedRegistrar::new();
    let ctx = simulated_context(&registrar);
    let infos = (0..2)
        .map(|i| NodeInfo {
            name: None,
            role: NodeRole::plugin(ADMIN_ADDRESS),
            client: registrar.spawn_node(&format!("n{}", i)).client(),
        })
        .collect();

    let don = Don::new_registered(infos, ctx).await.unwrap();
    let names: Vec<_> = don.nodes().iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["node-0", "node-1"]);
}

#[tokio::test]
async fn test_fleet_construction_stops_at_first_failure() {
    let registrar = SimulatedRegistrar::new();
    let ctx = simulated_context(&registrar);
    let infos = vec![
        plugin_info(&registrar.spawn_node("a"), "a"),
        NodeInfo {
            name: Some("b".to_string()),
            role: NodeRole::plugin(""),
            client: registrar.spawn_node("b").client(),
        },
        plugin_info(&registrar.spawn_node("c"), "c"),
    ];

    let res = Don::new_registered(infos, ctx).await;
    match res {
        Err(OnboardingError::NodeSetup { index, node, source }) => {
            assert_eq!(index, 1);
            assert_eq!(node, "b");
            assert!(matches!(*source, OnboardingError::InvalidRole { .. }));
        }
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("construction should fail"),
    }
    let registered: Vec<_> = registrar
        .registered_nodes()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(registered, vec!["a"]);
}

#[tokio::test]
async fn test_bootstrap_and_plugin_end_to_end() {
    let registrar = SimulatedRegistrar::new();
    let ctx = simulated_context(&registrar);
    let boot = registrar.spawn_node("boot");
    let plugin = registrar.spawn_node("plugin");
    let infos = vec![
        bootstrap_info(&boot, "boot"),
        plugin_info(&plugin, "plugin"),
    ];
    let mut don = Don::new_registered(infos, ctx).await.unwrap();

    don.create_supported_chains(&evm_chains(1)).await.unwrap();

    for node in don.nodes() {
        assert_eq!(node.configured_chains().len(), 1);
        let configs = registrar.configs_of(node.id().unwrap());
        assert_eq!(configs.len(), 1);
        let ocr2 = &configs[0].ocr2;
        assert_eq!(ocr2.is_bootstrap, node.role().is_bootstrap());
        if ocr2.is_bootstrap {
            assert_eq!(ocr2.multi_address, "boot.don:6690");
            assert!(configs[0].admin_address.is_empty());
        } else {
            assert!(ocr2.multi_address.is_empty());
            assert_eq!(configs[0].admin_address, ADMIN_ADDRESS);
        }
    }
}

async fn don_with_failing_middle_node(max_concurrent_nodes: usize) {
    let registrar = SimulatedRegistrar::new();
    let mut ctx = simulated_context(&registrar);
    ctx.config.max_concurrent_nodes = max_concurrent_nodes;
    let infos = vec![
        plugin_info(&registrar.spawn_node("a"), "A"),
        plugin_info(&registrar.spawn_node("b").without_account(), "B"),
        plugin_info(&registrar.spawn_node("c"), "C"),
    ];
    let mut don = Don::new_registered(infos, ctx).await.unwrap();

    let res = don.create_supported_chains(&evm_chains(2)).await;

    match res {
        Err(OnboardingError::Aggregate(errors)) => {
            assert_eq!(errors.0.len(), 1);
            assert!(matches!(
                &errors.0[0],
                OnboardingError::MissingAccountAddress { node, .. } if node == "B"
            ));
            assert!(errors.to_string().contains("node B"));
        }
        other => panic!("unexpected result {:?}", other),
    }
    for name in ["A", "C"] {
        let node = don.node_by_name(name).unwrap();
        assert_eq!(node.configured_chains().len(), 2);
        assert_eq!(registrar.configs_of(node.id().unwrap()).len(), 2);
    }
    assert!(don.node_by_name("B").unwrap().configured_chains().is_empty());
}

#[tokio::test]
async fn test_failing_node_does_not_stop_others() {
    don_with_failing_middle_node(1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failing_node_does_not_stop_others_concurrently() {
    don_with_failing_middle_node(3).await;
}

#[tokio::test]
async fn test_errors_reported_in_node_order() {
    let registrar = SimulatedRegistrar::new();
    let mut ctx = simulated_context(&registrar);
    ctx.config.max_concurrent_nodes = 3;
    let infos = vec![
        plugin_info(&registrar.spawn_node("a").without_peer_id(), "A"),
        plugin_info(&registrar.spawn_node("b"), "B"),
        plugin_info(&registrar.spawn_node("c").without_key_bundle(), "C"),
    ];
    let mut don = Don::new_registered(infos, ctx).await.unwrap();

    match don.create_supported_chains(&evm_chains(1)).await {
        Err(OnboardingError::Aggregate(errors)) => {
            assert_eq!(errors.0.len(), 2);
            assert!(matches!(errors.0[0], OnboardingError::MissingPeerId(_)));
            assert!(matches!(
                errors.0[1],
                OnboardingError::MissingKeyBundleId { .. }
            ));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_replay_all_logs() {
    let registrar = SimulatedRegistrar::new();
    let ctx = simulated_context(&registrar);
    let a = registrar.spawn_node("a");
    let b = registrar.spawn_node("b");
    let infos = vec![plugin_info(&a, "A"), plugin_info(&b, "B")];
    let don = Don::new_registered(infos, ctx).await.unwrap();

    let blocks = BTreeMap::from([(ChainId(5), 500), (ChainId(1), 100)]);
    don.replay_all_logs(&blocks).await.unwrap();

    let replays = registrar.replays();
    let expected = vec![
        (a.public_key().to_string(), ChainId(1), 100),
        (a.public_key().to_string(), ChainId(5), 500),
        (b.public_key().to_string(), ChainId(1), 100),
        (b.public_key().to_string(), ChainId(5), 500),
    ];
    assert_eq!(replays, expected);
}

#[tokio::test]
async fn test_replay_all_logs_stops_at_first_failure() {
    let registrar = SimulatedRegistrar::new();
    let ctx = simulated_context(&registrar);
    let infos = vec![
        plugin_info(&registrar.spawn_node("a").with_replay_ack("busy"), "A"),
        plugin_info(&registrar.spawn_node("b"), "B"),
    ];
    let don = Don::new_registered(infos, ctx).await.unwrap();

    let blocks = BTreeMap::from([(ChainId(1), 100), (ChainId(2), 200)]);
    let res = don.replay_all_logs(&blocks).await;
    assert!(matches!(
        res,
        Err(OnboardingError::UnexpectedReplayAck { ref node, .. }) if node == "A"
    ));
    assert_eq!(registrar.replays().len(), 1);
}

#[tokio::test]
async fn test_accept_job_proposal_by_node_name() {
    let registrar = SimulatedRegistrar::new();
    let ctx = simulated_context(&registrar);
    let a = registrar.spawn_node("a");
    let don = Don::new_registered(vec![plugin_info(&a, "A")], ctx)
        .await
        .unwrap();
    registrar.propose_job(&a, "job");

    assert!(matches!(
        don.accept_job_proposal("Z", "job").await,
        Err(OnboardingError::UnknownNode(_))
    ));
    let spec = don.accept_job_proposal("A", "job").await.unwrap();
    assert_eq!(spec.definition, "job");
}

#[tokio::test]
async fn test_invalid_config_registers_nothing() {
    let registrar = SimulatedRegistrar::new();
    let mut ctx = simulated_context(&registrar);
    ctx.config.max_attempts = 0;
    let infos = vec![plugin_info(&registrar.spawn_node("a"), "A")];

    let res = Don::new_registered(infos, ctx).await;
    assert!(matches!(res, Err(OnboardingError::InvalidConfig(_))));
    assert!(registrar.registered_nodes().is_empty());
}
