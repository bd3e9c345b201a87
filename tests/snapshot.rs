//! Snapshot swap and reload tests.

mod common;

use common::{execution, identifiers, rewrite_config, write_config, FLEET_CONFIG};
use fleetroute::config::ExecutionMode;
use fleetroute::control::hashing::HashVersion;
use fleetroute::control::identifier::NamedEntityIdentifier;
use fleetroute::control::selector::{ClusterSelector, ExecutionCluster};
use fleetroute::control::snapshot::SelectorHandle;
use fleetroute::control::target::ExecutionTargetSpec;
use fleetroute::error::RouteError;
use fleetroute::runtime::{ReloadOutcome, Runtime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn id() -> NamedEntityIdentifier {
    NamedEntityIdentifier::new("project", "domain", "name")
}

// ============================================================================
// SelectorHandle tests
// ============================================================================

#[test]
fn handle_delegates_to_current_snapshot() {
    let handle =
        SelectorHandle::from_config(&execution(ExecutionMode::Local, &[("t1", 1)]), HashVersion::V1)
            .unwrap();
    assert_eq!(handle.generation(), 1);
    assert_eq!(handle.get_target(&id(), None).unwrap().id, "t1");
    assert_eq!(handle.all_valid_targets().len(), 1);
}

#[test]
fn reload_swaps_whole_snapshot() {
    let handle =
        SelectorHandle::from_config(&execution(ExecutionMode::Local, &[("t1", 1)]), HashVersion::V1)
            .unwrap();

    let generation = handle
        .reload(
            &execution(ExecutionMode::Multi, &[("a", 1), ("b", 1)]),
            HashVersion::V1,
        )
        .unwrap();

    assert_eq!(generation, 2);
    assert_eq!(handle.generation(), 2);
    assert_eq!(handle.load().mode(), ExecutionMode::Multi);
    assert_eq!(handle.all_valid_targets().len(), 2);
    let spec = ExecutionTargetSpec::for_target("b");
    assert_eq!(handle.get_target(&id(), Some(&spec)).unwrap().id, "b");
}

#[test]
fn failed_reload_keeps_previous_snapshot() {
    let handle = SelectorHandle::from_config(
        &execution(ExecutionMode::Multi, &[("a", 1), ("b", 1)]),
        HashVersion::V1,
    )
    .unwrap();
    let before = handle.get_target(&id(), None).unwrap();

    let err = handle
        .reload(
            &execution(ExecutionMode::Multi, &[("a", 1), ("a", 1)]),
            HashVersion::V1,
        )
        .unwrap_err();

    assert!(err.is_misconfiguration());
    assert_eq!(handle.generation(), 1);
    assert_eq!(handle.get_target(&id(), None).unwrap(), before);
}

#[test]
fn loaded_snapshot_survives_swap() {
    let handle =
        SelectorHandle::from_config(&execution(ExecutionMode::Local, &[("old", 1)]), HashVersion::V1)
            .unwrap();
    let snapshot = handle.load();

    handle.replace(
        ClusterSelector::from_config(&execution(ExecutionMode::Local, &[("new", 1)]), HashVersion::V1)
            .unwrap(),
    );

    assert_eq!(snapshot.get_target(&id(), None).unwrap().id, "old");
    assert_eq!(handle.get_target(&id(), None).unwrap().id, "new");
}

#[test]
fn concurrent_readers_see_complete_snapshots() {
    let old = execution(ExecutionMode::Multi, &[("a1", 1), ("a2", 1)]);
    let new = execution(ExecutionMode::Multi, &[("b1", 1), ("b2", 1), ("b3", 1)]);
    let handle = Arc::new(SelectorHandle::from_config(&old, HashVersion::V1).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = Arc::clone(&handle);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let sample = identifiers(64);
                while !stop.load(Ordering::Acquire) {
                    let snapshot = handle.load();
                    let targets = snapshot.all_valid_targets();
                    let prefix = &targets[0].id[..1];
                    assert!(targets.len() == 2 || targets.len() == 3);
                    assert!(targets.iter().all(|t| t.id.starts_with(prefix)));
                    for identifier in &sample {
                        let target = snapshot.get_target(identifier, None).unwrap();
                        assert!(target.id.starts_with(prefix));
                    }
                }
            })
        })
        .collect();

    for round in 0..200 {
        let config = if round % 2 == 0 { &new } else { &old };
        handle.reload(config, HashVersion::V1).unwrap();
    }
    stop.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(handle.generation(), 201);
}

// ============================================================================
// Runtime reload tests
// ============================================================================

#[tokio::test]
async fn runtime_reload_unchanged_file_is_noop() {
    let file = write_config(FLEET_CONFIG);
    let mut runtime = Runtime::from_file(file.path()).unwrap();

    assert_eq!(runtime.reload_once().await.unwrap(), ReloadOutcome::Unchanged);
    assert_eq!(runtime.handle().generation(), 1);
}

#[tokio::test]
async fn runtime_reload_picks_up_new_targets() {
    let file = write_config(FLEET_CONFIG);
    let mut runtime = Runtime::from_file(file.path()).unwrap();
    let handle = runtime.handle();

    rewrite_config(
        &file,
        r#"
[[execution.targets]]
id = "north"

[[execution.targets]]
id = "west"
"#,
    );

    assert_eq!(
        runtime.reload_once().await.unwrap(),
        ReloadOutcome::Swapped(2)
    );
    let ids: Vec<String> = handle
        .all_valid_targets()
        .iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(ids, vec!["north", "west"]);
    assert_eq!(runtime.config().execution.targets.len(), 2);
}

#[tokio::test]
async fn runtime_rejects_invalid_file_and_keeps_serving() {
    let file = write_config(FLEET_CONFIG);
    let mut runtime = Runtime::from_file(file.path()).unwrap();
    let handle = runtime.handle();

    rewrite_config(
        &file,
        r#"
[execution]
mode = "multi"

[[execution.targets]]
id = "a"
weight = 0
"#,
    );

    let err = runtime.reload_once().await.unwrap_err();
    assert!(err
        .chain()
        .any(|cause| cause.downcast_ref::<RouteError>() == Some(&RouteError::ZeroTotalWeight)));
    assert_eq!(handle.generation(), 1);
    assert_eq!(handle.all_valid_targets().len(), 3);

    // The same broken contents are only reported once.
    assert_eq!(runtime.reload_once().await.unwrap(), ReloadOutcome::Unchanged);
}

#[tokio::test]
async fn runtime_reload_ignores_reload_section() {
    let file = write_config(FLEET_CONFIG);
    let mut runtime = Runtime::from_file(file.path()).unwrap();

    rewrite_config(
        &file,
        r#"
[reload]
enabled = true
poll_interval_ms = 0

[[execution.targets]]
id = "north"
"#,
    );

    assert_eq!(
        runtime.reload_once().await.unwrap(),
        ReloadOutcome::Swapped(2)
    );
    assert_eq!(runtime.handle().get_target(&id(), None).unwrap().id, "north");
    assert!(!runtime.config().reload.enabled);
    assert_eq!(runtime.config().reload.poll_interval_ms, 5_000);
}

#[tokio::test]
async fn runtime_reload_swaps_task_type_whitelist() {
    let file = write_config(FLEET_CONFIG);
    let mut runtime = Runtime::from_file(file.path()).unwrap();
    assert!(runtime.config().task_type_whitelist.is_allowed("spark", &id()));

    rewrite_config(
        &file,
        &format!(
            "{}\n[task_type_whitelist]\nspark = [{{ project = \"analytics\" }}]\n",
            FLEET_CONFIG
        ),
    );

    assert_eq!(
        runtime.reload_once().await.unwrap(),
        ReloadOutcome::Swapped(2)
    );
    let whitelist = &runtime.config().task_type_whitelist;
    assert!(!whitelist.is_allowed("spark", &id()));
    assert!(whitelist.is_allowed(
        "spark",
        &NamedEntityIdentifier::new("analytics", "domain", "name")
    ));
}

#[tokio::test]
async fn runtime_shutdown_before_run_returns() {
    let file = write_config(FLEET_CONFIG);
    let mut runtime = Runtime::from_file(file.path()).unwrap();

    runtime.shutdown();
    runtime.run().await.unwrap();
}

#[tokio::test]
async fn runtime_stops_on_shutdown() {
    let file = write_config(FLEET_CONFIG);
    let mut runtime = Runtime::from_file(file.path()).unwrap();
    let shutdown = runtime.shutdown_sender();

    let task = tokio::spawn(async move { runtime.run().await });
    tokio::task::yield_now().await;
    shutdown.send(true).unwrap();

    task.await.unwrap().unwrap();
}
