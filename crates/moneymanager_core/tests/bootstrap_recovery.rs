use moneymanager_core::{BootstrapParams, GraphError, ScopedGraph, UNKNOWN_VERSION};

#[test]
fn rejected_bootstrap_leaves_the_process_slot_free() {
    let err = ScopedGraph::bootstrap(BootstrapParams::desktop_at("")).unwrap_err();
    assert!(matches!(err, GraphError::Configuration(_)));

    // The corrected retry must still be able to claim the slot.
    let dir = tempfile::tempdir().unwrap();
    let graph =
        ScopedGraph::bootstrap(BootstrapParams::desktop_at(dir.path().join("ledger.db"))).unwrap();
    assert_eq!(graph.app_version(), UNKNOWN_VERSION);
    assert_eq!(graph.state_name(), "config_ready");

    // Only a successful bootstrap consumes it.
    let err = ScopedGraph::bootstrap(BootstrapParams::desktop()).unwrap_err();
    assert!(matches!(err, GraphError::AlreadyInitialized));

    graph.close();
}
