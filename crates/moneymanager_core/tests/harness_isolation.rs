use moneymanager_core::{
    AccountKind, AccountRepository, GraphError, Location, NewAccount, RepoError, TestHarness,
};

#[test]
fn two_harness_scopes_never_observe_each_others_writes() {
    let first = TestHarness::new().unwrap();
    let second = TestHarness::new().unwrap();

    first
        .scope()
        .unwrap()
        .repositories()
        .accounts()
        .create(&NewAccount::new("Only in first", AccountKind::Cash, "USD"))
        .unwrap();

    assert!(second
        .scope()
        .unwrap()
        .repositories()
        .accounts()
        .list()
        .unwrap()
        .is_empty());
    assert_eq!(
        first
            .scope()
            .unwrap()
            .repositories()
            .accounts()
            .list()
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn on_disk_harnesses_are_isolated_too() {
    let first = TestHarness::on_disk().unwrap();
    let second = TestHarness::on_disk().unwrap();

    first
        .scope()
        .unwrap()
        .repositories()
        .accounts()
        .create(&NewAccount::new("Durable", AccountKind::Bank, "CHF"))
        .unwrap();

    assert!(second
        .scope()
        .unwrap()
        .repositories()
        .accounts()
        .list()
        .unwrap()
        .is_empty());
}

#[test]
fn dropping_a_harness_tears_its_scope_down() {
    let harness = TestHarness::new().unwrap();
    let graph = harness.graph();
    let scope = harness.scope().unwrap();

    drop(harness);

    let err = scope.repositories().accounts().list().unwrap_err();
    assert!(matches!(err, RepoError::NotInitialized));
    assert!(matches!(graph.scope().unwrap_err(), GraphError::NotInitialized));
}

#[test]
fn harness_locations_never_match_the_production_default() {
    let harness = TestHarness::new().unwrap();
    match harness.graph().location() {
        Location::SandboxedNamed(name) => assert!(name.starts_with("harness-")),
        other => panic!("unexpected harness location: {}", other.describe()),
    }

    let on_disk = TestHarness::on_disk().unwrap();
    let location = on_disk.graph().location();
    let path = location.file_path().unwrap().to_path_buf();
    assert!(path.starts_with(std::env::temp_dir()));
    assert!(!path.ends_with(moneymanager_core::DEFAULT_DB_NAME));
}
