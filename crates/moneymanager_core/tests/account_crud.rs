use moneymanager_core::{
    AccountKind, AccountRepository, NewAccount, RepoError, TestHarness, ValidationError,
};
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip_with_generated_fields() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().accounts();

    let created = repo
        .create(&NewAccount::new("Checking", AccountKind::Bank, "USD"))
        .unwrap();

    assert!(!created.id.is_nil());
    assert!(created.created_at > 0);
    assert!(created.updated_at >= created.created_at);

    let loaded = repo.get(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn update_existing_account_bumps_updated_at() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().accounts();

    let mut account = repo
        .create(&NewAccount::new("Wallet", AccountKind::Cash, "EUR"))
        .unwrap();

    account.name = "Travel wallet".to_string();
    account.kind = AccountKind::Card;
    repo.update(&account).unwrap();

    let loaded = repo.get(account.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Travel wallet");
    assert_eq!(loaded.kind, AccountKind::Card);
    assert_eq!(loaded.created_at, account.created_at);
    assert!(loaded.updated_at >= account.updated_at);
}

#[test]
fn update_unknown_account_returns_not_found() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().accounts();

    let mut ghost = repo
        .create(&NewAccount::new("Temp", AccountKind::Cash, "USD"))
        .unwrap();
    repo.delete(ghost.id).unwrap();

    ghost.name = "Revived".to_string();
    let err = repo.update(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost.id));
}

#[test]
fn delete_unknown_account_returns_not_found() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().accounts();

    let id = Uuid::new_v4();
    let err = repo.delete(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn list_returns_accounts_sorted_by_name() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().accounts();

    repo.create(&NewAccount::new("Zeta savings", AccountKind::Bank, "USD"))
        .unwrap();
    repo.create(&NewAccount::new("Alpha cash", AccountKind::Cash, "USD"))
        .unwrap();

    let names: Vec<String> = repo.list().unwrap().into_iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["Alpha cash", "Zeta savings"]);
}

#[test]
fn invalid_draft_is_rejected_before_persistence() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().accounts();

    let err = repo
        .create(&NewAccount::new("Wallet", AccountKind::Cash, "DOLLARS"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidCurrencyCode(_))
    ));
    assert!(repo.list().unwrap().is_empty());
}
