use moneymanager_core::{CategoryKind, CategoryRepository, NewCategory, RepoError, TestHarness};

#[test]
fn create_and_get_roundtrip() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().categories();

    let created = repo
        .create(&NewCategory::new("Groceries", CategoryKind::Expense))
        .unwrap();
    assert!(!created.id.is_nil());
    assert!(created.updated_at >= created.created_at);

    let loaded = repo.get(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn list_filters_by_kind() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().categories();

    repo.create(&NewCategory::new("Salary", CategoryKind::Income))
        .unwrap();
    repo.create(&NewCategory::new("Rent", CategoryKind::Expense))
        .unwrap();
    repo.create(&NewCategory::new("Utilities", CategoryKind::Expense))
        .unwrap();

    let expenses = repo.list(Some(CategoryKind::Expense)).unwrap();
    assert_eq!(expenses.len(), 2);
    assert!(expenses.iter().all(|c| c.kind == CategoryKind::Expense));

    let all = repo.list(None).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn duplicate_name_and_kind_is_rejected_by_schema() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().categories();

    repo.create(&NewCategory::new("Dining", CategoryKind::Expense))
        .unwrap();
    let err = repo
        .create(&NewCategory::new("Dining", CategoryKind::Expense))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    // Same name is fine under a different kind.
    repo.create(&NewCategory::new("Dining", CategoryKind::Income))
        .unwrap();
}

#[test]
fn update_renames_category() {
    let harness = TestHarness::new().unwrap();
    let scope = harness.scope().unwrap();
    let repo = scope.repositories().categories();

    let mut category = repo
        .create(&NewCategory::new("Transprot", CategoryKind::Expense))
        .unwrap();
    category.name = "Transport".to_string();
    repo.update(&category).unwrap();

    let loaded = repo.get(category.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Transport");
}
