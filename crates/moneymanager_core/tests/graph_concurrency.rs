use moneymanager_core::db::DbResult;
use moneymanager_core::{
    DbError, Driver, DriverFactory, GraphError, Location, MemoryDriverFactory, TestHarness,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts physical opens; optionally fails one specific attempt.
struct CountingFactory {
    inner: MemoryDriverFactory,
    opens: AtomicUsize,
    fail_on: Option<usize>,
}

impl CountingFactory {
    fn new(fail_on: Option<usize>) -> Self {
        Self {
            inner: MemoryDriverFactory::new(),
            opens: AtomicUsize::new(0),
            fail_on,
        }
    }

    fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl DriverFactory for CountingFactory {
    fn create_driver(&self, location: &Location) -> DbResult<Driver> {
        let attempt = self.opens.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(attempt) {
            return Err(DbError::StorageIo(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected storage failure",
            )));
        }
        self.inner.create_driver(location)
    }

    fn database_exists(&self, location: &Location) -> DbResult<bool> {
        self.inner.database_exists(location)
    }

    fn mode(&self) -> &'static str {
        "memory"
    }
}

fn harness_location() -> Location {
    Location::SandboxedNamed(format!("concurrency-{}", uuid::Uuid::new_v4()))
}

#[test]
fn concurrent_ready_requests_share_one_physical_open() {
    let factory = Arc::new(CountingFactory::new(None));
    let harness =
        TestHarness::with_driver_factory(Arc::clone(&factory) as _, harness_location()).unwrap();
    let graph = harness.graph();
    assert_eq!(factory.open_count(), 1);

    // Force the next ready() to transition from Closed.
    graph.close();

    let mut joins = Vec::new();
    for _ in 0..8 {
        let graph = Arc::clone(&graph);
        joins.push(std::thread::spawn(move || graph.ready()));
    }

    let scopes: Vec<_> = joins
        .into_iter()
        .map(|join| join.join().unwrap().unwrap())
        .collect();

    // Exactly one additional open beyond the harness's eager one.
    assert_eq!(factory.open_count(), 2);
    for scope in &scopes[1..] {
        assert!(Arc::ptr_eq(&scopes[0], scope));
    }
    assert!(Arc::ptr_eq(&scopes[0], &graph.scope().unwrap()));
}

#[test]
fn failed_transition_is_shared_until_reopen_is_requested() {
    let factory = Arc::new(CountingFactory::new(Some(2)));
    let harness =
        TestHarness::with_driver_factory(Arc::clone(&factory) as _, harness_location()).unwrap();
    let graph = harness.graph();

    graph.close();

    let err = graph.ready().unwrap_err();
    assert!(matches!(err, GraphError::Db(_)));
    assert_eq!(graph.state_name(), "failed");
    assert_eq!(factory.open_count(), 2);

    // Further ready() calls observe the same failure without a new open.
    let again = graph.ready().unwrap_err();
    assert_eq!(again.to_string(), err.to_string());
    assert_eq!(factory.open_count(), 2);

    // An explicit reopen clears the failed state with a brand-new scope.
    let scope = graph.reopen().unwrap();
    assert_eq!(factory.open_count(), 3);
    assert!(scope.database().is_open());
    assert_eq!(graph.state_name(), "ready");
}
