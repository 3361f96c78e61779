#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end tests for `AppState` over a real `SqliteStore` with a mock
//! registrar client seeded into the registry.

use std::sync::Arc;

use domain_registrar_app::adapters::SqliteStore;
use domain_registrar_app::{AppConfig, AppState, AppStateBuilder, DomainTarget};
use domain_registrar_core::error::CoreError;
use domain_registrar_core::test_utils::{MockRegistrarClient, TEST_CUSTOMER, remote_record, sample_contact};
use domain_registrar_core::traits::{
    DnsRecordStore, RegisteredDomainRepository, StoreRegistrarRegistry,
};
use domain_registrar_core::types::{
    Availability, DnsRecordType, DomainName, DomainStatus, Registrar, RegisteredDomain,
    RegistrarType,
};

struct Fixture {
    state: AppState,
    store: Arc<SqliteStore>,
    client: Arc<MockRegistrarClient>,
    _tmp: tempfile::TempDir,
}

async fn fixture(default_registrar: Option<&str>) -> Fixture {
    fixture_with(default_registrar, default_registrar).await
}

/// `registry_default` seeds the registry; `config_default` goes into `AppConfig`.
async fn fixture_with(registry_default: Option<&str>, config_default: Option<&str>) -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(
        SqliteStore::new(&tmp.path().join("app.db"), Some("pw".to_string()))
            .await
            .unwrap(),
    );
    store
        .upsert_registrar(&Registrar::new("aws", "Route 53", RegistrarType::Route53, "cred-aws"))
        .await
        .unwrap();
    store.set_registrant(TEST_CUSTOMER, &sample_contact()).await.unwrap();

    let client = Arc::new(MockRegistrarClient::new());
    let registry = Arc::new(
        StoreRegistrarRegistry::new(store.clone(), store.clone())
            .with_default_code(registry_default.map(str::to_string)),
    );
    registry.register_client("aws", client.clone()).await;

    let config = AppConfig {
        default_registrar: config_default.map(str::to_string),
        ..AppConfig::default()
    };
    let state = AppStateBuilder::new()
        .sqlite_store(store.clone())
        .registrar_registry(registry)
        .config(config)
        .build()
        .unwrap();

    Fixture {
        state,
        store,
        client,
        _tmp: tmp,
    }
}

async fn add_domain(store: &SqliteStore, name: &str) -> RegisteredDomain {
    let domain = RegisteredDomain::pending(
        DomainName::parse(name).unwrap(),
        TEST_CUSTOMER,
        Some("aws".to_string()),
    );
    store.insert_domain(&domain).await.unwrap();
    domain
}

#[test]
fn builder_requires_storage_adapters() {
    let Err(err) = AppStateBuilder::new().build() else {
        panic!("build without adapters should fail");
    };
    assert!(matches!(err, CoreError::ValidationError(_)));
}

#[tokio::test]
async fn checks_availability_by_name_and_id() {
    let f = fixture(Some("aws")).await;
    f.client.set_availability("open.com", Availability::Available);

    let by_name = f
        .state
        .check_availability(None, &DomainTarget::Name("Open.com".to_string()))
        .await
        .unwrap();
    assert_eq!(by_name.is_available, Availability::Available);

    let stored = add_domain(&f.store, "open.com").await;
    let by_id = f
        .state
        .check_availability(Some("aws"), &DomainTarget::Id(stored.id.clone()))
        .await
        .unwrap();
    assert_eq!(by_id.is_available, Availability::Available);

    let err = f
        .state
        .check_availability(None, &DomainTarget::Name("not a domain".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));
}

#[tokio::test]
async fn registers_and_persists_outcome() {
    let f = fixture(Some("aws")).await;
    let domain = add_domain(&f.store, "brand-new.com").await;

    let result = f.state.register("aws", &domain.id).await.unwrap();
    assert!(result.success, "{}", result.message);
    assert_eq!(f.client.register_calls(), 1);

    let saved = f.store.find_by_id(&domain.id).await.unwrap().unwrap();
    assert_eq!(saved.status, DomainStatus::Registered);
    assert!(saved.expires_at.is_some());

    // A second request for a registered domain never reaches the registrar.
    let again = f.state.register("aws", &domain.id).await.unwrap();
    assert!(again.success);
    assert_eq!(f.client.register_calls(), 1);
}

#[tokio::test]
async fn sync_one_writes_records_to_sqlite() {
    let f = fixture(Some("aws")).await;
    let domain = add_domain(&f.store, "synced.com").await;
    f.client.set_records(
        "synced.com",
        vec![
            remote_record(DnsRecordType::A, "@", "192.0.2.1", 300),
            remote_record(DnsRecordType::Cname, "www", "synced.com.", 300),
        ],
    );

    let result = f.state.sync_one("aws", "synced.com").await.unwrap();
    assert!(result.success);
    assert_eq!(result.added, 2);
    assert_eq!(f.store.find_by_domain(&domain.id).await.unwrap().len(), 2);

    let rerun = f.state.sync_one("aws", "synced.com").await.unwrap();
    assert_eq!((rerun.added, rerun.unchanged), (0, 2));
}

#[tokio::test]
async fn sync_all_uses_configured_default_registrar() {
    let f = fixture(Some("aws")).await;
    add_domain(&f.store, "a.com").await;
    add_domain(&f.store, "b.com").await;
    f.client
        .set_records("a.com", vec![remote_record(DnsRecordType::A, "@", "192.0.2.10", 300)]);
    f.client
        .set_fetch_error("b.com", MockRegistrarClient::network_error());

    let bulk = f.state.sync_all(None).await.unwrap();
    assert_eq!(bulk.registrar_code, "aws");
    assert_eq!((bulk.total, bulk.succeeded, bulk.failed), (2, 1, 1));
    assert_eq!(bulk.results[0].domain_name, "a.com");
    assert!(!bulk.results[1].success);
}

#[tokio::test]
async fn sync_all_follows_a_custom_registry_default() {
    let f = fixture_with(Some("aws"), None).await;
    add_domain(&f.store, "custom.com").await;
    f.client.set_records(
        "custom.com",
        vec![remote_record(DnsRecordType::Txt, "@", "hello", 300)],
    );

    let bulk = f.state.sync_all(None).await.unwrap();
    assert_eq!(bulk.registrar_code, "aws");
    assert_eq!((bulk.total, bulk.succeeded), (1, 1));
}

#[tokio::test]
async fn sync_all_without_any_registrar_is_rejected() {
    let f = fixture(None).await;
    let err = f.state.sync_all(None).await.unwrap_err();
    assert!(matches!(err, CoreError::NoDefaultRegistrar));
    assert_eq!(f.client.total_calls(), 0);
}

#[tokio::test]
async fn opens_from_config() {
    let tmp = tempfile::tempdir().unwrap();
    let config = AppConfig {
        database_path: tmp.path().join("nested").join("registrar.db"),
        ..AppConfig::default()
    };
    let state = AppState::open(config).await.unwrap();
    let err = state.register("ghost", "missing").await.unwrap_err();
    assert!(matches!(err, CoreError::RegistrarNotFound(_)));
}
