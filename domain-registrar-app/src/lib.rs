//! Application bootstrap for the domain registrar core.
//!
//! Provides `AppState` (service container exposing the four controller
//! operations), `AppStateBuilder` (adapter injection) and `AppConfig`.

pub mod adapters;
pub mod config;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use domain_registrar_core::error::{CoreError, CoreResult};
use domain_registrar_core::services::{
    AvailabilityService, BulkSyncService, DnsSyncService, RegistrationService, ServiceContext,
};
use domain_registrar_core::traits::{
    CredentialStore, DnsRecordStore, RegisteredDomainRepository, RegistrantDirectory,
    RegistrarRegistry, RegistrarStore, StoreRegistrarRegistry,
};
use domain_registrar_core::types::{
    DnsBulkSyncResult, DnsRecordSyncResult, DomainAvailabilityResult, DomainRegistrationResult,
};

pub use config::AppConfig;

/// How a caller identifies the domain for an availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainTarget {
    /// Stored `RegisteredDomain` id
    Id(String),
    /// Any domain name, stored or not
    Name(String),
}

impl std::fmt::Display for DomainTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Log a failed operation at `warn` for expected errors, `error` otherwise.
fn log_failure(operation: &str, registrar: &str, target: &dyn std::fmt::Display, err: &CoreError) {
    if err.is_expected() {
        log::warn!("{operation} [{registrar}] {target} failed: {err}");
    } else {
        log::error!("{operation} [{registrar}] {target} failed: {err}");
    }
}

/// Application state.
///
/// Holds all services and the `ServiceContext`. Constructed once at startup
/// via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all storage adapters)
    pub ctx: Arc<ServiceContext>,
    pub availability_service: AvailabilityService,
    pub registration_service: RegistrationService,
    pub dns_sync_service: DnsSyncService,
    pub bulk_sync_service: BulkSyncService,
    pub config: AppConfig,
}

impl AppState {
    /// `checkAvailability`: read-only, never touches storage beyond an id lookup.
    pub async fn check_availability(
        &self,
        registrar_code: Option<&str>,
        target: &DomainTarget,
    ) -> CoreResult<DomainAvailabilityResult> {
        let registrar = registrar_code.unwrap_or("default");
        log::info!("checkAvailability [{registrar}] {target}");
        let result = match target {
            DomainTarget::Id(id) => self.availability_service.check_by_id(registrar_code, id).await,
            DomainTarget::Name(name) => {
                self.availability_service
                    .check_by_name(registrar_code, name)
                    .await
            }
        };
        if let Err(e) = &result {
            log_failure("checkAvailability", registrar, target, e);
        }
        result
    }

    /// `register`: drive one stored domain through registration.
    pub async fn register(
        &self,
        registrar_code: &str,
        domain_id: &str,
    ) -> CoreResult<DomainRegistrationResult> {
        log::info!("register [{registrar_code}] domain {domain_id}");
        let result = self
            .registration_service
            .register_domain(registrar_code, domain_id)
            .await;
        match &result {
            Ok(r) if !r.success => log::warn!(
                "register [{registrar_code}] {} not registered: {}",
                r.domain_name,
                r.message
            ),
            Ok(_) => {}
            Err(e) => log_failure("register", registrar_code, &domain_id, e),
        }
        result
    }

    /// `syncOne`: reconcile one domain's records.
    pub async fn sync_one(
        &self,
        registrar_code: &str,
        domain_name: &str,
    ) -> CoreResult<DnsRecordSyncResult> {
        log::info!("syncOne [{registrar_code}] {domain_name}");
        let result = self
            .dns_sync_service
            .sync_by_domain_name(registrar_code, domain_name)
            .await;
        if let Err(e) = &result {
            log_failure("syncOne", registrar_code, &domain_name, e);
        }
        result
    }

    /// `syncAll`: reconcile every domain of a registrar, or of the registry's
    /// default registrar when `registrar_code` is `None`.
    pub async fn sync_all(&self, registrar_code: Option<&str>) -> CoreResult<DnsBulkSyncResult> {
        self.sync_all_until(registrar_code, None).await
    }

    /// `syncAll` that stops starting new domains once `cancel` fires.
    pub async fn sync_all_until(
        &self,
        registrar_code: Option<&str>,
        cancel: Option<CancellationToken>,
    ) -> CoreResult<DnsBulkSyncResult> {
        let code = match registrar_code {
            Some(code) => code.to_string(),
            None => match self.ctx.registrar_registry.resolve_default().await {
                Ok(resolved) => resolved.registrar.code,
                Err(e) => {
                    log_failure("syncAll", "default", &"all domains", &e);
                    return Err(e);
                }
            },
        };
        log::info!("syncAll [{code}]");
        let options = self.config.sync.bulk_options(cancel);
        let result = self.bulk_sync_service.sync_all(&code, &options).await;
        if let Err(e) = &result {
            log_failure("syncAll", &code, &"all domains", e);
        }
        result
    }

    /// Open the `SQLite` store named by `config` and build on it.
    #[cfg(feature = "sqlite-store")]
    pub async fn open(config: AppConfig) -> CoreResult<Self> {
        let store = Arc::new(
            adapters::SqliteStore::new(&config.database_path, config.encryption_password.clone())
                .await?,
        );
        AppStateBuilder::new()
            .sqlite_store(store)
            .config(config)
            .build()
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `domain_repository`, `dns_record_store`, `registrant_directory`
/// - `registrar_store` + `credential_store`, unless a `registrar_registry`
///   is supplied
///
/// # Optional
/// - `registrar_registry`: defaults to `StoreRegistrarRegistry` over the two
///   stores, using `config.default_registrar` and `config.http`
/// - `config`: defaults to `AppConfig::default()`
#[derive(Default)]
pub struct AppStateBuilder {
    domain_repository: Option<Arc<dyn RegisteredDomainRepository>>,
    dns_record_store: Option<Arc<dyn DnsRecordStore>>,
    registrar_store: Option<Arc<dyn RegistrarStore>>,
    credential_store: Option<Arc<dyn CredentialStore>>,
    registrant_directory: Option<Arc<dyn RegistrantDirectory>>,
    registrar_registry: Option<Arc<dyn RegistrarRegistry>>,
    config: Option<AppConfig>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn domain_repository(mut self, repo: Arc<dyn RegisteredDomainRepository>) -> Self {
        self.domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn dns_record_store(mut self, store: Arc<dyn DnsRecordStore>) -> Self {
        self.dns_record_store = Some(store);
        self
    }

    #[must_use]
    pub fn registrar_store(mut self, store: Arc<dyn RegistrarStore>) -> Self {
        self.registrar_store = Some(store);
        self
    }

    #[must_use]
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    #[must_use]
    pub fn registrant_directory(mut self, directory: Arc<dyn RegistrantDirectory>) -> Self {
        self.registrant_directory = Some(directory);
        self
    }

    #[must_use]
    pub fn registrar_registry(mut self, registry: Arc<dyn RegistrarRegistry>) -> Self {
        self.registrar_registry = Some(registry);
        self
    }

    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use one `SqliteStore` for all five storage roles.
    #[cfg(feature = "sqlite-store")]
    #[must_use]
    pub fn sqlite_store(self, store: Arc<adapters::SqliteStore>) -> Self {
        self.domain_repository(store.clone())
            .dns_record_store(store.clone())
            .registrar_store(store.clone())
            .credential_store(store.clone())
            .registrant_directory(store)
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let config = self.config.unwrap_or_default();
        let domain_repository = self.domain_repository.ok_or_else(|| {
            CoreError::ValidationError("domain_repository is required".to_string())
        })?;
        let dns_record_store = self.dns_record_store.ok_or_else(|| {
            CoreError::ValidationError("dns_record_store is required".to_string())
        })?;
        let registrant_directory = self.registrant_directory.ok_or_else(|| {
            CoreError::ValidationError("registrant_directory is required".to_string())
        })?;

        let registrar_registry: Arc<dyn RegistrarRegistry> = match self.registrar_registry {
            Some(registry) => registry,
            None => {
                let registrar_store = self.registrar_store.ok_or_else(|| {
                    CoreError::ValidationError(
                        "registrar_store is required without a registrar_registry".to_string(),
                    )
                })?;
                let credential_store = self.credential_store.ok_or_else(|| {
                    CoreError::ValidationError(
                        "credential_store is required without a registrar_registry".to_string(),
                    )
                })?;
                Arc::new(
                    StoreRegistrarRegistry::new(registrar_store, credential_store)
                        .with_default_code(config.default_registrar.clone())
                        .with_timeout(config.http.timeout()),
                )
            }
        };

        let ctx = Arc::new(ServiceContext::new(
            domain_repository,
            dns_record_store,
            registrant_directory,
            registrar_registry,
        ));

        Ok(AppState {
            availability_service: AvailabilityService::new(Arc::clone(&ctx)),
            registration_service: RegistrationService::new(Arc::clone(&ctx)),
            dns_sync_service: DnsSyncService::new(Arc::clone(&ctx)),
            bulk_sync_service: BulkSyncService::new(Arc::clone(&ctx)),
            ctx,
            config,
        })
    }
}
