//! 测试辅助模块
//!
//! In-memory mock stores, a counting mock registrar client and a harness
//! that wires them into a [`ServiceContext`].

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use domain_registrar_provider::{
    Availability, AvailabilityQuote, DnsRecordType, PaginatedResponse, PaginationParams,
    RegistrantContact, RegistrarCapabilities, RegistrarClient, RegistrarCredentials,
    RegistrarError, RegistrarMetadata, RegistrarType, RegistrationReceipt, RegistrationRequest,
    RemoteDnsRecord,
};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{
    CredentialStore, DnsRecordStore, RegisteredDomainRepository, RegistrantDirectory,
    RegistrarStore, StoreRegistrarRegistry,
};
use crate::types::{
    DnsChangeSet, DnsRecord, DomainName, RegisteredDomain, Registrar, RegistrationOutcome,
};

/// Customer id that [`TestHarness`] seeds with [`sample_contact`].
pub const TEST_CUSTOMER: &str = "cust-1";

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ===== MockRegistrarClient =====

#[derive(Default)]
struct MockClientState {
    availability: HashMap<String, Availability>,
    availability_errors: HashMap<String, RegistrarError>,
    records: HashMap<String, Vec<RemoteDnsRecord>>,
    fetch_errors: HashMap<String, RegistrarError>,
    register_error: Option<RegistrarError>,
    authoritative: Option<Vec<DnsRecordType>>,
    register_delay: Option<Duration>,
    fetch_delay: Option<Duration>,
    /// Records per page; `None` serves everything on page 1
    page_size: Option<usize>,
    /// Leading pages that come back empty with `has_more` set
    filtered_pages: usize,
}

/// Scriptable registrar client that counts every remote call.
///
/// Unscripted names are available, have no records and register fine.
#[derive(Default)]
pub struct MockRegistrarClient {
    state: Mutex<MockClientState>,
    availability_calls: AtomicUsize,
    register_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockRegistrarClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout() -> RegistrarError {
        RegistrarError::Timeout {
            provider: "mock".to_string(),
            detail: "operation timed out".to_string(),
        }
    }

    pub fn network_error() -> RegistrarError {
        RegistrarError::NetworkError {
            provider: "mock".to_string(),
            detail: "connection reset".to_string(),
        }
    }

    pub fn set_availability(&self, domain: &str, availability: Availability) {
        locked(&self.state)
            .availability
            .insert(domain.to_string(), availability);
    }

    pub fn set_availability_error(&self, domain: &str, err: RegistrarError) {
        locked(&self.state)
            .availability_errors
            .insert(domain.to_string(), err);
    }

    pub fn set_records(&self, domain: &str, records: Vec<RemoteDnsRecord>) {
        locked(&self.state)
            .records
            .insert(domain.to_string(), records);
    }

    pub fn set_fetch_error(&self, domain: &str, err: RegistrarError) {
        locked(&self.state)
            .fetch_errors
            .insert(domain.to_string(), err);
    }

    pub fn fail_register_with(&self, err: RegistrarError) {
        locked(&self.state).register_error = Some(err);
    }

    pub fn set_authoritative_types(&self, types: Vec<DnsRecordType>) {
        locked(&self.state).authoritative = Some(types);
    }

    pub fn set_register_delay(&self, delay: Duration) {
        locked(&self.state).register_delay = Some(delay);
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        locked(&self.state).fetch_delay = Some(delay);
    }

    /// Split record listings into pages of `size` records.
    pub fn set_page_size(&self, size: usize) {
        locked(&self.state).page_size = Some(size.max(1));
    }

    /// Serve `count` empty pages, each claiming more follow, before the records.
    pub fn set_filtered_pages(&self, count: usize) {
        locked(&self.state).filtered_pages = count;
    }

    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.availability_calls() + self.register_calls() + self.fetch_calls()
    }

    /// Highest number of record fetches observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn capabilities_for(authoritative: Option<Vec<DnsRecordType>>) -> RegistrarCapabilities {
        RegistrarCapabilities {
            availability: true,
            registration: true,
            dns_records: true,
            authoritative_record_types: authoritative.unwrap_or_else(|| DnsRecordType::ALL.to_vec()),
        }
    }
}

#[async_trait]
impl RegistrarClient for MockRegistrarClient {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn metadata() -> RegistrarMetadata {
        RegistrarMetadata {
            id: RegistrarType::Route53,
            name: "Mock".to_string(),
            description: "In-memory registrar".to_string(),
            required_fields: Vec::new(),
            capabilities: Self::capabilities_for(None),
            max_page_size_records: 0,
        }
    }

    fn capabilities(&self) -> RegistrarCapabilities {
        Self::capabilities_for(locked(&self.state).authoritative.clone())
    }

    async fn query_availability(&self, domain_name: &str) -> Result<AvailabilityQuote, RegistrarError> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        let state = locked(&self.state);
        if let Some(err) = state.availability_errors.get(domain_name) {
            return Err(err.clone());
        }
        Ok(AvailabilityQuote {
            domain_name: domain_name.to_string(),
            availability: state
                .availability
                .get(domain_name)
                .copied()
                .unwrap_or(Availability::Available),
            price: None,
            note: None,
        })
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationReceipt, RegistrarError> {
        let n = self.register_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let (delay, error) = {
            let state = locked(&self.state);
            (state.register_delay, state.register_error.clone())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match error {
            Some(err) => Err(err),
            None => Ok(RegistrationReceipt {
                reference_id: format!("mock-order-{n}-{}", request.domain_name),
                expires_at: None,
                message: None,
            }),
        }
    }

    async fn list_dns_records(
        &self,
        domain_name: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<RemoteDnsRecord>, RegistrarError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = locked(&self.state).fetch_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let outcome = {
            let state = locked(&self.state);
            match state.fetch_errors.get(domain_name) {
                Some(err) => Err(err.clone()),
                None => {
                    let all = state.records.get(domain_name).cloned().unwrap_or_default();
                    let page = usize::try_from(params.page).unwrap_or(usize::MAX);
                    Ok(Self::page_of(all, page, state.filtered_pages, state.page_size))
                }
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let (items, total, has_more) = outcome?;
        Ok(PaginatedResponse {
            items,
            page: params.page,
            page_size: params.page_size,
            total_count: Some(u32::try_from(total).unwrap_or(u32::MAX)),
            has_more,
        })
    }
}

impl MockRegistrarClient {
    /// Slice `all` into the 1-based `page`: `(items, total, has_more)`.
    fn page_of(
        all: Vec<RemoteDnsRecord>,
        page: usize,
        filtered_pages: usize,
        page_size: Option<usize>,
    ) -> (Vec<RemoteDnsRecord>, usize, bool) {
        let total = all.len();
        if page <= filtered_pages {
            return (Vec::new(), total, true);
        }
        let page = page - filtered_pages;
        match page_size {
            None => {
                let items = if page == 1 { all } else { Vec::new() };
                (items, total, false)
            }
            Some(size) => {
                let start = (page - 1).saturating_mul(size).min(total);
                let end = start.saturating_add(size).min(total);
                let items = all[start..end].to_vec();
                (items, total, end < total)
            }
        }
    }
}

// ===== MockRegistrarStore =====

#[derive(Default)]
pub struct MockRegistrarStore {
    registrars: RwLock<HashMap<String, Registrar>>,
}

impl MockRegistrarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, registrar: Registrar) {
        self.registrars
            .write()
            .await
            .insert(registrar.code.clone(), registrar);
    }

    pub async fn set_active(&self, code: &str, active: bool) {
        if let Some(r) = self.registrars.write().await.get_mut(code) {
            r.is_active = active;
        }
    }
}

#[async_trait]
impl RegistrarStore for MockRegistrarStore {
    async fn find_by_code(&self, code: &str) -> CoreResult<Option<Registrar>> {
        Ok(self.registrars.read().await.get(code).cloned())
    }
}

// ===== MockCredentialStore =====

#[derive(Default)]
pub struct MockCredentialStore {
    credentials: RwLock<HashMap<String, RegistrarCredentials>>,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, credential_ref: impl Into<String>, credentials: RegistrarCredentials) {
        self.credentials
            .write()
            .await
            .insert(credential_ref.into(), credentials);
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn get(&self, credential_ref: &str) -> CoreResult<Option<RegistrarCredentials>> {
        Ok(self.credentials.read().await.get(credential_ref).cloned())
    }
}

// ===== MockDomainRepository =====

/// Keeps insertion order, which is the enumeration order of `find_by_registrar`.
#[derive(Default)]
pub struct MockDomainRepository {
    domains: RwLock<Vec<RegisteredDomain>>,
    /// 如果 Some，save 时返回此错误
    save_error: RwLock<Option<String>>,
    save_calls: AtomicUsize,
}

impl MockDomainRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, or replace the domain with the same id
    pub async fn insert(&self, domain: RegisteredDomain) {
        let mut domains = self.domains.write().await;
        match domains.iter_mut().find(|d| d.id == domain.id) {
            Some(existing) => *existing = domain,
            None => domains.push(domain),
        }
    }

    pub async fn get(&self, id: &str) -> Option<RegisteredDomain> {
        self.domains.read().await.iter().find(|d| d.id == id).cloned()
    }

    pub async fn all(&self) -> Vec<RegisteredDomain> {
        self.domains.read().await.clone()
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegisteredDomainRepository for MockDomainRepository {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<RegisteredDomain>> {
        Ok(self.get(id).await)
    }

    async fn find_by_name(&self, name: &DomainName) -> CoreResult<Option<RegisteredDomain>> {
        Ok(self
            .domains
            .read()
            .await
            .iter()
            .find(|d| &d.name == name)
            .cloned())
    }

    async fn find_by_registrar(&self, registrar_code: &str) -> CoreResult<Vec<RegisteredDomain>> {
        Ok(self
            .domains
            .read()
            .await
            .iter()
            .filter(|d| d.is_assigned_to(registrar_code))
            .cloned()
            .collect())
    }

    async fn save_registration_outcome(
        &self,
        id: &str,
        outcome: &RegistrationOutcome,
    ) -> CoreResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.save_error.read().await.clone() {
            return Err(CoreError::StorageError(err));
        }
        let mut domains = self.domains.write().await;
        let domain = domains
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))?;
        domain.status = outcome.status;
        domain.registrar_code = Some(outcome.registrar_code.clone());
        domain.external_reference.clone_from(&outcome.external_reference);
        domain.expires_at = outcome.expires_at;
        domain.last_error.clone_from(&outcome.last_error);
        domain.updated_at = chrono::Utc::now();
        Ok(())
    }
}

// ===== MockDnsRecordStore =====

#[derive(Default)]
pub struct MockDnsRecordStore {
    records: RwLock<Vec<DnsRecord>>,
    failing_applies: RwLock<HashSet<String>>,
    failing_reads: RwLock<HashSet<String>>,
}

impl MockDnsRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: DnsRecord) {
        self.records.write().await.push(record);
    }

    pub async fn for_domain(&self, domain_id: &str) -> Vec<DnsRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.domain_id == domain_id)
            .cloned()
            .collect()
    }

    /// Make `apply_changes` fail for this domain without writing anything
    pub async fn fail_apply_for(&self, domain_id: &str) {
        self.failing_applies
            .write()
            .await
            .insert(domain_id.to_string());
    }

    /// Make `find_by_domain` fail for this domain
    pub async fn fail_reads_for(&self, domain_id: &str) {
        self.failing_reads
            .write()
            .await
            .insert(domain_id.to_string());
    }
}

#[async_trait]
impl DnsRecordStore for MockDnsRecordStore {
    async fn find_by_domain(&self, domain_id: &str) -> CoreResult<Vec<DnsRecord>> {
        if self.failing_reads.read().await.contains(domain_id) {
            return Err(CoreError::StorageError("disk I/O error".to_string()));
        }
        Ok(self.for_domain(domain_id).await)
    }

    async fn apply_changes(&self, domain_id: &str, changes: &DnsChangeSet) -> CoreResult<()> {
        if self.failing_applies.read().await.contains(domain_id) {
            return Err(CoreError::StorageError("transaction rolled back".to_string()));
        }
        let mut records = self.records.write().await;
        records.retain(|r| !(r.domain_id == domain_id && changes.to_delete.contains(&r.id)));
        for update in &changes.to_update {
            if let Some(existing) = records.iter_mut().find(|r| r.id == update.id) {
                *existing = update.clone();
            }
        }
        records.extend(changes.to_insert.iter().cloned());
        Ok(())
    }
}

// ===== MockRegistrantDirectory =====

#[derive(Default)]
pub struct MockRegistrantDirectory {
    contacts: RwLock<HashMap<String, RegistrantContact>>,
}

impl MockRegistrantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, customer_id: impl Into<String>, contact: RegistrantContact) {
        self.contacts.write().await.insert(customer_id.into(), contact);
    }
}

#[async_trait]
impl RegistrantDirectory for MockRegistrantDirectory {
    async fn find_registrant(&self, customer_id: &str) -> CoreResult<Option<RegistrantContact>> {
        Ok(self.contacts.read().await.get(customer_id).cloned())
    }
}

// ===== 便捷工厂方法 =====

pub fn sample_contact() -> RegistrantContact {
    RegistrantContact {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        organization: None,
        email: "ada@example.org".to_string(),
        phone: "+44.2079460000".to_string(),
        address_line1: "12 Analytical Row".to_string(),
        address_line2: None,
        city: "London".to_string(),
        state_province: "London".to_string(),
        postal_code: "N1 9GU".to_string(),
        country: "GB".to_string(),
    }
}

pub fn remote_record(record_type: DnsRecordType, name: &str, value: &str, ttl: u32) -> RemoteDnsRecord {
    RemoteDnsRecord {
        record_type,
        name: name.to_string(),
        value: value.to_string(),
        ttl,
        priority: None,
    }
}

pub fn local_record(
    domain_id: &str,
    record_type: DnsRecordType,
    name: &str,
    value: &str,
    ttl: u32,
) -> DnsRecord {
    DnsRecord::from_remote(domain_id, &remote_record(record_type, name, value, ttl))
}

/// Mocks wired into a [`ServiceContext`] through a real [`StoreRegistrarRegistry`].
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub domains: Arc<MockDomainRepository>,
    pub records: Arc<MockDnsRecordStore>,
    pub registrars: Arc<MockRegistrarStore>,
    pub credentials: Arc<MockCredentialStore>,
    pub registrants: Arc<MockRegistrantDirectory>,
    pub registry: Arc<StoreRegistrarRegistry>,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_default_registrar(None).await
    }

    pub async fn with_default_registrar(default_code: Option<&str>) -> Self {
        let domains = Arc::new(MockDomainRepository::new());
        let records = Arc::new(MockDnsRecordStore::new());
        let registrars = Arc::new(MockRegistrarStore::new());
        let credentials = Arc::new(MockCredentialStore::new());
        let registrants = Arc::new(MockRegistrantDirectory::new());
        registrants.insert(TEST_CUSTOMER, sample_contact()).await;

        let registry = Arc::new(
            StoreRegistrarRegistry::new(registrars.clone(), credentials.clone())
                .with_default_code(default_code.map(str::to_string)),
        );
        let ctx = Arc::new(ServiceContext::new(
            domains.clone(),
            records.clone(),
            registrants.clone(),
            registry.clone(),
        ));

        Self {
            ctx,
            domains,
            records,
            registrars,
            credentials,
            registrants,
            registry,
        }
    }

    /// Active registrar `code` served by `client`
    pub async fn add_registrar(&self, code: &str, client: Arc<MockRegistrarClient>) {
        self.registrars
            .insert(Registrar::new(
                code,
                code,
                RegistrarType::Route53,
                format!("cred-{code}"),
            ))
            .await;
        self.registry.register_client(code, client).await;
    }

    /// `Pending` domain owned by [`TEST_CUSTOMER`]
    pub async fn add_domain(&self, name: &str, registrar_code: Option<&str>) -> RegisteredDomain {
        let name = DomainName::parse(name).unwrap_or_else(|e| panic!("bad test domain: {e}"));
        let domain = RegisteredDomain::pending(name, TEST_CUSTOMER, registrar_code.map(str::to_string));
        self.domains.insert(domain.clone()).await;
        domain
    }
}
