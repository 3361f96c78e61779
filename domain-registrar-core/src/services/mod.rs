//! 业务逻辑服务层

mod availability_service;
mod bulk_sync_service;
mod dns_sync_service;
pub mod record_diff;
mod registration_service;

pub use availability_service::AvailabilityService;
pub use bulk_sync_service::{BulkSyncOptions, BulkSyncService, MAX_BULK_CONCURRENCY};
pub use dns_sync_service::DnsSyncService;
pub use registration_service::RegistrationService;

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::traits::{
    DnsRecordStore, RegisteredDomainRepository, RegistrantDirectory, RegistrarRegistry,
};
use crate::types::{DomainName, RegisteredDomain};
use crate::utils::keyed_locks::KeyedLocks;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// Registered domain persistence
    pub domain_repository: Arc<dyn RegisteredDomainRepository>,
    /// Local DNS record persistence
    pub dns_record_store: Arc<dyn DnsRecordStore>,
    /// Customer contact lookup
    pub registrant_directory: Arc<dyn RegistrantDirectory>,
    /// Registrar 注册表
    pub registrar_registry: Arc<dyn RegistrarRegistry>,
    /// Serializes registration and record writes per domain id
    pub domain_locks: KeyedLocks,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        domain_repository: Arc<dyn RegisteredDomainRepository>,
        dns_record_store: Arc<dyn DnsRecordStore>,
        registrant_directory: Arc<dyn RegistrantDirectory>,
        registrar_registry: Arc<dyn RegistrarRegistry>,
    ) -> Self {
        Self {
            domain_repository,
            dns_record_store,
            registrant_directory,
            registrar_registry,
            domain_locks: KeyedLocks::new(),
        }
    }

    /// Load a domain by id or fail with `DomainNotFound`
    pub async fn get_domain(&self, id: &str) -> CoreResult<RegisteredDomain> {
        self.domain_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))
    }

    /// Load a domain by name or fail with `DomainNotFound`
    pub async fn get_domain_by_name(&self, name: &DomainName) -> CoreResult<RegisteredDomain> {
        self.domain_repository
            .find_by_name(name)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(name.to_string()))
    }
}

/// Log a registrar error at `warn` when expected, `error` otherwise.
pub(crate) fn log_registrar_error(
    operation: &str,
    registrar_code: &str,
    domain: &str,
    err: &domain_registrar_provider::RegistrarError,
) {
    if err.is_expected() {
        log::warn!("[{registrar_code}] {operation} {domain} failed: {err}");
    } else {
        log::error!("[{registrar_code}] {operation} {domain} failed: {err}");
    }
}
