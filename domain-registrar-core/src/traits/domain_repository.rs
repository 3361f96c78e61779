//! Registered-domain persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{DomainName, RegisteredDomain, RegistrationOutcome};

/// Registered domain warehouse Trait
///
/// Platform implementation:
/// - `SqliteStore` (`SeaORM`) in `domain-registrar-app`
#[async_trait]
pub trait RegisteredDomainRepository: Send + Sync {
    /// Get domain based on ID
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<RegisteredDomain>>;

    /// Get domain based on its normalized name
    async fn find_by_name(&self, name: &DomainName) -> CoreResult<Option<RegisteredDomain>>;

    /// All domains assigned to a registrar, in a stable order
    async fn find_by_registrar(&self, registrar_code: &str) -> CoreResult<Vec<RegisteredDomain>>;

    /// Persist status / reference / expiry after a registration attempt
    ///
    /// # Arguments
    /// * `id` - Domain ID
    /// * `outcome` - fields written by the orchestrator
    async fn save_registration_outcome(
        &self,
        id: &str,
        outcome: &RegistrationOutcome,
    ) -> CoreResult<()>;
}
