//! Domain availability service

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{DomainAvailabilityResult, DomainName};

/// Answers "can this name be registered" through a registrar.
///
/// Read-only: nothing local or remote is modified.
pub struct AvailabilityService {
    ctx: Arc<ServiceContext>,
}

impl AvailabilityService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Check a name, independent of local storage.
    ///
    /// `registrar_code = None` uses the configured default registrar.
    pub async fn check_by_name(
        &self,
        registrar_code: Option<&str>,
        domain_name: &str,
    ) -> CoreResult<DomainAvailabilityResult> {
        let name = DomainName::parse(domain_name)?;
        let resolved = self
            .ctx
            .registrar_registry
            .resolve_or_default(registrar_code)
            .await?;
        log::debug!(
            "[{}] Checking availability of {name}",
            resolved.registrar.code
        );
        Ok(resolved.client.check_availability(name.as_str()).await)
    }

    /// Check a stored domain's name.
    ///
    /// Uses the domain's assigned registrar when no code is given. A code that
    /// differs from the assigned registrar is a `RegistrarMismatch`.
    pub async fn check_by_id(
        &self,
        registrar_code: Option<&str>,
        domain_id: &str,
    ) -> CoreResult<DomainAvailabilityResult> {
        let domain = self.ctx.get_domain(domain_id).await?;
        let code = match (registrar_code, domain.registrar_code.as_deref()) {
            (Some(requested), Some(assigned)) if requested != assigned => {
                return Err(CoreError::RegistrarMismatch {
                    domain: domain.name.to_string(),
                    assigned: assigned.to_string(),
                    requested: requested.to_string(),
                });
            }
            (Some(code), _) | (None, Some(code)) => Some(code),
            (None, None) => None,
        };
        self.check_by_name(code, domain.name.as_str()).await
    }
}
