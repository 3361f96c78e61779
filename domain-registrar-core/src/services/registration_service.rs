//! Domain registration orchestration

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use domain_registrar_provider::{RegistrationReceipt, RegistrationRequest};

use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, log_registrar_error};
use crate::types::{
    DomainRegistrationResult, DomainStatus, RegisteredDomain, RegistrationOutcome,
};

/// Drives one domain through registration at a registrar.
///
/// Business failures come back as `success = false`; only configuration,
/// lookup and storage faults are returned as errors.
pub struct RegistrationService {
    ctx: Arc<ServiceContext>,
}

fn expiry_after(years: u32, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    from.checked_add_months(Months::new(years.saturating_mul(12)))
}

impl RegistrationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Register `domain_id` through `registrar_code`.
    ///
    /// Attempts for the same domain are serialized; a caller that waited on
    /// the lock re-reads the domain and sees the first caller's outcome.
    /// Registering an already `Registered` domain is a successful no-op.
    pub async fn register_domain(
        &self,
        registrar_code: &str,
        domain_id: &str,
    ) -> CoreResult<DomainRegistrationResult> {
        let resolved = self.ctx.registrar_registry.resolve(registrar_code).await?;
        let domain = self.ctx.get_domain(domain_id).await?;
        Self::ensure_assignable(&domain, registrar_code)?;

        let _guard = self.ctx.domain_locks.lock(domain_id).await;
        let domain = self.ctx.get_domain(domain_id).await?;
        Self::ensure_assignable(&domain, registrar_code)?;

        if domain.status == DomainStatus::Registered {
            log::info!("[{registrar_code}] {} is already registered, skipping", domain.name);
            return Ok(DomainRegistrationResult {
                success: true,
                domain_name: domain.name.to_string(),
                reference_id: domain.external_reference.clone(),
                message: "already registered".to_string(),
                outcome_uncertain: false,
                domain: Some(domain),
            });
        }

        let Some(registrant) = self
            .ctx
            .registrant_directory
            .find_registrant(&domain.customer_id)
            .await?
        else {
            log::warn!(
                "[{registrar_code}] No registrant contact for customer {} ({})",
                domain.customer_id,
                domain.name
            );
            return Ok(DomainRegistrationResult::failure(
                domain.name.as_str(),
                format!("no registrant contact for customer {}", domain.customer_id),
            ));
        };

        let request = RegistrationRequest {
            domain_name: domain.name.to_string(),
            registrant,
            period_years: domain.period_years.max(1),
            nameservers: Vec::new(),
            auto_renew: false,
        };

        log::info!(
            "[{registrar_code}] Registering {} for {} year(s)",
            domain.name,
            request.period_years
        );
        match resolved.client.register(&request).await {
            Ok(receipt) => {
                self.record_success(registrar_code, domain, &request, receipt)
                    .await
            }
            Err(e) => {
                log_registrar_error("register", registrar_code, domain.name.as_str(), &e);
                let uncertain = e.is_outcome_uncertain();
                let outcome = RegistrationOutcome {
                    status: DomainStatus::Failed,
                    registrar_code: registrar_code.to_string(),
                    external_reference: domain.external_reference.clone(),
                    expires_at: domain.expires_at,
                    last_error: Some(e.to_string()),
                };
                self.ctx
                    .domain_repository
                    .save_registration_outcome(&domain.id, &outcome)
                    .await?;

                let message = if uncertain {
                    format!("{e}; the registrar may still have registered the domain, verify before retrying")
                } else {
                    e.to_string()
                };
                Ok(DomainRegistrationResult {
                    success: false,
                    domain_name: domain.name.to_string(),
                    reference_id: None,
                    message,
                    outcome_uncertain: uncertain,
                    domain: Some(apply_outcome(domain, outcome)),
                })
            }
        }
    }

    async fn record_success(
        &self,
        registrar_code: &str,
        domain: RegisteredDomain,
        request: &RegistrationRequest,
        receipt: RegistrationReceipt,
    ) -> CoreResult<DomainRegistrationResult> {
        let outcome = RegistrationOutcome {
            status: DomainStatus::Registered,
            registrar_code: registrar_code.to_string(),
            external_reference: Some(receipt.reference_id.clone()),
            expires_at: receipt
                .expires_at
                .or_else(|| expiry_after(request.period_years, Utc::now())),
            last_error: None,
        };
        self.ctx
            .domain_repository
            .save_registration_outcome(&domain.id, &outcome)
            .await?;
        log::info!(
            "[{registrar_code}] Registered {} (reference {})",
            domain.name,
            receipt.reference_id
        );

        Ok(DomainRegistrationResult {
            success: true,
            domain_name: domain.name.to_string(),
            reference_id: Some(receipt.reference_id),
            message: receipt
                .message
                .unwrap_or_else(|| "registered".to_string()),
            outcome_uncertain: false,
            domain: Some(apply_outcome(domain, outcome)),
        })
    }

    fn ensure_assignable(domain: &RegisteredDomain, registrar_code: &str) -> CoreResult<()> {
        match domain.registrar_code.as_deref() {
            Some(assigned) if assigned != registrar_code => Err(CoreError::RegistrarMismatch {
                domain: domain.name.to_string(),
                assigned: assigned.to_string(),
                requested: registrar_code.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

fn apply_outcome(mut domain: RegisteredDomain, outcome: RegistrationOutcome) -> RegisteredDomain {
    domain.status = outcome.status;
    domain.registrar_code = Some(outcome.registrar_code);
    domain.external_reference = outcome.external_reference;
    domain.expires_at = outcome.expires_at;
    domain.last_error = outcome.last_error;
    domain.updated_at = Utc::now();
    domain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockRegistrarClient, TestHarness};
    use domain_registrar_provider::RegistrarError;
    use std::time::Duration;

    #[test]
    fn expiry_adds_whole_years() {
        let from = DateTime::parse_from_rfc3339("2024-02-29T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let expiry = expiry_after(1, from).unwrap();
        assert_eq!(expiry.to_rfc3339(), "2025-02-28T00:00:00+00:00");
    }

    #[tokio::test]
    async fn registering_twice_calls_registrar_once() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        h.add_registrar("aws", client.clone()).await;
        let domain = h.add_domain("fresh.com", Some("aws")).await;
        let svc = RegistrationService::new(h.ctx.clone());

        let first = svc.register_domain("aws", &domain.id).await.unwrap();
        let second = svc.register_domain("aws", &domain.id).await.unwrap();

        assert!(first.success && second.success);
        assert_eq!(second.message, "already registered");
        assert_eq!(client.register_calls(), 1);

        let stored = h.domains.get(&domain.id).await.unwrap();
        assert_eq!(stored.status, DomainStatus::Registered);
        assert_eq!(stored.external_reference, first.reference_id);
        assert!(stored.expires_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_attempts_on_one_domain_submit_once() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.set_register_delay(Duration::from_millis(50));
        h.add_registrar("aws", client.clone()).await;
        let domain = h.add_domain("race.com", Some("aws")).await;
        let svc = Arc::new(RegistrationService::new(h.ctx.clone()));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let svc = svc.clone();
                let id = domain.id.clone();
                tokio::spawn(async move { svc.register_domain("aws", &id).await })
            })
            .collect();
        for t in tasks {
            assert!(t.await.unwrap().unwrap().success);
        }
        assert_eq!(client.register_calls(), 1);
    }

    #[tokio::test]
    async fn rejection_is_a_business_failure_persisted_as_failed() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.fail_register_with(RegistrarError::InsufficientFunds {
            provider: "mock".into(),
            raw_message: Some("balance too low".into()),
        });
        h.add_registrar("aws", client.clone()).await;
        let domain = h.add_domain("pricey.com", Some("aws")).await;

        let result = RegistrationService::new(h.ctx.clone())
            .register_domain("aws", &domain.id)
            .await
            .unwrap();
        assert!(!result.success);
        assert!(!result.outcome_uncertain);
        let stored = h.domains.get(&domain.id).await.unwrap();
        assert_eq!(stored.status, DomainStatus::Failed);
        assert!(stored.last_error.unwrap().contains("balance too low"));
    }

    #[tokio::test]
    async fn timeout_marks_outcome_uncertain() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.fail_register_with(MockRegistrarClient::timeout());
        h.add_registrar("aws", client).await;
        let domain = h.add_domain("slow.com", Some("aws")).await;

        let result = RegistrationService::new(h.ctx.clone())
            .register_domain("aws", &domain.id)
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.outcome_uncertain);
    }

    #[tokio::test]
    async fn inactive_registrar_is_never_called() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        h.add_registrar("aws", client.clone()).await;
        h.registrars.set_active("aws", false).await;
        let domain = h.add_domain("x.com", Some("aws")).await;

        let err = RegistrationService::new(h.ctx.clone())
            .register_domain("aws", &domain.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::RegistrarInactive(_)));
        assert_eq!(client.total_calls(), 0);
    }

    #[tokio::test]
    async fn other_registrars_domain_is_a_mismatch() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        h.add_registrar("aws", client.clone()).await;
        h.add_registrar("gd", Arc::new(MockRegistrarClient::new())).await;
        let domain = h.add_domain("theirs.com", Some("gd")).await;

        let err = RegistrationService::new(h.ctx.clone())
            .register_domain("aws", &domain.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::RegistrarMismatch { .. }));
        assert_eq!(client.register_calls(), 0);
    }

    #[tokio::test]
    async fn missing_registrant_contact_fails_without_remote_call() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        h.add_registrar("aws", client.clone()).await;
        let mut domain = h.add_domain("orphan.com", Some("aws")).await;
        domain.customer_id = "nobody".into();
        h.domains.insert(domain.clone()).await;

        let result = RegistrationService::new(h.ctx.clone())
            .register_domain("aws", &domain.id)
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(client.register_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_domain_is_not_found() {
        let h = TestHarness::new().await;
        h.add_registrar("aws", Arc::new(MockRegistrarClient::new())).await;
        let err = RegistrationService::new(h.ctx.clone())
            .register_domain("aws", "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::DomainNotFound(_)));
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let h = TestHarness::new().await;
        h.add_registrar("aws", Arc::new(MockRegistrarClient::new())).await;
        let domain = h.add_domain("db-down.com", Some("aws")).await;
        h.domains.set_save_error(Some("database is locked".into())).await;

        let err = RegistrationService::new(h.ctx.clone())
            .register_domain("aws", &domain.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::StorageError(_)));
    }
}
