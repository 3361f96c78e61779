//! Bulk DNS sync over every domain of one registrar

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::services::dns_sync_service::sync_domain;
use crate::types::{DnsBulkSyncResult, DnsRecordSyncResult};

/// Upper bound on concurrent per-domain syncs against one registrar
pub const MAX_BULK_CONCURRENCY: usize = 16;

const DEFAULT_CONCURRENCY: usize = 4;

/// Tuning and cancellation for [`BulkSyncService::sync_all`]
#[derive(Debug, Clone)]
pub struct BulkSyncOptions {
    /// Domains synced at once, clamped to `1..=MAX_BULK_CONCURRENCY`
    pub concurrency: usize,
    /// Bound on each domain's remote fetch
    pub per_domain_timeout: Option<Duration>,
    /// No new domain is started once this much time has elapsed
    pub deadline: Option<Duration>,
    /// No new domain is started once this is cancelled
    pub cancel: Option<CancellationToken>,
}

impl Default for BulkSyncOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            per_domain_timeout: None,
            deadline: None,
            cancel: None,
        }
    }
}

impl BulkSyncOptions {
    fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_BULK_CONCURRENCY)
    }
}

pub struct BulkSyncService {
    ctx: Arc<ServiceContext>,
}

impl BulkSyncService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Sync every domain assigned to `registrar_code`.
    ///
    /// Fails only when the registrar cannot be resolved or its domains cannot
    /// be listed. Per-domain failures of any kind become failed entries.
    /// Cancellation stops new domains from starting; in-flight ones finish.
    pub async fn sync_all(
        &self,
        registrar_code: &str,
        options: &BulkSyncOptions,
    ) -> CoreResult<DnsBulkSyncResult> {
        let resolved = self.ctx.registrar_registry.resolve(registrar_code).await?;
        let domains = self
            .ctx
            .domain_repository
            .find_by_registrar(registrar_code)
            .await?;
        let enumerated = domains.len();
        let concurrency = options.effective_concurrency();
        log::info!(
            "[{registrar_code}] Bulk sync of {enumerated} domain(s), concurrency {concurrency}"
        );

        let deadline = options.deadline.map(|d| Instant::now() + d);
        let cancel = options.cancel.clone();
        let stopped = move || {
            cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
                || deadline.is_some_and(|at| Instant::now() >= at)
        };

        let ctx = &self.ctx;
        let resolved = &resolved;
        let per_domain_timeout = options.per_domain_timeout;
        let results: Vec<DnsRecordSyncResult> = stream::iter(domains)
            .take_while(|_| std::future::ready(!stopped()))
            .map(|domain| async move {
                match sync_domain(ctx, resolved, &domain, per_domain_timeout).await {
                    Ok(result) => result,
                    Err(e) => {
                        log::error!("[{registrar_code}] Sync of {} failed: {e}", domain.name);
                        DnsRecordSyncResult::failed(domain.name.as_str(), e.to_string())
                    }
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        let skipped = enumerated - results.len();
        let bulk = DnsBulkSyncResult::aggregate(registrar_code, results, skipped);
        if bulk.cancelled {
            log::warn!(
                "[{registrar_code}] Bulk sync cancelled: {} attempted, {skipped} skipped",
                bulk.total
            );
        }
        log::info!(
            "[{registrar_code}] Bulk sync finished: {} succeeded, {} failed",
            bulk.succeeded,
            bulk.failed
        );
        Ok(bulk)
    }
}
