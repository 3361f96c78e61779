//! DNS record reconciliation for a single domain

use std::sync::Arc;
use std::time::Duration;

use crate::error::CoreResult;
use crate::services::record_diff::compute_changes;
use crate::services::{ServiceContext, log_registrar_error};
use crate::traits::ResolvedRegistrar;
use crate::types::{DnsRecordSyncResult, DomainName, RegisteredDomain};

/// Pulls a domain's remote record set and merges it into local storage.
pub struct DnsSyncService {
    ctx: Arc<ServiceContext>,
}

impl DnsSyncService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Reconcile one domain's records with `registrar_code`.
    ///
    /// Registrar and domain lookups fail as errors. Remote failures, a
    /// registrar mismatch and a failed apply are reported in the result.
    pub async fn sync_by_domain_name(
        &self,
        registrar_code: &str,
        domain_name: &str,
    ) -> CoreResult<DnsRecordSyncResult> {
        let resolved = self.ctx.registrar_registry.resolve(registrar_code).await?;
        let name = DomainName::parse(domain_name)?;
        let domain = self.ctx.get_domain_by_name(&name).await?;
        sync_domain(&self.ctx, &resolved, &domain, None).await
    }
}

/// Fetch, diff and apply for one domain.
///
/// The remote fetch runs outside the domain lock; `fetch_timeout` bounds it.
/// Local reads and the apply run under the lock so concurrent syncs of the
/// same domain never interleave writes.
pub(crate) async fn sync_domain(
    ctx: &ServiceContext,
    resolved: &ResolvedRegistrar,
    domain: &RegisteredDomain,
    fetch_timeout: Option<Duration>,
) -> CoreResult<DnsRecordSyncResult> {
    let code = resolved.registrar.code.as_str();
    let name = domain.name.as_str();

    if !domain.is_assigned_to(code) {
        let assigned = domain.registrar_code.as_deref().unwrap_or("none");
        log::warn!("[{code}] Refusing to sync {name}: assigned registrar is {assigned}");
        return Ok(DnsRecordSyncResult::failed(
            name,
            format!("domain is assigned to registrar {assigned}, not {code}"),
        ));
    }

    let fetch = resolved.client.fetch_dns_records(name);
    let fetched = match fetch_timeout {
        Some(limit) => match tokio::time::timeout(limit, fetch).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("[{code}] Fetching records for {name} timed out after {limit:?}");
                return Ok(DnsRecordSyncResult::failed(
                    name,
                    format!("fetching records timed out after {}s", limit.as_secs_f64()),
                ));
            }
        },
        None => fetch.await,
    };
    let remote = match fetched {
        Ok(records) => records,
        Err(e) => {
            log_registrar_error("fetch records for", code, name, &e);
            return Ok(DnsRecordSyncResult::failed(name, e.to_string()));
        }
    };
    log::debug!("[{code}] Fetched {} remote records for {name}", remote.len());

    let _guard = ctx.domain_locks.lock(&domain.id).await;
    let local = ctx.dns_record_store.find_by_domain(&domain.id).await?;
    let authoritative = resolved.client.capabilities().authoritative_record_types;
    let diff = compute_changes(&domain.id, &local, &remote, &authoritative);

    if !diff.changes.is_empty() {
        if let Err(e) = ctx
            .dns_record_store
            .apply_changes(&domain.id, &diff.changes)
            .await
        {
            log::error!("[{code}] Applying record changes for {name} failed: {e}");
            return Ok(DnsRecordSyncResult::failed(name, e.to_string()));
        }
    }

    log::info!(
        "[{code}] Synced {name}: +{} ~{} -{} ={} preserved {}",
        diff.added,
        diff.updated,
        diff.removed,
        diff.unchanged,
        diff.preserved
    );
    Ok(DnsRecordSyncResult {
        domain_name: name.to_string(),
        success: true,
        added: diff.added,
        updated: diff.updated,
        removed: diff.removed,
        unchanged: diff.unchanged,
        preserved: diff.preserved,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::test_utils::{MockRegistrarClient, TestHarness, local_record, remote_record};
    use crate::types::{DnsRecord, DnsRecordType};
    use domain_registrar_provider::MAX_RECORD_PAGES;

    #[tokio::test]
    async fn adds_missing_and_counts_unchanged() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.set_records(
            "a.com",
            vec![
                remote_record(DnsRecordType::A, "@", "1.1.1.1", 300),
                remote_record(DnsRecordType::A, "@", "2.2.2.2", 300),
            ],
        );
        h.add_registrar("aws", client).await;
        let domain = h.add_domain("a.com", Some("aws")).await;
        h.records
            .insert(local_record(&domain.id, DnsRecordType::A, "@", "1.1.1.1", 300))
            .await;

        let svc = DnsSyncService::new(h.ctx.clone());
        let result = svc.sync_by_domain_name("aws", "a.com").await.unwrap();
        assert!(result.success);
        assert_eq!((result.added, result.unchanged, result.removed), (1, 1, 0));
        assert_eq!(h.records.for_domain(&domain.id).await.len(), 2);

        let rerun = svc.sync_by_domain_name("aws", "A.COM.").await.unwrap();
        assert_eq!((rerun.added, rerun.updated, rerun.removed), (0, 0, 0));
        assert_eq!(rerun.unchanged, 2);
    }

    #[tokio::test]
    async fn removes_stale_authoritative_records_only() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.set_authoritative_types(vec![DnsRecordType::A]);
        client.set_records("b.com", vec![]);
        h.add_registrar("gd", client).await;
        let domain = h.add_domain("b.com", Some("gd")).await;
        h.records
            .insert(local_record(&domain.id, DnsRecordType::A, "www", "9.9.9.9", 60))
            .await;
        h.records
            .insert(local_record(&domain.id, DnsRecordType::Ns, "sub", "ns1.b.com", 60))
            .await;

        let result = DnsSyncService::new(h.ctx.clone())
            .sync_by_domain_name("gd", "b.com")
            .await
            .unwrap();
        assert_eq!((result.removed, result.preserved), (1, 1));
        let left = h.records.for_domain(&domain.id).await;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].record_type, DnsRecordType::Ns);
    }

    #[tokio::test]
    async fn transport_failure_is_reported_not_raised() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.set_fetch_error("down.com", MockRegistrarClient::timeout());
        h.add_registrar("aws", client).await;
        let domain = h.add_domain("down.com", Some("aws")).await;
        h.records
            .insert(local_record(&domain.id, DnsRecordType::A, "@", "1.1.1.1", 300))
            .await;

        let result = DnsSyncService::new(h.ctx.clone())
            .sync_by_domain_name("aws", "down.com")
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.is_some());
        assert_eq!(h.records.for_domain(&domain.id).await.len(), 1);
    }

    #[tokio::test]
    async fn failed_apply_leaves_records_untouched() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.set_records(
            "c.com",
            vec![remote_record(DnsRecordType::Txt, "@", "v=spf1 -all", 300)],
        );
        h.add_registrar("aws", client).await;
        let domain = h.add_domain("c.com", Some("aws")).await;
        h.records
            .insert(local_record(&domain.id, DnsRecordType::A, "@", "1.1.1.1", 300))
            .await;
        h.records.fail_apply_for(&domain.id).await;

        let result = DnsSyncService::new(h.ctx.clone())
            .sync_by_domain_name("aws", "c.com")
            .await
            .unwrap();
        assert!(!result.success);
        let left = h.records.for_domain(&domain.id).await;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].value, "1.1.1.1");
    }

    #[tokio::test]
    async fn mismatched_registrar_never_fetches() {
        let h = TestHarness::new().await;
        let aws = Arc::new(MockRegistrarClient::new());
        h.add_registrar("aws", aws.clone()).await;
        h.add_registrar("gd", Arc::new(MockRegistrarClient::new())).await;
        h.add_domain("theirs.com", Some("gd")).await;

        let result = DnsSyncService::new(h.ctx.clone())
            .sync_by_domain_name("aws", "theirs.com")
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(aws.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_domain_is_not_found() {
        let h = TestHarness::new().await;
        h.add_registrar("aws", Arc::new(MockRegistrarClient::new())).await;
        let err = DnsSyncService::new(h.ctx.clone())
            .sync_by_domain_name("aws", "ghost.com")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::DomainNotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.set_fetch_delay(Duration::from_secs(30));
        h.add_registrar("aws", client).await;
        let domain = h.add_domain("slow.com", Some("aws")).await;
        let resolved = h.ctx.registrar_registry.resolve("aws").await.unwrap();

        let result = sync_domain(&h.ctx, &resolved, &domain, Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn walks_every_page_including_filtered_ones() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        let remote: Vec<_> = (1..=5)
            .map(|i| remote_record(DnsRecordType::A, "@", &format!("192.0.2.{i}"), 300))
            .collect();
        client.set_records("paged.com", remote);
        client.set_page_size(2);
        client.set_filtered_pages(1);
        h.add_registrar("gd", client.clone()).await;
        let domain = h.add_domain("paged.com", Some("gd")).await;
        h.records
            .insert(local_record(&domain.id, DnsRecordType::A, "@", "192.0.2.5", 300))
            .await;

        let result = DnsSyncService::new(h.ctx.clone())
            .sync_by_domain_name("gd", "paged.com")
            .await
            .unwrap();
        assert!(result.success, "{:?}", result.error);
        assert_eq!((result.added, result.unchanged, result.removed), (4, 1, 0));
        // one empty page, then three pages of records
        assert_eq!(client.fetch_calls(), 4);
        assert_eq!(h.records.for_domain(&domain.id).await.len(), 5);
    }

    #[tokio::test]
    async fn runaway_listing_fails_without_touching_records() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.set_records(
            "endless.com",
            vec![remote_record(DnsRecordType::A, "@", "192.0.2.1", 300)],
        );
        client.set_filtered_pages(MAX_RECORD_PAGES as usize + 10);
        h.add_registrar("gd", client.clone()).await;
        let domain = h.add_domain("endless.com", Some("gd")).await;
        h.records
            .insert(local_record(&domain.id, DnsRecordType::Mx, "@", "mx.endless.com", 300))
            .await;

        let result = DnsSyncService::new(h.ctx.clone())
            .sync_by_domain_name("gd", "endless.com")
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(client.fetch_calls(), MAX_RECORD_PAGES as usize);
        let left = h.records.for_domain(&domain.id).await;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].record_type, DnsRecordType::Mx);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_syncs_of_one_domain_do_not_duplicate_records() {
        let h = TestHarness::new().await;
        let client = Arc::new(MockRegistrarClient::new());
        client.set_records(
            "race.com",
            vec![
                remote_record(DnsRecordType::A, "@", "192.0.2.1", 300),
                remote_record(DnsRecordType::Cname, "www", "race.com", 300),
                remote_record(DnsRecordType::Txt, "@", "v=spf1 -all", 300),
            ],
        );
        client.set_fetch_delay(Duration::from_millis(20));
        h.add_registrar("aws", client.clone()).await;
        let domain = h.add_domain("race.com", Some("aws")).await;
        h.records
            .insert(local_record(&domain.id, DnsRecordType::A, "old", "192.0.2.99", 300))
            .await;

        let first = DnsSyncService::new(h.ctx.clone());
        let second = DnsSyncService::new(h.ctx.clone());
        let (a, b) = tokio::join!(
            first.sync_by_domain_name("aws", "race.com"),
            second.sync_by_domain_name("aws", "race.com"),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(a.success && b.success);
        assert_eq!(a.added + b.added, 3);
        assert_eq!(a.removed + b.removed, 1);

        let mut identities: Vec<_> = h
            .records
            .for_domain(&domain.id)
            .await
            .iter()
            .map(DnsRecord::identity)
            .collect();
        identities.sort();
        identities.dedup();
        assert_eq!(identities.len(), 3);
        assert_eq!(h.records.for_domain(&domain.id).await.len(), 3);
    }
}
