//! DNS record persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{DnsChangeSet, DnsRecord};

/// Local DNS record store
#[async_trait]
pub trait DnsRecordStore: Send + Sync {
    /// All records of one domain
    async fn find_by_domain(&self, domain_id: &str) -> CoreResult<Vec<DnsRecord>>;

    /// Apply inserts, updates and deletes for one domain atomically.
    ///
    /// Either every change becomes visible or none does.
    async fn apply_changes(&self, domain_id: &str, changes: &DnsChangeSet) -> CoreResult<()>;
}
