//! Request-scoped result types handed back to controllers

use serde::Serialize;

use super::domain::RegisteredDomain;

/// Outcome of one registration attempt.
///
/// `success = false` is the channel for ordinary business failures
/// (rejected name, insufficient funds, registrar outage).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRegistrationResult {
    pub success: bool,
    pub domain_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub message: String,
    /// The registrar may have registered the domain despite the error
    /// (timeout or dropped connection). Re-check before retrying.
    pub outcome_uncertain: bool,
    /// Persisted domain after the attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<RegisteredDomain>,
}

impl DomainRegistrationResult {
    pub fn failure(domain_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            domain_name: domain_name.into(),
            reference_id: None,
            message: message.into(),
            outcome_uncertain: false,
            domain: None,
        }
    }
}

/// Outcome of reconciling one domain's records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordSyncResult {
    pub domain_name: String,
    pub success: bool,
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
    /// Local records kept because the registrar is not authoritative for their type
    pub preserved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DnsRecordSyncResult {
    pub fn failed(domain_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Aggregate of a bulk sync over one registrar's domains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsBulkSyncResult {
    pub registrar_code: String,
    /// Domains attempted
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Domains never started because the batch was cancelled
    pub skipped: usize,
    pub cancelled: bool,
    /// One entry per attempted domain, in enumeration order
    pub results: Vec<DnsRecordSyncResult>,
}

impl DnsBulkSyncResult {
    /// Tally per-domain results.
    pub fn aggregate(
        registrar_code: impl Into<String>,
        results: Vec<DnsRecordSyncResult>,
        skipped: usize,
    ) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            registrar_code: registrar_code.into(),
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            skipped,
            cancelled: skipped > 0,
            results,
        }
    }
}
