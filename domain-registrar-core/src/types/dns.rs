//! Local DNS record type definitions

use serde::{Deserialize, Serialize};

use domain_registrar_provider::{DnsRecordType, RemoteDnsRecord};

/// DNS record held locally for one registered domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    pub id: String,
    pub domain_id: String,
    pub record_type: DnsRecordType,
    /// Relative name, `@` for the apex
    pub name: String,
    pub value: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl DnsRecord {
    /// New local record (fresh id) for a record seen at the registrar.
    #[must_use]
    pub fn from_remote(domain_id: &str, remote: &RemoteDnsRecord) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            domain_id: domain_id.to_string(),
            record_type: remote.record_type,
            name: remote.name.clone(),
            value: remote.value.clone(),
            ttl: remote.ttl,
            priority: remote.priority,
        }
    }

    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity::new(self.record_type, &self.name, &self.value)
    }
}

/// Merge identity of a record: `(type, name, value)`.
///
/// Names, and values of hostname-valued types, compare case-insensitively
/// and without a trailing dot. TTL and priority are not part of identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordIdentity {
    pub record_type: DnsRecordType,
    pub name: String,
    pub value: String,
}

impl RecordIdentity {
    pub fn new(record_type: DnsRecordType, name: &str, value: &str) -> Self {
        let name = match normalize_host(name) {
            n if n.is_empty() => "@".to_string(),
            n => n,
        };
        let value = if record_type.value_is_hostname() {
            normalize_host(value)
        } else {
            value.trim().to_string()
        };
        Self {
            record_type,
            name,
            value,
        }
    }

    pub fn of_remote(record: &RemoteDnsRecord) -> Self {
        Self::new(record.record_type, &record.name, &record.value)
    }
}

fn normalize_host(s: &str) -> String {
    s.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Changes to apply to one domain's record set, atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsChangeSet {
    /// New records
    pub to_insert: Vec<DnsRecord>,
    /// Existing records (matched by id) with new TTL/priority
    pub to_update: Vec<DnsRecord>,
    /// Ids of records to delete
    pub to_delete: Vec<String>,
}

impl DnsChangeSet {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_case_and_trailing_dot_for_hostnames() {
        let a = RecordIdentity::new(DnsRecordType::Cname, "WWW", "Target.Example.com.");
        let b = RecordIdentity::new(DnsRecordType::Cname, "www.", "target.example.com");
        assert_eq!(a, b);
    }

    #[test]
    fn txt_values_stay_case_sensitive() {
        let a = RecordIdentity::new(DnsRecordType::Txt, "@", "v=spf1 Include");
        let b = RecordIdentity::new(DnsRecordType::Txt, "@", "v=spf1 include");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_name_is_apex() {
        assert_eq!(RecordIdentity::new(DnsRecordType::A, "", "1.1.1.1").name, "@");
    }
}
