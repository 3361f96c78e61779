//! Set-based diff between a domain's local and remote record sets

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use domain_registrar_provider::{DnsRecordType, RemoteDnsRecord};

use crate::types::{DnsChangeSet, DnsRecord, RecordIdentity};

/// Changes to apply plus the per-category counts reported to callers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDiff {
    pub changes: DnsChangeSet,
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
    /// Unmatched local records of types the registrar is not authoritative for
    pub preserved: usize,
}

/// Diff `local` against `remote`, keyed by [`RecordIdentity`].
///
/// - remote only: insert
/// - both, TTL or priority differs: update the local record in place
/// - both, identical: unchanged
/// - local only: delete if its type is in `authoritative_types`, otherwise
///   preserve
///
/// Duplicate identities collapse to their first occurrence on both sides;
/// surplus local copies are treated as local-only.
pub fn compute_changes(
    domain_id: &str,
    local: &[DnsRecord],
    remote: &[RemoteDnsRecord],
    authoritative_types: &[DnsRecordType],
) -> RecordDiff {
    let authoritative: HashSet<DnsRecordType> = authoritative_types.iter().copied().collect();

    let mut local_by_identity: HashMap<RecordIdentity, &DnsRecord> = HashMap::new();
    let mut surplus: HashSet<&str> = HashSet::new();
    for record in local {
        match local_by_identity.entry(record.identity()) {
            Entry::Occupied(_) => {
                surplus.insert(record.id.as_str());
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }

    let mut diff = RecordDiff::default();
    let mut seen_remote: HashSet<RecordIdentity> = HashSet::new();
    for remote_record in remote {
        let identity = RecordIdentity::of_remote(remote_record);
        if !seen_remote.insert(identity.clone()) {
            continue;
        }
        match local_by_identity.remove(&identity) {
            Some(existing)
                if existing.ttl == remote_record.ttl
                    && existing.priority == remote_record.priority =>
            {
                diff.unchanged += 1;
            }
            Some(existing) => {
                diff.changes.to_update.push(DnsRecord {
                    ttl: remote_record.ttl,
                    priority: remote_record.priority,
                    ..existing.clone()
                });
                diff.updated += 1;
            }
            None => {
                diff.changes
                    .to_insert
                    .push(DnsRecord::from_remote(domain_id, remote_record));
                diff.added += 1;
            }
        }
    }

    let unmatched: HashSet<&str> = local_by_identity
        .values()
        .map(|r| r.id.as_str())
        .chain(surplus)
        .collect();

    // Local order is kept for deletions.
    for record in local.iter().filter(|r| unmatched.contains(r.id.as_str())) {
        if authoritative.contains(&record.record_type) {
            diff.changes.to_delete.push(record.id.clone());
            diff.removed += 1;
        } else {
            diff.preserved += 1;
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(id: &str, t: DnsRecordType, name: &str, value: &str, ttl: u32) -> DnsRecord {
        DnsRecord {
            id: id.to_string(),
            domain_id: "d1".to_string(),
            record_type: t,
            name: name.to_string(),
            value: value.to_string(),
            ttl,
            priority: None,
        }
    }

    fn remote(t: DnsRecordType, name: &str, value: &str, ttl: u32) -> RemoteDnsRecord {
        RemoteDnsRecord {
            record_type: t,
            name: name.to_string(),
            value: value.to_string(),
            ttl,
            priority: None,
        }
    }

    const ALL: &[DnsRecordType] = &DnsRecordType::ALL;

    #[test]
    fn adds_missing_and_counts_unchanged() {
        let local = vec![local("r1", DnsRecordType::A, "@", "1.1.1.1", 600)];
        let remote = vec![
            remote(DnsRecordType::A, "@", "1.1.1.1", 600),
            remote(DnsRecordType::A, "@", "2.2.2.2", 600),
        ];
        let diff = compute_changes("d1", &local, &remote, ALL);
        assert_eq!((diff.added, diff.unchanged, diff.removed, diff.updated), (1, 1, 0, 0));
        assert_eq!(diff.changes.to_insert[0].value, "2.2.2.2");
        assert_eq!(diff.changes.to_insert[0].domain_id, "d1");
    }

    #[test]
    fn diff_is_symmetric() {
        // local {A}, remote {B}: added = B \ A, removed = A \ B, unchanged = A ∩ B
        let local = vec![
            local("keep", DnsRecordType::A, "www", "1.1.1.1", 300),
            local("gone", DnsRecordType::Txt, "@", "old", 300),
        ];
        let remote = vec![
            remote(DnsRecordType::A, "www", "1.1.1.1", 300),
            remote(DnsRecordType::Txt, "@", "new", 300),
        ];
        let diff = compute_changes("d1", &local, &remote, ALL);
        assert_eq!(diff.added, 1);
        assert_eq!(diff.removed, 1);
        assert_eq!(diff.unchanged, 1);
        assert_eq!(diff.changes.to_delete, vec!["gone".to_string()]);
    }

    #[test]
    fn ttl_only_change_is_an_update() {
        let local = vec![local("r1", DnsRecordType::Mx, "@", "mx.example.com", 600)];
        let mut r = remote(DnsRecordType::Mx, "@", "MX.example.com.", 3600);
        r.priority = Some(10);
        let diff = compute_changes("d1", &local, &[r], ALL);
        assert_eq!((diff.added, diff.updated, diff.removed), (0, 1, 0));
        let updated = &diff.changes.to_update[0];
        assert_eq!(updated.id, "r1");
        assert_eq!(updated.ttl, 3600);
        assert_eq!(updated.priority, Some(10));
        assert_eq!(updated.value, "mx.example.com");
    }

    #[test]
    fn non_authoritative_types_are_preserved() {
        let local = vec![
            local("a", DnsRecordType::A, "@", "1.1.1.1", 600),
            local("glue", DnsRecordType::Ns, "sub", "ns1.other.net", 600),
        ];
        let diff = compute_changes("d1", &local, &[], &[DnsRecordType::A]);
        assert_eq!(diff.removed, 1);
        assert_eq!(diff.preserved, 1);
        assert_eq!(diff.changes.to_delete, vec!["a".to_string()]);
    }

    #[test]
    fn rerun_after_apply_is_a_no_op() {
        let remote = vec![
            remote(DnsRecordType::A, "@", "1.1.1.1", 600),
            remote(DnsRecordType::Cname, "www", "example.com", 600),
        ];
        let first = compute_changes("d1", &[], &remote, ALL);
        let applied = first.changes.to_insert;
        let second = compute_changes("d1", &applied, &remote, ALL);
        assert!(second.changes.is_empty());
        assert_eq!(second.unchanged, 2);
    }

    #[test]
    fn duplicates_collapse() {
        let local = vec![
            local("a1", DnsRecordType::A, "@", "1.1.1.1", 600),
            local("a2", DnsRecordType::A, "@", "1.1.1.1", 600),
        ];
        let remote = vec![
            remote(DnsRecordType::A, "@", "1.1.1.1", 600),
            remote(DnsRecordType::A, "@", "1.1.1.1", 600),
        ];
        let diff = compute_changes("d1", &local, &remote, ALL);
        assert_eq!(diff.unchanged, 1);
        assert_eq!(diff.added, 0);
        assert_eq!(diff.changes.to_delete, vec!["a2".to_string()]);
    }
}
