//! `DnsRecordStore` implementation for `SqliteStore`.
//!
//! `apply_changes` runs deletes, updates and inserts in one transaction.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use domain_registrar_core::error::{CoreError, CoreResult};
use domain_registrar_core::traits::DnsRecordStore;
use domain_registrar_core::types::{DnsChangeSet, DnsRecord, DnsRecordType};

use super::SqliteStore;
use super::entity::dns_record;

impl dns_record::Model {
    fn into_record(self) -> CoreResult<DnsRecord> {
        let record_type = self.record_type.parse::<DnsRecordType>().map_err(|_| {
            CoreError::SerializationError(format!("Invalid record_type: {}", self.record_type))
        })?;
        Ok(DnsRecord {
            id: self.id,
            domain_id: self.domain_id,
            record_type,
            name: self.name,
            value: self.value,
            ttl: u32::try_from(self.ttl)
                .map_err(|_| CoreError::SerializationError(format!("Invalid ttl: {}", self.ttl)))?,
            priority: self
                .priority
                .map(|p| {
                    u16::try_from(p).map_err(|_| {
                        CoreError::SerializationError(format!("Invalid priority: {p}"))
                    })
                })
                .transpose()?,
        })
    }
}

fn record_to_active_model(record: &DnsRecord) -> dns_record::ActiveModel {
    dns_record::ActiveModel {
        id: Set(record.id.clone()),
        domain_id: Set(record.domain_id.clone()),
        record_type: Set(record.record_type.as_str().to_string()),
        name: Set(record.name.clone()),
        value: Set(record.value.clone()),
        ttl: Set(i64::from(record.ttl)),
        priority: Set(record.priority.map(i32::from)),
    }
}

#[async_trait]
impl DnsRecordStore for SqliteStore {
    async fn find_by_domain(&self, domain_id: &str) -> CoreResult<Vec<DnsRecord>> {
        dns_record::Entity::find()
            .filter(dns_record::Column::DomainId.eq(domain_id))
            .order_by_asc(dns_record::Column::RecordType)
            .order_by_asc(dns_record::Column::Name)
            .order_by_asc(dns_record::Column::Value)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query records: {e}")))?
            .into_iter()
            .map(dns_record::Model::into_record)
            .collect()
    }

    async fn apply_changes(&self, domain_id: &str, changes: &DnsChangeSet) -> CoreResult<()> {
        let domain_id = domain_id.to_string();
        let changes = changes.clone();

        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    if !changes.to_delete.is_empty() {
                        dns_record::Entity::delete_many()
                            .filter(dns_record::Column::DomainId.eq(domain_id.as_str()))
                            .filter(dns_record::Column::Id.is_in(changes.to_delete.iter().cloned()))
                            .exec(txn)
                            .await?;
                    }

                    for record in &changes.to_update {
                        dns_record::ActiveModel {
                            id: Set(record.id.clone()),
                            ttl: Set(i64::from(record.ttl)),
                            priority: Set(record.priority.map(i32::from)),
                            ..Default::default()
                        }
                        .update(txn)
                        .await?;
                    }

                    if !changes.to_insert.is_empty() {
                        dns_record::Entity::insert_many(
                            changes.to_insert.iter().map(record_to_active_model),
                        )
                        .exec(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to apply record changes: {e}")))
    }
}
