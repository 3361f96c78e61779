//! `RegisteredDomainRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use domain_registrar_core::error::{CoreError, CoreResult};
use domain_registrar_core::traits::RegisteredDomainRepository;
use domain_registrar_core::types::{
    DomainName, DomainStatus, RegisteredDomain, RegistrationOutcome,
};

use super::entity::registered_domain;
use super::{SqliteStore, parse_timestamp};

impl registered_domain::Model {
    /// Convert a `SeaORM` row model into a `RegisteredDomain`.
    fn into_domain(self) -> CoreResult<RegisteredDomain> {
        let name = DomainName::parse(&self.name)
            .map_err(|e| CoreError::SerializationError(format!("Invalid name: {e}")))?;
        Ok(RegisteredDomain {
            id: self.id,
            name,
            customer_id: self.customer_id,
            registrar_code: self.registrar_code,
            status: self.status.parse::<DomainStatus>()?,
            period_years: u32::try_from(self.period_years).unwrap_or(1),
            expires_at: self
                .expires_at
                .as_deref()
                .map(|s| parse_timestamp("expires_at", s))
                .transpose()?,
            external_reference: self.external_reference,
            last_error: self.last_error,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

impl SqliteStore {
    /// Insert a domain row (admin CRUD / placeholders).
    pub async fn insert_domain(&self, domain: &RegisteredDomain) -> CoreResult<()> {
        let active_model = registered_domain::ActiveModel {
            id: Set(domain.id.clone()),
            name: Set(domain.name.to_string()),
            customer_id: Set(domain.customer_id.clone()),
            registrar_code: Set(domain.registrar_code.clone()),
            status: Set(domain.status.as_str().to_string()),
            period_years: Set(i32::try_from(domain.period_years).unwrap_or(i32::MAX)),
            expires_at: Set(domain.expires_at.map(|dt| dt.to_rfc3339())),
            external_reference: Set(domain.external_reference.clone()),
            last_error: Set(domain.last_error.clone()),
            created_at: Set(domain.created_at.to_rfc3339()),
            updated_at: Set(domain.updated_at.to_rfc3339()),
        };

        registered_domain::Entity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to insert domain: {e}")))?;

        log::info!("Domain {} inserted ({})", domain.name, domain.id);
        Ok(())
    }
}

#[async_trait]
impl RegisteredDomainRepository for SqliteStore {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<RegisteredDomain>> {
        let row = registered_domain::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query domain: {e}")))?;

        row.map(registered_domain::Model::into_domain).transpose()
    }

    async fn find_by_name(&self, name: &DomainName) -> CoreResult<Option<RegisteredDomain>> {
        let row = registered_domain::Entity::find()
            .filter(registered_domain::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query domain: {e}")))?;

        row.map(registered_domain::Model::into_domain).transpose()
    }

    async fn find_by_registrar(&self, registrar_code: &str) -> CoreResult<Vec<RegisteredDomain>> {
        registered_domain::Entity::find()
            .filter(registered_domain::Column::RegistrarCode.eq(registrar_code))
            .order_by_asc(registered_domain::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query domains: {e}")))?
            .into_iter()
            .map(registered_domain::Model::into_domain)
            .collect()
    }

    async fn save_registration_outcome(
        &self,
        id: &str,
        outcome: &RegistrationOutcome,
    ) -> CoreResult<()> {
        let exists = registered_domain::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query domain: {e}")))?
            .is_some();
        if !exists {
            return Err(CoreError::DomainNotFound(id.to_string()));
        }

        let active = registered_domain::ActiveModel {
            id: Set(id.to_string()),
            registrar_code: Set(Some(outcome.registrar_code.clone())),
            status: Set(outcome.status.as_str().to_string()),
            expires_at: Set(outcome.expires_at.map(|dt| dt.to_rfc3339())),
            external_reference: Set(outcome.external_reference.clone()),
            last_error: Set(outcome.last_error.clone()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };
        active
            .update(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to update domain: {e}")))?;

        log::debug!("Domain {id} is now {}", outcome.status);
        Ok(())
    }
}
