//! `RegistrarStore` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, EntityTrait, QueryOrder};

use domain_registrar_core::error::{CoreError, CoreResult};
use domain_registrar_core::traits::RegistrarStore;
use domain_registrar_core::types::{Registrar, capabilities_for};

use super::entity::registrar;
use super::{SqliteStore, parse_wire_enum};

impl registrar::Model {
    fn into_registrar(self) -> CoreResult<Registrar> {
        let registrar_type = parse_wire_enum("registrar_type", self.registrar_type)?;
        Ok(Registrar {
            code: self.code,
            name: self.name,
            registrar_type,
            is_active: self.is_active,
            endpoint: self.endpoint,
            credential_ref: self.credential_ref,
            capabilities: capabilities_for(registrar_type),
        })
    }
}

impl SqliteStore {
    /// Insert or update a registrar (admin CRUD).
    pub async fn upsert_registrar(&self, registrar: &Registrar) -> CoreResult<()> {
        let active_model = registrar::ActiveModel {
            code: Set(registrar.code.clone()),
            name: Set(registrar.name.clone()),
            registrar_type: Set(registrar.registrar_type.as_str().to_string()),
            is_active: Set(registrar.is_active),
            endpoint: Set(registrar.endpoint.clone()),
            credential_ref: Set(registrar.credential_ref.clone()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        registrar::Entity::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(registrar::Column::Code)
                    .update_columns([
                        registrar::Column::Name,
                        registrar::Column::RegistrarType,
                        registrar::Column::IsActive,
                        registrar::Column::Endpoint,
                        registrar::Column::CredentialRef,
                        registrar::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to save registrar: {e}")))?;

        log::info!(
            "Registrar {} saved (active: {})",
            registrar.code,
            registrar.is_active
        );
        Ok(())
    }

    /// All registrars ordered by code.
    pub async fn list_registrars(&self) -> CoreResult<Vec<Registrar>> {
        registrar::Entity::find()
            .order_by_asc(registrar::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query registrars: {e}")))?
            .into_iter()
            .map(registrar::Model::into_registrar)
            .collect()
    }
}

#[async_trait]
impl RegistrarStore for SqliteStore {
    async fn find_by_code(&self, code: &str) -> CoreResult<Option<Registrar>> {
        let row = registrar::Entity::find_by_id(code)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query registrar: {e}")))?;

        row.map(registrar::Model::into_registrar).transpose()
    }
}
