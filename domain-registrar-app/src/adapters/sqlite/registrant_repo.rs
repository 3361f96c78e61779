//! `RegistrantDirectory` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, EntityTrait};

use domain_registrar_core::error::{CoreError, CoreResult};
use domain_registrar_core::traits::RegistrantDirectory;
use domain_registrar_core::types::RegistrantContact;

use super::SqliteStore;
use super::entity::registrant;

impl SqliteStore {
    /// Store the registrant contact used for `customer_id`'s registrations.
    pub async fn set_registrant(
        &self,
        customer_id: &str,
        contact: &RegistrantContact,
    ) -> CoreResult<()> {
        let json = serde_json::to_string(contact)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        let active_model = registrant::ActiveModel {
            customer_id: Set(customer_id.to_string()),
            contact: Set(json),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        registrant::Entity::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(registrant::Column::CustomerId)
                    .update_columns([registrant::Column::Contact, registrant::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to save registrant: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl RegistrantDirectory for SqliteStore {
    async fn find_registrant(&self, customer_id: &str) -> CoreResult<Option<RegistrantContact>> {
        let row = registrant::Entity::find_by_id(customer_id)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query registrant: {e}")))?;

        row.map(|r| {
            serde_json::from_str(&r.contact).map_err(|e| {
                CoreError::SerializationError(format!("Invalid registrant JSON: {e}"))
            })
        })
        .transpose()
    }
}
