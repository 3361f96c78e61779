//! `CredentialStore` implementation for `SqliteStore`.
//!
//! Credentials are encrypted with AES-256-GCM before storage.
//! Uses `domain_registrar_core::crypto::{encrypt, decrypt}`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, EntityTrait, ModelTrait};

use domain_registrar_core::crypto::{self, SealedSecret};
use domain_registrar_core::error::{CoreError, CoreResult};
use domain_registrar_core::traits::CredentialStore;
use domain_registrar_core::types::RegistrarCredentials;

use super::SqliteStore;
use super::entity::registrar_credential;

impl SqliteStore {
    /// Return the configured encryption password or an explicit credential error.
    fn get_encryption_password(&self) -> CoreResult<&str> {
        self.encryption_password.as_deref().ok_or_else(|| {
            CoreError::CredentialError("Encryption password not configured for SqliteStore".into())
        })
    }

    /// Serialize and encrypt registrar credentials for database storage.
    fn encrypt_credentials(&self, credentials: &RegistrarCredentials) -> CoreResult<SealedSecret> {
        let password = self.get_encryption_password()?;
        let json = serde_json::to_string(credentials)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        crypto::encrypt(json.as_bytes(), password)
    }

    /// Decrypt and deserialize registrar credentials from a database row.
    fn decrypt_credentials(
        &self,
        model: registrar_credential::Model,
    ) -> CoreResult<RegistrarCredentials> {
        let password = self.get_encryption_password()?;
        let sealed = SealedSecret {
            salt: model.salt,
            nonce: model.nonce,
            ciphertext: model.ciphertext,
            iterations: u32::try_from(model.iterations).map_err(|_| {
                CoreError::SerializationError(format!(
                    "Invalid iteration count {}",
                    model.iterations
                ))
            })?,
        };
        let plaintext = crypto::decrypt(&sealed, password)?;
        let json = String::from_utf8(plaintext)
            .map_err(|e| CoreError::SerializationError(format!("Invalid UTF-8: {e}")))?;
        serde_json::from_str(&json)
            .map_err(|e| CoreError::SerializationError(format!("Invalid credentials JSON: {e}")))
    }

    /// Store (or replace) the credentials behind `credential_ref`.
    pub async fn set_credentials(
        &self,
        credential_ref: &str,
        credentials: &RegistrarCredentials,
    ) -> CoreResult<()> {
        let sealed = self.encrypt_credentials(credentials)?;

        let active_model = registrar_credential::ActiveModel {
            credential_ref: Set(credential_ref.to_string()),
            salt: Set(sealed.salt),
            nonce: Set(sealed.nonce),
            ciphertext: Set(sealed.ciphertext),
            iterations: Set(i64::from(sealed.iterations)),
        };

        registrar_credential::Entity::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(registrar_credential::Column::CredentialRef)
                    .update_columns([
                        registrar_credential::Column::Salt,
                        registrar_credential::Column::Nonce,
                        registrar_credential::Column::Ciphertext,
                        registrar_credential::Column::Iterations,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to save credential: {e}")))?;

        log::info!("Credentials saved for {credential_ref}");
        Ok(())
    }

    /// Delete the credentials behind `credential_ref`, if any.
    pub async fn remove_credentials(&self, credential_ref: &str) -> CoreResult<()> {
        let model = registrar_credential::Entity::find_by_id(credential_ref)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query credential: {e}")))?;

        if let Some(m) = model {
            m.delete(&self.db).await.map_err(|e| {
                CoreError::StorageError(format!("Failed to delete credential: {e}"))
            })?;
            log::info!("Credentials deleted for {credential_ref}");
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn get(&self, credential_ref: &str) -> CoreResult<Option<RegistrarCredentials>> {
        let row = registrar_credential::Entity::find_by_id(credential_ref)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query credential: {e}")))?;

        row.map(|r| self.decrypt_credentials(r)).transpose()
    }
}
