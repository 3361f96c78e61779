//! SQLite-based unified store using `SeaORM`.
//!
//! A single `SqliteStore` implements every storage trait the core needs:
//! `RegistrarStore`, `CredentialStore`, `RegisteredDomainRepository`,
//! `DnsRecordStore` and `RegistrantDirectory`, backed by a local `SQLite`
//! database. Credentials are encrypted with AES-256-GCM using a password
//! provided at construction.

mod credential_store;
mod dns_record_repo;
mod domain_repo;
pub(crate) mod entity;
mod migration;
mod registrant_repo;
mod registrar_repo;

use std::path::Path;

use chrono::{DateTime, Utc};
use domain_registrar_core::error::{CoreError, CoreResult};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use migration::Migrator;

/// SQLite-based unified store.
///
/// Credentials are encrypted at rest using AES-256-GCM with PBKDF2 key derivation.
///
/// If `encryption_password` is `None`, credential reads and writes return a
/// `CredentialError`; everything else still works.
pub struct SqliteStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
    /// Optional password used by `CredentialStore` encryption/decryption.
    pub(crate) encryption_password: Option<String>,
}

impl SqliteStore {
    /// Create a new `SQLite` store.
    ///
    /// - `db_path`: Path to the `SQLite` database file (created if not exists).
    /// - `encryption_password`: Password for encrypting/decrypting credentials.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn new(db_path: &Path, encryption_password: Option<String>) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = Database::connect(&db_url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        let store = Self {
            db,
            encryption_password,
        };

        // Ensure schema is up to date before the store is used.
        Migrator::up(&store.db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))?;

        log::debug!("SQLite store ready at {}", db_path.display());
        Ok(store)
    }
}

/// Parse an RFC 3339 column value.
fn parse_timestamp(column: &str, raw: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::SerializationError(format!("Invalid {column}: {e}")))
}

/// Decode a serde string enum stored as its wire name.
fn parse_wire_enum<T: serde::de::DeserializeOwned>(column: &str, raw: String) -> CoreResult<T> {
    serde_json::from_value(serde_json::Value::String(raw))
        .map_err(|e| CoreError::SerializationError(format!("Invalid {column}: {e}")))
}
