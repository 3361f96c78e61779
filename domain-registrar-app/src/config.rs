//! Application configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty file (or no
//! file at all) is a valid configuration. The credential encryption password
//! can also come from `REGISTRAR_SYNC_PASSWORD`, which wins over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use domain_registrar_core::error::{CoreError, CoreResult};
use domain_registrar_core::services::{BulkSyncOptions, MAX_BULK_CONCURRENCY};

/// Environment variable overriding `encryption_password`.
pub const PASSWORD_ENV: &str = "REGISTRAR_SYNC_PASSWORD";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `SQLite` database file (created if missing).
    pub database_path: PathBuf,

    /// Password protecting registrar credentials at rest.
    pub encryption_password: Option<String>,

    /// Registrar used when a caller does not name one.
    pub default_registrar: Option<String>,

    pub sync: SyncConfig,

    pub http: HttpConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("registrar.db"),
            encryption_password: None,
            default_registrar: None,
            sync: SyncConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| CoreError::ValidationError(format!("Invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` (defaults when it does not exist), then apply the
    /// environment password override.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                CoreError::ValidationError(format!(
                    "Failed to read configuration {}: {e}",
                    path.display()
                ))
            })?;
            Self::from_toml_str(&raw)?
        } else {
            log::info!("No configuration at {}, using defaults", path.display());
            Self::default()
        };
        Ok(config.with_password_override(std::env::var(PASSWORD_ENV).ok()))
    }

    /// Replace the password with `password` when it is non-empty.
    #[must_use]
    pub fn with_password_override(mut self, password: Option<String>) -> Self {
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.encryption_password = Some(password);
        }
        self
    }

    fn validate(&self) -> CoreResult<()> {
        if !(1..=MAX_BULK_CONCURRENCY).contains(&self.sync.concurrency) {
            return Err(CoreError::ValidationError(format!(
                "sync.concurrency must be between 1 and {MAX_BULK_CONCURRENCY}"
            )));
        }
        if self.http.timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "http.timeout_secs cannot be 0".to_string(),
            ));
        }
        if self.sync.per_domain_timeout_secs == Some(0) {
            return Err(CoreError::ValidationError(
                "sync.per_domain_timeout_secs cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Bulk sync tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Domains synced at once against one registrar.
    pub concurrency: usize,

    /// Bound on each domain's remote fetch.
    pub per_domain_timeout_secs: Option<u64>,

    /// Stop starting new domains after this many seconds.
    pub deadline_secs: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            per_domain_timeout_secs: Some(60),
            deadline_secs: None,
        }
    }
}

impl SyncConfig {
    pub fn bulk_options(&self, cancel: Option<CancellationToken>) -> BulkSyncOptions {
        BulkSyncOptions {
            concurrency: self.concurrency,
            per_domain_timeout: self.per_domain_timeout_secs.map(Duration::from_secs),
            deadline: self.deadline_secs.map(Duration::from_secs),
            cancel,
        }
    }
}

/// Registrar HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
