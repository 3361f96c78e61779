//! Registrar registry abstract Trait

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use domain_registrar_provider::{ClientOptions, RegistrarClient, create_registrar_client};

use crate::error::{CoreError, CoreResult};
use crate::traits::{CredentialStore, RegistrarStore};
use crate::types::Registrar;

/// A registrar's configuration together with a client ready to call it
#[derive(Clone)]
pub struct ResolvedRegistrar {
    pub registrar: Registrar,
    pub client: Arc<dyn RegistrarClient>,
}

impl std::fmt::Debug for ResolvedRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedRegistrar")
            .field("registrar", &self.registrar.code)
            .field("client", &self.client.id())
            .finish()
    }
}

/// Registrar Registry Trait
///
/// The only way services obtain a client. Implementations must refuse
/// inactive registrars before handing anything out.
#[async_trait]
pub trait RegistrarRegistry: Send + Sync {
    /// Resolve a registrar code
    ///
    /// # Errors
    /// * `RegistrarNotFound` - unknown code
    /// * `RegistrarInactive` - `is_active = false`
    async fn resolve(&self, code: &str) -> CoreResult<ResolvedRegistrar>;

    /// Resolve the configured default registrar
    ///
    /// # Errors
    /// * `NoDefaultRegistrar` - nothing configured
    async fn resolve_default(&self) -> CoreResult<ResolvedRegistrar>;

    /// Resolve `code`, or the default when `None`
    async fn resolve_or_default(&self, code: Option<&str>) -> CoreResult<ResolvedRegistrar> {
        match code {
            Some(code) => self.resolve(code).await,
            None => self.resolve_default().await,
        }
    }
}

/// Registry backed by the registrar and credential stores.
///
/// Configuration is re-read on every call so a registrar switched off by
/// admin CRUD is refused immediately. Built clients are cached per code;
/// call [`invalidate`](Self::invalidate) after changing a registrar's
/// endpoint or credentials.
pub struct StoreRegistrarRegistry {
    registrars: Arc<dyn RegistrarStore>,
    credentials: Arc<dyn CredentialStore>,
    default_code: Option<String>,
    timeout: Option<Duration>,
    clients: RwLock<HashMap<String, Arc<dyn RegistrarClient>>>,
}

impl StoreRegistrarRegistry {
    #[must_use]
    pub fn new(registrars: Arc<dyn RegistrarStore>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            registrars,
            credentials,
            default_code: None,
            timeout: None,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Registrar used when a caller does not name one
    #[must_use]
    pub fn with_default_code(mut self, code: Option<String>) -> Self {
        self.default_code = code.filter(|c| !c.trim().is_empty());
        self
    }

    /// Per-request timeout for clients built by this registry
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Pre-seed the client for `code` (custom adapters, tests).
    ///
    /// The registrar must still exist and be active to be resolved.
    pub async fn register_client(&self, code: impl Into<String>, client: Arc<dyn RegistrarClient>) {
        self.clients.write().await.insert(code.into(), client);
    }

    /// Drop the cached client for `code`
    pub async fn invalidate(&self, code: &str) {
        self.clients.write().await.remove(code);
    }

    async fn build_client(&self, registrar: &Registrar) -> CoreResult<Arc<dyn RegistrarClient>> {
        let credentials = self
            .credentials
            .get(&registrar.credential_ref)
            .await?
            .ok_or_else(|| {
                CoreError::CredentialError(format!(
                    "no credentials stored for registrar {}",
                    registrar.code
                ))
            })?;
        if credentials.registrar_type() != registrar.registrar_type {
            return Err(CoreError::CredentialError(format!(
                "credentials for registrar {} are for {}, expected {}",
                registrar.code,
                credentials.registrar_type(),
                registrar.registrar_type
            )));
        }

        let options = ClientOptions {
            endpoint: registrar.endpoint.clone(),
            timeout: self.timeout,
        };
        log::debug!(
            "Building {} client for registrar {}",
            registrar.registrar_type,
            registrar.code
        );
        Ok(create_registrar_client(credentials, &options)?)
    }
}

#[async_trait]
impl RegistrarRegistry for StoreRegistrarRegistry {
    async fn resolve(&self, code: &str) -> CoreResult<ResolvedRegistrar> {
        let registrar = self
            .registrars
            .find_by_code(code)
            .await?
            .ok_or_else(|| CoreError::RegistrarNotFound(code.to_string()))?;
        if !registrar.is_active {
            return Err(CoreError::RegistrarInactive(code.to_string()));
        }

        if let Some(client) = self.clients.read().await.get(code).cloned() {
            return Ok(ResolvedRegistrar { registrar, client });
        }

        let client = self.build_client(&registrar).await?;
        // Another caller may have built one meanwhile; keep the first.
        let client = self
            .clients
            .write()
            .await
            .entry(code.to_string())
            .or_insert(client)
            .clone();
        Ok(ResolvedRegistrar { registrar, client })
    }

    async fn resolve_default(&self) -> CoreResult<ResolvedRegistrar> {
        match &self.default_code {
            Some(code) => self.resolve(code).await,
            None => Err(CoreError::NoDefaultRegistrar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockCredentialStore, MockRegistrarClient, MockRegistrarStore};
    use domain_registrar_provider::{RegistrarCredentials, RegistrarType};

    fn registry(store: Arc<MockRegistrarStore>, creds: Arc<MockCredentialStore>) -> StoreRegistrarRegistry {
        StoreRegistrarRegistry::new(store, creds)
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let reg = registry(
            Arc::new(MockRegistrarStore::new()),
            Arc::new(MockCredentialStore::new()),
        );
        let err = reg.resolve("nope").await.unwrap_err();
        assert!(matches!(err, CoreError::RegistrarNotFound(ref c) if c == "nope"));
    }

    #[tokio::test]
    async fn inactive_registrar_is_refused_even_with_cached_client() {
        let store = Arc::new(MockRegistrarStore::new());
        let mut aws = Registrar::new("aws", "AWS", RegistrarType::Route53, "cred");
        aws.is_active = false;
        store.insert(aws).await;

        let reg = registry(store, Arc::new(MockCredentialStore::new()));
        let client = Arc::new(MockRegistrarClient::new());
        reg.register_client("aws", client.clone()).await;

        let err = reg.resolve("aws").await.unwrap_err();
        assert!(matches!(err, CoreError::RegistrarInactive(_)));
        assert_eq!(client.total_calls(), 0);
    }

    #[tokio::test]
    async fn missing_default_is_an_error() {
        let reg = registry(
            Arc::new(MockRegistrarStore::new()),
            Arc::new(MockCredentialStore::new()),
        )
        .with_default_code(Some("  ".to_string()));
        assert!(matches!(
            reg.resolve_default().await.unwrap_err(),
            CoreError::NoDefaultRegistrar
        ));
    }

    #[tokio::test]
    async fn builds_and_caches_client_from_credentials() {
        let store = Arc::new(MockRegistrarStore::new());
        store
            .insert(Registrar::new("gd", "GoDaddy", RegistrarType::Godaddy, "cred-gd"))
            .await;
        let creds = Arc::new(MockCredentialStore::new());
        creds
            .insert(
                "cred-gd",
                RegistrarCredentials::Godaddy {
                    api_key: "k".into(),
                    api_secret: "s".into(),
                },
            )
            .await;

        let reg = registry(store, creds).with_default_code(Some("gd".to_string()));
        let first = reg.resolve_default().await.unwrap();
        assert_eq!(first.client.id(), "godaddy");
        let second = reg.resolve("gd").await.unwrap();
        assert!(Arc::ptr_eq(&first.client, &second.client));

        reg.invalidate("gd").await;
        let third = reg.resolve("gd").await.unwrap();
        assert!(!Arc::ptr_eq(&first.client, &third.client));
    }

    #[tokio::test]
    async fn mismatched_credentials_are_rejected() {
        let store = Arc::new(MockRegistrarStore::new());
        store
            .insert(Registrar::new("aws", "AWS", RegistrarType::Route53, "cred"))
            .await;
        let creds = Arc::new(MockCredentialStore::new());
        creds
            .insert(
                "cred",
                RegistrarCredentials::Aliyun {
                    access_key_id: "a".into(),
                    access_key_secret: "b".into(),
                },
            )
            .await;

        let err = registry(store, creds).resolve("aws").await.unwrap_err();
        assert!(matches!(err, CoreError::CredentialError(_)));
    }
}
