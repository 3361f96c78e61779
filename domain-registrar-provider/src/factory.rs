//! Registrar client factory and metadata.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::traits::RegistrarClient;
use crate::types::{RegistrarCredentials, RegistrarMetadata};
use crate::utils::log_sanitizer::mask_secret;

#[cfg(feature = "aliyun")]
use crate::providers::AliyunClient;
#[cfg(feature = "godaddy")]
use crate::providers::GodaddyClient;
#[cfg(feature = "route53")]
use crate::providers::Route53Client;

/// Connection settings applied to a freshly built client.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Override of the registrar's API endpoint (sandbox, VPC endpoint, mock).
    pub endpoint: Option<String>,
    /// Per-request timeout. Adapters default to 30 seconds.
    pub timeout: Option<Duration>,
}

/// Creates a [`RegistrarClient`] from the given credentials.
///
/// The adapter is chosen by the [`RegistrarCredentials`] variant. The result
/// is wrapped in `Arc<dyn RegistrarClient>` so it can be cached and shared
/// across tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use domain_registrar_provider::{create_registrar_client, ClientOptions, RegistrarCredentials};
///
/// let client = create_registrar_client(
///     RegistrarCredentials::Godaddy {
///         api_key: "key".to_string(),
///         api_secret: "secret".to_string(),
///     },
///     &ClientOptions::default(),
/// )
/// .unwrap();
/// ```
pub fn create_registrar_client(
    credentials: RegistrarCredentials,
    options: &ClientOptions,
) -> Result<Arc<dyn RegistrarClient>> {
    match credentials {
        #[cfg(feature = "godaddy")]
        RegistrarCredentials::Godaddy {
            api_key,
            api_secret,
        } => {
            log::debug!("[godaddy] Building client for key {}", mask_secret(&api_key));
            let mut builder = GodaddyClient::builder(api_key, api_secret);
            if let Some(endpoint) = &options.endpoint {
                builder = builder.endpoint(endpoint.clone());
            }
            if let Some(timeout) = options.timeout {
                builder = builder.timeout(timeout);
            }
            Ok(Arc::new(builder.build()))
        }
        #[cfg(feature = "aliyun")]
        RegistrarCredentials::Aliyun {
            access_key_id,
            access_key_secret,
        } => {
            log::debug!("[aliyun] Building client for key {}", mask_secret(&access_key_id));
            let mut builder = AliyunClient::builder(access_key_id, access_key_secret);
            if let Some(endpoint) = &options.endpoint {
                builder = builder.endpoint(endpoint.clone());
            }
            if let Some(timeout) = options.timeout {
                builder = builder.timeout(timeout);
            }
            Ok(Arc::new(builder.build()))
        }
        #[cfg(feature = "route53")]
        RegistrarCredentials::Route53 {
            access_key_id,
            secret_access_key,
        } => {
            log::debug!("[route53] Building client for key {}", mask_secret(&access_key_id));
            let mut builder = Route53Client::builder(access_key_id, secret_access_key);
            if let Some(endpoint) = &options.endpoint {
                builder = builder.endpoint(endpoint.clone());
            }
            if let Some(timeout) = options.timeout {
                builder = builder.timeout(timeout);
            }
            Ok(Arc::new(builder.build()))
        }
    }
}

/// Returns metadata for every registrar enabled via feature flags.
pub fn get_all_registrar_metadata() -> Vec<RegistrarMetadata> {
    vec![
        #[cfg(feature = "godaddy")]
        GodaddyClient::metadata(),
        #[cfg(feature = "aliyun")]
        AliyunClient::metadata(),
        #[cfg(feature = "route53")]
        Route53Client::metadata(),
    ]
}

#[cfg(all(test, feature = "all-providers"))]
mod tests {
    use super::*;
    use crate::types::RegistrarType;

    #[test]
    fn metadata_covers_every_registrar() {
        let ids: Vec<RegistrarType> = get_all_registrar_metadata().iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec![RegistrarType::Godaddy, RegistrarType::Aliyun, RegistrarType::Route53]
        );
    }

    #[test]
    fn factory_picks_adapter_by_credentials() {
        let options = ClientOptions {
            endpoint: Some("https://mock.invalid".to_string()),
            timeout: Some(Duration::from_secs(5)),
        };
        let client = create_registrar_client(
            RegistrarCredentials::Route53 {
                access_key_id: "AKID".to_string(),
                secret_access_key: "secret".to_string(),
            },
            &options,
        )
        .unwrap();
        assert_eq!(client.id(), "route53");
        assert!(!client.capabilities().dns_records);

        let client = create_registrar_client(
            RegistrarCredentials::Godaddy {
                api_key: "k".to_string(),
                api_secret: "s".to_string(),
            },
            &options,
        )
        .unwrap();
        assert_eq!(client.id(), "godaddy");
    }
}
