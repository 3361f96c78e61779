//! `GoDaddy` reseller API adapter

mod error;
mod http;
mod provider;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::providers::common::create_http_client;

pub(crate) const GODADDY_API_BASE: &str = "https://api.godaddy.com";
/// Operational test environment.
pub const GODADDY_OTE_API_BASE: &str = "https://api.ote-godaddy.com";
/// `GoDaddy` records API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 500;

/// `GoDaddy` registrar adapter.
///
/// Authenticates with an `sso-key` header built from the API key and secret.
///
/// ```rust,no_run
/// use domain_registrar_provider::{GodaddyClient, GODADDY_OTE_API_BASE};
///
/// let client = GodaddyClient::builder("key".to_string(), "secret".to_string())
///     .endpoint(GODADDY_OTE_API_BASE)
///     .build();
/// ```
pub struct GodaddyClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) api_secret: String,
    pub(crate) base_url: String,
    pub(crate) consent_ip: String,
}

/// Builder for [`GodaddyClient`].
pub struct GodaddyClientBuilder {
    api_key: String,
    api_secret: String,
    base_url: String,
    consent_ip: String,
    timeout: Option<Duration>,
}

impl GodaddyClientBuilder {
    fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
            base_url: GODADDY_API_BASE.to_string(),
            consent_ip: "127.0.0.1".to_string(),
            timeout: None,
        }
    }

    /// Override the API base URL (e.g. the OTE environment).
    pub fn endpoint(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Request timeout (default 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// IP address recorded as having agreed to the registration agreement.
    pub fn consent_ip(mut self, ip: impl Into<String>) -> Self {
        self.consent_ip = ip.into();
        self
    }

    pub fn build(self) -> GodaddyClient {
        GodaddyClient {
            client: create_http_client(self.timeout),
            api_key: self.api_key,
            api_secret: self.api_secret,
            base_url: self.base_url,
            consent_ip: self.consent_ip,
        }
    }
}

impl GodaddyClient {
    /// Creates a client against the production API.
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self::builder(api_key, api_secret).build()
    }

    pub fn builder(api_key: String, api_secret: String) -> GodaddyClientBuilder {
        GodaddyClientBuilder::new(api_key, api_secret)
    }
}
