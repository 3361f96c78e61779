//! Amazon Route 53 Domains adapter

mod error;
mod http;
mod provider;
mod sign;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::providers::common::create_http_client;

use sign::SigV4Signer;

/// Route 53 Domains is only served from `us-east-1`.
pub(crate) const ROUTE53_DOMAINS_REGION: &str = "us-east-1";
pub(crate) const ROUTE53_DOMAINS_HOST: &str = "route53domains.us-east-1.amazonaws.com";
pub(crate) const ROUTE53_DOMAINS_SERVICE: &str = "route53domains";
pub(crate) const ROUTE53_TARGET_PREFIX: &str = "Route53Domains_v20140515";

/// Route 53 Domains registrar adapter.
///
/// Speaks the AWS JSON 1.1 protocol with Signature Version 4. Supports
/// availability checks and registration; zone records live in the separate
/// Route 53 hosted-zone API and are not listed by this adapter.
pub struct Route53Client {
    pub(crate) client: Client,
    pub(crate) signer: SigV4Signer,
    pub(crate) host: String,
}

/// Builder for [`Route53Client`].
pub struct Route53ClientBuilder {
    access_key_id: String,
    secret_access_key: String,
    host: String,
    timeout: Option<Duration>,
}

impl Route53ClientBuilder {
    fn new(access_key_id: String, secret_access_key: String) -> Self {
        Self {
            access_key_id,
            secret_access_key,
            host: ROUTE53_DOMAINS_HOST.to_string(),
            timeout: None,
        }
    }

    /// Override the endpoint host (e.g. a VPC endpoint).
    pub fn endpoint(mut self, host: impl Into<String>) -> Self {
        self.host = host
            .into()
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();
        self
    }

    /// Request timeout (default 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Route53Client {
        Route53Client {
            client: create_http_client(self.timeout),
            signer: SigV4Signer {
                access_key_id: self.access_key_id,
                secret_access_key: self.secret_access_key,
                region: ROUTE53_DOMAINS_REGION.to_string(),
                service: ROUTE53_DOMAINS_SERVICE.to_string(),
            },
            host: self.host,
        }
    }
}

impl Route53Client {
    pub fn new(access_key_id: String, secret_access_key: String) -> Self {
        Self::builder(access_key_id, secret_access_key).build()
    }

    pub fn builder(access_key_id: String, secret_access_key: String) -> Route53ClientBuilder {
        Route53ClientBuilder::new(access_key_id, secret_access_key)
    }
}
