//! 阿里云域名 / 云解析 adapter

mod error;
mod http;
mod provider;
mod sign;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::providers::common::create_http_client;

pub(crate) const ALIYUN_DOMAIN_HOST: &str = "domain.aliyuncs.com";
pub(crate) const ALIYUN_DOMAIN_VERSION: &str = "2018-01-29";
pub(crate) const ALIYUN_DNS_HOST: &str = "alidns.cn-hangzhou.aliyuncs.com";
pub(crate) const ALIYUN_DNS_VERSION: &str = "2015-01-09";
/// 空 body 的 SHA256 hash (固定值)
pub(crate) const EMPTY_BODY_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
/// 云解析 API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE: u32 = 500;

/// Which Aliyun product API a call goes to. Both share the ACS3 signature.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AliyunApi {
    /// Domain registration (`CheckDomain`, order tasks).
    Domain,
    /// Authoritative DNS (`DescribeDomainRecords`).
    Dns,
}

/// Aliyun (Alibaba Cloud) registrar adapter.
///
/// Authenticates via ACS3-HMAC-SHA256 signing with Access Key ID/Secret.
///
/// ```rust,no_run
/// use domain_registrar_provider::AliyunClient;
///
/// let client = AliyunClient::new(
///     "your-access-key-id".to_string(),
///     "your-access-key-secret".to_string(),
/// );
/// ```
pub struct AliyunClient {
    pub(crate) client: Client,
    pub(crate) access_key_id: String,
    pub(crate) access_key_secret: String,
    pub(crate) domain_host: String,
    pub(crate) dns_host: String,
}

/// Builder for [`AliyunClient`].
pub struct AliyunClientBuilder {
    access_key_id: String,
    access_key_secret: String,
    domain_host: String,
    dns_host: String,
    timeout: Option<Duration>,
}

impl AliyunClientBuilder {
    fn new(access_key_id: String, access_key_secret: String) -> Self {
        Self {
            access_key_id,
            access_key_secret,
            domain_host: ALIYUN_DOMAIN_HOST.to_string(),
            dns_host: ALIYUN_DNS_HOST.to_string(),
            timeout: None,
        }
    }

    /// Override the Domain API host (e.g. `domain-intl.aliyuncs.com`).
    pub fn endpoint(mut self, host: impl Into<String>) -> Self {
        self.domain_host = strip_scheme(&host.into());
        self
    }

    /// Override the DNS API host (regional endpoint).
    pub fn dns_endpoint(mut self, host: impl Into<String>) -> Self {
        self.dns_host = strip_scheme(&host.into());
        self
    }

    /// Request timeout (default 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> AliyunClient {
        AliyunClient {
            client: create_http_client(self.timeout),
            access_key_id: self.access_key_id,
            access_key_secret: self.access_key_secret,
            domain_host: self.domain_host,
            dns_host: self.dns_host,
        }
    }
}

fn strip_scheme(host: &str) -> String {
    host.trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

impl AliyunClient {
    /// Creates a client against the default public endpoints.
    pub fn new(access_key_id: String, access_key_secret: String) -> Self {
        Self::builder(access_key_id, access_key_secret).build()
    }

    pub fn builder(access_key_id: String, access_key_secret: String) -> AliyunClientBuilder {
        AliyunClientBuilder::new(access_key_id, access_key_secret)
    }

    pub(crate) fn host_and_version(&self, api: AliyunApi) -> (&str, &'static str) {
        match api {
            AliyunApi::Domain => (self.domain_host.as_str(), ALIYUN_DOMAIN_VERSION),
            AliyunApi::Dns => (self.dns_host.as_str(), ALIYUN_DNS_VERSION),
        }
    }
}
