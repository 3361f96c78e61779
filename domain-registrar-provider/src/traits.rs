use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::error::{RegistrarError, Result};
use crate::types::{
    AvailabilityQuote, DomainAvailabilityResult, PaginatedResponse, PaginationParams,
    RegistrarCapabilities, RegistrarMetadata, RegistrationReceipt, RegistrationRequest,
    RemoteDnsRecord,
};

/// Upper bound on pages walked by [`RegistrarClient::stream_dns_records`].
pub const MAX_RECORD_PAGES: u32 = 200;

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Registrar 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
    /// HTTP status, when the error came with one.
    pub status: Option<u16>,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 域名（用于 `DomainNotFound` / `DomainUnavailable`）
    pub domain: Option<String>,
    /// Request parameter the error most likely refers to.
    pub param: Option<String>,
}

impl ErrorContext {
    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            param: None,
        }
    }
}

/// Registrar 错误映射 Trait（内部使用）
/// 各 adapter 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Registrar 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> RegistrarError;

    fn parse_error(&self, detail: impl ToString) -> RegistrarError {
        RegistrarError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    fn unknown_error(&self, raw: RawApiError) -> RegistrarError {
        RegistrarError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }

    /// Shared fallback on HTTP status for codes an adapter has not mapped.
    fn map_by_status(&self, raw: RawApiError, context: ErrorContext) -> RegistrarError {
        let provider = self.provider_name().to_string();
        match raw.status {
            Some(401) => RegistrarError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },
            Some(403) => RegistrarError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },
            Some(404) => RegistrarError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_default(),
                raw_message: Some(raw.message),
            },
            Some(408) => RegistrarError::Timeout {
                provider,
                detail: raw.message,
            },
            Some(s) if s >= 500 => RegistrarError::NetworkError {
                provider,
                detail: format!("HTTP {s}: {}", raw.message),
            },
            _ => self.unknown_error(raw),
        }
    }
}

/// Uniform capability set every registrar adapter implements.
///
/// Adding a registrar means adding one implementation of this trait; nothing
/// above it changes.
#[async_trait]
pub trait RegistrarClient: Send + Sync {
    /// Registrar identifier.
    fn id(&self) -> &'static str;

    /// Type-level metadata, available before any client is built.
    fn metadata() -> RegistrarMetadata
    where
        Self: Sized;

    /// Operations this client supports.
    fn capabilities(&self) -> RegistrarCapabilities;

    /// Page size used when walking DNS records.
    fn record_page_size(&self) -> u32 {
        100
    }

    /// Ask the registrar whether `domain_name` can be registered.
    ///
    /// Read-only on both sides.
    async fn query_availability(&self, domain_name: &str) -> Result<AvailabilityQuote>;

    /// Availability lookup that fails closed.
    ///
    /// Any error becomes [`Availability::Unknown`](crate::Availability::Unknown)
    /// with the error text as the reason. Never reports `Available` on error.
    async fn check_availability(&self, domain_name: &str) -> DomainAvailabilityResult {
        match self.query_availability(domain_name).await {
            Ok(quote) => quote.into(),
            Err(e) => {
                if e.is_expected() {
                    log::warn!("[{}] Availability check for {domain_name} failed: {e}", self.id());
                } else {
                    log::error!("[{}] Availability check for {domain_name} failed: {e}", self.id());
                }
                DomainAvailabilityResult::unknown(domain_name, e.to_string())
            }
        }
    }

    /// Submit a registration.
    ///
    /// Sent once and never retried here. On `Timeout`/`NetworkError` the
    /// registrar may have completed the registration anyway.
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationReceipt>;

    /// One page of the domain's DNS records.
    async fn list_dns_records(
        &self,
        domain_name: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<RemoteDnsRecord>> {
        let _ = (domain_name, params);
        Err(RegistrarError::Unsupported {
            provider: self.id().to_string(),
            capability: "dns_records".to_string(),
        })
    }

    /// Lazily walk every page of the domain's DNS records.
    ///
    /// Pages are requested as the stream is polled. Each call starts again
    /// from page 1, so a dropped stream can simply be recreated. A listing
    /// that still reports more pages after [`MAX_RECORD_PAGES`] is an error.
    fn stream_dns_records<'a>(
        &'a self,
        domain_name: &'a str,
    ) -> BoxStream<'a, Result<RemoteDnsRecord>> {
        let page_size = self.record_page_size();
        stream::try_unfold(Some(1_u32), move |next| async move {
            let Some(page) = next else {
                return Ok(None);
            };
            if page > MAX_RECORD_PAGES {
                return Err(RegistrarError::ParseError {
                    provider: self.id().to_string(),
                    detail: format!(
                        "record listing for {domain_name} exceeded {MAX_RECORD_PAGES} pages"
                    ),
                });
            }
            let resp = self
                .list_dns_records(domain_name, &PaginationParams { page, page_size })
                .await?;
            // Adapters drop unsupported or disabled records after paging, so
            // an empty page does not end the listing; only `has_more` does.
            let next = resp.has_more.then_some(page + 1);
            Ok(Some((stream::iter(resp.items.into_iter().map(Ok)), next)))
        })
        .try_flatten()
        .boxed()
    }

    /// Snapshot of the domain's full remote record set at call time.
    async fn fetch_dns_records(&self, domain_name: &str) -> Result<Vec<RemoteDnsRecord>> {
        self.stream_dns_records(domain_name).try_collect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DnsRecordType, RegistrarType};

    /// Serves scripted pages. An empty page stands for one whose records were
    /// all filtered out by the adapter.
    struct PagedClient {
        pages: Vec<Vec<RemoteDnsRecord>>,
        endless: bool,
    }

    fn a_record(value: &str) -> RemoteDnsRecord {
        RemoteDnsRecord {
            record_type: DnsRecordType::A,
            name: "@".to_string(),
            value: value.to_string(),
            ttl: 300,
            priority: None,
        }
    }

    #[async_trait]
    impl RegistrarClient for PagedClient {
        fn id(&self) -> &'static str {
            "paged"
        }

        fn metadata() -> RegistrarMetadata {
            RegistrarMetadata {
                id: RegistrarType::Godaddy,
                name: "Paged".to_string(),
                description: String::new(),
                required_fields: Vec::new(),
                capabilities: RegistrarCapabilities {
                    availability: false,
                    registration: false,
                    dns_records: true,
                    authoritative_record_types: DnsRecordType::ALL.to_vec(),
                },
                max_page_size_records: 2,
            }
        }

        fn capabilities(&self) -> RegistrarCapabilities {
            Self::metadata().capabilities
        }

        async fn query_availability(&self, _domain_name: &str) -> Result<AvailabilityQuote> {
            unimplemented!()
        }

        async fn register(&self, _request: &RegistrationRequest) -> Result<RegistrationReceipt> {
            unimplemented!()
        }

        async fn list_dns_records(
            &self,
            _domain_name: &str,
            params: &PaginationParams,
        ) -> Result<PaginatedResponse<RemoteDnsRecord>> {
            let index = usize::try_from(params.page - 1).unwrap();
            let items = self.pages.get(index).cloned().unwrap_or_default();
            let mut page = PaginatedResponse::without_total(items, params.page, params.page_size);
            page.has_more = self.endless || index + 1 < self.pages.len();
            Ok(page)
        }
    }

    #[tokio::test]
    async fn walks_past_pages_emptied_by_filtering() {
        let client = PagedClient {
            pages: vec![
                vec![a_record("192.0.2.1"), a_record("192.0.2.2")],
                Vec::new(),
                vec![a_record("192.0.2.3")],
            ],
            endless: false,
        };
        let values: Vec<String> = client
            .fetch_dns_records("example.com")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(values, vec!["192.0.2.1", "192.0.2.2", "192.0.2.3"]);
    }

    #[tokio::test]
    async fn leading_empty_page_does_not_end_listing() {
        let client = PagedClient {
            pages: vec![Vec::new(), vec![a_record("192.0.2.9")]],
            endless: false,
        };
        let records = client.fetch_dns_records("example.com").await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn endless_listing_stops_at_page_cap() {
        let client = PagedClient {
            pages: Vec::new(),
            endless: true,
        };
        let err = client.fetch_dns_records("example.com").await.unwrap_err();
        assert!(matches!(err, RegistrarError::ParseError { .. }), "{err:?}");
    }
}
