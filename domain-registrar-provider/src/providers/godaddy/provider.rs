//! `GoDaddy` `RegistrarClient` trait 实现

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;

use crate::error::Result;
use crate::providers::common::{normalize_domain_name, parse_record_type, relative_record_name};
use crate::traits::{ErrorContext, ProviderErrorMapper, RegistrarClient};
use crate::types::{
    Availability, AvailabilityQuote, CredentialField, DnsRecordType, FieldType,
    PaginatedResponse, PaginationParams, Price, RegistrarCapabilities, RegistrarMetadata,
    RegistrarType, RegistrationReceipt, RegistrationRequest, RemoteDnsRecord,
};

use super::types::{
    GodaddyAvailability, GodaddyConsent, GodaddyContact, GodaddyDnsRecord, GodaddyPurchase,
    GodaddyPurchaseResponse,
};
use super::{GodaddyClient, MAX_PAGE_SIZE_RECORDS};

/// Default TTL `GoDaddy` applies when a record omits one.
const DEFAULT_TTL: u32 = 3600;

impl GodaddyClient {
    fn capabilities_static() -> RegistrarCapabilities {
        RegistrarCapabilities {
            availability: true,
            registration: true,
            dns_records: true,
            authoritative_record_types: DnsRecordType::ALL.to_vec(),
        }
    }

    pub(crate) fn to_remote_record(
        &self,
        record: GodaddyDnsRecord,
        zone_name: &str,
    ) -> Option<RemoteDnsRecord> {
        let record_type = parse_record_type(&record.record_type, self.provider_name())?;
        let value = match (record_type, record.weight, record.port) {
            (DnsRecordType::Srv, Some(weight), Some(port)) => {
                format!("{weight} {port} {}", record.data)
            }
            _ => record.data,
        };
        let priority = match record_type {
            DnsRecordType::Mx | DnsRecordType::Srv => record.priority,
            _ => None,
        };

        Some(RemoteDnsRecord {
            record_type,
            name: relative_record_name(&record.name, zone_name),
            value,
            ttl: record.ttl.unwrap_or(DEFAULT_TTL),
            priority,
        })
    }
}

#[async_trait]
impl RegistrarClient for GodaddyClient {
    fn id(&self) -> &'static str {
        "godaddy"
    }

    fn metadata() -> RegistrarMetadata {
        RegistrarMetadata {
            id: RegistrarType::Godaddy,
            name: "GoDaddy".to_string(),
            description: "GoDaddy reseller domains API".to_string(),
            required_fields: vec![
                CredentialField {
                    key: "apiKey".to_string(),
                    label: "API Key".to_string(),
                    field_type: FieldType::Text,
                    help_text: None,
                },
                CredentialField {
                    key: "apiSecret".to_string(),
                    label: "API Secret".to_string(),
                    field_type: FieldType::Password,
                    help_text: None,
                },
            ],
            capabilities: Self::capabilities_static(),
            max_page_size_records: MAX_PAGE_SIZE_RECORDS,
        }
    }

    fn capabilities(&self) -> RegistrarCapabilities {
        Self::capabilities_static()
    }

    fn record_page_size(&self) -> u32 {
        MAX_PAGE_SIZE_RECORDS
    }

    async fn query_availability(&self, domain_name: &str) -> Result<AvailabilityQuote> {
        let domain = normalize_domain_name(domain_name);
        let path = format!(
            "/v1/domains/available?domain={}&checkType=FULL&forTransfer=false",
            urlencoding::encode(&domain)
        );
        let resp: GodaddyAvailability = self
            .request::<_, ()>(Method::GET, &path, None, ErrorContext::for_domain(&domain))
            .await?;

        let availability = match (resp.definitive, resp.available) {
            (false, _) => Availability::Unknown,
            (true, true) => Availability::Available,
            (true, false) => Availability::Unavailable,
        };
        let price = resp.price.map(|amount_micros| Price {
            amount_micros,
            currency: resp.currency.clone().unwrap_or_else(|| "USD".to_string()),
        });

        Ok(AvailabilityQuote {
            domain_name: resp.domain.to_ascii_lowercase(),
            availability,
            price,
            note: (!resp.definitive).then(|| "answer is not definitive".to_string()),
        })
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationReceipt> {
        let domain = normalize_domain_name(&request.domain_name);
        let contact = || GodaddyContact::from(&request.registrant);
        let body = GodaddyPurchase {
            domain: domain.clone(),
            consent: GodaddyConsent {
                agreed_at: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                agreed_by: self.consent_ip.clone(),
                agreement_keys: vec!["DNRA".to_string()],
            },
            contact_admin: contact(),
            contact_billing: contact(),
            contact_registrant: contact(),
            contact_tech: contact(),
            name_servers: request.nameservers.clone(),
            period: request.period_years,
            privacy: false,
            renew_auto: request.auto_renew,
        };

        log::info!(
            "[{}] Purchasing {domain} for {} year(s)",
            self.provider_name(),
            request.period_years
        );
        let resp: GodaddyPurchaseResponse = self
            .request(
                Method::POST,
                "/v1/domains/purchase",
                Some(&body),
                ErrorContext::for_domain(&domain),
            )
            .await?;

        let message = match (resp.total, resp.currency) {
            (Some(total), Some(currency)) => {
                Some(format!("order placed, total {total} {currency} (micro-units)"))
            }
            _ => Some("order placed".to_string()),
        };

        // Purchase is asynchronous; expiry is unknown until the order completes.
        Ok(RegistrationReceipt {
            reference_id: resp.order_id.to_string(),
            expires_at: None,
            message,
        })
    }

    async fn list_dns_records(
        &self,
        domain_name: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<RemoteDnsRecord>> {
        let domain = normalize_domain_name(domain_name);
        let params = params.validated(MAX_PAGE_SIZE_RECORDS);
        let path = format!(
            "/v1/domains/{}/records?offset={}&limit={}",
            urlencoding::encode(&domain),
            params.offset(),
            params.page_size
        );
        let records: Vec<GodaddyDnsRecord> = self
            .request::<_, ()>(Method::GET, &path, None, ErrorContext::for_domain(&domain))
            .await?;

        // Paging is decided on the raw count, before unsupported types are dropped.
        let raw_len = u32::try_from(records.len()).unwrap_or(u32::MAX);
        let items = records
            .into_iter()
            .filter_map(|r| self.to_remote_record(r, &domain))
            .collect();

        let mut page = PaginatedResponse::without_total(items, params.page, params.page_size);
        page.has_more = raw_len >= params.page_size;
        Ok(page)
    }
}
