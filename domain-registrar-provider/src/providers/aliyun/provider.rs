//! 阿里云 `RegistrarClient` trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::common::{normalize_domain_name, parse_record_type, relative_record_name};
use crate::traits::{ErrorContext, ProviderErrorMapper, RegistrarClient};
use crate::types::{
    Availability, AvailabilityQuote, CredentialField, DnsRecordType, FieldType,
    PaginatedResponse, PaginationParams, Price, RegistrantContact, RegistrarCapabilities,
    RegistrarMetadata, RegistrarType, RegistrationReceipt, RegistrationRequest, RemoteDnsRecord,
};

use super::types::{
    AliyunRecord, CheckDomainRequest, CheckDomainResponse, CreateOrderActivateRequest,
    CreateOrderActivateResponse, DescribeDomainRecordsRequest, DescribeDomainRecordsResponse,
};
use super::{AliyunApi, AliyunClient, MAX_PAGE_SIZE};

/// Split `+86.13800000000` into (`86`, `13800000000`).
fn split_phone(phone: &str) -> (String, String) {
    let trimmed = phone.trim().trim_start_matches('+');
    match trimmed.split_once('.') {
        Some((area, number)) => (area.to_string(), number.to_string()),
        None => (String::new(), trimmed.to_string()),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn yuan_to_micros(amount: f64) -> Option<u64> {
    (amount.is_finite() && amount >= 0.0).then(|| (amount * 1_000_000.0).round() as u64)
}

impl AliyunClient {
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
        record: AliyunRecord,
        zone_name: &str,
    ) -> Option<RemoteDnsRecord> {
        if record
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("DISABLE"))
        {
            return None;
        }
        let record_type = parse_record_type(&record.record_type, self.provider_name())?;
        Some(RemoteDnsRecord {
            record_type,
            name: relative_record_name(&record.rr, zone_name),
            value: record.value,
            ttl: record.ttl,
            priority: if record_type == DnsRecordType::Mx {
                record.priority
            } else {
                None
            },
        })
    }

    pub(crate) fn quote_from_check(
        domain_name: &str,
        resp: &CheckDomainResponse,
    ) -> AvailabilityQuote {
        let availability = match resp.avail_code() {
            Some(1) => Availability::Available,
            Some(0 | -2 | -3) => Availability::Unavailable,
            _ => Availability::Unknown,
        };
        let note = match (resp.is_premium(), resp.reason.as_deref()) {
            (true, Some(reason)) => Some(format!("premium: {reason}")),
            (true, None) => Some("premium".to_string()),
            (false, reason) => reason.filter(|r| !r.is_empty()).map(str::to_string),
        };

        AvailabilityQuote {
            domain_name: resp
                .domain_name
                .as_deref()
                .map_or_else(|| domain_name.to_string(), normalize_domain_name),
            availability,
            price: resp.price.and_then(yuan_to_micros).map(|amount_micros| Price {
                amount_micros,
                currency: "CNY".to_string(),
            }),
            note,
        }
    }

    fn order_request(request: &RegistrationRequest) -> CreateOrderActivateRequest {
        let RegistrantContact {
            organization,
            email,
            phone,
            address_line1,
            address_line2,
            city,
            state_province,
            postal_code,
            country,
            ..
        } = &request.registrant;
        let (tel_area, telephone) = split_phone(phone);
        let address = match address_line2 {
            Some(line2) if !line2.is_empty() => format!("{address_line1}, {line2}"),
            _ => address_line1.clone(),
        };

        CreateOrderActivateRequest {
            domain_name: normalize_domain_name(&request.domain_name),
            subscription_duration: request.period_years,
            registrant_type: if organization.is_some() { "2" } else { "1" }.to_string(),
            registrant_name: request.registrant.full_name(),
            registrant_organization: organization
                .clone()
                .unwrap_or_else(|| request.registrant.full_name()),
            email: email.clone(),
            tel_area,
            telephone,
            address,
            city: city.clone(),
            province: state_province.clone(),
            country: country.to_ascii_uppercase(),
            postal_code: postal_code.clone(),
            dns1: request.nameservers.first().cloned(),
            dns2: request.nameservers.get(1).cloned(),
            enable_domain_proxy: false,
            permit_premium_activation: false,
        }
    }
}

#[async_trait]
impl RegistrarClient for AliyunClient {
    fn id(&self) -> &'static str {
        "aliyun"
    }

    fn metadata() -> RegistrarMetadata {
        RegistrarMetadata {
            id: RegistrarType::Aliyun,
            name: "阿里云".to_string(),
            description: "阿里云域名注册与云解析 DNS".to_string(),
            required_fields: vec![
                CredentialField {
                    key: "accessKeyId".to_string(),
                    label: "AccessKey ID".to_string(),
                    field_type: FieldType::Text,
                    help_text: None,
                },
                CredentialField {
                    key: "accessKeySecret".to_string(),
                    label: "AccessKey Secret".to_string(),
                    field_type: FieldType::Password,
                    help_text: Some("需要 AliyunDomainFullAccess 与 AliyunDNSReadOnlyAccess 权限".to_string()),
                },
            ],
            capabilities: Self::capabilities_static(),
            max_page_size_records: MAX_PAGE_SIZE,
        }
    }

    fn capabilities(&self) -> RegistrarCapabilities {
        Self::capabilities_static()
    }

    fn record_page_size(&self) -> u32 {
        MAX_PAGE_SIZE
    }

    async fn query_availability(&self, domain_name: &str) -> Result<AvailabilityQuote> {
        let domain = normalize_domain_name(domain_name);
        let req = CheckDomainRequest {
            domain_name: domain.clone(),
            fee_command: "create".to_string(),
            fee_currency: "CNY".to_string(),
            fee_period: 1,
        };
        let resp: CheckDomainResponse = self
            .request(
                AliyunApi::Domain,
                "CheckDomain",
                &req,
                ErrorContext::for_domain(&domain),
            )
            .await?;
        Ok(Self::quote_from_check(&domain, &resp))
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationReceipt> {
        let req = Self::order_request(request);
        log::info!(
            "[aliyun] Creating activation order for {} ({} year(s))",
            req.domain_name,
            req.subscription_duration
        );
        let ctx = ErrorContext::for_domain(&req.domain_name);
        let resp: CreateOrderActivateResponse = self
            .request(
                AliyunApi::Domain,
                "SaveSingleTaskForCreatingOrderActivate",
                &req,
                ctx,
            )
            .await?;

        // The order runs as a background task; expiry is known only once it completes.
        Ok(RegistrationReceipt {
            reference_id: resp.task_no,
            expires_at: None,
            message: Some("activation task submitted".to_string()),
        })
    }

    async fn list_dns_records(
        &self,
        domain_name: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<RemoteDnsRecord>> {
        let domain = normalize_domain_name(domain_name);
        let params = params.validated(MAX_PAGE_SIZE);
        let req = DescribeDomainRecordsRequest {
            domain_name: domain.clone(),
            page_number: params.page,
            page_size: params.page_size,
        };
        let resp: DescribeDomainRecordsResponse = self
            .request(
                AliyunApi::Dns,
                "DescribeDomainRecords",
                &req,
                ErrorContext::for_domain(&domain),
            )
            .await?;

        let total_count = resp.total_count.unwrap_or(0);
        let items = resp
            .domain_records
            .and_then(|w| w.record)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| self.to_remote_record(r, &domain))
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.page,
            params.page_size,
            total_count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> RegistrantContact {
        RegistrantContact {
            first_name: "San".to_string(),
            last_name: "Zhang".to_string(),
            organization: None,
            email: "zs@example.cn".to_string(),
            phone: "+86.13800000000".to_string(),
            address_line1: "1 Wensan Rd".to_string(),
            address_line2: Some("Room 2".to_string()),
            city: "Hangzhou".to_string(),
            state_province: "Zhejiang".to_string(),
            postal_code: "310000".to_string(),
            country: "cn".to_string(),
        }
    }

    #[test]
    fn phone_is_split_on_dot() {
        assert_eq!(
            split_phone("+86.13800000000"),
            ("86".to_string(), "13800000000".to_string())
        );
        assert_eq!(split_phone("5550100"), (String::new(), "5550100".to_string()));
    }

    #[test]
    fn order_request_for_individual() {
        let req = AliyunClient::order_request(&RegistrationRequest {
            domain_name: "Example.CN".to_string(),
            registrant: contact(),
            period_years: 2,
            nameservers: vec!["ns1.alidns.com".to_string()],
            auto_renew: false,
        });
        assert_eq!(req.domain_name, "example.cn");
        assert_eq!(req.registrant_type, "1");
        assert_eq!(req.registrant_organization, "San Zhang");
        assert_eq!(req.address, "1 Wensan Rd, Room 2");
        assert_eq!(req.country, "CN");
        assert_eq!(req.dns1.as_deref(), Some("ns1.alidns.com"));
        assert!(req.dns2.is_none());
    }

    #[test]
    fn check_domain_mapping() {
        let taken: CheckDomainResponse =
            serde_json::from_str(r#"{"DomainName":"taken.cn","Avail":"0"}"#).unwrap();
        let quote = AliyunClient::quote_from_check("taken.cn", &taken);
        assert_eq!(quote.availability, Availability::Unavailable);

        let odd: CheckDomainResponse =
            serde_json::from_str(r#"{"Avail":"-1","Reason":"registry timeout"}"#).unwrap();
        let quote = AliyunClient::quote_from_check("odd.cn", &odd);
        assert_eq!(quote.availability, Availability::Unknown);
        assert_eq!(quote.domain_name, "odd.cn");
        assert_eq!(quote.note.as_deref(), Some("registry timeout"));

        let free: CheckDomainResponse =
            serde_json::from_str(r#"{"Avail":1,"Price":29.5}"#).unwrap();
        let quote = AliyunClient::quote_from_check("free.cn", &free);
        assert_eq!(quote.availability, Availability::Available);
        assert_eq!(quote.price.map(|p| p.amount_micros), Some(29_500_000));
    }

    #[test]
    fn disabled_records_are_skipped() {
        let client = AliyunClient::new(String::new(), String::new());
        let rec = |status: &str| AliyunRecord {
            rr: "www".to_string(),
            record_type: "A".to_string(),
            value: "1.1.1.1".to_string(),
            ttl: 600,
            priority: Some(1),
            status: Some(status.to_string()),
        };
        assert!(client.to_remote_record(rec("DISABLE"), "example.cn").is_none());
        let enabled = client.to_remote_record(rec("ENABLE"), "example.cn").unwrap();
        assert_eq!(enabled.priority, None);
        assert_eq!(enabled.name, "www");
    }
}
