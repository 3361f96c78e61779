//! Route 53 Domains `RegistrarClient` trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::common::normalize_domain_name;
use crate::traits::{ErrorContext, ProviderErrorMapper, RegistrarClient};
use crate::types::{
    Availability, AvailabilityQuote, CredentialField, FieldType, RegistrarCapabilities,
    RegistrarMetadata, RegistrarType, RegistrationReceipt, RegistrationRequest,
};

use super::Route53Client;
use super::types::{
    CheckDomainAvailabilityRequest, CheckDomainAvailabilityResponse, ContactDetail,
    RegisterDomainRequest, RegisterDomainResponse,
};

/// Map a `DomainAvailability` value.
///
/// `RESERVED` and every `UNAVAILABLE*` flavour are definite no; `DONT_KNOW`
/// and anything unrecognised stay unknown.
fn availability_from(value: &str) -> Availability {
    match value {
        "AVAILABLE" | "AVAILABLE_RESERVED" | "AVAILABLE_PREORDER" => Availability::Available,
        "RESERVED" => Availability::Unavailable,
        v if v.starts_with("UNAVAILABLE") => Availability::Unavailable,
        _ => Availability::Unknown,
    }
}

impl Route53Client {
    fn capabilities_static() -> RegistrarCapabilities {
        RegistrarCapabilities {
            availability: true,
            registration: true,
            dns_records: false,
            authoritative_record_types: Vec::new(),
        }
    }

    fn register_request(request: &RegistrationRequest) -> RegisterDomainRequest {
        let contact = || ContactDetail::from(&request.registrant);
        RegisterDomainRequest {
            domain_name: normalize_domain_name(&request.domain_name),
            duration_in_years: request.period_years,
            auto_renew: request.auto_renew,
            admin_contact: contact(),
            registrant_contact: contact(),
            tech_contact: contact(),
            privacy_protect_admin_contact: true,
            privacy_protect_registrant_contact: true,
            privacy_protect_tech_contact: true,
        }
    }
}

#[async_trait]
impl RegistrarClient for Route53Client {
    fn id(&self) -> &'static str {
        "route53"
    }

    fn metadata() -> RegistrarMetadata {
        RegistrarMetadata {
            id: RegistrarType::Route53,
            name: "Amazon Route 53".to_string(),
            description: "Route 53 Domains registration API".to_string(),
            required_fields: vec![
                CredentialField {
                    key: "accessKeyId".to_string(),
                    label: "Access Key ID".to_string(),
                    field_type: FieldType::Text,
                    help_text: None,
                },
                CredentialField {
                    key: "secretAccessKey".to_string(),
                    label: "Secret Access Key".to_string(),
                    field_type: FieldType::Password,
                    help_text: Some("IAM user with route53domains:* permissions".to_string()),
                },
            ],
            capabilities: Self::capabilities_static(),
            max_page_size_records: 0,
        }
    }

    fn capabilities(&self) -> RegistrarCapabilities {
        Self::capabilities_static()
    }

    async fn query_availability(&self, domain_name: &str) -> Result<AvailabilityQuote> {
        let domain = normalize_domain_name(domain_name);
        let resp: CheckDomainAvailabilityResponse = self
            .call(
                "CheckDomainAvailability",
                &CheckDomainAvailabilityRequest {
                    domain_name: domain.clone(),
                },
                ErrorContext::for_domain(&domain),
            )
            .await?;

        let availability = availability_from(&resp.availability);
        Ok(AvailabilityQuote {
            domain_name: domain,
            availability,
            price: None,
            note: (resp.availability != "AVAILABLE" && resp.availability != "UNAVAILABLE")
                .then(|| resp.availability.to_ascii_lowercase()),
        })
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationReceipt> {
        let body = Self::register_request(request);
        log::info!(
            "[{}] Registering {} for {} year(s)",
            self.provider_name(),
            body.domain_name,
            body.duration_in_years
        );
        let ctx = ErrorContext::for_domain(&body.domain_name);
        let resp: RegisterDomainResponse = self.call("RegisterDomain", &body, ctx).await?;

        // Registration completes asynchronously; the operation id tracks it.
        Ok(RegistrationReceipt {
            reference_id: resp.operation_id,
            expires_at: None,
            message: Some("registration operation submitted".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrarError;
    use crate::types::RegistrantContact;

    #[test]
    fn availability_values() {
        assert_eq!(availability_from("AVAILABLE"), Availability::Available);
        assert_eq!(availability_from("AVAILABLE_PREORDER"), Availability::Available);
        assert_eq!(availability_from("UNAVAILABLE"), Availability::Unavailable);
        assert_eq!(availability_from("UNAVAILABLE_PREMIUM"), Availability::Unavailable);
        assert_eq!(availability_from("UNAVAILABLE_RESTRICTED"), Availability::Unavailable);
        assert_eq!(availability_from("RESERVED"), Availability::Unavailable);
        assert_eq!(availability_from("DONT_KNOW"), Availability::Unknown);
        assert_eq!(availability_from("SOMETHING_NEW"), Availability::Unknown);
    }

    #[test]
    fn register_request_uses_company_contact_type() {
        let req = Route53Client::register_request(&RegistrationRequest {
            domain_name: "Example.com.".to_string(),
            registrant: RegistrantContact {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                organization: Some("Analytical Engines Ltd".to_string()),
                email: "ada@example.com".to_string(),
                phone: "+44.2070000000".to_string(),
                address_line1: "1 Main St".to_string(),
                address_line2: None,
                city: "London".to_string(),
                state_province: "London".to_string(),
                postal_code: "N1".to_string(),
                country: "gb".to_string(),
            },
            period_years: 1,
            nameservers: Vec::new(),
            auto_renew: true,
        });
        assert_eq!(req.domain_name, "example.com");
        assert_eq!(req.registrant_contact.contact_type, "COMPANY");
        assert_eq!(req.registrant_contact.country_code, "GB");

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["DurationInYears"], 1);
        assert_eq!(json["AdminContact"]["FirstName"], "Ada");
        assert!(json["AdminContact"].get("AddressLine2").is_none());
    }

    #[tokio::test]
    async fn dns_listing_is_unsupported() {
        let client = Route53Client::new("AKID".to_string(), "secret".to_string());
        assert!(!client.capabilities().dns_records);
        let err = client.fetch_dns_records("example.com").await.unwrap_err();
        assert!(matches!(err, RegistrarError::Unsupported { ref capability, .. } if capability == "dns_records"));
    }
}
