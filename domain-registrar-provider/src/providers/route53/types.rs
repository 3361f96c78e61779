//! Route 53 Domains API 类型定义

use serde::{Deserialize, Serialize};

use crate::types::RegistrantContact;

/// AWS JSON error body. The type may carry a namespace prefix.
#[derive(Debug, Deserialize)]
pub struct AwsErrorBody {
    #[serde(rename = "__type")]
    pub error_type: Option<String>,
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

impl AwsErrorBody {
    /// `com.amazonaws.route53domains#InvalidInput` -> `InvalidInput`
    pub fn short_type(&self) -> Option<&str> {
        self.error_type
            .as_deref()
            .map(|t| t.rsplit('#').next().unwrap_or(t))
            .map(|t| t.split(':').next().unwrap_or(t))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckDomainAvailabilityRequest {
    pub domain_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckDomainAvailabilityResponse {
    pub availability: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactDetail {
    pub first_name: String,
    pub last_name: String,
    pub contact_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country_code: String,
    pub zip_code: String,
    pub phone_number: String,
    pub email: String,
}

impl From<&RegistrantContact> for ContactDetail {
    fn from(c: &RegistrantContact) -> Self {
        Self {
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            contact_type: if c.organization.is_some() {
                "COMPANY"
            } else {
                "PERSON"
            }
            .to_string(),
            organization_name: c.organization.clone(),
            address_line1: c.address_line1.clone(),
            address_line2: c.address_line2.clone(),
            city: c.city.clone(),
            state: c.state_province.clone(),
            country_code: c.country.to_ascii_uppercase(),
            zip_code: c.postal_code.clone(),
            phone_number: c.phone.clone(),
            email: c.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterDomainRequest {
    pub domain_name: String,
    pub duration_in_years: u32,
    pub auto_renew: bool,
    pub admin_contact: ContactDetail,
    pub registrant_contact: ContactDetail,
    pub tech_contact: ContactDetail,
    pub privacy_protect_admin_contact: bool,
    pub privacy_protect_registrant_contact: bool,
    pub privacy_protect_tech_contact: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterDomainResponse {
    pub operation_id: String,
}
