//! `GoDaddy` API 类型定义

use serde::{Deserialize, Serialize};

use crate::types::RegistrantContact;

/// Error body returned with every 4xx/5xx.
#[derive(Debug, Deserialize)]
pub struct GodaddyErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// `GET /v1/domains/available`
#[derive(Debug, Deserialize)]
pub struct GodaddyAvailability {
    pub available: bool,
    pub domain: String,
    /// `false` when the answer came from a cache and may be stale.
    #[serde(default = "default_true")]
    pub definitive: bool,
    pub price: Option<u64>,
    pub currency: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GodaddyAddress {
    pub address1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GodaddyContact {
    pub name_first: String,
    pub name_last: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub email: String,
    pub phone: String,
    pub address_mailing: GodaddyAddress,
}

impl From<&RegistrantContact> for GodaddyContact {
    fn from(c: &RegistrantContact) -> Self {
        Self {
            name_first: c.first_name.clone(),
            name_last: c.last_name.clone(),
            organization: c.organization.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            address_mailing: GodaddyAddress {
                address1: c.address_line1.clone(),
                address2: c.address_line2.clone(),
                city: c.city.clone(),
                state: c.state_province.clone(),
                postal_code: c.postal_code.clone(),
                country: c.country.to_ascii_uppercase(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GodaddyConsent {
    pub agreed_at: String,
    pub agreed_by: String,
    pub agreement_keys: Vec<String>,
}

/// `POST /v1/domains/purchase`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GodaddyPurchase {
    pub domain: String,
    pub consent: GodaddyConsent,
    pub contact_admin: GodaddyContact,
    pub contact_billing: GodaddyContact,
    pub contact_registrant: GodaddyContact,
    pub contact_tech: GodaddyContact,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name_servers: Vec<String>,
    pub period: u32,
    pub privacy: bool,
    pub renew_auto: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GodaddyPurchaseResponse {
    pub order_id: u64,
    pub total: Option<u64>,
    pub currency: Option<String>,
}

/// `GET /v1/domains/{domain}/records`
#[derive(Debug, Deserialize)]
pub struct GodaddyDnsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    pub ttl: Option<u32>,
    pub priority: Option<u16>,
    pub weight: Option<u16>,
    pub port: Option<u16>,
}
