use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Pagination ============

/// Pagination parameters for list operations.
///
/// Pages are 1-indexed. The default is `page = 1, page_size = 100`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 100,
        }
    }
}

impl PaginationParams {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// A paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Current page number.
    pub page: u32,
    /// Page size used for this request.
    pub page_size: u32,
    /// Total number of items across all pages, when the registrar reports it.
    pub total_count: Option<u32>,
    /// Whether there are more pages after this one.
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Create a page from a registrar that reports a total count.
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u32) -> Self {
        let has_more = page.saturating_mul(page_size) < total_count;
        Self {
            items,
            page,
            page_size,
            total_count: Some(total_count),
            has_more,
        }
    }

    /// Create a page from a registrar that does not report totals; a full page
    /// means there may be more.
    pub fn without_total(items: Vec<T>, page: u32, page_size: u32) -> Self {
        let has_more = u32::try_from(items.len()).unwrap_or(u32::MAX) >= page_size;
        Self {
            items,
            page,
            page_size,
            total_count: None,
            has_more,
        }
    }
}

// ============ Registrar Types ============

/// Identifies which registrar adapter to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RegistrarType {
    /// `GoDaddy` reseller API. Requires feature `godaddy`.
    #[cfg(feature = "godaddy")]
    Godaddy,
    /// Aliyun (Alibaba Cloud) domain service. Requires feature `aliyun`.
    #[cfg(feature = "aliyun")]
    Aliyun,
    /// Amazon Route 53 Domains. Requires feature `route53`.
    #[cfg(feature = "route53")]
    Route53,
}

impl RegistrarType {
    /// Stable lowercase identifier, as stored and serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            #[cfg(feature = "godaddy")]
            Self::Godaddy => "godaddy",
            #[cfg(feature = "aliyun")]
            Self::Aliyun => "aliyun",
            #[cfg(feature = "route53")]
            Self::Route53 => "route53",
        }
    }
}

impl std::fmt::Display for RegistrarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            #[cfg(feature = "godaddy")]
            "godaddy" => Ok(Self::Godaddy),
            #[cfg(feature = "aliyun")]
            "aliyun" => Ok(Self::Aliyun),
            #[cfg(feature = "route53")]
            "route53" | "aws" => Ok(Self::Route53),
            other => Err(format!(
                "Registrar type '{other}' is not supported or its feature is not enabled"
            )),
        }
    }
}

// ============ Availability ============

/// Tri-state availability answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// The name can be registered.
    Available,
    /// The name is taken, reserved or otherwise not registrable.
    Unavailable,
    /// The registrar could not be asked, or gave no definite answer.
    Unknown,
}

/// Price of a registration, in millionths of the currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in micro-units (1 USD = `1_000_000`).
    pub amount_micros: u64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Raw availability answer produced by an adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuote {
    /// Queried domain name.
    pub domain_name: String,
    /// Definite answer, or [`Availability::Unknown`] when the registrar hedged.
    pub availability: Availability,
    /// Registration price, if quoted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Registrar remark (premium, reserved, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Availability result handed to callers. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAvailabilityResult {
    /// Queried domain name.
    pub domain_name: String,
    /// Availability. `Unknown` whenever `error` is set.
    pub is_available: Availability,
    /// Registration price, if quoted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Why the answer is `Unknown`, or a registrar remark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DomainAvailabilityResult {
    /// Fail-closed result for a lookup that errored.
    pub fn unknown(domain_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            is_available: Availability::Unknown,
            price: None,
            error: Some(reason.into()),
        }
    }
}

impl From<AvailabilityQuote> for DomainAvailabilityResult {
    fn from(quote: AvailabilityQuote) -> Self {
        Self {
            domain_name: quote.domain_name,
            is_available: quote.availability,
            price: quote.price,
            error: quote.note,
        }
    }
}

// ============ Registration ============

/// Registrant contact details submitted with a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantContact {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub email: String,
    /// Phone in `+CC.NUMBER` form, e.g. `+1.5555550100`.
    pub phone: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
}

impl RegistrantContact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Everything an adapter needs to register one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub domain_name: String,
    pub registrant: RegistrantContact,
    pub period_years: u32,
    /// Nameservers to delegate to; empty means registrar defaults.
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub auto_renew: bool,
}

/// Registrar acknowledgement of a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    /// Order, operation or task id assigned by the registrar.
    pub reference_id: String,
    /// Expiry, when the registrar reports it synchronously.
    #[serde(default, with = "crate::utils::datetime")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============ DNS Record Types ============

/// DNS record type.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Srv,
    Caa,
}

impl DnsRecordType {
    /// Every supported type.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Txt,
        Self::Ns,
        Self::Srv,
        Self::Caa,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
        }
    }

    /// Whether the record's value is a hostname (compared case-insensitively).
    pub fn value_is_hostname(self) -> bool {
        matches!(self, Self::Cname | Self::Mx | Self::Ns)
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DnsRecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "NS" => Ok(Self::Ns),
            "SRV" => Ok(Self::Srv),
            "CAA" => Ok(Self::Caa),
            other => Err(format!("Unsupported record type: {other}")),
        }
    }
}

/// A DNS record as reported by a registrar.
///
/// `name` is relative to the zone, with `@` for the apex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDnsRecord {
    pub record_type: DnsRecordType,
    pub name: String,
    pub value: String,
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

// ============ Registrar Metadata Types ============

/// Which operations an adapter supports, and which record types it is
/// authoritative for when listing DNS records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarCapabilities {
    pub availability: bool,
    pub registration: bool,
    pub dns_records: bool,
    /// Record types the registrar's record listing reports. A local record of
    /// any other type is never removed by a sync.
    pub authoritative_record_types: Vec<DnsRecordType>,
}

impl RegistrarCapabilities {
    pub fn is_authoritative_for(&self, record_type: DnsRecordType) -> bool {
        self.dns_records && self.authoritative_record_types.contains(&record_type)
    }
}

/// The input type of a credential field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
}

/// Definition of a single credential field required by a registrar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialField {
    /// Machine-readable field key (e.g., `"apiKey"`).
    pub key: String,
    /// Human-readable label (e.g., `"API Key"`).
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Static metadata describing a registrar adapter.
///
/// Obtain via [`RegistrarClient::metadata()`](crate::RegistrarClient::metadata) or
/// [`get_all_registrar_metadata()`](crate::get_all_registrar_metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarMetadata {
    pub id: RegistrarType,
    pub name: String,
    pub description: String,
    pub required_fields: Vec<CredentialField>,
    pub capabilities: RegistrarCapabilities,
    /// Maximum page size for DNS record list requests.
    pub max_page_size_records: u32,
}

// ============ Credential Types ============

/// Validation error for registrar credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        registrar: String,
        field: String,
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        registrar: String,
        field: String,
        label: String,
    },
    /// The registrar type is unknown or compiled out.
    UnsupportedRegistrar { registrar: String },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::UnsupportedRegistrar { registrar } => {
                write!(f, "Registrar '{registrar}' is not supported")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Type-safe credential container for all supported registrars.
///
/// Serialized as a tagged enum:
///
/// ```json
/// { "registrar": "godaddy", "credentials": { "api_key": "...", "api_secret": "..." } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "registrar", content = "credentials")]
pub enum RegistrarCredentials {
    #[cfg(feature = "godaddy")]
    #[serde(rename = "godaddy")]
    Godaddy { api_key: String, api_secret: String },

    #[cfg(feature = "aliyun")]
    #[serde(rename = "aliyun")]
    Aliyun {
        access_key_id: String,
        access_key_secret: String,
    },

    #[cfg(feature = "route53")]
    #[serde(rename = "route53")]
    Route53 {
        access_key_id: String,
        secret_access_key: String,
    },
}

impl RegistrarCredentials {
    /// Construct credentials from a flat key-value map, validating required fields.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a required field is missing or empty.
    pub fn from_map(
        registrar: RegistrarType,
        map: &HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        match registrar {
            #[cfg(feature = "godaddy")]
            RegistrarType::Godaddy => Ok(Self::Godaddy {
                api_key: Self::get_required_field(registrar, map, "apiKey", "API Key")?,
                api_secret: Self::get_required_field(registrar, map, "apiSecret", "API Secret")?,
            }),
            #[cfg(feature = "aliyun")]
            RegistrarType::Aliyun => Ok(Self::Aliyun {
                access_key_id: Self::get_required_field(
                    registrar,
                    map,
                    "accessKeyId",
                    "Access Key ID",
                )?,
                access_key_secret: Self::get_required_field(
                    registrar,
                    map,
                    "accessKeySecret",
                    "Access Key Secret",
                )?,
            }),
            #[cfg(feature = "route53")]
            RegistrarType::Route53 => Ok(Self::Route53 {
                access_key_id: Self::get_required_field(
                    registrar,
                    map,
                    "accessKeyId",
                    "Access Key ID",
                )?,
                secret_access_key: Self::get_required_field(
                    registrar,
                    map,
                    "secretAccessKey",
                    "Secret Access Key",
                )?,
            }),
        }
    }

    fn get_required_field(
        registrar: RegistrarType,
        map: &HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                registrar: registrar.to_string(),
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                registrar: registrar.to_string(),
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.trim().to_string()),
        }
    }

    /// Convert credentials to a flat key-value map for storage.
    pub fn to_map(&self) -> HashMap<String, String> {
        match self {
            #[cfg(feature = "godaddy")]
            Self::Godaddy {
                api_key,
                api_secret,
            } => [
                ("apiKey".to_string(), api_key.clone()),
                ("apiSecret".to_string(), api_secret.clone()),
            ]
            .into(),
            #[cfg(feature = "aliyun")]
            Self::Aliyun {
                access_key_id,
                access_key_secret,
            } => [
                ("accessKeyId".to_string(), access_key_id.clone()),
                ("accessKeySecret".to_string(), access_key_secret.clone()),
            ]
            .into(),
            #[cfg(feature = "route53")]
            Self::Route53 {
                access_key_id,
                secret_access_key,
            } => [
                ("accessKeyId".to_string(), access_key_id.clone()),
                ("secretAccessKey".to_string(), secret_access_key.clone()),
            ]
            .into(),
        }
    }

    /// Returns the [`RegistrarType`] corresponding to this credential variant.
    pub fn registrar_type(&self) -> RegistrarType {
        match self {
            #[cfg(feature = "godaddy")]
            Self::Godaddy { .. } => RegistrarType::Godaddy,
            #[cfg(feature = "aliyun")]
            Self::Aliyun { .. } => RegistrarType::Aliyun,
            #[cfg(feature = "route53")]
            Self::Route53 { .. } => RegistrarType::Route53,
        }
    }
}
