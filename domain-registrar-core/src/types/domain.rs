//! Registered domain type definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const MAX_LABELS: usize = 127;

/// Normalized, validated fully-qualified domain name.
///
/// Lower-case, no trailing dot, at least two labels, alphabetic (or
/// `xn--` punycode) TLD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let name = raw.trim().trim_end_matches('.').to_ascii_lowercase();
        let invalid = |why: &str| CoreError::ValidationError(format!("invalid domain name '{raw}': {why}"));

        if name.is_empty() {
            return Err(invalid("empty"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(invalid("longer than 253 characters"));
        }
        let labels: Vec<&str> = name.split('.').collect();
        if labels.len() < 2 {
            return Err(invalid("needs at least two labels"));
        }
        if labels.len() > MAX_LABELS {
            return Err(invalid("too many labels"));
        }
        for label in &labels {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(invalid("label must be 1-63 characters"));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid("label starts or ends with '-'"));
            }
            if !label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
            {
                return Err(invalid("label contains characters outside [a-z0-9-]"));
            }
        }
        let tld = labels[labels.len() - 1];
        if !(tld.starts_with("xn--") || tld.bytes().all(|b| b.is_ascii_lowercase())) {
            return Err(invalid("top-level domain must be alphabetic"));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DomainName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DomainName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Registration lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    /// Placeholder, not yet (successfully) registered
    Pending,
    /// Live registration at the assigned registrar
    Registered,
    /// Last registration attempt failed
    Failed,
    /// Registration lapsed
    Expired,
}

impl DomainStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Registered => "registered",
            Self::Failed => "failed",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "registered" => Ok(Self::Registered),
            "failed" => Ok(Self::Failed),
            "expired" => Ok(Self::Expired),
            other => Err(CoreError::SerializationError(format!(
                "unknown domain status: {other}"
            ))),
        }
    }
}

/// Local record of a domain and its registration state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDomain {
    pub id: String,
    pub name: DomainName,
    /// Owning customer (external collaborator)
    pub customer_id: String,
    /// Assigned registrar code; `None` until one is chosen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar_code: Option<String>,
    pub status: DomainStatus,
    /// Registration term requested for this domain
    pub period_years: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Registrar order / operation id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    /// Failure reason of the last registration attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegisteredDomain {
    /// New `Pending` placeholder with a fresh id.
    #[must_use]
    pub fn pending(name: DomainName, customer_id: impl Into<String>, registrar_code: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            customer_id: customer_id.into(),
            registrar_code,
            status: DomainStatus::Pending,
            period_years: 1,
            expires_at: None,
            external_reference: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_assigned_to(&self, registrar_code: &str) -> bool {
        self.registrar_code.as_deref() == Some(registrar_code)
    }
}

/// Fields the orchestrator writes back after a registration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub status: DomainStatus,
    /// Registrar the attempt went through; assigned if the domain had none
    pub registrar_code: String,
    pub external_reference: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}
