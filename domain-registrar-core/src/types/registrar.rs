//! Registrar configuration type definitions

use serde::{Deserialize, Serialize};

use domain_registrar_provider::{RegistrarCapabilities, RegistrarType, get_all_registrar_metadata};

/// A configured registrar account. Read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrar {
    /// Stable code callers address the registrar by (e.g. `aws`)
    pub code: String,
    pub name: String,
    /// Adapter used to talk to it
    pub registrar_type: RegistrarType,
    /// Inactive registrars are never dispatched to
    pub is_active: bool,
    /// API endpoint override (sandbox, proxy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Key into the credential store
    pub credential_ref: String,
    pub capabilities: RegistrarCapabilities,
}

impl Registrar {
    /// Active registrar with the adapter's advertised capabilities.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        registrar_type: RegistrarType,
        credential_ref: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            registrar_type,
            is_active: true,
            endpoint: None,
            credential_ref: credential_ref.into(),
            capabilities: capabilities_for(registrar_type),
        }
    }
}

/// Capabilities advertised by the adapter for `registrar_type`.
pub fn capabilities_for(registrar_type: RegistrarType) -> RegistrarCapabilities {
    get_all_registrar_metadata()
        .into_iter()
        .find(|m| m.id == registrar_type)
        .map_or_else(
            || RegistrarCapabilities {
                availability: false,
                registration: false,
                dns_records: false,
                authoritative_record_types: Vec::new(),
            },
            |m| m.capabilities,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registrar_takes_adapter_capabilities() {
        let aws = Registrar::new("aws", "AWS", RegistrarType::Route53, "cred-aws");
        assert!(aws.is_active);
        assert!(aws.capabilities.registration);
        assert!(!aws.capabilities.dns_records);

        let gd = Registrar::new("gd", "GoDaddy", RegistrarType::Godaddy, "cred-gd");
        assert!(gd.capabilities.dns_records);
    }
}
