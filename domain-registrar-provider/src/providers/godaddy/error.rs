//! `GoDaddy` error mapping

use crate::error::RegistrarError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::GodaddyClient;

/// `GoDaddy` error code mapping
/// Reference: <https://developer.godaddy.com/doc/endpoint/domains>
impl ProviderErrorMapper for GodaddyClient {
    fn provider_name(&self) -> &'static str {
        "godaddy"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> RegistrarError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            Some("UNABLE_TO_AUTHENTICATE" | "INVALID_API_KEY" | "MALFORMED_CREDENTIALS") => {
                RegistrarError::InvalidCredentials {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            Some("ACCESS_DENIED" | "NOT_AUTHORIZED") => RegistrarError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },

            Some("UNKNOWN_DOMAIN" | "NOT_FOUND" | "DOMAIN_NOT_FOUND") => {
                RegistrarError::DomainNotFound {
                    provider,
                    domain: context.domain.unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }

            Some("UNAVAILABLE_DOMAIN" | "DUPLICATE" | "DOMAIN_NOT_AVAILABLE") => {
                RegistrarError::DomainUnavailable {
                    provider,
                    domain: context.domain.unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }

            Some("INSUFFICIENT_FUNDS" | "PAYMENT_FAILED" | "ACCOUNT_BALANCE_INSUFFICIENT") => {
                RegistrarError::InsufficientFunds {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            Some("TOO_MANY_REQUESTS" | "RATE_LIMIT_EXCEEDED") => RegistrarError::RateLimited {
                provider,
                retry_after: None,
                raw_message: Some(raw.message),
            },

            Some("INVALID_BODY" | "MISSING_FIELD" | "INVALID_VALUE" | "CONSENT_MISMATCH") => {
                RegistrarError::InvalidParameter {
                    provider,
                    param: context.param.unwrap_or_else(|| "body".to_string()),
                    detail: raw.message,
                }
            }

            Some("UNSUPPORTED_TLD" | "NOT_SUPPORTED") => RegistrarError::Unsupported {
                provider,
                capability: raw.message,
            },

            _ => self.map_by_status(raw, context),
        }
    }
}
