//! Route 53 Domains error mapping

use crate::error::RegistrarError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Route53Client;

/// Route 53 Domains error code mapping
/// Reference: <https://docs.aws.amazon.com/Route53/latest/APIReference/API_Operations_Amazon_Route_53_Domains.html>
impl ProviderErrorMapper for Route53Client {
    fn provider_name(&self) -> &'static str {
        "route53"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> RegistrarError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            Some(
                "UnrecognizedClientException"
                | "InvalidSignatureException"
                | "ExpiredTokenException"
                | "IncompleteSignature"
                | "MissingAuthenticationToken",
            ) => RegistrarError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            Some("AccessDeniedException") => RegistrarError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },

            Some("ThrottlingException" | "OperationLimitExceeded") => {
                RegistrarError::RateLimited {
                    provider,
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            Some("DomainLimitExceeded" | "DuplicateRequest") => {
                RegistrarError::DomainUnavailable {
                    provider,
                    domain: context.domain.unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }

            Some("InvalidInput" | "TLDRulesViolation" | "ValidationException") => {
                RegistrarError::InvalidParameter {
                    provider,
                    param: context.param.unwrap_or_else(|| "DomainName".to_string()),
                    detail: raw.message,
                }
            }

            Some("UnsupportedTLD") => RegistrarError::Unsupported {
                provider,
                capability: raw.message,
            },

            Some("ServiceUnavailable" | "InternalFailure") => RegistrarError::NetworkError {
                provider,
                detail: raw.message,
            },

            _ => self.map_by_status(raw, context),
        }
    }
}
