//! 阿里云错误映射

use crate::error::RegistrarError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::AliyunClient;

/// 阿里云错误码映射
/// 参考: <https://api.aliyun.com/document/Domain/2018-01-29/errorCode>
/// 参考: <https://api.aliyun.com/document/Alidns/2015-01-09/errorCode>
impl ProviderErrorMapper for AliyunClient {
    fn provider_name(&self) -> &'static str {
        "aliyun"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> RegistrarError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            // ============ 认证错误 ============
            Some(
                "InvalidAccessKeyId.NotFound"
                | "InvalidAccessKeyId.Inactive"
                | "SignatureDoesNotMatch"
                | "IncompleteSignature",
            ) => RegistrarError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            // ============ 权限被拒绝 ============
            Some("Forbidden" | "Forbidden.RAM" | "Forbidden.RiskControl" | "IllegalUser") => {
                RegistrarError::PermissionDenied {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 域名不存在 ============
            Some(
                "InvalidDomainName.NoExist"
                | "DomainNotFound"
                | "IncorrectDomainUser"
                | "DomainNotExist",
            ) => RegistrarError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 域名不可注册 ============
            Some(
                "DomainExist"
                | "DomainNameNotAvailable"
                | "ReservedDomain"
                | "ForbiddenDomain"
                | "PremiumNotPermitted",
            ) => RegistrarError::DomainUnavailable {
                provider,
                domain: context.domain.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 余额不足 ============
            Some("InsufficientBalance" | "BalanceNotEnough" | "PaymentFailed") => {
                RegistrarError::InsufficientFunds {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 频率限流 ============
            Some("Throttling" | "Throttling.User" | "Throttling.Api") => {
                RegistrarError::RateLimited {
                    provider,
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 服务端暂不可用 ============
            Some("ServiceUnavailable" | "InternalError") => RegistrarError::NetworkError {
                provider,
                detail: raw.message,
            },

            // ============ 参数无效 ============
            Some(
                "InvalidDomainName.Format"
                | "InvalidDomainName.Suffix"
                | "InvalidDomainName.Length"
                | "DomainEmpty",
            ) => RegistrarError::InvalidParameter {
                provider,
                param: "domain".to_string(),
                detail: raw.message,
            },
            Some(code) if code.starts_with("InvalidParameter") || code.starts_with("Missing") => {
                RegistrarError::InvalidParameter {
                    provider,
                    param: context.param.unwrap_or_else(|| code.to_string()),
                    detail: raw.message,
                }
            }

            // ============ 其他错误 fallback ============
            _ => self.map_by_status(raw, context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn client() -> AliyunClient {
        AliyunClient::new(String::new(), String::new())
    }

    fn ctx() -> ErrorContext {
        ErrorContext::for_domain("example.cn")
    }

    #[test]
    fn signature_mismatch_is_auth_failure() {
        let err = client().map_error(RawApiError::with_code("SignatureDoesNotMatch", "x"), ctx());
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }

    #[test]
    fn throttling_is_retryable() {
        let err = client().map_error(RawApiError::with_code("Throttling.User", "slow"), ctx());
        assert!(matches!(err, RegistrarError::RateLimited { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn missing_domain() {
        let err = client().map_error(
            RawApiError::with_code("InvalidDomainName.NoExist", "no such domain"),
            ctx(),
        );
        assert!(matches!(
            err,
            RegistrarError::DomainNotFound { ref domain, .. } if domain == "example.cn"
        ));
    }

    #[test]
    fn balance_and_availability_rejections() {
        let c = client();
        assert!(matches!(
            c.map_error(RawApiError::with_code("InsufficientBalance", "x"), ctx()),
            RegistrarError::InsufficientFunds { .. }
        ));
        assert!(matches!(
            c.map_error(RawApiError::with_code("DomainExist", "x"), ctx()),
            RegistrarError::DomainUnavailable { .. }
        ));
    }

    #[test]
    fn invalid_parameter_prefix() {
        let err = client().map_error(
            RawApiError::with_code("InvalidParameter.Email", "bad email"),
            ctx(),
        );
        assert!(matches!(
            err,
            RegistrarError::InvalidParameter { ref param, .. } if param == "InvalidParameter.Email"
        ));
    }

    #[test]
    fn unknown_code_without_status_is_unknown() {
        let err = client().map_error(RawApiError::with_code("Weird", "?"), ctx());
        assert!(matches!(err, RegistrarError::Unknown { .. }));
    }
}
