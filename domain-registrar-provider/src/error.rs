use serde::{Deserialize, Serialize};

/// Coarse classification of a [`RegistrarError`].
///
/// Callers that schedule retries only need to look at this, not at the
/// individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The registrar does not know the domain.
    NotFound,
    /// Credentials were rejected or lack permission.
    AuthenticationFailed,
    /// The registrar throttled the request.
    RateLimited,
    /// Timeout or connection-level failure.
    Transport,
    /// The registrar (or this adapter) lacks the requested capability.
    Unsupported,
    /// The registrar refused the operation for a business reason.
    Rejected,
    /// The response could not be understood.
    Protocol,
}

/// Unified error type for all registrar operations.
///
/// Each variant includes a `provider` field identifying which registrar produced
/// the error, plus variant-specific context. All variants are serializable for
/// structured error reporting.
///
/// # Retryable Errors
///
/// [`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout) and
/// [`RateLimited`](Self::RateLimited) are transient. Nothing in this crate
/// retries them; see [`is_retryable`](Self::is_retryable).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum RegistrarError {
    /// A network-level error occurred (DNS resolution failure, connection refused, 5xx gateway).
    NetworkError {
        /// Registrar that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The request timed out. The remote side may still have acted on it.
    Timeout {
        /// Registrar that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The registrar's rate limit was exceeded.
    RateLimited {
        /// Registrar that produced the error.
        provider: String,
        /// Seconds to wait before retrying, if the registrar said so.
        retry_after: Option<u64>,
        /// Original error message from the registrar API, if available.
        raw_message: Option<String>,
    },

    /// The provided credentials are invalid or expired.
    InvalidCredentials {
        /// Registrar that produced the error.
        provider: String,
        /// Original error message from the registrar API, if available.
        raw_message: Option<String>,
    },

    /// The credentials are valid but not allowed to perform this operation.
    PermissionDenied {
        /// Registrar that produced the error.
        provider: String,
        /// Original error message from the registrar API, if available.
        raw_message: Option<String>,
    },

    /// The domain is not known to the registrar (or not held in this account).
    DomainNotFound {
        /// Registrar that produced the error.
        provider: String,
        /// Domain name.
        domain: String,
        /// Original error message from the registrar API, if available.
        raw_message: Option<String>,
    },

    /// The domain cannot be registered (already taken, reserved, premium-only).
    DomainUnavailable {
        /// Registrar that produced the error.
        provider: String,
        /// Domain name.
        domain: String,
        /// Original error message from the registrar API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter was rejected.
    InvalidParameter {
        /// Registrar that produced the error.
        provider: String,
        /// Parameter name.
        param: String,
        /// Error details.
        detail: String,
    },

    /// The reseller account balance does not cover the operation.
    InsufficientFunds {
        /// Registrar that produced the error.
        provider: String,
        /// Original error message from the registrar API, if available.
        raw_message: Option<String>,
    },

    /// The registrar, or this adapter, does not offer the capability.
    Unsupported {
        /// Registrar that produced the error.
        provider: String,
        /// Capability name, e.g. `dns_records`.
        capability: String,
    },

    /// Failed to parse the registrar API response.
    ParseError {
        /// Registrar that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Failed to serialize the request body.
    SerializationError {
        /// Registrar that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// An unrecognized error from the registrar API.
    Unknown {
        /// Registrar that produced the error.
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl RegistrarError {
    /// Collapse the variant onto the coarse [`ErrorKind`].
    ///
    /// **Update this when adding variants.**
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DomainNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidCredentials { .. } | Self::PermissionDenied { .. } => {
                ErrorKind::AuthenticationFailed
            }
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::NetworkError { .. } | Self::Timeout { .. } => ErrorKind::Transport,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::DomainUnavailable { .. }
            | Self::InvalidParameter { .. }
            | Self::InsufficientFunds { .. }
            | Self::Unknown { .. } => ErrorKind::Rejected,
            Self::ParseError { .. } | Self::SerializationError { .. } => ErrorKind::Protocol,
        }
    }

    /// Whether a later attempt could succeed without any change on our side.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::RateLimited | ErrorKind::Transport)
    }

    /// Whether the request may have reached the registrar even though no
    /// answer came back.
    #[must_use]
    pub fn is_outcome_uncertain(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::Timeout { .. })
    }

    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::DomainNotFound { .. }
                | Self::DomainUnavailable { .. }
                | Self::InvalidParameter { .. }
                | Self::InsufficientFunds { .. }
                | Self::Unsupported { .. }
                | Self::RateLimited { .. }
        )
    }

    /// Registrar code carried by every variant.
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::NetworkError { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::InvalidCredentials { provider, .. }
            | Self::PermissionDenied { provider, .. }
            | Self::DomainNotFound { provider, .. }
            | Self::DomainUnavailable { provider, .. }
            | Self::InvalidParameter { provider, .. }
            | Self::InsufficientFunds { provider, .. }
            | Self::Unsupported { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::SerializationError { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }
}

fn write_with_message(
    f: &mut std::fmt::Formatter<'_>,
    head: std::fmt::Arguments<'_>,
    raw_message: Option<&String>,
) -> std::fmt::Result {
    match raw_message {
        Some(msg) => write!(f, "{head}: {msg}"),
        None => write!(f, "{head}"),
    }
}

impl std::fmt::Display for RegistrarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] Invalid credentials"),
                raw_message.as_ref(),
            ),
            Self::PermissionDenied {
                provider,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] Permission denied"),
                raw_message.as_ref(),
            ),
            Self::DomainNotFound {
                provider,
                domain,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] Domain '{domain}' not found"),
                raw_message.as_ref(),
            ),
            Self::DomainUnavailable {
                provider,
                domain,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] Domain '{domain}' is not available for registration"),
                raw_message.as_ref(),
            ),
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::InsufficientFunds {
                provider,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] Insufficient account balance"),
                raw_message.as_ref(),
            ),
            Self::Unsupported {
                provider,
                capability,
            } => {
                write!(f, "[{provider}] Capability not supported: {capability}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for RegistrarError {}

/// Convenience type alias for `Result<T, RegistrarError>`.
pub type Result<T> = std::result::Result<T, RegistrarError>;
