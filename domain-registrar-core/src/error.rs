//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use domain_registrar_provider::{CredentialValidationError, ErrorKind, RegistrarError};

/// Coarse outcome class a controller maps onto a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Caller asked for something that cannot be done as asked (4xx).
    BadRequest,
    /// Referenced entity does not exist (404).
    NotFound,
    /// Local infrastructure or an unexpected registrar fault (5xx).
    Infrastructure,
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Registrar code is unknown
    #[error("Registrar not found: {0}")]
    RegistrarNotFound(String),

    /// Registrar exists but is disabled
    #[error("Registrar is inactive: {0}")]
    RegistrarInactive(String),

    /// No registrar given and none configured as default
    #[error("No registrar specified and no default registrar configured")]
    NoDefaultRegistrar,

    /// Registered domain not found (by id or name)
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Domain is assigned to a different registrar than the one requested
    #[error("Domain {domain} is assigned to registrar {assigned}, not {requested}")]
    RegistrarMismatch {
        domain: String,
        assigned: String,
        requested: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Credential storage / decoding error
    #[error("Credential error: {0}")]
    CredentialError(String),

    /// Credential validation errors (structured, field level)
    #[error("{0}")]
    CredentialValidation(CredentialValidationError),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Registrar error (converted from the provider library)
    #[error("{0}")]
    Registrar(#[from] RegistrarError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::RegistrarNotFound(_)
            | Self::RegistrarInactive(_)
            | Self::NoDefaultRegistrar
            | Self::DomainNotFound(_)
            | Self::RegistrarMismatch { .. }
            | Self::ValidationError(_)
            | Self::CredentialValidation(_) => true,
            Self::Registrar(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Response class for the controller layer.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::RegistrarNotFound(_) | Self::DomainNotFound(_) => ErrorClass::NotFound,
            Self::RegistrarInactive(_)
            | Self::NoDefaultRegistrar
            | Self::RegistrarMismatch { .. }
            | Self::ValidationError(_)
            | Self::CredentialValidation(_) => ErrorClass::BadRequest,
            Self::Registrar(e) => match e.kind() {
                ErrorKind::NotFound => ErrorClass::NotFound,
                ErrorKind::Rejected | ErrorKind::Unsupported => ErrorClass::BadRequest,
                _ => ErrorClass::Infrastructure,
            },
            Self::CredentialError(_) | Self::SerializationError(_) | Self::StorageError(_) => {
                ErrorClass::Infrastructure
            }
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
