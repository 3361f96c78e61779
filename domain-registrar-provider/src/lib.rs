//! # domain-registrar-provider
//!
//! Uniform client abstraction over domain registrar APIs: availability
//! checks, registration and listing the DNS records a registrar hosts.
//!
//! ## Supported Registrars
//!
//! | Registrar | Feature Flag | Auth Method | DNS records |
//! |-----------|-------------|-------------|-------------|
//! | [GoDaddy](https://developer.godaddy.com/) | `godaddy` | `sso-key` header | yes |
//! | [Aliyun Domain](https://www.aliyun.com/product/domain) | `aliyun` | ACS3-HMAC-SHA256 | yes |
//! | [Route 53 Domains](https://aws.amazon.com/route53/) | `route53` | AWS SigV4 | no |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: every registrar above.
//! - **`godaddy`**, **`aliyun`**, **`route53`**: a single registrar.
//! - **`native-tls`** *(default)* / **`rustls`**: TLS backend for reqwest.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use domain_registrar_provider::{
//!     create_registrar_client, Availability, ClientOptions, RegistrarCredentials,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = create_registrar_client(
//!         RegistrarCredentials::Aliyun {
//!             access_key_id: "id".to_string(),
//!             access_key_secret: "secret".to_string(),
//!         },
//!         &ClientOptions::default(),
//!     )?;
//!
//!     let result = client.check_availability("example.cn").await;
//!     if result.is_available == Availability::Available {
//!         println!("{} can be registered", result.domain_name);
//!     }
//!
//!     for record in client.fetch_dns_records("example.cn").await? {
//!         println!("{} {} {}", record.name, record.record_type, record.value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, RegistrarError>`](RegistrarError).
//! [`RegistrarError::kind`] gives the coarse category callers branch on.
//! Nothing is retried automatically: a registration that failed with
//! [`RegistrarError::Timeout`] or [`RegistrarError::NetworkError`] may still
//! have gone through (see [`RegistrarError::is_outcome_uncertain`]).

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ErrorKind, RegistrarError, Result};

pub use factory::{ClientOptions, create_registrar_client, get_all_registrar_metadata};

// Internal traits (error mapping) stay private.
pub use traits::{MAX_RECORD_PAGES, RegistrarClient};

pub use types::{
    Availability, AvailabilityQuote, CredentialField, CredentialValidationError,
    DnsRecordType, DomainAvailabilityResult, FieldType, PaginatedResponse, PaginationParams,
    Price, RegistrantContact, RegistrarCapabilities, RegistrarCredentials, RegistrarMetadata,
    RegistrarType, RegistrationReceipt, RegistrationRequest, RemoteDnsRecord,
};

pub use utils::{datetime, log_sanitizer};

#[cfg(feature = "godaddy")]
pub use providers::{GODADDY_OTE_API_BASE, GodaddyClient, GodaddyClientBuilder};

#[cfg(feature = "aliyun")]
pub use providers::{AliyunClient, AliyunClientBuilder};

#[cfg(feature = "route53")]
pub use providers::{Route53Client, Route53ClientBuilder};
