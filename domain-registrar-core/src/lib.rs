//! Domain Registrar Core Library
//!
//! Platform-independent business logic for registering domains and keeping
//! their DNS records in step with the registrar:
//! - Registrar registry (code → active, configured client)
//! - Availability checks
//! - Registration orchestration with per-domain serialization
//! - DNS record reconciliation, single and bulk
//!
//! Storage is reached only through the traits in [`traits`]; the application
//! crate supplies the implementations.

pub mod crypto;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult, ErrorClass};
pub use services::{
    AvailabilityService, BulkSyncOptions, BulkSyncService, DnsSyncService, RegistrationService,
    ServiceContext,
};
pub use traits::{
    CredentialStore, DnsRecordStore, RegisteredDomainRepository, RegistrantDirectory,
    RegistrarRegistry, RegistrarStore, ResolvedRegistrar, StoreRegistrarRegistry,
};
