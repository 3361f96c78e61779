//! Storage layer abstraction trait definition

mod credential_store;
mod dns_record_store;
mod domain_repository;
mod registrant_directory;
mod registrar_registry;
mod registrar_store;

pub use credential_store::CredentialStore;
pub use dns_record_store::DnsRecordStore;
pub use domain_repository::RegisteredDomainRepository;
pub use registrant_directory::RegistrantDirectory;
pub use registrar_registry::{RegistrarRegistry, ResolvedRegistrar, StoreRegistrarRegistry};
pub use registrar_store::RegistrarStore;
