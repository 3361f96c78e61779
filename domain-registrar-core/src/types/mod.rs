//! 类型定义模块

mod dns;
mod domain;
mod registrar;
mod results;

pub use dns::{DnsChangeSet, DnsRecord, RecordIdentity};
pub use domain::{DomainName, DomainStatus, RegisteredDomain, RegistrationOutcome};
pub use registrar::{Registrar, capabilities_for};
pub use results::{DnsBulkSyncResult, DnsRecordSyncResult, DomainRegistrationResult};

// Re-export provider 库的公共类型
pub use domain_registrar_provider::{
    Availability, CredentialValidationError, DnsRecordType, DomainAvailabilityResult, Price,
    RegistrantContact, RegistrarCapabilities, RegistrarCredentials, RegistrarType,
    RemoteDnsRecord,
};
