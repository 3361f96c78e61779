//! `SeaORM` entities backing `SqliteStore`.

pub mod dns_record;
pub mod registered_domain;
pub mod registrant;
pub mod registrar;
pub mod registrar_credential;
