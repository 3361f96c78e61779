//! Registrant contact lookup

use async_trait::async_trait;
use domain_registrar_provider::RegistrantContact;

use crate::error::CoreResult;

/// Customer contact details used as registrant data.
///
/// Customer records live outside this crate; implementors adapt them.
#[async_trait]
pub trait RegistrantDirectory: Send + Sync {
    async fn find_registrant(&self, customer_id: &str) -> CoreResult<Option<RegistrantContact>>;
}
