//! Registrar configuration abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Registrar;

/// Read access to registrar configuration (written by admin CRUD elsewhere)
#[async_trait]
pub trait RegistrarStore: Send + Sync {
    async fn find_by_code(&self, code: &str) -> CoreResult<Option<Registrar>>;
}
