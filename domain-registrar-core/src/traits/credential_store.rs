//! 凭证存储抽象 Trait

use async_trait::async_trait;
use domain_registrar_provider::RegistrarCredentials;

use crate::error::CoreResult;

/// 凭证存储 Trait
///
/// 平台实现:
/// - `SqliteStore`: `SeaORM` + AES-256-GCM 加密
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 获取凭证
    ///
    /// # Arguments
    /// * `credential_ref` - `Registrar::credential_ref`
    ///
    /// # Returns
    /// * `Ok(Some(credentials))` - 凭证存在
    /// * `Ok(None)` - 凭证不存在
    async fn get(&self, credential_ref: &str) -> CoreResult<Option<RegistrarCredentials>>;
}
