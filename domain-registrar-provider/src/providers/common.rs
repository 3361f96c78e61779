//! Registrar 公共工具函数

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::types::DnsRecordType;

type HmacSha256 = Hmac<Sha256>;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
pub fn create_http_client(request_timeout: Option<Duration>) -> Client {
    let timeout =
        request_timeout.unwrap_or_else(|| Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS).min(timeout))
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build configured HTTP client, using defaults: {e}");
            Client::new()
        })
}

// ============ Hashing ============

/// HMAC-SHA256（供 aliyun/route53 签名使用）
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so this never takes the Err arm.
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return Vec::new();
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Lowercase hex SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// ============ 记录类型转换 ============

/// Map a registrar's record type string, skipping types we do not model.
pub fn parse_record_type(record_type: &str, provider: &str) -> Option<DnsRecordType> {
    match record_type.parse::<DnsRecordType>() {
        Ok(t) => Some(t),
        Err(_) => {
            log::debug!("[{provider}] Skipping unsupported record type {record_type}");
            None
        }
    }
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点并转小写
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// 将记录名称统一为相对名称（小写，apex 为 `@`）
///
/// Accepts relative names (`www`), the apex (`@` or empty) and fully
/// qualified names (`www.example.com.`).
pub fn relative_record_name(name: &str, zone_name: &str) -> String {
    let full = normalize_domain_name(name);
    let zone = normalize_domain_name(zone_name);

    if full.is_empty() || full == "@" || full == zone {
        "@".to_string()
    } else if let Some(subdomain) = full.strip_suffix(&format!(".{zone}")) {
        subdomain.to_string()
    } else {
        full
    }
}
