//! 阿里云 API 类型定义和辅助函数

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::error::{RegistrarError, Result};

// ============ RFC3986 URL 编码 ============

/// RFC3986 URL 编码
pub fn url_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            _ => {
                let mut buf = [0_u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    let _ = write!(result, "%{byte:02X}");
                }
            }
        }
    }
    result
}

/// 将 `serde_json::Value` 展平为 key-value 对 (数组下标从 1 开始)
pub fn flatten_value(
    prefix: &str,
    value: &serde_json::Value,
    result: &mut BTreeMap<String, String>,
) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_value(&key, v, result);
            }
        }
        serde_json::Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                flatten_value(&format!("{prefix}.{}", i + 1), v, result);
            }
        }
        serde_json::Value::String(s) => {
            result.insert(prefix.to_string(), s.clone());
        }
        serde_json::Value::Number(n) => {
            result.insert(prefix.to_string(), n.to_string());
        }
        serde_json::Value::Bool(b) => {
            result.insert(prefix.to_string(), b.to_string());
        }
        serde_json::Value::Null => {}
    }
}

/// 将结构体序列化为排序后的 query string
pub fn serialize_to_query_string<T: Serialize>(params: &T) -> Result<String> {
    let value = serde_json::to_value(params).map_err(|e| RegistrarError::SerializationError {
        provider: "aliyun".to_string(),
        detail: e.to_string(),
    })?;

    let mut flat_map = BTreeMap::new();
    flatten_value("", &value, &mut flat_map);

    Ok(flat_map
        .iter()
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&"))
}

// ============ 域名注册 ============

#[derive(Debug, Serialize)]
pub struct CheckDomainRequest {
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    #[serde(rename = "FeeCommand")]
    pub fee_command: String,
    #[serde(rename = "FeeCurrency")]
    pub fee_currency: String,
    #[serde(rename = "FeePeriod")]
    pub fee_period: u32,
}

/// `CheckDomain` 响应
///
/// `Avail`: `1` 可注册, `0` 已注册, `-1` 异常, `-2` 暂停注册, `-3` 黑名单
#[derive(Debug, Deserialize)]
pub struct CheckDomainResponse {
    #[serde(rename = "DomainName")]
    pub domain_name: Option<String>,
    #[serde(rename = "Avail")]
    pub avail: serde_json::Value,
    #[serde(rename = "Premium")]
    pub premium: Option<serde_json::Value>,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "Reason")]
    pub reason: Option<String>,
}

impl CheckDomainResponse {
    /// `Avail` arrives as a string or a number depending on API gateway.
    pub fn avail_code(&self) -> Option<i64> {
        match &self.avail {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_premium(&self) -> bool {
        match &self.premium {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// `SaveSingleTaskForCreatingOrderActivate` 请求
#[derive(Debug, Serialize)]
pub struct CreateOrderActivateRequest {
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    #[serde(rename = "SubscriptionDuration")]
    pub subscription_duration: u32,
    #[serde(rename = "RegistrantType")]
    pub registrant_type: String,
    #[serde(rename = "RegistrantName")]
    pub registrant_name: String,
    #[serde(rename = "RegistrantOrganization")]
    pub registrant_organization: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "TelArea")]
    pub tel_area: String,
    #[serde(rename = "Telephone")]
    pub telephone: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Province")]
    pub province: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "PostalCode")]
    pub postal_code: String,
    #[serde(rename = "DNS1", skip_serializing_if = "Option::is_none")]
    pub dns1: Option<String>,
    #[serde(rename = "DNS2", skip_serializing_if = "Option::is_none")]
    pub dns2: Option<String>,
    #[serde(rename = "EnableDomainProxy")]
    pub enable_domain_proxy: bool,
    #[serde(rename = "PermitPremiumActivation")]
    pub permit_premium_activation: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderActivateResponse {
    #[serde(rename = "TaskNo")]
    pub task_no: String,
}

// ============ 云解析记录 ============

#[derive(Debug, Serialize)]
pub struct DescribeDomainRecordsRequest {
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    #[serde(rename = "PageNumber")]
    pub page_number: u32,
    #[serde(rename = "PageSize")]
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct DescribeDomainRecordsResponse {
    #[serde(rename = "DomainRecords")]
    pub domain_records: Option<DomainRecordsWrapper>,
    #[serde(rename = "TotalCount")]
    pub total_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DomainRecordsWrapper {
    #[serde(rename = "Record")]
    pub record: Option<Vec<AliyunRecord>>,
}

#[derive(Debug, Deserialize)]
pub struct AliyunRecord {
    #[serde(rename = "RR")]
    pub rr: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(rename = "Priority")]
    pub priority: Option<u16>,
    /// `ENABLE` / `DISABLE`
    #[serde(rename = "Status")]
    pub status: Option<String>,
}
