//! 阿里云 RPC 请求方法

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::sign::SignInput;
use super::types::serialize_to_query_string;
use super::{AliyunApi, AliyunClient, EMPTY_BODY_SHA256};

/// Pull `Code`/`Message` out of an Aliyun error body.
fn api_error(value: &serde_json::Value) -> Option<RawApiError> {
    let code = value.get("Code").and_then(|v| v.as_str())?;
    let message = value
        .get("Message")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    Some(RawApiError::with_code(code, message))
}

impl AliyunClient {
    /// Execute an Aliyun RPC call (parameters in the query string, empty body).
    pub(crate) async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        api: AliyunApi,
        action: &str,
        params: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let (host, version) = self.host_and_version(api);
        let query_string = serialize_to_query_string(params)?;
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = uuid::Uuid::new_v4().to_string();

        let authorization = self.sign(&SignInput {
            host,
            version,
            action,
            query_string: &query_string,
            timestamp: &timestamp,
            nonce: &nonce,
        });

        let url = if query_string.is_empty() {
            format!("https://{host}/")
        } else {
            format!("https://{host}/?{query_string}")
        };

        let request = self
            .client
            .post(&url)
            .header("Host", host)
            .header("x-acs-action", action)
            .header("x-acs-version", version)
            .header("x-acs-date", &timestamp)
            .header("x-acs-signature-nonce", &nonce)
            .header("x-acs-content-sha256", EMPTY_BODY_SHA256)
            .header("Authorization", authorization);

        let (status, response_text) = HttpUtils::execute_request(
            request,
            self.provider_name(),
            "POST",
            &format!("{host} (Action: {action})"),
        )
        .await?;

        if status >= 400 {
            let raw = serde_json::from_str::<serde_json::Value>(&response_text)
                .ok()
                .as_ref()
                .and_then(api_error)
                .unwrap_or_else(|| RawApiError::new(format!("HTTP {status}")));
            let err = self.map_error(raw.status(status), ctx);
            if err.is_expected() {
                log::warn!("[aliyun] {action} failed: {err}");
            } else {
                log::error!("[aliyun] {action} failed: {err}");
            }
            return Err(err);
        }

        let value: serde_json::Value = HttpUtils::parse_json(&response_text, self.provider_name())?;

        // Some gateways answer 200 with an error envelope.
        if let Some(raw) = api_error(&value) {
            let err = self.map_error(raw, ctx);
            log::warn!("[aliyun] {action} failed: {err}");
            return Err(err);
        }

        serde_json::from_value(value).map_err(|e| self.parse_error(e))
    }
}
