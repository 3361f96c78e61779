//! Route 53 Domains JSON 1.1 请求方法

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{RegistrarError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::sign::SignableRequest;
use super::types::AwsErrorBody;
use super::{ROUTE53_TARGET_PREFIX, Route53Client};

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

impl Route53Client {
    /// Invoke one `Route53Domains_v20140515.<operation>`.
    pub(crate) async fn call<T: DeserializeOwned, B: Serialize>(
        &self,
        operation: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let payload = serde_json::to_vec(body).map_err(|e| RegistrarError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        })?;
        let amz_date = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let target = format!("{ROUTE53_TARGET_PREFIX}.{operation}");

        let headers = vec![
            ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ("Host".to_string(), self.host.clone()),
            ("X-Amz-Date".to_string(), amz_date.clone()),
            ("X-Amz-Target".to_string(), target),
        ];
        let authorization = self.signer.authorization(&SignableRequest {
            method: "POST",
            uri: "/",
            query: "",
            headers: &headers,
            payload: &payload,
            amz_date: &amz_date,
        });

        let mut request = self
            .client
            .post(format!("https://{}/", self.host))
            .header("Authorization", authorization)
            .body(payload);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), "POST", operation).await?;

        if status >= 400 {
            let raw = match serde_json::from_str::<AwsErrorBody>(&response_text) {
                Ok(body) => match body.short_type() {
                    Some(code) => RawApiError::with_code(
                        code,
                        body.message.clone().unwrap_or_else(|| format!("HTTP {status}")),
                    ),
                    None => RawApiError::new(format!("HTTP {status}")),
                },
                Err(_) => RawApiError::new(format!("HTTP {status}")),
            };
            let err = self.map_error(raw.status(status), ctx);
            if err.is_expected() {
                log::warn!("[route53] {operation} failed: {err}");
            } else {
                log::error!("[route53] {operation} failed: {err}");
            }
            return Err(err);
        }

        HttpUtils::parse_json(&response_text, self.provider_name())
    }
}
