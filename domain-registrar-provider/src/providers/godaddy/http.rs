//! `GoDaddy` HTTP 请求方法

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{RegistrarError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::GodaddyClient;
use super::types::GodaddyErrorBody;

impl GodaddyClient {
    fn auth_header(&self) -> String {
        format!("sso-key {}:{}", self.api_key, self.api_secret)
    }

    /// Send a request and decode the JSON response.
    ///
    /// Non-2xx responses are decoded as `{code, message}` and mapped through
    /// [`ProviderErrorMapper`].
    pub(crate) async fn request<T, B>(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<&B>,
        ctx: ErrorContext,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = format!("{}{path_and_query}", self.base_url);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json");
        if let Some(body) = body {
            let json = serde_json::to_vec(body).map_err(|e| RegistrarError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;
            request = request
                .header("Content-Type", "application/json")
                .body(json);
        }

        let (status, response_text) = HttpUtils::execute_request(
            request,
            self.provider_name(),
            method.as_str(),
            path_and_query,
        )
        .await?;

        if status >= 400 {
            let raw = match serde_json::from_str::<GodaddyErrorBody>(&response_text) {
                Ok(GodaddyErrorBody {
                    code: Some(code),
                    message,
                }) => RawApiError::with_code(
                    code,
                    message.unwrap_or_else(|| format!("HTTP {status}")),
                ),
                _ => RawApiError::new(format!("HTTP {status}")),
            };
            let err = self.map_error(raw.status(status), ctx);
            if err.is_expected() {
                log::warn!("[{}] API error: {err}", self.provider_name());
            } else {
                log::error!("[{}] API error: {err}", self.provider_name());
            }
            return Err(err);
        }

        HttpUtils::parse_json(&response_text, self.provider_name())
    }
}
