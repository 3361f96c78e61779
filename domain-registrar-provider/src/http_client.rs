//! Shared HTTP plumbing for registrar adapters.
//!
//! Each adapter builds its own `RequestBuilder` (registrars disagree wildly on
//! authentication), then hands it here for sending, logging and status-class
//! mapping.
//!
//! Requests are sent exactly once. A registration call that times out may still
//! have been acted on by the registrar, so retrying is left to callers that can
//! re-check state first.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::RegistrarError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the status code and response text.
    ///
    /// # Arguments
    /// * `request_builder` - fully configured request (URL, headers, signature, body)
    /// * `provider_name` - registrar code, used for logs and errors
    /// * `method_name` - HTTP method, used for logs
    /// * `url_or_action` - URL or action name, used for logs
    ///
    /// # Errors
    /// * `Timeout` when the request timed out
    /// * `NetworkError` on connection failures and HTTP 502-504
    /// * `RateLimited` on HTTP 429, carrying `Retry-After` when present
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), RegistrarError> {
        log::debug!("[{provider_name}] {method_name} {url_or_action}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                RegistrarError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                RegistrarError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        // Must be read before the body consumes the response.
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(RegistrarError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(truncate_for_log(&body).into_owned()),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Gateway error (HTTP {status_code})");
            return Err(RegistrarError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| RegistrarError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    ///
    /// # Errors
    /// `ParseError` if the text does not deserialize into `T`.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, RegistrarError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            RegistrarError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        available: bool,
    }

    #[test]
    fn parse_json_ok() {
        let probe: Probe = HttpUtils::parse_json(r#"{"available":true}"#, "test").unwrap();
        assert!(probe.available);
    }

    #[test]
    fn parse_json_reports_parse_error() {
        let err = HttpUtils::parse_json::<Probe>("<html>", "godaddy").unwrap_err();
        match err {
            RegistrarError::ParseError { provider, .. } => assert_eq!(provider, "godaddy"),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }
}
