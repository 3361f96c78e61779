//! AWS Signature Version 4

use std::fmt::Write;

use crate::providers::common::{hmac_sha256, sha256_hex};
use crate::utils::log_sanitizer::truncate_for_log;

/// Signs requests for one AWS service in one region.
pub(crate) struct SigV4Signer {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub service: String,
}

/// One request as seen by the signer.
pub(crate) struct SignableRequest<'a> {
    pub method: &'a str,
    pub uri: &'a str,
    pub query: &'a str,
    /// Must include `host` and `x-amz-date`.
    pub headers: &'a [(String, String)],
    pub payload: &'a [u8],
    /// `YYYYMMDDTHHMMSSZ`
    pub amz_date: &'a str,
}

impl SigV4Signer {
    /// Build the `Authorization` header value.
    /// Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>
    pub(crate) fn authorization(&self, req: &SignableRequest<'_>) -> String {
        let date = req.amz_date.get(..8).unwrap_or(req.amz_date);
        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);

        let canonical_query = if req.query.is_empty() {
            String::new()
        } else {
            let mut params: Vec<&str> = req.query.split('&').collect();
            params.sort_unstable();
            params.join("&")
        };

        let mut sorted_headers: Vec<(String, &str)> = req
            .headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.trim()))
            .collect();
        sorted_headers.sort_by(|a, b| a.0.cmp(&b.0));

        let canonical_headers = sorted_headers
            .iter()
            .fold(String::new(), |mut acc, (k, v)| {
                let _ = writeln!(acc, "{k}:{v}");
                acc
            });
        let signed_headers = sorted_headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let canonical_request = format!(
            "{}\n{}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{}",
            req.method,
            req.uri,
            sha256_hex(req.payload)
        );
        log::debug!("CanonicalRequest:\n{}", truncate_for_log(&canonical_request));

        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{scope}\n{}",
            req.amz_date,
            sha256_hex(canonical_request.as_bytes())
        );

        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_access_key).as_bytes(),
            date.as_bytes(),
        );
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        let k_signing = hmac_sha256(&k_service, b"aws4_request");
        let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes()));

        format!(
            "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.access_key_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_signer() -> SigV4Signer {
        SigV4Signer {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            region: "us-east-1".to_string(),
            service: "service".to_string(),
        }
    }

    fn vanilla_headers() -> Vec<(String, String)> {
        vec![
            ("Host".to_string(), "example.amazonaws.com".to_string()),
            ("X-Amz-Date".to_string(), "20150830T123600Z".to_string()),
        ]
    }

    /// `get-vanilla` from the AWS SigV4 test suite.
    #[test]
    fn get_vanilla() {
        let headers = vanilla_headers();
        let auth = example_signer().authorization(&SignableRequest {
            method: "GET",
            uri: "/",
            query: "",
            headers: &headers,
            payload: b"",
            amz_date: "20150830T123600Z",
        });
        assert_eq!(
            auth,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    #[test]
    fn query_order_does_not_matter() {
        let headers = vanilla_headers();
        let sign = |query| {
            example_signer().authorization(&SignableRequest {
                method: "GET",
                uri: "/",
                query,
                headers: &headers,
                payload: b"",
                amz_date: "20150830T123600Z",
            })
        };
        assert_eq!(sign("a=1&b=2"), sign("b=2&a=1"));
    }

    #[test]
    fn payload_changes_signature() {
        let headers = vanilla_headers();
        let sign = |payload: &'static [u8]| {
            example_signer().authorization(&SignableRequest {
                method: "POST",
                uri: "/",
                query: "",
                headers: &headers,
                payload,
                amz_date: "20150830T123600Z",
            })
        };
        assert_ne!(sign(b"{}"), sign(b"{\"a\":1}"));
    }
}
