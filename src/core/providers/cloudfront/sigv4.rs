//! AWS Signature Version 4 signing for CloudFront requests
//!
//! Signatures are computed per request and never cached.

use crate::core::providers::error::{ProviderError, ProviderResult};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

const PROVIDER: &str = "cloudfront";
const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// AWS SigV4 signer
#[derive(Clone)]
pub struct SigV4Signer {
    access_key: String,
    secret_key: String,
    session_token: Option<String>,
    region: String,
    service: String,
}

impl std::fmt::Debug for SigV4Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigV4Signer")
            .field("access_key", &crate::utils::logging::mask_secret(&self.access_key))
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

impl SigV4Signer {
    /// Signer for the global CloudFront endpoint (`us-east-1`)
    pub fn new(access_key: String, secret_key: String, session_token: Option<String>) -> Self {
        Self {
            access_key,
            secret_key,
            session_token,
            region: "us-east-1".to_string(),
            service: "cloudfront".to_string(),
        }
    }

    /// Override the signing scope
    pub fn with_scope(mut self, region: &str, service: &str) -> Self {
        self.region = region.to_string();
        self.service = service.to_string();
        self
    }

    /// Sign a request, returning every header that must be sent with it
    ///
    /// `headers` are included in the signature. The returned map adds
    /// `host`, `x-amz-date`, the session token when present and
    /// `Authorization`.
    pub fn sign_request(
        &self,
        method: &str,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: &str,
        timestamp: DateTime<Utc>,
    ) -> ProviderResult<BTreeMap<String, String>> {
        let parsed = url::Url::parse(url)
            .map_err(|e| ProviderError::configuration(PROVIDER, format!("Invalid URL: {}", e)))?;
        let host = match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(ProviderError::configuration(PROVIDER, "Missing host in URL"));
            }
        };

        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = timestamp.format("%Y%m%d").to_string();

        let mut canonical: BTreeMap<String, String> = headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.trim().to_string()))
            .collect();
        canonical.insert("host".to_string(), host);
        canonical.insert("x-amz-date".to_string(), amz_date.clone());
        if let Some(token) = &self.session_token {
            canonical.insert("x-amz-security-token".to_string(), token.clone());
        }

        let canonical_headers: String = canonical
            .iter()
            .map(|(k, v)| format!("{}:{}\n", k, v))
            .collect();
        let signed_headers = canonical.keys().cloned().collect::<Vec<_>>().join(";");

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method.to_uppercase(),
            canonical_path(&parsed),
            canonical_query(&parsed),
            canonical_headers,
            signed_headers,
            hex::encode(Sha256::digest(body.as_bytes()))
        );

        let credential_scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            credential_scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = self.calculate_signature(&string_to_sign, &date_stamp)?;
        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.access_key, credential_scope, signed_headers, signature
        );

        let mut signed = canonical;
        signed.insert("Authorization".to_string(), authorization);
        Ok(signed)
    }

    fn calculate_signature(&self, string_to_sign: &str, date_stamp: &str) -> ProviderResult<String> {
        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        let k_signing = hmac_sha256(&k_service, b"aws4_request")?;
        Ok(hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes())?))
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> ProviderResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ProviderError::configuration(PROVIDER, format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn canonical_path(url: &url::Url) -> String {
    let path = url.path();
    if path.is_empty() { "/".to_string() } else { path.to_string() }
}

fn canonical_query(url: &url::Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn uri_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hmac_sha256() {
        let result = hmac_sha256(b"key", b"message").unwrap();
        let expected = "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011e917a9c6e0c3d5e4c3b";
        assert_eq!(hex::encode(result), expected);
    }

    #[test]
    fn test_get_vanilla_signature() {
        let signer = SigV4Signer::new(
            "AKIDEXAMPLE".to_string(),
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            None,
        )
        .with_scope("us-east-1", "service");

        let timestamp = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        let headers = signer
            .sign_request(
                "GET",
                "https://example.amazonaws.com/",
                &BTreeMap::new(),
                "",
                timestamp,
            )
            .unwrap();

        assert_eq!(
            headers["Authorization"],
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    #[test]
    fn test_session_token_is_signed() {
        let signer = SigV4Signer::new("AKIA".into(), "secret".into(), Some("token".into()));
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let headers = signer
            .sign_request(
                "GET",
                "http://127.0.0.1:8080/2020-05-31/distribution?MaxItems=1",
                &BTreeMap::new(),
                "",
                timestamp,
            )
            .unwrap();

        assert_eq!(headers["host"], "127.0.0.1:8080");
        assert_eq!(headers["x-amz-security-token"], "token");
        assert!(headers["Authorization"].contains("/us-east-1/cloudfront/aws4_request"));
        assert!(headers["Authorization"].contains("SignedHeaders=host;x-amz-date;x-amz-security-token"));
    }

    #[test]
    fn test_canonical_query_sorted_and_encoded() {
        let url = url::Url::parse("https://x.test/p?b=2&a=hello world").unwrap();
        assert_eq!(canonical_query(&url), "a=hello%20world&b=2");
    }
}
