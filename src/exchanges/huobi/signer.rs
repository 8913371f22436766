use crate::core::errors::ExchangeError;
use crate::core::kernel::{SignatureResult, Signer};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::{BTreeMap, HashMap};

type HmacSha256 = Hmac<Sha256>;

/// Signer for Huobi's SignatureVersion 2 scheme.
///
/// Credentials travel as query parameters, not headers: AccessKeyId,
/// SignatureMethod, SignatureVersion and Timestamp are merged with the
/// request's own query (for non-POST verbs), sorted, percent-encoded and
/// signed with HMAC-SHA256 over `METHOD\nhost\npath\nquery`. POST bodies
/// are JSON and stay outside the signature.
pub struct HuobiSigner {
    api_key: String,
    secret_key: String,
    host: String,
}

impl HuobiSigner {
    /// `host` is the bare hostname the request will hit, e.g.
    /// `api.huobi.pro`; it is part of the signed payload, so it must match
    /// the URL the client actually uses.
    pub fn new(api_key: String, secret_key: String, host: String) -> Self {
        Self {
            api_key,
            secret_key,
            host,
        }
    }

    /// Format a millisecond timestamp as the venue's UTC signing timestamp
    fn format_timestamp(timestamp_ms: u64) -> Result<String, ExchangeError> {
        let datetime = chrono::DateTime::from_timestamp_millis(timestamp_ms as i64)
            .ok_or_else(|| ExchangeError::Other("Invalid timestamp".to_string()))?;
        Ok(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    /// The four credential parameters every signed request carries
    fn signing_params(&self, timestamp: &str) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("AccessKeyId".to_string(), self.api_key.clone());
        params.insert("SignatureMethod".to_string(), "HmacSHA256".to_string());
        params.insert("SignatureVersion".to_string(), "2".to_string());
        params.insert("Timestamp".to_string(), timestamp.to_string());
        params
    }

    /// Percent-encode and join the sorted parameter set. The BTreeMap
    /// already holds the ascending key order the venue requires.
    fn canonical_query(params: &BTreeMap<String, String>) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn payload_for(&self, method: &str, path: &str, canonical_query: &str) -> String {
        [method, self.host.as_str(), path, canonical_query].join("\n")
    }

    fn hmac_base64(&self, payload: &str) -> Result<String, ExchangeError> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| ExchangeError::Other(format!("Failed to create HMAC: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl Signer for HuobiSigner {
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        _body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        if self.api_key.is_empty() || self.secret_key.is_empty() {
            return Err(ExchangeError::MissingCredentials(
                "API key and secret are required for private endpoints".to_string(),
            ));
        }

        let timestamp = Self::format_timestamp(timestamp)?;
        let mut params = self.signing_params(&timestamp);

        // POST requests sign the credentials alone; the JSON body is not
        // part of the signature. Everything else signs the caller's query
        // merged into the credential set.
        if method != "POST" {
            for pair in query_string.split('&').filter(|pair| !pair.is_empty()) {
                match pair.split_once('=') {
                    Some((key, value)) => params.insert(key.to_string(), value.to_string()),
                    None => params.insert(pair.to_string(), String::new()),
                };
            }
        }

        let canonical = Self::canonical_query(&params);
        let payload = self.payload_for(method, endpoint, &canonical);
        let signature = self.hmac_base64(&payload)?;

        // The signature itself is never part of the signed set
        let mut signed_params: Vec<(String, String)> = params.into_iter().collect();
        signed_params.push(("Signature".to_string(), signature));

        let mut headers = HashMap::new();
        if method != "POST" {
            headers.insert(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            );
        }

        Ok((headers, signed_params))
    }
}
