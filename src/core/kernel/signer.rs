use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Result type for signing operations: (headers, `query_params`)
pub type SignatureResult = Result<(HashMap<String, String>, Vec<(String, String)>), ExchangeError>;

/// Signer trait for request authentication
///
/// This trait provides a unified interface between the transport and the
/// venue's signing scheme. The implementation owns the credentials and the
/// protocol; the transport only merges the returned headers and query
/// parameters into the outgoing request.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign a request and return headers and query parameters
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    /// * `query_string` - Query string (without leading '?')
    /// * `body` - Raw request body bytes
    /// * `timestamp` - Request timestamp in milliseconds
    ///
    /// # Returns
    /// Tuple of (headers, signed_query_params) to include in the request
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult;
}

/// No-op signer for testing or non-authenticated requests
///
/// Passes the caller's query parameters through untouched and adds no
/// headers.
pub struct NoopSigner;

#[async_trait]
impl Signer for NoopSigner {
    fn sign_request(
        &self,
        _method: &str,
        _endpoint: &str,
        query_string: &str,
        _body: &[u8],
        _timestamp: u64,
    ) -> SignatureResult {
        let headers = HashMap::new();
        let signed_params = if query_string.is_empty() {
            Vec::new()
        } else {
            query_string
                .split('&')
                .filter_map(|param| {
                    param
                        .split_once('=')
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                })
                .collect()
        };

        Ok((headers, signed_params))
    }
}
