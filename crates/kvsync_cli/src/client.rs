//! reqwest-backed HTTP client for the store.

use kvsync_engine::{HttpClient, HttpResponse, SyncConfig, SyncError, SyncResult};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

const TOKEN_HEADER: &str = "x-consul-token";

/// Blocking HTTP client with the configured timeout and ACL token.
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Builds a client from the sync configuration.
    pub fn new(config: &SyncConfig) -> SyncResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(token).map_err(|_| {
                SyncError::InvalidConfig("token contains characters not allowed in a header".into())
            })?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(TOKEN_HEADER), value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn put(&self, url: &str, body: Vec<u8>) -> SyncResult<HttpResponse> {
        let response = self
            .client
            .put(url)
            .body(body)
            .send()
            .map_err(|e| classify(e, url))?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| classify(e, url))?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn classify(e: reqwest::Error, url: &str) -> SyncError {
    if e.is_timeout() {
        SyncError::Timeout
    } else if e.is_connect() {
        SyncError::transport(format!("connection to {} failed: {}", url, e))
    } else {
        SyncError::transport(format!("request to {} failed: {}", url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builds_with_token() {
        let config = SyncConfig::default().with_token("s3cr3t");
        assert!(ReqwestClient::new(&config).is_ok());
    }

    #[test]
    fn rejects_token_with_newline() {
        let config = SyncConfig::default().with_token("bad\ntoken");
        assert!(matches!(
            ReqwestClient::new(&config),
            Err(SyncError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unreachable_store_is_transport_error() {
        // Nothing listens on the discard port.
        let config = SyncConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
        let client = ReqwestClient::new(&config).unwrap();
        let err = client.put(&config.txn_url(), b"[]".to_vec()).unwrap_err();
        assert!(err.is_transport());
    }
}
