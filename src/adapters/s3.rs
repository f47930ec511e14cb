//! S3 object store.
//!
//! One signed `PUT Object` per upload: no retry, no Content-Type, no
//! read-back. Existing objects at the same key are overwritten.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use tracing::{debug, info};

use super::sigv4::{uri_encode_path, SigningRequest};
use super::{ObjectStore, UploadError};
use crate::config::Credentials;

/// S3 client bound to one bucket
pub struct S3Store {
    credentials: Credentials,
    client: reqwest::Client,
    /// Host header value, with the port only when it is not the scheme default
    host: String,
    /// Scheme and authority
    origin: String,
    /// Path every object key is appended to (empty for virtual-hosted style)
    base_path: String,
}

impl S3Store {
    /// Bind to the bucket. With an endpoint override, addressing is
    /// path-style under the endpoint's own path.
    pub fn new(credentials: &Credentials) -> Result<Self, UploadError> {
        let (host, origin, base_path) = match &credentials.endpoint {
            Some(endpoint) => {
                let url = Url::parse(endpoint).map_err(|e| UploadError::InvalidEndpoint {
                    endpoint: endpoint.clone(),
                    message: e.to_string(),
                })?;
                let hostname = url.host_str().ok_or_else(|| UploadError::InvalidEndpoint {
                    endpoint: endpoint.clone(),
                    message: "no host".to_string(),
                })?;
                let host = match url.port() {
                    Some(port) => format!("{}:{}", hostname, port),
                    None => hostname.to_string(),
                };
                let origin = format!("{}://{}", url.scheme(), host);
                let base_path = format!(
                    "{}/{}",
                    url.path().trim_end_matches('/'),
                    uri_encode_path(&credentials.bucket)
                );
                (host, origin, base_path)
            }
            None => {
                let host = format!(
                    "{}.s3.{}.amazonaws.com",
                    credentials.bucket, credentials.region
                );
                let origin = format!("https://{}", host);
                (host, origin, String::new())
            }
        };

        debug!(host = %host, base_path = %base_path, "S3 endpoint");
        Ok(Self {
            credentials: credentials.clone(),
            client: reqwest::Client::new(),
            host,
            origin,
            base_path,
        })
    }

    /// Public location of `key` (unsigned)
    pub fn object_url(&self, key: &str) -> String {
        format!("{}{}", self.origin, self.canonical_uri(key))
    }

    /// Absolute request path used in the canonical request
    fn canonical_uri(&self, key: &str) -> String {
        format!("{}/{}", self.base_path, uri_encode_path(key))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        "s3"
    }

    async fn put(&self, bytes: Vec<u8>, key: &str) -> Result<String, UploadError> {
        let canonical_uri = self.canonical_uri(key);
        let url = self.object_url(key);

        let signed = SigningRequest {
            method: "PUT",
            host: &self.host,
            canonical_uri: &canonical_uri,
            payload: &bytes,
            region: &self.credentials.region,
            access_key_id: &self.credentials.access_key_id,
            secret_access_key: &self.credentials.secret_access_key,
            timestamp: Utc::now(),
        }
        .sign();

        debug!(bucket = %self.credentials.bucket, key, bytes = bytes.len(), "PUT object");

        let response = self
            .client
            .put(&url)
            .header("x-amz-date", signed.amz_date)
            .header("x-amz-content-sha256", signed.content_sha256)
            .header("authorization", signed.authorization)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(key, "Uploaded object");
        Ok(url)
    }
}
