//! Adapter interfaces for external systems.
//!
//! Two narrow ports keep the form independent of any storage SDK or
//! recording device:
//! - [`ObjectStore`]: puts bytes under a key and returns the object location
//! - [`AudioCapture`]: yields a recording when one is available

pub mod capture;
pub mod s3;
pub mod sigv4;

use async_trait::async_trait;
use thiserror::Error;

pub use capture::{wav_spec, CaptureError, MemoryCapture, WavFileCapture};
pub use s3::S3Store;

/// Errors from an object store upload
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid S3 endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

/// Blob storage port
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Human-readable store name
    fn name(&self) -> &str;

    /// Create or overwrite the object at `key`, returning its location
    async fn put(&self, bytes: Vec<u8>, key: &str) -> Result<String, UploadError>;
}

/// Opaque audio source
pub trait AudioCapture {
    /// Latest recording, or `None` if nothing new has been recorded
    fn poll(&mut self) -> Option<Vec<u8>>;
}
