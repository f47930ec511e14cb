//! Storage credentials.
//!
//! Resolved once from exactly one source: the secrets document when it
//! carries `AWS_ACCESS_KEY_ID`, otherwise the environment.

use std::fmt;

use serde::Serialize;

use super::{ConfigError, SecretsDocument};

pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const REGION: &str = "AWS_REGION";
pub const BUCKET: &str = "S3_BUCKET_NAME";
pub const ENDPOINT: &str = "S3_ENDPOINT_URL";

/// Region used when `AWS_REGION` is absent
pub const DEFAULT_REGION: &str = "eu-central-1";

/// Where credentials were read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    SecretsFile,
    Environment,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::SecretsFile => write!(f, "secrets file"),
            CredentialSource::Environment => write!(f, "environment"),
        }
    }
}

/// S3 access configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    /// S3-compatible endpoint override (path-style addressing)
    pub endpoint: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Credentials {
    /// Resolve credentials from the secrets document if it has them, else the environment
    pub fn resolve(
        secrets: Option<&SecretsDocument>,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(Self, CredentialSource), ConfigError> {
        match secrets {
            Some(doc) if doc.has_credentials() => {
                Ok((Self::from_lookup(|name| doc.get(name))?, CredentialSource::SecretsFile))
            }
            _ => Ok((Self::from_lookup(env)?, CredentialSource::Environment)),
        }
    }

    /// Build credentials from a single lookup.
    ///
    /// Access key, secret key and bucket are required; a blank value counts
    /// as missing. An absent region falls back to [`DEFAULT_REGION`], a
    /// blank one is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential(name))
        };

        let access_key_id = required(ACCESS_KEY_ID)?;
        let secret_access_key = required(SECRET_ACCESS_KEY)?;
        let bucket = required(BUCKET)?;

        let region = match lookup(REGION) {
            None => DEFAULT_REGION.to_string(),
            Some(r) if r.trim().is_empty() => return Err(ConfigError::MissingCredential(REGION)),
            Some(r) => r.trim().to_string(),
        };

        let endpoint = lookup(ENDPOINT)
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(Self {
            access_key_id,
            secret_access_key,
            region,
            bucket,
            endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::from_lookup(|name| match name {
            ACCESS_KEY_ID => Some("AKID".to_string()),
            SECRET_ACCESS_KEY => Some("hunter2".to_string()),
            BUCKET => Some("audio".to_string()),
            _ => None,
        })
        .unwrap();

        let debug = format!("{:?}", creds);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
        assert_eq!(creds.region, DEFAULT_REGION);
        assert_eq!(creds.endpoint, None);
    }

    #[test]
    fn test_blank_region_is_an_error() {
        let err = Credentials::from_lookup(|name| match name {
            REGION => Some("  ".to_string()),
            _ => Some("x".to_string()),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(REGION)));
    }
}
