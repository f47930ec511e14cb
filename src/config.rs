//! Configuration resolution.
//!
//! Two sources, never merged:
//! 1. A secrets document (`.intake/secrets.yaml`), the hosted-secrets store
//! 2. Process environment variables (optionally seeded from `.env`)
//!
//! Secrets document discovery (first match wins):
//! - explicit path (`--secrets` / `INTAKE_SECRETS`)
//! - `.intake/secrets.yaml` in the current directory or any parent
//! - `~/.intake/secrets.yaml`
//!
//! Every failure here is fatal: the form is never shown with a partial
//! configuration.

pub mod credentials;
pub mod projects;

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::ProjectError;

pub use credentials::{CredentialSource, Credentials};
pub use projects::ProjectCatalog;

/// Directory holding the secrets document
pub const SECRETS_DIR: &str = ".intake";
/// Secrets document file name
pub const SECRETS_FILE: &str = "secrets.yaml";
/// Time zone used when `APP_TIMEZONE` is unset
pub const DEFAULT_TIMEZONE: &str = "Asia/Jerusalem";

/// Configuration errors (all fatal)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AWS credentials or bucket not configured: {0} is missing")]
    MissingCredential(&'static str),

    #[error("Secrets file not found: {0}")]
    SecretsNotFound(PathBuf),

    #[error("Failed to read secrets file {path}: {source}")]
    ReadSecrets {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse secrets file {path}: {source}")]
    ParseSecrets {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown mode '{mode}' (available: {})", .available.join(", "))]
    UnknownMode { mode: String, available: Vec<String> },

    #[error("No mode selected (available: {})", .0.join(", "))]
    NoModeSelected(Vec<String>),

    #[error("No project configurations defined")]
    NoProjects,

    #[error("Invalid project configuration '{mode}': {message}")]
    InvalidProjectDocument { mode: String, message: String },

    #[error(transparent)]
    InvalidProject(#[from] ProjectError),
}

/// Raw secrets document schema (matches the YAML layout)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsDocument {
    #[serde(rename = "AWS_ACCESS_KEY_ID")]
    pub aws_access_key_id: Option<String>,
    #[serde(rename = "AWS_SECRET_ACCESS_KEY")]
    pub aws_secret_access_key: Option<String>,
    #[serde(rename = "AWS_REGION")]
    pub aws_region: Option<String>,
    #[serde(rename = "S3_BUCKET_NAME")]
    pub s3_bucket_name: Option<String>,
    #[serde(rename = "S3_ENDPOINT_URL")]
    pub s3_endpoint_url: Option<String>,

    /// Named project configurations, in declaration order
    #[serde(default)]
    pub configs: Option<serde_yaml::Mapping>,
}

impl SecretsDocument {
    /// Parse a secrets document from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Value of a credential variable by its environment name
    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            credentials::ACCESS_KEY_ID => self.aws_access_key_id.clone(),
            credentials::SECRET_ACCESS_KEY => self.aws_secret_access_key.clone(),
            credentials::REGION => self.aws_region.clone(),
            credentials::BUCKET => self.s3_bucket_name.clone(),
            credentials::ENDPOINT => self.s3_endpoint_url.clone(),
            _ => None,
        }
    }

    /// Whether this document is the credential source
    pub fn has_credentials(&self) -> bool {
        self.aws_access_key_id.is_some()
    }
}

/// Non-secret runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Zone used to seed the default time; `None` means system local time
    pub timezone: Option<Tz>,
    /// Zone name as configured
    pub timezone_name: String,
}

impl Settings {
    /// Read settings from an environment lookup
    pub fn from_env(env: &dyn Fn(&str) -> Option<String>) -> Self {
        let timezone_name = env("APP_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = timezone_name.parse::<Tz>().ok();
        if timezone.is_none() {
            warn!(timezone = %timezone_name, "Unknown time zone, using system local time");
        }
        Self {
            timezone,
            timezone_name,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_env(&|_| None)
    }
}

/// Fully resolved configuration, built once per invocation
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub credentials: Credentials,
    pub credential_source: CredentialSource,
    pub projects: ProjectCatalog,
    pub settings: Settings,
    /// Secrets document in use (if found)
    pub secrets_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Resolve configuration from a secrets document (if any) and the environment
    pub fn resolve(
        secrets: Option<&SecretsDocument>,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let (credentials, credential_source) = Credentials::resolve(secrets, env)?;
        let projects = ProjectCatalog::load(secrets, env)?;
        let settings = Settings::from_env(env);

        info!(
            source = ?credential_source,
            bucket = %credentials.bucket,
            region = %credentials.region,
            projects = projects.len(),
            "Configuration resolved"
        );

        Ok(Self {
            credentials,
            credential_source,
            projects,
            settings,
            secrets_file: None,
        })
    }

    /// Discover the secrets document and resolve against the process environment
    pub fn load(explicit_secrets: Option<&Path>) -> Result<Self, ConfigError> {
        let secrets_file = match explicit_secrets {
            Some(path) if !path.exists() => {
                return Err(ConfigError::SecretsNotFound(path.to_path_buf()))
            }
            Some(path) => Some(path.to_path_buf()),
            None => find_secrets_file(),
        };

        let secrets = secrets_file
            .as_deref()
            .map(load_secrets_file)
            .transpose()?;

        let mut config = Self::resolve(secrets.as_ref(), &process_env)?;
        config.secrets_file = secrets_file;
        Ok(config)
    }
}

/// Seed the process environment from a dotenv file.
///
/// Returns whether the file was loaded. A missing file is not an error;
/// a malformed one is. Variables already set are left alone.
pub fn load_env_file(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded environment file");
            Ok(true)
        }
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Environment lookup backed by the process environment.
///
/// Empty values count as unset.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Find the secrets document by searching the current directory, its
/// parents, then the home directory
fn find_secrets_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let candidate = current.join(SECRETS_DIR).join(SECRETS_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                break;
            }
        }
    }

    let home = dirs::home_dir()?.join(SECRETS_DIR).join(SECRETS_FILE);
    home.exists().then_some(home)
}

/// Load and parse a secrets document
pub fn load_secrets_file(path: &Path) -> Result<SecretsDocument, ConfigError> {
    debug!(path = %path.display(), "Loading secrets file");

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadSecrets {
        path: path.to_path_buf(),
        source,
    })?;

    SecretsDocument::from_yaml(&content).map_err(|source| ConfigError::ParseSecrets {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_secrets_document_parsing() {
        let doc = SecretsDocument::from_yaml(
            r#"
AWS_ACCESS_KEY_ID: AKID
AWS_SECRET_ACCESS_KEY: SECRET
S3_BUCKET_NAME: audio
configs:
  training:
    title: Training
    s3_prefix: training
    fields:
      dog:
        label: Dog Name
        options: [Rex]
"#,
        )
        .unwrap();

        assert!(doc.has_credentials());
        assert_eq!(doc.get("S3_BUCKET_NAME"), Some("audio".to_string()));
        assert_eq!(doc.get("AWS_REGION"), None);
        assert_eq!(doc.configs.unwrap().len(), 1);
    }

    #[test]
    fn test_settings_timezone() {
        let settings = Settings::from_env(&lookup(&[]));
        assert_eq!(settings.timezone_name, "Asia/Jerusalem");
        assert_eq!(settings.timezone, Some(chrono_tz::Asia::Jerusalem));

        let settings = Settings::from_env(&lookup(&[("APP_TIMEZONE", "Mars/Olympus")]));
        assert!(settings.timezone.is_none());
    }

    #[test]
    fn test_resolve_from_environment() {
        let env = lookup(&[
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "SECRET"),
            ("S3_BUCKET_NAME", "audio"),
            ("DOGS", "Rex,Bella"),
        ]);
        let config = ResolvedConfig::resolve(None, &env).unwrap();

        assert_eq!(config.credential_source, CredentialSource::Environment);
        assert_eq!(config.credentials.region, "eu-central-1");
        assert_eq!(config.projects.modes(), vec!["beit_oved"]);
    }

    #[test]
    fn test_load_secrets_file_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SECRETS_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "configs: [not, a, map").unwrap();

        let err = load_secrets_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseSecrets { .. }));

        let err = load_secrets_file(&temp.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadSecrets { .. }));
    }

    #[test]
    fn test_load_env_file() {
        let temp = TempDir::new().unwrap();

        assert!(!load_env_file(&temp.path().join(".env")).unwrap());

        let path = temp.path().join("good.env");
        std::fs::write(&path, "VOICE_INTAKE_ENV_FILE_TEST=loaded\n").unwrap();
        assert!(load_env_file(&path).unwrap());
        assert_eq!(
            std::env::var("VOICE_INTAKE_ENV_FILE_TEST").as_deref(),
            Ok("loaded")
        );

        let path = temp.path().join("bad.env");
        std::fs::write(&path, "AWS_ACCESS_KEY_ID=\"unterminated\n").unwrap();
        let err = load_env_file(&path).unwrap_err();
        assert!(!err.not_found());
    }

    #[test]
    fn test_explicit_secrets_must_exist() {
        let err = ResolvedConfig::load(Some(Path::new("/no/such/secrets.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::SecretsNotFound(_)));
    }
}
