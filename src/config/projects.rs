//! Project catalog.
//!
//! With a `configs` map in the secrets document every entry becomes a
//! selectable mode. Without one, a single project is built from the `DOGS`
//! and `HANDLERS` environment lists.

use serde::Deserialize;
use tracing::debug;

use super::{ConfigError, SecretsDocument};
use crate::domain::{FieldConfig, ProjectConfig};

/// Mode of the project built from environment lists
pub const DEFAULT_MODE: &str = "beit_oved";

/// One entry of the `configs` map
#[derive(Debug, Deserialize)]
struct ProjectDocument {
    title: String,
    #[serde(default)]
    subtitle: String,
    #[serde(default)]
    audio_prompt: String,
    s3_prefix: String,
    /// Field key -> definition, in display order
    fields: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
struct FieldDocument {
    label: String,
    options: OptionList,
}

/// Options written either as a YAML list or a comma-separated string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OptionList {
    List(Vec<String>),
    Csv(String),
}

impl OptionList {
    fn into_field(self, key: String, label: String) -> FieldConfig {
        match self {
            OptionList::List(options) => FieldConfig::new(key, label, options),
            OptionList::Csv(csv) => FieldConfig::from_csv(key, label, &csv),
        }
    }
}

/// All selectable projects, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ProjectCatalog {
    projects: Vec<ProjectConfig>,
}

fn invalid(mode: &str, message: impl ToString) -> ConfigError {
    ConfigError::InvalidProjectDocument {
        mode: mode.to_string(),
        message: message.to_string(),
    }
}

impl ProjectCatalog {
    /// Load from the secrets document's `configs`, or from environment lists
    pub fn load(
        secrets: Option<&SecretsDocument>,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        match secrets.and_then(|doc| doc.configs.as_ref()) {
            Some(configs) => Self::from_configs(configs),
            None => Self::from_env(env),
        }
    }

    /// Parse and validate every entry of a `configs` map
    pub fn from_configs(configs: &serde_yaml::Mapping) -> Result<Self, ConfigError> {
        let mut projects = Vec::with_capacity(configs.len());

        for (mode, value) in configs {
            let mode = mode
                .as_str()
                .ok_or_else(|| invalid(&format!("{:?}", mode), "mode name must be a string"))?;

            let doc: ProjectDocument =
                serde_yaml::from_value(value.clone()).map_err(|e| invalid(mode, e))?;

            let mut fields = Vec::with_capacity(doc.fields.len());
            for (key, field_value) in &doc.fields {
                let key = key
                    .as_str()
                    .ok_or_else(|| invalid(mode, "field keys must be strings"))?;
                let field: FieldDocument = serde_yaml::from_value(field_value.clone())
                    .map_err(|e| invalid(mode, format!("field '{}': {}", key, e)))?;
                fields.push(field.options.into_field(key.to_string(), field.label));
            }

            let project = ProjectConfig::new(
                mode,
                doc.title,
                doc.subtitle,
                doc.audio_prompt,
                doc.s3_prefix,
                fields,
            )?;
            debug!(mode, fields = project.fields.len(), "Loaded project");
            projects.push(project);
        }

        if projects.is_empty() {
            return Err(ConfigError::NoProjects);
        }

        Ok(Self { projects })
    }

    /// Single project from `DOGS` (required) and `HANDLERS` (optional)
    pub fn from_env(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut fields = vec![FieldConfig::from_csv(
            "dog",
            "Dog Name",
            &env("DOGS").unwrap_or_default(),
        )];
        if let Some(handlers) = env("HANDLERS") {
            fields.push(FieldConfig::from_csv("handler", "Handler Name", &handlers));
        }

        let project = ProjectConfig::new(
            DEFAULT_MODE,
            "Beit Oved Training",
            "Insert data here",
            "Record Audio:",
            DEFAULT_MODE,
            fields,
        )?;

        Ok(Self {
            projects: vec![project],
        })
    }

    /// Mode names in declaration order
    pub fn modes(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn get(&self, mode: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.name == mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectConfig> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Select a project by mode.
    ///
    /// Without a mode, a catalog with exactly one project selects it; a
    /// larger catalog needs an explicit choice.
    pub fn select(&self, mode: Option<&str>) -> Result<&ProjectConfig, ConfigError> {
        let available = || -> Vec<String> { self.modes().into_iter().map(String::from).collect() };

        match mode {
            Some(mode) => self.get(mode).ok_or_else(|| ConfigError::UnknownMode {
                mode: mode.to_string(),
                available: available(),
            }),
            None if self.projects.len() == 1 => Ok(&self.projects[0]),
            None => Err(ConfigError::NoModeSelected(available())),
        }
    }
}
