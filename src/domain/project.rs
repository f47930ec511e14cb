//! Project and field definitions.
//!
//! A project (mode) bundles the display text, the storage prefix and the
//! ordered list of dropdown fields shown on the form. Projects are validated
//! once when loaded and are never mutated afterwards.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while validating a project definition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectError {
    #[error("Project '{0}' defines no fields")]
    NoFields(String),

    #[error("Project '{project}' defines field '{field}' more than once")]
    DuplicateField { project: String, field: String },

    #[error("Field '{field}' in project '{project}' has no options")]
    EmptyOptions { project: String, field: String },

    #[error("Field key must not be empty (project '{0}')")]
    EmptyFieldKey(String),

    #[error("Project '{0}' has an empty storage prefix")]
    EmptyPrefix(String),
}

/// One dropdown: a key, a display label and the allowed values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldConfig {
    /// Stable identifier used in `--field key=value`
    pub key: String,

    /// Label shown to the user
    pub label: String,

    /// Allowed values, in display order
    pub options: Vec<String>,
}

impl FieldConfig {
    /// Create a field, trimming option values and dropping blank ones
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            options: options
                .into_iter()
                .map(|o| o.as_ref().trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// Build a field from a comma-separated option list
    pub fn from_csv(key: impl Into<String>, label: impl Into<String>, csv: &str) -> Self {
        Self::new(key, label, csv.split(','))
    }

    /// Whether `value` is one of this field's options
    pub fn allows(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// A named, validated form definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    /// Mode identifier this project is selected by
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub audio_prompt: String,

    /// Object key prefix (no trailing slash)
    pub storage_prefix: String,

    /// Fields in display order
    pub fields: Vec<FieldConfig>,
}

impl ProjectConfig {
    /// Validate and build a project.
    ///
    /// Rejects projects without fields, duplicate field keys, fields without
    /// options and blank storage prefixes.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        audio_prompt: impl Into<String>,
        storage_prefix: impl Into<String>,
        fields: Vec<FieldConfig>,
    ) -> Result<Self, ProjectError> {
        let name = name.into();
        let storage_prefix = storage_prefix.into().trim().trim_end_matches('/').to_string();

        if storage_prefix.is_empty() {
            return Err(ProjectError::EmptyPrefix(name));
        }
        if fields.is_empty() {
            return Err(ProjectError::NoFields(name));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if field.key.trim().is_empty() {
                return Err(ProjectError::EmptyFieldKey(name));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(ProjectError::DuplicateField {
                    project: name,
                    field: field.key.clone(),
                });
            }
            if field.options.is_empty() {
                return Err(ProjectError::EmptyOptions {
                    project: name,
                    field: field.key.clone(),
                });
            }
        }

        Ok(Self {
            name,
            title: title.into(),
            subtitle: subtitle.into(),
            audio_prompt: audio_prompt.into(),
            storage_prefix,
            fields,
        })
    }

    /// Look up a field by key
    pub fn field(&self, key: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.key == key)
    }
}
