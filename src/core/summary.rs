//! Submission summary shown after a successful upload.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::domain::{ProjectConfig, Submission};

/// One `label: value` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryField {
    pub label: String,
    pub value: String,
}

/// Field-by-field record of an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub project: String,
    pub fields: Vec<SummaryField>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Summary {
    pub fn new(project: &ProjectConfig, submission: &Submission, key: String) -> Self {
        let fields = project
            .fields
            .iter()
            .filter_map(|field| {
                submission.value(&field.key).map(|value| SummaryField {
                    label: field.label.clone(),
                    value: value.to_string(),
                })
            })
            .collect();

        Self {
            project: project.name.clone(),
            fields,
            date: submission.date,
            time: submission.time,
            key,
            location: None,
        }
    }

    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            writeln!(f, "{}: {}", field.label, field.value)?;
        }
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Time: {}", self.time)?;
        write!(f, "Key: {}", self.key)?;
        if let Some(location) = &self.location {
            write!(f, "\nLocation: {}", location)?;
        }
        Ok(())
    }
}
