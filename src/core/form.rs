//! Form collector and submission flow.
//!
//! Holds the user's selections for one project until submit, then runs
//! validate → build key → upload → summarize. Every submission starts from
//! [`SubmitState::Idle`]; an invalid form or a failed upload returns there
//! with the selections intact so the user can fix and retry by hand.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adapters::{AudioCapture, ObjectStore};
use crate::config::Settings;
use crate::core::summary::Summary;
use crate::domain::{ProjectConfig, Submission};

/// Errors from setting a form value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("'{value}' is not an option for {label}")]
    NotAnOption { label: String, value: String },
}

/// Reasons a submission is rejected before upload
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{label} is required!")]
    MissingField { key: String, label: String },

    #[error("Audio recording is required!")]
    MissingAudio,
}

/// Submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Uploading,
    Succeeded,
}

/// Result of one submit attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Rejected by validation; the store was not called
    Invalid(ValidationError),

    /// Uploaded; summary of what was stored
    Uploaded(Summary),

    /// The store call failed; `error` is the raw error text
    Failed { key: String, error: String },
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Uploaded(_))
    }
}

/// Initial date and time shown on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormDefaults {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl FormDefaults {
    /// Current date and time in the configured zone
    pub fn now(settings: &Settings) -> Self {
        Self::at(Utc::now(), settings)
    }

    /// Date and wall-clock time of `instant` in the configured zone (system
    /// local when none), truncated to whole seconds
    pub fn at(instant: DateTime<Utc>, settings: &Settings) -> Self {
        let local = match settings.timezone {
            Some(tz) => instant.with_timezone(&tz).naive_local(),
            None => instant.with_timezone(&Local).naive_local(),
        };
        let time = local.time();
        Self {
            date: local.date(),
            time: time.with_nanosecond(0).unwrap_or(time),
        }
    }
}

/// Form state for one project
#[derive(Debug)]
pub struct FormCollector<'a> {
    project: &'a ProjectConfig,
    /// One slot per field, same order as `project.fields`
    selections: Vec<Option<String>>,
    date: NaiveDate,
    time: NaiveTime,
    audio: Option<Vec<u8>>,
    state: SubmitState,
}

impl<'a> FormCollector<'a> {
    pub fn new(project: &'a ProjectConfig, defaults: FormDefaults) -> Self {
        Self {
            project,
            selections: vec![None; project.fields.len()],
            date: defaults.date,
            time: defaults.time,
            audio: None,
            state: SubmitState::Idle,
        }
    }

    pub fn project(&self) -> &'a ProjectConfig {
        self.project
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Current selection for a field
    pub fn selection(&self, key: &str) -> Option<&str> {
        let idx = self.project.fields.iter().position(|f| f.key == key)?;
        self.selections[idx].as_deref()
    }

    /// Select a value for a field. An empty value clears the selection.
    pub fn select(&mut self, key: &str, value: &str) -> Result<(), FormError> {
        let idx = self
            .project
            .fields
            .iter()
            .position(|f| f.key == key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        let field = &self.project.fields[idx];

        if value.is_empty() {
            self.selections[idx] = None;
            return Ok(());
        }
        if !field.allows(value) {
            return Err(FormError::NotAnOption {
                label: field.label.clone(),
                value: value.to_string(),
            });
        }

        debug!(field = key, value, "Selected");
        self.selections[idx] = Some(value.to_string());
        Ok(())
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn set_time(&mut self, time: NaiveTime) {
        self.time = time;
    }

    /// Replace the held recording
    pub fn record(&mut self, audio: Vec<u8>) {
        debug!(bytes = audio.len(), "Recording replaced");
        self.audio = Some(audio);
    }

    /// Poll a capture source; a new recording replaces the held one
    pub fn capture(&mut self, source: &mut dyn AudioCapture) -> bool {
        match source.poll() {
            Some(audio) => {
                self.record(audio);
                true
            }
            None => false,
        }
    }

    /// Check the form and snapshot it into a [`Submission`].
    ///
    /// Fields are checked in display order, then the recording.
    pub fn validate(&self) -> Result<Submission, ValidationError> {
        let mut field_values = Vec::with_capacity(self.selections.len());
        for (field, selection) in self.project.fields.iter().zip(&self.selections) {
            match selection {
                Some(value) if !value.is_empty() => {
                    field_values.push((field.key.clone(), value.clone()))
                }
                _ => {
                    return Err(ValidationError::MissingField {
                        key: field.key.clone(),
                        label: field.label.clone(),
                    })
                }
            }
        }

        let audio = self.audio.clone().ok_or(ValidationError::MissingAudio)?;

        Ok(Submission {
            field_values,
            date: self.date,
            time: self.time,
            audio,
        })
    }

    /// Object key the current form would upload to
    pub fn object_key(&self) -> Result<String, ValidationError> {
        Ok(self.validate()?.object_key(&self.project.storage_prefix))
    }

    /// Validate, upload and summarize.
    ///
    /// The store is only called for a valid form. Upload errors are caught
    /// and reported in the outcome; nothing is retried.
    pub async fn submit(&mut self, store: &dyn ObjectStore) -> SubmitOutcome {
        self.state = SubmitState::Validating;
        let submission = match self.validate() {
            Ok(submission) => submission,
            Err(e) => {
                debug!(error = %e, "Submission rejected");
                self.state = SubmitState::Idle;
                return SubmitOutcome::Invalid(e);
            }
        };

        let key = submission.object_key(&self.project.storage_prefix);
        let summary = Summary::new(self.project, &submission, key.clone());

        self.state = SubmitState::Uploading;
        info!(store = store.name(), key = %key, bytes = submission.audio.len(), "Uploading");

        match store.put(submission.audio, &key).await {
            Ok(location) => {
                self.state = SubmitState::Succeeded;
                SubmitOutcome::Uploaded(summary.with_location(location))
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Upload failed");
                self.state = SubmitState::Idle;
                SubmitOutcome::Failed {
                    key,
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryCapture;
    use chrono::TimeZone;
    use crate::domain::FieldConfig;

    fn project() -> ProjectConfig {
        ProjectConfig::new(
            "beit_oved",
            "Beit Oved Training",
            "Insert data here",
            "Record Audio:",
            "beit_oved",
            vec![
                FieldConfig::new("dog", "Dog Name", ["Rex Dog", "Bella"]),
                FieldConfig::new("handler", "Handler Name", ["Jane Handler"]),
            ],
        )
        .unwrap()
    }

    fn defaults() -> FormDefaults {
        FormDefaults {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_select_rejects_unknown_values() {
        let project = project();
        let mut form = FormCollector::new(&project, defaults());

        assert_eq!(
            form.select("cat", "Tom"),
            Err(FormError::UnknownField("cat".to_string()))
        );
        assert!(matches!(
            form.select("dog", "Fido"),
            Err(FormError::NotAnOption { .. })
        ));

        form.select("dog", "Bella").unwrap();
        assert_eq!(form.selection("dog"), Some("Bella"));
        form.select("dog", "").unwrap();
        assert_eq!(form.selection("dog"), None);
    }

    #[test]
    fn test_validate_order() {
        let project = project();
        let mut form = FormCollector::new(&project, defaults());

        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::MissingField {
                key: "dog".to_string(),
                label: "Dog Name".to_string()
            }
        );

        form.select("dog", "Rex Dog").unwrap();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::MissingField { key, .. }) if key == "handler"
        ));

        form.select("handler", "Jane Handler").unwrap();
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingAudio);
    }

    #[test]
    fn test_capture_replaces_recording() {
        let project = project();
        let mut form = FormCollector::new(&project, defaults());
        let mut capture = MemoryCapture::new();

        assert!(!form.capture(&mut capture));
        assert!(!form.has_audio());

        capture.push(vec![1, 2]);
        capture.push(vec![3]);
        assert!(form.capture(&mut capture));
        assert!(form.capture(&mut capture));
        assert!(!form.capture(&mut capture));

        form.select("dog", "Bella").unwrap();
        form.select("handler", "Jane Handler").unwrap();
        assert_eq!(form.validate().unwrap().audio, vec![3]);
    }

    #[test]
    fn test_object_key() {
        let project = project();
        let mut form = FormCollector::new(&project, defaults());
        form.select("dog", "Rex Dog").unwrap();
        form.select("handler", "Jane Handler").unwrap();
        form.record(vec![0]);

        assert_eq!(
            form.object_key().unwrap(),
            "beit_oved/Rex_Dog_Jane_Handler_2024-01-05_14-30-00.wav"
        );
    }

    fn zone(name: &str) -> Settings {
        let name = name.to_string();
        Settings::from_env(&move |var: &str| (var == "APP_TIMEZONE").then(|| name.clone()))
    }

    #[test]
    fn test_defaults_are_whole_seconds() {
        let defaults = FormDefaults::now(&Settings::default());
        assert_eq!(defaults.time.nanosecond(), 0);
    }

    #[test]
    fn test_defaults_date_and_time_share_a_zone() {
        // 15:03 UTC on the 16th is already the 17th in Kiritimati (UTC+14)
        let instant = Utc.with_ymd_and_hms(2026, 10, 16, 15, 3, 2).unwrap()
            + chrono::Duration::milliseconds(750);

        let defaults = FormDefaults::at(instant, &zone("Pacific/Kiritimati"));
        assert_eq!(defaults.date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(defaults.time, NaiveTime::from_hms_opt(5, 3, 2).unwrap());
    }

    #[test]
    fn test_defaults_just_before_midnight_utc() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 5, 23, 30, 0).unwrap();

        let jerusalem = FormDefaults::at(instant, &zone("Asia/Jerusalem"));
        assert_eq!(jerusalem.date, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
        assert_eq!(jerusalem.time, NaiveTime::from_hms_opt(1, 30, 0).unwrap());

        let utc = FormDefaults::at(instant, &zone("UTC"));
        assert_eq!(utc.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(utc.time, NaiveTime::from_hms_opt(23, 30, 0).unwrap());
    }
}
