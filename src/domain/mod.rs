//! Domain types for voice-intake.
//!
//! This module contains the core data structures:
//! - Project: Validated form definitions (fields, labels, options)
//! - Submission: Snapshot of a completed form

pub mod project;
pub mod submission;

// Re-export commonly used types
pub use project::{FieldConfig, ProjectConfig, ProjectError};
pub use submission::Submission;
