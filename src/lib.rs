//! voice-intake - Metadata + audio intake form backed by S3
//!
//! A user picks metadata (dog, handler, ...) from configured option lists,
//! attaches a short WAV recording, and submits. The recording is uploaded
//! under a deterministic key built from the selections, date and time.
//!
//! # Flow
//!
//! Each submission runs collect → validate → build key → upload →
//! summarize. Nothing is kept between submissions.
//!
//! # Modules
//!
//! - `adapters`: External systems (S3 object store, audio capture)
//! - `config`: Credential and project resolution
//! - `core`: Key builder, form collector, summary
//! - `domain`: Data structures (ProjectConfig, FieldConfig, Submission)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Submit interactively
//! voice-intake submit --audio take1.wav
//!
//! # Scripted
//! voice-intake submit --mode scent -f dog=Rex -f handler=Jane --audio take1.wav --no-input
//!
//! # Preview a key
//! voice-intake key --prefix beit_oved --value "Rex Dog" --date 2024-01-05 --time 14:30
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::adapters::{AudioCapture, ObjectStore, S3Store, UploadError};
pub use crate::config::{ConfigError, Credentials, ResolvedConfig};
pub use crate::core::{build_key, FormCollector, FormDefaults, SubmitOutcome, SubmitState};
pub use crate::domain::{FieldConfig, ProjectConfig, Submission};
