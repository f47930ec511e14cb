//! Core form logic.
//!
//! This module contains:
//! - Key: Object key construction
//! - Form: Field selection, validation and the submit flow
//! - Summary: What gets shown after an upload

pub mod form;
pub mod key;
pub mod summary;

// Re-export commonly used types
pub use form::{FormCollector, FormDefaults, FormError, SubmitOutcome, SubmitState, ValidationError};
pub use key::{build_key, KEY_SUFFIX};
pub use summary::{Summary, SummaryField};
