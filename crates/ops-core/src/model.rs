//! Closed value sets of the remote resource model.
//!
//! The core never validates these locally (the remote service does); they are advertised in the
//! generated tool schemas so callers see the allowed values.

pub const SOURCE_TYPES: &[&str] = &["KNOWLEDGE", "GUIDELINES", "SAMPLE"];

/// Media kind shared by sources and prompts.
pub const CONTENT_TYPES: &[&str] = &["VIDEO", "AUDIO", "TEXT", "IMAGE"];

/// Processing state of a source, set by the remote service.
pub const SOURCE_STATUSES: &[&str] = &["QUEUED", "PROCESSING", "COMPLETED", "FAILED"];

pub const OUTPUT_TYPES: &[&str] = &["TEXT"];
