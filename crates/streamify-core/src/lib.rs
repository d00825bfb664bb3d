//! streamify-core: shared types, errors, and configuration.
//!
//! This crate is the foundational dependency for all other streamify crates,
//! providing the unified error type, application configuration, the job
//! model, and the name sanitizer and bitrate ladder parser.

pub mod config;
pub mod error;
pub mod job;
pub mod profile;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use job::{remote_file_name, sanitize, InputLocator, JobSpec};
pub use profile::{parse_bitrates, MediaProfile};
