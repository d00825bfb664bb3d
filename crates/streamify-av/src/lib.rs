//! # streamify-av
//!
//! External tool management and the ffmpeg / wget actions used by the
//! streamify pipeline.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and wget.
//! - **Command execution** ([`ToolCommand`], [`ToolRunner`]) -- async builder
//!   with timeout support, behind a trait so the pipeline can be driven by a
//!   fake runner in tests.
//! - **Action functions** ([`actions`]) -- remote fetch, audio stripping, and
//!   constant-bitrate HLS segmentation.

pub mod actions;
pub mod command;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{SystemRunner, ToolCommand, ToolOutput, ToolRunner};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry, FFMPEG, WGET};

// Action functions
pub use actions::{fetch_remote, segment_hls, strip_audio, HlsVariantSpec};
