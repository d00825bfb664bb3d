//! # streamify-pipeline
//!
//! Orchestration of one transcode job, from raw input to a published HLS
//! master manifest.
//!
//! This crate provides:
//!
//! - **[`Storage`]** -- the filesystem capability the pipeline runs against,
//!   with [`LocalStorage`] as the on-disk implementation.
//! - **[`JobWorkspace`] / [`WorkspaceManager`]** -- per-job directory layout
//!   and the destructive reset that starts every run.
//! - **[`JobLock`]** -- rejects a second concurrent job with the same name.
//! - **[`PipelineContext`]** -- shared execution context (storage, tools,
//!   runner, settings, cancellation, progress).
//! - **[`stages`]** -- source acquisition, audio stripping, multi-bitrate
//!   segmentation, and manifest publication.
//! - **[`PipelineExecutor`]** -- runs the stages in order and returns a
//!   [`JobReport`].

pub mod context;
pub mod executor;
pub mod lock;
pub mod report;
pub mod stages;
pub mod storage;
pub mod workspace;

#[cfg(test)]
mod testing;

// Re-export key types at the crate root.
pub use context::{PipelineContext, PipelineSettings, ProgressSender};
pub use executor::PipelineExecutor;
pub use lock::JobLock;
pub use report::{JobReport, VariantDescriptor};
pub use storage::{LocalStorage, Storage};
pub use workspace::{JobWorkspace, WorkspaceManager};
