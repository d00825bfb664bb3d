//! Unified error type for streamify.
//!
//! Every stage funnels its failures into [`Error`], which carries enough
//! context for the binary to print a readable message and derive a process
//! exit code via [`Error::exit_code`].

use std::path::PathBuf;

/// Unified error type covering all failure modes of a transcode job.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The storage root could not be established. No job can run.
    #[error("Storage init error: {0}")]
    Init(String),

    /// A job field is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Deleting or creating part of the job workspace failed.
    #[error("Workspace error at {}: {source}", path.display())]
    Workspace {
        /// The directory or file that could not be touched.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Another job currently owns the workspace name.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool (ffmpeg, wget) failed to spawn, exited non-zero, or
    /// timed out.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// A pipeline stage failed.
    #[error("Stage failed [{stage}]: {message}")]
    Stage {
        /// The stage that failed (e.g. "fetch", "segment").
        stage: String,
        /// Human-readable error description.
        message: String,
    },

    /// The job was cancelled before it finished.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to a process exit code (sysexits-style).
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) => 64,
            Error::Config(_) => 78,
            Error::Init(_) => 73,
            Error::Workspace { .. } => 73,
            Error::Conflict(_) => 75,
            Error::Io { .. } => 74,
            Error::Tool { .. } => 70,
            Error::Stage { .. } => 70,
            Error::Cancelled(_) => 130,
            Error::Internal(_) => 70,
        }
    }

    /// Convenience constructor for [`Error::Workspace`].
    pub fn workspace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Workspace {
            path: path.into(),
            source,
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Stage`].
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Wrap this error as a failure of `stage`.
    ///
    /// Errors that already name a stage, or that are not stage failures by
    /// nature (workspace, cancellation, conflict), pass through unchanged.
    pub fn in_stage(self, stage: &str) -> Self {
        match self {
            Error::Tool { .. } | Error::Io { .. } | Error::Internal(_) => Error::Stage {
                stage: stage.to_string(),
                message: self.to_string(),
            },
            other => other,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
