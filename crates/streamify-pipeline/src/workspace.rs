//! Per-job workspace layout and the destructive reset that starts every run.
//!
//! ```text
//! <media_root>/<safe_name>/
//!   src/<basename>             (URL inputs only)
//!   mp4/video.mp4
//!   hls/manifest.m3u8
//!   hls/stream_<i>/playlist.m3u8
//!   hls/stream_<i>/segment_<n>.ts
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use streamify_av::actions::PLAYLIST_FILE_NAME;
use streamify_hls::MANIFEST_FILE_NAME;

use crate::storage::Storage;

/// Name of the audio-stripped intermediate.
pub const MP4_FILE_NAME: &str = "video.mp4";

/// Paths inside one job's workspace. Purely computational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobWorkspace {
    root: PathBuf,
}

impl JobWorkspace {
    /// Layout for `safe_name` under `media_root`. Does not touch the disk.
    pub fn new(media_root: &Path, safe_name: &str) -> Self {
        Self {
            root: media_root.join(safe_name),
        }
    }

    /// `<media_root>/<safe_name>`
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Download directory for remote inputs.
    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    /// Download target for a remote file called `file_name`.
    pub fn source_file(&self, file_name: &str) -> PathBuf {
        self.src_dir().join(file_name)
    }

    pub fn mp4_dir(&self) -> PathBuf {
        self.root.join("mp4")
    }

    /// The audio-stripped intermediate, overwritten on every run.
    pub fn mp4_path(&self) -> PathBuf {
        self.mp4_dir().join(MP4_FILE_NAME)
    }

    pub fn hls_dir(&self) -> PathBuf {
        self.root.join("hls")
    }

    /// Directory for variant `index` (1-based).
    pub fn stream_dir(&self, index: usize) -> PathBuf {
        self.hls_dir().join(format!("stream_{index}"))
    }

    /// Variant playlist for `index` (1-based).
    pub fn playlist_path(&self, index: usize) -> PathBuf {
        self.stream_dir(index).join(PLAYLIST_FILE_NAME)
    }

    /// Master manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.hls_dir().join(MANIFEST_FILE_NAME)
    }
}

/// Creates clean workspaces through a [`Storage`] handle.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    storage: Arc<dyn Storage>,
}

impl WorkspaceManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Delete any previous workspace for `safe_name` and recreate its root.
    ///
    /// Irreversibly destroys artifacts from earlier runs with the same name.
    ///
    /// # Errors
    ///
    /// - [`streamify_core::Error::Validation`] if `safe_name` is empty, holds a
    ///   separator, or starts with `.` (dot components would hit the media
    ///   root, and dotted names are reserved for entries like the lock dir).
    /// - [`streamify_core::Error::Workspace`] if the delete or create fails.
    pub fn reset(&self, safe_name: &str) -> streamify_core::Result<JobWorkspace> {
        if safe_name.is_empty() || safe_name.starts_with('.') || safe_name.contains(['/', '\\'])
        {
            return Err(streamify_core::Error::Validation(format!(
                "refusing to reset workspace for unsafe name '{safe_name}'"
            )));
        }

        let workspace = JobWorkspace::new(self.storage.media_root(), safe_name);
        let root = workspace.root();

        tracing::info!("Resetting workspace {}", root.display());

        self.storage
            .remove_dir_all(root)
            .map_err(|e| streamify_core::Error::workspace(root, e))?;
        self.storage
            .create_dir_all(root)
            .map_err(|e| streamify_core::Error::workspace(root, e))?;

        Ok(workspace)
    }
}
