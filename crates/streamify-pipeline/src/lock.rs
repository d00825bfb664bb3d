//! Name-scoped job lock.
//!
//! A lock file `<media_root>/.locks/<safe_name>.lock` lives outside every
//! workspace so the destructive reset cannot remove it. Job names never start
//! with `.`, so the `.locks` directory cannot collide with a workspace. The
//! file is created with create-new semantics and deleted when the guard drops.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Directory under the media root that holds every job lock.
const LOCK_DIR: &str = ".locks";

/// Guard holding the lock for one job name.
#[derive(Debug)]
pub struct JobLock {
    path: PathBuf,
}

impl JobLock {
    /// Path of the lock file for `safe_name`.
    pub fn path_for(media_root: &Path, safe_name: &str) -> PathBuf {
        media_root.join(LOCK_DIR).join(format!("{safe_name}.lock"))
    }

    /// Take the lock for `safe_name`.
    ///
    /// # Errors
    ///
    /// - [`streamify_core::Error::Conflict`] if another job holds it. A lock
    ///   left behind by a crashed process must be removed by hand; the error
    ///   message names the file.
    /// - [`streamify_core::Error::Io`] for any other failure.
    pub fn acquire(media_root: &Path, safe_name: &str) -> streamify_core::Result<Self> {
        let path = Self::path_for(media_root, safe_name);
        std::fs::create_dir_all(media_root.join(LOCK_DIR))?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let owner = std::fs::read_to_string(&path).unwrap_or_default();
                return Err(streamify_core::Error::Conflict(format!(
                    "job '{safe_name}' is already running (pid {}); remove {} if it is stale",
                    owner.trim(),
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        // Owner pid is informational only.
        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            tracing::debug!("could not record owner pid in {}: {e}", path.display());
        }

        tracing::debug!("acquired job lock {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for JobLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("failed to release job lock {}: {e}", self.path.display());
        }
    }
}
