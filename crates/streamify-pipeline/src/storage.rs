//! Storage capability consumed by the pipeline.
//!
//! The pipeline never touches a global filesystem handle; it is handed an
//! `Arc<dyn Storage>` so tests can point it at a temp directory and several
//! pipelines can share one process.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The filesystem operations a job needs.
pub trait Storage: Send + Sync + fmt::Debug {
    /// Root directory under which every job workspace lives.
    fn media_root(&self) -> &Path;

    /// Recursively create `path`. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Recursively delete `path`. Succeeds if it does not exist.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate `path` and write `contents`.
    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Size of the regular file at `path`, or `None` if nothing is there.
    fn file_size(&self, path: &Path) -> io::Result<Option<u64>>;
}

/// [`Storage`] backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    media_root: PathBuf,
}

impl LocalStorage {
    /// Open (creating if necessary) the media root.
    ///
    /// # Errors
    ///
    /// Returns [`streamify_core::Error::Init`] if the root cannot be created
    /// or is not a directory. No job can run without it.
    pub fn open(media_root: impl Into<PathBuf>) -> streamify_core::Result<Self> {
        let media_root = media_root.into();

        std::fs::create_dir_all(&media_root).map_err(|e| {
            streamify_core::Error::Init(format!(
                "cannot create media root {}: {e}",
                media_root.display()
            ))
        })?;

        let media_root = media_root.canonicalize().map_err(|e| {
            streamify_core::Error::Init(format!(
                "cannot resolve media root {}: {e}",
                media_root.display()
            ))
        })?;

        if !media_root.is_dir() {
            return Err(streamify_core::Error::Init(format!(
                "media root {} is not a directory",
                media_root.display()
            )));
        }

        tracing::info!("Media root set to {}", media_root.display());
        Ok(Self { media_root })
    }
}

impl Storage for LocalStorage {
    fn media_root(&self) -> &Path {
        &self.media_root
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        match std::fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn file_size(&self, path: &Path) -> io::Result<Option<u64>> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn open_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested/media");
        let storage = LocalStorage::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(storage.media_root().is_absolute());
    }

    #[test]
    fn open_fails_when_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("media");
        fs::write(&file, b"not a dir").unwrap();

        let err = LocalStorage::open(&file).unwrap_err();
        assert!(matches!(err, streamify_core::Error::Init(_)));
    }

    #[test]
    fn remove_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        storage
            .remove_dir_all(&dir.path().join("does-not-exist"))
            .unwrap();
    }

    #[test]
    fn write_and_stat() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        let file = dir.path().join("a/b/manifest.m3u8");

        storage.create_dir_all(file.parent().unwrap()).unwrap();
        storage.write_text(&file, "#EXTM3U\n").unwrap();

        assert_eq!(storage.file_size(&file).unwrap(), Some(8));
        assert_eq!(storage.file_size(&dir.path().join("missing")).unwrap(), None);
        // Directories are not files.
        assert_eq!(storage.file_size(&dir.path().join("a")).unwrap(), None);
    }
}
