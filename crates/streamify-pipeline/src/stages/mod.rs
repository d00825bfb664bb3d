//! The job stages, in execution order: source acquisition, audio stripping,
//! segmentation, and manifest publication.

pub mod manifest;
pub mod segmenter;
pub mod source;
pub mod strip;

use std::path::Path;

use crate::storage::Storage;

pub const STAGE_RESET: &str = "reset";
pub const STAGE_FETCH: &str = "fetch";
pub const STAGE_STRIP: &str = "strip-audio";
pub const STAGE_SEGMENT: &str = "segment";
pub const STAGE_MANIFEST: &str = "manifest";

/// Post-condition shared by every tool-backed stage: the expected output
/// exists and is non-empty. A zero exit status alone is not trusted.
pub(crate) fn verify_output(
    storage: &dyn Storage,
    path: &Path,
    stage: &str,
) -> streamify_core::Result<()> {
    match storage.file_size(path) {
        Ok(Some(len)) if len > 0 => Ok(()),
        Ok(Some(_)) => Err(streamify_core::Error::stage(
            stage,
            format!("output {} is empty", path.display()),
        )),
        Ok(None) => Err(streamify_core::Error::stage(
            stage,
            format!("expected output {} was not produced", path.display()),
        )),
        Err(e) => Err(streamify_core::Error::stage(
            stage,
            format!("cannot stat {}: {e}", path.display()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;

    #[test]
    fn verify_output_checks_presence_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        let file = dir.path().join("video.mp4");

        let err = verify_output(&storage, &file, STAGE_STRIP).unwrap_err();
        assert!(err.to_string().contains("was not produced"));

        std::fs::write(&file, b"").unwrap();
        let err = verify_output(&storage, &file, STAGE_STRIP).unwrap_err();
        assert!(err.to_string().contains("is empty"));

        std::fs::write(&file, b"data").unwrap();
        verify_output(&storage, &file, STAGE_STRIP).unwrap();
    }
}
