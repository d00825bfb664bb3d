//! Master manifest publication.

use std::path::PathBuf;

use streamify_core::MediaProfile;

use super::STAGE_MANIFEST;
use crate::context::PipelineContext;
use crate::workspace::JobWorkspace;

/// Render the master manifest text for `profile`.
pub fn build(profile: &MediaProfile) -> String {
    streamify_hls::build_master_manifest(profile)
}

/// Write `text` to `hls/manifest.m3u8` and return the path.
///
/// Called once per job, after every variant has been encoded.
///
/// # Errors
///
/// [`streamify_core::Error::Stage`] (`manifest`) if the directory or file
/// cannot be written.
pub fn publish(
    ctx: &PipelineContext,
    workspace: &JobWorkspace,
    text: &str,
) -> streamify_core::Result<PathBuf> {
    let path = workspace.manifest_path();

    ctx.storage
        .create_dir_all(&workspace.hls_dir())
        .and_then(|()| ctx.storage.write_text(&path, text))
        .map_err(|e| {
            streamify_core::Error::stage(
                STAGE_MANIFEST,
                format!("cannot write {}: {e}", path.display()),
            )
        })?;

    tracing::info!("Manifest written: {}", path.display());
    Ok(path)
}
