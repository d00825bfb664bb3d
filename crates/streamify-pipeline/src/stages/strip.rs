//! Audio stripping: copy the video stream into `mp4/video.mp4` without audio.

use std::path::{Path, PathBuf};

use super::{verify_output, STAGE_STRIP};
use crate::context::PipelineContext;
use crate::workspace::JobWorkspace;

/// Write the video-only intermediate and return its path.
///
/// Creates `mp4/` if needed. The intermediate is overwritten on rerun.
///
/// # Errors
///
/// - [`streamify_core::Error::Workspace`] if `mp4/` cannot be created.
/// - [`streamify_core::Error::Stage`] (`strip-audio`) if ffmpeg fails or the
///   output is missing or empty.
pub async fn strip(
    ctx: &PipelineContext,
    workspace: &JobWorkspace,
    source: &Path,
) -> streamify_core::Result<PathBuf> {
    let mp4_dir = workspace.mp4_dir();
    ctx.storage
        .create_dir_all(&mp4_dir)
        .map_err(|e| streamify_core::Error::workspace(&mp4_dir, e))?;

    let output = workspace.mp4_path();
    let run = streamify_av::strip_audio(
        ctx.runner.as_ref(),
        &ctx.tools,
        source,
        &output,
        ctx.settings.strip_timeout,
    );
    ctx.cancellable(STAGE_STRIP, run)
        .await
        .map_err(|e| e.in_stage(STAGE_STRIP))?;

    verify_output(ctx.storage.as_ref(), &output, STAGE_STRIP)?;

    tracing::info!("Audio track removed: {}", output.display());
    Ok(output)
}
