//! Source acquisition: local paths pass through, URLs are downloaded into
//! the workspace first.

use std::path::PathBuf;

use streamify_av::fetch_remote;
use streamify_core::{remote_file_name, InputLocator};

use super::{verify_output, STAGE_FETCH};
use crate::context::PipelineContext;
use crate::workspace::JobWorkspace;

/// The local file the rest of the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredSource {
    pub path: PathBuf,
    /// `true` when the file was fetched into `src/`.
    pub downloaded: bool,
}

/// Resolve `input` to a local path.
///
/// A URL (anything [`InputLocator::classify`] accepts) is fetched to
/// `src/<basename>` and the download is awaited before returning, so later
/// stages never race it. Anything else is returned unchanged.
///
/// # Errors
///
/// [`streamify_core::Error::Stage`] (`fetch`) when the downloader fails,
/// times out, or leaves no non-empty file behind. There is no retry.
pub async fn acquire(
    ctx: &PipelineContext,
    workspace: &JobWorkspace,
    input: &str,
) -> streamify_core::Result<AcquiredSource> {
    let url = match InputLocator::classify(input) {
        InputLocator::Local(path) => {
            tracing::info!("Using local source {}", path.display());
            return Ok(AcquiredSource {
                path,
                downloaded: false,
            });
        }
        InputLocator::Remote(url) => url,
    };

    let src_dir = workspace.src_dir();
    ctx.storage
        .create_dir_all(&src_dir)
        .map_err(|e| streamify_core::Error::workspace(&src_dir, e))?;

    let target = workspace.source_file(&remote_file_name(&url));
    let fetch = fetch_remote(
        ctx.runner.as_ref(),
        &ctx.tools,
        url.as_str(),
        &target,
        ctx.settings.fetch_timeout,
    );
    ctx.cancellable(STAGE_FETCH, fetch)
        .await
        .map_err(|e| e.in_stage(STAGE_FETCH))?;

    verify_output(ctx.storage.as_ref(), &target, STAGE_FETCH)?;

    tracing::info!("Downloaded source to {}", target.display());
    Ok(AcquiredSource {
        path: target,
        downloaded: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, FakeRunner};
    use crate::workspace::WorkspaceManager;
    use std::sync::Arc;

    #[tokio::test]
    async fn local_input_is_passed_through() {
        let media = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRunner::new());
        let ctx = context(media.path(), runner.clone());
        let ws = WorkspaceManager::new(ctx.storage.clone()).reset("job").unwrap();

        let got = acquire(&ctx, &ws, "relative/clip.mov").await.unwrap();
        assert_eq!(got.path, PathBuf::from("relative/clip.mov"));
        assert!(!got.downloaded);
        assert!(runner.calls().is_empty());
        assert!(!ws.src_dir().exists());
    }

    #[tokio::test]
    async fn url_is_fetched_into_src() {
        let media = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRunner::new());
        let ctx = context(media.path(), runner.clone());
        let ws = WorkspaceManager::new(ctx.storage.clone()).reset("job").unwrap();

        let got = acquire(&ctx, &ws, "http://host/media/talk.mp4?token=1")
            .await
            .unwrap();
        assert!(got.downloaded);
        assert_eq!(got.path, ws.source_file("talk.mp4"));
        assert!(got.path.exists());

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].get_args().last().map(String::as_str),
            Some("http://host/media/talk.mp4?token=1")
        );
    }

    #[tokio::test]
    async fn failed_download_is_a_fetch_failure() {
        let media = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRunner::new().failing(|_| true));
        let ctx = context(media.path(), runner);
        let ws = WorkspaceManager::new(ctx.storage.clone()).reset("job").unwrap();

        let err = acquire(&ctx, &ws, "https://host/a.mp4").await.unwrap_err();
        assert!(
            matches!(&err, streamify_core::Error::Stage { stage, .. } if stage == "fetch"),
            "got {err}"
        );
    }
}
