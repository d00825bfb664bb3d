//! Multi-bitrate segmentation.
//!
//! Every rung of the ladder is encoded independently from the same
//! audio-stripped intermediate into its own `hls/stream_<i>/` directory, so
//! rungs have no data dependency on each other. With `max_parallel == 1` they
//! run one after another in ladder order; otherwise they run as tasks bounded
//! by a semaphore. Either way the first failure wins: pending rungs are
//! aborted (killing their encoders) and completed rungs stay on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use streamify_av::{segment_hls, HlsVariantSpec};
use streamify_core::{Error, MediaProfile};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{verify_output, STAGE_SEGMENT};
use crate::context::PipelineContext;
use crate::report::VariantDescriptor;
use crate::workspace::JobWorkspace;

/// Encode every ladder rung and return the descriptors in ladder order.
///
/// `on_variant` is called once per finished rung, in completion order.
///
/// # Errors
///
/// - [`Error::Stage`] (`segment`) naming the first rung that failed.
/// - [`Error::Workspace`] if a stream directory cannot be created.
/// - [`Error::Cancelled`] if the run is cancelled mid-ladder.
pub async fn segment(
    ctx: &PipelineContext,
    workspace: &JobWorkspace,
    mp4: &Path,
    profile: &MediaProfile,
    on_variant: &mut (dyn FnMut(&VariantDescriptor) + Send),
) -> streamify_core::Result<Vec<VariantDescriptor>> {
    let jobs: Vec<VariantJob> = profile
        .ladder()
        .map(|(index, bitrate)| VariantJob {
            index,
            bitrate_kbps: bitrate,
            spec: HlsVariantSpec {
                input: mp4.to_path_buf(),
                output_dir: workspace.stream_dir(index),
                width: profile.width(),
                height: profile.height(),
                bitrate_kbps: bitrate,
                video_codec: ctx.settings.video_codec.clone(),
            },
            playlist: workspace.playlist_path(index),
        })
        .collect();

    tracing::info!(
        "Creating HLS stream: {} variant(s) at {}, up to {} at a time",
        jobs.len(),
        profile.resolution(),
        ctx.settings.max_parallel
    );

    let mut variants = if ctx.settings.max_parallel <= 1 || jobs.len() == 1 {
        segment_sequential(ctx, jobs, on_variant).await?
    } else {
        segment_parallel(ctx, jobs, on_variant).await?
    };

    variants.sort_by_key(|v| v.index);
    tracing::info!("HLS stream created: {} variant(s)", variants.len());
    Ok(variants)
}

/// One rung of the ladder, fully resolved.
#[derive(Debug, Clone)]
struct VariantJob {
    index: usize,
    bitrate_kbps: u32,
    spec: HlsVariantSpec,
    playlist: PathBuf,
}

impl VariantJob {
    fn descriptor(&self) -> VariantDescriptor {
        VariantDescriptor {
            index: self.index,
            playlist_path: self.playlist.clone(),
            bitrate_kbps: self.bitrate_kbps,
        }
    }

    fn fail(&self, e: Error) -> Error {
        match e {
            Error::Tool { .. } | Error::Stage { .. } | Error::Io { .. } => Error::stage(
                STAGE_SEGMENT,
                format!("stream_{} ({}k): {e}", self.index, self.bitrate_kbps),
            ),
            other => other,
        }
    }
}

/// Create the stream directory, encode, and verify the playlist.
async fn encode_variant(ctx: &PipelineContext, job: &VariantJob) -> streamify_core::Result<()> {
    let dir = &job.spec.output_dir;
    ctx.storage
        .create_dir_all(dir)
        .map_err(|e| Error::workspace(dir, e))?;

    segment_hls(
        ctx.runner.as_ref(),
        &ctx.tools,
        &job.spec,
        ctx.settings.segment_timeout,
    )
    .await
    .map_err(|e| job.fail(e))?;

    verify_output(ctx.storage.as_ref(), &job.playlist, STAGE_SEGMENT).map_err(|e| job.fail(e))
}

async fn segment_sequential(
    ctx: &PipelineContext,
    jobs: Vec<VariantJob>,
    on_variant: &mut (dyn FnMut(&VariantDescriptor) + Send),
) -> streamify_core::Result<Vec<VariantDescriptor>> {
    let mut done = Vec::with_capacity(jobs.len());

    for job in &jobs {
        ctx.check_cancelled(&format!("stream_{}", job.index))?;
        ctx.cancellable(STAGE_SEGMENT, encode_variant(ctx, job)).await?;

        let variant = job.descriptor();
        on_variant(&variant);
        done.push(variant);
    }

    Ok(done)
}

async fn segment_parallel(
    ctx: &PipelineContext,
    jobs: Vec<VariantJob>,
    on_variant: &mut (dyn FnMut(&VariantDescriptor) + Send),
) -> streamify_core::Result<Vec<VariantDescriptor>> {
    let limit = Arc::new(Semaphore::new(ctx.settings.max_parallel));
    let mut tasks = JoinSet::new();
    let total = jobs.len();

    for job in jobs {
        let ctx = ctx.clone();
        let limit = limit.clone();
        tasks.spawn(async move {
            let _permit = limit
                .acquire_owned()
                .await
                .map_err(|_| Error::Internal("segmenter semaphore closed".into()))?;
            encode_variant(&ctx, &job).await?;
            Ok::<_, Error>(job.descriptor())
        });
    }

    let mut done = Vec::with_capacity(total);

    let failure = loop {
        let next = tokio::select! {
            biased;
            _ = ctx.cancellation.cancelled() => None,
            next = tasks.join_next() => Some(next),
        };
        let Some(next) = next else {
            break Some(Error::Cancelled(format!("{STAGE_SEGMENT} interrupted")));
        };

        match next {
            None => break None,
            Some(Ok(Ok(variant))) => {
                on_variant(&variant);
                done.push(variant);
            }
            Some(Ok(Err(e))) => break Some(e),
            Some(Err(join_err)) => {
                break Some(Error::Internal(format!("variant task panicked: {join_err}")))
            }
        }
    };

    if let Some(e) = failure {
        tracing::error!("Segmentation failed, aborting pending variants: {e}");
        tasks.abort_all();
        // Reap aborted tasks so their encoders are gone before we return.
        while tasks.join_next().await.is_some() {}
        return Err(e);
    }

    Ok(done)
}
