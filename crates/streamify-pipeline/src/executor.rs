//! Pipeline executor: runs one job through reset, acquisition, audio
//! stripping, segmentation, and manifest publication, with progress
//! reporting and cancellation between stages.

use std::time::Instant;

use chrono::Utc;
use streamify_av::{FFMPEG, WGET};
use streamify_core::{Error, InputLocator, JobSpec};

use crate::context::PipelineContext;
use crate::lock::JobLock;
use crate::report::JobReport;
use crate::stages::{manifest, segmenter, source, strip, STAGE_RESET};
use crate::workspace::WorkspaceManager;

/// Relative cost of each step, used to turn completed steps into a
/// percentage. Segmentation dominates and is split evenly across variants.
const WEIGHT_RESET: f32 = 2.0;
const WEIGHT_FETCH: f32 = 15.0;
const WEIGHT_STRIP: f32 = 8.0;
const WEIGHT_SEGMENT: f32 = 70.0;
const WEIGHT_MANIFEST: f32 = 5.0;

/// Runs [`JobSpec`]s against a [`PipelineContext`].
#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    ctx: PipelineContext,
}

/// Cumulative progress over a run.
struct Progress<'a> {
    ctx: &'a PipelineContext,
    total: f32,
    done: f32,
}

impl Progress<'_> {
    fn advance(&mut self, weight: f32, step: &str) {
        self.done += weight;
        let pct = if self.total > 0.0 {
            (self.done / self.total * 100.0).min(100.0)
        } else {
            100.0
        };
        self.ctx.progress.send(pct, step);
        tracing::info!("[{:.0}%] Completed: {}", pct, step);
    }
}

impl PipelineExecutor {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    /// Check everything that can be known before the workspace is touched.
    ///
    /// Nothing on disk is modified, so a rejected job never destroys the
    /// artifacts of an earlier run with the same name.
    ///
    /// # Errors
    ///
    /// - [`Error::Tool`] if ffmpeg (or wget, for a URL input) is missing.
    /// - [`Error::Validation`] if a local input does not exist.
    pub fn preflight(&self, job: &JobSpec) -> streamify_core::Result<()> {
        self.ctx.tools.require(FFMPEG)?;

        match job.locator() {
            InputLocator::Remote(_) => {
                self.ctx.tools.require(WGET)?;
            }
            InputLocator::Local(path) => match self.ctx.storage.file_size(&path) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    return Err(Error::Validation(format!(
                        "input file {} does not exist",
                        path.display()
                    )))
                }
                Err(e) => {
                    return Err(Error::Validation(format!(
                        "cannot read input {}: {e}",
                        path.display()
                    )))
                }
            },
        }

        Ok(())
    }

    /// Run `job` to completion.
    ///
    /// The job's workspace is wiped first. Stages run strictly in order and
    /// the first failure aborts the job; artifacts already written stay on
    /// disk for inspection. The master manifest is written exactly once, and
    /// only after every variant succeeded.
    ///
    /// # Errors
    ///
    /// - [`Error::Tool`] / [`Error::Validation`] from [`Self::preflight`].
    /// - [`Error::Conflict`] if a job with the same sanitized name is running.
    /// - [`Error::Workspace`] if the reset fails.
    /// - [`Error::Stage`] naming the failing stage.
    /// - [`Error::Cancelled`] if the cancellation token fires.
    pub async fn run(&self, job: &JobSpec) -> streamify_core::Result<JobReport> {
        let ctx = &self.ctx;
        let started_at = Utc::now();
        let clock = Instant::now();

        tracing::info!(
            "Starting job '{}' (workspace name '{}') from {}",
            job.raw_name,
            job.safe_name,
            job.input
        );

        self.preflight(job)?;
        ctx.check_cancelled(STAGE_RESET)?;

        let _lock = JobLock::acquire(ctx.storage.media_root(), &job.safe_name)?;

        let remote = job.locator().is_remote();
        let mut progress = Progress {
            ctx,
            total: WEIGHT_RESET
                + if remote { WEIGHT_FETCH } else { 0.0 }
                + WEIGHT_STRIP
                + WEIGHT_SEGMENT
                + WEIGHT_MANIFEST,
            done: 0.0,
        };

        let workspace = WorkspaceManager::new(ctx.storage.clone()).reset(&job.safe_name)?;
        progress.advance(WEIGHT_RESET, "reset workspace");

        ctx.check_cancelled("fetch")?;
        let acquired = source::acquire(ctx, &workspace, &job.input).await?;
        if acquired.downloaded {
            progress.advance(WEIGHT_FETCH, "fetch source");
        }

        ctx.check_cancelled("strip-audio")?;
        let mp4_path = strip::strip(ctx, &workspace, &acquired.path).await?;
        progress.advance(WEIGHT_STRIP, "strip audio");

        ctx.check_cancelled("segment")?;
        let per_variant = WEIGHT_SEGMENT / job.profile.bitrates().len() as f32;
        let variants = segmenter::segment(
            ctx,
            &workspace,
            &mp4_path,
            &job.profile,
            &mut |variant| {
                progress.advance(
                    per_variant,
                    &format!("stream_{} ({}k)", variant.index, variant.bitrate_kbps),
                )
            },
        )
        .await?;

        ctx.check_cancelled("manifest")?;
        let text = manifest::build(&job.profile);
        let manifest_path = manifest::publish(ctx, &workspace, &text)?;
        progress.advance(WEIGHT_MANIFEST, "write manifest");

        let elapsed = clock.elapsed();
        tracing::info!(
            "Job '{}' finished in {:.1}s: {}",
            job.safe_name,
            elapsed.as_secs_f64(),
            manifest_path.display()
        );

        Ok(JobReport {
            job_name: job.raw_name.clone(),
            safe_name: job.safe_name.clone(),
            workspace: workspace.root().to_path_buf(),
            source: acquired.path,
            downloaded: acquired.downloaded,
            mp4_path,
            variants,
            manifest_path,
            started_at,
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }
}
