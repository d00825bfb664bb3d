//! Wiring between parsed options, configuration, and the pipeline.

use std::sync::Arc;

use streamify_av::{SystemRunner, ToolRegistry, ToolRunner};
use streamify_core::config::Config;
use streamify_core::{parse_bitrates, JobSpec, MediaProfile};
use streamify_pipeline::{
    LocalStorage, PipelineContext, PipelineExecutor, PipelineSettings, ProgressSender, Storage,
};
use tokio_util::sync::CancellationToken;

/// Raw job options as they arrive from the command line.
#[derive(Debug, Clone)]
pub struct JobArgs {
    pub name: String,
    pub input: String,
    pub width: u32,
    pub height: u32,
    pub bitrates: String,
}

impl JobArgs {
    /// Validate the options into a [`JobSpec`]. Nothing is touched on disk.
    pub fn into_spec(self) -> streamify_core::Result<JobSpec> {
        let bitrates = parse_bitrates(&self.bitrates)?;
        let profile = MediaProfile::new(self.width, self.height, bitrates)?;
        JobSpec::new(&self.name, &self.input, profile)
    }
}

/// Build an executor over the local filesystem and the real tools.
pub fn executor(
    config: &Config,
    cancellation: CancellationToken,
) -> streamify_core::Result<PipelineExecutor> {
    let runner: Arc<dyn ToolRunner> = Arc::new(SystemRunner);
    executor_with_runner(config, runner, cancellation)
}

/// Same as [`executor`] with a caller-supplied [`ToolRunner`].
pub fn executor_with_runner(
    config: &Config,
    runner: Arc<dyn ToolRunner>,
    cancellation: CancellationToken,
) -> streamify_core::Result<PipelineExecutor> {
    let storage: Arc<dyn Storage> = Arc::new(LocalStorage::open(&config.storage.media_root)?);
    let tools = Arc::new(ToolRegistry::discover(&config.tools));

    let ctx = PipelineContext::new(storage, tools, runner)
        .with_settings(PipelineSettings::from(config))
        .with_cancellation(cancellation)
        .with_progress(ProgressSender::new(|pct, step| {
            tracing::debug!("progress {pct:.0}%: {step}");
        }));

    Ok(PipelineExecutor::new(ctx))
}
