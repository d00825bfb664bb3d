//! Execution context shared by every stage of a job run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use streamify_av::{ToolRegistry, ToolRunner};
use streamify_core::config::Config;
use tokio_util::sync::CancellationToken;

use crate::storage::Storage;

/// Sender for reporting progress from within the pipeline.
///
/// Wraps a callback that receives a progress percentage (0.0 -- 100.0) and a
/// human-readable step description.
pub struct ProgressSender {
    callback: Box<dyn Fn(f32, &str) + Send + Sync>,
}

impl ProgressSender {
    /// Create a new sender from the given callback.
    pub fn new(callback: impl Fn(f32, &str) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Create a no-op sender that discards all progress reports.
    pub fn noop() -> Self {
        Self {
            callback: Box::new(|_, _| {}),
        }
    }

    /// Report progress.
    pub fn send(&self, progress: f32, step: &str) {
        (self.callback)(progress, step);
    }
}

impl std::fmt::Debug for ProgressSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSender").finish_non_exhaustive()
    }
}

/// Tunables for a run, derived from [`Config`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub fetch_timeout: Duration,
    pub strip_timeout: Duration,
    pub segment_timeout: Duration,
    /// Upper bound on concurrently encoding variants (at least 1).
    pub max_parallel: usize,
    pub video_codec: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            fetch_timeout: Duration::from_secs(config.tools.fetch_timeout_secs),
            strip_timeout: Duration::from_secs(config.tools.strip_timeout_secs),
            segment_timeout: Duration::from_secs(config.tools.segment_timeout_secs),
            max_parallel: config.segmenter.max_parallel.max(1),
            video_codec: config.segmenter.video_codec.clone(),
        }
    }
}

/// Context passed to every stage.
#[derive(Clone)]
pub struct PipelineContext {
    /// Filesystem capability; owns the media root.
    pub storage: Arc<dyn Storage>,
    /// Tool registry for looking up external tool paths.
    pub tools: Arc<ToolRegistry>,
    /// Executes external commands.
    pub runner: Arc<dyn ToolRunner>,
    pub settings: PipelineSettings,
    /// Checked between stages and raced against long-running tools.
    pub cancellation: CancellationToken,
    /// Channel for reporting progress to the caller.
    pub progress: Arc<ProgressSender>,
}

impl std::fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineContext")
            .field("storage", &self.storage)
            .field("tools", &self.tools)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PipelineContext {
    /// Create a new context with default settings.
    pub fn new(
        storage: Arc<dyn Storage>,
        tools: Arc<ToolRegistry>,
        runner: Arc<dyn ToolRunner>,
    ) -> Self {
        Self {
            storage,
            tools,
            runner,
            settings: PipelineSettings::default(),
            cancellation: CancellationToken::new(),
            progress: Arc::new(ProgressSender::noop()),
        }
    }

    /// Builder: replace the run settings.
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builder: attach a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Builder: attach a progress sender.
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = Arc::new(progress);
        self
    }

    /// Fail with [`streamify_core::Error::Cancelled`] if the run was cancelled.
    pub fn check_cancelled(&self, before: &str) -> streamify_core::Result<()> {
        if self.cancellation.is_cancelled() {
            tracing::info!("Pipeline cancelled before {before}");
            return Err(streamify_core::Error::Cancelled(format!(
                "cancelled before {before}"
            )));
        }
        Ok(())
    }

    /// Race `fut` against cancellation. Dropping `fut` kills any child
    /// process it spawned.
    pub async fn cancellable<T>(
        &self,
        stage: &str,
        fut: impl Future<Output = streamify_core::Result<T>>,
    ) -> streamify_core::Result<T> {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(streamify_core::Error::Cancelled(
                format!("{stage} interrupted"),
            )),
            result = fut => result,
        }
    }
}
