//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which points a config at a temp media root and
//! placeholder tool paths, and [`ScriptedRunner`], a [`ToolRunner`] that
//! records each command and writes the file the real tool would produce.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use streamify::job::{executor_with_runner, JobArgs};
use streamify_av::{ToolCommand, ToolOutput, ToolRunner};
use streamify_core::config::Config;
use streamify_pipeline::PipelineExecutor;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

type Predicate = Box<dyn Fn(&ToolCommand) -> bool + Send + Sync>;

/// Records commands; fabricates outputs unless told to fail.
#[derive(Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<ToolCommand>>,
    fail_when: Option<Predicate>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(pred: impl Fn(&ToolCommand) -> bool + Send + Sync + 'static) -> Self {
        Self {
            fail_when: Some(Box::new(pred)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.program_name()).collect()
    }
}

fn produced_file(cmd: &ToolCommand) -> Option<PathBuf> {
    let args = cmd.get_args();
    if cmd.program_name() == "wget" {
        let at = args.iter().position(|a| a == "-O")?;
        return args.get(at + 1).map(PathBuf::from);
    }
    args.last().map(PathBuf::from)
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn run(&self, cmd: &ToolCommand) -> streamify_core::Result<ToolOutput> {
        self.calls.lock().unwrap().push(cmd.clone());

        if self.fail_when.as_ref().is_some_and(|f| f(cmd)) {
            return Err(streamify_core::Error::tool(
                cmd.program_name(),
                "exited with status 1",
            ));
        }

        if let Some(out) = produced_file(cmd) {
            std::fs::write(&out, b"media")?;
            if out.extension().is_some_and(|e| e == "m3u8") {
                if let Some(dir) = out.parent() {
                    std::fs::write(dir.join("segment_0.ts"), b"ts")?;
                    std::fs::write(dir.join("segment_1.ts"), b"ts")?;
                }
            }
        }

        Ok(ToolOutput {
            exit_code: Some(0),
            ..Default::default()
        })
    }
}

/// A temp media root plus placeholder ffmpeg/wget executables.
pub struct TestHarness {
    pub dir: TempDir,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        for tool in ["ffmpeg", "wget"] {
            std::fs::write(bin.join(tool), b"").unwrap();
        }

        let mut config = Config::default();
        config.storage.media_root = dir.path().join("media");
        config.tools.ffmpeg_path = Some(bin.join("ffmpeg"));
        config.tools.wget_path = Some(bin.join("wget"));

        Self { dir, config }
    }

    pub fn media_root(&self) -> PathBuf {
        self.config.storage.media_root.clone()
    }

    /// Write a fake source video and return its path.
    pub fn input_file(&self, name: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"source video").unwrap();
        path.to_string_lossy().into_owned()
    }

    pub fn executor(&self, runner: Arc<ScriptedRunner>) -> PipelineExecutor {
        executor_with_runner(&self.config, runner, CancellationToken::new()).unwrap()
    }
}

pub fn job_args(name: &str, input: &str, bitrates: &str) -> JobArgs {
    JobArgs {
        name: name.into(),
        input: input.into(),
        width: 640,
        height: 360,
        bitrates: bitrates.into(),
    }
}

/// Path of `rel` under the job's workspace.
pub fn workspace_file(media_root: &Path, safe_name: &str, rel: &str) -> PathBuf {
    media_root.join(safe_name).join(rel)
}
