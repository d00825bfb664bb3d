//! In-process [`ToolRunner`] used by the unit tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use streamify_av::{ToolCommand, ToolOutput, ToolRegistry, ToolRunner, FFMPEG, WGET};

use crate::context::PipelineContext;
use crate::storage::{LocalStorage, Storage};

type Predicate = Box<dyn Fn(&ToolCommand) -> bool + Send + Sync>;

/// Records every command and fabricates the file the real tool would write.
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<ToolCommand>>,
    fail_when: Option<Predicate>,
    no_output_when: Option<Predicate>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit non-zero for matching commands.
    pub fn failing(mut self, pred: impl Fn(&ToolCommand) -> bool + Send + Sync + 'static) -> Self {
        self.fail_when = Some(Box::new(pred));
        self
    }

    /// Exit zero but write nothing for matching commands.
    pub fn silent(mut self, pred: impl Fn(&ToolCommand) -> bool + Send + Sync + 'static) -> Self {
        self.no_output_when = Some(Box::new(pred));
        self
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, tool: &str) -> Vec<ToolCommand> {
        self.calls()
            .into_iter()
            .filter(|c| c.program_name() == tool)
            .collect()
    }
}

/// File the command would produce: the `-O` target for wget, the last
/// argument for ffmpeg.
pub fn output_of(cmd: &ToolCommand) -> Option<PathBuf> {
    let args = cmd.get_args();
    if cmd.program_name() == WGET {
        let at = args.iter().position(|a| a == "-O")?;
        return args.get(at + 1).map(PathBuf::from);
    }
    args.last().map(PathBuf::from)
}

#[async_trait]
impl ToolRunner for FakeRunner {
    async fn run(&self, cmd: &ToolCommand) -> streamify_core::Result<ToolOutput> {
        self.calls.lock().unwrap().push(cmd.clone());

        if self.fail_when.as_ref().is_some_and(|f| f(cmd)) {
            return Err(streamify_core::Error::tool(
                cmd.program_name(),
                "exited with status 1: boom",
            ));
        }

        if !self.no_output_when.as_ref().is_some_and(|f| f(cmd)) {
            if let Some(out) = output_of(cmd) {
                // Like the real tools, fail if the parent directory is missing.
                std::fs::write(&out, b"fake media")?;
                if out.extension().is_some_and(|e| e == "m3u8") {
                    if let Some(dir) = out.parent() {
                        std::fs::write(dir.join("segment_0.ts"), b"ts")?;
                    }
                }
            }
        }

        Ok(ToolOutput {
            exit_code: Some(0),
            ..Default::default()
        })
    }
}

/// Context over a temp media root with fake ffmpeg and wget registered.
pub fn context(root: &Path, runner: Arc<dyn ToolRunner>) -> PipelineContext {
    let storage: Arc<dyn Storage> = Arc::new(LocalStorage::open(root).unwrap());
    let tools = Arc::new(ToolRegistry::from_paths([
        (FFMPEG, "/usr/bin/ffmpeg"),
        (WGET, "/usr/bin/wget"),
    ]));
    PipelineContext::new(storage, tools, runner)
}
