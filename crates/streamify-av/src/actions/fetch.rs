//! Download a remote source with wget.

use std::path::Path;
use std::time::Duration;

use crate::command::{ToolCommand, ToolRunner};
use crate::tools::{ToolRegistry, WGET};

/// Build `wget -q -O <target> <url>`.
pub fn fetch_command(wget: &Path, url: &str, target: &Path) -> ToolCommand {
    let mut cmd = ToolCommand::new(wget.to_path_buf());
    cmd.arg("-q");
    cmd.arg("-O");
    cmd.path_arg(target);
    cmd.arg(url);
    cmd
}

/// Download `url` into `target`, waiting for wget to exit.
///
/// The parent directory of `target` must already exist.
pub async fn fetch_remote(
    runner: &dyn ToolRunner,
    tools: &ToolRegistry,
    url: &str,
    target: &Path,
    timeout: Duration,
) -> streamify_core::Result<()> {
    let wget = tools.require(WGET)?;

    tracing::info!("fetch: {url} -> {:?}", target);

    let mut cmd = fetch_command(&wget.path, url, target);
    cmd.timeout(timeout);
    runner.run(&cmd).await?;

    Ok(())
}
