//! Produce a video-only copy of a source file with ffmpeg.

use std::path::Path;
use std::time::Duration;

use crate::command::{ToolCommand, ToolRunner};
use crate::tools::{ToolRegistry, FFMPEG};

/// Build the ffmpeg invocation that copies the video stream verbatim and
/// drops every audio stream.
pub fn strip_audio_command(ffmpeg: &Path, input: &Path, output: &Path) -> ToolCommand {
    let mut cmd = ToolCommand::new(ffmpeg.to_path_buf());
    cmd.arg("-nostdin");
    cmd.arg("-i");
    cmd.path_arg(input);
    cmd.args(["-vcodec", "copy", "-an", "-y", "-v", "error"]);
    cmd.path_arg(output);
    cmd
}

/// Strip the audio track from `input`, writing the result to `output`.
///
/// The parent directory of `output` must already exist. Success is judged by
/// the exit status only; callers verify the output file.
pub async fn strip_audio(
    runner: &dyn ToolRunner,
    tools: &ToolRegistry,
    input: &Path,
    output: &Path,
    timeout: Duration,
) -> streamify_core::Result<()> {
    let ffmpeg = tools.require(FFMPEG)?;

    tracing::info!("strip audio: {:?} -> {:?}", input, output);

    let mut cmd = strip_audio_command(&ffmpeg.path, input, output);
    cmd.timeout(timeout);
    runner.run(&cmd).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_copies_video_and_drops_audio() {
        let cmd = strip_audio_command(
            Path::new("ffmpeg"),
            Path::new("/in/source.mkv"),
            Path::new("/media/job/mp4/video.mp4"),
        );
        let args = cmd.get_args();
        assert_eq!(args[1..3], ["-i", "/in/source.mkv"]);
        assert!(args.windows(2).any(|w| w == ["-vcodec", "copy"]));
        assert!(args.iter().any(|a| a == "-an"));
        assert!(args.iter().any(|a| a == "-y"));
        assert_eq!(args.last().unwrap(), "/media/job/mp4/video.mp4");
    }
}
