//! HLS MPEG-TS segment generation for one rung of a bitrate ladder.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::{ToolCommand, ToolRunner};
use crate::tools::{ToolRegistry, FFMPEG};

/// Segment duration in seconds. Keyframes are forced on the same boundary.
pub const SEGMENT_SECONDS: u32 = 2;
/// Variant playlist file name inside each stream directory.
pub const PLAYLIST_FILE_NAME: &str = "playlist.m3u8";
/// ffmpeg pattern for numbered segment files (`segment_0.ts`, `segment_1.ts`, ...).
pub const SEGMENT_PATTERN: &str = "segment_%d.ts";

/// Parameters for encoding a single variant.
#[derive(Debug, Clone)]
pub struct HlsVariantSpec {
    /// Audio-stripped source.
    pub input: PathBuf,
    /// Stream directory receiving the playlist and segments.
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Target, min, and max rate in kbps; also the VBV buffer size.
    pub bitrate_kbps: u32,
    /// ffmpeg video encoder name.
    pub video_codec: String,
}

impl HlsVariantSpec {
    /// `<output_dir>/playlist.m3u8`
    pub fn playlist_path(&self) -> PathBuf {
        self.output_dir.join(PLAYLIST_FILE_NAME)
    }
}

/// Build the constant-bitrate HLS encode for `spec`.
///
/// Produces a VOD-style playlist (`-hls_list_size 0`, nothing pruned) whose
/// segments start at `segment_0.ts`.
pub fn hls_segment_command(ffmpeg: &Path, spec: &HlsVariantSpec) -> ToolCommand {
    let rate = format!("{}k", spec.bitrate_kbps);
    let keyframes = format!("expr:gte(t,n_forced*{SEGMENT_SECONDS})");
    let segment_file = spec.output_dir.join(SEGMENT_PATTERN);

    let mut cmd = ToolCommand::new(ffmpeg.to_path_buf());
    cmd.arg("-nostdin");
    cmd.arg("-i");
    cmd.path_arg(&spec.input);
    cmd.args(["-vcodec", spec.video_codec.as_str(), "-acodec", "copy"]);
    cmd.args(["-s".to_string(), format!("{}x{}", spec.width, spec.height)]);
    cmd.args(["-start_number", "0"]);
    cmd.args(["-force_key_frames", keyframes.as_str()]);
    cmd.args(["-b:v", &rate, "-minrate", &rate, "-maxrate", &rate, "-bufsize", &rate]);
    cmd.args(["-hls_time", &SEGMENT_SECONDS.to_string()]);
    cmd.args(["-hls_list_size", "0"]);
    cmd.arg("-hls_segment_filename");
    cmd.path_arg(&segment_file);
    cmd.args(["-y", "-v", "error", "-f", "hls"]);
    cmd.path_arg(&spec.playlist_path());
    cmd
}

/// Encode one variant into `spec.output_dir`.
///
/// The output directory must already exist.
pub async fn segment_hls(
    runner: &dyn ToolRunner,
    tools: &ToolRegistry,
    spec: &HlsVariantSpec,
    timeout: Duration,
) -> streamify_core::Result<()> {
    let ffmpeg = tools.require(FFMPEG)?;

    tracing::info!(
        "HLS segment: {:?} -> {:?} ({}x{} @ {}k, segment_duration={}s)",
        spec.input,
        spec.output_dir,
        spec.width,
        spec.height,
        spec.bitrate_kbps,
        SEGMENT_SECONDS
    );

    let mut cmd = hls_segment_command(&ffmpeg.path, spec);
    cmd.timeout(timeout);
    runner.run(&cmd).await?;

    Ok(())
}
