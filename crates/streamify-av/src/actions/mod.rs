//! Media processing actions: remote fetch, audio stripping, and HLS
//! segmentation. Each action is split into a pure command builder and an
//! async runner so argument layout can be checked without spawning anything.

mod fetch;
mod hls_segment;
mod strip_audio;

pub use fetch::{fetch_command, fetch_remote};
pub use hls_segment::{
    hls_segment_command, segment_hls, HlsVariantSpec, PLAYLIST_FILE_NAME, SEGMENT_PATTERN,
    SEGMENT_SECONDS,
};
pub use strip_audio::{strip_audio, strip_audio_command};
