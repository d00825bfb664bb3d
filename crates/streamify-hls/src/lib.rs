//! HLS master playlist generation.
//!
//! This crate renders the master manifest that ties a bitrate ladder's
//! variant playlists together. Variant playlists and segments themselves are
//! written by ffmpeg.

mod generator;
mod types;

pub use generator::{build_master_manifest, generate_master_playlist, master_playlist_for};
pub use types::{MasterPlaylist, Variant};

/// Playlist protocol version advertised in the master manifest.
pub const MASTER_PLAYLIST_VERSION: u8 = 3;

/// Codec string advertised for every variant.
///
/// This is a fixed literal, not derived from the encoded streams.
pub const VARIANT_CODECS: &str = "avc1.64000c,mp4a.40.2";

/// Multiplier from ladder kbps to manifest `BANDWIDTH` bits per second.
pub const BANDWIDTH_MULTIPLIER: u64 = 1024;

/// Master manifest file name inside the `hls/` directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.m3u8";
