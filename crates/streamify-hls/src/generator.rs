//! HLS master playlist generation functions.

use std::fmt::Write;

use streamify_core::MediaProfile;

use super::types::{MasterPlaylist, Variant};
use crate::{BANDWIDTH_MULTIPLIER, MASTER_PLAYLIST_VERSION, VARIANT_CODECS};

/// Generate an HLS master playlist (M3U8) from a [`MasterPlaylist`].
///
/// Output includes the `#EXTM3U` header, an optional `#EXT-X-VERSION`, and an
/// `#EXT-X-STREAM-INF` line plus URI for each variant. Every line, including
/// the last, ends with `\n`.
pub fn generate_master_playlist(playlist: &MasterPlaylist) -> String {
    let mut out = String::new();

    writeln!(out, "#EXTM3U").unwrap();

    if let Some(version) = playlist.version {
        writeln!(out, "#EXT-X-VERSION:{version}").unwrap();
    }

    for variant in &playlist.variants {
        write!(out, "#EXT-X-STREAM-INF:BANDWIDTH={}", variant.bandwidth).unwrap();

        if let Some((w, h)) = variant.resolution {
            write!(out, ",RESOLUTION={}x{}", w, h).unwrap();
        }

        if !variant.codecs.is_empty() {
            write!(out, ",CODECS=\"{}\"", variant.codecs).unwrap();
        }

        writeln!(out).unwrap();
        writeln!(out, "{}", variant.uri).unwrap();
    }

    out
}

/// Describe the master playlist for a profile's ladder.
///
/// Variant `i` (1-based, ladder order) points at `stream_<i>/playlist.m3u8`
/// with `BANDWIDTH = bitrate_kbps * 1024`.
pub fn master_playlist_for(profile: &MediaProfile) -> MasterPlaylist {
    let variants = profile
        .ladder()
        .map(|(index, bitrate)| Variant {
            bandwidth: u64::from(bitrate) * BANDWIDTH_MULTIPLIER,
            resolution: Some((profile.width(), profile.height())),
            codecs: VARIANT_CODECS.to_string(),
            uri: format!("stream_{index}/playlist.m3u8"),
        })
        .collect();

    MasterPlaylist {
        version: Some(MASTER_PLAYLIST_VERSION),
        variants,
    }
}

/// Render the master manifest text for a profile. Pure; no I/O.
pub fn build_master_manifest(profile: &MediaProfile) -> String {
    generate_master_playlist(&master_playlist_for(profile))
}
