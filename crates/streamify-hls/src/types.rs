//! HLS playlist types.

use serde::{Deserialize, Serialize};

/// A stream variant in a master playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Peak bandwidth in bits per second.
    pub bandwidth: u64,
    /// Optional resolution as (width, height).
    pub resolution: Option<(u32, u32)>,
    /// Codec string (e.g. "avc1.64000c,mp4a.40.2").
    pub codecs: String,
    /// URI to the media playlist for this variant, relative to the master.
    pub uri: String,
}

/// An HLS master playlist containing multiple stream variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterPlaylist {
    /// `#EXT-X-VERSION` value; omitted when `None`.
    pub version: Option<u8>,
    /// Stream variants, in the order they are written.
    pub variants: Vec<Variant>,
}
