//! Output media profile: target resolution plus the bitrate ladder.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Target resolution and ordered bitrate ladder for a job.
///
/// The position of a bitrate in `bitrates` is its variant index: the first
/// entry becomes `stream_1`, the second `stream_2`, and so on. Reordering the
/// ladder changes output directory names and manifest line order.
///
/// Fields are private so every profile, deserialized ones included, has
/// passed [`MediaProfile::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileFields")]
pub struct MediaProfile {
    width: u32,
    height: u32,
    bitrates: Vec<u32>,
}

/// Unchecked wire form of [`MediaProfile`].
#[derive(Deserialize)]
struct ProfileFields {
    width: u32,
    height: u32,
    bitrates: Vec<u32>,
}

impl TryFrom<ProfileFields> for MediaProfile {
    type Error = Error;

    fn try_from(raw: ProfileFields) -> Result<Self> {
        Self::new(raw.width, raw.height, raw.bitrates)
    }
}

impl MediaProfile {
    /// Build a profile, rejecting zero dimensions and empty or zero ladders.
    pub fn new(width: u32, height: u32, bitrates: Vec<u32>) -> Result<Self> {
        if width == 0 {
            return Err(Error::Validation("width must be a positive integer".into()));
        }
        if height == 0 {
            return Err(Error::Validation("height must be a positive integer".into()));
        }
        if bitrates.is_empty() {
            return Err(Error::Validation("bitrate ladder must not be empty".into()));
        }
        if let Some(pos) = bitrates.iter().position(|&b| b == 0) {
            return Err(Error::Validation(format!(
                "bitrate #{} must be a positive integer",
                pos + 1
            )));
        }

        Ok(Self {
            width,
            height,
            bitrates,
        })
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Target video bitrates in kbps, in ladder order. Never empty.
    pub fn bitrates(&self) -> &[u32] {
        &self.bitrates
    }

    /// `<width>x<height>`, as used by both ffmpeg `-s` and the manifest.
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Iterate the ladder as `(1-based index, bitrate_kbps)` pairs.
    pub fn ladder(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.bitrates.iter().enumerate().map(|(i, &b)| (i + 1, b))
    }
}

/// Parse a comma-separated bitrate ladder such as `"500,1000,2500"`.
///
/// Surrounding whitespace around each entry is ignored. Order is preserved.
pub fn parse_bitrates(raw: &str) -> Result<Vec<u32>> {
    if raw.trim().is_empty() {
        return Err(Error::Validation("bitrates must list at least one value".into()));
    }

    raw.split(',')
        .map(|part| {
            let part = part.trim();
            match part.parse::<u32>() {
                Ok(0) => Err(Error::Validation(format!(
                    "bitrate '{part}' must be a positive integer"
                ))),
                Ok(value) => Ok(value),
                Err(_) => Err(Error::Validation(format!(
                    "bitrate '{part}' is not a positive integer"
                ))),
            }
        })
        .collect()
}
