//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML and carries the
//! storage, tool, and segmenter sections. Every section defaults sensibly so
//! an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::Error;

/// Environment variable that overrides `storage.media_root`.
pub const MEDIA_ROOT_ENV: &str = "STREAMIFY_MEDIA_ROOT";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub tools: ToolsConfig,
    pub segmenter: SegmenterConfig,
}

impl Config {
    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("config parse error: {e}")))
    }

    /// Apply the `STREAMIFY_MEDIA_ROOT` override, if set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(root) = std::env::var(MEDIA_ROOT_ENV) {
            if !root.trim().is_empty() {
                self.storage.media_root = PathBuf::from(root);
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.storage.media_root.as_os_str().is_empty() {
            warnings.push("storage.media_root is empty; the current directory will be used".into());
        }

        if self.segmenter.max_parallel == 0 {
            warnings.push("segmenter.max_parallel is 0; variants will run one at a time".into());
        }

        for (name, path) in [
            ("ffmpeg_path", self.tools.ffmpeg_path.as_deref()),
            ("wget_path", self.tools.wget_path.as_deref()),
        ] {
            if let Some(p) = path {
                if !p.exists() {
                    warnings.push(format!(
                        "tools.{name} {} does not exist; falling back to PATH",
                        p.display()
                    ));
                }
            }
        }

        for (name, secs) in [
            ("fetch_timeout_secs", self.tools.fetch_timeout_secs),
            ("strip_timeout_secs", self.tools.strip_timeout_secs),
            ("segment_timeout_secs", self.tools.segment_timeout_secs),
        ] {
            if secs == 0 {
                warnings.push(format!("tools.{name} is 0; every call will time out"));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Where job workspaces live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub media_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("./media"),
        }
    }
}

/// Paths and time limits for external CLI tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub wget_path: Option<PathBuf>,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_strip_timeout")]
    pub strip_timeout_secs: u64,
    #[serde(default = "default_segment_timeout")]
    pub segment_timeout_secs: u64,
}

fn default_fetch_timeout() -> u64 {
    3600
}
fn default_strip_timeout() -> u64 {
    3600
}
fn default_segment_timeout() -> u64 {
    86400
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            wget_path: None,
            fetch_timeout_secs: default_fetch_timeout(),
            strip_timeout_secs: default_strip_timeout(),
            segment_timeout_secs: default_segment_timeout(),
        }
    }
}

/// Bitrate ladder execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// How many variants may encode at the same time.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
    /// Video encoder passed to ffmpeg `-vcodec`.
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
}

fn default_max_parallel() -> usize {
    1
}
fn default_video_codec() -> String {
    "libx264".into()
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_parallel: default_max_parallel(),
            video_codec: default_video_codec(),
        }
    }
}
