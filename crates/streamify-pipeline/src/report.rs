//! Results of a successful job run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One encoded rung of the bitrate ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    /// 1-based ladder position; also the `stream_<index>` directory suffix.
    pub index: usize,
    /// Absolute path of the variant playlist.
    pub playlist_path: PathBuf,
    pub bitrate_kbps: u32,
}

/// Summary of a completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub job_name: String,
    pub safe_name: String,
    pub workspace: PathBuf,
    /// Local file the audio stripper read.
    pub source: PathBuf,
    /// Whether `source` was downloaded into `src/`.
    pub downloaded: bool,
    pub mp4_path: PathBuf,
    /// Variants in ladder order.
    pub variants: Vec<VariantDescriptor>,
    pub manifest_path: PathBuf,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
}
