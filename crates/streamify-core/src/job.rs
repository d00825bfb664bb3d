//! Job description: sanitized name, input locator, and media profile.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::profile::MediaProfile;
use crate::{Error, Result};

/// File name used for downloads whose URL has no usable path segment.
const FALLBACK_SOURCE_NAME: &str = "source";

/// Remove every character outside `[A-Za-z0-9.-]`.
///
/// Pure and idempotent. An empty or fully-disallowed input yields an empty
/// string; callers that need a usable name go through [`JobSpec::new`].
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-')
        .collect()
}

/// Where the source video comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLocator {
    /// Anything that parses as an absolute URL; fetched before use.
    Remote(Url),
    /// A local filesystem path, used as-is.
    Local(PathBuf),
}

impl InputLocator {
    /// Classify `input` by attempting a URL parse.
    ///
    /// No scheme whitelist is applied: `ftp://` or `file://` locators are
    /// remote too. Relative paths never parse as URLs.
    pub fn classify(input: &str) -> Self {
        match Url::parse(input) {
            Ok(url) => InputLocator::Remote(url),
            Err(_) => InputLocator::Local(PathBuf::from(input)),
        }
    }

    /// Whether the locator must be downloaded first.
    pub fn is_remote(&self) -> bool {
        matches!(self, InputLocator::Remote(_))
    }
}

/// Last non-empty path segment of `url`, used as the download file name.
///
/// The segment is kept as it appears in the URL (still percent-encoded), the
/// same name wget would pick. Falls back to `source` when the segment is
/// missing, a dot component, or holds a path separator.
pub fn remote_file_name(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default();

    if matches!(segment, "" | "." | "..") || segment.contains(['/', '\\']) {
        return FALLBACK_SOURCE_NAME.to_string();
    }
    segment.to_string()
}

/// A validated transcode job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    /// The name as the user supplied it.
    pub raw_name: String,
    /// Sanitized name; every workspace path is derived from this.
    pub safe_name: String,
    /// The raw input locator (path or URL).
    pub input: String,
    /// Target resolution and bitrate ladder.
    pub profile: MediaProfile,
}

impl JobSpec {
    /// Validate and build a job.
    ///
    /// Fails with [`Error::Validation`] when the name or input is blank, or
    /// when the sanitized name is empty (which would otherwise point the
    /// workspace at the media root itself). Names starting with `.` are
    /// reserved for streamify's own entries under the media root.
    pub fn new(name: &str, input: &str, profile: MediaProfile) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::Validation("missing job name".into()));
        }
        if input.trim().is_empty() {
            return Err(Error::Validation("missing input".into()));
        }

        let safe_name = sanitize(name);
        if safe_name.is_empty() {
            return Err(Error::Validation(format!(
                "job name '{name}' contains no characters from [A-Za-z0-9.-]"
            )));
        }
        if safe_name.starts_with('.') {
            return Err(Error::Validation(format!(
                "job name '{name}' sanitizes to '{safe_name}'; names may not start with '.'"
            )));
        }

        Ok(Self {
            raw_name: name.to_string(),
            safe_name,
            input: input.to_string(),
            profile,
        })
    }

    /// Classified input locator.
    pub fn locator(&self) -> InputLocator {
        InputLocator::classify(&self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> MediaProfile {
        MediaProfile::new(640, 360, vec![500, 1000]).unwrap()
    }

    #[test]
    fn sanitize_removes_disallowed_characters() {
        assert_eq!(sanitize("My Movie (2023)!.mp4"), "MyMovie2023.mp4");
        assert_eq!(sanitize("a/b\\c"), "abc");
        assert_eq!(sanitize("keep-dots.and-dashes"), "keep-dots.and-dashes");
        assert_eq!(sanitize("naïve_café"), "navecaf");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["", "  ", "Hello World", "x_y-z.1", "日本語-01", "../../etc"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once, "not idempotent for {raw:?}");
            assert!(once
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-'));
        }
    }

    #[test]
    fn sanitize_empty_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("___"), "");
    }

    #[test]
    fn classify_url_and_paths() {
        assert!(InputLocator::classify("http://host/video.mp4").is_remote());
        assert!(InputLocator::classify("https://cdn.example.com/a/b.mov?x=1").is_remote());
        assert!(!InputLocator::classify("/tmp/video.mp4").is_remote());
        assert!(!InputLocator::classify("videos/clip.mp4").is_remote());
        assert!(!InputLocator::classify("clip.mp4").is_remote());
    }

    #[test]
    fn remote_file_name_uses_last_segment() {
        let url = Url::parse("http://host/media/video.mp4").unwrap();
        assert_eq!(remote_file_name(&url), "video.mp4");

        let url = Url::parse("http://host/media/video.mp4?token=abc").unwrap();
        assert_eq!(remote_file_name(&url), "video.mp4");

        let url = Url::parse("http://host/media/").unwrap();
        assert_eq!(remote_file_name(&url), "media");
    }

    #[test]
    fn remote_file_name_keeps_basename_verbatim() {
        let url = Url::parse("http://host/my_clip.mp4").unwrap();
        assert_eq!(remote_file_name(&url), "my_clip.mp4");

        let url = Url::parse("http://host/dir/clip%20hd+v2.mp4").unwrap();
        assert_eq!(remote_file_name(&url), "clip%20hd+v2.mp4");
    }

    #[test]
    fn remote_file_name_falls_back() {
        let url = Url::parse("http://host").unwrap();
        assert_eq!(remote_file_name(&url), "source");

        let url = Url::parse("http://host/%2E%2E").unwrap();
        assert_ne!(remote_file_name(&url), "..");
    }

    #[test]
    fn job_uses_sanitized_name() {
        let job = JobSpec::new("My Stream #1", "/tmp/in.mp4", profile()).unwrap();
        assert_eq!(job.safe_name, "MyStream1");
        assert_eq!(job.raw_name, "My Stream #1");
        assert_eq!(
            job.locator(),
            InputLocator::Local(PathBuf::from("/tmp/in.mp4"))
        );
    }

    #[test]
    fn job_rejects_empty_sanitized_name() {
        let err = JobSpec::new("###", "/tmp/in.mp4", profile()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn job_rejects_dot_names() {
        assert!(JobSpec::new("..", "/tmp/in.mp4", profile()).is_err());
        assert!(JobSpec::new("/.", "/tmp/in.mp4", profile()).is_err());
    }

    #[test]
    fn job_rejects_leading_dot_names() {
        for name in [".foo.lock", ".locks", " .hidden"] {
            let err = JobSpec::new(name, "/tmp/in.mp4", profile()).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{name:?}");
        }
        assert_eq!(
            JobSpec::new("foo.lock", "/tmp/in.mp4", profile()).unwrap().safe_name,
            "foo.lock"
        );
    }

    #[test]
    fn job_rejects_missing_fields() {
        assert!(JobSpec::new("", "/tmp/in.mp4", profile()).is_err());
        assert!(JobSpec::new("job", " ", profile()).is_err());
    }

    #[test]
    fn remote_job_locator() {
        let job = JobSpec::new("job", "http://host/video.mp4", profile()).unwrap();
        assert!(job.locator().is_remote());
    }
}
