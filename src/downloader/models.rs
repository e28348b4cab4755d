// Common data models for downloader

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One download invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    /// Falls back to the current working directory when absent
    pub destination_directory: Option<PathBuf>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, destination_directory: Option<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination_directory,
        }
    }
}

/// Video information reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub duration_seconds: u64,
    pub file_extension: String,
    /// Name the provider will write, already sanitized by it; empty when not reported
    pub file_name: String,
}

impl VideoMetadata {
    /// Title and extension are both present
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.file_extension.trim().is_empty()
    }

    /// Duration as `m:ss` (or `h:mm:ss`)
    pub fn duration_label(&self) -> String {
        let hours = self.duration_seconds / 3600;
        let minutes = (self.duration_seconds % 3600) / 60;
        let seconds = self.duration_seconds % 60;
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{}:{:02}", minutes, seconds)
        }
    }
}

/// Progress record handed to the progress hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStatus {
    pub downloaded_bytes: u64,
    /// Exact or estimated size, when the provider knows it
    pub total_bytes: Option<u64>,
}

impl DownloadStatus {
    /// Percentage complete, only when the total is known
    pub fn percent(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => {
                Some((self.downloaded_bytes as f64 / total as f64 * 100.0).min(100.0))
            }
            _ => None,
        }
    }

    /// Human-readable status line
    pub fn describe(&self) -> String {
        match self.percent() {
            Some(percent) => format!(
                "{:.1}% of {}",
                percent,
                format_bytes(self.total_bytes.unwrap_or_default())
            ),
            None => format!("{} downloaded", format_bytes(self.downloaded_bytes)),
        }
    }
}

/// Binary-prefixed size string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}

/// Stream quality to request from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    /// Highest resolution stream carrying both audio and video
    #[default]
    Best,
    P1080,
    P720,
    P480,
    P360,
    Audio,
}

impl Quality {
    /// yt-dlp format selector; always resolves to a single file
    pub fn format_spec(&self) -> &'static str {
        match self {
            Self::Best => "b",
            Self::P1080 => "b[height<=1080]/b",
            Self::P720 => "b[height<=720]/b",
            Self::P480 => "b[height<=480]/b",
            Self::P360 => "b[height<=360]/b",
            Self::Audio => "ba/b",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::P1080 => "1080p",
            Self::P720 => "720p",
            Self::P480 => "480p",
            Self::P360 => "360p",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "1080p" | "1080" => Ok(Self::P1080),
            "720p" | "720" => Ok(Self::P720),
            "480p" | "480" => Ok(Self::P480),
            "360p" | "360" => Ok(Self::P360),
            "audio" => Ok(Self::Audio),
            other => Err(format!(
                "unknown quality '{}' (expected best, 1080p, 720p, 480p, 360p or audio)",
                other
            )),
        }
    }
}
