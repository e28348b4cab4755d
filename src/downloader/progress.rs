// Progress parsing and terminal reporting

use regex::Regex;
use std::io::Write;
use std::sync::Mutex;

use super::models::DownloadStatus;
use super::traits::ProgressHook;

/// Marker prefixed to every progress line we ask yt-dlp to print
pub const PROGRESS_MARKER: &str = "[tubefetch]";

/// Value for yt-dlp's `--progress-template`
pub fn progress_template() -> String {
    format!(
        "download:{} %(progress.downloaded_bytes)s %(progress.total_bytes)s %(progress.total_bytes_estimate)s",
        PROGRESS_MARKER
    )
}

/// Parse a line produced by `progress_template()`:
/// `[tubefetch] <downloaded> <total|NA> <estimate|NA>`
pub fn parse_progress_line(line: &str) -> Option<DownloadStatus> {
    lazy_static::lazy_static! {
        static ref PROGRESS_RE: Regex = Regex::new(
            r"^\[tubefetch\]\s+(\d+(?:\.\d+)?|NA|None)\s+(\d+(?:\.\d+)?|NA|None)\s+(\d+(?:\.\d+)?|NA|None)\s*$"
        ).unwrap();
    }

    let caps = PROGRESS_RE.captures(line.trim())?;
    let number = |idx: usize| -> Option<u64> {
        caps.get(idx)?
            .as_str()
            .parse::<f64>()
            .ok()
            .map(|v| v as u64)
    };

    let downloaded_bytes = number(1)?;
    let total_bytes = number(2).or_else(|| number(3));

    Some(DownloadStatus {
        downloaded_bytes,
        total_bytes,
    })
}

/// Prints progress on a single, continuously rewritten terminal line
pub struct ProgressReporter {
    last_line: Mutex<String>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            last_line: Mutex::new(String::new()),
        }
    }

    /// Terminate the progress line if anything was printed
    pub fn finish(&self) {
        let Ok(mut last) = self.last_line.lock() else {
            return;
        };
        if !last.is_empty() {
            println!();
            last.clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressHook for ProgressReporter {
    fn on_progress(&self, status: &DownloadStatus) {
        let line = format!("Downloading: {}", status.describe());
        let Ok(mut last) = self.last_line.lock() else {
            return;
        };
        if *last == line {
            return;
        }

        // Output errors are ignored: progress must never affect the download.
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r{:<48}", line);
        let _ = stdout.flush();
        *last = line;
    }
}
