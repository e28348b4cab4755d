// yt-dlp provider - drives the yt-dlp program as a child process
//
// Two launch modes:
// - Binary: native `yt-dlp` executable (found on common paths or PATH)
// - Python: `<python> -m yt_dlp`, for pip/venv installs

use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, warn};

use crate::downloader::config::{Launcher, ProviderConfig};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::VideoMetadata;
use crate::downloader::progress::{parse_progress_line, progress_template};
use crate::downloader::traits::{MediaProvider, ProgressHook};
use crate::downloader::utils::{find_ytdlp, run_output, spawn_piped};

/// Output name relative to the destination directory
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

pub struct YtDlpProvider {
    program: String,
    /// Arguments placed before any yt-dlp option (e.g. `-m yt_dlp`)
    base_args: Vec<String>,
    config: ProviderConfig,
}

impl YtDlpProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let (program, base_args) = match &config.launcher {
            Launcher::Auto => {
                let program = find_ytdlp().unwrap_or_else(|| {
                    debug!("[yt-dlp] Not found on common paths or PATH; trying plain `yt-dlp`");
                    "yt-dlp".to_string()
                });
                (program, Vec::new())
            }
            Launcher::Binary(path) => (path.clone(), Vec::new()),
            Launcher::PythonModule(python) => (
                python.clone(),
                vec!["-m".to_string(), "yt_dlp".to_string()],
            ),
        };

        Self::from_command(program, base_args, config)
    }

    /// Use an explicit command line in place of the launcher lookup
    pub fn from_command(
        program: impl Into<String>,
        base_args: Vec<String>,
        config: ProviderConfig,
    ) -> Self {
        Self {
            program: program.into(),
            base_args,
            config,
        }
    }

    /// Provider version string, if the program answers `--version`
    pub async fn version(&self) -> Option<String> {
        let output = run_output(&self.program, self.args(vec!["--version".to_string()]))
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!version.is_empty()).then_some(version)
    }

    fn args(&self, rest: Vec<String>) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.extend(rest);
        args
    }

    fn info_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "-f".to_string(),
            self.config.quality.format_spec().to_string(),
            "-o".to_string(),
            OUTPUT_TEMPLATE.to_string(),
        ];
        args.extend(self.config.network_args());
        args.push(url.to_string());
        self.args(args)
    }

    fn download_args(&self, url: &str, destination: &Path) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.config.quality.format_spec().to_string(),
            "--no-playlist".to_string(),
            "--newline".to_string(),
            "--progress-template".to_string(),
            progress_template(),
            "-P".to_string(),
            destination.to_string_lossy().to_string(),
            "-o".to_string(),
            OUTPUT_TEMPLATE.to_string(),
        ];
        args.extend(self.config.network_args());
        args.push(url.to_string());
        self.args(args)
    }
}

#[async_trait]
impl MediaProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract_info(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
        let args = self.info_args(url);
        debug!("[yt-dlp] {} {}", self.program, args.join(" "));

        let output = run_output(&self.program, args).await?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        stderr.lines().for_each(log_provider_line);

        if !output.status.success() {
            if is_missing_module(&stderr) {
                return Err(DownloadError::unexpected(
                    format!("{} has no yt_dlp module", self.program),
                    stderr.to_string(),
                ));
            }
            return Err(DownloadError::extraction(&stderr));
        }

        parse_metadata(&output.stdout)
    }

    async fn download(
        &self,
        url: &str,
        destination: &Path,
        progress: &dyn ProgressHook,
    ) -> Result<(), DownloadError> {
        let args = self.download_args(url, destination);
        debug!("[yt-dlp] {} {}", self.program, args.join(" "));

        let mut child = spawn_piped(&self.program, &args)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::unexpected("Failed to capture stdout", self.program.clone()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::unexpected("Failed to capture stderr", self.program.clone()))?;

        // Collect stderr for diagnosis while forwarding it to the log
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut collected = Vec::new();
            while let Some(line) = lines.next_line().await? {
                log_provider_line(&line);
                collected.push(line);
            }
            Ok::<String, std::io::Error>(collected.join("\n"))
        });

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| DownloadError::unexpected("Failed to read yt-dlp output", format!("{:?}", e)))?
        {
            match parse_progress_line(&line) {
                Some(status) => progress.on_progress(&status),
                None => debug!("[yt-dlp] {}", line),
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| DownloadError::unexpected("Failed to wait for yt-dlp", format!("{:?}", e)))?;
        let stderr_output = stderr_task
            .await
            .map_err(|e| DownloadError::unexpected("stderr task failed", format!("{:?}", e)))?
            .map_err(|e| DownloadError::unexpected("Failed to read yt-dlp errors", format!("{:?}", e)))?;

        if status.success() {
            return Ok(());
        }

        if is_missing_module(&stderr_output) {
            return Err(DownloadError::unexpected(
                format!("{} has no yt_dlp module", self.program),
                stderr_output,
            ));
        }
        Err(DownloadError::download(&stderr_output))
    }
}

/// Parse `--dump-json` output. Missing fields stay empty; the orchestrator decides what that means.
pub fn parse_metadata(stdout: &[u8]) -> Result<VideoMetadata, DownloadError> {
    let text = String::from_utf8_lossy(stdout);
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

    let json: serde_json::Value =
        serde_json::from_str(first).map_err(|e| DownloadError::Extraction {
            message: format!("Invalid JSON from yt-dlp: {}", e),
            reason: None,
        })?;

    // `filename` is the output template rendered with yt-dlp's own sanitisation
    let file_name = json["filename"]
        .as_str()
        .or_else(|| json["_filename"].as_str())
        .and_then(|f| Path::new(f).file_name())
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(VideoMetadata {
        title: json["title"].as_str().unwrap_or("").to_string(),
        duration_seconds: json["duration"].as_f64().unwrap_or(0.0).max(0.0) as u64,
        file_extension: json["ext"].as_str().unwrap_or("").to_string(),
        file_name,
    })
}

/// Route a provider stderr line to the logger by its severity prefix
fn log_provider_line(line: &str) {
    let line = line.trim_end();
    if line.is_empty() {
        return;
    }

    if let Some(message) = line.strip_prefix("ERROR:") {
        error!("[yt-dlp] {}", message.trim());
    } else if let Some(message) = line.strip_prefix("WARNING:") {
        warn!("[yt-dlp] {}", message.trim());
    } else {
        debug!("[yt-dlp] {}", line);
    }
}

fn is_missing_module(stderr: &str) -> bool {
    stderr.contains("No module named yt_dlp")
}
