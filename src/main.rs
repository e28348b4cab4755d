use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::debug;

use tubefetch::downloader::{
    DownloadError, DownloadRequest, DownloadStatus, Downloader, FailureReason, Launcher,
    ProgressReporter, ProviderConfig, Quality, YtDlpProvider,
};
use tubefetch::logging;

/// Download a YouTube video with yt-dlp
#[derive(Parser, Debug)]
#[command(name = "tubefetch")]
#[command(version)]
struct Args {
    /// Video URL (watch, youtu.be or shorts); prompted for when omitted
    url: Option<String>,

    /// Directory to save into (defaults to the current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// best, 1080p, 720p, 480p, 360p or audio
    #[arg(short, long, default_value = "best")]
    quality: Quality,

    /// Proxy URL passed to yt-dlp (e.g. socks5://127.0.0.1:1080)
    #[arg(long)]
    proxy: Option<String>,

    /// cookies.txt for age-restricted or members-only videos
    #[arg(long)]
    cookies: Option<PathBuf>,

    /// Path to the yt-dlp binary
    #[arg(long, conflicts_with = "python")]
    ytdlp: Option<String>,

    /// Run yt-dlp as `<PYTHON> -m yt_dlp`
    #[arg(long)]
    python: Option<String>,

    /// Socket timeout in seconds, forwarded to yt-dlp
    #[arg(long)]
    socket_timeout: Option<u32>,

    /// Print one JSON object with the outcome instead of progress and messages
    #[arg(long)]
    json: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Outcome printed by `--json`
#[derive(Serialize, Debug)]
struct Report {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<FailureReason>,
}

impl Report {
    fn new(result: &Result<PathBuf, DownloadError>) -> Self {
        match result {
            Ok(path) => Self {
                ok: true,
                path: Some(path.to_string_lossy().to_string()),
                category: None,
                message: None,
                reason: None,
            },
            Err(e) => Self {
                ok: false,
                path: None,
                category: Some(e.category()),
                message: Some(e.to_string()),
                reason: e.reason(),
            },
        }
    }
}

impl Args {
    fn provider_config(&self) -> ProviderConfig {
        let mut config = ProviderConfig::from_env()
            .with_quality(self.quality)
            .with_proxy(self.proxy.clone())
            .with_cookies_path(self.cookies.clone())
            .with_socket_timeout(self.socket_timeout);

        if let Some(python) = &self.python {
            config = config.with_launcher(Launcher::PythonModule(python.clone()));
        } else if let Some(path) = &self.ytdlp {
            config = config.with_launcher(Launcher::Binary(path.clone()));
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    logging::init_tracing(&args.log_level);

    let url = match args.url.clone() {
        Some(url) => url,
        None => match prompt_for_url() {
            Ok(url) => url,
            Err(e) => {
                println!("Could not read a URL: {}", e);
                return;
            }
        },
    };

    let provider = YtDlpProvider::new(args.provider_config());
    let version = provider.version().await;
    debug!("yt-dlp version: {}", version.as_deref().unwrap_or("unknown"));

    let downloader = Downloader::new(Box::new(provider));
    let request = DownloadRequest::new(url.trim(), args.output_dir.clone());

    if args.json {
        let result = downloader
            .download_video(&request, &|_: &DownloadStatus| {})
            .await;
        match serde_json::to_string(&Report::new(&result)) {
            Ok(line) => println!("{}", line),
            Err(e) => println!("Could not encode result: {}", e),
        }
        return;
    }

    let reporter = ProgressReporter::new();
    println!("Fetching {} ...", request.url);
    let result = downloader.download_video(&request, &reporter).await;
    reporter.finish();

    match result {
        Ok(path) => println!("Download complete: {}", path.display()),
        Err(e) => print_failure(&e, version.as_deref()),
    }
}

fn prompt_for_url() -> io::Result<String> {
    print!("YouTube URL: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_failure(error: &DownloadError, version: Option<&str>) {
    println!("Error: {}", error);

    if let Some(reason) = error.reason() {
        println!("{}: {}", reason.description(), reason.suggestion());
    }

    if let DownloadError::Unexpected { detail, .. } = error {
        println!("Details: {}", detail);
    }

    if error.provider_update_might_help() {
        println!(
            "If this keeps happening, update yt-dlp (`yt-dlp -U` or `pip install -U yt-dlp`); installed: {}",
            version.unwrap_or("unknown")
        );
    }
}
