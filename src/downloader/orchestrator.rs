// Download orchestration: validate, fetch metadata, download, resolve path

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::errors::DownloadError;
use super::models::{DownloadRequest, VideoMetadata};
use super::traits::{MediaProvider, ProgressHook};
use super::validator::{extract_video_id, is_valid_youtube_url};

pub struct Downloader {
    provider: Box<dyn MediaProvider>,
}

impl Downloader {
    pub fn new(provider: Box<dyn MediaProvider>) -> Self {
        Self { provider }
    }

    /// Run one request to completion. No retries: the first failure is the result.
    pub async fn download_video(
        &self,
        request: &DownloadRequest,
        progress: &dyn ProgressHook,
    ) -> Result<PathBuf, DownloadError> {
        let result = self.run(request, progress).await;

        if let Err(DownloadError::Unexpected { message, detail }) = &result {
            error!("[Downloader] {}: {}", message, detail);
        }
        result
    }

    async fn run(
        &self,
        request: &DownloadRequest,
        progress: &dyn ProgressHook,
    ) -> Result<PathBuf, DownloadError> {
        if !is_valid_youtube_url(&request.url) {
            return Err(DownloadError::InvalidUrl(request.url.clone()));
        }

        let destination = resolve_destination(request.destination_directory.as_deref())?;
        info!(
            "[Downloader] {} (id {}) -> {}",
            request.url,
            extract_video_id(&request.url).unwrap_or_default(),
            destination.display()
        );

        let metadata = self.provider.extract_info(&request.url).await?;
        info!(
            "[Downloader] \"{}\" ({}, .{}) via {}",
            metadata.title,
            metadata.duration_label(),
            metadata.file_extension,
            self.provider.name()
        );

        self.provider
            .download(&request.url, &destination, progress)
            .await?;

        Ok(resolve_output_path(&destination, &metadata))
    }
}

/// Absolute destination: the given directory anchored at the working directory, or the
/// working directory itself
pub fn resolve_destination(directory: Option<&Path>) -> Result<PathBuf, DownloadError> {
    match directory {
        Some(dir) if dir.is_absolute() => Ok(dir.to_path_buf()),
        Some(dir) => Ok(current_dir()?.join(dir)),
        None => current_dir(),
    }
}

fn current_dir() -> Result<PathBuf, DownloadError> {
    std::env::current_dir().map_err(|e| {
        DownloadError::unexpected("Cannot determine current directory", format!("{:?}", e))
    })
}

/// Path of the downloaded file; the destination itself when metadata is incomplete
pub fn resolve_output_path(destination: &Path, metadata: &VideoMetadata) -> PathBuf {
    if !metadata.is_complete() {
        warn!(
            "[Downloader] Provider metadata has no title or extension; reporting {} instead of a file",
            destination.display()
        );
        return destination.to_path_buf();
    }

    if !metadata.file_name.is_empty() {
        return destination.join(&metadata.file_name);
    }

    destination.join(format!(
        "{}.{}",
        sanitize_title(&metadata.title),
        metadata.file_extension
    ))
}

/// The character replacements yt-dlp applies to `%(title)s` in output names
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter_map(|c| match c {
            '"' | '*' | ':' | '<' | '>' | '?' | '|' => char::from_u32(c as u32 + 0xFEE0),
            '/' => Some('\u{29F8}'),
            '\\' => Some('\u{29F9}'),
            '\n' => Some(' '),
            c if c.is_ascii_control() => None,
            c => Some(c),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::DownloadStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Calls {
        extract: AtomicUsize,
        download: AtomicUsize,
    }

    struct MockProvider {
        calls: Arc<Calls>,
        metadata: Result<VideoMetadata, DownloadError>,
        download: Result<(), DownloadError>,
    }

    impl MockProvider {
        fn new(calls: Arc<Calls>) -> Self {
            Self {
                calls,
                metadata: Ok(VideoMetadata {
                    title: "Never Gonna Give You Up".to_string(),
                    duration_seconds: 212,
                    file_extension: "mp4".to_string(),
                    file_name: String::new(),
                }),
                download: Ok(()),
            }
        }
    }

    #[async_trait]
    impl MediaProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn extract_info(&self, _url: &str) -> Result<VideoMetadata, DownloadError> {
            self.calls.extract.fetch_add(1, Ordering::SeqCst);
            self.metadata.clone()
        }

        async fn download(
            &self,
            _url: &str,
            _destination: &Path,
            progress: &dyn ProgressHook,
        ) -> Result<(), DownloadError> {
            self.calls.download.fetch_add(1, Ordering::SeqCst);
            progress.on_progress(&DownloadStatus {
                downloaded_bytes: 10,
                total_bytes: Some(20),
            });
            self.download.clone()
        }
    }

    fn no_progress() -> impl Fn(&DownloadStatus) + Send + Sync {
        |_: &DownloadStatus| {}
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_provider_calls() {
        let calls = Arc::new(Calls::default());
        let downloader = Downloader::new(Box::new(MockProvider::new(calls.clone())));

        for url in ["not a url", "", "https://www.youtube.com/watch?v=dQw4w9WgXc"] {
            let err = downloader
                .download_video(&DownloadRequest::new(url, None), &no_progress())
                .await
                .unwrap_err();
            assert!(matches!(err, DownloadError::InvalidUrl(ref u) if u == url));
        }

        assert_eq!(calls.extract.load(Ordering::SeqCst), 0);
        assert_eq!(calls.download.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extraction_failure_skips_download() {
        let calls = Arc::new(Calls::default());
        let mut provider = MockProvider::new(calls.clone());
        provider.metadata = Err(DownloadError::extraction("ERROR: Private video"));
        let downloader = Downloader::new(Box::new(provider));

        let request = DownloadRequest::new("https://youtu.be/dQw4w9WgXcQ", Some("/tmp".into()));
        let err = downloader
            .download_video(&request, &no_progress())
            .await
            .unwrap_err();

        assert_eq!(err.category(), "extraction");
        assert_eq!(calls.extract.load(Ordering::SeqCst), 1);
        assert_eq!(calls.download.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_failure_is_reported_once() {
        let calls = Arc::new(Calls::default());
        let mut provider = MockProvider::new(calls.clone());
        provider.download = Err(DownloadError::download("ERROR: HTTP Error 403: Forbidden"));
        let downloader = Downloader::new(Box::new(provider));

        let request = DownloadRequest::new("https://youtu.be/dQw4w9WgXcQ", Some("/tmp".into()));
        let err = downloader
            .download_video(&request, &no_progress())
            .await
            .unwrap_err();

        assert_eq!(err.category(), "download");
        assert_eq!(calls.download.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unexpected_error_keeps_detail() {
        let calls = Arc::new(Calls::default());
        let mut provider = MockProvider::new(calls);
        provider.metadata = Err(DownloadError::unexpected("spawn failed", "Os { code: 2 }"));
        let downloader = Downloader::new(Box::new(provider));

        let request = DownloadRequest::new("https://youtu.be/dQw4w9WgXcQ", Some("/tmp".into()));
        match downloader.download_video(&request, &no_progress()).await {
            Err(DownloadError::Unexpected { detail, .. }) => assert_eq!(detail, "Os { code: 2 }"),
            other => panic!("expected unexpected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_returns_title_path() {
        let calls = Arc::new(Calls::default());
        let downloader = Downloader::new(Box::new(MockProvider::new(calls.clone())));
        let request = DownloadRequest::new(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            Some(PathBuf::from("/videos")),
        );

        let seen = AtomicUsize::new(0);
        let hook = |_: &DownloadStatus| {
            seen.fetch_add(1, Ordering::SeqCst);
        };
        let path = downloader.download_video(&request, &hook).await.unwrap();

        assert_eq!(path, PathBuf::from("/videos/Never Gonna Give You Up.mp4"));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(calls.extract.load(Ordering::SeqCst), 1);
        assert_eq!(calls.download.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_default_destination_is_cwd() {
        let calls = Arc::new(Calls::default());
        let downloader = Downloader::new(Box::new(MockProvider::new(calls)));
        let request = DownloadRequest::new("youtube.com/shorts/dQw4w9WgXcQ", None);

        let path = downloader
            .download_video(&request, &no_progress())
            .await
            .unwrap();

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(path, cwd.join("Never Gonna Give You Up.mp4"));
    }

    #[tokio::test]
    async fn test_missing_metadata_degrades_to_directory() {
        let calls = Arc::new(Calls::default());
        let mut provider = MockProvider::new(calls.clone());
        provider.metadata = Ok(VideoMetadata::default());
        let downloader = Downloader::new(Box::new(provider));

        let request = DownloadRequest::new("https://youtu.be/dQw4w9WgXcQ", Some("/videos".into()));
        let path = downloader
            .download_video(&request, &no_progress())
            .await
            .unwrap();

        assert_eq!(path, PathBuf::from("/videos"));
        assert_eq!(calls.download.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_relative_destination_is_made_absolute() {
        let calls = Arc::new(Calls::default());
        let downloader = Downloader::new(Box::new(MockProvider::new(calls)));
        let request = DownloadRequest::new(
            "https://youtu.be/dQw4w9WgXcQ",
            Some(PathBuf::from("videos")),
        );

        let path = downloader
            .download_video(&request, &no_progress())
            .await
            .unwrap();

        let cwd = std::env::current_dir().unwrap();
        assert!(path.is_absolute());
        assert_eq!(path, cwd.join("videos").join("Never Gonna Give You Up.mp4"));
    }

    #[test]
    fn test_resolve_destination() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_destination(None).unwrap(), cwd);
        assert_eq!(
            resolve_destination(Some(Path::new("a/b"))).unwrap(),
            cwd.join("a/b")
        );
        assert_eq!(
            resolve_destination(Some(Path::new("/srv/media"))).unwrap(),
            PathBuf::from("/srv/media")
        );
    }

    #[test]
    fn test_title_separator_stays_inside_destination() {
        let meta = VideoMetadata {
            title: "AC/DC - Thunderstruck".to_string(),
            duration_seconds: 292,
            file_extension: "webm".to_string(),
            file_name: String::new(),
        };
        let path = resolve_output_path(Path::new("/videos"), &meta);
        assert_eq!(path.parent(), Some(Path::new("/videos")));
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "AC\u{29F8}DC - Thunderstruck.webm"
        );
    }

    #[test]
    fn test_reserved_characters_become_full_width() {
        assert_eq!(
            sanitize_title("Rust: Why? | Part 1"),
            "Rust\u{FF1A} Why\u{FF1F} \u{FF5C} Part 1"
        );
        assert_eq!(
            sanitize_title("\"a\" <b> *c* d\\e"),
            "\u{FF02}a\u{FF02} \u{FF1C}b\u{FF1E} \u{FF0A}c\u{FF0A} d\u{29F9}e"
        );
        assert_eq!(sanitize_title("line one\nline\ttwo"), "line one linetwo");
    }

    #[test]
    fn test_provider_file_name_wins_over_title() {
        let meta = VideoMetadata {
            title: "Rust: Why? | Part 1".to_string(),
            duration_seconds: 60,
            file_extension: "mp4".to_string(),
            file_name: "Rust\u{FF1A} Why\u{FF1F} \u{FF5C} Part 1.mp4".to_string(),
        };
        assert_eq!(
            resolve_output_path(Path::new("/videos"), &meta),
            PathBuf::from("/videos/Rust\u{FF1A} Why\u{FF1F} \u{FF5C} Part 1.mp4")
        );
    }
}
