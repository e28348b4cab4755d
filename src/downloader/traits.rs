// Media-fetch provider seam

use async_trait::async_trait;
use std::path::Path;

use super::errors::DownloadError;
use super::models::{DownloadStatus, VideoMetadata};

/// External collaborator that locates and transfers the media stream.
///
/// `extract_info` reports failures as `DownloadError::Extraction` and `download`
/// as `DownloadError::Download`; anything else is `DownloadError::Unexpected`.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Name of the provider (for logging)
    fn name(&self) -> &'static str;

    /// Fetch title, duration and extension without downloading
    async fn extract_info(&self, url: &str) -> Result<VideoMetadata, DownloadError>;

    /// Write `{title}.{ext}` into `destination`, calling `progress` as bytes arrive
    async fn download(
        &self,
        url: &str,
        destination: &Path,
        progress: &dyn ProgressHook,
    ) -> Result<(), DownloadError>;
}

/// Callback invoked zero or more times during a transfer. Purely advisory.
pub trait ProgressHook: Send + Sync {
    fn on_progress(&self, status: &DownloadStatus);
}

impl<F> ProgressHook for F
where
    F: Fn(&DownloadStatus) + Send + Sync,
{
    fn on_progress(&self, status: &DownloadStatus) {
        self(status)
    }
}
