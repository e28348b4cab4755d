pub mod downloader;
pub mod logging;

pub use downloader::{
    is_valid_youtube_url, DownloadError, DownloadRequest, Downloader, ProviderConfig,
    YtDlpProvider,
};
