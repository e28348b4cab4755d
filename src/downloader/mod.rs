// Downloader module - validation, orchestration and the yt-dlp provider

pub mod backends;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod traits;
pub mod utils;
pub mod validator;

pub use backends::YtDlpProvider;
pub use config::{Launcher, ProviderConfig};
pub use diagnostics::FailureReason;
pub use errors::DownloadError;
pub use models::{DownloadRequest, DownloadStatus, Quality, VideoMetadata};
pub use orchestrator::Downloader;
pub use progress::ProgressReporter;
pub use traits::{MediaProvider, ProgressHook};
pub use validator::is_valid_youtube_url;
