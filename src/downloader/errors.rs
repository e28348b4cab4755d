// Error types for the download pipeline

use thiserror::Error;

use super::diagnostics::{diagnose_error, first_error_line, FailureReason};

#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// Input did not match any accepted YouTube URL shape
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    /// Provider could not retrieve video metadata
    #[error("Could not get video information: {message}")]
    Extraction {
        message: String,
        reason: Option<FailureReason>,
    },

    /// Metadata was available but the transfer failed
    #[error("Download failed: {message}")]
    Download {
        message: String,
        reason: Option<FailureReason>,
    },

    /// Anything else the provider raised; `detail` keeps the full diagnostic output
    #[error("Unexpected error: {message}")]
    Unexpected { message: String, detail: String },
}

impl DownloadError {
    /// Build an extraction failure from provider stderr
    pub fn extraction(stderr: &str) -> Self {
        Self::Extraction {
            message: summarize(stderr, "provider returned no error output"),
            reason: diagnose_error(stderr),
        }
    }

    /// Build a transfer failure from provider stderr
    pub fn download(stderr: &str) -> Self {
        Self::Download {
            message: summarize(stderr, "provider exited without error output"),
            reason: diagnose_error(stderr),
        }
    }

    pub fn unexpected(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// Stable category tag for the error
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::Extraction { .. } => "extraction",
            Self::Download { .. } => "download",
            Self::Unexpected { .. } => "unexpected",
        }
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Extraction { reason, .. } | Self::Download { reason, .. } => *reason,
            _ => None,
        }
    }

    /// Whether an outdated provider is a plausible cause
    pub fn provider_update_might_help(&self) -> bool {
        matches!(self, Self::Extraction { .. } | Self::Download { .. })
            && !self.reason().is_some_and(|r| r.is_permanent())
    }
}

fn summarize(stderr: &str, fallback: &str) -> String {
    first_error_line(stderr).unwrap_or_else(|| fallback.to_string())
}
