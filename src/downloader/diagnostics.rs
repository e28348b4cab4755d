// Failure diagnostics - classifies yt-dlp error output
//
// Used to attach a reason to extraction/download errors so the CLI can
// print something actionable instead of raw stderr.

use regex::Regex;
use serde::Serialize;

lazy_static::lazy_static! {
    // Whole words only: "rental" must not fire on "parental"
    static ref DRM_WORD_RE: Regex = Regex::new(r"\b(?:drm|rental)\b").unwrap();
}

/// Why the provider refused or failed a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Requested quality has no matching stream
    FormatUnavailable,

    /// DRM-protected content (Premium, Music, Movies)
    DrmProtected,

    /// Requires channel membership
    MembersOnly,

    /// Age-restricted content requiring login
    AgeRestricted,

    /// Private video
    PrivateVideo,

    /// Deleted, removed or otherwise unavailable
    VideoUnavailable,

    /// Geographic restriction
    GeoBlocked,

    /// 429 or similar
    RateLimited,

    /// "Sign in to confirm you're not a bot" and friends
    BotDetection,

    /// HTTP 403 Forbidden
    Http403Forbidden,

    /// Timeouts, refused connections
    NetworkTimeout,

    Unknown,
}

impl FailureReason {
    /// Whether no setting change can make the video downloadable
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::DrmProtected | Self::VideoUnavailable | Self::PrivateVideo
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FormatUnavailable => "Requested quality is not available",
            Self::DrmProtected => "DRM-protected content",
            Self::MembersOnly => "Members-only content",
            Self::AgeRestricted => "Age-restricted content",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::GeoBlocked => "Geographic restriction",
            Self::RateLimited => "Rate limited by YouTube",
            Self::BotDetection => "Bot detection triggered",
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::NetworkTimeout => "Network timeout",
            Self::Unknown => "Unknown failure",
        }
    }

    /// What the user can try next
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::FormatUnavailable => "Try a different --quality, or `best`.",
            Self::DrmProtected => "This video is DRM-protected and cannot be downloaded as a file.",
            Self::MembersOnly | Self::AgeRestricted => {
                "Pass --cookies with a cookies.txt exported from a logged-in browser."
            }
            Self::PrivateVideo => "Only accounts granted access by the uploader can fetch it.",
            Self::VideoUnavailable => {
                "The video may have been deleted, removed for copyright or made private."
            }
            Self::GeoBlocked => "Use --proxy with a server in a region where the video is available.",
            Self::RateLimited => "Wait 10-15 minutes or use a different IP (--proxy).",
            Self::BotDetection | Self::Http403Forbidden => {
                "Update yt-dlp, pass --cookies, or try again later / through --proxy."
            }
            Self::NetworkTimeout => "Check your connection; --socket-timeout raises the limit.",
            Self::Unknown => "Check the URL and try again.",
        }
    }
}

/// Analyze provider error output and return the most specific reason
pub fn diagnose_error(error: &str) -> Option<FailureReason> {
    let lower = error.to_lowercase();

    if lower.contains("requested format is not available") {
        return Some(FailureReason::FormatUnavailable);
    }

    if DRM_WORD_RE.is_match(&lower)
        || lower.contains("widevine")
        || lower.contains("playready")
        || lower.contains("youtube premium")
        || lower.contains("requires purchase")
    {
        return Some(FailureReason::DrmProtected);
    }

    if lower.contains("members only")
        || lower.contains("members-only")
        || lower.contains("join this channel")
        || lower.contains("available to members")
    {
        return Some(FailureReason::MembersOnly);
    }

    if lower.contains("age-restricted")
        || lower.contains("sign in to confirm your age")
        || lower.contains("inappropriate for some users")
    {
        return Some(FailureReason::AgeRestricted);
    }

    if lower.contains("private video")
        || lower.contains("video is private")
        || lower.contains("sign in if you've been granted access")
    {
        return Some(FailureReason::PrivateVideo);
    }

    if lower.contains("video unavailable")
        || lower.contains("video has been removed")
        || lower.contains("no longer available")
        || lower.contains("video is unavailable")
    {
        return Some(FailureReason::VideoUnavailable);
    }

    if lower.contains("available in your country")
        || lower.contains("blocked in your country")
        || lower.contains("geo restrict")
    {
        return Some(FailureReason::GeoBlocked);
    }

    if lower.contains("http error 429")
        || lower.contains("rate limit")
        || lower.contains("too many requests")
    {
        return Some(FailureReason::RateLimited);
    }

    if lower.contains("not a bot") || lower.contains("captcha") || lower.contains("unusual traffic") {
        return Some(FailureReason::BotDetection);
    }

    if lower.contains("http error 403") || lower.contains("forbidden") {
        return Some(FailureReason::Http403Forbidden);
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection refused")
        || lower.contains("network is unreachable")
    {
        return Some(FailureReason::NetworkTimeout);
    }

    if !error.trim().is_empty() {
        return Some(FailureReason::Unknown);
    }

    None
}

/// Pick the most useful line of provider stderr for a one-line message
pub fn first_error_line(stderr: &str) -> Option<String> {
    let mut lines = stderr.lines().map(str::trim).filter(|l| !l.is_empty());

    stderr
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.next_back())
        .map(|l| l.chars().take(300).collect())
}
