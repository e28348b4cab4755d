// Provider configuration

use std::path::PathBuf;

use super::models::Quality;

/// Environment variable overriding the yt-dlp binary
pub const ENV_YTDLP: &str = "TUBEFETCH_YTDLP";
/// Environment variable selecting python module mode (`<python> -m yt_dlp`)
pub const ENV_PYTHON: &str = "TUBEFETCH_PYTHON";
pub const ENV_PROXY: &str = "TUBEFETCH_PROXY";
pub const ENV_COOKIES: &str = "TUBEFETCH_COOKIES";

/// How the provider program is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// Locate a yt-dlp binary (common paths, then PATH)
    Auto,
    /// Explicit yt-dlp binary
    Binary(String),
    /// `<interpreter> -m yt_dlp`
    PythonModule(String),
}

/// Settings for the yt-dlp provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub launcher: Launcher,
    pub quality: Quality,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Path to cookies.txt file
    pub cookies_path: Option<PathBuf>,
    /// Forwarded as `--socket-timeout`; yt-dlp's own default when unset
    pub socket_timeout: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            launcher: Launcher::Auto,
            quality: Quality::Best,
            proxy: None,
            cookies_path: None,
            socket_timeout: None,
        }
    }
}

impl ProviderConfig {
    /// Defaults overlaid with `TUBEFETCH_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let launcher = if let Some(python) = non_empty(ENV_PYTHON) {
            Launcher::PythonModule(python)
        } else if let Some(binary) = non_empty(ENV_YTDLP) {
            Launcher::Binary(binary)
        } else {
            Launcher::Auto
        };

        Self {
            launcher,
            proxy: non_empty(ENV_PROXY),
            cookies_path: non_empty(ENV_COOKIES).map(PathBuf::from),
            ..Self::default()
        }
    }

    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// `None` keeps the current value
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        if proxy.is_some() {
            self.proxy = proxy;
        }
        self
    }

    /// `None` keeps the current value
    pub fn with_cookies_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.cookies_path = path;
        }
        self
    }

    pub fn with_socket_timeout(mut self, seconds: Option<u32>) -> Self {
        self.socket_timeout = seconds;
        self
    }

    /// Network and auth arguments shared by every yt-dlp invocation
    pub fn network_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        if let Some(path) = &self.cookies_path {
            args.push("--cookies".to_string());
            args.push(path.to_string_lossy().to_string());
        }

        if let Some(timeout) = self.socket_timeout {
            args.push("--socket-timeout".to_string());
            args.push(timeout.to_string());
        }

        args
    }
}
