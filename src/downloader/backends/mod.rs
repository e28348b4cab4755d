// Media-fetch provider implementations

pub mod ytdlp;

pub use ytdlp::YtDlpProvider;
