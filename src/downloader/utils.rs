// Process helpers for the provider adapter

use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;

use super::errors::DownloadError;

/// Start `program`, mapping spawn failures to `Unexpected`
pub fn spawn_piped(program: &str, args: &[String]) -> Result<tokio::process::Child, DownloadError> {
    TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            let message = if e.kind() == std::io::ErrorKind::NotFound {
                format!("{} not found; install yt-dlp or point --ytdlp at it", program)
            } else {
                format!("Failed to start {}: {}", program, e)
            };
            DownloadError::unexpected(message, format!("{} {:?}: {:?}", program, args, e))
        })
}

/// Run a command to completion and collect its output
pub async fn run_output(program: &str, args: Vec<String>) -> Result<Output, DownloadError> {
    let mut child = spawn_piped(program, &args)?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| DownloadError::unexpected("Failed to capture stdout", program.to_string()))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| DownloadError::unexpected("Failed to capture stderr", program.to_string()))?;

    // stderr is drained concurrently so a chatty child cannot block on a full pipe
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await?;
        Ok::<Vec<u8>, std::io::Error>(buf)
    });

    let mut stdout = Vec::new();
    stdout_pipe
        .read_to_end(&mut stdout)
        .await
        .map_err(|e| DownloadError::unexpected("Failed to read stdout", format!("{:?}", e)))?;

    let status = child
        .wait()
        .await
        .map_err(|e| DownloadError::unexpected(format!("Failed to wait for {}", program), format!("{:?}", e)))?;

    let stderr = stderr_task
        .await
        .map_err(|e| DownloadError::unexpected("stderr task failed", format!("{:?}", e)))?
        .map_err(|e| DownloadError::unexpected("Failed to read stderr", format!("{:?}", e)))?;

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// Install locations checked before `PATH` (Homebrew on both Mac architectures, pipx, distro)
const INSTALL_DIRS: [&str; 3] = ["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"];

/// Locate the yt-dlp executable; `None` when it is in none of the known places
pub fn find_ytdlp() -> Option<String> {
    let path_dirs = std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_default();
    let dirs = INSTALL_DIRS.into_iter().map(PathBuf::from).chain(path_dirs);

    find_in_dirs("yt-dlp", dirs).map(|path| path.to_string_lossy().to_string())
}

/// First `dir/name` that is a regular file
fn find_in_dirs(name: &str, dirs: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    dirs.into_iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
