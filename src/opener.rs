//! Reveal a path in the platform's file manager.

use std::ffi::OsString;
use std::path::Path;

use tokio::process::Command;

use crate::error::{AppError, Result};

/// Program and arguments that reveal `path` on this platform.
pub fn opener_command(path: &Path) -> (&'static str, Vec<OsString>) {
    if cfg!(target_os = "windows") {
        let mut select = OsString::from("/select,");
        select.push(path.as_os_str());
        ("explorer.exe", vec![select])
    } else if cfg!(target_os = "macos") {
        ("open", vec![path.as_os_str().to_owned()])
    } else {
        ("xdg-open", vec![path.as_os_str().to_owned()])
    }
}

/// Open `path` in the system file manager and wait for the launcher.
pub async fn open_in_file_manager(path: &Path) -> Result<()> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(AppError::InvalidPath(format!(
            "{} does not exist",
            path.display()
        )));
    }

    let (program, args) = opener_command(path);
    tracing::info!(program, path = %path.display(), "opening in file manager");
    let status = Command::new(program).args(&args).status().await?;

    // explorer.exe exits with 1 even on success
    if status.success() || cfg!(target_os = "windows") {
        Ok(())
    } else {
        Err(AppError::Open {
            executable: program.to_string(),
            status: status.code().unwrap_or(-1),
        })
    }
}
