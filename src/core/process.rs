use crate::core::error::{Result, VshError};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

pub struct ProcessExecutor;

impl ProcessExecutor {
    pub async fn execute<S: AsRef<OsStr>>(
        cmd: impl AsRef<OsStr>,
        args: &[S],
        cwd: Option<&Path>,
    ) -> Result<Output> {
        let cmd = cmd.as_ref();
        let mut command = Command::new(cmd);
        command.args(args);

        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| {
            VshError::CommandFailed(format!("{}: {}", cmd.to_string_lossy(), e))
        })?;

        Ok(output)
    }

    pub async fn execute_with_output<S: AsRef<OsStr>>(
        cmd: impl AsRef<OsStr>,
        args: &[S],
        cwd: Option<&Path>,
    ) -> Result<String> {
        let cmd = cmd.as_ref();
        let output = Self::execute(cmd, args, cwd).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VshError::CommandFailed(format!(
                "{} failed: {}",
                cmd.to_string_lossy(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Runs a builder step; a non-zero exit becomes a build failure carrying the combined output.
    pub async fn execute_build_step<S: AsRef<OsStr>>(
        cmd: impl AsRef<OsStr>,
        args: &[S],
    ) -> Result<()> {
        let cmd = cmd.as_ref();
        let output = Self::execute(cmd, args, None).await?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VshError::BuildFailed(format!(
                "{} exited with {}\n{}{}",
                cmd.to_string_lossy(),
                output.status,
                stdout,
                stderr
            )));
        }

        Ok(())
    }

    pub fn find_command(cmd: &str) -> Option<PathBuf> {
        which::which(cmd).ok()
    }
}
