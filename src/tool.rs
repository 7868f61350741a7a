//! Builder for running the external probing and splitting tools.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::ToolError;

/// Default command timeout: 10 minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A single external tool invocation.
///
/// ```no_run
/// use keyframe_splitter::tool::ToolCommand;
///
/// # async fn example() -> Result<(), keyframe_splitter::error::ToolError> {
/// let output = ToolCommand::new("ffprobe")
///     .args(["-v", "quiet", "-print_format", "json", "-show_frames"])
///     .arg("input.mp4")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ToolCommand {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Short tool name for messages, e.g. `ffmpeg` for `/usr/bin/ffmpeg`.
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }

    /// Run the command to completion, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// - [`ToolError::SpawnFailed`] if the process could not be started
    /// - [`ToolError::TimedOut`] if it outlives the configured timeout (the child is killed)
    /// - [`ToolError::Failed`] if it exits with a non-zero status
    pub async fn execute(&self) -> Result<ToolOutput, ToolError> {
        let tool = self.tool_name();
        debug!("Running {}", self);

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ToolError::SpawnFailed {
                tool: tool.clone(),
                reason: e.to_string(),
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| ToolError::SpawnFailed {
                tool: tool.clone(),
                reason: format!("I/O error waiting for process: {}", e),
            })?,
            Err(_elapsed) => {
                return Err(ToolError::TimedOut {
                    tool,
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        let tool_output = ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(ToolError::Failed {
                tool,
                status: output.status.to_string(),
                stderr: tool_output.stderr.trim().to_string(),
            });
        }

        Ok(tool_output)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Check that a tool can be launched by asking it for its version.
pub async fn check_available<P: AsRef<Path>>(program: P) -> Result<(), ToolError> {
    let mut command = ToolCommand::new(program.as_ref());
    command.arg("-version").timeout(Duration::from_secs(10));

    command
        .execute()
        .await
        .map(|_| ())
        .map_err(|e| ToolError::NotAvailable {
            tool: command.tool_name(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_whitespace() {
        let mut command = ToolCommand::new("ffmpeg");
        command.args(["-i", "my video.mp4", "-codec", "copy"]);

        assert_eq!(
            command.to_string(),
            "ffmpeg -i \"my video.mp4\" -codec copy"
        );
    }

    #[test]
    fn test_tool_name_strips_directory() {
        assert_eq!(ToolCommand::new("/usr/local/bin/ffprobe").tool_name(), "ffprobe");
    }

    #[tokio::test]
    async fn test_nonexistent_tool_fails_to_spawn() {
        let result = ToolCommand::new("nonexistent_tool_xyz_12345").execute().await;
        assert!(matches!(result, Err(ToolError::SpawnFailed { .. })));

        let available = check_available("nonexistent_tool_xyz_12345").await;
        assert!(matches!(available, Err(ToolError::NotAvailable { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_fires() {
        let result = ToolCommand::new("sleep")
            .arg("10")
            .timeout(Duration::from_millis(100))
            .execute()
            .await;

        assert!(matches!(result, Err(ToolError::TimedOut { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let result = ToolCommand::new("false").execute().await;
        assert!(matches!(result, Err(ToolError::Failed { .. })));
    }
}
