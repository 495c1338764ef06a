//! Shell command execution, captured (`bash`) or streamed to the terminal (`bashx`).

use crate::core::error::PxError;
use crate::display;
use crate::system::SystemInfo;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::LazyLock;
use tracing::debug;

static SYSTEM: LazyLock<SystemInfo> = LazyLock::new(|| {
    let info = SystemInfo::detect();
    debug!(shell = %info.shell_path, os = %info.os_info, "detected system shell");
    info
});

/// Outcome of a captured shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedProcess {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CompletedProcess {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `cmd` through the system shell and capture stdout/stderr as text.
///
/// A non-zero exit code is reported in the result, not as an error; only a
/// failure to start the shell is an `Err`.
pub fn bash(cmd: &str) -> Result<CompletedProcess, PxError> {
    bash_in(cmd, None)
}

/// Like [`bash`], running in `dir` instead of the current directory.
pub fn bash_in(cmd: &str, dir: Option<&Path>) -> Result<CompletedProcess, PxError> {
    let mut command = SYSTEM.shell_command(cmd);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let output = command
        .output()
        .map_err(|e| PxError::Execution(format!("failed to run {:?}: {}", cmd, e)))?;

    let completed = CompletedProcess {
        command: cmd.to_string(),
        exit_code: exit_code(output.status),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!(command = cmd, exit_code = completed.exit_code, "bash finished");
    Ok(completed)
}

/// Run `cmd` with inherited stdio so its output streams live, after echoing
/// the command line. Returns the exit code.
pub fn bashx(cmd: &str) -> Result<i32, PxError> {
    display::display_execution_banner(cmd);

    let status = SYSTEM
        .shell_command(cmd)
        .status()
        .map_err(|e| PxError::Execution(format!("failed to run {:?}: {}", cmd, e)))?;

    let code = exit_code(status);
    debug!(command = cmd, exit_code = code, "bashx finished");
    Ok(code)
}

// Killed-by-signal has no exit code
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn bash_captures_stdout_and_exit_code() {
        let result = bash("echo hello").unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "hello\n");
        assert!(result.stderr.is_empty());
        assert!(result.success());
    }

    #[test]
    fn bash_reports_failure_without_erroring() {
        let result = bash("echo oops >&2; exit 3").unwrap();
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stderr, "oops\n");
        assert!(!result.success());
    }

    #[test]
    fn bash_in_uses_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let result = bash_in("ls", Some(dir.path())).unwrap();
        assert_eq!(result.stdout.trim(), "marker.txt");
    }

    #[test]
    fn bashx_returns_exit_code() {
        assert_eq!(bashx("true").unwrap(), 0);
        assert_eq!(bashx("exit 7").unwrap(), 7);
    }
}
