//! Process invocation for script providers.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured outcome of one provider process invocation.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Whether the process exited with status zero
    pub success: bool,
    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
    /// Standard output, trimmed of surrounding whitespace
    pub stdout: String,
    /// Standard error, trimmed of surrounding whitespace
    pub stderr: String,
}

/// Run an executable, feeding `stdin_data` on standard input and
/// capturing both output streams.
///
/// The child inherits the parent environment. No timeout is imposed: a
/// hung process blocks the caller indefinitely. Callers that need a
/// deadline must wrap the invocation in their own concurrency unit.
pub fn execute(path: &Path, args: &[&str], stdin_data: &str) -> Result<ProcessOutput> {
    let mut child = Command::new(path)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(mut sink) = child.stdin.take() {
        // Scripts are free to exit without reading their stdin
        if let Err(e) = sink.write_all(stdin_data.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
    }

    let output = child.wait_with_output()?;
    Ok(ProcessOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
