//! Shell process primitives behind the [`CommandRunner`] seam.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};

use crate::exit_codes;

/// Outcome of a captured run: exit code plus bounded stdout.
#[derive(Debug)]
pub struct CapturedRun {
    pub code: i32,
    pub stdout: Vec<u8>,
    /// Bytes discarded past the capture limit.
    pub truncated: usize,
}

/// Seam between plan execution and real child processes.
///
/// Production uses [`ShellRunner`]; tests use scripted fakes that record
/// commands and return predetermined exit codes without spawning anything.
pub trait CommandRunner {
    /// Run a command line with inherited stdio; returns the exit code.
    fn run(&self, command: &str) -> Result<i32>;

    /// Run with stdout captured up to `limit` bytes. Stderr stays inherited
    /// so progress and errors remain visible live.
    fn run_captured(&self, command: &str, limit: usize) -> Result<CapturedRun>;
}

/// Runs command lines through `sh -c`, blocking until the child exits.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<i32> {
        debug!(command, "spawning shell step");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .with_context(|| format!("spawn `{command}`"))?;
        Ok(exit_code(status))
    }

    fn run_captured(&self, command: &str, limit: usize) -> Result<CapturedRun> {
        debug!(command, limit, "spawning captured shell step");
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn `{command}`"))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout was not piped"))?;
        // Drain the pipe fully before waiting so the child never blocks on a
        // full pipe; only stdout is piped, so a single reader suffices.
        let (stdout, truncated) = read_limited(stdout, limit)?;
        let status = child.wait().context("wait for captured step")?;

        if truncated > 0 {
            warn!(truncated, "captured stdout truncated");
        }
        debug!(exit_code = ?status.code(), "captured step finished");
        Ok(CapturedRun {
            code: exit_code(status),
            stdout,
            truncated,
        })
    }
}

/// Signal deaths carry no code; fold them into the generic failure exit.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(exit_codes::FAILURE)
}

fn read_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read captured stdout")?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_limited_bounds_collected_bytes() {
        let input = b"0123456789".as_slice();
        let (buf, truncated) = read_limited(input, 4).expect("read");
        assert_eq!(buf, b"0123");
        assert_eq!(truncated, 6);
    }

    #[test]
    fn read_limited_keeps_everything_under_the_limit() {
        let input = b"abc".as_slice();
        let (buf, truncated) = read_limited(input, 100).expect("read");
        assert_eq!(buf, b"abc");
        assert_eq!(truncated, 0);
    }

    #[test]
    fn shell_runner_reports_exit_codes() {
        let code = ShellRunner.run("exit 7").expect("run");
        assert_eq!(code, 7);
    }

    #[test]
    fn shell_runner_captures_stdout() {
        let captured = ShellRunner
            .run_captured("printf 'captured'; exit 3", 1000)
            .expect("run");
        assert_eq!(captured.stdout, b"captured");
        assert_eq!(captured.code, 3);
        assert_eq!(captured.truncated, 0);
    }
}
