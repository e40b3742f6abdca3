//! Test-only helpers: deterministic states and a scripted command runner.

use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::core::state::{EnvState, Project};
use crate::io::process::{CapturedRun, CommandRunner};

/// Default state: developer machine, no flags, no sandbox anywhere.
pub fn state() -> EnvState {
    EnvState::default()
}

/// State as seen inside the sandbox container.
pub fn inside_sandbox() -> EnvState {
    EnvState {
        inside_sandbox: true,
        ..EnvState::default()
    }
}

/// Default lattice project naming.
pub fn project() -> Project {
    Project::default()
}

/// Scripted [`CommandRunner`]: records every command and returns exit codes
/// by substring match, defaulting to zero. Never spawns a process.
pub struct ScriptedRunner {
    calls: Mutex<Vec<String>>,
    exits: Vec<(String, i32)>,
    spawn_error: Option<String>,
    captured_stdout: Vec<u8>,
}

impl ScriptedRunner {
    /// Runner where every command exits zero.
    pub fn ok() -> Self {
        Self::new(Vec::new())
    }

    /// Runner with substring-matched exit code overrides.
    pub fn new(exits: Vec<(String, i32)>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exits,
            spawn_error: None,
            captured_stdout: b"suite output\n".to_vec(),
        }
    }

    /// Commands matching this substring fail to spawn entirely.
    pub fn with_spawn_error(mut self, needle: &str) -> Self {
        self.spawn_error = Some(needle.to_string());
        self
    }

    /// Commands seen so far, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, command: &str) -> Result<()> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(command.to_string());
        if let Some(needle) = &self.spawn_error {
            if command.contains(needle.as_str()) {
                return Err(anyhow!("scripted spawn failure for `{command}`"));
            }
        }
        Ok(())
    }

    fn code_for(&self, command: &str) -> i32 {
        self.exits
            .iter()
            .find(|(needle, _)| command.contains(needle.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &str) -> Result<i32> {
        self.record(command)?;
        Ok(self.code_for(command))
    }

    fn run_captured(&self, command: &str, limit: usize) -> Result<CapturedRun> {
        self.record(command)?;
        let mut stdout = self.captured_stdout.clone();
        let truncated = stdout.len().saturating_sub(limit);
        stdout.truncate(limit);
        Ok(CapturedRun {
            code: self.code_for(command),
            stdout,
            truncated,
        })
    }
}
