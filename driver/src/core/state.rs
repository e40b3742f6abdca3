//! Immutable per-run snapshots: the flag set and the project naming.

use serde::{Deserialize, Serialize};

/// Flags and probed facts for one driver invocation.
///
/// Constructed once in [`crate::drive`] from CLI flags, the process
/// environment, and the local puppeteer probe; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvState {
    /// `PACKAGE` selector glob; `None` targets every package.
    pub package: Option<String>,
    /// Already running inside the sandbox container.
    pub inside_sandbox: bool,
    /// Puppeteer install present in the working directory.
    pub local_puppeteer: bool,
    /// Notebook flow requested and the notebook package targeted.
    pub jupyter: bool,
    /// Preserve per-test console output and stack traces.
    pub debug: bool,
    /// Re-record test snapshots instead of asserting against them.
    pub write: bool,
    /// Run suites under parallel stress load.
    pub saturate: bool,
    /// Pause on failure and run tests in band.
    pub interactive: bool,
    /// Capture suite output and replay it with the exit code.
    pub quiet: bool,
    /// Stop the suite runner at the first failing test.
    pub bail: bool,
    /// Raw `-t` test-name filter.
    pub filter: Option<String>,
}

impl EnvState {
    /// Flags to forward when the driver re-invokes itself in the sandbox.
    ///
    /// `package` and `write` also cross the container boundary through the
    /// environment; the flag form keeps the inner invocation self-describing.
    pub fn forwarded_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.debug {
            flags.push("--debug".to_string());
        }
        if self.write {
            flags.push("--write".to_string());
        }
        if self.saturate {
            flags.push("--saturate".to_string());
        }
        if self.interactive {
            flags.push("--interactive".to_string());
        }
        if self.bail {
            flags.push("--bail".to_string());
        }
        if self.quiet {
            flags.push("--quiet".to_string());
        }
        if self.jupyter {
            flags.push("--jupyter".to_string());
        }
        if let Some(filter) = &self.filter {
            flags.push(format!("-t \"{filter}\""));
        }
        flags
    }
}

/// Names of the monorepo pieces the driver orchestrates.
///
/// Loaded from `driver.toml` when present; the defaults describe the lattice
/// workspace layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Package scope prefix, e.g. `@lattice`.
    pub scope: String,
    /// Package whose native-addon suite runs on the host.
    pub native_package: String,
    /// Package whose suite mutates global timezone configuration.
    pub timezone_package: String,
    /// Jupyter notebook widget package.
    pub notebook_package: String,
    /// Docker image carrying the browser sandbox.
    pub sandbox_image: String,
    /// Config file for the cross-package suite runner.
    pub runner_config: String,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            scope: "@lattice".to_string(),
            native_package: "lattice-native".to_string(),
            timezone_package: "lattice".to_string(),
            notebook_package: "lattice-notebook".to_string(),
            sandbox_image: "lattice/puppeteer:latest".to_string(),
            runner_config: "packages/lattice-test/jest.all.config.js".to_string(),
        }
    }
}
