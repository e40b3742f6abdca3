//! Orchestration for a full driver invocation.
//!
//! Builds the immutable [`EnvState`] from CLI flags, the process environment,
//! and the local puppeteer probe, then selects and executes the plan.

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::commands::package_matches;
use crate::core::selector::select_plan;
use crate::core::state::{EnvState, Project};
use crate::exit_codes;
use crate::io::config::load_config;
use crate::io::executor::execute_plan;
use crate::io::process::ShellRunner;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "driver.toml";

/// Raw CLI flag set, before the environment is probed.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub debug: bool,
    pub write: bool,
    pub saturate: bool,
    pub interactive: bool,
    pub bail: bool,
    pub quiet: bool,
    pub jupyter: bool,
    pub private_puppeteer: bool,
    pub filter: Option<String>,
}

/// Build the per-run snapshot.
///
/// `jupyter` engages only when the selector targets the notebook package;
/// with no package selected the flag is inert. `write` can also be switched
/// on through the `WRITE_TESTS` environment toggle.
pub fn build_state(
    flags: &Flags,
    package: Option<String>,
    local_puppeteer: bool,
    write_env: bool,
    project: &Project,
) -> EnvState {
    let jupyter = flags.jupyter
        && package
            .as_deref()
            .is_some_and(|selector| package_matches(selector, &project.notebook_package));
    EnvState {
        package,
        inside_sandbox: flags.private_puppeteer,
        local_puppeteer,
        jupyter,
        debug: flags.debug,
        write: flags.write || write_env,
        saturate: flags.saturate,
        interactive: flags.interactive,
        quiet: flags.quiet,
        bail: flags.bail,
        filter: flags.filter.clone(),
    }
}

/// Run the driver end to end; returns the process exit code.
pub fn drive(flags: &Flags, dry_run: bool) -> Result<i32> {
    let config = load_config(Path::new(CONFIG_FILE))?;
    let package = env::var("PACKAGE").ok().filter(|p| !p.is_empty());
    let local_puppeteer = Path::new(&config.puppeteer_dir).exists();
    let write_env = env::var_os("WRITE_TESTS").is_some();

    let state = build_state(flags, package, local_puppeteer, write_env, &config.project);
    log_mode_banners(&state);

    let plan = select_plan(&state, &config.project)?;

    if dry_run {
        let mut payload = serde_json::to_string_pretty(&plan).context("serialize plan")?;
        payload.push('\n');
        print!("{payload}");
        return Ok(exit_codes::OK);
    }

    execute_plan(
        &plan,
        &state,
        &ShellRunner,
        config.silent_output_limit_bytes,
    )
}

fn log_mode_banners(state: &EnvState) {
    info!(
        local_puppeteer = state.local_puppeteer,
        inside_sandbox = state.inside_sandbox,
        jupyter = state.jupyter,
        "environment probed"
    );
    if state.write {
        info!("running the test suite in write mode");
    }
    if state.saturate {
        info!("running the test suite in saturate mode");
    }
    if state.debug {
        info!("running tests in debug mode, console output preserved");
    }
    if let Some(filter) = &state.filter {
        info!(filter = %filter, "qualifying test search");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::project;

    #[test]
    fn jupyter_requires_the_notebook_package() {
        let flags = Flags {
            jupyter: true,
            ..Flags::default()
        };

        let no_package = build_state(&flags, None, true, false, &project());
        assert!(!no_package.jupyter);

        let other = build_state(
            &flags,
            Some("lattice".to_string()),
            true,
            false,
            &project(),
        );
        assert!(!other.jupyter);

        let notebook = build_state(
            &flags,
            Some("lattice-notebook".to_string()),
            true,
            false,
            &project(),
        );
        assert!(notebook.jupyter);
    }

    #[test]
    fn write_mode_comes_from_flag_or_environment_toggle() {
        let flags = Flags::default();
        assert!(!build_state(&flags, None, false, false, &project()).write);
        assert!(build_state(&flags, None, false, true, &project()).write);

        let write_flag = Flags {
            write: true,
            ..Flags::default()
        };
        assert!(build_state(&write_flag, None, false, false, &project()).write);
    }

    #[test]
    fn private_puppeteer_marks_inside_sandbox() {
        let flags = Flags {
            private_puppeteer: true,
            ..Flags::default()
        };
        let state = build_state(&flags, None, false, false, &project());
        assert!(state.inside_sandbox);
    }
}
