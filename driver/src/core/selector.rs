//! Pure plan selection over an [`EnvState`] snapshot.

use std::fmt;

use crate::core::commands;
use crate::core::plan::{Plan, Step};
use crate::core::state::{EnvState, Project};

/// Flag combination rejected before any step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Notebook tests drive a real browser; they cannot be deferred to the
    /// remote container and need a local puppeteer install or a running
    /// sandbox.
    JupyterWithoutSandbox,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::JupyterWithoutSandbox => write!(
                f,
                "notebook tests must run against a local puppeteer install or inside the sandbox"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Derive the ordered step list for one invocation.
///
/// Pure: the same state and project always yield a structurally identical
/// plan. Branches are exclusive and evaluated in precedence order; the
/// timezone suite always gets its own process invocation ahead of any
/// general suite.
pub fn select_plan(state: &EnvState, project: &Project) -> Result<Plan, ConfigError> {
    let mut steps = Vec::new();

    if !state.inside_sandbox && !state.local_puppeteer {
        if state.jupyter {
            return Err(ConfigError::JupyterWithoutSandbox);
        }
        // Developer machine without puppeteer: do the real work here, then
        // hand the browser-bound suites to the sandbox container.
        steps.push(Step::shell(commands::make_dist_dirs()));
        steps.push(Step::shell(commands::build_fixtures(
            project,
            state.package.as_deref(),
        )));
        steps.push(Step::ancillary(commands::clean_screenshots()));
        if commands::wants_native_suite(state, project) {
            steps.push(Step::shell(commands::native_suite(project)));
        }
        steps.push(Step::handoff(commands::sandbox_reentry(state, project)));
        return Ok(Plan::new(steps));
    }

    if !state.inside_sandbox && state.local_puppeteer {
        if commands::wants_native_suite(state, project) {
            steps.push(Step::shell(commands::native_suite(project)));
        }
        steps.push(Step::ancillary(commands::clean_screenshots()));
        steps.push(Step::shell(commands::make_dist_dirs()));
    }

    if state.local_puppeteer {
        if state.jupyter {
            let package = state.package.as_deref().unwrap_or(&project.notebook_package);
            steps.push(Step::shell(commands::notebook_server_start(
                project, package,
            )));
        } else {
            steps.push(Step::shell(commands::build_fixtures(
                project,
                state.package.as_deref(),
            )));
        }
    }

    if state.quiet {
        steps.push(Step::silent(commands::suite_timezone(state, project)));
        steps.push(Step::silent(commands::suite_all(state, project)));
    } else if let Some(package) = &state.package {
        if state.jupyter {
            steps.push(Step::shell(commands::notebook_fixtures(project, package)));
            steps.push(Step::throwing(commands::suite_single(
                state,
                project,
                package,
                "test:notebook:run",
            )));
        } else {
            if commands::package_matches(package, &project.timezone_package) {
                steps.push(Step::shell(commands::suite_timezone(state, project)));
            }
            steps.push(Step::shell(commands::suite_single(
                state, project, package, "test:run",
            )));
        }
    } else {
        steps.push(Step::shell(commands::suite_timezone(state, project)));
        steps.push(Step::shell(commands::suite_all(state, project)));
    }

    Ok(Plan::new(steps))
}
