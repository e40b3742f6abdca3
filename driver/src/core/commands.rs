//! Command-line templates for every step the driver can schedule.
//!
//! The driver never inspects child output, so these templates are the whole
//! contract with the external tools: the workspace task runner, the parallel
//! suite runner, docker, and the notebook server.

use regex::Regex;

use crate::core::state::{EnvState, Project};

/// Monorepo task tool, resolved from the workspace's own install.
pub const WORKSPACE_TOOL: &str = "node_modules/.bin/lerna";
/// Parallel suite runner.
pub const SUITE_RUNNER: &str = "node_modules/.bin/jest";

/// Turn the raw `-t` filter into a permissive test-name regex.
///
/// Spaces become `.` so a filter typed as prose matches test names no matter
/// how they are punctuated.
pub fn filter_pattern(filter: Option<&str>) -> String {
    filter.map(|f| f.replace(' ', ".")).unwrap_or_default()
}

/// Match a `PACKAGE` selector glob (`*`, `?`) against a literal package name.
pub fn package_matches(selector: &str, name: &str) -> bool {
    let mut pattern = String::from("^");
    for ch in selector.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).map(|re| re.is_match(name)).unwrap_or(false)
}

/// True when the native-addon suite belongs in the plan: no package selected,
/// or the selector matches the native package.
pub fn wants_native_suite(state: &EnvState, project: &Project) -> bool {
    match &state.package {
        Some(selector) => package_matches(selector, &project.native_package),
        None => true,
    }
}

fn suite_env(state: &EnvState) -> String {
    format!(
        "LATTICE_SATURATE={} LATTICE_PAUSE_ON_FAILURE={} WRITE_TESTS={} TZ=UTC",
        state.saturate, state.interactive, state.write
    )
}

fn name_pattern(state: &EnvState) -> String {
    format!(
        " --testNamePattern=\"{}\"",
        filter_pattern(state.filter.as_deref())
    )
}

/// Cross-package parallel suite. Timezone tests are excluded; they get their
/// own process via [`suite_timezone`].
pub fn suite_all(state: &EnvState, project: &Project) -> String {
    let mut cmd = format!(
        "{} {SUITE_RUNNER} --rootDir=. --config={} --color --verbose \
         --maxWorkers=50% --testPathIgnorePatterns='timezone'",
        suite_env(state),
        project.runner_config
    );
    if state.bail {
        cmd.push_str(" --bail");
    }
    if !state.debug {
        cmd.push_str(" --silent --noStackTrace");
    }
    cmd.push_str(&name_pattern(state));
    cmd
}

/// Suite for a single package, run through the workspace tool so the
/// package's own `test:run` (or an override task) drives the runner.
pub fn suite_single(state: &EnvState, project: &Project, package: &str, task: &str) -> String {
    let mut cmd = format!(
        "{} LATTICE_LOCAL_PUPPETEER={} {WORKSPACE_TOOL} exec --concurrency 1 --no-bail \
         --scope=\"{}/{package}\" -- yarn {task}",
        suite_env(state),
        state.local_puppeteer,
        project.scope
    );
    if !state.debug {
        cmd.push_str(" --silent");
    }
    if state.interactive {
        cmd.push_str(" --runInBand");
    }
    cmd.push_str(&name_pattern(state));
    cmd
}

/// Timezone suite in its own process invocation; it mutates process-global
/// time configuration and must not share a runner with other suites.
pub fn suite_timezone(state: &EnvState, project: &Project) -> String {
    let mut cmd = format!(
        "{WORKSPACE_TOOL} exec --concurrency 1 --no-bail --scope=\"{}/{}\" \
         -- yarn test:timezone:run",
        project.scope, project.timezone_package
    );
    if !state.debug {
        cmd.push_str(" --silent");
    }
    cmd.push_str(&name_pattern(state));
    cmd
}

/// Ensure every package has its distributable output directory.
pub fn make_dist_dirs() -> String {
    format!("{WORKSPACE_TOOL} exec -- mkdir -p dist/umd")
}

/// Package-scoped test fixture build; unscoped builds every package.
pub fn build_fixtures(project: &Project, package: Option<&str>) -> String {
    scoped_task(project, package, "test:build")
}

/// Remove screenshot artifacts left behind by a previous run.
pub fn clean_screenshots() -> String {
    "yarn --silent clean --screenshots".to_string()
}

/// Native-addon test suite; runs on the host, outside any browser sandbox.
pub fn native_suite(project: &Project) -> String {
    format!(
        "{WORKSPACE_TOOL} exec --scope=\"{}/{}\" -- yarn test",
        project.scope, project.native_package
    )
}

/// Start the notebook server ahead of the notebook suite. The server
/// outlives this task; teardown happens in the executor's failure hook.
pub fn notebook_server_start(project: &Project, package: &str) -> String {
    scoped_task(project, Some(package), "test:notebook:start")
}

/// Copy the notebook test fixtures into the running server's tree.
pub fn notebook_fixtures(project: &Project, package: &str) -> String {
    scoped_task(project, Some(package), "test:notebook:build")
}

/// Best-effort notebook server teardown after a failed run.
pub fn notebook_server_kill() -> String {
    "pkill -f \"jupyter-lab --no-browser\"".to_string()
}

/// Re-invoke the driver inside the sandbox image with the original flags.
///
/// `PACKAGE` and `WRITE_TESTS` pass through from the host environment; the
/// working directory is mounted so build output from the bootstrap phase is
/// visible inside the container.
pub fn sandbox_reentry(state: &EnvState, project: &Project) -> String {
    let mut inner = String::from("driver --private-puppeteer");
    for flag in state.forwarded_flags() {
        inner.push(' ');
        inner.push_str(&flag);
    }
    format!(
        "docker run --rm --shm-size=2g -e PACKAGE -e WRITE_TESTS \
         -v \"$(pwd)\":/usr/src/app -w /usr/src/app {} {inner}",
        project.sandbox_image
    )
}

fn scoped_task(project: &Project, package: Option<&str>, task: &str) -> String {
    match package {
        Some(package) => format!(
            "{WORKSPACE_TOOL} run {task} --stream --scope=\"{}/{package}\"",
            project.scope
        ),
        None => format!("{WORKSPACE_TOOL} run {task} --stream"),
    }
}
