//! Plan execution over the [`CommandRunner`] seam.
//!
//! Steps run strictly in order, one blocking child at a time. The executor
//! looks only at exit codes, never at output content; parallelism, if any,
//! lives inside the external suite-runner process.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::core::commands;
use crate::core::plan::{Plan, Step, StepKind};
use crate::core::state::EnvState;
use crate::exit_codes;
use crate::io::process::CommandRunner;

/// Walk the plan in order and return the process exit code for this run:
/// 0 when every step exits zero, 1 after an aborting failure, or the sandbox
/// hand-off's exit code verbatim.
///
/// `Err` is reserved for driver-internal failures (a step that cannot be
/// spawned); test failures are data, not errors.
pub fn execute_plan<R: CommandRunner>(
    plan: &Plan,
    state: &EnvState,
    runner: &R,
    silent_limit: usize,
) -> Result<i32> {
    for step in &plan.steps {
        info!(kind = ?step.kind, command = %step.command, "running step");
        let code = match step.kind {
            StepKind::Handoff => {
                // The inner driver invocation owns the rest of the work; its
                // exit code is this run's exit code.
                return runner.run(&step.command);
            }
            StepKind::Silent => run_silent(runner, step, silent_limit)?,
            StepKind::Shell | StepKind::Throwing => runner.run(&step.command)?,
        };

        if code == 0 {
            continue;
        }
        if step.continue_on_failure {
            warn!(code, command = %step.command, "ancillary step failed, continuing");
            continue;
        }
        error!(code, command = %step.command, "step failed, aborting plan");
        stop_notebook_server(state, runner);
        return Ok(exit_codes::FAILURE);
    }
    Ok(exit_codes::OK)
}

/// Run with stdout captured, then replay it to the invoking terminal along
/// with the true exit code.
fn run_silent<R: CommandRunner>(runner: &R, step: &Step, limit: usize) -> Result<i32> {
    let captured = runner.run_captured(&step.command, limit)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&captured.stdout)
        .context("replay captured output")?;
    if captured.truncated > 0 {
        writeln!(stdout, "[stdout truncated {} bytes]", captured.truncated)
            .context("write truncation notice")?;
    }
    Ok(captured.code)
}

/// Best-effort notebook server teardown after an aborting failure.
///
/// Never escalates: the run is already failing and the original cause must
/// stay visible.
fn stop_notebook_server<R: CommandRunner>(state: &EnvState, runner: &R) {
    if !(state.jupyter && state.local_puppeteer) {
        return;
    }
    info!("stopping notebook server after test failure");
    match runner.run(&commands::notebook_server_kill()) {
        Ok(0) => {}
        Ok(code) => warn!(code, "notebook server teardown exited nonzero"),
        Err(err) => warn!(err = %err, "notebook server teardown failed"),
    }
}
