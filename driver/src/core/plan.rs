//! Step and plan value types produced by the selector.

use serde::Serialize;

/// How a step is invoked and how its output reaches the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Inherited stdio.
    Shell,
    /// Executes like [`StepKind::Shell`]; marks the suite invocation whose
    /// failure must reach the notebook teardown hook.
    Throwing,
    /// Stdout captured (bounded) and replayed together with the true exit
    /// code. Capture does not weaken failure propagation.
    Silent,
    /// Sandbox re-entry; its exit code becomes the run's exit code and no
    /// further steps execute.
    Handoff,
}

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub kind: StepKind,
    pub command: String,
    /// Log and keep going on nonzero exit instead of aborting the plan.
    pub continue_on_failure: bool,
}

impl Step {
    pub fn shell(command: String) -> Self {
        Self {
            kind: StepKind::Shell,
            command,
            continue_on_failure: false,
        }
    }

    /// Ancillary command whose failure must not sink the run.
    pub fn ancillary(command: String) -> Self {
        Self {
            kind: StepKind::Shell,
            command,
            continue_on_failure: true,
        }
    }

    pub fn throwing(command: String) -> Self {
        Self {
            kind: StepKind::Throwing,
            command,
            continue_on_failure: false,
        }
    }

    pub fn silent(command: String) -> Self {
        Self {
            kind: StepKind::Silent,
            command,
            continue_on_failure: false,
        }
    }

    pub fn handoff(command: String) -> Self {
        Self {
            kind: StepKind::Handoff,
            command,
            continue_on_failure: false,
        }
    }
}

/// Ordered step sequence for one invocation.
///
/// Append-only during selection, immutable during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}
