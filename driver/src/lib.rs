//! Multi-environment test-orchestration driver for a multi-package monorepo.
//!
//! Given a target package and a set of environment flags, the driver decides
//! which sequence of external processes must run (builds, test suites, a
//! notebook-server lifecycle, sandbox re-entry), in what order, and how
//! failures propagate. The architecture enforces a strict separation:
//!
//! - **[`core`]**: pure, deterministic logic (plan selection, command
//!   templates). No I/O, fully testable in isolation.
//! - **[`io`]**: side-effecting operations (child processes, config files).
//!   Isolated behind the `CommandRunner` seam to enable scripted fakes in
//!   tests.
//!
//! [`drive`] coordinates core logic with I/O to implement the CLI.

pub mod core;
pub mod drive;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
