//! Test-orchestration driver CLI.
//!
//! Maps the flag set (plus the `PACKAGE` environment selector) to an ordered
//! plan of external command invocations and runs it, or prints it as JSON
//! under `--dry-run`.

use clap::Parser;

use driver::drive::{Flags, drive};
use driver::{exit_codes, logging};

#[derive(Parser)]
#[command(
    name = "driver",
    version,
    about = "Test orchestration driver for the lattice packages"
)]
struct Cli {
    /// Preserve per-test console output and stack traces.
    #[arg(long)]
    debug: bool,

    /// Re-record test snapshots instead of asserting against them.
    #[arg(long)]
    write: bool,

    /// Run suites under parallel stress load.
    #[arg(long)]
    saturate: bool,

    /// Pause on failure and run tests in band.
    #[arg(long)]
    interactive: bool,

    /// Stop the suite runner at the first failing test.
    #[arg(long)]
    bail: bool,

    /// Capture suite output and replay it with the exit code.
    #[arg(long)]
    quiet: bool,

    /// Run the notebook widget flow (requires targeting the notebook package).
    #[arg(long)]
    jupyter: bool,

    /// Set by the driver itself when re-invoked inside the sandbox image.
    #[arg(long = "private-puppeteer", hide = true)]
    private_puppeteer: bool,

    /// Only run tests whose names match this filter.
    #[arg(short = 't', value_name = "FILTER")]
    filter: Option<String>,

    /// Print the selected plan as JSON instead of running it.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let flags = Flags {
        debug: cli.debug,
        write: cli.write,
        saturate: cli.saturate,
        interactive: cli.interactive,
        bail: cli.bail,
        quiet: cli.quiet,
        jupyter: cli.jupyter,
        private_puppeteer: cli.private_puppeteer,
        filter: cli.filter,
    };
    match drive(&flags, cli.dry_run) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["driver"]);
        assert!(!cli.debug);
        assert!(!cli.quiet);
        assert!(!cli.private_puppeteer);
        assert_eq!(cli.filter, None);
    }

    #[test]
    fn parse_all_flags() {
        let cli = Cli::parse_from([
            "driver",
            "--debug",
            "--write",
            "--saturate",
            "--interactive",
            "--bail",
            "--quiet",
            "--jupyter",
            "--private-puppeteer",
            "-t",
            "view updates",
            "--dry-run",
        ]);
        assert!(cli.debug && cli.write && cli.saturate && cli.interactive);
        assert!(cli.bail && cli.quiet && cli.jupyter && cli.private_puppeteer);
        assert_eq!(cli.filter.as_deref(), Some("view updates"));
        assert!(cli.dry_run);
    }
}
