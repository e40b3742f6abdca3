//! CLI tests for the driver's dry-run plan output.
//!
//! Spawns the driver binary in a scratch directory (no puppeteer install, no
//! config file, so the bootstrap branch applies) and asserts on the JSON
//! plan it prints. Dry runs never launch external tools.

use std::process::{Command, Output};

use driver::test_support::project;
use serde_json::Value;

fn run_driver(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_driver"));
    cmd.current_dir(temp.path())
        .arg("--dry-run")
        .args(args)
        .env_remove("PACKAGE")
        .env_remove("WRITE_TESTS");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("run driver")
}

fn dry_run_plan(args: &[&str], envs: &[(&str, &str)]) -> Value {
    let output = run_driver(args, envs);
    assert!(
        output.status.success(),
        "driver exited {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("parse plan json")
}

#[test]
fn bootstrap_plan_ends_with_sandbox_handoff() {
    let plan = dry_run_plan(&[], &[]);
    let steps = plan["steps"].as_array().expect("steps");

    let last = steps.last().expect("nonempty plan");
    assert_eq!(last["kind"], "handoff");
    let command = last["command"].as_str().expect("command");
    assert!(command.starts_with("docker run"));
    assert!(command.contains("driver --private-puppeteer"));
}

#[test]
fn quiet_inside_sandbox_plans_two_silent_suites() {
    let plan = dry_run_plan(&["--private-puppeteer", "--quiet"], &[]);
    let steps = plan["steps"].as_array().expect("steps");

    assert_eq!(steps.len(), 2);
    assert!(steps.iter().all(|step| step["kind"] == "silent"));
    assert!(
        steps[0]["command"]
            .as_str()
            .expect("command")
            .contains("test:timezone:run")
    );
}

#[test]
fn package_selector_comes_from_the_environment() {
    let plan = dry_run_plan(
        &["--private-puppeteer"],
        &[("PACKAGE", "lattice-notebook")],
    );
    let steps = plan["steps"].as_array().expect("steps");

    let scope = format!("{}/lattice-notebook", project().scope);
    assert_eq!(steps.len(), 1);
    assert!(
        steps[0]["command"]
            .as_str()
            .expect("command")
            .contains(&scope)
    );
}

#[test]
fn jupyter_without_sandbox_fails_fast() {
    let output = run_driver(&["--jupyter"], &[("PACKAGE", "lattice-notebook")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "no plan may be printed");
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("notebook tests"),
        "config error must name the cause"
    );
}

#[test]
fn forwarded_flags_survive_the_handoff() {
    let plan = dry_run_plan(&["--saturate", "-t", "view updates"], &[]);
    let steps = plan["steps"].as_array().expect("steps");

    let handoff = steps.last().expect("nonempty plan")["command"]
        .as_str()
        .expect("command");
    assert!(handoff.contains("--saturate"));
    assert!(handoff.contains("-t \"view updates\""));
}
