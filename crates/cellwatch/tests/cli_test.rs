// End-to-end CLI tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn cellwatch() -> Command {
    Command::cargo_bin("cellwatch").unwrap()
}

#[test]
fn help_lists_the_subcommands() {
    cellwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("discover"))
        .stdout(predicate::str::contains("probe"));
}

#[test]
fn config_path_prints_a_toml_location() {
    cellwatch()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".toml"));
}

#[test]
fn probe_of_a_dead_port_exits_with_connection_code() {
    // Discard port: nothing listens there.
    cellwatch()
        .args(["probe", "127.0.0.1:9", "--timeout-ms", "300"])
        .assert()
        .failure()
        .code(7)
        .stdout(predicate::str::contains("unreachable"));
}

#[test]
fn completions_generate_for_bash() {
    cellwatch()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cellwatch"));
}

#[test]
fn unknown_profile_is_a_not_found_error() {
    cellwatch()
        .args(["--profile", "does-not-exist", "config", "show"])
        .assert()
        .failure()
        .code(4);
}
